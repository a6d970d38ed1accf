// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! HGVS substitutions: `ACCESSION[(GENE)]:x.description`.
//!
//! The generic skeleton is matched first; the scheme letter then selects
//! the protein, coding or genomic grammar, most specific first. Only
//! single-nucleotide substitutions are supported:
//!
//! - `NC_000002.12:g.233760498G>A`
//! - `NM_000463.3(UGT1A1):c.211G>A (p.Gly71Arg)`
//! - `NP_000454.1:p.Gly71Arg`, `P22309:p.(G71R)`

use memchr::memchr;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::chromosome;
use super::{
    parse_amino_acid, parse_base, parse_position, VariantFormat, AA_TOKEN, UNIPROT_TOKEN,
};
use crate::input::{
    CodingInput, GenomicInput, ParsedVariant, ProteinInput, StatedProtein, VariantInput,
};

static SKELETON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<acc>[A-Za-z][^:\s()]*)(?:\((?P<gene>[^)\s]*)\))?\s*:\s*(?P<scheme>[a-z])\.(?P<desc>.*)$",
    )
    .unwrap()
});

static GENOMIC_DESC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<pos>\d+)(?P<ref>[A-Za-z]+)>(?P<alt>[A-Za-z]+)$").unwrap()
});

static CODING_DESC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<pos>\d+)(?P<ref>[A-Za-z]+)>(?P<alt>[A-Za-z]+)(?:\s*\(?\s*p\.\(?(?P<pref>{aa})(?P<ppos>\d+)(?P<palt>{aa}|=)\)?\s*\)?)?$",
        aa = AA_TOKEN
    ))
    .unwrap()
});

static PROTEIN_DESC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\(?(?P<ref>{aa})(?P<pos>\d+)(?P<alt>{aa}|=)\)?$",
        aa = AA_TOKEN
    ))
    .unwrap()
});

/// Intronic (`123+5`, `123-5`) and UTR (`-12`, `*30`) coding positions.
static NON_CDS_POSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*]\d|\d+[+-]\d)").unwrap());

static UNIPROT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^{}$", UNIPROT_TOKEN)).unwrap());

/// Accession prefixes that are valid RefSeq but cannot be mapped.
const UNSUPPORTED_PREFIXES: &[&str] = &["NG_", "LRG_", "NR_"];

/// Structural check for the generic HGVS skeleton.
pub fn matches(line: &str) -> bool {
    memchr(b':', line.as_bytes()).is_some() && SKELETON.is_match(line)
}

/// Parse any HGVS input, dispatching on the scheme letter.
pub fn parse(index: usize, line: &str) -> VariantInput {
    let Some(caps) = SKELETON.captures(line) else {
        return VariantInput::invalid(
            index,
            line,
            VariantFormat::HgvsGenomic,
            format!("Invalid HGVS input '{}'", line),
        );
    };
    let scheme = &caps["scheme"];
    let format = match scheme {
        "p" => VariantFormat::HgvsProtein,
        "c" | "n" | "r" => VariantFormat::HgvsCoding,
        _ => VariantFormat::HgvsGenomic,
    };

    let accession = &caps["acc"];
    let upper = accession.to_ascii_uppercase();
    if let Some(prefix) = UNSUPPORTED_PREFIXES.iter().find(|p| upper.starts_with(**p)) {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "{} accessions are not supported ('{}'); use NC_ with g., NM_ with c. or NP_ with p.",
                prefix, accession
            ),
        );
    }

    match scheme {
        "p" => parse_protein(index, line, &caps),
        "c" => parse_coding(index, line, &caps),
        "g" => parse_genomic(index, line, &caps),
        "n" | "m" | "r" => VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "HGVS {}. notation is not supported; use g., c. or p.",
                scheme
            ),
        ),
        other => VariantInput::invalid(
            index,
            line,
            format,
            format!("Unknown HGVS scheme '{}.'", other),
        ),
    }
}

fn parse_genomic(index: usize, line: &str, caps: &Captures<'_>) -> VariantInput {
    let format = VariantFormat::HgvsGenomic;
    let accession = &caps["acc"];
    let Some((chromosome, assembly)) = chromosome::from_refseq(accession) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Unsupported genomic accession '{}'; expected an NC_ chromosome accession",
                accession
            ),
        );
    };
    let desc = caps["desc"].trim();
    let Some(d) = GENOMIC_DESC.captures(desc) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Unsupported HGVS genomic change 'g.{}'; only substitutions such as g.123A>G are supported",
                desc
            ),
        );
    };

    let result = (|| -> Result<GenomicInput, String> {
        let mut genomic = GenomicInput::new(chromosome, parse_position(&d["pos"])?);
        genomic.reference = Some(parse_base(&d["ref"], "reference base")?);
        genomic.alternates = vec![parse_base(&d["alt"], "alternate base")?];
        genomic.accession_assembly = assembly;
        Ok(genomic)
    })();

    match result {
        Ok(genomic) => {
            VariantInput::new(index, line, format).with_parsed(ParsedVariant::Genomic(genomic))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}

fn parse_coding(index: usize, line: &str, caps: &Captures<'_>) -> VariantInput {
    let format = VariantFormat::HgvsCoding;
    let accession = &caps["acc"];
    let upper = accession.to_ascii_uppercase();
    if !(upper.starts_with("NM_") || upper.starts_with("XM_")) {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Unsupported coding accession '{}'; expected an NM_ or XM_ transcript",
                accession
            ),
        );
    }
    let desc = caps["desc"].trim();
    if NON_CDS_POSITION.is_match(desc) {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Intronic and UTR positions are not supported ('c.{}'); only coding sequence positions can be mapped",
                desc
            ),
        );
    }
    let Some(d) = CODING_DESC.captures(desc) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Unsupported HGVS coding change 'c.{}'; only substitutions such as c.123A>G are supported",
                desc
            ),
        );
    };

    let result = (|| -> Result<CodingInput, String> {
        let reference = parse_base(&d["ref"], "reference base")?;
        let stated_protein = match d.name("ppos") {
            Some(ppos) => {
                let ref_aa = parse_amino_acid(&d["pref"])?;
                let alt_aa = match &d["palt"] {
                    "=" => ref_aa,
                    other => parse_amino_acid(other)?,
                };
                Some(StatedProtein {
                    reference: ref_aa,
                    position: parse_position(ppos.as_str())?,
                    alternate: alt_aa,
                })
            }
            None => None,
        };
        Ok(CodingInput {
            refseq: upper.clone(),
            gene: caps.name("gene").map(|g| g.as_str().to_string()).filter(|g| !g.is_empty()),
            position: parse_position(&d["pos"])?,
            reference,
            alternate: parse_base(&d["alt"], "alternate base")?,
            stated_protein,
            protein: None,
        })
    })();

    match result {
        Ok(coding) => {
            let mut input = VariantInput::new(index, line, format);
            if coding.reference == coding.alternate {
                input.add_warning("Alternate base is identical to the reference base");
            }
            input.with_parsed(ParsedVariant::Coding(coding))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}

fn parse_protein(index: usize, line: &str, caps: &Captures<'_>) -> VariantInput {
    let format = VariantFormat::HgvsProtein;
    let accession = &caps["acc"];
    let upper = accession.to_ascii_uppercase();
    let is_refseq = upper.starts_with("NP_") || upper.starts_with("XP_");
    if !is_refseq && !UNIPROT.is_match(accession) {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Unsupported protein accession '{}'; expected NP_, XP_ or a UniProt accession",
                accession
            ),
        );
    }
    let desc = caps["desc"].trim();
    let Some(d) = PROTEIN_DESC.captures(desc) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Unsupported HGVS protein change 'p.{}'; only substitutions such as p.Gly71Arg are supported",
                desc
            ),
        );
    };

    let result = (|| -> Result<ProteinInput, String> {
        let reference = parse_amino_acid(&d["ref"])?;
        let alternate = match &d["alt"] {
            "=" => reference,
            other => parse_amino_acid(other)?,
        };
        let position = parse_position(&d["pos"])?;
        let protein = if is_refseq {
            let mut p = ProteinInput::new(String::new(), position, reference, alternate);
            p.refseq = Some(upper.clone());
            p
        } else {
            ProteinInput::new(upper.clone(), position, reference, alternate)
        };
        Ok(protein)
    })();

    match result {
        Ok(protein) => {
            VariantInput::new(index, line, format).with_parsed(ParsedVariant::Protein(protein))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::{AminoAcid, Base};
    use crate::format::chromosome::Chromosome;
    use crate::input::Assembly;

    #[test]
    fn test_skeleton() {
        assert!(matches("NM_017547.4:c.1289A>G"));
        assert!(matches("NM_017547.4(FOXRED1):c.1289A>G"));
        assert!(matches("NC_000002.12: g.233760498G>A"));
        assert!(!matches("1 100 A G"));
        assert!(!matches("NM_017547.4 c.1289A>G"));
    }

    #[test]
    fn test_coding() {
        let input = parse(0, "NM_017547.4:c.1289A>G");
        assert!(input.is_valid(), "{:?}", input.messages);
        assert_eq!(input.format, VariantFormat::HgvsCoding);
        let c = input.coding().unwrap();
        assert_eq!(c.refseq, "NM_017547.4");
        assert_eq!(c.position, 1289);
        assert_eq!(c.reference, Base::A);
        assert_eq!(c.alternate, Base::G);
        assert!(c.stated_protein.is_none());
    }

    #[test]
    fn test_coding_with_gene_and_protein() {
        let input = parse(0, "NM_000463.3(UGT1A1):c.211G>A (p.Gly71Arg)");
        assert!(input.is_valid(), "{:?}", input.messages);
        let c = input.coding().unwrap();
        assert_eq!(c.gene.as_deref(), Some("UGT1A1"));
        let stated = c.stated_protein.unwrap();
        assert_eq!(stated.position, 71);
        assert_eq!(stated.reference, AminoAcid::Gly);
        assert_eq!(stated.alternate, AminoAcid::Arg);

        let input = parse(0, "NM_000463.3:c.211G>A p.G71R");
        assert_eq!(input.coding().unwrap().stated_protein.unwrap().position, 71);
    }

    #[test]
    fn test_coding_intronic_rejected() {
        let input = parse(0, "NM_000463.3:c.211+5G>A");
        assert!(!input.is_valid());
        assert_eq!(input.format, VariantFormat::HgvsCoding);
        assert!(input.errors().next().unwrap().text.contains("Intronic"));

        assert!(!parse(0, "NM_000463.3:c.*30G>A").is_valid());
    }

    #[test]
    fn test_protein_three_letter() {
        let input = parse(0, "NP_000454.1:p.Gly71Arg");
        assert!(input.is_valid());
        assert_eq!(input.format, VariantFormat::HgvsProtein);
        let p = input.protein().unwrap();
        assert_eq!(p.refseq.as_deref(), Some("NP_000454.1"));
        assert!(p.needs_uniprot());
        assert_eq!(p.position, 71);
    }

    #[test]
    fn test_protein_uniprot_parenthesised() {
        let input = parse(0, "P22309:p.(G71R)");
        assert!(input.is_valid());
        let p = input.protein().unwrap();
        assert_eq!(p.accession, "P22309");
        assert!(!p.needs_uniprot());
        assert_eq!(p.alternate, AminoAcid::Arg);
    }

    #[test]
    fn test_protein_synonymous() {
        let input = parse(0, "P22309:p.Gly71=");
        let p = input.protein().unwrap();
        assert_eq!(p.reference, p.alternate);
    }

    #[test]
    fn test_genomic() {
        let input = parse(0, "NC_000002.12:g.233760498G>A");
        assert!(input.is_valid());
        assert_eq!(input.format, VariantFormat::HgvsGenomic);
        let g = input.genomic().unwrap();
        assert_eq!(g.chromosome, Chromosome::Autosome(2));
        assert_eq!(g.position, 233760498);
        assert_eq!(g.accession_assembly, Some(Assembly::GRCh38));
    }

    #[test]
    fn test_genomic_deletion_rejected() {
        let input = parse(0, "NC_000002.12:g.233760498del");
        assert!(!input.is_valid());
        assert_eq!(input.format, VariantFormat::HgvsGenomic);
    }

    #[test]
    fn test_unsupported_scheme() {
        let input = parse(0, "NM_000463.3:n.211G>A");
        assert!(!input.is_valid());
        assert!(input.errors().next().unwrap().text.contains("n. notation"));
        let input = parse(0, "NC_012920.1:m.100A>G");
        assert!(input.errors().next().unwrap().text.contains("m. notation"));
    }

    #[test]
    fn test_unsupported_prefix() {
        for line in ["NG_012345.1:g.100A>G", "LRG_1:g.100A>G", "NR_024540.1:n.100A>G"] {
            let input = parse(0, line);
            assert!(!input.is_valid());
            assert!(input.errors().next().unwrap().text.contains("accessions are not supported"));
        }
    }

    #[test]
    fn test_wrong_accession_for_scheme() {
        assert!(!parse(0, "NP_000454.1:c.211G>A").is_valid());
        assert!(!parse(0, "NM_000463.3:g.211G>A").is_valid());
        assert!(!parse(0, "NM_000463.3:p.Gly71Arg").is_valid());
    }
}
