// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Protein changes to the genomic SNVs that can cause them.
//!
//! For a change `ref -> alt` at a protein position, the codon positions at
//! which a single base change can turn a `ref` codon into an `alt` codon are
//! computed first. Only mapping rows at those codon positions are
//! considered; for each, every single-base variant of the row's codon that
//! encodes `alt` and differs from the reference exactly at the row's codon
//! position gives one genomic alternate base.
//!
//! Pairs that no single base change connects (e.g. `Trp -> Ala`) are still
//! resolved to their genomic positions, without alternate bases.

use std::collections::HashMap;

use super::{primary_uniprot, strip_version};
use crate::codon::changed_positions;
use crate::format::VariantType;
use crate::input::{GenomicVariant, ParsedVariant, ProteinInput, VariantInput};
use crate::source::{MappingRow, ProteinKey};

/// Versionless RefSeq protein accessions that still need a UniProt mapping.
pub fn collect_refseqs(inputs: &[VariantInput]) -> std::collections::BTreeSet<String> {
    inputs
        .iter()
        .filter(|i| i.is_valid())
        .filter_map(|i| i.protein())
        .filter(|p| p.needs_uniprot())
        .filter_map(|p| p.refseq.as_deref())
        .map(|r| strip_version(r).to_string())
        .collect()
}

/// Replace a RefSeq protein accession by its primary UniProt accession.
pub fn resolve_accession(
    mut input: VariantInput,
    uniprot: &HashMap<String, Vec<String>>,
) -> VariantInput {
    if !input.is_valid() {
        return input;
    }
    let Some(refseq) = input
        .protein()
        .filter(|p| p.needs_uniprot())
        .and_then(|p| p.refseq.clone())
    else {
        return input;
    };
    if let Some(accession) = primary_uniprot(&mut input, &refseq, uniprot) {
        if let Some(ParsedVariant::Protein(protein)) = input.parsed.as_mut() {
            protein.accession = accession;
        }
    }
    input
}

/// Lookup key of a valid protein input with a UniProt accession.
pub fn protein_key(input: &VariantInput) -> Option<ProteinKey> {
    if !input.is_valid() || input.variant_type() != VariantType::Protein {
        return None;
    }
    let protein = input.protein()?;
    if protein.accession.is_empty() {
        return None;
    }
    Some(ProteinKey::new(
        strip_version(&protein.accession),
        protein.position,
    ))
}

/// Genomic variants and diagnostics for one protein change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProteinMapping {
    pub variants: Vec<GenomicVariant>,
    pub warnings: Vec<String>,
    /// No single base change connects reference and alternate
    pub non_snv: bool,
    /// Rows at an affected codon position (all rows for non-SNV changes)
    pub rows_used: usize,
}

/// Derive the genomic variants of a protein change from its codon rows.
pub fn map_protein_change(protein: &ProteinInput, rows: &[MappingRow]) -> ProteinMapping {
    let positions = changed_positions(protein.reference, protein.alternate);
    let mut mapping = ProteinMapping {
        non_snv: positions.is_empty(),
        ..Default::default()
    };

    let usable = rows
        .iter()
        .filter(|r| mapping.non_snv || positions.contains(&r.codon_position));

    for row in usable {
        mapping.rows_used += 1;
        if row.ref_amino_acid != protein.reference {
            mapping.warnings.push(format!(
                "Reference amino acid mismatch at {}:{}: input states {}, reference has {}",
                row.chromosome,
                row.genomic_position,
                protein.reference,
                row.ref_amino_acid
            ));
        }

        if mapping.non_snv {
            push_unique(
                &mut mapping.variants,
                GenomicVariant::new(row.chromosome, row.genomic_position, row.ref_base, None),
            );
            continue;
        }

        for alt_codon in row.codon.single_nucleotide_variants() {
            if alt_codon.translate() != protein.alternate
                || row.codon.differing_positions(&alt_codon) != [row.codon_position]
            {
                continue;
            }
            let Some(coding_alt) = alt_codon.base_at(row.codon_position) else {
                continue;
            };
            push_unique(
                &mut mapping.variants,
                GenomicVariant::new(
                    row.chromosome,
                    row.genomic_position,
                    row.ref_base,
                    Some(row.to_genomic(coding_alt)),
                ),
            );
        }
    }
    mapping
}

fn push_unique(variants: &mut Vec<GenomicVariant>, variant: GenomicVariant) {
    if !variants.contains(&variant) {
        variants.push(variant);
    }
}

/// Resolve a protein input against the codon rows of the batch.
pub fn resolve_protein(
    mut input: VariantInput,
    rows: &HashMap<ProteinKey, Vec<MappingRow>>,
) -> VariantInput {
    let Some(key) = protein_key(&input) else {
        return input;
    };
    let Some(protein) = input.protein().cloned() else {
        return input;
    };
    let rows = rows.get(&key).map(Vec::as_slice).unwrap_or_default();
    let mapping = map_protein_change(&protein, rows);

    if mapping.non_snv {
        if let Some(ParsedVariant::Protein(p)) = input.parsed.as_mut() {
            p.non_snv = true;
        }
        input.add_info(format!(
            "{} to {} cannot result from a single nucleotide change; reporting affected positions only",
            protein.reference, protein.alternate
        ));
    }
    for warning in mapping.warnings {
        input.add_warning(warning);
    }
    for variant in mapping.variants {
        input.add_derived(variant);
    }
    if input.derived.is_empty() {
        input.add_error(format!(
            "Could not map protein input to genomic coordinates ({} position {})",
            key.accession, key.position
        ));
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::{AminoAcid, Base, Codon};
    use crate::format::chromosome::Chromosome;
    use crate::format::{hgvs, protein as protein_format};
    use crate::source::{InMemorySource, MappingSource};

    fn ugt1a1_rows() -> HashMap<ProteinKey, Vec<MappingRow>> {
        InMemorySource::with_test_data()
            .genomic_protein_rows(&[ProteinKey::new("P22309", 71)])
            .unwrap()
    }

    fn chr2(position: u64, reference: Base, alternate: Option<Base>) -> GenomicVariant {
        GenomicVariant {
            chromosome: Chromosome::Autosome(2),
            position,
            reference: Some(reference),
            alternate,
        }
    }

    #[test]
    fn test_gly_to_arg() {
        let input = resolve_protein(protein_format::parse(0, "P22309 71 Gly Arg"), &ugt1a1_rows());
        assert!(input.is_valid(), "{:?}", input.messages);
        // GGA -> AGA and GGA -> CGA, both at the first codon base
        assert_eq!(
            input.derived,
            vec![
                chr2(233_760_498, Base::G, Some(Base::A)),
                chr2(233_760_498, Base::G, Some(Base::C)),
            ]
        );
        assert!(!input.protein().unwrap().non_snv);
    }

    #[test]
    fn test_synonymous() {
        // GGA -> GGC/GGG/GGT all stay Gly
        let input = resolve_protein(protein_format::parse(0, "P22309 G71G"), &ugt1a1_rows());
        assert!(input.is_valid());
        assert_eq!(input.derived.len(), 3);
        assert!(input.derived.iter().all(|v| v.position == 233_760_500));
    }

    #[test]
    fn test_stop_gained() {
        // GGA -> TGA at the first base
        let input = resolve_protein(protein_format::parse(0, "P22309 G71*"), &ugt1a1_rows());
        assert_eq!(input.derived, vec![chr2(233_760_498, Base::G, Some(Base::T))]);
    }

    #[test]
    fn test_non_snv_reports_positions() {
        // Gly -> Phe needs two base changes
        let input = resolve_protein(protein_format::parse(0, "P22309 71 Gly Phe"), &ugt1a1_rows());
        assert!(input.is_valid());
        assert!(input.protein().unwrap().non_snv);
        assert_eq!(input.derived.len(), 3);
        assert!(input.derived.iter().all(|v| v.alternate.is_none()));
        assert_eq!(input.messages[0].severity, crate::input::Severity::Info);
    }

    #[test]
    fn test_reference_mismatch_warns_per_row() {
        // Trp -> Arg is reachable only at the first base, so one row is used
        let input = resolve_protein(protein_format::parse(0, "P22309 71 Trp Arg"), &ugt1a1_rows());
        assert_eq!(input.warnings().count(), 1);
        assert!(input.is_valid());
        assert_eq!(input.derived.len(), 2);
    }

    #[test]
    fn test_no_rows() {
        let input = resolve_protein(protein_format::parse(0, "P22309 72 Gly Arg"), &ugt1a1_rows());
        assert!(!input.is_valid());
        assert!(input
            .errors()
            .next()
            .unwrap()
            .text
            .contains("Could not map protein input to genomic coordinates"));
    }

    #[test]
    fn test_reverse_strand_complemented() {
        let mut source = InMemorySource::new();
        // GGA (Gly) on the minus strand
        source.add_codon(
            "P00001",
            10,
            Chromosome::Autosome(1),
            500,
            Codon::new(Base::G, Base::G, Base::A),
            true,
            true,
        );
        let rows = source
            .genomic_protein_rows(&[ProteinKey::new("P00001", 10)])
            .unwrap();
        let input = resolve_protein(protein_format::parse(0, "P00001 G10*"), &rows);
        // Coding G -> T at codon base 1, which sits at 502 as C -> A
        assert_eq!(
            input.derived,
            vec![GenomicVariant::new(
                Chromosome::Autosome(1),
                502,
                Base::C,
                Some(Base::A)
            )]
        );
    }

    #[test]
    fn test_overlapping_isoforms_deduplicated() {
        let mut source = InMemorySource::new();
        for canonical in [true, false] {
            source.add_codon(
                "P00001",
                10,
                Chromosome::Autosome(1),
                500,
                Codon::new(Base::G, Base::G, Base::A),
                false,
                canonical,
            );
        }
        let rows = source
            .genomic_protein_rows(&[ProteinKey::new("P00001", 10)])
            .unwrap();
        let input = resolve_protein(protein_format::parse(0, "P00001 G10R"), &rows);
        assert_eq!(input.derived.len(), 2);
    }

    #[test]
    fn test_refseq_accession_resolved() {
        let input = hgvs::parse(0, "NP_000454.1:p.Gly71Arg");
        assert_eq!(protein_key(&input), None);
        assert_eq!(
            collect_refseqs(std::slice::from_ref(&input))
                .into_iter()
                .collect::<Vec<_>>(),
            vec!["NP_000454".to_string()]
        );

        let map = HashMap::from([("NP_000454".to_string(), vec!["P22309".to_string()])]);
        let input = resolve_accession(input, &map);
        assert_eq!(input.protein().unwrap().accession, "P22309");
        assert_eq!(protein_key(&input), Some(ProteinKey::new("P22309", 71)));

        let input = resolve_protein(input, &ugt1a1_rows());
        assert_eq!(input.derived.len(), 2);
        assert_eq!(input.protein().unwrap().reference, AminoAcid::Gly);
    }

    #[test]
    fn test_unmapped_refseq() {
        let input = resolve_accession(hgvs::parse(0, "NP_999999.1:p.G71R"), &HashMap::new());
        assert!(!input.is_valid());
        assert_eq!(protein_key(&input), None);
    }
}
