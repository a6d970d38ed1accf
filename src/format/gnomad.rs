// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! gnomAD variant identifiers: `chromosome-position-reference-alternate`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_base, parse_chromosome, parse_position, VariantFormat};
use crate::input::{GenomicInput, ParsedVariant, VariantInput};

static STRUCTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s-]+-[^\s-]+-[^\s-]+-[^\s-]+$").unwrap());

static CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<chr>[^\s-]+)-(?P<pos>\d+)-(?P<ref>[A-Za-z]+)-(?P<alt>[A-Za-z]+)$").unwrap()
});

/// Structural check.
pub fn matches(line: &str) -> bool {
    STRUCTURE.is_match(line)
}

/// Full parse.
pub fn parse(index: usize, line: &str) -> VariantInput {
    let format = VariantFormat::Gnomad;
    let Some(caps) = CONTENT.captures(line) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Invalid gnomAD input '{}'; expected chromosome-position-reference-alternate",
                line
            ),
        );
    };

    let result = (|| -> Result<GenomicInput, String> {
        let mut genomic =
            GenomicInput::new(parse_chromosome(&caps["chr"])?, parse_position(&caps["pos"])?);
        genomic.reference = Some(parse_base(&caps["ref"], "reference base")?);
        genomic.alternates = vec![parse_base(&caps["alt"], "alternate base")?];
        Ok(genomic)
    })();

    match result {
        Ok(genomic) => {
            VariantInput::new(index, line, format).with_parsed(ParsedVariant::Genomic(genomic))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::Base;
    use crate::format::chromosome::Chromosome;

    #[test]
    fn test_structure() {
        assert!(matches("x-149498202-c-g"));
        assert!(matches("1-2-3-4"));
        assert!(!matches("1-2-3"));
        assert!(!matches("1 2 3 4"));
    }

    #[test]
    fn test_lowercase_input() {
        let input = parse(0, "x-149498202-c-g");
        assert!(input.is_valid());
        assert_eq!(input.format, VariantFormat::Gnomad);
        let g = input.genomic().unwrap();
        assert_eq!(g.chromosome, Chromosome::X);
        assert_eq!(g.position, 149498202);
        assert_eq!(g.reference, Some(Base::C));
        assert_eq!(g.alternates, vec![Base::G]);
    }

    #[test]
    fn test_multi_base_rejected() {
        let input = parse(0, "1-100-AT-G");
        assert!(!input.is_valid());
        assert!(input.errors().next().unwrap().text.contains("single nucleotide"));
    }

    #[test]
    fn test_bad_position() {
        let input = parse(0, "1-abc-A-G");
        assert!(!input.is_valid());
        assert_eq!(input.format, VariantFormat::Gnomad);
    }
}
