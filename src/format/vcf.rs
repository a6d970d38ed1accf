// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! VCF data lines: `CHROM POS ID REF ALT [QUAL FILTER INFO ...]`.
//!
//! Only the first five columns are read. `ALT` may list several
//! single-base alleles separated by commas, each of which becomes its own
//! genomic variant; `.` means "any SNV".

use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_base, parse_chromosome, parse_position, VariantFormat};
use crate::input::{GenomicInput, ParsedVariant, VariantInput};

static STRUCTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+\s+\d+\s+\S+\s+[A-Za-z]+\s+\S+(?:\s.*)?$").unwrap());

/// Structural check.
pub fn matches(line: &str) -> bool {
    STRUCTURE.is_match(line)
}

/// Full parse.
pub fn parse(index: usize, line: &str) -> VariantInput {
    let format = VariantFormat::Vcf;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Invalid VCF input '{}'; expected at least CHROM, POS, ID, REF and ALT columns",
                line
            ),
        );
    }

    let result = (|| -> Result<GenomicInput, String> {
        let mut genomic = GenomicInput::new(parse_chromosome(fields[0])?, parse_position(fields[1])?);
        if fields[2] != "." {
            genomic.id = Some(fields[2].to_string());
        }
        genomic.reference = Some(parse_base(fields[3], "reference base")?);
        if fields[4] != "." {
            for allele in fields[4].split(',') {
                let base = parse_base(allele, "alternate allele")?;
                if !genomic.alternates.contains(&base) {
                    genomic.alternates.push(base);
                }
            }
        }
        Ok(genomic)
    })();

    match result {
        Ok(genomic) => {
            let mut input = VariantInput::new(index, line, format);
            if genomic.alternates.iter().any(|a| Some(*a) == genomic.reference) {
                input.add_warning("Alternate allele is identical to the reference base");
            }
            input.with_parsed(ParsedVariant::Genomic(genomic))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}
