// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Internal genomic shorthand: `chr pos [ref [alt]]`.
//!
//! The alternate base may be separated from the reference by whitespace,
//! `/` or `>`: `X 149498202 C G`, `chrX 149498202 C/G`, `x 149498202 c>g`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_base, parse_chromosome, parse_position, VariantFormat};
use crate::input::{GenomicInput, ParsedVariant, VariantInput};

static STRUCTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+\s+\d+(?:\s.*)?$").unwrap());

static CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<chr>\S+)\s+(?P<pos>\d+)(?:\s+(?P<ref>[A-Za-z]+)(?:(?:\s*[/>]\s*|\s+)(?P<alt>[A-Za-z]+))?)?$",
    )
    .unwrap()
});

/// Structural check.
pub fn matches(line: &str) -> bool {
    STRUCTURE.is_match(line)
}

/// Full parse.
pub fn parse(index: usize, line: &str) -> VariantInput {
    let format = VariantFormat::InternalGenomic;
    let Some(caps) = CONTENT.captures(line) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Invalid genomic input '{}'; expected chromosome, position, and optionally reference and alternate base",
                line
            ),
        );
    };

    let result = (|| -> Result<GenomicInput, String> {
        let chromosome = parse_chromosome(&caps["chr"])?;
        let position = parse_position(&caps["pos"])?;
        let mut genomic = GenomicInput::new(chromosome, position);
        if let Some(r) = caps.name("ref") {
            genomic.reference = Some(parse_base(r.as_str(), "reference base")?);
        }
        if let Some(a) = caps.name("alt") {
            genomic.alternates.push(parse_base(a.as_str(), "alternate base")?);
        }
        Ok(genomic)
    })();

    match result {
        Ok(genomic) => {
            VariantInput::new(index, line, format).with_parsed(ParsedVariant::Genomic(genomic))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}
