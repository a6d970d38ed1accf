// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Internal protein shorthand keyed by UniProt accession.
//!
//! Two layouts are accepted:
//! - `P22309 71 Gly Arg` (accession, position, reference, alternate)
//! - `P22309 G71R` / `P22309 Gly71Arg` (accession, then a compact change)

use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_amino_acid, parse_position, VariantFormat, AA_TOKEN, UNIPROT_TOKEN};
use crate::input::{ParsedVariant, ProteinInput, VariantInput};

static STRUCTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^(?:{})\s+\S", UNIPROT_TOKEN)).unwrap());

static CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<acc>{uniprot})\s+(?:(?P<pos>\d+)\s+(?P<ref>{aa})\s+(?P<alt>{aa})|(?P<cref>{aa})\s*(?P<cpos>\d+)\s*(?P<calt>{aa}))$",
        uniprot = UNIPROT_TOKEN,
        aa = AA_TOKEN
    ))
    .unwrap()
});

/// Structural check.
pub fn matches(line: &str) -> bool {
    STRUCTURE.is_match(line)
}

/// Full parse.
pub fn parse(index: usize, line: &str) -> VariantInput {
    let format = VariantFormat::InternalProtein;
    let Some(caps) = CONTENT.captures(line) else {
        return VariantInput::invalid(
            index,
            line,
            format,
            format!(
                "Invalid protein input '{}'; expected accession, position, reference and alternate amino acid",
                line
            ),
        );
    };

    let result = (|| -> Result<ProteinInput, String> {
        let accession = caps["acc"].to_ascii_uppercase();
        let (pos, reference, alternate) = match caps.name("pos") {
            Some(pos) => (pos.as_str(), &caps["ref"], &caps["alt"]),
            None => (&caps["cpos"], &caps["cref"], &caps["calt"]),
        };
        Ok(ProteinInput::new(
            accession,
            parse_position(pos)?,
            parse_amino_acid(reference)?,
            parse_amino_acid(alternate)?,
        ))
    })();

    match result {
        Ok(protein) => {
            VariantInput::new(index, line, format).with_parsed(ParsedVariant::Protein(protein))
        }
        Err(msg) => VariantInput::invalid(index, line, format, msg),
    }
}
