// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Variant identifiers from dbSNP (`rs123`), ClinVar (`RCV…`/`VCV…`) and
//! COSMIC (`COSV…`/`COSM…`/`COSN…`).
//!
//! Identifiers are normalised to the case the source databases use, and
//! ClinVar version suffixes are dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::VariantFormat;
use crate::input::{IdInput, IdSource, ParsedVariant, VariantInput};

static DBSNP_STRUCTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^rs\d").unwrap());
static DBSNP_CONTENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^rs(?P<num>\d+)$").unwrap());

static CLINVAR_STRUCTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:RCV|VCV)").unwrap());
static CLINVAR_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<prefix>RCV|VCV)(?P<num>\d+)(?:\.\d+)?$").unwrap()
});

static COSMIC_STRUCTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^COS[VMN]").unwrap());
static COSMIC_CONTENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?P<prefix>COS[VMN])(?P<num>\d+)$").unwrap());

/// Structural check for dbSNP identifiers.
pub fn matches_dbsnp(word: &str) -> bool {
    DBSNP_STRUCTURE.is_match(word)
}

/// Structural check for ClinVar identifiers.
pub fn matches_clinvar(word: &str) -> bool {
    CLINVAR_STRUCTURE.is_match(word)
}

/// Structural check for COSMIC identifiers.
pub fn matches_cosmic(word: &str) -> bool {
    COSMIC_STRUCTURE.is_match(word)
}

/// Parse a dbSNP identifier.
pub fn parse_dbsnp(index: usize, word: &str) -> VariantInput {
    match DBSNP_CONTENT.captures(word) {
        Some(caps) => id_input(index, word, IdSource::Dbsnp, format!("rs{}", &caps["num"])),
        None => invalid(index, word, IdSource::Dbsnp, "rs followed by digits, e.g. rs4148323"),
    }
}

/// Parse a ClinVar identifier.
pub fn parse_clinvar(index: usize, word: &str) -> VariantInput {
    match CLINVAR_CONTENT.captures(word) {
        Some(caps) => {
            let id = format!("{}{}", caps["prefix"].to_ascii_uppercase(), &caps["num"]);
            id_input(index, word, IdSource::Clinvar, id)
        }
        None => invalid(
            index,
            word,
            IdSource::Clinvar,
            "RCV or VCV followed by digits, e.g. RCV000008567",
        ),
    }
}

/// Parse a COSMIC identifier.
pub fn parse_cosmic(index: usize, word: &str) -> VariantInput {
    match COSMIC_CONTENT.captures(word) {
        Some(caps) => {
            let id = format!("{}{}", caps["prefix"].to_ascii_uppercase(), &caps["num"]);
            id_input(index, word, IdSource::Cosmic, id)
        }
        None => invalid(
            index,
            word,
            IdSource::Cosmic,
            "COSV, COSM or COSN followed by digits, e.g. COSV58387263",
        ),
    }
}

fn format_for(source: IdSource) -> VariantFormat {
    match source {
        IdSource::Dbsnp => VariantFormat::Dbsnp,
        IdSource::Clinvar => VariantFormat::Clinvar,
        IdSource::Cosmic => VariantFormat::Cosmic,
    }
}

fn id_input(index: usize, word: &str, source: IdSource, id: String) -> VariantInput {
    VariantInput::new(index, word, format_for(source))
        .with_parsed(ParsedVariant::Id(IdInput { id, source }))
}

fn invalid(index: usize, word: &str, source: IdSource, expected: &str) -> VariantInput {
    VariantInput::invalid(
        index,
        word,
        format_for(source),
        format!("Invalid {} ID '{}'; expected {}", source, word, expected),
    )
}
