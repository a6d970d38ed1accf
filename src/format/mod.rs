// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Grammars for the supported input notations.
//!
//! Every notation has two levels of matching:
//! - a cheap *structural* check (`matches`) that decides whether a line is
//!   shaped like the notation at all, and
//! - a *content* parse (`parse`) that validates each field and builds a
//!   [`VariantInput`](crate::input::VariantInput).
//!
//! A line that passes the structural check but fails the content parse is
//! reported as an invalid input of that notation rather than being handed
//! to the next grammar.
//!
//! | Notation          | Example                        |
//! |-------------------|--------------------------------|
//! | internal genomic  | `chr2 233760498 G A`           |
//! | VCF               | `2 233760498 . G A`            |
//! | gnomAD            | `2-233760498-G-A`              |
//! | HGVS genomic      | `NC_000002.12:g.233760498G>A`  |
//! | HGVS coding       | `NM_000463.3:c.211G>A`         |
//! | HGVS protein      | `NP_000454.1:p.Gly71Arg`       |
//! | internal protein  | `P22309 71 Gly Arg`            |
//! | dbSNP             | `rs4148323`                    |
//! | ClinVar           | `RCV000008567`                 |
//! | COSMIC            | `COSV58387263`                 |

pub mod chromosome;
pub mod genomic;
pub mod gnomad;
pub mod hgvs;
pub mod ids;
pub mod protein;
pub mod vcf;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codon::{AminoAcid, Base};

/// Broad class of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    Genomic,
    Coding,
    Protein,
    VariantId,
    Invalid,
}

/// Notation an input was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantFormat {
    InternalGenomic,
    Vcf,
    Gnomad,
    HgvsGenomic,
    HgvsCoding,
    HgvsProtein,
    InternalProtein,
    Dbsnp,
    Clinvar,
    Cosmic,
    Invalid,
}

impl VariantFormat {
    pub const ALL: [VariantFormat; 11] = [
        Self::InternalGenomic,
        Self::Vcf,
        Self::Gnomad,
        Self::HgvsGenomic,
        Self::HgvsCoding,
        Self::HgvsProtein,
        Self::InternalProtein,
        Self::Dbsnp,
        Self::Clinvar,
        Self::Cosmic,
        Self::Invalid,
    ];

    pub const fn variant_type(&self) -> VariantType {
        match self {
            Self::InternalGenomic | Self::Vcf | Self::Gnomad | Self::HgvsGenomic => {
                VariantType::Genomic
            }
            Self::HgvsCoding => VariantType::Coding,
            Self::HgvsProtein | Self::InternalProtein => VariantType::Protein,
            Self::Dbsnp | Self::Clinvar | Self::Cosmic => VariantType::VariantId,
            Self::Invalid => VariantType::Invalid,
        }
    }

    /// Human-readable name used in diagnostics.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InternalGenomic => "genomic",
            Self::Vcf => "VCF",
            Self::Gnomad => "gnomAD",
            Self::HgvsGenomic => "HGVS genomic",
            Self::HgvsCoding => "HGVS coding",
            Self::HgvsProtein => "HGVS protein",
            Self::InternalProtein => "protein",
            Self::Dbsnp => "dbSNP",
            Self::Clinvar => "ClinVar",
            Self::Cosmic => "COSMIC",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for VariantFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Regex fragment for a residue token: a three-letter code or a single
/// letter/`*`. Validation happens in [`parse_amino_acid`].
pub(crate) const AA_TOKEN: &str = r"[A-Za-z]{3}|[A-Za-z*]";

/// Regex fragment for a UniProt accession, with optional isoform suffix.
pub(crate) const UNIPROT_TOKEN: &str =
    r"(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})(?:-\d+)?";

/// Parse a residue token, accepting one-letter codes in either case.
pub(crate) fn parse_amino_acid(token: &str) -> Result<AminoAcid, String> {
    let parsed = if token.len() == 1 {
        token
            .chars()
            .next()
            .and_then(|c| AminoAcid::from_one_letter(c.to_ascii_uppercase()))
    } else {
        AminoAcid::from_three_letter(token)
    };
    parsed.ok_or_else(|| format!("Invalid amino acid '{}'", token))
}

/// Parse a single-base token.
pub(crate) fn parse_base(token: &str, what: &str) -> Result<Base, String> {
    if token.chars().count() > 1 {
        return Err(format!(
            "Only single nucleotide variants are supported; {} '{}' has {} bases",
            what,
            token,
            token.chars().count()
        ));
    }
    token
        .parse::<Base>()
        .map_err(|_| format!("Invalid {} '{}'; expected one of A, C, G, T", what, token))
}

/// Parse a 1-based position.
pub(crate) fn parse_position(token: &str) -> Result<u64, String> {
    match token.parse::<u64>() {
        Ok(0) => Err("Position must be greater than zero".to_string()),
        Ok(pos) => Ok(pos),
        Err(_) => Err(format!("Invalid position '{}'", token)),
    }
}

/// Parse a chromosome token.
pub(crate) fn parse_chromosome(token: &str) -> Result<chromosome::Chromosome, String> {
    chromosome::normalize_chr(token).ok_or_else(|| {
        format!(
            "Invalid chromosome '{}'; expected 1-22, X, Y or MT",
            token
        )
    })
}
