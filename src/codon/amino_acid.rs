// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Amino acid enumeration and name equivalence.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::table::Codon;
use crate::error::VarmapError;

/// Amino acid enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala, // A
    Arg, // R
    Asn, // N
    Asp, // D
    Cys, // C
    Gln, // Q
    Glu, // E
    Gly, // G
    His, // H
    Ile, // I
    Leu, // L
    Lys, // K
    Met, // M
    Phe, // F
    Pro, // P
    Ser, // S
    Thr, // T
    Trp, // W
    Tyr, // Y
    Val, // V
    Pyl, // O (pyrrolysine)
    Sec, // U (selenocysteine)
    Asx, // B (Asn or Asp)
    Glx, // Z (Gln or Glu)
    Xle, // J (Leu or Ile)
    Ter, // * (stop codon)
    Xaa, // X (unknown)
}

impl AminoAcid {
    /// Every residue, standard ones first.
    pub const ALL: [AminoAcid; 27] = [
        Self::Ala,
        Self::Arg,
        Self::Asn,
        Self::Asp,
        Self::Cys,
        Self::Gln,
        Self::Glu,
        Self::Gly,
        Self::His,
        Self::Ile,
        Self::Leu,
        Self::Lys,
        Self::Met,
        Self::Phe,
        Self::Pro,
        Self::Ser,
        Self::Thr,
        Self::Trp,
        Self::Tyr,
        Self::Val,
        Self::Pyl,
        Self::Sec,
        Self::Asx,
        Self::Glx,
        Self::Xle,
        Self::Ter,
        Self::Xaa,
    ];

    /// Parse from 3-letter code (case-insensitive, `Stop` accepted for `Ter`)
    pub fn from_three_letter(s: &str) -> Option<Self> {
        let lower = s.to_ascii_lowercase();
        let aa = match lower.as_str() {
            "ala" => Self::Ala,
            "arg" => Self::Arg,
            "asn" => Self::Asn,
            "asp" => Self::Asp,
            "cys" => Self::Cys,
            "gln" => Self::Gln,
            "glu" => Self::Glu,
            "gly" => Self::Gly,
            "his" => Self::His,
            "ile" => Self::Ile,
            "leu" => Self::Leu,
            "lys" => Self::Lys,
            "met" => Self::Met,
            "phe" => Self::Phe,
            "pro" => Self::Pro,
            "ser" => Self::Ser,
            "thr" => Self::Thr,
            "trp" => Self::Trp,
            "tyr" => Self::Tyr,
            "val" => Self::Val,
            "pyl" => Self::Pyl,
            "sec" => Self::Sec,
            "asx" => Self::Asx,
            "glx" => Self::Glx,
            "xle" => Self::Xle,
            "ter" | "stop" => Self::Ter,
            "xaa" => Self::Xaa,
            _ => return None,
        };
        Some(aa)
    }

    /// Get 3-letter code
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Pyl => "Pyl",
            Self::Sec => "Sec",
            Self::Asx => "Asx",
            Self::Glx => "Glx",
            Self::Xle => "Xle",
            Self::Ter => "Ter",
            Self::Xaa => "Xaa",
        }
    }

    /// Get 1-letter code
    pub fn to_one_letter(&self) -> char {
        match self {
            Self::Ala => 'A',
            Self::Arg => 'R',
            Self::Asn => 'N',
            Self::Asp => 'D',
            Self::Cys => 'C',
            Self::Gln => 'Q',
            Self::Glu => 'E',
            Self::Gly => 'G',
            Self::His => 'H',
            Self::Ile => 'I',
            Self::Leu => 'L',
            Self::Lys => 'K',
            Self::Met => 'M',
            Self::Phe => 'F',
            Self::Pro => 'P',
            Self::Ser => 'S',
            Self::Thr => 'T',
            Self::Trp => 'W',
            Self::Tyr => 'Y',
            Self::Val => 'V',
            Self::Pyl => 'O',
            Self::Sec => 'U',
            Self::Asx => 'B',
            Self::Glx => 'Z',
            Self::Xle => 'J',
            Self::Ter => '*',
            Self::Xaa => 'X',
        }
    }

    /// Parse from 1-letter code (uppercase only)
    ///
    /// Lowercase letters are rejected so that a one-letter code can never be
    /// confused with the start of a three-letter one.
    pub fn from_one_letter(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|aa| aa.to_one_letter() == c)
    }

    /// Parse a user-supplied residue token: three-letter code in any case,
    /// upper-case one-letter code, or `*`.
    pub fn parse_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_one_letter(c),
            _ => Self::from_three_letter(token),
        }
    }

    /// True for the stop symbol.
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Ter)
    }

    /// Codons encoding this residue under the standard genetic code.
    ///
    /// Empty for residues no standard codon encodes (selenocysteine,
    /// pyrrolysine, ambiguity codes and `Xaa`).
    pub fn codons(&self) -> Vec<Codon> {
        Codon::all().filter(|c| c.translate() == *self).collect()
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

impl std::str::FromStr for AminoAcid {
    type Err = VarmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s).ok_or_else(|| VarmapError::InvalidAminoAcid {
            found: s.to_string(),
        })
    }
}
