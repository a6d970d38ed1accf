// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Chromosome names.
//!
//! Handles the naming conventions users mix freely:
//! - Ensembl: 1, 2, ..., X, Y, MT
//! - UCSC: chr1, chr2, ..., chrX, chrY, chrM
//! - RefSeq: NC_000001.10 (GRCh37), NC_000001.11 (GRCh38)
//!
//! Every accepted spelling collapses to one [`Chromosome`] value, whose
//! display form is the Ensembl name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VarmapError;
use crate::input::Assembly;

/// Spellings of the mitochondrial chromosome (after `chr` is stripped).
const MITO_ALIASES: &[&str] = &[
    "m",
    "mt",
    "mit",
    "mtdna",
    "mitochondria",
    "mitochondrion",
];

/// RefSeq accession number of the mitochondrial genome (same in both builds).
const MITO_REFSEQ: &str = "NC_012920";

/// A human chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Chromosome {
    /// Autosome 1..=22
    Autosome(u8),
    X,
    Y,
    /// Mitochondrial genome
    Mt,
}

impl Chromosome {
    /// Number used by RefSeq `NC_` accessions (X = 23, Y = 24).
    fn refseq_number(&self) -> Option<u8> {
        match self {
            Chromosome::Autosome(n) => Some(*n),
            Chromosome::X => Some(23),
            Chromosome::Y => Some(24),
            Chromosome::Mt => None,
        }
    }

    /// RefSeq `NC_` accession of this chromosome in the given assembly.
    pub fn refseq_accession(&self, assembly: Assembly) -> String {
        match self.refseq_number() {
            Some(n) => format!("NC_{:06}.{}", n, refseq_version(n, assembly)),
            None => format!("{}.1", MITO_REFSEQ),
        }
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chromosome::Autosome(n) => write!(f, "{}", n),
            Chromosome::X => write!(f, "X"),
            Chromosome::Y => write!(f, "Y"),
            Chromosome::Mt => write!(f, "MT"),
        }
    }
}

impl std::str::FromStr for Chromosome {
    type Err = VarmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_chr(s).ok_or_else(|| VarmapError::InvalidChromosome {
            found: s.to_string(),
        })
    }
}

impl Serialize for Chromosome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Chromosome {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalise a user-supplied chromosome token.
///
/// Case-insensitive; strips a `chr` prefix and leading zeros and collapses
/// the mitochondrial aliases. Returns `None` for anything else, including
/// numeric `23`/`24`, which are only meaningful inside RefSeq accessions.
pub fn normalize_chr(token: &str) -> Option<Chromosome> {
    let lower = token.trim().to_ascii_lowercase();
    let name = lower.strip_prefix("chr").unwrap_or(&lower);
    match name {
        "x" => return Some(Chromosome::X),
        "y" => return Some(Chromosome::Y),
        _ => {}
    }
    if MITO_ALIASES.contains(&name) {
        return Some(Chromosome::Mt);
    }
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = name.trim_start_matches('0');
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    match digits.parse::<u8>() {
        Ok(n @ 1..=22) => Some(Chromosome::Autosome(n)),
        _ => None,
    }
}

/// Resolve a RefSeq `NC_` accession to a chromosome and, when the version
/// identifies one, the assembly it belongs to.
///
/// Returns `None` for accessions that are not primary-assembly chromosomes.
pub fn from_refseq(accession: &str) -> Option<(Chromosome, Option<Assembly>)> {
    let (name, version) = match accession.split_once('.') {
        Some((name, version)) => (name, version.parse::<u32>().ok()),
        None => (accession, None),
    };
    let name = name.to_ascii_uppercase();
    if name == MITO_REFSEQ {
        return Some((Chromosome::Mt, None));
    }
    let number: u8 = name.strip_prefix("NC_")?.parse().ok()?;
    let chromosome = match number {
        1..=22 => Chromosome::Autosome(number),
        23 => Chromosome::X,
        24 => Chromosome::Y,
        _ => return None,
    };
    let assembly = version.and_then(|v| {
        [Assembly::GRCh37, Assembly::GRCh38]
            .into_iter()
            .find(|a| refseq_version(number, *a) == v)
    });
    Some((chromosome, assembly))
}

/// RefSeq `NC_` accession version of chromosome `n` (X = 23, Y = 24).
fn refseq_version(n: u8, assembly: Assembly) -> u32 {
    match assembly {
        Assembly::GRCh37 => match n {
            1 => 10,
            2 => 11,
            3 => 11,
            4 => 11,
            5 => 9,
            6 => 11,
            7 => 13,
            8 => 10,
            9 => 11,
            10 => 10,
            11 => 9,
            12 => 11,
            13 => 10,
            14 => 8,
            15 => 9,
            16 => 9,
            17 => 10,
            18 => 9,
            19 => 9,
            20 => 10,
            21 => 8,
            22 => 10,
            23 => 10,
            24 => 9,
            _ => 1,
        },
        Assembly::GRCh38 => match n {
            1 => 11,
            2 => 12,
            3 => 12,
            4 => 12,
            5 => 10,
            6 => 12,
            7 => 14,
            8 => 11,
            9 => 12,
            10 => 11,
            11 => 10,
            12 => 12,
            13 => 11,
            14 => 9,
            15 => 10,
            16 => 10,
            17 => 11,
            18 => 10,
            19 => 10,
            20 => 11,
            21 => 9,
            22 => 11,
            23 => 11,
            24 => 10,
            _ => 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric() {
        assert_eq!(normalize_chr("1"), Some(Chromosome::Autosome(1)));
        assert_eq!(normalize_chr("01"), Some(Chromosome::Autosome(1)));
        assert_eq!(normalize_chr("chr22"), Some(Chromosome::Autosome(22)));
        assert_eq!(normalize_chr("CHR7"), Some(Chromosome::Autosome(7)));
        assert_eq!(normalize_chr("0"), None);
        assert_eq!(normalize_chr("23"), None);
        assert_eq!(normalize_chr("100"), None);
        assert_eq!(normalize_chr("chr"), None);
        assert_eq!(normalize_chr("1a"), None);
    }

    #[test]
    fn test_sex_chromosomes() {
        assert_eq!(normalize_chr("x"), Some(Chromosome::X));
        assert_eq!(normalize_chr("chrY"), Some(Chromosome::Y));
    }

    #[test]
    fn test_mitochondrial_aliases() {
        for alias in ["M", "MT", "chrM", "chrMT", "mit", "mtDNA", "mitochondria", "Mitochondrion"] {
            assert_eq!(normalize_chr(alias), Some(Chromosome::Mt), "{}", alias);
        }
        assert_eq!(Chromosome::Mt.to_string(), "MT");
    }

    #[test]
    fn test_idempotent() {
        for token in ["chr01", "X", "chrM", "mitochondrion", "22"] {
            let once = normalize_chr(token).unwrap();
            assert_eq!(normalize_chr(&once.to_string()), Some(once));
        }
    }

    #[test]
    fn test_from_refseq() {
        assert_eq!(
            from_refseq("NC_000002.12"),
            Some((Chromosome::Autosome(2), Some(Assembly::GRCh38)))
        );
        assert_eq!(
            from_refseq("NC_000002.11"),
            Some((Chromosome::Autosome(2), Some(Assembly::GRCh37)))
        );
        assert_eq!(
            from_refseq("NC_000023.11"),
            Some((Chromosome::X, Some(Assembly::GRCh38)))
        );
        assert_eq!(from_refseq("NC_000024"), Some((Chromosome::Y, None)));
        assert_eq!(from_refseq("NC_012920.1"), Some((Chromosome::Mt, None)));
        assert_eq!(from_refseq("NC_000025.1"), None);
        assert_eq!(from_refseq("NT_187361.1"), None);
    }

    #[test]
    fn test_refseq_accession() {
        assert_eq!(
            Chromosome::Autosome(7).refseq_accession(Assembly::GRCh38),
            "NC_000007.14"
        );
        assert_eq!(Chromosome::X.refseq_accession(Assembly::GRCh37), "NC_000023.10");
        assert_eq!(Chromosome::Mt.refseq_accession(Assembly::GRCh37), "NC_012920.1");
    }
}
