// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Bases, codons and the standard genetic code.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::amino_acid::AminoAcid;
use crate::error::VarmapError;

/// A single nucleotide base.
///
/// RNA `U` is read as [`Base::T`], so a codon taken from an mRNA-oriented
/// mapping table yields DNA bases directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// All four bases in index order.
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Parse a base from a character (case-insensitive, `U` is treated as `T`).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' | 'U' => Some(Base::T),
            _ => None,
        }
    }

    /// Convert to a DNA character.
    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Convert to an RNA character (`T` becomes `U`).
    pub fn to_rna_char(self) -> char {
        match self {
            Base::T => 'U',
            other => other.to_char(),
        }
    }

    /// Watson-Crick complement.
    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::T => Base::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Base::A => 0,
            Base::C => 1,
            Base::G => 2,
            Base::T => 3,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::str::FromStr for Base {
    type Err = VarmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Base::from_char(c),
            _ => None,
        }
        .ok_or_else(|| VarmapError::InvalidBase {
            found: s.to_string(),
        })
    }
}

/// Complement a base.
pub fn complement(base: Base) -> Base {
    base.complement()
}

/// Reverse complement a sequence of bases.
pub fn reverse_complement(seq: &[Base]) -> Vec<Base> {
    seq.iter().rev().map(|b| b.complement()).collect()
}

/// One-letter amino acid codes of the standard genetic code, indexed by
/// `16 * first + 4 * second + third` with bases ordered A, C, G, T.
const STANDARD_CODE: &[u8; 64] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

/// A codon (three nucleotides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    /// Create a new codon from three bases.
    pub fn new(b1: Base, b2: Base, b3: Base) -> Self {
        Self([b1, b2, b3])
    }

    /// Parse a codon from a string.
    ///
    /// Case is ignored so that mapping tables which mark the variant base
    /// in upper case (e.g. `gGa`) parse like any other codon.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let b1 = Base::from_char(chars.next()?)?;
        let b2 = Base::from_char(chars.next()?)?;
        let b3 = Base::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self([b1, b2, b3]))
    }

    /// Get the three bases.
    pub fn bases(&self) -> &[Base; 3] {
        &self.0
    }

    /// Base at a 1-based codon position.
    pub fn base_at(&self, position: u8) -> Option<Base> {
        match position {
            1..=3 => Some(self.0[usize::from(position) - 1]),
            _ => None,
        }
    }

    /// Copy of this codon with the base at a 1-based position replaced.
    pub fn with_base(&self, position: u8, base: Base) -> Option<Self> {
        if !(1..=3).contains(&position) {
            return None;
        }
        let mut bases = self.0;
        bases[usize::from(position) - 1] = base;
        Some(Self(bases))
    }

    /// The amino acid this codon encodes under the standard genetic code.
    pub fn translate(&self) -> AminoAcid {
        let [b1, b2, b3] = self.0;
        let idx = 16 * b1.index() + 4 * b2.index() + b3.index();
        AminoAcid::from_one_letter(char::from(STANDARD_CODE[idx]))
            .unwrap_or(AminoAcid::Xaa)
    }

    /// The 9 codons reachable by changing exactly one base.
    pub fn single_nucleotide_variants(&self) -> Vec<Codon> {
        let mut out = Vec::with_capacity(9);
        for (i, current) in self.0.iter().enumerate() {
            for base in Base::ALL {
                if base != *current {
                    let mut bases = self.0;
                    bases[i] = base;
                    out.push(Codon(bases));
                }
            }
        }
        out
    }

    /// 1-based positions at which two codons differ.
    pub fn differing_positions(&self, other: &Codon) -> Vec<u8> {
        (0u8..3)
            .filter(|&i| self.0[usize::from(i)] != other.0[usize::from(i)])
            .map(|i| i + 1)
            .collect()
    }

    /// All 64 codons.
    pub fn all() -> impl Iterator<Item = Codon> {
        Base::ALL.into_iter().flat_map(|b1| {
            Base::ALL.into_iter().flat_map(move |b2| {
                Base::ALL.into_iter().map(move |b3| Codon([b1, b2, b3]))
            })
        })
    }

    /// RNA representation (e.g. `UGG`).
    pub fn to_rna_string(&self) -> String {
        self.0.iter().map(|b| b.to_rna_char()).collect()
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

impl std::str::FromStr for Codon {
    type Err = VarmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codon::parse(s).ok_or_else(|| VarmapError::InvalidCodon {
            found: s.to_string(),
        })
    }
}

impl Serialize for Codon {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Codon {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_from_char() {
        assert_eq!(Base::from_char('A'), Some(Base::A));
        assert_eq!(Base::from_char('t'), Some(Base::T));
        assert_eq!(Base::from_char('U'), Some(Base::T)); // RNA
        assert_eq!(Base::from_char('g'), Some(Base::G));
        assert_eq!(Base::from_char('N'), None);
    }

    #[test]
    fn test_base_from_str() {
        assert_eq!("c".parse::<Base>().unwrap(), Base::C);
        assert!("AC".parse::<Base>().is_err());
        assert!("".parse::<Base>().is_err());
    }

    #[test]
    fn test_complement() {
        for base in Base::ALL {
            assert_eq!(complement(complement(base)), base);
        }
        assert_eq!(complement(Base::A), Base::T);
        assert_eq!(complement(Base::G), Base::C);
    }

    #[test]
    fn test_reverse_complement() {
        let seq = [Base::A, Base::C, Base::G, Base::G];
        assert_eq!(
            reverse_complement(&seq),
            vec![Base::C, Base::C, Base::G, Base::T]
        );
    }

    #[test]
    fn test_codon_parse() {
        let codon = Codon::parse("AUG").unwrap();
        assert_eq!(codon.bases(), &[Base::A, Base::T, Base::G]);
        assert_eq!(codon.to_string(), "ATG");
        assert_eq!(codon.to_rna_string(), "AUG");
        assert_eq!(Codon::parse("gGa"), Codon::parse("GGA"));

        assert!(Codon::parse("AT").is_none());
        assert!(Codon::parse("ATGC").is_none());
        assert!(Codon::parse("ATN").is_none());
    }

    #[test]
    fn test_translate_known_codons() {
        assert_eq!(Codon::parse("ATG").unwrap().translate(), AminoAcid::Met);
        assert_eq!(Codon::parse("TGG").unwrap().translate(), AminoAcid::Trp);
        assert_eq!(Codon::parse("GGA").unwrap().translate(), AminoAcid::Gly);
        assert_eq!(Codon::parse("AGA").unwrap().translate(), AminoAcid::Arg);
        assert_eq!(Codon::parse("TAA").unwrap().translate(), AminoAcid::Ter);
        assert_eq!(Codon::parse("TGA").unwrap().translate(), AminoAcid::Ter);
    }

    #[test]
    fn test_all_codons() {
        let all: Vec<Codon> = Codon::all().collect();
        assert_eq!(all.len(), 64);
        let stops = all.iter().filter(|c| c.translate() == AminoAcid::Ter).count();
        assert_eq!(stops, 3);
        assert!(all.iter().all(|c| c.translate() != AminoAcid::Xaa));
    }

    #[test]
    fn test_single_nucleotide_variants() {
        let codon = Codon::parse("GGA").unwrap();
        let snvs = codon.single_nucleotide_variants();
        assert_eq!(snvs.len(), 9);
        assert!(!snvs.contains(&codon));
        for snv in &snvs {
            assert_eq!(codon.differing_positions(snv).len(), 1);
        }
    }

    #[test]
    fn test_with_base() {
        let codon = Codon::parse("GGA").unwrap();
        assert_eq!(
            codon.with_base(2, Base::A).unwrap().to_string(),
            "GAA"
        );
        assert!(codon.with_base(0, Base::A).is_none());
        assert!(codon.with_base(4, Base::A).is_none());
        assert_eq!(codon.base_at(3), Some(Base::A));
        assert_eq!(codon.base_at(4), None);
    }
}
