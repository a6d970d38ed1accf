// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Codon-level biochemistry.
//!
//! This module answers two questions about single-nucleotide changes:
//! which codon positions can turn one amino acid into another, and what a
//! given base change inside a known codon does to the encoded residue.
//!
//! # Example
//!
//! ```
//! use ferro_varmap::codon::{changed_positions, AminoAcid};
//!
//! // Gly (GGN) to Arg (CGN/AGA/AGG): only the first base can do it
//! let positions = changed_positions(AminoAcid::Gly, AminoAcid::Arg);
//! assert_eq!(positions.into_iter().collect::<Vec<_>>(), vec![1]);
//! ```

pub mod amino_acid;
pub mod table;

pub use amino_acid::AminoAcid;
pub use table::{complement, reverse_complement, Base, Codon};

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Effect of an amino acid substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    /// Reference and alternate residue are the same
    Synonymous,
    /// Alternate residue is a stop
    StopGained,
    /// Any other change
    Missense,
}

impl fmt::Display for Consequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consequence::Synonymous => write!(f, "synonymous"),
            Consequence::StopGained => write!(f, "stop_gained"),
            Consequence::Missense => write!(f, "missense"),
        }
    }
}

/// Translate a codon.
pub fn translate(codon: &Codon) -> AminoAcid {
    codon.translate()
}

/// Codons reachable from `codon` by a single base change.
pub fn single_nucleotide_variants(codon: &Codon) -> Vec<Codon> {
    codon.single_nucleotide_variants()
}

/// Codon positions (1..=3) at which a single base change turns some codon
/// of `ref_aa` into a codon of `alt_aa`.
///
/// An empty set means no SNV connects the two residues.
pub fn changed_positions(ref_aa: AminoAcid, alt_aa: AminoAcid) -> BTreeSet<u8> {
    let mut positions = BTreeSet::new();
    for ref_codon in ref_aa.codons() {
        for alt_codon in ref_codon.single_nucleotide_variants() {
            if alt_codon.translate() == alt_aa {
                positions.extend(ref_codon.differing_positions(&alt_codon));
            }
        }
    }
    positions
}

/// Classify the effect of `ref_aa` becoming `alt_aa`.
pub fn consequence(ref_aa: AminoAcid, alt_aa: AminoAcid) -> Consequence {
    if ref_aa == alt_aa {
        Consequence::Synonymous
    } else if alt_aa.is_stop() {
        Consequence::StopGained
    } else {
        Consequence::Missense
    }
}

/// A single base change inside a codon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodonChange {
    /// Reference codon.
    pub ref_codon: Codon,
    /// Alternate codon.
    pub alt_codon: Codon,
    /// Position in codon that changed (1-indexed).
    pub position: u8,
    /// Residue encoded by the reference codon.
    pub ref_amino_acid: AminoAcid,
    /// Residue encoded by the alternate codon.
    pub alt_amino_acid: AminoAcid,
    /// Effect of the change.
    pub consequence: Consequence,
}

impl CodonChange {
    /// Apply a genomic alternate base at a codon position.
    ///
    /// `reverse_strand` marks a codon read from the minus strand, in which
    /// case the genomic base is complemented before it lands in the codon.
    /// Returns `None` for an out-of-range position or when the base equals
    /// the reference.
    pub fn from_genomic(
        ref_codon: Codon,
        position: u8,
        genomic_alt: Base,
        reverse_strand: bool,
    ) -> Option<Self> {
        let coding_alt = if reverse_strand {
            genomic_alt.complement()
        } else {
            genomic_alt
        };
        if ref_codon.base_at(position)? == coding_alt {
            return None;
        }
        let alt_codon = ref_codon.with_base(position, coding_alt)?;
        let ref_amino_acid = ref_codon.translate();
        let alt_amino_acid = alt_codon.translate();
        Some(Self {
            ref_codon,
            alt_codon,
            position,
            ref_amino_acid,
            alt_amino_acid,
            consequence: consequence(ref_amino_acid, alt_amino_acid),
        })
    }
}

impl fmt::Display for CodonChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}>{})",
            self.ref_codon, self.alt_codon, self.ref_amino_acid, self.alt_amino_acid
        )
    }
}
