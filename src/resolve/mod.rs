// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Resolution stages.
//!
//! Each stage is split in two: a `collect_*` function gathers the distinct
//! lookup keys of a batch, and a `resolve_*` function takes one
//! [`VariantInput`] by value together with the looked-up data and returns
//! it with derived variants and messages appended. Lookups themselves are
//! done by the [`pipeline`](crate::pipeline).
//!
//! - [`ids`]: dbSNP/ClinVar/COSMIC identifiers to genomic variants
//! - [`coding`]: HGVS `c.` positions to protein positions and genomic variants
//! - [`protein`]: protein changes to the genomic SNVs that cause them
//! - [`build`]: assembly detection and GRCh37 to GRCh38 conversion

pub mod build;
pub mod coding;
pub mod ids;
pub mod protein;

use std::collections::HashMap;

use crate::input::VariantInput;

/// Strip a version suffix (`NM_000463.3` -> `NM_000463`).
pub fn strip_version(accession: &str) -> &str {
    accession
        .split_once('.')
        .map_or(accession, |(name, _)| name)
}

/// Pick the primary UniProt accession for a RefSeq accession.
///
/// The first mapped accession is primary; any others are listed in a
/// warning. With no mapping an error is recorded and `None` returned.
pub(crate) fn primary_uniprot(
    input: &mut VariantInput,
    refseq: &str,
    uniprot: &HashMap<String, Vec<String>>,
) -> Option<String> {
    let key = strip_version(refseq);
    match uniprot.get(key).map(Vec::as_slice) {
        None | Some([]) => {
            input.add_error(format!("No UniProt mapping found for {}", key));
            None
        }
        Some([primary]) => Some(primary.clone()),
        Some([primary, rest @ ..]) => {
            input.add_warning(format!(
                "{} maps to several UniProt accessions; using {} (also: {})",
                key,
                primary,
                rest.join(", ")
            ));
            Some(primary.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VariantFormat;

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version("NM_000463.3"), "NM_000463");
        assert_eq!(strip_version("NM_000463"), "NM_000463");
    }

    #[test]
    fn test_primary_uniprot() {
        let mut map = HashMap::new();
        map.insert("NM_1".to_string(), vec!["P1".to_string()]);
        map.insert(
            "NM_2".to_string(),
            vec!["P2".to_string(), "Q2".to_string(), "R2".to_string()],
        );

        let mut input = VariantInput::new(0, "x", VariantFormat::HgvsCoding);
        assert_eq!(primary_uniprot(&mut input, "NM_1.4", &map).as_deref(), Some("P1"));
        assert!(input.messages.is_empty());

        assert_eq!(primary_uniprot(&mut input, "NM_2.1", &map).as_deref(), Some("P2"));
        assert_eq!(input.warnings().count(), 1);
        assert!(input.messages[0].text.contains("Q2, R2"));

        assert_eq!(primary_uniprot(&mut input, "NM_3.1", &map), None);
        assert!(!input.is_valid());
    }
}
