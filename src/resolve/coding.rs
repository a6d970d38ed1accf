// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Coding DNA (`c.`) to protein and genomic coordinates.
//!
//! Resolution happens in two steps. [`resolve_accession`] turns the RefSeq
//! transcript into a UniProt accession and the coding position into a
//! protein position and codon sub-position. [`resolve_genomic`] then uses
//! the codon rows of that protein position to place the change on the
//! genome.

use std::collections::{BTreeSet, HashMap};

use super::{primary_uniprot, strip_version};
use crate::format::VariantFormat;
use crate::input::{DerivedProtein, GenomicVariant, ParsedVariant, VariantInput};
use crate::source::{MappingRow, ProteinKey};

/// Protein position and codon sub-position of a 1-based coding position.
///
/// The protein position is `ceil(c / 3)`. The sub-position is `c mod 3`,
/// with a zero remainder mapped to 3, the last base of the codon.
///
/// ```
/// use ferro_varmap::resolve::coding::derive_protein_position;
///
/// assert_eq!(derive_protein_position(1289), (430, 2));
/// assert_eq!(derive_protein_position(6), (2, 3));
/// ```
pub fn derive_protein_position(coding_position: u64) -> (u64, u8) {
    let protein_position = coding_position.div_ceil(3);
    let sub_position = match coding_position % 3 {
        0 => 3,
        r => r as u8,
    };
    (protein_position, sub_position)
}

/// Versionless RefSeq transcripts of valid coding inputs.
pub fn collect_refseqs(inputs: &[VariantInput]) -> BTreeSet<String> {
    inputs
        .iter()
        .filter(|i| i.is_valid())
        .filter_map(|i| i.coding())
        .map(|c| strip_version(&c.refseq).to_string())
        .collect()
}

/// Attach the UniProt accession and protein position to a coding input.
pub fn resolve_accession(
    mut input: VariantInput,
    uniprot: &HashMap<String, Vec<String>>,
) -> VariantInput {
    if !input.is_valid() {
        return input;
    }
    let Some(coding) = input.coding() else {
        return input;
    };
    let refseq = coding.refseq.clone();
    let stated = coding.stated_protein;
    let (position, codon_position) = derive_protein_position(coding.position);

    let Some(accession) = primary_uniprot(&mut input, &refseq, uniprot) else {
        return input;
    };

    if let Some(stated) = stated {
        if stated.position != position {
            input.add_warning(format!(
                "Stated protein position {} does not match position {} derived from the coding position",
                stated.position, position
            ));
        }
    }

    if let Some(ParsedVariant::Coding(coding)) = input.parsed.as_mut() {
        coding.protein = Some(DerivedProtein {
            accession,
            position,
            codon_position,
        });
    }
    input
}

/// Protein key of a coding input whose accession has been resolved.
pub fn protein_key(input: &VariantInput) -> Option<ProteinKey> {
    if !input.is_valid() || input.format != VariantFormat::HgvsCoding {
        return None;
    }
    let protein = input.coding()?.protein.as_ref()?;
    Some(ProteinKey::new(protein.accession.clone(), protein.position))
}

/// Place a resolved coding change on the genome.
///
/// Every codon row at the derived sub-position yields one variant. The
/// row's reference base is authoritative; a stated reference that differs
/// only produces a warning.
pub fn resolve_genomic(
    mut input: VariantInput,
    rows: &HashMap<ProteinKey, Vec<MappingRow>>,
) -> VariantInput {
    let Some(key) = protein_key(&input) else {
        return input;
    };
    let Some(coding) = input.coding().cloned() else {
        return input;
    };
    let Some(protein) = coding.protein.as_ref() else {
        return input;
    };

    let matching: Vec<&MappingRow> = rows
        .get(&key)
        .into_iter()
        .flatten()
        .filter(|r| r.codon_position == protein.codon_position)
        .collect();

    for row in matching {
        let stated_ref = row.to_genomic(coding.reference);
        if stated_ref != row.ref_base {
            input.add_warning(format!(
                "Reference base mismatch at {}:{}: input states {}, reference has {}",
                row.chromosome, row.genomic_position, stated_ref, row.ref_base
            ));
        }
        let alt = row.to_genomic(coding.alternate);
        if alt == row.ref_base {
            continue;
        }
        if let (Some(stated), Some(change)) = (coding.stated_protein, row.codon_change(alt)) {
            if change.alt_amino_acid != stated.alternate {
                input.add_warning(format!(
                    "Stated protein change {}{}{} does not match codon change {}",
                    stated.reference, stated.position, stated.alternate, change
                ));
            }
        }
        input.add_derived(GenomicVariant::new(
            row.chromosome,
            row.genomic_position,
            row.ref_base,
            Some(alt),
        ));
    }

    if input.derived.is_empty() {
        input.add_error(format!(
            "Could not map coding input to genomic coordinates ({} position {} codon base {})",
            key.accession, key.position, protein.codon_position
        ));
    }
    input
}
