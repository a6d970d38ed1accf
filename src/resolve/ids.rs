// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Variant identifier resolution.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::format::chromosome::normalize_chr;
use crate::format::parse_base;
use crate::input::{GenomicVariant, IdSource, VariantInput};
use crate::source::IdRecord;

/// Distinct valid identifiers of a batch, grouped by database.
pub fn collect_ids(inputs: &[VariantInput]) -> BTreeMap<IdSource, BTreeSet<String>> {
    let mut ids: BTreeMap<IdSource, BTreeSet<String>> = BTreeMap::new();
    for id in inputs.iter().filter(|i| i.is_valid()).filter_map(|i| i.id()) {
        ids.entry(id.source).or_default().insert(id.id.clone());
    }
    ids
}

/// Derive genomic variants for an identifier input.
///
/// `records` is the lookup result for the input's database. Every
/// single-base alternate allele of every record becomes a variant; records
/// with an unusable location or reference are skipped with a warning, and
/// multi-base alleles are skipped and counted.
pub fn resolve_id(mut input: VariantInput, records: &HashMap<String, Vec<IdRecord>>) -> VariantInput {
    let Some(id) = input.id().filter(|_| input.is_valid()).cloned() else {
        return input;
    };
    let Some(records) = records.get(&id.id).filter(|r| !r.is_empty()) else {
        input.add_error(format!(
            "No genomic mapping found for {} ID {}",
            id.source, id.id
        ));
        return input;
    };

    let mut skipped_alleles = 0usize;
    for record in records {
        let Some(chromosome) = normalize_chr(&record.chromosome) else {
            input.add_warning(format!(
                "Skipping {} record on unrecognised chromosome '{}'",
                id.id, record.chromosome
            ));
            continue;
        };
        if record.position == 0 {
            input.add_warning(format!("Skipping {} record at position 0", id.id));
            continue;
        }
        let reference = match parse_base(&record.ref_base, "reference base") {
            Ok(base) => base,
            Err(_) => {
                skipped_alleles += record.alternates().count().max(1);
                continue;
            }
        };

        let mut alternates = record.alternates().peekable();
        if alternates.peek().is_none() || record.alt_bases.trim() == "." {
            input.add_derived(GenomicVariant::new(
                chromosome,
                record.position,
                reference,
                None,
            ));
            continue;
        }
        for allele in alternates {
            match parse_base(allele, "alternate allele") {
                Ok(alt) => input.add_derived(GenomicVariant::new(
                    chromosome,
                    record.position,
                    reference,
                    Some(alt),
                )),
                Err(_) => skipped_alleles += 1,
            }
        }
    }

    if skipped_alleles > 0 {
        input.add_warning(format!(
            "Skipped {} allele(s) of {} that are not single nucleotide variants",
            skipped_alleles, id.id
        ));
    }
    if input.derived.is_empty() {
        input.add_error(format!(
            "{} ID {} has no single nucleotide variant mapping",
            id.source, id.id
        ));
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::Base;
    use crate::format::chromosome::Chromosome;
    use crate::format::ids::parse_dbsnp;

    fn records(id: &str, list: Vec<IdRecord>) -> HashMap<String, Vec<IdRecord>> {
        HashMap::from([(id.to_string(), list)])
    }

    #[test]
    fn test_collect_ids_groups_and_dedups() {
        let inputs = vec![
            parse_dbsnp(0, "rs1"),
            parse_dbsnp(1, "RS1"),
            parse_dbsnp(2, "rs2"),
            parse_dbsnp(3, "rsX"),
        ];
        let ids = collect_ids(&inputs);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[&IdSource::Dbsnp].len(), 2);
    }

    #[test]
    fn test_multiallelic_record() {
        let map = records("rs1", vec![IdRecord::new("chr7", 100, "a", "C,T,C")]);
        let input = resolve_id(parse_dbsnp(0, "rs1"), &map);
        assert!(input.is_valid());
        assert_eq!(input.derived.len(), 2);
        assert_eq!(input.derived[0].chromosome, Chromosome::Autosome(7));
        assert_eq!(input.derived[0].reference, Some(Base::A));
        assert_eq!(input.derived[1].alternate, Some(Base::T));
    }

    #[test]
    fn test_duplicate_records_collapse() {
        let record = IdRecord::new("2", 233_760_498, "G", "A");
        let map = records("rs1", vec![record.clone(), record]);
        let input = resolve_id(parse_dbsnp(0, "rs1"), &map);
        assert_eq!(input.derived.len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let input = resolve_id(parse_dbsnp(0, "rs1"), &HashMap::new());
        assert!(!input.is_valid());
        assert!(input.errors().next().unwrap().text.contains("No genomic mapping"));
    }

    #[test]
    fn test_indel_only_record() {
        let map = records("rs1", vec![IdRecord::new("1", 10, "AT", "A")]);
        let input = resolve_id(parse_dbsnp(0, "rs1"), &map);
        assert!(!input.is_valid());
        assert_eq!(input.warnings().count(), 1);
    }

    #[test]
    fn test_mixed_alleles_warn() {
        let map = records("rs1", vec![IdRecord::new("1", 10, "A", "G,AT")]);
        let input = resolve_id(parse_dbsnp(0, "rs1"), &map);
        assert!(input.is_valid());
        assert_eq!(input.derived.len(), 1);
        assert_eq!(input.warnings().count(), 1);
    }

    #[test]
    fn test_invalid_input_untouched() {
        let input = parse_dbsnp(0, "rsX");
        let before = input.clone();
        assert_eq!(resolve_id(input, &HashMap::new()), before);
    }
}
