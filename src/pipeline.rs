// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Batch orchestration.
//!
//! [`Processor::process`] runs a batch through every stage:
//!
//! 1. classify and parse each line
//! 2. resolve variant identifiers
//! 3. map RefSeq accessions of coding and protein inputs to UniProt
//! 4. place coding and protein changes on the genome
//! 5. choose the batch build and convert GRCh37 genomic inputs
//! 6. emit the genomic variants of genomic inputs
//!
//! Each lookup stage makes one batched call to the [`MappingSource`]. A
//! failed call is logged and recorded as an error on every input that
//! needed it; the rest of the batch carries on.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::classify::{classify_lines, input_lines};
use crate::config::ProcessorConfig;
use crate::error::VarmapError;
use crate::format::{VariantFormat, VariantType};
use crate::input::{Assembly, GenomicVariant, IdSource, VariantInput};
use crate::resolve::build::{self, InputBuild};
use crate::resolve::{coding, ids, protein};
use crate::source::{IdRecord, MappingSource};

/// Result of processing one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedBatch {
    /// Build the batch was interpreted in
    pub build: InputBuild,
    /// One entry per input line, in input order
    pub inputs: Vec<VariantInput>,
    /// Total processing time
    #[serde(skip)]
    pub duration: Duration,
}

impl ProcessedBatch {
    /// Get the total number of inputs.
    pub fn total(&self) -> usize {
        self.inputs.len()
    }

    /// Get the number of inputs without errors.
    pub fn valid_count(&self) -> usize {
        self.inputs.iter().filter(|i| i.is_valid()).count()
    }

    /// Get the number of inputs with at least one error.
    pub fn error_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    /// All derived variants of valid inputs, with the index of their input.
    pub fn variants(&self) -> impl Iterator<Item = (usize, &GenomicVariant)> {
        self.inputs
            .iter()
            .filter(|i| i.is_valid())
            .flat_map(|i| i.derived.iter().map(move |v| (i.index, v)))
    }

    /// Calculate processing rate (items per second).
    ///
    /// Returns 0.0 if the duration is too short to provide a meaningful rate.
    pub fn items_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs < f64::EPSILON {
            0.0
        } else {
            self.inputs.len() as f64 / secs
        }
    }

    /// Serialize the batch as JSON.
    pub fn to_json(&self) -> Result<String, VarmapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Batch processor for variant inputs.
pub struct Processor<S: MappingSource> {
    source: S,
    config: ProcessorConfig,
}

impl<S: MappingSource> Processor<S> {
    /// Create a processor with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ProcessorConfig::default())
    }

    /// Create a processor with a configuration.
    pub fn with_config(source: S, config: ProcessorConfig) -> Self {
        Self { source, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Get the mapping source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Process raw text: one input per line, blank and `#` lines skipped.
    pub fn process_text(&self, text: &str) -> ProcessedBatch {
        self.process(&input_lines(text))
    }

    /// Process a batch of trimmed, non-empty, non-comment lines.
    pub fn process<T: AsRef<str> + Sync>(&self, lines: &[T]) -> ProcessedBatch {
        let start = Instant::now();

        let inputs = classify_lines(lines);
        log::debug!(
            "classified {} inputs, {} valid",
            inputs.len(),
            inputs.iter().filter(|i| i.is_valid()).count()
        );

        let inputs = self.resolve_ids(inputs);
        let inputs = self.resolve_accessions(inputs);
        let inputs = self.resolve_positions(inputs);

        let build = build::detect_build(
            self.config.build,
            &inputs,
            &self.source,
            &self.config.build_detection,
        );
        log::info!("batch build {}: {}", build.assembly, build.message.text);

        let inputs = self.convert(inputs, build.assembly);
        let inputs: Vec<VariantInput> = inputs.into_iter().map(emit_genomic).collect();

        let duration = start.elapsed();
        log::debug!(
            "processed {} inputs in {:.3}s",
            inputs.len(),
            duration.as_secs_f64()
        );
        ProcessedBatch {
            build,
            inputs,
            duration,
        }
    }

    fn lookup_message(&self, what: &str, err: &VarmapError) -> String {
        match err {
            VarmapError::LookupFailed { .. } => err.to_string(),
            other => format!("{} {} lookup failed: {}", self.source.name(), what, other),
        }
    }

    fn resolve_ids(&self, inputs: Vec<VariantInput>) -> Vec<VariantInput> {
        let wanted = ids::collect_ids(&inputs);
        if wanted.is_empty() {
            return inputs;
        }
        let lookups: HashMap<IdSource, Result<HashMap<String, Vec<IdRecord>>, VarmapError>> =
            wanted
                .iter()
                .map(|(source, set)| {
                    log::debug!("looking up {} {} IDs", set.len(), source);
                    (*source, self.source.variant_ids(set, *source))
                })
                .collect();

        for (source, result) in &lookups {
            if let Err(e) = result {
                log::warn!("{} ID lookup failed: {}", source, e);
            }
        }

        inputs
            .into_iter()
            .map(|input| {
                let Some(source) = input.id().map(|id| id.source) else {
                    return input;
                };
                match lookups.get(&source) {
                    Some(Ok(records)) => ids::resolve_id(input, records),
                    Some(Err(e)) => self.fail(input, &format!("{} ID", source), e),
                    None => input,
                }
            })
            .collect()
    }

    fn resolve_accessions(&self, inputs: Vec<VariantInput>) -> Vec<VariantInput> {
        let mut refseqs = coding::collect_refseqs(&inputs);
        refseqs.extend(protein::collect_refseqs(&inputs));
        if refseqs.is_empty() {
            return inputs;
        }
        log::debug!("mapping {} RefSeq accessions to UniProt", refseqs.len());

        match self.source.refseq_to_uniprot(&refseqs) {
            Ok(uniprot) => inputs
                .into_iter()
                .map(|input| match input.format {
                    VariantFormat::HgvsCoding => coding::resolve_accession(input, &uniprot),
                    VariantFormat::HgvsProtein => protein::resolve_accession(input, &uniprot),
                    _ => input,
                })
                .collect(),
            Err(e) => {
                log::warn!("RefSeq to UniProt lookup failed: {}", e);
                inputs
                    .into_iter()
                    .map(|input| {
                        let needs = input.is_valid()
                            && (input.coding().is_some()
                                || input.protein().is_some_and(|p| p.needs_uniprot()));
                        if needs {
                            self.fail(input, "UniProt", &e)
                        } else {
                            input
                        }
                    })
                    .collect()
            }
        }
    }

    fn resolve_positions(&self, inputs: Vec<VariantInput>) -> Vec<VariantInput> {
        let keys: Vec<_> = inputs
            .iter()
            .filter_map(|i| coding::protein_key(i).or_else(|| protein::protein_key(i)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if keys.is_empty() {
            return inputs;
        }
        log::debug!("looking up codon rows for {} protein positions", keys.len());

        match self.source.genomic_protein_rows(&keys) {
            Ok(rows) => inputs
                .into_iter()
                .map(|input| match input.variant_type() {
                    VariantType::Coding => coding::resolve_genomic(input, &rows),
                    VariantType::Protein => protein::resolve_protein(input, &rows),
                    _ => input,
                })
                .collect(),
            Err(e) => {
                log::warn!("codon row lookup failed: {}", e);
                inputs
                    .into_iter()
                    .map(|input| {
                        if coding::protein_key(&input).is_some()
                            || protein::protein_key(&input).is_some()
                        {
                            self.fail(input, "codon row", &e)
                        } else {
                            input
                        }
                    })
                    .collect()
            }
        }
    }

    fn convert(&self, inputs: Vec<VariantInput>, assembly: Assembly) -> Vec<VariantInput> {
        let inputs: Vec<VariantInput> = inputs
            .into_iter()
            .map(|input| build::check_accession_build(input, assembly))
            .collect();
        if assembly != Assembly::GRCh37 {
            return inputs;
        }
        let positions = build::collect_positions(&inputs);
        if positions.is_empty() {
            return inputs;
        }
        log::debug!("converting {} GRCh37 positions", positions.len());

        match self.source.crossmap(&positions) {
            Ok(crossmap) => inputs
                .into_iter()
                .map(|input| build::convert_input(input, &crossmap))
                .collect(),
            Err(e) => {
                log::warn!("crossmap lookup failed: {}", e);
                inputs
                    .into_iter()
                    .map(|input| {
                        if input.is_valid() && input.variant_type() == VariantType::Genomic {
                            self.fail(input, "crossmap", &e)
                        } else {
                            input
                        }
                    })
                    .collect()
            }
        }
    }

    fn fail(&self, mut input: VariantInput, what: &str, err: &VarmapError) -> VariantInput {
        input.add_error(self.lookup_message(what, err));
        input
    }
}

/// Copy the variants of a valid genomic input into its derived list.
fn emit_genomic(mut input: VariantInput) -> VariantInput {
    if !input.is_valid() || input.variant_type() != VariantType::Genomic {
        return input;
    }
    let variants = input.genomic().map(|g| g.variants()).unwrap_or_default();
    for variant in variants {
        input.add_derived(variant);
    }
    input
}
