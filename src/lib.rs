// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-varmap: variant input normalization and coordinate translation
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Accepts variant descriptions in the notations people actually paste
//! (VCF lines, gnomAD IDs, HGVS `g.`/`c.`/`p.`, dbSNP/ClinVar/COSMIC IDs,
//! loose `chr pos ref alt` and `ACCESSION POS REF ALT` shorthand) and
//! resolves each to canonical GRCh38 single-nucleotide variants.
//!
//! # Example
//!
//! ```
//! use ferro_varmap::{InMemorySource, Processor};
//!
//! let processor = Processor::new(InMemorySource::with_test_data());
//! let batch = processor.process(&["rs4148323", "P22309 71 Gly Arg", "x-149498202-c-g"]);
//!
//! for input in &batch.inputs {
//!     for variant in &input.derived {
//!         println!("{}\t{}", input.input, variant);
//!     }
//! }
//! assert_eq!(batch.valid_count(), 3);
//! ```

pub mod classify;
pub mod codon;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod pipeline;
pub mod resolve;
pub mod source;

// Re-export commonly used types
pub use classify::{classify_and_parse, classify_lines};
pub use codon::{AminoAcid, Base, Codon, CodonChange, Consequence};
pub use config::{BuildDetectionConfig, ProcessorConfig};
pub use error::VarmapError;
pub use format::chromosome::{normalize_chr, Chromosome};
pub use format::{VariantFormat, VariantType};
pub use input::{Assembly, GenomicVariant, Message, Severity, VariantInput};
pub use pipeline::{ProcessedBatch, Processor};
pub use resolve::build::{BuildOption, InputBuild};
pub use source::{InMemorySource, MappingSource};

/// Result type alias for ferro-varmap operations
pub type Result<T> = std::result::Result<T, VarmapError>;
