// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Genome build selection and GRCh37 to GRCh38 conversion.
//!
//! The batch build is chosen once, after classification:
//!
//! | Option        | Result                                                  |
//! |---------------|---------------------------------------------------------|
//! | `unspecified` | GRCh38, with a warning                                  |
//! | `grch37`      | GRCh37                                                  |
//! | `grch38`      | GRCh38                                                  |
//! | `auto`        | detected from a sample of the batch's genomic inputs   |
//!
//! Detection asks the source what share of sampled (chromosome, position,
//! reference) triples match each build and picks a build whose share
//! exceeds the configured threshold. It never changes the inputs.
//!
//! When the batch is GRCh37, genomic inputs are converted to GRCh38 through
//! the crossmap. Conversion refuses to guess: zero or several candidates
//! are both errors.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::BuildDetectionConfig;
use crate::error::VarmapError;
use crate::format::VariantType;
use crate::input::{Assembly, Message, VariantInput};
use crate::source::{ChrPos, GenomicTriple, MappingSource};

/// How the batch build is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildOption {
    /// Nothing chosen; GRCh38 is assumed
    #[default]
    Unspecified,
    /// Detect from the inputs
    Auto,
    GRCh37,
    GRCh38,
}

impl FromStr for BuildOption {
    type Err = VarmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "unspecified" => Ok(BuildOption::Unspecified),
            "auto" => Ok(BuildOption::Auto),
            "grch37" | "hg19" | "37" => Ok(BuildOption::GRCh37),
            "grch38" | "hg38" | "38" => Ok(BuildOption::GRCh38),
            _ => Err(VarmapError::InvalidConfig {
                msg: format!(
                    "Unknown build '{}'; expected unspecified, auto, grch37 or grch38",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for BuildOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOption::Unspecified => write!(f, "unspecified"),
            BuildOption::Auto => write!(f, "auto"),
            BuildOption::GRCh37 => write!(f, "grch37"),
            BuildOption::GRCh38 => write!(f, "grch38"),
        }
    }
}

/// The build a batch is interpreted in, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBuild {
    pub assembly: Assembly,
    pub message: Message,
}

impl InputBuild {
    fn new(assembly: Assembly, message: Message) -> Self {
        Self { assembly, message }
    }
}

/// Triples of valid genomic inputs that state a reference base.
fn candidate_triples(inputs: &[VariantInput]) -> Vec<GenomicTriple> {
    inputs
        .iter()
        .filter(|i| i.is_valid())
        .filter_map(|i| i.genomic())
        .filter_map(|g| {
            g.reference.map(|reference| GenomicTriple {
                chromosome: g.chromosome,
                position: g.position,
                reference,
            })
        })
        .collect()
}

/// Draw at most `config.max_sample` triples at random.
pub fn sample_triples(
    mut triples: Vec<GenomicTriple>,
    config: &BuildDetectionConfig,
) -> Vec<GenomicTriple> {
    if triples.len() > config.max_sample {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        triples.shuffle(&mut rng);
        triples.truncate(config.max_sample);
    }
    triples
}

/// Pick a build from the two match percentages.
///
/// A build is selected only if its percentage exceeds `threshold`; when both
/// do, the higher wins and a tie goes to GRCh38.
pub fn choose_build(grch38: f64, grch37: f64, threshold: f64, sampled: usize) -> InputBuild {
    let pick = match (grch38 > threshold, grch37 > threshold) {
        (true, true) if grch37 > grch38 => Some(Assembly::GRCh37),
        (true, _) => Some(Assembly::GRCh38),
        (false, true) => Some(Assembly::GRCh37),
        (false, false) => None,
    };
    match pick {
        Some(assembly) => {
            let pct = match assembly {
                Assembly::GRCh37 => grch37,
                Assembly::GRCh38 => grch38,
            };
            InputBuild::new(
                assembly,
                Message::info(format!(
                    "Detected {}: {:.1}% of {} sampled positions match (GRCh38 {:.1}%, GRCh37 {:.1}%)",
                    assembly, pct, sampled, grch38, grch37
                )),
            )
        }
        None => InputBuild::new(
            Assembly::GRCh38,
            Message::warning(format!(
                "Build detection inconclusive (GRCh38 {:.1}%, GRCh37 {:.1}%); assuming GRCh38",
                grch38, grch37
            )),
        ),
    }
}

/// Resolve the batch build.
pub fn detect_build<S: MappingSource + ?Sized>(
    option: BuildOption,
    inputs: &[VariantInput],
    source: &S,
    config: &BuildDetectionConfig,
) -> InputBuild {
    match option {
        BuildOption::GRCh37 => InputBuild::new(
            Assembly::GRCh37,
            Message::info("Using GRCh37 as specified"),
        ),
        BuildOption::GRCh38 => InputBuild::new(
            Assembly::GRCh38,
            Message::info("Using GRCh38 as specified"),
        ),
        BuildOption::Unspecified => InputBuild::new(
            Assembly::GRCh38,
            Message::warning("No genome build specified; assuming GRCh38"),
        ),
        BuildOption::Auto => {
            let triples = candidate_triples(inputs);
            if triples.len() < config.min_sample {
                return InputBuild::new(
                    Assembly::GRCh38,
                    Message::info(format!(
                        "Only {} genomic input(s) with a reference base, fewer than the {} needed for build detection; assuming GRCh38",
                        triples.len(),
                        config.min_sample
                    )),
                );
            }
            let sample = sample_triples(triples, config);
            let percentages = source
                .build_match_percentage(&sample, Assembly::GRCh38)
                .and_then(|p38| {
                    source
                        .build_match_percentage(&sample, Assembly::GRCh37)
                        .map(|p37| (p38, p37))
                });
            match percentages {
                Ok((p38, p37)) => choose_build(p38, p37, config.threshold, sample.len()),
                Err(e) => {
                    log::warn!("build detection lookup failed: {}", e);
                    InputBuild::new(
                        Assembly::GRCh38,
                        Message::warning(format!(
                            "Build detection failed ({}); assuming GRCh38",
                            e
                        )),
                    )
                }
            }
        }
    }
}

/// Warn when an HGVS `NC_` accession version belongs to another build.
pub fn check_accession_build(mut input: VariantInput, assembly: Assembly) -> VariantInput {
    let stated = input.genomic().and_then(|g| g.accession_assembly);
    if let Some(stated) = stated {
        if stated != assembly {
            input.add_warning(format!(
                "Accession version is from {} but the batch is interpreted as {}",
                stated, assembly
            ));
        }
    }
    input
}

/// Distinct positions of valid genomic inputs, for the crossmap lookup.
pub fn collect_positions(inputs: &[VariantInput]) -> Vec<ChrPos> {
    inputs
        .iter()
        .filter(|i| i.is_valid() && i.variant_type() == VariantType::Genomic)
        .filter_map(|i| i.genomic())
        .map(|g| ChrPos::new(g.chromosome, g.position))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Convert a GRCh37 genomic input to GRCh38.
pub fn convert_input(mut input: VariantInput, crossmap: &HashMap<ChrPos, Vec<u64>>) -> VariantInput {
    if !input.is_valid() || input.variant_type() != VariantType::Genomic {
        return input;
    }
    let Some(key) = input.genomic().map(|g| ChrPos::new(g.chromosome, g.position)) else {
        return input;
    };
    match crossmap.get(&key).map(Vec::as_slice).unwrap_or_default() {
        [] => input.add_error(format!("No GRCh38 equivalent found for GRCh37 {}", key)),
        [position] => {
            if let Some(genomic) = input.genomic_mut() {
                genomic.converted_from = Some(key.position);
                genomic.position = *position;
            }
            input.add_info(format!(
                "Converted from GRCh37 {} to GRCh38 {}:{}",
                key, key.chromosome, position
            ));
        }
        many => {
            let positions: Vec<String> = many.iter().map(u64::to_string).collect();
            input.add_error(format!(
                "Multiple GRCh38 equivalents found for GRCh37 {} ({})",
                key,
                positions.join(", ")
            ));
        }
    }
    input
}
