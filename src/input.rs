// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Parsed representation of one input line.
//!
//! A [`VariantInput`] is created once by the classifier and then handed by
//! value through every resolution stage. Stages only ever append messages
//! and derived variants, so diagnostics recorded early survive to the end.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codon::{AminoAcid, Base};
use crate::format::chromosome::Chromosome;
use crate::format::{VariantFormat, VariantType};

/// Genome assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assembly {
    /// GRCh37 / hg19
    GRCh37,
    /// GRCh38 / hg38
    GRCh38,
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assembly::GRCh37 => write!(f, "GRCh37"),
            Assembly::GRCh38 => write!(f, "GRCh38"),
        }
    }
}

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-facing diagnostic attached to an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}", label, self.text)
    }
}

/// A genomic single-nucleotide variant.
///
/// Equality and hashing are structural so that variants reached through
/// different derivation paths collapse to one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenomicVariant {
    pub chromosome: Chromosome,
    /// 1-based position
    pub position: u64,
    /// Reference base; only absent for genomic inputs that did not state one
    pub reference: Option<Base>,
    /// Alternate base; absent means any SNV from the reference
    pub alternate: Option<Base>,
}

impl GenomicVariant {
    pub fn new(
        chromosome: Chromosome,
        position: u64,
        reference: Base,
        alternate: Option<Base>,
    ) -> Self {
        Self {
            chromosome,
            position,
            reference: Some(reference),
            alternate,
        }
    }
}

impl fmt::Display for GenomicVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = |b: Option<Base>| b.map_or('*', |b| b.to_char());
        write!(
            f,
            "{}-{}-{}-{}",
            self.chromosome,
            self.position,
            base(self.reference),
            base(self.alternate)
        )
    }
}

/// Genomic input: internal shorthand, VCF, gnomAD or HGVS `g.`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicInput {
    pub chromosome: Chromosome,
    pub position: u64,
    pub reference: Option<Base>,
    /// Alternate alleles; empty means any SNV
    pub alternates: Vec<Base>,
    /// VCF ID column, when present and not `.`
    pub id: Option<String>,
    /// Assembly implied by an HGVS `NC_` accession version
    pub accession_assembly: Option<Assembly>,
    /// Original GRCh37 position after a successful conversion
    pub converted_from: Option<u64>,
}

impl GenomicInput {
    pub fn new(chromosome: Chromosome, position: u64) -> Self {
        Self {
            chromosome,
            position,
            reference: None,
            alternates: Vec::new(),
            id: None,
            accession_assembly: None,
            converted_from: None,
        }
    }

    /// The genomic variants this input describes, one per alternate allele.
    pub fn variants(&self) -> Vec<GenomicVariant> {
        let variant = |alternate| GenomicVariant {
            chromosome: self.chromosome,
            position: self.position,
            reference: self.reference,
            alternate,
        };
        if self.alternates.is_empty() {
            vec![variant(None)]
        } else {
            self.alternates.iter().map(|a| variant(Some(*a))).collect()
        }
    }
}

/// Protein change written next to a coding change, e.g. `(p.Gln430Arg)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatedProtein {
    pub reference: AminoAcid,
    pub position: u64,
    pub alternate: AminoAcid,
}

/// Protein location derived from a coding position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedProtein {
    /// Primary UniProt accession
    pub accession: String,
    pub position: u64,
    /// Codon sub-position (1..=3)
    pub codon_position: u8,
}

/// HGVS `c.` input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingInput {
    pub refseq: String,
    pub gene: Option<String>,
    pub position: u64,
    pub reference: Base,
    pub alternate: Base,
    pub stated_protein: Option<StatedProtein>,
    pub protein: Option<DerivedProtein>,
}

/// Protein input: internal shorthand or HGVS `p.`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinInput {
    /// UniProt accession (after RefSeq resolution for `NP_` inputs)
    pub accession: String,
    /// RefSeq protein accession as written, for HGVS `p.` inputs
    pub refseq: Option<String>,
    pub position: u64,
    pub reference: AminoAcid,
    pub alternate: AminoAcid,
    /// No single-nucleotide change connects reference and alternate
    pub non_snv: bool,
}

impl ProteinInput {
    pub fn new(accession: impl Into<String>, position: u64, reference: AminoAcid, alternate: AminoAcid) -> Self {
        Self {
            accession: accession.into(),
            refseq: None,
            position,
            reference,
            alternate,
            non_snv: false,
        }
    }

    /// Whether the accession still needs RefSeq to UniProt resolution.
    pub fn needs_uniprot(&self) -> bool {
        self.refseq.is_some() && self.accession.is_empty()
    }
}

/// Source database of a variant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdSource {
    Dbsnp,
    Clinvar,
    Cosmic,
}

impl fmt::Display for IdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSource::Dbsnp => write!(f, "dbSNP"),
            IdSource::Clinvar => write!(f, "ClinVar"),
            IdSource::Cosmic => write!(f, "COSMIC"),
        }
    }
}

/// dbSNP, ClinVar or COSMIC identifier input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdInput {
    pub id: String,
    pub source: IdSource,
}

/// Typed payload of a successfully parsed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedVariant {
    Genomic(GenomicInput),
    Coding(CodingInput),
    Protein(ProteinInput),
    Id(IdInput),
}

/// One input line and everything learned about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantInput {
    /// Position of the line in the submitted batch
    pub index: usize,
    /// The trimmed input line
    pub input: String,
    pub format: VariantFormat,
    pub messages: Vec<Message>,
    /// Genomic variants derived during resolution
    pub derived: Vec<GenomicVariant>,
    pub parsed: Option<ParsedVariant>,
}

impl VariantInput {
    pub fn new(index: usize, input: impl Into<String>, format: VariantFormat) -> Self {
        Self {
            index,
            input: input.into(),
            format,
            messages: Vec::new(),
            derived: Vec::new(),
            parsed: None,
        }
    }

    /// An input that matched `format`'s shape but failed its content checks.
    pub fn invalid(
        index: usize,
        input: impl Into<String>,
        format: VariantFormat,
        text: impl Into<String>,
    ) -> Self {
        let mut v = Self::new(index, input, format);
        v.add_error(text);
        v
    }

    pub fn with_parsed(mut self, parsed: ParsedVariant) -> Self {
        self.parsed = Some(parsed);
        self
    }

    pub fn variant_type(&self) -> VariantType {
        self.format.variant_type()
    }

    pub fn is_valid(&self) -> bool {
        !self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_info(&mut self, text: impl Into<String>) {
        self.add_message(Message::info(text));
    }

    pub fn add_warning(&mut self, text: impl Into<String>) {
        self.add_message(Message::warning(text));
    }

    pub fn add_error(&mut self, text: impl Into<String>) {
        self.add_message(Message::error(text));
    }

    /// Append a derived variant unless an identical one is already present.
    pub fn add_derived(&mut self, variant: GenomicVariant) {
        if !self.derived.contains(&variant) {
            self.derived.push(variant);
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
    }

    pub fn genomic(&self) -> Option<&GenomicInput> {
        match &self.parsed {
            Some(ParsedVariant::Genomic(g)) => Some(g),
            _ => None,
        }
    }

    pub fn genomic_mut(&mut self) -> Option<&mut GenomicInput> {
        match &mut self.parsed {
            Some(ParsedVariant::Genomic(g)) => Some(g),
            _ => None,
        }
    }

    pub fn coding(&self) -> Option<&CodingInput> {
        match &self.parsed {
            Some(ParsedVariant::Coding(c)) => Some(c),
            _ => None,
        }
    }

    pub fn protein(&self) -> Option<&ProteinInput> {
        match &self.parsed {
            Some(ParsedVariant::Protein(p)) => Some(p),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&IdInput> {
        match &self.parsed {
            Some(ParsedVariant::Id(id)) => Some(id),
            _ => None,
        }
    }
}
