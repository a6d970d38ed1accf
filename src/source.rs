// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Boundary to the reference data the resolvers depend on.
//!
//! Every lookup is batched: the pipeline collects the distinct keys of a
//! whole batch, asks the [`MappingSource`] once per stage and hands the
//! resulting maps to the pure resolver functions. Implementations backed by
//! a database or web service live outside this crate; [`InMemorySource`]
//! covers tests and small, fully-loaded reference sets.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use ferro_varmap::source::{InMemorySource, MappingSource};
//!
//! let source = InMemorySource::with_test_data();
//! let refseqs = BTreeSet::from(["NP_000454".to_string()]);
//! let map = source.refseq_to_uniprot(&refseqs).unwrap();
//! assert_eq!(map["NP_000454"], vec!["P22309".to_string()]);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codon::{AminoAcid, Base, Codon, CodonChange};
use crate::error::VarmapError;
use crate::format::chromosome::Chromosome;
use crate::input::{Assembly, IdSource};

/// A chromosome position, used as the crossmap key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChrPos {
    pub chromosome: Chromosome,
    pub position: u64,
}

impl ChrPos {
    pub fn new(chromosome: Chromosome, position: u64) -> Self {
        Self {
            chromosome,
            position,
        }
    }
}

impl fmt::Display for ChrPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.position)
    }
}

/// A protein position on a (versionless) UniProt accession.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProteinKey {
    pub accession: String,
    pub position: u64,
}

impl ProteinKey {
    pub fn new(accession: impl Into<String>, position: u64) -> Self {
        Self {
            accession: accession.into(),
            position,
        }
    }
}

impl fmt::Display for ProteinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.accession, self.position)
    }
}

/// A variant identifier qualified by its database.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantIdKey {
    pub id: String,
    pub source: IdSource,
}

impl VariantIdKey {
    pub fn new(id: impl Into<String>, source: IdSource) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

/// A (chromosome, position, reference base) triple sampled for build
/// detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenomicTriple {
    pub chromosome: Chromosome,
    pub position: u64,
    pub reference: Base,
}

/// One genomic base of a codon of a protein.
///
/// A protein position normally has three rows, one per codon sub-position,
/// and more when several transcripts encode it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    pub chromosome: Chromosome,
    /// 1-based genomic position of this base
    pub genomic_position: u64,
    /// Reference base on the genomic forward strand
    pub ref_base: Base,
    /// Reference codon in coding orientation
    pub codon: Codon,
    /// Which base of the codon this row describes (1..=3)
    pub codon_position: u8,
    /// Transcript lies on the minus strand
    pub reverse_strand: bool,
    /// Residue annotated for this protein position
    pub ref_amino_acid: AminoAcid,
    /// Row comes from the canonical isoform
    pub is_canonical: bool,
}

impl MappingRow {
    /// The codon change a genomic alternate base at this row would cause.
    pub fn codon_change(&self, genomic_alt: Base) -> Option<CodonChange> {
        CodonChange::from_genomic(
            self.codon,
            self.codon_position,
            genomic_alt,
            self.reverse_strand,
        )
    }

    /// Convert a coding-strand base at this row to the genomic strand.
    pub fn to_genomic(&self, coding_base: Base) -> Base {
        if self.reverse_strand {
            coding_base.complement()
        } else {
            coding_base
        }
    }
}

/// Genomic location of a variant identifier, as stored by its database.
///
/// Fields are kept as text: records are validated when resolved so that
/// one bad record is reported on its input instead of failing the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    pub chromosome: String,
    pub position: u64,
    pub ref_base: String,
    /// Comma-separated alternate alleles
    pub alt_bases: String,
}

impl IdRecord {
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        ref_base: impl Into<String>,
        alt_bases: impl Into<String>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            ref_base: ref_base.into(),
            alt_bases: alt_bases.into(),
        }
    }

    /// Individual alternate alleles, blanks dropped.
    pub fn alternates(&self) -> impl Iterator<Item = &str> {
        self.alt_bases
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Batched reference data lookups.
///
/// Keys are passed de-duplicated; implementations return only the keys
/// they know, so an absent key means "no data".
pub trait MappingSource {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        "mapping source"
    }

    /// Codon rows for protein positions.
    fn genomic_protein_rows(
        &self,
        keys: &[ProteinKey],
    ) -> Result<HashMap<ProteinKey, Vec<MappingRow>>, VarmapError>;

    /// Versionless RefSeq accession to UniProt accessions, primary first.
    fn refseq_to_uniprot(
        &self,
        refseqs: &BTreeSet<String>,
    ) -> Result<HashMap<String, Vec<String>>, VarmapError>;

    /// Genomic records for identifiers of one database.
    fn variant_ids(
        &self,
        ids: &BTreeSet<String>,
        source: IdSource,
    ) -> Result<HashMap<String, Vec<IdRecord>>, VarmapError>;

    /// Percentage (0-100) of triples whose reference base matches `assembly`.
    fn build_match_percentage(
        &self,
        triples: &[GenomicTriple],
        assembly: Assembly,
    ) -> Result<f64, VarmapError>;

    /// GRCh38 positions for GRCh37 positions; every candidate is returned.
    fn crossmap(&self, positions: &[ChrPos]) -> Result<HashMap<ChrPos, Vec<u64>>, VarmapError>;
}

/// Blanket implementation for boxed trait objects
impl MappingSource for Box<dyn MappingSource + Send + Sync> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn genomic_protein_rows(
        &self,
        keys: &[ProteinKey],
    ) -> Result<HashMap<ProteinKey, Vec<MappingRow>>, VarmapError> {
        (**self).genomic_protein_rows(keys)
    }

    fn refseq_to_uniprot(
        &self,
        refseqs: &BTreeSet<String>,
    ) -> Result<HashMap<String, Vec<String>>, VarmapError> {
        (**self).refseq_to_uniprot(refseqs)
    }

    fn variant_ids(
        &self,
        ids: &BTreeSet<String>,
        source: IdSource,
    ) -> Result<HashMap<String, Vec<IdRecord>>, VarmapError> {
        (**self).variant_ids(ids, source)
    }

    fn build_match_percentage(
        &self,
        triples: &[GenomicTriple],
        assembly: Assembly,
    ) -> Result<f64, VarmapError> {
        (**self).build_match_percentage(triples, assembly)
    }

    fn crossmap(&self, positions: &[ChrPos]) -> Result<HashMap<ChrPos, Vec<u64>>, VarmapError> {
        (**self).crossmap(positions)
    }
}

/// Fully in-memory [`MappingSource`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    rows: HashMap<ProteinKey, Vec<MappingRow>>,
    uniprot: HashMap<String, Vec<String>>,
    ids: HashMap<VariantIdKey, Vec<IdRecord>>,
    reference_bases: HashMap<(Assembly, ChrPos), Base>,
    crossmap: HashMap<ChrPos, Vec<u64>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a codon row for a protein position.
    pub fn add_row(&mut self, accession: &str, protein_position: u64, row: MappingRow) {
        self.rows
            .entry(ProteinKey::new(accession, protein_position))
            .or_default()
            .push(row);
    }

    /// Add the three rows of a codon at consecutive genomic positions.
    ///
    /// `start` is the genomic position of the lowest base. On the reverse
    /// strand the first codon base sits at `start + 2`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_codon(
        &mut self,
        accession: &str,
        protein_position: u64,
        chromosome: Chromosome,
        start: u64,
        codon: Codon,
        reverse_strand: bool,
        is_canonical: bool,
    ) {
        for codon_position in 1..=3u8 {
            let offset = u64::from(codon_position - 1);
            let genomic_position = if reverse_strand {
                start + 2 - offset
            } else {
                start + offset
            };
            let coding_base = codon.bases()[usize::from(codon_position - 1)];
            let ref_base = if reverse_strand {
                coding_base.complement()
            } else {
                coding_base
            };
            self.add_row(
                accession,
                protein_position,
                MappingRow {
                    chromosome,
                    genomic_position,
                    ref_base,
                    codon,
                    codon_position,
                    reverse_strand,
                    ref_amino_acid: codon.translate(),
                    is_canonical,
                },
            );
        }
    }

    /// Map a versionless RefSeq accession to UniProt accessions.
    pub fn add_uniprot(&mut self, refseq: &str, accessions: &[&str]) {
        self.uniprot
            .entry(refseq.to_string())
            .or_default()
            .extend(accessions.iter().map(|a| a.to_string()));
    }

    /// Add a record for a variant identifier.
    pub fn add_id(&mut self, id: &str, source: IdSource, record: IdRecord) {
        self.ids
            .entry(VariantIdKey::new(id, source))
            .or_default()
            .push(record);
    }

    /// Record the reference base at a position of an assembly.
    pub fn add_reference_base(&mut self, assembly: Assembly, position: ChrPos, base: Base) {
        self.reference_bases.insert((assembly, position), base);
    }

    /// Add a GRCh38 candidate for a GRCh37 position.
    pub fn add_crossmap(&mut self, grch37: ChrPos, grch38_position: u64) {
        self.crossmap.entry(grch37).or_default().push(grch38_position);
    }

    /// Create with a small UGT1A1 / FOXRED1 reference set.
    pub fn with_test_data() -> Self {
        let mut source = Self::new();
        let chr2 = Chromosome::Autosome(2);
        let chr11 = Chromosome::Autosome(11);

        // UGT1A1 Gly71 (GGA), forward strand
        for (i, (base, codon)) in [(Base::G, "Gga"), (Base::G, "gGa"), (Base::A, "ggA")]
            .into_iter()
            .enumerate()
        {
            let codon_position = i as u8 + 1;
            if let Some(codon) = Codon::parse(codon) {
                source.add_row(
                    "P22309",
                    71,
                    MappingRow {
                        chromosome: chr2,
                        genomic_position: 233_760_498 + i as u64,
                        ref_base: base,
                        codon,
                        codon_position,
                        reverse_strand: false,
                        ref_amino_acid: AminoAcid::Gly,
                        is_canonical: true,
                    },
                );
            }
        }
        source.add_uniprot("NP_000454", &["P22309"]);
        source.add_uniprot("NM_000463", &["P22309"]);

        // FOXRED1 Gln430 (CAG), forward strand
        source.add_codon(
            "Q96CU9",
            430,
            chr11,
            126_276_000,
            Codon::new(Base::C, Base::A, Base::G),
            false,
            true,
        );
        source.add_uniprot("NM_017547", &["Q96CU9"]);
        source.add_uniprot("NP_060017", &["Q96CU9"]);

        // rs4148323 (UGT1A1*6)
        source.add_id(
            "rs4148323",
            IdSource::Dbsnp,
            IdRecord::new("2", 233_760_498, "G", "A"),
        );
        source.add_id(
            "RCV000008567",
            IdSource::Clinvar,
            IdRecord::new("chr2", 233_760_498, "G", "A"),
        );

        // GRCh37 / GRCh38 positions of rs4148323
        source.add_reference_base(
            Assembly::GRCh38,
            ChrPos::new(chr2, 233_760_498),
            Base::G,
        );
        source.add_reference_base(
            Assembly::GRCh37,
            ChrPos::new(chr2, 234_669_144),
            Base::G,
        );
        source.add_crossmap(ChrPos::new(chr2, 234_669_144), 233_760_498);

        source
    }
}

impl MappingSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn genomic_protein_rows(
        &self,
        keys: &[ProteinKey],
    ) -> Result<HashMap<ProteinKey, Vec<MappingRow>>, VarmapError> {
        Ok(keys
            .iter()
            .filter_map(|k| self.rows.get(k).map(|rows| (k.clone(), rows.clone())))
            .collect())
    }

    fn refseq_to_uniprot(
        &self,
        refseqs: &BTreeSet<String>,
    ) -> Result<HashMap<String, Vec<String>>, VarmapError> {
        Ok(refseqs
            .iter()
            .filter_map(|r| self.uniprot.get(r).map(|acc| (r.clone(), acc.clone())))
            .collect())
    }

    fn variant_ids(
        &self,
        ids: &BTreeSet<String>,
        source: IdSource,
    ) -> Result<HashMap<String, Vec<IdRecord>>, VarmapError> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.ids
                    .get(&VariantIdKey::new(id.clone(), source))
                    .map(|records| (id.clone(), records.clone()))
            })
            .collect())
    }

    fn build_match_percentage(
        &self,
        triples: &[GenomicTriple],
        assembly: Assembly,
    ) -> Result<f64, VarmapError> {
        if triples.is_empty() {
            return Ok(0.0);
        }
        let matched = triples
            .iter()
            .filter(|t| {
                self.reference_bases
                    .get(&(assembly, ChrPos::new(t.chromosome, t.position)))
                    == Some(&t.reference)
            })
            .count();
        Ok(100.0 * matched as f64 / triples.len() as f64)
    }

    fn crossmap(&self, positions: &[ChrPos]) -> Result<HashMap<ChrPos, Vec<u64>>, VarmapError> {
        Ok(positions
            .iter()
            .filter_map(|p| self.crossmap.get(p).map(|v| (*p, v.clone())))
            .collect())
    }
}
