//! End-to-end tests running batches through the processor
//!
//! These exercise the full pipeline against an in-memory mapping source:
//! classification, identifier and accession resolution, coordinate mapping,
//! build handling and output.

use ferro_varmap::codon::Codon;
use ferro_varmap::input::IdSource;
use ferro_varmap::source::{ChrPos, IdRecord};
use ferro_varmap::{
    Assembly, Base, BuildOption, Chromosome, GenomicVariant, InMemorySource, Processor,
    ProcessorConfig, Severity, VariantFormat,
};
use rstest::rstest;

fn chr(n: u8) -> Chromosome {
    Chromosome::Autosome(n)
}

fn snv(chromosome: Chromosome, position: u64, reference: Base, alternate: Base) -> GenomicVariant {
    GenomicVariant::new(chromosome, position, reference, Some(alternate))
}

fn processor() -> Processor<InMemorySource> {
    Processor::new(InMemorySource::with_test_data())
}

// =============================================================================
// Worked examples
// =============================================================================

#[test]
fn test_internal_protein_gly71arg() {
    let batch = processor().process(&["P22309 71 Gly Arg"]);
    let input = &batch.inputs[0];
    assert_eq!(input.format, VariantFormat::InternalProtein);
    assert!(input.is_valid(), "{:?}", input.messages);

    // GGA -> AGA and GGA -> CGA both give Arg at the first codon base
    let mut derived = input.derived.clone();
    derived.sort();
    assert_eq!(
        derived,
        vec![
            snv(chr(2), 233_760_498, Base::G, Base::A),
            snv(chr(2), 233_760_498, Base::G, Base::C),
        ]
    );
}

#[test]
fn test_hgvs_protein_via_refseq() {
    let batch = processor().process(&["NP_000454.1:p.Gly71Arg"]);
    let input = &batch.inputs[0];
    assert!(input.is_valid(), "{:?}", input.messages);
    assert_eq!(input.protein().unwrap().accession, "P22309");
    assert_eq!(input.derived.len(), 2);
}

#[test]
fn test_gnomad_id() {
    let batch = processor().process(&["x-149498202-c-g"]);
    let input = &batch.inputs[0];
    assert_eq!(input.format, VariantFormat::Gnomad);
    assert_eq!(input.derived, vec![snv(Chromosome::X, 149_498_202, Base::C, Base::G)]);
}

#[test]
fn test_hgvs_coding_derives_protein_position() {
    let batch = processor().process(&["NM_017547.4:c.1289A>G"]);
    let input = &batch.inputs[0];
    assert!(input.is_valid(), "{:?}", input.messages);

    let protein = input.coding().unwrap().protein.as_ref().unwrap();
    assert_eq!(protein.accession, "Q96CU9");
    assert_eq!(protein.position, 430);
    assert_eq!(protein.codon_position, 2);

    // CAG -> CGG at the second base
    assert_eq!(input.derived, vec![snv(chr(11), 126_276_001, Base::A, Base::G)]);
}

#[test]
fn test_coding_with_stated_protein() {
    let batch = processor().process(&["NM_017547.4(FOXRED1):c.1289A>G (p.Gln430Arg)"]);
    let input = &batch.inputs[0];
    assert!(input.is_valid(), "{:?}", input.messages);
    assert_eq!(input.warnings().count(), 0, "{:?}", input.messages);
    assert_eq!(input.derived.len(), 1);
}

#[rstest]
#[case("rs4148323")]
#[case("RCV000008567")]
#[case("chr2 233760498 G A")]
#[case("2-233760498-G-A")]
#[case("NC_000002.12:g.233760498G>A")]
#[case("chr2\t233760498\trs4148323\tG\tA")]
fn test_notations_converge(#[case] line: &str) {
    let batch = processor().process(&[line]);
    let input = &batch.inputs[0];
    assert!(input.is_valid(), "{}: {:?}", line, input.messages);
    assert_eq!(
        input.derived,
        vec![snv(chr(2), 233_760_498, Base::G, Base::A)],
        "{}",
        line
    );
}

#[test]
fn test_unknown_id_is_an_error() {
    let batch = processor().process(&["rs1"]);
    let errors: Vec<_> = batch.inputs[0].errors().map(|m| m.text.clone()).collect();
    assert_eq!(errors, vec!["No genomic mapping found for dbSNP ID rs1".to_string()]);
}

#[test]
fn test_mixed_batch_keeps_order() {
    let lines = [
        "rs4148323",
        "not a variant",
        "P22309 71 Gly Phe",
        "x-149498202-c-g",
    ];
    let batch = processor().process(&lines);
    assert_eq!(batch.total(), 4);
    assert_eq!(batch.error_count(), 1);
    for (i, input) in batch.inputs.iter().enumerate() {
        assert_eq!(input.index, i);
        assert_eq!(input.input, lines[i]);
    }

    // Gly -> Phe needs two changes: positions only
    let non_snv = &batch.inputs[2];
    assert!(non_snv.is_valid());
    assert_eq!(non_snv.derived.len(), 3);
    assert!(non_snv.derived.iter().all(|v| v.alternate.is_none()));
    assert!(non_snv
        .messages
        .iter()
        .any(|m| m.severity == Severity::Info && m.text.contains("single nucleotide change")));
}

// =============================================================================
// Build handling
// =============================================================================

fn grch37_processor(targets: &[u64]) -> Processor<InMemorySource> {
    let mut source = InMemorySource::with_test_data();
    for &target in targets {
        source.add_crossmap(ChrPos::new(chr(7), 1_000), target);
    }
    Processor::with_config(
        source,
        ProcessorConfig::new().with_build(BuildOption::GRCh37),
    )
}

#[test]
fn test_crossmap_no_equivalent() {
    let batch = grch37_processor(&[]).process(&["7 1000 A G"]);
    let input = &batch.inputs[0];
    assert!(!input.is_valid());
    assert!(input.errors().any(|m| m.text.contains("No GRCh38 equivalent")));
    assert_eq!(batch.variants().count(), 0);
}

#[test]
fn test_crossmap_single_equivalent() {
    let batch = grch37_processor(&[2_000]).process(&["7 1000 A G"]);
    let input = &batch.inputs[0];
    assert!(input.is_valid(), "{:?}", input.messages);
    assert_eq!(batch.build.assembly, Assembly::GRCh37);
    assert_eq!(input.genomic().unwrap().converted_from, Some(1_000));
    assert_eq!(input.derived, vec![snv(chr(7), 2_000, Base::A, Base::G)]);
}

#[test]
fn test_crossmap_multiple_equivalents() {
    let batch = grch37_processor(&[2_000, 3_000]).process(&["7 1000 A G"]);
    let input = &batch.inputs[0];
    assert!(!input.is_valid());
    assert!(input
        .errors()
        .any(|m| m.text.contains("Multiple GRCh38 equivalents") && m.text.contains("2000, 3000")));
}

#[test]
fn test_grch37_leaves_protein_inputs_alone() {
    let batch = grch37_processor(&[]).process(&["P22309 71 Gly Arg"]);
    let input = &batch.inputs[0];
    assert!(input.is_valid(), "{:?}", input.messages);
    assert_eq!(input.derived.len(), 2);
}

/// Ten GRCh37 positions whose reference bases only match GRCh37.
fn grch37_batch() -> (InMemorySource, Vec<String>) {
    let mut source = InMemorySource::new();
    let mut lines = Vec::new();
    for i in 0..10u64 {
        let position = 5_000 + i * 10;
        let at = ChrPos::new(chr(3), position);
        source.add_reference_base(Assembly::GRCh37, at, Base::C);
        source.add_reference_base(Assembly::GRCh38, at, Base::T);
        source.add_crossmap(at, position + 100);
        lines.push(format!("3 {} C A", position));
    }
    (source, lines)
}

#[test]
fn test_auto_detects_grch37() {
    let (source, lines) = grch37_batch();
    let config = ProcessorConfig::new()
        .with_build(BuildOption::Auto)
        .with_seed(7);
    let batch = Processor::with_config(source, config).process(&lines);

    assert_eq!(batch.build.assembly, Assembly::GRCh37);
    assert_eq!(batch.build.message.severity, Severity::Info);
    assert_eq!(batch.valid_count(), 10);
    let first = &batch.inputs[0].derived[0];
    assert_eq!(first.position, 5_100);
}

#[test]
fn test_auto_below_minimum_sample_assumes_grch38() {
    let (source, lines) = grch37_batch();
    let config = ProcessorConfig::new()
        .with_build(BuildOption::Auto)
        .with_min_sample(20);
    let batch = Processor::with_config(source, config).process(&lines);

    assert_eq!(batch.build.assembly, Assembly::GRCh38);
    assert!(batch.build.message.text.contains("fewer than the 20"));
    // Not converted
    assert_eq!(batch.inputs[0].derived[0].position, 5_000);
}

#[test]
fn test_auto_inconclusive_split_batch() {
    let (mut source, mut lines) = grch37_batch();
    // Half the batch now matches GRCh38 instead
    for i in 0..10u64 {
        let position = 9_000 + i;
        source.add_reference_base(Assembly::GRCh38, ChrPos::new(chr(3), position), Base::G);
        lines.push(format!("3 {} G T", position));
    }
    let config = ProcessorConfig::new()
        .with_build(BuildOption::Auto)
        .with_seed(1);
    let batch = Processor::with_config(source, config).process(&lines);

    assert_eq!(batch.build.assembly, Assembly::GRCh38);
    assert_eq!(batch.build.message.severity, Severity::Warning);
}

#[test]
fn test_unspecified_build_warns() {
    let batch = processor().process(&["rs4148323"]);
    assert_eq!(batch.build.assembly, Assembly::GRCh38);
    assert_eq!(batch.build.message.severity, Severity::Warning);
}

#[test]
fn test_accession_build_mismatch_warns() {
    let batch = processor().process(&["NC_000002.11:g.233760498G>A"]);
    let input = &batch.inputs[0];
    assert!(input.is_valid());
    assert!(input.warnings().any(|m| m.text.contains("GRCh37")), "{:?}", input.messages);
}

// =============================================================================
// Configuration and output
// =============================================================================

#[test]
fn test_processor_from_toml_config() {
    let config = ProcessorConfig::parse(
        r#"
build = "grch37"

[build-detection]
threshold = 90.0
seed = 3
"#,
    )
    .unwrap();
    assert_eq!(config.build, BuildOption::GRCh37);
    assert_eq!(config.build_detection.threshold, 90.0);
    assert_eq!(config.build_detection.min_sample, 10);

    let batch = Processor::with_config(InMemorySource::with_test_data(), config)
        .process(&["2 234669144 G A"]);
    assert_eq!(
        batch.inputs[0].derived,
        vec![snv(chr(2), 233_760_498, Base::G, Base::A)]
    );
}

#[test]
fn test_custom_source_records() {
    let mut source = InMemorySource::new();
    source.add_id(
        "COSV1",
        IdSource::Cosmic,
        IdRecord::new("17", 7_675_088, "C", "T,A"),
    );
    source.add_codon(
        "P04637",
        273,
        chr(17),
        7_673_801,
        Codon::new(Base::C, Base::G, Base::T),
        true,
        true,
    );
    let batch = Processor::new(source).process(&["COSV1", "P04637 R273H"]);

    assert_eq!(batch.inputs[0].derived.len(), 2);
    // Minus strand: CGT -> CAT at the second base is genomic C -> T
    let r273h = &batch.inputs[1];
    assert!(r273h.is_valid(), "{:?}", r273h.messages);
    assert_eq!(r273h.derived, vec![snv(chr(17), 7_673_802, Base::C, Base::T)]);
}

#[test]
fn test_text_input_and_json_output() {
    let text = "# comment\n\nrs4148323\n\nx-149498202-c-g\n";
    let batch = processor().process_text(text);
    assert_eq!(batch.total(), 2);
    assert_eq!(batch.variants().count(), 2);

    let json = batch.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["inputs"].as_array().unwrap().len(), 2);
    assert_eq!(value["inputs"][0]["format"], "dbsnp");
    assert_eq!(value["build"]["assembly"], "GRCh38");
}
