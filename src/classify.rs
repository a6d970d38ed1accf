// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Input classification and dispatch.
//!
//! [`GRAMMARS`] is the single place where precedence between notations is
//! decided: entries are tried in order and the first whose structural check
//! accepts the line parses it. Identifier grammars only ever see single
//! words, which keeps e.g. `rs123:g.1A>G` a (malformed) dbSNP ID rather
//! than an HGVS expression.
//!
//! # Example
//!
//! ```
//! use ferro_varmap::classify::classify_and_parse;
//! use ferro_varmap::format::VariantFormat;
//!
//! let input = classify_and_parse(0, "x-149498202-c-g");
//! assert_eq!(input.format, VariantFormat::Gnomad);
//! assert!(input.is_valid());
//! ```

use memchr::memchr3;

use crate::format::{genomic, gnomad, hgvs, ids, protein, vcf, VariantFormat};
use crate::input::VariantInput;

/// One entry of the dispatch table.
#[derive(Clone, Copy)]
pub struct Grammar {
    /// Name used in logs and tests
    pub name: &'static str,
    /// Only offered lines without whitespace
    pub single_word_only: bool,
    /// Cheap structural check
    pub matches: fn(&str) -> bool,
    /// Content-validating parse
    pub parse: fn(usize, &str) -> VariantInput,
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("single_word_only", &self.single_word_only)
            .finish()
    }
}

/// Grammars in precedence order.
pub const GRAMMARS: &[Grammar] = &[
    Grammar {
        name: "dbsnp",
        single_word_only: true,
        matches: ids::matches_dbsnp,
        parse: ids::parse_dbsnp,
    },
    Grammar {
        name: "clinvar",
        single_word_only: true,
        matches: ids::matches_clinvar,
        parse: ids::parse_clinvar,
    },
    Grammar {
        name: "cosmic",
        single_word_only: true,
        matches: ids::matches_cosmic,
        parse: ids::parse_cosmic,
    },
    Grammar {
        name: "hgvs",
        single_word_only: false,
        matches: hgvs::matches,
        parse: hgvs::parse,
    },
    Grammar {
        name: "protein",
        single_word_only: false,
        matches: protein::matches,
        parse: protein::parse,
    },
    Grammar {
        name: "gnomad",
        single_word_only: false,
        matches: gnomad::matches,
        parse: gnomad::parse,
    },
    Grammar {
        name: "vcf",
        single_word_only: false,
        matches: vcf::matches,
        parse: vcf::parse,
    },
    Grammar {
        name: "genomic",
        single_word_only: false,
        matches: genomic::matches,
        parse: genomic::parse,
    },
];

/// True if the line contains no whitespace.
fn is_single_word(line: &str) -> bool {
    let bytes = line.as_bytes();
    memchr3(b' ', b'\t', b'\n', bytes).is_none() && !bytes.contains(&b'\r')
}

/// The grammar that will handle `line`, if any.
pub fn select_grammar(line: &str) -> Option<&'static Grammar> {
    let single_word = is_single_word(line);
    GRAMMARS
        .iter()
        .filter(|g| single_word || !g.single_word_only)
        .find(|g| (g.matches)(line))
}

/// Classify a trimmed, non-empty, non-comment line and parse it.
///
/// Never fails: a line no grammar accepts becomes an [`VariantFormat::Invalid`]
/// input whose message reports it as a malformed genomic variant, genomic
/// input being by far the most common kind.
pub fn classify_and_parse(index: usize, line: &str) -> VariantInput {
    let line = line.trim();
    match select_grammar(line) {
        Some(grammar) => {
            log::trace!("input {} matched grammar {}", index, grammar.name);
            (grammar.parse)(index, line)
        }
        None => VariantInput::invalid(
            index,
            line,
            VariantFormat::Invalid,
            format!(
                "Input '{}' could not be parsed as a genomic variant; expected e.g. 'chr1 12345 A G'",
                line
            ),
        ),
    }
}

/// Classify a batch of lines, in parallel when the `parallel` feature is on.
///
/// The result is in input order; each input's `index` is its position in
/// `lines`.
pub fn classify_lines<S: AsRef<str> + Sync>(lines: &[S]) -> Vec<VariantInput> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        lines
            .par_iter()
            .enumerate()
            .map(|(i, line)| classify_and_parse(i, line.as_ref()))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| classify_and_parse(i, line.as_ref()))
            .collect()
    }
}

/// Split raw text into classifiable lines, dropping blanks and `#` comments.
///
/// Returns the trimmed lines in order.
pub fn input_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect()
}
