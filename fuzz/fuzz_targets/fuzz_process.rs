//! Fuzz target for whole-batch processing
//!
//! Splits the input into lines and runs them through the processor with
//! the bundled in-memory source.

#![no_main]

use ferro_varmap::{InMemorySource, Processor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.len() > 4000 {
            return;
        }

        let batch = Processor::new(InMemorySource::with_test_data()).process_text(text);
        assert_eq!(batch.total(), batch.valid_count() + batch.error_count());
    }
});
