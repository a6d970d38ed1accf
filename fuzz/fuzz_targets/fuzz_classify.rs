//! Fuzz target for the input classifier
//!
//! This target feeds arbitrary byte strings to the classifier to find
//! panics in any of the format grammars.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Don't fuzz extremely long inputs - diminishing returns
        if input.len() > 1000 {
            return;
        }

        // Every line yields exactly one input, valid or not
        let parsed = ferro_varmap::classify_and_parse(0, input);
        assert_eq!(parsed.is_valid(), parsed.parsed.is_some());
    }
});
