//! Fuzz target for the hexadecimal identifier parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_hex_parser
//!
//! This exercises `parse_hex()` at every supported width with arbitrary
//! input to find panics or hangs in the group-scanning logic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for width in 0..=9 {
            // We don't care about the result — just that it doesn't panic
            let _ = fabricadm_core::parse_hex(s, width);
        }
    }
});
