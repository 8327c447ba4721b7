//! Fuzz target for the command record decoder.
//!
//! Run with: cargo +nightly fuzz run fuzz_wire_decode
//!
//! Feeds arbitrary byte sequences to `Command::from_bytes()` and
//! re-encodes anything that decodes, checking the round trip holds.

#![no_main]

use libfuzzer_sys::fuzz_target;

use fabricadm_core::Command;

fuzz_target!(|data: &[u8]| {
    if let Some(cmd) = Command::from_bytes(data) {
        let encoded = cmd.to_bytes();
        assert_eq!(encoded.as_slice(), data);
        let _ = cmd.ifname();
    }
});
