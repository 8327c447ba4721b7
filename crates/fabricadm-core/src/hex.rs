//! Flexible hexadecimal identifier parsing.
//!
//! Fabric identifiers are fixed-width values that users enter in several
//! textual shapes: a bare hex integer (`1a2b3c`), or byte groups joined
//! by a single repeated separator (`1a:2b:3c`, `1a-2b-3c`). The
//! separator is inferred from whichever of `:` or `-` follows the first
//! group, and every later group must use the same one. Leading zeros in
//! a group may be omitted.

/// Maximum identifier width in bytes (a full `u64`).
pub const MAX_HEX_WIDTH: usize = 8;

/// Errors from identifier parsing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum HexParseError {
    #[error("identifier is not valid hexadecimal")]
    InvalidFormat,

    #[error("identifier does not fit in {width} bytes")]
    TooWide { width: usize },

    #[error("expected {expected} byte groups, found {found}")]
    GroupCount { expected: usize, found: usize },

    #[error("unsupported identifier width {0} (must be 1..=8 bytes)")]
    BadWidth(usize),
}

/// Parse a user-entered hex identifier of exactly `width` bytes.
///
/// Accepted shapes, tried in order:
///
/// 1. A single separator-free token, parsed as one hex integer. Accepted
///    only if the value fits in `width` bytes (any `u64` is accepted
///    when `width` is 8).
/// 2. Exactly `width` hex byte groups (each 0–255) joined by a
///    consistent `:` or `-` separator.
///
/// Anything else — inconsistent separators, empty groups, wrong group
/// counts, trailing garbage — is rejected.
pub fn parse_hex(input: &str, width: usize) -> Result<u64, HexParseError> {
    if !(1..=MAX_HEX_WIDTH).contains(&width) {
        return Err(HexParseError::BadWidth(width));
    }
    if input.is_empty() {
        return Err(HexParseError::InvalidFormat);
    }

    // The separator is whichever of ':' or '-' appears first; its
    // absence selects the single-token form.
    let Some(sep_pos) = input.find([':', '-']) else {
        let value = u64::from_str_radix(input, 16).map_err(|_| HexParseError::InvalidFormat)?;
        if width < MAX_HEX_WIDTH && value >= 1u64 << (8 * width) {
            return Err(HexParseError::TooWide { width });
        }
        return Ok(value);
    };

    let sep = input[sep_pos..]
        .chars()
        .next()
        .ok_or(HexParseError::InvalidFormat)?;

    let mut value: u64 = 0;
    let mut groups = 0usize;
    for group in input.split(sep) {
        // A group using the other separator, or an empty group, fails
        // here as non-hex.
        let byte = u8::from_str_radix(group, 16).map_err(|_| HexParseError::InvalidFormat)?;
        value = (value << 8) | u64::from(byte);
        groups += 1;
    }

    if groups != width {
        return Err(HexParseError::GroupCount {
            expected: width,
            found: groups,
        });
    }

    Ok(value)
}

/// Parse a 3-byte (24-bit) fabric port identifier.
pub fn parse_port_id(input: &str) -> Result<u32, HexParseError> {
    parse_hex(input, 3).map(|v| v as u32)
}
