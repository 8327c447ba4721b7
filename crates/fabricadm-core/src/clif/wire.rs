//! Control-interface wire format.
//!
//! A command is a single fixed-size binary record: a 32-bit action tag
//! followed by a NUL-padded interface-name field. The fixed record size
//! is the framing — no header, no length prefix, no checksum. The tag is
//! native-endian: the daemon always runs on the same host.
//!
//! Replies are an ASCII decimal status code in a single datagram; the
//! buffer is terminated before being parsed, and unparseable output
//! reduces to 0.

/// Interface-name field size, including the terminating NUL
/// (Linux `IFNAMSIZ`).
pub const IFNAME_SIZE: usize = 16;

/// Size of the encoded command record on the wire.
pub const COMMAND_WIRE_SIZE: usize = 4 + IFNAME_SIZE;

/// Maximum reply datagram the client will accept.
pub const MAX_REPLY_SIZE: usize = 512;

/// Lifecycle actions understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Action {
    /// Instantiate the bridge on an interface.
    Create = 1,
    /// Tear the bridge down on an interface.
    Destroy = 2,
    /// Reset the fabric host bound to an interface.
    Reset = 3,
}

impl Action {
    fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Action::Create),
            2 => Some(Action::Destroy),
            3 => Some(Action::Reset),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Destroy => "destroy",
            Action::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// A fixed-size lifecycle command record.
///
/// Always transmitted at its full [`COMMAND_WIRE_SIZE`] regardless of
/// how long the interface name actually is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    action: Action,
    ifname: [u8; IFNAME_SIZE],
}

impl Command {
    /// Build a command for `action` on `ifname`.
    ///
    /// The name is copied with a bounded copy that never overruns the
    /// field: at most `IFNAME_SIZE - 1` bytes, silently truncated, so
    /// the field always ends in NUL. Callers are expected to have
    /// validated the length upstream; truncation is not re-validated
    /// here for compatibility with the daemon's legacy record layout.
    pub fn new(action: Action, ifname: &str) -> Self {
        let mut field = [0u8; IFNAME_SIZE];
        let bytes = ifname.as_bytes();
        let len = bytes.len().min(IFNAME_SIZE - 1);
        field[..len].copy_from_slice(&bytes[..len]);
        Self {
            action,
            ifname: field,
        }
    }

    /// The action tag.
    pub fn action(&self) -> Action {
        self.action
    }

    /// The interface name as stored in the record (up to the first NUL).
    pub fn ifname(&self) -> &str {
        let end = self
            .ifname
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(IFNAME_SIZE);
        // The constructor only copies from a &str, so this is UTF-8.
        std::str::from_utf8(&self.ifname[..end]).unwrap_or("")
    }

    /// Encode the full fixed-size record.
    pub fn to_bytes(&self) -> [u8; COMMAND_WIRE_SIZE] {
        let mut buf = [0u8; COMMAND_WIRE_SIZE];
        buf[..4].copy_from_slice(&(self.action as u32).to_ne_bytes());
        buf[4..].copy_from_slice(&self.ifname);
        buf
    }

    /// Decode a record previously produced by [`Command::to_bytes`].
    ///
    /// Returns `None` for short records or unknown action tags.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != COMMAND_WIRE_SIZE {
            return None;
        }
        let tag = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let action = Action::from_tag(tag)?;
        let mut ifname = [0u8; IFNAME_SIZE];
        ifname.copy_from_slice(&bytes[4..]);
        Some(Self { action, ifname })
    }
}

/// A reply datagram from the daemon.
#[derive(Debug, Clone)]
pub struct Reply {
    buf: Vec<u8>,
}

impl Reply {
    /// Wrap the bytes of one received datagram.
    ///
    /// Anything beyond [`MAX_REPLY_SIZE`] is dropped; the receive path
    /// never reads more than that anyway.
    pub fn new(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_REPLY_SIZE);
        Self {
            buf: bytes[..len].to_vec(),
        }
    }

    /// The raw reply bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Reduce the reply to an integer status.
    ///
    /// The buffer is terminated at its first NUL (the read may return
    /// fewer bytes than the daemon formatted) and the remainder parsed
    /// as a base-10 integer. Non-numeric or empty output parses to 0.
    pub fn status(&self) -> i32 {
        let end = self.buf.iter().position(|&b| b == 0).unwrap_or(self.buf.len());
        ascii_to_i32(&self.buf[..end])
    }
}

/// C `atoi` semantics: skip leading whitespace, take an optional sign and
/// then every leading decimal digit; no digits means 0. Out-of-range
/// values saturate.
fn ascii_to_i32(bytes: &[u8]) -> i32 {
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        negative = bytes[i] == b'-';
        i += 1;
    }
    let mut value: i64 = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value * 10 + i64::from(bytes[i] - b'0');
        if value > i64::from(u32::MAX) {
            return if negative { i32::MIN } else { i32::MAX };
        }
        i += 1;
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_size_is_fixed() {
        let cmd = Command::new(Action::Create, "eth0");
        assert_eq!(cmd.to_bytes().len(), COMMAND_WIRE_SIZE);
        assert_eq!(COMMAND_WIRE_SIZE, 20);
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(Action::Create as u32, 1);
        assert_eq!(Action::Destroy as u32, 2);
        assert_eq!(Action::Reset as u32, 3);
    }

    #[test]
    fn test_roundtrip() {
        let cmd = Command::new(Action::Destroy, "eth2");
        let decoded = Command::from_bytes(&cmd.to_bytes()).unwrap();
        assert_eq!(decoded, cmd);
        assert_eq!(decoded.action(), Action::Destroy);
        assert_eq!(decoded.ifname(), "eth2");
    }

    #[test]
    fn test_roundtrip_name_at_capacity() {
        // 15 bytes is the longest representable name.
        let name = "abcdefghijklmno";
        assert_eq!(name.len(), IFNAME_SIZE - 1);
        let cmd = Command::new(Action::Reset, name);
        let bytes = cmd.to_bytes();
        let decoded = Command::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.ifname(), name);
        assert_eq!(bytes, decoded.to_bytes());
    }

    #[test]
    fn test_oversized_name_truncated_not_rejected() {
        let cmd = Command::new(Action::Create, "abcdefghijklmnop");
        assert_eq!(cmd.ifname(), "abcdefghijklmno");
        // Field still ends in NUL
        assert_eq!(cmd.to_bytes()[COMMAND_WIRE_SIZE - 1], 0);
    }

    #[test]
    fn test_name_field_nul_padded() {
        let cmd = Command::new(Action::Create, "em1");
        let bytes = cmd.to_bytes();
        assert_eq!(&bytes[4..7], b"em1");
        assert!(bytes[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_rejects_short_record() {
        assert!(Command::from_bytes(&[0u8; COMMAND_WIRE_SIZE - 1]).is_none());
        assert!(Command::from_bytes(&[]).is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let mut bytes = Command::new(Action::Create, "eth0").to_bytes();
        bytes[..4].copy_from_slice(&99u32.to_ne_bytes());
        assert!(Command::from_bytes(&bytes).is_none());
    }

    // ── Reply reduction ───────────────────────────────────────────────

    #[test]
    fn test_reply_numeric() {
        assert_eq!(Reply::new(b"0").status(), 0);
        assert_eq!(Reply::new(b"17").status(), 17);
        assert_eq!(Reply::new(b"-22").status(), -22);
    }

    #[test]
    fn test_reply_leading_whitespace() {
        assert_eq!(Reply::new(b"  7").status(), 7);
    }

    #[test]
    fn test_reply_trailing_garbage_ignored() {
        assert_eq!(Reply::new(b"12 ok").status(), 12);
    }

    #[test]
    fn test_reply_non_numeric_is_zero() {
        assert_eq!(Reply::new(b"nonsense").status(), 0);
        assert_eq!(Reply::new(b"   ").status(), 0);
        assert_eq!(Reply::new(b"").status(), 0);
    }

    #[test]
    fn test_reply_stops_at_nul() {
        assert_eq!(Reply::new(b"4\0junk9").status(), 4);
    }

    #[test]
    fn test_reply_oversize_capped() {
        let big = vec![b'7'; MAX_REPLY_SIZE * 2];
        let reply = Reply::new(&big);
        assert_eq!(reply.bytes().len(), MAX_REPLY_SIZE);
    }
}
