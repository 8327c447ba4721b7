//! Filesystem capability checks.
//!
//! Thin wrappers over the sysfs layout the kernel exposes: whether the
//! management support directories exist, and whether a user-supplied
//! interface name is syntactically plausible before it goes anywhere
//! near the wire.

use std::path::Path;

use fabricadm_config::SysfsConfig;

/// Longest valid interface name, excluding the terminating NUL.
pub const IFNAME_MAX: usize = crate::clif::wire::IFNAME_SIZE - 1;

/// Does `path` exist and is it a directory?
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Syntactic validity of an interface name, per the kernel's rules:
/// non-empty, at most [`IFNAME_MAX`] bytes, no `/`, no whitespace or
/// control characters, and not `.` or `..`.
pub fn ifname_valid(name: &str) -> bool {
    if name.is_empty() || name.len() > IFNAME_MAX {
        return false;
    }
    if name == "." || name == ".." {
        return false;
    }
    name.chars()
        .all(|c| c != '/' && !c.is_whitespace() && !c.is_control())
}

/// Combined check used by the query paths: the name must be valid and a
/// device directory for it must exist under the network class tree.
pub fn validate_interface(sysfs: &SysfsConfig, name: &str) -> bool {
    ifname_valid(name) && dir_exists(&sysfs.net_class.join(name))
}
