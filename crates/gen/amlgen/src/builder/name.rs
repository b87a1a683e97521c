//! AML name segments and name strings.
//!
//! ACPI names are composed of 4-byte segments. A name string is an optional
//! root (`\`) or parent (`^`) prefix followed by zero, one, two (dual) or
//! more (multi) segments.

use alloc::vec::Vec;

use super::BuildError;
use crate::opcode::{DUAL_NAME_PREFIX, MULTI_NAME_PREFIX, PARENT_PREFIX_CHAR, ROOT_CHAR};

/// A 4-byte AML name segment (e.g., `_SB_`, `PCI0`, `_HID`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NameSeg(pub [u8; 4]);

impl NameSeg {
    /// Creates a segment from a 1-4 character name, padding with `_`.
    ///
    /// Lowercase letters are folded to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if the name is empty, longer than
    /// four characters, starts with a digit, or contains a character other
    /// than `A-Z`, `0-9` and `_`.
    pub fn new(name: &str) -> Result<Self, BuildError> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 {
            return Err(BuildError::InvalidName);
        }

        let mut seg = [b'_'; 4];
        for (i, &c) in bytes.iter().enumerate() {
            let c = c.to_ascii_uppercase();
            let valid = match c {
                b'A'..=b'Z' | b'_' => true,
                b'0'..=b'9' => i > 0,
                _ => false,
            };
            if !valid {
                return Err(BuildError::InvalidName);
            }
            seg[i] = c;
        }
        Ok(Self(seg))
    }

    /// Returns the name as a UTF-8 string (ACPI names are always ASCII).
    #[must_use]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl core::fmt::Debug for NameSeg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NameSeg(\"{}\")", self.as_str())
    }
}

impl core::fmt::Display for NameSeg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encodes an ASL-style path such as `\_SB.PCI0`, `^^FOO` or `_HID` as an
/// AML `NameString`.
///
/// A path consisting only of a prefix (e.g. `\`) encodes the null name.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] for an empty path, a malformed
/// segment, a root prefix combined with parent prefixes, or more than 255
/// segments.
pub fn encode_name_string(path: &str) -> Result<Vec<u8>, BuildError> {
    if path.is_empty() {
        return Err(BuildError::InvalidName);
    }

    let mut out = Vec::new();
    let rest = if let Some(rest) = path.strip_prefix('\\') {
        out.push(ROOT_CHAR);
        rest
    } else {
        let trimmed = path.trim_start_matches('^');
        out.resize(path.len() - trimmed.len(), PARENT_PREFIX_CHAR);
        trimmed
    };
    if rest.starts_with(['\\', '^']) {
        return Err(BuildError::InvalidName);
    }

    if rest.is_empty() {
        out.push(0x00);
        return Ok(out);
    }

    let segments = rest
        .split('.')
        .map(NameSeg::new)
        .collect::<Result<Vec<_>, _>>()?;

    match segments.len() {
        1 => {}
        2 => out.push(DUAL_NAME_PREFIX),
        n => {
            let count = u8::try_from(n).map_err(|_| BuildError::InvalidName)?;
            out.push(MULTI_NAME_PREFIX);
            out.push(count);
        }
    }
    for seg in &segments {
        out.extend_from_slice(&seg.0);
    }
    Ok(out)
}
