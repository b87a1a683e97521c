//! Compressed EISA/PnP identifiers (the ASL `EisaId()` macro).

use super::BuildError;

/// A compressed EISA/PnP device identifier.
///
/// The 3-letter manufacturer code is packed 5 bits per letter into the upper
/// 16 bits and the product ID into the lower 16 bits of a big-endian dword.
/// AML stores the byte-swapped value as a little-endian `DWordConst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EisaId {
    /// The raw 32-bit value as it appears in AML.
    pub raw: u32,
}

impl EisaId {
    /// Compresses a 7-character ID such as `"PNP0A03"`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidEisaId`] unless `id` is three uppercase
    /// letters followed by four hexadecimal digits.
    pub fn new(id: &str) -> Result<Self, BuildError> {
        let bytes: &[u8; 7] = id
            .as_bytes()
            .try_into()
            .map_err(|_| BuildError::InvalidEisaId)?;

        let mut compressed = 0u32;
        for &c in &bytes[..3] {
            if !c.is_ascii_uppercase() {
                return Err(BuildError::InvalidEisaId);
            }
            compressed = (compressed << 5) | u32::from(c - b'@');
        }
        for &c in &bytes[3..] {
            let nibble = char::from(c).to_digit(16).ok_or(BuildError::InvalidEisaId)?;
            compressed = (compressed << 4) | nibble;
        }

        Ok(Self {
            raw: compressed.swap_bytes(),
        })
    }

    /// Decodes the EISA ID into a 7-character ASCII string (e.g., `"PNP0A03"`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(&self) -> [u8; 7] {
        let swapped = self.raw.swap_bytes();
        let letter = |shift: u32| (((swapped >> shift) & 0x1F) as u8) + b'@';
        let hex = |shift: u32| {
            let nibble = ((swapped >> shift) & 0xF) as u8;
            if nibble < 10 { b'0' + nibble } else { b'A' + nibble - 10 }
        };
        [letter(26), letter(21), letter(16), hex(12), hex(8), hex(4), hex(0)]
    }
}
