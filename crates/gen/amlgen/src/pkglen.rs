//! AML `PkgLength` encoding.
//!
//! A package length prefixes every AML object that owns a variable-length
//! body (scopes, devices, methods, buffers, packages, ...). The encoded
//! value counts the length field itself plus everything that follows it
//! inside the object, so the field width depends on the value it encodes.
//!
//! Encoding (ACPI 6.5 §20.2.4):
//! - 1 byte: bits 7:6 are `00`, bits 5:0 hold the value (max `0x3F`).
//! - 2-4 bytes: bits 7:6 of the lead byte hold the count of following
//!   bytes, bits 3:0 hold the low nibble, and each following byte holds the
//!   next 8 bits.

/// Largest value a 4-byte package length can hold.
pub const MAX_PKG_LENGTH: u32 = 0x0FFF_FFFF;

/// A resolved package length: the encoded value and its field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PkgLength {
    value: u32,
    width: u8,
}

impl PkgLength {
    /// Package length of an object with an empty body.
    pub const EMPTY: Self = Self { value: 1, width: 1 };

    /// Returns the number of bytes needed to encode `value`, or `None` if
    /// it exceeds [`MAX_PKG_LENGTH`].
    #[must_use]
    pub const fn width_for(value: u32) -> Option<u8> {
        match value {
            0..=0x3F => Some(1),
            0x40..=0xFFF => Some(2),
            0x1000..=0xF_FFFF => Some(3),
            0x10_0000..=MAX_PKG_LENGTH => Some(4),
            _ => None,
        }
    }

    /// Resolves the package length of an object whose body after the
    /// length field is `payload` bytes long.
    ///
    /// Picks the smallest width `w` such that `payload + w` is encodable in
    /// `w` bytes. Returns `None` if no width fits.
    #[must_use]
    pub fn for_payload(payload: u32) -> Option<Self> {
        for width in 1..=4u8 {
            let value = payload.checked_add(u32::from(width))?;
            if Self::width_for(value)? <= width {
                return Some(Self { value, width });
            }
        }
        None
    }

    /// The encoded value (field width included).
    #[must_use]
    pub const fn value(self) -> u32 {
        self.value
    }

    /// The width of the length field in bytes (1-4).
    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    /// The number of body bytes following the length field.
    #[must_use]
    pub const fn payload(self) -> u32 {
        self.value - self.width as u32
    }

    /// Encodes the length field.
    ///
    /// Returns the raw bytes and how many of them are in use.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(self) -> ([u8; 4], usize) {
        let mut out = [0u8; 4];
        let width = usize::from(self.width);
        if width == 1 {
            out[0] = self.value as u8;
        } else {
            out[0] = ((self.width - 1) << 6) | (self.value & 0x0F) as u8;
            for (i, byte) in out[1..width].iter_mut().enumerate() {
                *byte = (self.value >> (4 + i * 8)) as u8;
            }
        }
        (out, width)
    }
}
