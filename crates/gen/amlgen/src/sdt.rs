//! System Description Table (SDT) header and checksum utilities.

/// Standard ACPI System Description Table header.
///
/// This 36-byte header precedes the AML body of every DSDT and SSDT. The
/// serializer writes it verbatim except for `length` and `checksum`, which
/// are derived from the encoded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    /// 4-byte ASCII signature identifying the table type.
    pub signature: [u8; 4],
    /// Total length of the table, including the header, in bytes.
    ///
    /// Zero means the length has not been stamped yet.
    pub length: u32,
    /// Revision of the table structure.
    pub revision: u8,
    /// Checksum byte. The entire table, including the header, must sum to zero.
    pub checksum: u8,
    /// OEM-supplied identification string.
    pub oem_id: [u8; 6],
    /// OEM-supplied table identification string.
    pub oem_table_id: [u8; 8],
    /// OEM-supplied revision number.
    pub oem_revision: u32,
    /// Vendor ID of the utility that created the table.
    pub creator_id: u32,
    /// Revision of the utility that created the table.
    pub creator_revision: u32,
}

impl TableHeader {
    /// The size of an SDT header in bytes.
    pub const SIZE: usize = 36;

    /// Byte offset of the `length` field.
    pub const LENGTH_OFFSET: usize = 4;

    /// Byte offset of the `checksum` field.
    pub const CHECKSUM_OFFSET: usize = 9;

    /// Creates a header with the given signature and revision.
    ///
    /// OEM and creator fields are zero-filled; `length` is left unstamped.
    #[must_use]
    pub const fn new(signature: [u8; 4], revision: u8) -> Self {
        Self {
            signature,
            length: 0,
            revision,
            checksum: 0,
            oem_id: [0; 6],
            oem_table_id: [0; 8],
            oem_revision: 0,
            creator_id: 0,
            creator_revision: 0,
        }
    }

    /// Sets the OEM identification fields.
    #[must_use]
    pub const fn with_oem(
        mut self,
        oem_id: [u8; 6],
        oem_table_id: [u8; 8],
        oem_revision: u32,
    ) -> Self {
        self.oem_id = oem_id;
        self.oem_table_id = oem_table_id;
        self.oem_revision = oem_revision;
        self
    }

    /// Sets the creator identification fields.
    #[must_use]
    pub const fn with_creator(mut self, creator_id: u32, creator_revision: u32) -> Self {
        self.creator_id = creator_id;
        self.creator_revision = creator_revision;
        self
    }

    /// Encodes the header into its little-endian on-disk layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.signature);
        let length = Self::LENGTH_OFFSET..Self::LENGTH_OFFSET + 4;
        out[length].copy_from_slice(&self.length.to_le_bytes());
        out[8] = self.revision;
        out[Self::CHECKSUM_OFFSET] = self.checksum;
        out[10..16].copy_from_slice(&self.oem_id);
        out[16..24].copy_from_slice(&self.oem_table_id);
        out[24..28].copy_from_slice(&self.oem_revision.to_le_bytes());
        out[28..32].copy_from_slice(&self.creator_id.to_le_bytes());
        out[32..36].copy_from_slice(&self.creator_revision.to_le_bytes());
        out
    }

    /// Read a [`TableHeader`] from a byte slice.
    ///
    /// Returns `None` if the slice is shorter than [`TableHeader::SIZE`] bytes.
    #[must_use]
    pub fn read_from_bytes(data: &[u8]) -> Option<Self> {
        let data = data.get(..Self::SIZE)?;
        let u32_at = |off: usize| {
            u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
        };

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&data[0..4]);
        let mut oem_id = [0u8; 6];
        oem_id.copy_from_slice(&data[10..16]);
        let mut oem_table_id = [0u8; 8];
        oem_table_id.copy_from_slice(&data[16..24]);

        Some(Self {
            signature,
            length: u32_at(Self::LENGTH_OFFSET),
            revision: data[8],
            checksum: data[Self::CHECKSUM_OFFSET],
            oem_id,
            oem_table_id,
            oem_revision: u32_at(24),
            creator_id: u32_at(28),
            creator_revision: u32_at(32),
        })
    }

    /// Returns the 4-byte signature.
    #[must_use]
    pub fn signature(&self) -> [u8; 4] {
        self.signature
    }

    /// Returns the total length of this table (header included).
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns `true` once a table length has been recorded in the header.
    #[must_use]
    pub fn is_stamped(&self) -> bool {
        self.length != 0
    }
}

/// Computes the checksum byte for `data`.
///
/// Returns the value that, added to the wrapping byte sum of `data`, yields
/// zero. When `data` already contains a zeroed checksum field, storing the
/// result there makes the whole table valid.
#[must_use]
pub fn compute_checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    sum.wrapping_neg()
}

/// Validate the checksum of a byte slice.
///
/// ACPI tables are designed so that the sum of all bytes in the table equals
/// zero (mod 256). This function computes that sum and returns `true` when
/// the checksum is valid.
#[must_use]
pub fn validate_checksum(data: &[u8]) -> bool {
    compute_checksum(data) == 0
}
