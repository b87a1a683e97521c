//! AML opcode and prefix byte values (ACPI 6.5 §20.3).

/// `ZeroOp`.
pub const ZERO_OP: u8 = 0x00;
/// `OneOp`.
pub const ONE_OP: u8 = 0x01;
/// `AliasOp`.
pub const ALIAS_OP: u8 = 0x06;
/// `NameOp`.
pub const NAME_OP: u8 = 0x08;
/// `BytePrefix`.
pub const BYTE_PREFIX: u8 = 0x0A;
/// `WordPrefix`.
pub const WORD_PREFIX: u8 = 0x0B;
/// `DWordPrefix`.
pub const DWORD_PREFIX: u8 = 0x0C;
/// `StringPrefix`.
pub const STRING_PREFIX: u8 = 0x0D;
/// `QWordPrefix`.
pub const QWORD_PREFIX: u8 = 0x0E;
/// `ScopeOp`.
pub const SCOPE_OP: u8 = 0x10;
/// `BufferOp`.
pub const BUFFER_OP: u8 = 0x11;
/// `PackageOp`.
pub const PACKAGE_OP: u8 = 0x12;
/// `VarPackageOp`.
pub const VAR_PACKAGE_OP: u8 = 0x13;
/// `MethodOp`.
pub const METHOD_OP: u8 = 0x14;
/// `DualNamePrefix`.
pub const DUAL_NAME_PREFIX: u8 = 0x2E;
/// `MultiNamePrefix`.
pub const MULTI_NAME_PREFIX: u8 = 0x2F;
/// `ExtOpPrefix`. Objects using it carry a second opcode byte.
pub const EXT_OP_PREFIX: u8 = 0x5B;
/// `RootChar` (`\`).
pub const ROOT_CHAR: u8 = b'\\';
/// `ParentPrefixChar` (`^`).
pub const PARENT_PREFIX_CHAR: u8 = b'^';
/// `Local0Op`. `Local1`-`Local7` follow consecutively.
pub const LOCAL0_OP: u8 = 0x60;
/// `Arg0Op`. `Arg1`-`Arg6` follow consecutively.
pub const ARG0_OP: u8 = 0x68;
/// `StoreOp`.
pub const STORE_OP: u8 = 0x70;
/// `IfOp`.
pub const IF_OP: u8 = 0xA0;
/// `ElseOp`.
pub const ELSE_OP: u8 = 0xA1;
/// `WhileOp`.
pub const WHILE_OP: u8 = 0xA2;
/// `NoopOp`.
pub const NOOP_OP: u8 = 0xA3;
/// `ReturnOp`.
pub const RETURN_OP: u8 = 0xA4;
/// `OnesOp`.
pub const ONES_OP: u8 = 0xFF;

/// Sub-opcodes following [`EXT_OP_PREFIX`].
pub mod ext {
    /// `MutexOp`.
    pub const MUTEX_OP: u8 = 0x01;
    /// `EventOp`.
    pub const EVENT_OP: u8 = 0x02;
    /// `RevisionOp`.
    pub const REVISION_OP: u8 = 0x30;
    /// `OpRegionOp`.
    pub const OP_REGION_OP: u8 = 0x80;
    /// `FieldOp`.
    pub const FIELD_OP: u8 = 0x81;
    /// `DeviceOp`.
    pub const DEVICE_OP: u8 = 0x82;
    /// `ProcessorOp`.
    pub const PROCESSOR_OP: u8 = 0x83;
    /// `PowerResOp`.
    pub const POWER_RES_OP: u8 = 0x84;
    /// `ThermalZoneOp`.
    pub const THERMAL_ZONE_OP: u8 = 0x85;
    /// `IndexFieldOp`.
    pub const INDEX_FIELD_OP: u8 = 0x86;
    /// `BankFieldOp`.
    pub const BANK_FIELD_OP: u8 = 0x87;
}

/// Returns `true` if the encoding of `opcode` (and `sub_opcode` for
/// extended opcodes) begins with a `PkgLength` after the opcode bytes.
#[must_use]
pub const fn has_pkg_length(opcode: u8, sub_opcode: Option<u8>) -> bool {
    match (opcode, sub_opcode) {
        (SCOPE_OP | BUFFER_OP | PACKAGE_OP | VAR_PACKAGE_OP | METHOD_OP, None)
        | (IF_OP | ELSE_OP | WHILE_OP, None) => true,
        (
            EXT_OP_PREFIX,
            Some(
                ext::FIELD_OP
                | ext::DEVICE_OP
                | ext::PROCESSOR_OP
                | ext::POWER_RES_OP
                | ext::THERMAL_ZONE_OP
                | ext::INDEX_FIELD_OP
                | ext::BANK_FIELD_OP,
            ),
        ) => true,
        _ => false,
    }
}
