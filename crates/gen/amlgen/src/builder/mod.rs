//! Helpers that assemble common AML terms as [`Node`] trees.
//!
//! Every helper returns ordinary nodes; the serializer has no knowledge of
//! this module. Named objects take ASL-style paths (`\_SB.PCI0`, `_HID`)
//! and encode them with [`encode_name_string`].

pub mod eisa;
pub mod name;
pub mod resource;

use alloc::vec::Vec;

pub use eisa::EisaId;
pub use name::{NameSeg, encode_name_string};
pub use resource::{END_TAG, ResourceDescriptor, encode_template};

use crate::node::{DataNode, Node, ObjectNode, RootNode};
use crate::opcode;
use crate::sdt::TableHeader;

/// Largest argument count an AML control method can declare.
pub const MAX_METHOD_ARGS: usize = 7;

/// Errors produced while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// A name segment or name path is malformed.
    InvalidName,
    /// A string literal contains NUL or non-ASCII characters.
    InvalidString,
    /// An EISA ID is not three uppercase letters and four hex digits.
    InvalidEisaId,
    /// A resource descriptor field is out of range.
    InvalidResource,
    /// A method declares or is called with more than seven arguments.
    TooManyArguments,
    /// A method sync level is above 15.
    InvalidSyncLevel,
    /// A package has more than 255 elements.
    TooLarge,
}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::InvalidName => "invalid AML name",
            Self::InvalidString => "invalid AML string literal",
            Self::InvalidEisaId => "invalid EISA ID",
            Self::InvalidResource => "invalid resource descriptor",
            Self::TooManyArguments => "too many method arguments",
            Self::InvalidSyncLevel => "method sync level out of range",
            Self::TooLarge => "package has too many elements",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for BuildError {}

fn data(bytes: Vec<u8>) -> Node {
    Node::Data(DataNode::new(bytes))
}

/// Encodes `path` as a `NameString` data node.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] if the path is malformed.
pub fn name_string(path: &str) -> Result<Node, BuildError> {
    encode_name_string(path).map(data)
}

/// Encodes an integer constant in its shortest form.
///
/// 0, 1 and `u64::MAX` become `ZeroOp`, `OneOp` and `OnesOp`; anything else
/// becomes the smallest of `ByteConst`, `WordConst`, `DWordConst` and
/// `QWordConst` that holds it.
#[must_use]
pub fn integer(value: u64) -> Node {
    match value {
        0 => ObjectNode::new(opcode::ZERO_OP).into(),
        1 => ObjectNode::new(opcode::ONE_OP).into(),
        u64::MAX => ObjectNode::new(opcode::ONES_OP).into(),
        _ => {
            let (prefix, width) = if value <= u64::from(u8::MAX) {
                (opcode::BYTE_PREFIX, 1)
            } else if value <= u64::from(u16::MAX) {
                (opcode::WORD_PREFIX, 2)
            } else if value <= u64::from(u32::MAX) {
                (opcode::DWORD_PREFIX, 4)
            } else {
                (opcode::QWORD_PREFIX, 8)
            };
            let mut bytes = Vec::with_capacity(1 + width);
            bytes.push(prefix);
            bytes.extend_from_slice(&value.to_le_bytes()[..width]);
            data(bytes)
        }
    }
}

/// Encodes `value` as a `DWordConst` regardless of magnitude.
#[must_use]
pub fn dword(value: u32) -> Node {
    let mut bytes = Vec::with_capacity(5);
    bytes.push(opcode::DWORD_PREFIX);
    bytes.extend_from_slice(&value.to_le_bytes());
    data(bytes)
}

/// Encodes a NUL-terminated `String` constant.
///
/// # Errors
///
/// Returns [`BuildError::InvalidString`] if `value` contains NUL or
/// non-ASCII characters.
pub fn string(value: &str) -> Result<Node, BuildError> {
    if !value.bytes().all(|b| b.is_ascii() && b != 0) {
        return Err(BuildError::InvalidString);
    }
    let mut bytes = Vec::with_capacity(value.len() + 2);
    bytes.push(opcode::STRING_PREFIX);
    bytes.extend_from_slice(value.as_bytes());
    bytes.push(0);
    Ok(data(bytes))
}

/// Encodes a compressed EISA ID (e.g. `"PNP0A03"`) as a `DWordConst`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidEisaId`] if `id` is malformed.
pub fn eisa_id(id: &str) -> Result<Node, BuildError> {
    EisaId::new(id).map(|id| dword(id.raw))
}

/// Builds a `Buffer` initialized with `bytes`.
#[must_use]
pub fn buffer(bytes: &[u8]) -> Node {
    ObjectNode::new(opcode::BUFFER_OP)
        .fixed(integer(bytes.len() as u64))
        .fixed(DataNode::from_slice(bytes))
        .into()
}

/// Builds a `Package` holding `elements`.
///
/// # Errors
///
/// Returns [`BuildError::TooLarge`] for more than 255 elements.
pub fn package(elements: Vec<Node>) -> Result<Node, BuildError> {
    let count = u8::try_from(elements.len()).map_err(|_| BuildError::TooLarge)?;
    Ok(ObjectNode::new(opcode::PACKAGE_OP)
        .fixed(DataNode::from_slice(&[count]))
        .variables(elements)
        .into())
}

/// Builds a `ResourceTemplate()` buffer: the descriptors followed by an
/// End Tag.
///
/// # Errors
///
/// Returns [`BuildError::InvalidResource`] if a descriptor is out of range.
pub fn resource_template(descriptors: &[ResourceDescriptor]) -> Result<Node, BuildError> {
    encode_template(descriptors).map(|bytes| buffer(&bytes))
}

/// Builds `Scope (path) { body }`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] if `path` is malformed.
pub fn scope(path: &str, body: Vec<Node>) -> Result<Node, BuildError> {
    Ok(ObjectNode::new(opcode::SCOPE_OP)
        .fixed(name_string(path)?)
        .variables(body)
        .into())
}

/// Builds `Device (path) { body }`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] if `path` is malformed.
pub fn device(path: &str, body: Vec<Node>) -> Result<Node, BuildError> {
    Ok(ObjectNode::extended(opcode::ext::DEVICE_OP)
        .fixed(name_string(path)?)
        .variables(body)
        .into())
}

/// Builds `Name (path, value)`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] if `path` is malformed.
pub fn name(path: &str, value: Node) -> Result<Node, BuildError> {
    Ok(ObjectNode::new(opcode::NAME_OP)
        .fixed(name_string(path)?)
        .fixed(value)
        .into())
}

/// Builds `Method (path, arg_count, Serialized/NotSerialized, sync_level) { body }`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] for a malformed path,
/// [`BuildError::TooManyArguments`] if `arg_count` exceeds 7 and
/// [`BuildError::InvalidSyncLevel`] if `sync_level` exceeds 15.
pub fn method(
    path: &str,
    arg_count: u8,
    serialized: bool,
    sync_level: u8,
    body: Vec<Node>,
) -> Result<Node, BuildError> {
    if usize::from(arg_count) > MAX_METHOD_ARGS {
        return Err(BuildError::TooManyArguments);
    }
    if sync_level > 0x0F {
        return Err(BuildError::InvalidSyncLevel);
    }
    let flags = arg_count | u8::from(serialized) << 3 | sync_level << 4;
    Ok(ObjectNode::new(opcode::METHOD_OP)
        .fixed(name_string(path)?)
        .fixed(DataNode::from_slice(&[flags]))
        .variables(body)
        .into())
}

/// Builds a call to the control method at `path`.
///
/// The argument count is stored as a private child of the invocation and
/// is never encoded; AML callers infer it from the method declaration.
///
/// # Errors
///
/// Returns [`BuildError::InvalidName`] for a malformed path and
/// [`BuildError::TooManyArguments`] for more than seven arguments.
pub fn method_invocation(path: &str, args: Vec<Node>) -> Result<Node, BuildError> {
    let count = u8::try_from(args.len())
        .ok()
        .filter(|&n| usize::from(n) <= MAX_METHOD_ARGS)
        .ok_or(BuildError::TooManyArguments)?;
    Ok(ObjectNode::pseudo()
        .into_method_invocation()
        .fixed(name_string(path)?)
        .fixed(DataNode::from_slice(&[count]))
        .variables(args)
        .into())
}

/// Builds `Return (value)`.
#[must_use]
pub fn return_value(value: Node) -> Node {
    ObjectNode::new(opcode::RETURN_OP).fixed(value).into()
}

/// Groups `nodes` under a pseudo node that contributes no bytes of its own.
#[must_use]
pub fn group(nodes: Vec<Node>) -> Node {
    ObjectNode::pseudo().variables(nodes).into()
}

/// Builds a definition block root from a header and body terms.
#[must_use]
pub fn definition_block(header: TableHeader, body: Vec<Node>) -> Node {
    RootNode::new(header, body).into()
}
