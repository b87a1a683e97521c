//! The AML object tree consumed by the serializer.
//!
//! A tree is a [`Node::Root`] owning the table header and the definition
//! block body. Each body entry is either an [`ObjectNode`] (one AML term:
//! opcode bytes, an optional package length and argument children) or a
//! [`DataNode`] (literal bytes such as a name string or an integer payload).
//!
//! Children are owned exclusively by their parent and nodes hold no parent
//! links. Context such as "is my parent a method invocation?" is passed down
//! by the traversal, see [`is_private_argument`].

use alloc::vec::Vec;

use bitflags::bitflags;

use crate::opcode;
use crate::sdt::TableHeader;

bitflags! {
    /// Per-object encoding flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        /// The encoding carries a `PkgLength` after the opcode bytes.
        const PKG_LENGTH = 1 << 0;
        /// Bookkeeping node: contributes no bytes itself, only its children do.
        const PSEUDO = 1 << 1;
    }
}

/// Distinguishes objects whose children need special handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// An ordinary AML term.
    Term,
    /// A call to a control method.
    ///
    /// Fixed argument 0 is the method name string and fixed argument 1 is
    /// the argument count, which only exists for tree manipulation and is
    /// never encoded.
    MethodInvocation,
}

/// Position of a child within its parent object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSlot {
    /// Index into the fixed argument list.
    Fixed(usize),
    /// Index into the variable argument list.
    Variable(usize),
}

/// Returns `true` if the child at `slot` of `parent` is implementation-private
/// and must be excluded from both sizing and emission.
#[must_use]
pub fn is_private_argument(parent: &ObjectNode, slot: ArgSlot) -> bool {
    matches!(
        (parent.kind, slot),
        (ObjectKind::MethodInvocation, ArgSlot::Fixed(1))
    )
}

/// A node of the AML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The definition block root. Only valid at the top of a tree.
    Root(RootNode),
    /// An AML term.
    Object(ObjectNode),
    /// Literal bytes.
    Data(DataNode),
}

impl From<ObjectNode> for Node {
    fn from(node: ObjectNode) -> Self {
        Self::Object(node)
    }
}

impl From<DataNode> for Node {
    fn from(node: DataNode) -> Self {
        Self::Data(node)
    }
}

impl From<RootNode> for Node {
    fn from(node: RootNode) -> Self {
        Self::Root(node)
    }
}

/// Root of a definition block: the table header plus the body terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootNode {
    /// The table header written in front of the AML body.
    pub header: TableHeader,
    children: Vec<Node>,
}

impl RootNode {
    /// Creates a root with the given header and body.
    #[must_use]
    pub fn new(header: TableHeader, children: Vec<Node>) -> Self {
        Self { header, children }
    }

    /// Returns the body terms in order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable access to the body terms.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Appends a term to the body.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }
}

/// One AML term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNode {
    opcode: u8,
    sub_opcode: Option<u8>,
    flags: ObjectFlags,
    kind: ObjectKind,
    fixed_args: Vec<Node>,
    variable_args: Vec<Node>,
}

impl ObjectNode {
    /// Creates an object for a one-byte opcode.
    ///
    /// [`ObjectFlags::PKG_LENGTH`] is set according to
    /// [`opcode::has_pkg_length`].
    #[must_use]
    pub fn new(opcode: u8) -> Self {
        let flags = if opcode::has_pkg_length(opcode, None) {
            ObjectFlags::PKG_LENGTH
        } else {
            ObjectFlags::empty()
        };
        Self::with_flags(opcode, None, flags)
    }

    /// Creates an object for an extended (`0x5B`-prefixed) opcode.
    #[must_use]
    pub fn extended(sub_opcode: u8) -> Self {
        let flags = if opcode::has_pkg_length(opcode::EXT_OP_PREFIX, Some(sub_opcode)) {
            ObjectFlags::PKG_LENGTH
        } else {
            ObjectFlags::empty()
        };
        Self::with_flags(opcode::EXT_OP_PREFIX, Some(sub_opcode), flags)
    }

    /// Creates a bookkeeping node that only groups its children.
    #[must_use]
    pub fn pseudo() -> Self {
        Self::with_flags(opcode::ZERO_OP, None, ObjectFlags::PSEUDO)
    }

    /// Creates an object with explicit encoding flags.
    ///
    /// No consistency check is made here; a sub-opcode paired with anything
    /// but [`opcode::EXT_OP_PREFIX`] is rejected when the tree is sized.
    #[must_use]
    pub fn with_flags(opcode: u8, sub_opcode: Option<u8>, flags: ObjectFlags) -> Self {
        Self {
            opcode,
            sub_opcode,
            flags,
            kind: ObjectKind::Term,
            fixed_args: Vec::new(),
            variable_args: Vec::new(),
        }
    }

    /// Marks this object as a method invocation.
    #[must_use]
    pub fn into_method_invocation(mut self) -> Self {
        self.kind = ObjectKind::MethodInvocation;
        self
    }

    /// Appends a fixed argument.
    #[must_use]
    pub fn fixed(mut self, node: impl Into<Node>) -> Self {
        self.fixed_args.push(node.into());
        self
    }

    /// Appends a variable argument (a term of the object's body).
    #[must_use]
    pub fn variable(mut self, node: impl Into<Node>) -> Self {
        self.variable_args.push(node.into());
        self
    }

    /// Appends every node of `nodes` as variable arguments.
    #[must_use]
    pub fn variables(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.variable_args.extend(nodes);
        self
    }

    /// The first opcode byte.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// The second opcode byte of an extended opcode.
    #[must_use]
    pub fn sub_opcode(&self) -> Option<u8> {
        self.sub_opcode
    }

    /// Encoding flags.
    #[must_use]
    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    /// The object kind.
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Returns `true` for bookkeeping nodes that emit no bytes of their own.
    #[must_use]
    pub fn is_pseudo(&self) -> bool {
        self.flags.contains(ObjectFlags::PSEUDO)
    }

    /// Returns `true` if the encoding carries a `PkgLength`.
    #[must_use]
    pub fn has_pkg_length(&self) -> bool {
        self.flags.contains(ObjectFlags::PKG_LENGTH)
    }

    /// Fixed arguments, in order.
    #[must_use]
    pub fn fixed_args(&self) -> &[Node] {
        &self.fixed_args
    }

    /// Mutable access to the fixed arguments.
    pub fn fixed_args_mut(&mut self) -> &mut Vec<Node> {
        &mut self.fixed_args
    }

    /// Variable arguments, in order.
    #[must_use]
    pub fn variable_args(&self) -> &[Node] {
        &self.variable_args
    }

    /// Mutable access to the variable arguments.
    pub fn variable_args_mut(&mut self) -> &mut Vec<Node> {
        &mut self.variable_args
    }

    /// Children in encoding order: fixed arguments then variable arguments,
    /// without implementation-private children.
    pub fn encoded_args(&self) -> impl Iterator<Item = &Node> + '_ {
        let fixed = self
            .fixed_args
            .iter()
            .enumerate()
            .filter(|&(i, _)| !is_private_argument(self, ArgSlot::Fixed(i)))
            .map(|(_, node)| node);
        let variable = self
            .variable_args
            .iter()
            .enumerate()
            .filter(|&(i, _)| !is_private_argument(self, ArgSlot::Variable(i)))
            .map(|(_, node)| node);
        fixed.chain(variable)
    }

    /// Number of opcode bytes this object emits (0, 1 or 2).
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::InvalidTree`](crate::SerializeError::InvalidTree)
    /// if the opcode and sub-opcode do not form a valid pair.
    pub fn opcode_len(&self) -> Result<u32, crate::SerializeError> {
        if self.is_pseudo() {
            return Ok(0);
        }
        match (self.opcode, self.sub_opcode) {
            (opcode::EXT_OP_PREFIX, Some(_)) => Ok(2),
            (opcode::EXT_OP_PREFIX, None) | (_, Some(_)) => Err(crate::SerializeError::InvalidTree),
            (_, None) => Ok(1),
        }
    }
}

/// Literal bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataNode {
    bytes: Vec<u8>,
}

impl DataNode {
    /// Creates a data node owning `bytes`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Creates a data node copying `bytes`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The payload.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the payload.
    pub fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
