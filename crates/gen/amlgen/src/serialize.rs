//! AML emission (second serialization pass).
//!
//! The emitter mirrors [`Layout`]'s walk exactly: pre-order, fixed
//! arguments before variable arguments, private children skipped through
//! [`ObjectNode::encoded_args`]. Package lengths are taken from the layout
//! in the order they were recorded.

use core::slice;

use crate::SerializeError;
use crate::node::{Node, ObjectNode};
use crate::pkglen::PkgLength;
use crate::size::Layout;
use crate::stream::ByteStream;

/// Encodes `node` into `stream`.
///
/// A [`Node::Root`] is written as its header (as stored, without length or
/// checksum patching) followed by the body; use
/// [`serialize_tree`](crate::serialize_tree) to produce a finished table.
///
/// # Errors
///
/// Returns [`SerializeError::InvalidTree`] or [`SerializeError::SizeOverflow`]
/// if the tree cannot be sized, and [`SerializeError::BufferTooSmall`] if the
/// stream runs out of space. On error the stream contents are unspecified.
pub fn serialize_node(node: &Node, stream: &mut ByteStream<'_>) -> Result<(), SerializeError> {
    let layout = Layout::of(node)?;
    let mut emitter = Emitter::new(&layout);
    match node {
        Node::Root(root) => {
            stream.write(&root.header.to_bytes())?;
            emitter.emit_all(root.children().iter(), stream)
        }
        _ => emitter.emit(node, stream),
    }
}

/// Writes nodes using package lengths precomputed by a [`Layout`].
pub struct Emitter<'l> {
    pkg_lengths: slice::Iter<'l, PkgLength>,
}

impl<'l> Emitter<'l> {
    /// Creates an emitter for a tree measured by `layout`.
    #[must_use]
    pub fn new(layout: &'l Layout) -> Self {
        Self {
            pkg_lengths: layout.pkg_lengths().iter(),
        }
    }

    /// Emits every node of `nodes` in order.
    ///
    /// # Errors
    ///
    /// See [`Emitter::emit`].
    pub fn emit_all<'a>(
        &mut self,
        nodes: impl Iterator<Item = &'a Node>,
        stream: &mut ByteStream<'_>,
    ) -> Result<(), SerializeError> {
        for node in nodes {
            self.emit(node, stream)?;
        }
        Ok(())
    }

    /// Emits one node and its subtree.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::InvalidTree`] on a nested root,
    /// [`SerializeError::SizeMismatch`] if the tree does not match the
    /// layout, and [`SerializeError::BufferTooSmall`] if the stream is full.
    pub fn emit(&mut self, node: &Node, stream: &mut ByteStream<'_>) -> Result<(), SerializeError> {
        match node {
            Node::Root(_) => Err(SerializeError::InvalidTree),
            Node::Data(data) => stream.write(data.bytes()),
            Node::Object(object) => self.emit_object(object, stream),
        }
    }

    fn emit_object(
        &mut self,
        object: &ObjectNode,
        stream: &mut ByteStream<'_>,
    ) -> Result<(), SerializeError> {
        if object.is_pseudo() {
            return self.emit_all(object.encoded_args(), stream);
        }

        stream.write_u8(object.opcode())?;
        if let Some(sub_opcode) = object.sub_opcode() {
            stream.write_u8(sub_opcode)?;
        }
        if object.has_pkg_length() {
            let pkg = self.pkg_lengths.next().ok_or(SerializeError::SizeMismatch)?;
            let (raw, len) = pkg.encode();
            stream.write(&raw[..len])?;
        }
        self.emit_all(object.encoded_args(), stream)
    }
}
