//! Size calculation (first serialization pass).
//!
//! [`Layout`] walks a tree bottom-up and records the resolved [`PkgLength`]
//! of every object that carries one, in pre-order. The emitter walks the
//! tree again in the same order and consumes those lengths, so every
//! package length is computed exactly once per serialization.

use alloc::vec::Vec;

use crate::SerializeError;
use crate::node::{Node, ObjectNode, RootNode};
use crate::pkglen::PkgLength;
use crate::sdt::TableHeader;

#[allow(clippy::cast_possible_truncation)]
const HEADER_SIZE: u32 = TableHeader::SIZE as u32;

/// Computes the number of bytes `node` encodes to.
///
/// For a [`Node::Root`] this is the whole table, header included.
///
/// # Errors
///
/// Returns [`SerializeError::InvalidTree`] if the subtree contains a nested
/// root or a malformed extended opcode, and [`SerializeError::SizeOverflow`]
/// if an object is too large to encode.
pub fn compute_size(node: &Node) -> Result<u32, SerializeError> {
    Layout::of(node).map(|layout| layout.total())
}

/// Sizes and package lengths of a tree, as computed by the first pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pkg_lengths: Vec<PkgLength>,
    total: u32,
}

impl Layout {
    /// Measures `node`, which may be a root.
    ///
    /// # Errors
    ///
    /// See [`compute_size`].
    pub fn of(node: &Node) -> Result<Self, SerializeError> {
        match node {
            Node::Root(root) => Self::of_root(root),
            _ => {
                let mut layout = Self::default();
                layout.total = layout.measure(node)?;
                Ok(layout)
            }
        }
    }

    /// Measures a whole definition block: the header plus every body term.
    ///
    /// # Errors
    ///
    /// See [`compute_size`].
    pub fn of_root(root: &RootNode) -> Result<Self, SerializeError> {
        let mut layout = Self::default();
        let body = layout.measure_all(root.children().iter())?;
        layout.total = body
            .checked_add(HEADER_SIZE)
            .ok_or(SerializeError::SizeOverflow)?;
        Ok(layout)
    }

    /// Total encoded size in bytes.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Resolved package lengths in pre-order.
    #[must_use]
    pub fn pkg_lengths(&self) -> &[PkgLength] {
        &self.pkg_lengths
    }

    fn measure_all<'a>(
        &mut self,
        mut nodes: impl Iterator<Item = &'a Node>,
    ) -> Result<u32, SerializeError> {
        nodes.try_fold(0u32, |acc, node| {
            acc.checked_add(self.measure(node)?)
                .ok_or(SerializeError::SizeOverflow)
        })
    }

    fn measure(&mut self, node: &Node) -> Result<u32, SerializeError> {
        match node {
            Node::Root(_) => Err(SerializeError::InvalidTree),
            Node::Data(data) => u32::try_from(data.len()).map_err(|_| SerializeError::SizeOverflow),
            Node::Object(object) => self.measure_object(object),
        }
    }

    fn measure_object(&mut self, object: &ObjectNode) -> Result<u32, SerializeError> {
        let opcode_len = object.opcode_len()?;
        if object.is_pseudo() {
            return self.measure_all(object.encoded_args());
        }

        // Reserve the slot before descending so the order stays pre-order.
        let slot = object.has_pkg_length().then(|| {
            self.pkg_lengths.push(PkgLength::EMPTY);
            self.pkg_lengths.len() - 1
        });

        let mut size = self.measure_all(object.encoded_args())?;
        if let Some(slot) = slot {
            let pkg = PkgLength::for_payload(size).ok_or(SerializeError::SizeOverflow)?;
            self.pkg_lengths[slot] = pkg;
            size = pkg.value();
        }
        size.checked_add(opcode_len).ok_or(SerializeError::SizeOverflow)
    }
}
