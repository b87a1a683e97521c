//! `hadron-amlgen`: a standalone, `no_std` AML definition block serializer.
//!
//! This crate turns an in-memory tree of AML objects into the byte stream of
//! a DSDT/SSDT table: a 36-byte System Description Table header followed by
//! the AML body, with the header length and checksum patched in. It is meant
//! for firmware that describes devices at boot time from live hardware
//! configuration instead of shipping a precompiled ASL blob.
//!
//! Serialization is done in two passes over the tree. The first pass
//! ([`size::Layout`]) computes the encoded size of every node, including the
//! self-referential AML package lengths. The second pass
//! ([`serialize::Emitter`]) writes the bytes through a bounded
//! [`ByteStream`]. Both passes share the same child iteration, so they cannot
//! disagree about which nodes are encoded.
//!
//! # Usage
//!
//! ```ignore
//! let tree = Node::Root(RootNode::new(TableHeader::new(*b"SSDT", 2), body));
//!
//! // Two-call protocol: query, allocate, write.
//! let required = serialize_tree(&tree, None)?;
//! let mut table = vec![0u8; required as usize];
//! serialize_tree(&tree, Some(&mut table))?;
//!
//! // Or let the crate allocate.
//! let table = serialize_definition_block(&tree)?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod builder;
pub mod node;
pub mod opcode;
pub mod pkglen;
pub mod sdt;
pub mod serialize;
pub mod size;
pub mod stream;
pub mod table;

// Re-export key types at crate root for convenience.
pub use node::{ArgSlot, DataNode, Node, ObjectFlags, ObjectKind, ObjectNode, RootNode};
pub use pkglen::PkgLength;
pub use sdt::{TableHeader, compute_checksum, validate_checksum};
pub use serialize::serialize_node;
pub use size::{Layout, compute_size};
pub use stream::{ByteStream, Direction};
pub use table::{serialize_definition_block, serialize_tree};

/// Errors that can occur while sizing or serializing an AML tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeError {
    /// A node violated a structural invariant (a Root node below the top
    /// level, a non-Root node at the top level, or a malformed extended
    /// opcode).
    InvalidTree,
    /// The destination buffer cannot hold the encoded table. Query the
    /// required size and retry with a larger buffer.
    BufferTooSmall,
    /// The root header carries a stamped length that disagrees with the
    /// size of the tree. The tree was modified between the size query and
    /// the write.
    TreeModifiedAfterHeaderStamped,
    /// The number of emitted bytes differs from the computed size.
    SizeMismatch,
    /// A package length or the table length exceeds what AML can encode.
    SizeOverflow,
    /// The output buffer could not be allocated.
    AllocationFailure,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::InvalidTree => "invalid AML tree structure",
            Self::BufferTooSmall => "output buffer too small for AML table",
            Self::TreeModifiedAfterHeaderStamped => {
                "tree size does not match the stamped table header length"
            }
            Self::SizeMismatch => "emitted AML size does not match computed size",
            Self::SizeOverflow => "AML object too large to encode",
            Self::AllocationFailure => "failed to allocate AML table buffer",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for SerializeError {}
