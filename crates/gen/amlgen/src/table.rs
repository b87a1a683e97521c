//! Definition block finalization: header, body, length and checksum.

use alloc::vec::Vec;

use crate::SerializeError;
use crate::node::{Node, RootNode};
use crate::sdt::{self, TableHeader};
use crate::serialize::Emitter;
use crate::size::Layout;
use crate::stream::ByteStream;

/// Serializes a definition block using the two-call sizing protocol.
///
/// With `buffer == None` nothing is written and the required table size is
/// returned. With a buffer, the finished table (header with `length` and
/// `checksum` patched, followed by the AML body) is written to its start and
/// the number of bytes used is returned.
///
/// # Errors
///
/// - [`SerializeError::InvalidTree`] if `root` is not a [`Node::Root`] or the
///   tree is malformed.
/// - [`SerializeError::SizeOverflow`] if the table is too large to encode.
/// - [`SerializeError::BufferTooSmall`] if `buffer` is shorter than the
///   required size. Nothing is written in that case.
/// - [`SerializeError::TreeModifiedAfterHeaderStamped`] if the root header
///   carries a stamped length that differs from the computed size.
///
/// If an error occurs after writing has begun, the written region of
/// `buffer` is zeroed before returning.
pub fn serialize_tree(root: &Node, buffer: Option<&mut [u8]>) -> Result<u32, SerializeError> {
    let Node::Root(root) = root else {
        return Err(SerializeError::InvalidTree);
    };

    let layout = Layout::of_root(root)?;
    let total = layout.total();

    let Some(buffer) = buffer else {
        log::debug!("amlgen: {} table requires {total} bytes", signature_str(&root.header));
        return Ok(total);
    };

    let required = total as usize;
    if buffer.len() < required {
        return Err(SerializeError::BufferTooSmall);
    }

    if root.header.is_stamped() && root.header.length != total {
        log::error!(
            "amlgen: {} header stamped with {} bytes but tree encodes to {total}",
            signature_str(&root.header),
            root.header.length,
        );
        return Err(SerializeError::TreeModifiedAfterHeaderStamped);
    }

    let table = &mut buffer[..required];
    write_table(root, &layout, table)?;

    log::debug!(
        "amlgen: wrote {} table, {total} bytes, checksum {:#04x}",
        signature_str(&root.header),
        table[TableHeader::CHECKSUM_OFFSET],
    );
    Ok(total)
}

/// Serializes a definition block into a newly allocated buffer.
///
/// # Errors
///
/// Returns [`SerializeError::AllocationFailure`] if the buffer cannot be
/// allocated, or any error from [`serialize_tree`].
pub fn serialize_definition_block(root: &Node) -> Result<Vec<u8>, SerializeError> {
    let required = serialize_tree(root, None)? as usize;

    let mut table = Vec::new();
    table
        .try_reserve_exact(required)
        .map_err(|_| SerializeError::AllocationFailure)?;
    table.resize(required, 0);

    serialize_tree(root, Some(&mut table))?;
    Ok(table)
}

impl RootNode {
    /// Computes the table size and records it in the header's `length`.
    ///
    /// Any later [`serialize_tree`] call fails with
    /// [`SerializeError::TreeModifiedAfterHeaderStamped`] if the tree no
    /// longer encodes to the stamped size.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::InvalidTree`] or
    /// [`SerializeError::SizeOverflow`] if the tree cannot be sized.
    pub fn stamp_header_length(&mut self) -> Result<u32, SerializeError> {
        let total = Layout::of_root(self)?.total();
        self.header.length = total;
        Ok(total)
    }
}

/// Emits the finished table into `table`. If emission fails part way, the
/// whole of `table` is zeroed.
fn write_table(root: &RootNode, layout: &Layout, table: &mut [u8]) -> Result<(), SerializeError> {
    if let Err(e) = emit_table(root, layout, table) {
        log::error!("amlgen: {} table emission failed: {e}", signature_str(&root.header));
        table.fill(0);
        return Err(e);
    }
    Ok(())
}

fn emit_table(root: &RootNode, layout: &Layout, table: &mut [u8]) -> Result<(), SerializeError> {
    let mut header = root.header;
    header.length = layout.total();
    header.checksum = 0;

    let mut stream = ByteStream::forward(table);
    stream.write(&header.to_bytes())?;

    let mut emitter = Emitter::new(layout);
    for node in root.children() {
        emitter.emit(node, &mut stream)?;
        log::trace!("amlgen: emitted top-level term, {} bytes so far", stream.written());
    }

    if stream.remaining() != 0 {
        return Err(SerializeError::SizeMismatch);
    }

    let checksum = sdt::compute_checksum(table);
    table[TableHeader::CHECKSUM_OFFSET] = checksum;
    Ok(())
}

fn signature_str(header: &TableHeader) -> &str {
    core::str::from_utf8(&header.signature).unwrap_or("????")
}
