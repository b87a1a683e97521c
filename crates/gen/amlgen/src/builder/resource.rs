//! ACPI resource descriptor encoding.
//!
//! Produces the byte-encoded descriptors that make up a `_CRS`/`_PRS`
//! resource template (ACPI 6.5 §6.4). Small descriptors carry a 1-byte tag
//! with the body length in bits 2:0; large descriptors carry a 1-byte tag
//! followed by a 16-bit body length.

use alloc::vec::Vec;

use super::BuildError;

/// Small End Tag descriptor byte (type 0x0F, length 1).
pub const END_TAG: u8 = 0x79;

/// A resource descriptor to encode into a resource template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDescriptor {
    /// I/O port range (small tag 0x47).
    Io {
        /// Decodes all 16 address bits (vs 10 for ISA aliasing).
        decode16: bool,
        /// Minimum base address.
        min: u16,
        /// Maximum base address.
        max: u16,
        /// Base alignment.
        alignment: u8,
        /// Number of ports.
        length: u8,
    },
    /// Fixed I/O port range (small tag 0x4B).
    FixedIo {
        /// Base I/O port address.
        base: u16,
        /// Number of ports.
        length: u8,
    },
    /// Single ISA interrupt with flags (small tag 0x23).
    Irq {
        /// IRQ number (0-15).
        irq: u8,
        /// Edge-triggered (vs level-triggered).
        edge_triggered: bool,
        /// Active-low (vs active-high).
        active_low: bool,
        /// Shared with other devices.
        shared: bool,
    },
    /// ISA DMA channel (small tag 0x2A).
    Dma {
        /// DMA channel number (0-7).
        channel: u8,
        /// Whether the channel supports bus mastering.
        bus_master: bool,
    },
    /// 32-bit memory range (large tag 0x85).
    Memory32 {
        /// Minimum base address.
        min: u32,
        /// Maximum base address.
        max: u32,
        /// Base alignment.
        alignment: u32,
        /// Length in bytes.
        length: u32,
        /// Whether the region is writable.
        writable: bool,
    },
    /// 32-bit fixed memory range (large tag 0x86).
    FixedMemory32 {
        /// Base physical address.
        base: u32,
        /// Length in bytes.
        length: u32,
        /// Whether the region is writable.
        writable: bool,
    },
    /// Extended interrupt with a single GSI (large tag 0x89).
    ExtendedIrq {
        /// Global System Interrupt number.
        gsi: u32,
        /// Edge-triggered (vs level-triggered).
        edge_triggered: bool,
        /// Active-low (vs active-high).
        active_low: bool,
        /// Shared with other devices.
        shared: bool,
    },
}

impl ResourceDescriptor {
    /// Appends the encoded descriptor to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidResource`] for an IRQ above 15 or a DMA
    /// channel above 7.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), BuildError> {
        match *self {
            Self::Io {
                decode16,
                min,
                max,
                alignment,
                length,
            } => {
                out.extend_from_slice(&[0x47, u8::from(decode16)]);
                out.extend_from_slice(&min.to_le_bytes());
                out.extend_from_slice(&max.to_le_bytes());
                out.extend_from_slice(&[alignment, length]);
            }
            Self::FixedIo { base, length } => {
                out.push(0x4B);
                out.extend_from_slice(&base.to_le_bytes());
                out.push(length);
            }
            Self::Irq {
                irq,
                edge_triggered,
                active_low,
                shared,
            } => {
                if irq > 15 {
                    return Err(BuildError::InvalidResource);
                }
                let flags =
                    u8::from(edge_triggered) | u8::from(active_low) << 3 | u8::from(shared) << 4;
                out.push(0x23);
                out.extend_from_slice(&(1u16 << irq).to_le_bytes());
                out.push(flags);
            }
            Self::Dma { channel, bus_master } => {
                if channel > 7 {
                    return Err(BuildError::InvalidResource);
                }
                out.extend_from_slice(&[0x2A, 1 << channel, u8::from(bus_master) << 2]);
            }
            Self::Memory32 {
                min,
                max,
                alignment,
                length,
                writable,
            } => {
                large_header(out, 0x85, 17);
                out.push(u8::from(writable));
                for value in [min, max, alignment, length] {
                    out.extend_from_slice(&value.to_le_bytes());
                }
            }
            Self::FixedMemory32 {
                base,
                length,
                writable,
            } => {
                large_header(out, 0x86, 9);
                out.push(u8::from(writable));
                out.extend_from_slice(&base.to_le_bytes());
                out.extend_from_slice(&length.to_le_bytes());
            }
            Self::ExtendedIrq {
                gsi,
                edge_triggered,
                active_low,
                shared,
            } => {
                // Bit 0 marks the device as a consumer of the interrupt.
                let flags = 0x01
                    | u8::from(edge_triggered) << 1
                    | u8::from(active_low) << 2
                    | u8::from(shared) << 3;
                large_header(out, 0x89, 6);
                out.extend_from_slice(&[flags, 1]);
                out.extend_from_slice(&gsi.to_le_bytes());
            }
        }
        Ok(())
    }
}

fn large_header(out: &mut Vec<u8>, tag: u8, length: u16) {
    out.push(tag);
    out.extend_from_slice(&length.to_le_bytes());
}

/// Encodes `descriptors` followed by an End Tag.
///
/// The End Tag checksum byte is zero, which tells the OS to skip the
/// template checksum.
///
/// # Errors
///
/// Returns [`BuildError::InvalidResource`] if any descriptor is invalid.
pub fn encode_template(descriptors: &[ResourceDescriptor]) -> Result<Vec<u8>, BuildError> {
    let mut out = Vec::new();
    for descriptor in descriptors {
        descriptor.encode_into(&mut out)?;
    }
    out.extend_from_slice(&[END_TAG, 0x00]);
    Ok(out)
}
