//! Table description parsing.
//!
//! A description names the table header and lists scopes of devices:
//!
//! ```toml
//! [table]
//! oem-id = "HADRON"
//! oem-table-id = "BOARD"
//!
//! [[scope]]
//! path = "\\_SB"
//!
//! [[scope.device]]
//! name = "HPET"
//! hid = "PNP0103"
//! uid = 0
//!
//! [[scope.device.resource]]
//! type = "fixed-memory32"
//! base = 0xFED00000
//! length = 0x400
//! ```

use std::path::Path;

use anyhow::{Context, Result, ensure};
use hadron_amlgen::TableHeader;
use hadron_amlgen::builder::ResourceDescriptor;
use serde::Deserialize;

/// Top-level table description.
#[derive(Debug, Deserialize)]
pub struct TableConfig {
    /// Header fields.
    #[serde(default)]
    pub table: HeaderConfig,
    /// Scopes in definition block order.
    #[serde(default, rename = "scope")]
    pub scopes: Vec<ScopeConfig>,
}

/// `[table]` section.
#[derive(Debug, Deserialize)]
pub struct HeaderConfig {
    #[serde(default = "default_signature")]
    pub signature: String,
    #[serde(default = "default_revision")]
    pub revision: u8,
    #[serde(default = "default_oem_id", rename = "oem-id")]
    pub oem_id: String,
    #[serde(default = "default_oem_table_id", rename = "oem-table-id")]
    pub oem_table_id: String,
    #[serde(default, rename = "oem-revision")]
    pub oem_revision: u32,
    #[serde(default = "default_creator_id", rename = "creator-id")]
    pub creator_id: String,
    #[serde(default, rename = "creator-revision")]
    pub creator_revision: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            signature: default_signature(),
            revision: default_revision(),
            oem_id: default_oem_id(),
            oem_table_id: default_oem_table_id(),
            oem_revision: 0,
            creator_id: default_creator_id(),
            creator_revision: 0,
        }
    }
}

fn default_signature() -> String {
    "SSDT".into()
}

fn default_revision() -> u8 {
    2
}

fn default_oem_id() -> String {
    "HADRON".into()
}

fn default_oem_table_id() -> String {
    "SSDTGEN".into()
}

fn default_creator_id() -> String {
    "HDRN".into()
}

/// `[[scope]]` entry.
#[derive(Debug, Deserialize)]
pub struct ScopeConfig {
    /// Scope path, e.g. `\_SB` or `\_SB.PCI0`.
    pub path: String,
    #[serde(default, rename = "device")]
    pub devices: Vec<DeviceConfig>,
}

/// `[[scope.device]]` entry.
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    /// 1-4 character device name.
    pub name: String,
    /// Hardware ID: an EISA ID such as `PNP0501` or a string such as `ACPI0007`.
    pub hid: String,
    #[serde(default)]
    pub uid: Option<u64>,
    /// Compatible ID, same forms as `hid`.
    #[serde(default)]
    pub cid: Option<String>,
    /// Value returned by a generated `_STA` method.
    #[serde(default)]
    pub sta: Option<u8>,
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
}

/// `[[scope.device.resource]]` entry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ResourceConfig {
    Io {
        min: u16,
        max: u16,
        #[serde(default = "default_one")]
        alignment: u8,
        length: u8,
        #[serde(default = "default_true")]
        decode16: bool,
    },
    FixedIo {
        base: u16,
        length: u8,
    },
    Irq {
        irq: u8,
        #[serde(default, rename = "edge-triggered")]
        edge_triggered: bool,
        #[serde(default, rename = "active-low")]
        active_low: bool,
        #[serde(default)]
        shared: bool,
    },
    Dma {
        channel: u8,
        #[serde(default, rename = "bus-master")]
        bus_master: bool,
    },
    Memory32 {
        min: u32,
        max: u32,
        #[serde(default = "default_one_u32")]
        alignment: u32,
        length: u32,
        #[serde(default = "default_true")]
        writable: bool,
    },
    FixedMemory32 {
        base: u32,
        length: u32,
        #[serde(default = "default_true")]
        writable: bool,
    },
    ExtendedIrq {
        gsi: u32,
        #[serde(default, rename = "edge-triggered")]
        edge_triggered: bool,
        #[serde(default, rename = "active-low")]
        active_low: bool,
        #[serde(default)]
        shared: bool,
    },
}

fn default_one() -> u8 {
    1
}

fn default_one_u32() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl From<ResourceConfig> for ResourceDescriptor {
    fn from(config: ResourceConfig) -> Self {
        match config {
            ResourceConfig::Io {
                min,
                max,
                alignment,
                length,
                decode16,
            } => Self::Io {
                decode16,
                min,
                max,
                alignment,
                length,
            },
            ResourceConfig::FixedIo { base, length } => Self::FixedIo { base, length },
            ResourceConfig::Irq {
                irq,
                edge_triggered,
                active_low,
                shared,
            } => Self::Irq {
                irq,
                edge_triggered,
                active_low,
                shared,
            },
            ResourceConfig::Dma { channel, bus_master } => Self::Dma { channel, bus_master },
            ResourceConfig::Memory32 {
                min,
                max,
                alignment,
                length,
                writable,
            } => Self::Memory32 {
                min,
                max,
                alignment,
                length,
                writable,
            },
            ResourceConfig::FixedMemory32 { base, length, writable } => {
                Self::FixedMemory32 { base, length, writable }
            }
            ResourceConfig::ExtendedIrq {
                gsi,
                edge_triggered,
                active_low,
                shared,
            } => Self::ExtendedIrq {
                gsi,
                edge_triggered,
                active_low,
                shared,
            },
        }
    }
}

impl HeaderConfig {
    /// Converts the textual header fields into a [`TableHeader`].
    ///
    /// OEM IDs shorter than their field are padded with spaces.
    pub fn to_header(&self) -> Result<TableHeader> {
        let signature = fixed_ascii::<4>(&self.signature, "signature")?;
        let oem_id = fixed_ascii::<6>(&self.oem_id, "oem-id")?;
        let oem_table_id = fixed_ascii::<8>(&self.oem_table_id, "oem-table-id")?;
        let creator_id = fixed_ascii::<4>(&self.creator_id, "creator-id")?;

        Ok(TableHeader::new(signature, self.revision)
            .with_oem(oem_id, oem_table_id, self.oem_revision)
            .with_creator(u32::from_le_bytes(creator_id), self.creator_revision))
    }
}

fn fixed_ascii<const N: usize>(value: &str, field: &str) -> Result<[u8; N]> {
    ensure!(
        value.is_ascii() && !value.is_empty() && value.len() <= N,
        "{field} must be 1-{N} ASCII characters, got '{value}'"
    );
    let mut out = [b' '; N];
    out[..value.len()].copy_from_slice(value.as_bytes());
    Ok(out)
}

/// Loads and parses a table description.
pub fn load_config(path: &Path) -> Result<TableConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses a table description from TOML text.
pub fn parse_config(contents: &str) -> Result<TableConfig> {
    let config: TableConfig = toml::from_str(contents)?;
    ensure!(
        config.table.signature == "SSDT" || config.table.signature == "DSDT",
        "signature must be SSDT or DSDT, got '{}'",
        config.table.signature
    );
    Ok(config)
}
