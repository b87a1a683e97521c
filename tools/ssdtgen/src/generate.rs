//! Table description to AML tree.

use anyhow::{Context, Result};
use hadron_amlgen::Node;
use hadron_amlgen::builder::{self, EisaId, ResourceDescriptor};

use crate::config::{DeviceConfig, ScopeConfig, TableConfig};

/// Builds the definition block described by `config`.
pub fn build_tree(config: &TableConfig) -> Result<Node> {
    let header = config.table.to_header()?;
    let body = config
        .scopes
        .iter()
        .map(build_scope)
        .collect::<Result<Vec<_>>>()?;
    Ok(builder::definition_block(header, body))
}

fn build_scope(scope: &ScopeConfig) -> Result<Node> {
    let devices = scope
        .devices
        .iter()
        .map(build_device)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("in scope {}", scope.path))?;
    builder::scope(&scope.path, devices)
        .with_context(|| format!("invalid scope path '{}'", scope.path))
}

fn build_device(device: &DeviceConfig) -> Result<Node> {
    let context = || format!("device {}", device.name);

    let mut body = vec![builder::name("_HID", hardware_id(&device.hid).with_context(context)?)?];
    if let Some(uid) = device.uid {
        body.push(builder::name("_UID", builder::integer(uid))?);
    }
    if let Some(cid) = &device.cid {
        body.push(builder::name("_CID", hardware_id(cid).with_context(context)?)?);
    }
    if let Some(sta) = device.sta {
        let ret = builder::return_value(builder::integer(u64::from(sta)));
        body.push(builder::method("_STA", 0, false, 0, vec![ret])?);
    }
    if !device.resources.is_empty() {
        let descriptors: Vec<ResourceDescriptor> =
            device.resources.iter().copied().map(Into::into).collect();
        let crs = builder::resource_template(&descriptors).with_context(context)?;
        body.push(builder::name("_CRS", crs)?);
    }

    builder::device(&device.name, body).with_context(context)
}

/// Encodes a `_HID`/`_CID` value: a compressed EISA ID when `id` has that
/// form, otherwise a string.
fn hardware_id(id: &str) -> Result<Node> {
    if EisaId::new(id).is_ok() {
        Ok(builder::eisa_id(id)?)
    } else {
        builder::string(id).with_context(|| format!("invalid hardware ID '{id}'"))
    }
}
