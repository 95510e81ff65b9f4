//! VMware vSphere: virtual machines and the folders they leave behind.

mod cli;
pub mod client;
mod folders;
mod vms;

pub use cli::{Connection, GovcCli};
pub use folders::Folders;
pub use vms::VirtualMachines;

use super::required;
use crate::domain::{Logger, ResourceKind};
use crate::infra::config::VsphereConfig;
use crate::services::Leftovers;
use anyhow::Result;
use client::VSphereClient;
use std::sync::Arc;
use tracing::debug;

pub fn connection(config: &VsphereConfig) -> Result<Connection<'_>> {
    Ok(Connection {
        vcenter_ip: required(&config.vcenter_ip, "BBL_VSPHERE_VCENTER_IP")?,
        user: required(&config.vcenter_user, "BBL_VSPHERE_VCENTER_USER")?,
        password: required(&config.vcenter_password, "BBL_VSPHERE_VCENTER_PASSWORD")?,
        datacenter: required(&config.vcenter_dc, "BBL_VSPHERE_VCENTER_DC")?,
    })
}

pub fn leftovers(logger: Arc<dyn Logger>, config: &VsphereConfig) -> Result<Leftovers> {
    let connection = connection(config)?;
    debug!(
        vcenter = connection.vcenter_ip,
        datacenter = connection.datacenter,
        "Using govc CLI"
    );

    let vsphere = Arc::new(GovcCli::new(&connection));
    Ok(Leftovers::new(logger.clone(), kinds(vsphere, logger)))
}

/// Inventory path below the datacenter's `vm` folder, the part filters see:
/// `/dc1/vm/env/bosh-0` is `env/bosh-0`.
pub(crate) fn relative(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((_datacenter, "vm")) => "",
        Some((_datacenter, rest)) => rest.strip_prefix("vm/").unwrap_or(rest),
        None => "",
    }
}

/// Virtual machines first; folders they emptied go after.
pub fn kinds(
    vsphere: Arc<dyn VSphereClient>,
    logger: Arc<dyn Logger>,
) -> Vec<Box<dyn ResourceKind>> {
    vec![
        Box::new(VirtualMachines::new(vsphere.clone(), logger)),
        Box::new(Folders::new(vsphere)),
    ]
}
