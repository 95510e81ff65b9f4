//! Google Cloud Platform: Compute Engine load balancing, instances and
//! networking.

mod cli;
pub mod client;
mod compute;
mod networks;

pub use cli::GcloudCli;
pub use compute::ComputeKind;
pub use networks::Networks;

use crate::domain::{Logger, ResourceKind};
use crate::infra::config::{GcpConfig, expand_path};
use crate::services::Leftovers;
use anyhow::{Context, Result, bail};
use client::{Collection, ComputeClient};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Deletion order of the single-call collections; `network` follows them.
const ORDER: [Collection; 12] = [
    Collection::ForwardingRules,
    Collection::GlobalForwardingRules,
    Collection::TargetHttpProxies,
    Collection::UrlMaps,
    Collection::BackendServices,
    Collection::TargetPools,
    Collection::HttpHealthChecks,
    Collection::InstanceGroups,
    Collection::Instances,
    Collection::Disks,
    Collection::Addresses,
    Collection::Firewalls,
];

#[derive(Deserialize)]
struct ServiceAccountKey {
    project_id: String,
}

/// Reads the project id out of a service account key file.
pub fn project_id(key_path: &Path) -> Result<String> {
    let contents = fs::read_to_string(key_path).context("Reading service account key")?;
    let key: ServiceAccountKey = serde_json::from_str(&contents)
        .context("Unmarshalling account key for project id")?;

    Ok(key.project_id)
}

pub fn leftovers(logger: Arc<dyn Logger>, config: &GcpConfig) -> Result<Leftovers> {
    let key_path = match &config.service_account_key {
        Some(path) if !path.as_os_str().is_empty() => expand_path(path),
        _ => bail!("Missing BBL_GCP_SERVICE_ACCOUNT_KEY."),
    };

    let project_id = project_id(&key_path)?;
    debug!(project = %project_id, "Using gcloud CLI");

    let compute = Arc::new(GcloudCli::new(&project_id, &key_path));
    Ok(Leftovers::new(logger.clone(), kinds(compute, logger)))
}

/// Load balancer pieces from the front end back, then instances and their
/// disks, then addresses, firewalls and finally networks.
pub fn kinds(
    compute: Arc<dyn ComputeClient>,
    logger: Arc<dyn Logger>,
) -> Vec<Box<dyn ResourceKind>> {
    let mut kinds: Vec<Box<dyn ResourceKind>> = ORDER
        .into_iter()
        .map(|collection| {
            Box::new(ComputeKind::new(collection, compute.clone())) as Box<dyn ResourceKind>
        })
        .collect();

    kinds.push(Box::new(Networks::new(compute, logger)));
    kinds
}
