//! Microsoft Azure: resource groups.

mod cli;
pub mod client;
mod groups;

pub use cli::{AzCli, Credentials};
pub use groups::Groups;

use super::required;
use crate::domain::{Logger, ResourceKind};
use crate::infra::config::AzureConfig;
use crate::services::Leftovers;
use anyhow::Result;
use client::GroupsClient;
use std::sync::Arc;
use tracing::debug;

/// Checks that every credential is present, without logging in.
pub fn credentials(config: &AzureConfig) -> Result<Credentials<'_>> {
    Ok(Credentials {
        client_id: required(&config.client_id, "BBL_AZURE_CLIENT_ID")?,
        client_secret: required(&config.client_secret, "BBL_AZURE_CLIENT_SECRET")?,
        tenant_id: required(&config.tenant_id, "BBL_AZURE_TENANT_ID")?,
        subscription_id: required(&config.subscription_id, "BBL_AZURE_SUBSCRIPTION_ID")?,
    })
}

pub fn leftovers(logger: Arc<dyn Logger>, config: &AzureConfig) -> Result<Leftovers> {
    let credentials = credentials(config)?;
    debug!(subscription = credentials.subscription_id, "Using az CLI");

    let groups = Arc::new(AzCli::login(&credentials)?);
    Ok(Leftovers::new(logger, kinds(groups)))
}

pub fn kinds(groups: Arc<dyn GroupsClient>) -> Vec<Box<dyn ResourceKind>> {
    vec![Box::new(Groups::new(groups))]
}
