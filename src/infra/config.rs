use crate::providers::Iaas;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "leftovers.toml";

pub fn default_config_dir() -> PathBuf {
    config_dir_under(std::env::var_os("HOME").map(PathBuf::from))
}

/// Without a home directory the config is looked up relative to the
/// working directory.
fn config_dir_under(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_default().join(".config/leftovers")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join(DEFAULT_CONFIG_NAME)
}

/// Expands a leading `~` (and `~user`) in a path given on the command line
/// or in the config file.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.to_string_lossy().as_ref()).into_owned())
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AwsConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct GcpConfig {
    pub service_account_key: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AzureConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
    pub subscription_id: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct VsphereConfig {
    pub vcenter_ip: Option<String>,
    pub vcenter_user: Option<String>,
    pub vcenter_password: Option<String>,
    pub vcenter_dc: Option<String>,
}

/// Provider selection and credentials, from `leftovers.toml` and/or flags.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub iaas: Option<Iaas>,
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub gcp: GcpConfig,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub vsphere: VsphereConfig,
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        fn take<T>(current: &mut Option<T>, incoming: Option<T>) {
            if incoming.is_some() {
                *current = incoming;
            }
        }

        take(&mut self.iaas, other.iaas);

        take(&mut self.aws.access_key_id, other.aws.access_key_id);
        take(&mut self.aws.secret_access_key, other.aws.secret_access_key);
        take(&mut self.aws.region, other.aws.region);

        take(
            &mut self.gcp.service_account_key,
            other.gcp.service_account_key,
        );

        take(&mut self.azure.client_id, other.azure.client_id);
        take(&mut self.azure.client_secret, other.azure.client_secret);
        take(&mut self.azure.tenant_id, other.azure.tenant_id);
        take(&mut self.azure.subscription_id, other.azure.subscription_id);

        take(&mut self.vsphere.vcenter_ip, other.vsphere.vcenter_ip);
        take(&mut self.vsphere.vcenter_user, other.vsphere.vcenter_user);
        take(
            &mut self.vsphere.vcenter_password,
            other.vsphere.vcenter_password,
        );
        take(&mut self.vsphere.vcenter_dc, other.vsphere.vcenter_dc);
    }
}

/// Loads the config file at `path`. A missing or empty file is an empty config.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    let path = expand_path(path);

    if !path.exists() {
        debug!(path = ?path, "No config file");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    parse_app_config(&content, &path)
}

fn parse_app_config(content: &str, path: &Path) -> Result<AppConfig> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    let mut config: AppConfig =
        toml::from_str(content).with_context(|| format!("parsing {:?}", path))?;

    if let Some(key) = config.gcp.service_account_key.take() {
        config.gcp.service_account_key = Some(expand_path(&key));
    }

    debug!(path = ?path, iaas = ?config.iaas, "Loaded config file");
    Ok(config)
}
