use crate::VERSION;
use crate::domain::Logger;
use crate::infra::config::{
    AppConfig, AwsConfig, AzureConfig, GcpConfig, VsphereConfig, default_config_path,
};
use crate::infra::{TerminalLogger, load_app_config};
use crate::providers::{self, Iaas};
use crate::services::Leftovers;
use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "leftovers",
    about = "Find and destroy resources left behind in an IaaS",
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version.
    #[arg(short = 'v', long)]
    pub version: bool,

    /// The IaaS for clean up (aws, azure, gcp, vsphere).
    #[arg(short, long, env = "BBL_IAAS")]
    pub iaas: Option<String>,

    /// Destroy resources without prompting. This is dangerous, make good choices!
    #[arg(short, long)]
    pub no_confirm: bool,

    /// List all resources without deleting any.
    #[arg(short, long)]
    pub dry_run: bool,

    /// Filtering resources by an environment name.
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Type of resource to delete.
    #[arg(short = 't', long = "type")]
    pub resource_type: Option<String>,

    /// AWS access key id.
    #[arg(long, env = "BBL_AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key.
    #[arg(long, env = "BBL_AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: Option<String>,

    /// AWS region.
    #[arg(long, env = "BBL_AWS_REGION")]
    pub aws_region: Option<String>,

    /// Azure client id.
    #[arg(long, env = "BBL_AZURE_CLIENT_ID", hide_env_values = true)]
    pub azure_client_id: Option<String>,

    /// Azure client secret.
    #[arg(long, env = "BBL_AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub azure_client_secret: Option<String>,

    /// Azure tenant id.
    #[arg(long, env = "BBL_AZURE_TENANT_ID")]
    pub azure_tenant_id: Option<String>,

    /// Azure subscription id.
    #[arg(long, env = "BBL_AZURE_SUBSCRIPTION_ID")]
    pub azure_subscription_id: Option<String>,

    /// GCP service account key path.
    #[arg(long, env = "BBL_GCP_SERVICE_ACCOUNT_KEY")]
    pub gcp_service_account_key: Option<PathBuf>,

    /// vSphere vCenter IP address.
    #[arg(long, env = "BBL_VSPHERE_VCENTER_IP")]
    pub vsphere_vcenter_ip: Option<String>,

    /// vSphere vCenter password.
    #[arg(long, env = "BBL_VSPHERE_VCENTER_PASSWORD", hide_env_values = true)]
    pub vsphere_vcenter_password: Option<String>,

    /// vSphere vCenter username.
    #[arg(long, env = "BBL_VSPHERE_VCENTER_USER")]
    pub vsphere_vcenter_user: Option<String>,

    /// vSphere vCenter datacenter.
    #[arg(long, env = "BBL_VSPHERE_VCENTER_DC")]
    pub vsphere_vcenter_dc: Option<String>,

    /// Config file with defaults for any of the above
    #[arg(long, env = "LEFTOVERS_CONFIG", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the resource types the IaaS supports
    Types,
    /// Delete matching resources (default)
    Destroy,
}

impl Cli {
    /// The flag and environment values as a config layer to put over the
    /// config file.
    pub fn to_config(&self) -> Result<AppConfig> {
        let iaas = match self.iaas.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => match Iaas::from_str(name, true) {
                Ok(iaas) => Some(iaas),
                Err(_) => bail!("Missing or unsupported BBL_IAAS."),
            },
        };

        Ok(AppConfig {
            iaas,
            aws: AwsConfig {
                access_key_id: self.aws_access_key_id.clone(),
                secret_access_key: self.aws_secret_access_key.clone(),
                region: self.aws_region.clone(),
            },
            gcp: GcpConfig {
                service_account_key: self.gcp_service_account_key.clone(),
            },
            azure: AzureConfig {
                client_id: self.azure_client_id.clone(),
                client_secret: self.azure_client_secret.clone(),
                tenant_id: self.azure_tenant_id.clone(),
                subscription_id: self.azure_subscription_id.clone(),
            },
            vsphere: VsphereConfig {
                vcenter_ip: self.vsphere_vcenter_ip.clone(),
                vcenter_user: self.vsphere_vcenter_user.clone(),
                vcenter_password: self.vsphere_vcenter_password.clone(),
                vcenter_dc: self.vsphere_vcenter_dc.clone(),
            },
        })
    }

    /// Refuses flag combinations the IaaS cannot honour.
    pub fn check(&self, iaas: Iaas) -> Result<()> {
        if iaas == Iaas::Vsphere {
            if self.filter.is_empty() {
                bail!("--filter is required for vSphere.");
            }
            if self.no_confirm {
                bail!("--no-confirm is not supported for vSphere.");
            }
        }
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.version {
        println!("{VERSION}");
        return Ok(());
    }

    let mut config = load_app_config(&cli.config)?;
    config.merge(cli.to_config()?);

    let Some(iaas) = config.iaas else {
        bail!("Missing or unsupported BBL_IAAS.");
    };
    cli.check(iaas)?;
    debug!(%iaas, filter = %cli.filter, "Starting");

    let logger: Arc<dyn Logger> = Arc::new(TerminalLogger::stdio(cli.no_confirm));
    let leftovers = providers::leftovers(iaas, &config, logger)?;

    execute(&cli, &leftovers)
}

/// Runs the operation the flags select against an already built aggregator.
pub fn execute(cli: &Cli, leftovers: &Leftovers) -> Result<()> {
    if cli.command == Some(Command::Types) {
        leftovers.types();
        return Ok(());
    }

    if cli.dry_run {
        leftovers.list(&cli.filter);
        return Ok(());
    }

    match cli.resource_type.as_deref() {
        Some(type_name) if !type_name.is_empty() => {
            leftovers.delete_type(&cli.filter, type_name)?
        }
        _ => leftovers.delete(&cli.filter)?,
    }

    eprintln!("{}", remaining_hint(&cli.filter));
    Ok(())
}

/// Printed on stderr after a destroy run; stdout is the audit trail.
pub fn remaining_hint(filter: &str) -> String {
    format!("Try leftovers --filter {filter} --dry-run to list remaining resources!")
}
