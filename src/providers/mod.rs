pub mod aws;
pub mod azure;
pub mod gcp;
pub mod vsphere;

use crate::domain::Logger;
use crate::infra::AppConfig;
use crate::services::Leftovers;
use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Iaas {
    Aws,
    Azure,
    Gcp,
    Vsphere,
}

impl fmt::Display for Iaas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws => write!(f, "aws"),
            Self::Azure => write!(f, "azure"),
            Self::Gcp => write!(f, "gcp"),
            Self::Vsphere => write!(f, "vsphere"),
        }
    }
}

/// Builds the aggregator for `iaas` on top of the real provider CLI,
/// validating the credentials it needs first.
pub fn leftovers(iaas: Iaas, config: &AppConfig, logger: Arc<dyn Logger>) -> Result<Leftovers> {
    match iaas {
        Iaas::Aws => aws::leftovers(logger, &config.aws),
        Iaas::Azure => azure::leftovers(logger, &config.azure),
        Iaas::Gcp => gcp::leftovers(logger, &config.gcp),
        Iaas::Vsphere => vsphere::leftovers(logger, &config.vsphere),
    }
}

/// Returns the configured value, or fails naming the environment variable
/// that supplies it.
pub(crate) fn required<'a>(value: &'a Option<String>, env: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => anyhow::bail!("Missing {env}."),
    }
}

/// Last path segment of a provider URL or inventory path
pub(crate) fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_present() {
        let value = Some("us-east-1".to_string());
        assert_eq!(required(&value, "BBL_AWS_REGION").unwrap(), "us-east-1");
    }

    #[test]
    fn test_required_missing_or_blank() {
        for value in [None, Some(String::new()), Some("   ".to_string())] {
            let err = required(&value, "BBL_AWS_REGION").unwrap_err();
            assert_eq!(err.to_string(), "Missing BBL_AWS_REGION.");
        }
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(
            last_segment("https://www.googleapis.com/compute/v1/projects/p/zones/us-east1-b"),
            "us-east1-b"
        );
        assert_eq!(last_segment("/dc1/vm/folder/"), "folder");
        assert_eq!(last_segment("plain"), "plain");
    }

    #[test]
    fn test_iaas_display() {
        assert_eq!(Iaas::Aws.to_string(), "aws");
        assert_eq!(Iaas::Vsphere.to_string(), "vsphere");
    }
}
