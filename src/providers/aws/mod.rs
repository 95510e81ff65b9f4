//! Amazon Web Services: load balancers, EC2, IAM and S3.

mod cli;
pub mod client;
mod ec2;
mod elb;
mod iam;
mod s3;

pub use cli::AwsCli;
pub use ec2::{
    Instances, InternetGateways, KeyPairs, NetworkInterfaces, SecurityGroups, Subnets, Volumes,
    Vpcs,
};
pub use elb::LoadBalancers;
pub use iam::{InstanceProfiles, Policies, Roles, ServerCertificates};
pub use s3::Buckets;

use super::required;
use crate::domain::{Logger, ResourceKind};
use crate::infra::config::AwsConfig;
use crate::services::Leftovers;
use anyhow::Result;
use client::{Ec2Client, ElbClient, IamClient, S3Client};
use std::sync::Arc;
use tracing::debug;

/// Validates the credentials and wires every AWS kind to the `aws` CLI.
pub fn leftovers(logger: Arc<dyn Logger>, config: &AwsConfig) -> Result<Leftovers> {
    let access_key_id = required(&config.access_key_id, "BBL_AWS_ACCESS_KEY_ID")?;
    let secret_access_key = required(&config.secret_access_key, "BBL_AWS_SECRET_ACCESS_KEY")?;
    let region = required(&config.region, "BBL_AWS_REGION")?;

    debug!(region, "Using aws CLI");
    let aws = Arc::new(AwsCli::new(access_key_id, secret_access_key, region));

    Ok(Leftovers::new(
        logger.clone(),
        kinds(aws.clone(), aws.clone(), aws.clone(), aws, logger),
    ))
}

/// Every AWS kind, in the order they have to be deleted: instances before
/// the profiles and volumes they hold, roles before their policies, and
/// the network from the outside in.
pub fn kinds(
    iam: Arc<dyn IamClient>,
    ec2: Arc<dyn Ec2Client>,
    elb: Arc<dyn ElbClient>,
    s3: Arc<dyn S3Client>,
    logger: Arc<dyn Logger>,
) -> Vec<Box<dyn ResourceKind>> {
    vec![
        Box::new(LoadBalancers::new(elb)),
        Box::new(Instances::new(ec2.clone())),
        Box::new(InstanceProfiles::new(iam.clone(), logger.clone())),
        Box::new(Roles::new(iam.clone(), logger.clone())),
        Box::new(Policies::new(iam.clone(), logger.clone())),
        Box::new(ServerCertificates::new(iam)),
        Box::new(KeyPairs::new(ec2.clone())),
        Box::new(NetworkInterfaces::new(ec2.clone())),
        Box::new(Volumes::new(ec2.clone())),
        Box::new(SecurityGroups::new(ec2.clone(), logger.clone())),
        Box::new(InternetGateways::new(ec2.clone(), logger)),
        Box::new(Subnets::new(ec2.clone())),
        Box::new(Vpcs::new(ec2)),
        Box::new(Buckets::new(s3)),
    ]
}

/// `id (Name:tag)` when the resource carries a Name tag, the bare id
/// otherwise.
pub(crate) fn labelled(id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{id} (Name:{name})"),
        _ => id.to_string(),
    }
}
