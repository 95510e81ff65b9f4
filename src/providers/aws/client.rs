//! The slice of the AWS API each resource kind needs.
//!
//! Pagination, retries and auth are the implementation's business.

use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceProfile {
    pub name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPolicy {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyVersion {
    pub id: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    /// Value of the `Name` tag
    pub name: Option<String>,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub id: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    pub has_ingress: bool,
    pub has_egress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetGateway {
    pub id: String,
    pub name: Option<String>,
    pub vpc_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub id: String,
    pub name: Option<String>,
    pub vpc_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vpc {
    pub id: String,
    pub name: Option<String>,
    pub is_default: bool,
}

pub trait IamClient: Send + Sync {
    fn list_instance_profiles(&self) -> Result<Vec<InstanceProfile>>;

    fn remove_role_from_instance_profile(&self, profile: &str, role: &str) -> Result<()>;

    fn delete_instance_profile(&self, profile: &str) -> Result<()>;

    fn list_roles(&self) -> Result<Vec<String>>;

    fn list_attached_role_policies(&self, role: &str) -> Result<Vec<AttachedPolicy>>;

    fn detach_role_policy(&self, role: &str, policy_arn: &str) -> Result<()>;

    /// Names of the role's inline policies
    fn list_role_policies(&self, role: &str) -> Result<Vec<String>>;

    fn delete_role_policy(&self, role: &str, policy: &str) -> Result<()>;

    fn delete_role(&self, role: &str) -> Result<()>;

    /// Customer managed policies only
    fn list_policies(&self) -> Result<Vec<Policy>>;

    fn list_policy_versions(&self, policy_arn: &str) -> Result<Vec<PolicyVersion>>;

    fn delete_policy_version(&self, policy_arn: &str, version_id: &str) -> Result<()>;

    fn delete_policy(&self, policy_arn: &str) -> Result<()>;

    fn list_server_certificates(&self) -> Result<Vec<String>>;

    fn delete_server_certificate(&self, name: &str) -> Result<()>;
}

pub trait Ec2Client: Send + Sync {
    fn describe_instances(&self) -> Result<Vec<Instance>>;

    fn terminate_instance(&self, id: &str) -> Result<()>;

    fn describe_key_pairs(&self) -> Result<Vec<String>>;

    fn delete_key_pair(&self, name: &str) -> Result<()>;

    fn describe_network_interfaces(&self) -> Result<Vec<NetworkInterface>>;

    fn delete_network_interface(&self, id: &str) -> Result<()>;

    fn describe_volumes(&self) -> Result<Vec<Volume>>;

    fn delete_volume(&self, id: &str) -> Result<()>;

    fn describe_security_groups(&self) -> Result<Vec<SecurityGroup>>;

    /// Revokes every ingress rule of the group
    fn revoke_security_group_ingress(&self, group_id: &str) -> Result<()>;

    /// Revokes every egress rule of the group
    fn revoke_security_group_egress(&self, group_id: &str) -> Result<()>;

    fn delete_security_group(&self, group_id: &str) -> Result<()>;

    fn describe_internet_gateways(&self) -> Result<Vec<InternetGateway>>;

    fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()>;

    fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()>;

    fn describe_subnets(&self) -> Result<Vec<Subnet>>;

    fn delete_subnet(&self, id: &str) -> Result<()>;

    fn describe_vpcs(&self) -> Result<Vec<Vpc>>;

    fn delete_vpc(&self, id: &str) -> Result<()>;
}

pub trait ElbClient: Send + Sync {
    fn describe_load_balancers(&self) -> Result<Vec<String>>;

    fn delete_load_balancer(&self, name: &str) -> Result<()>;
}

pub trait S3Client: Send + Sync {
    fn list_buckets(&self) -> Result<Vec<String>>;

    /// Empties the bucket and removes it
    fn delete_bucket(&self, name: &str) -> Result<()>;
}
