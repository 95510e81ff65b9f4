use super::Recorder;
use crate::providers::aws::client::{
    AttachedPolicy, Ec2Client, ElbClient, IamClient, Instance, InstanceProfile, InternetGateway,
    NetworkInterface, Policy, PolicyVersion, S3Client, SecurityGroup, Subnet, Volume, Vpc,
};
use anyhow::Result;
use std::sync::RwLock;

struct MockRole {
    name: String,
    attached: Vec<AttachedPolicy>,
    inline: Vec<String>,
}

struct MockPolicy {
    policy: Policy,
    versions: Vec<PolicyVersion>,
}

#[derive(Default)]
struct IamInventory {
    instance_profiles: Vec<InstanceProfile>,
    roles: Vec<MockRole>,
    policies: Vec<MockPolicy>,
    server_certificates: Vec<String>,
}

/// In-memory IAM account.
#[derive(Default)]
pub struct MockIam {
    inventory: RwLock<IamInventory>,
    recorder: Recorder,
}

impl MockIam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instance_profile(&self, name: &str, roles: &[&str]) {
        self.inventory
            .write()
            .unwrap()
            .instance_profiles
            .push(InstanceProfile {
                name: name.to_string(),
                roles: roles.iter().map(|role| role.to_string()).collect(),
            });
    }

    /// `attached` holds managed policies as (name, arn), `inline` the
    /// inline policy names
    pub fn add_role(&self, name: &str, attached: &[(&str, &str)], inline: &[&str]) {
        self.inventory.write().unwrap().roles.push(MockRole {
            name: name.to_string(),
            attached: attached
                .iter()
                .map(|(name, arn)| AttachedPolicy {
                    name: name.to_string(),
                    arn: arn.to_string(),
                })
                .collect(),
            inline: inline.iter().map(|policy| policy.to_string()).collect(),
        });
    }

    /// `versions` holds (version id, is default)
    pub fn add_policy(&self, name: &str, arn: &str, versions: &[(&str, bool)]) {
        self.inventory.write().unwrap().policies.push(MockPolicy {
            policy: Policy {
                name: name.to_string(),
                arn: arn.to_string(),
            },
            versions: versions
                .iter()
                .map(|(id, is_default)| PolicyVersion {
                    id: id.to_string(),
                    is_default: *is_default,
                })
                .collect(),
        });
    }

    pub fn add_server_certificate(&self, name: &str) {
        self.inventory
            .write()
            .unwrap()
            .server_certificates
            .push(name.to_string());
    }

    pub fn instance_profiles(&self) -> Vec<InstanceProfile> {
        self.inventory.read().unwrap().instance_profiles.clone()
    }

    pub fn roles(&self) -> Vec<String> {
        self.inventory
            .read()
            .unwrap()
            .roles
            .iter()
            .map(|role| role.name.clone())
            .collect()
    }

    pub fn server_certificates(&self) -> Vec<String> {
        self.inventory.read().unwrap().server_certificates.clone()
    }

    pub fn set_fail_on(&self, command: &str, message: &str) {
        self.recorder.set_fail_on(command, message);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.recorder.commands()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.recorder.count(operation)
    }
}

impl IamClient for MockIam {
    fn list_instance_profiles(&self) -> Result<Vec<InstanceProfile>> {
        self.recorder.record("list_instance_profiles", &[])?;
        Ok(self.instance_profiles())
    }

    fn remove_role_from_instance_profile(&self, profile: &str, role: &str) -> Result<()> {
        self.recorder
            .record("remove_role_from_instance_profile", &[profile, role])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(existing) = inventory
            .instance_profiles
            .iter_mut()
            .find(|existing| existing.name == profile)
        {
            existing.roles.retain(|existing| existing != role);
        }
        Ok(())
    }

    fn delete_instance_profile(&self, profile: &str) -> Result<()> {
        self.recorder.record("delete_instance_profile", &[profile])?;

        self.inventory
            .write()
            .unwrap()
            .instance_profiles
            .retain(|existing| existing.name != profile);
        Ok(())
    }

    fn list_roles(&self) -> Result<Vec<String>> {
        self.recorder.record("list_roles", &[])?;
        Ok(self.roles())
    }

    fn list_attached_role_policies(&self, role: &str) -> Result<Vec<AttachedPolicy>> {
        self.recorder.record("list_attached_role_policies", &[role])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .roles
            .iter()
            .find(|existing| existing.name == role)
            .map(|existing| existing.attached.clone())
            .unwrap_or_default())
    }

    fn detach_role_policy(&self, role: &str, policy_arn: &str) -> Result<()> {
        self.recorder.record("detach_role_policy", &[role, policy_arn])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(existing) = inventory.roles.iter_mut().find(|r| r.name == role) {
            existing.attached.retain(|policy| policy.arn != policy_arn);
        }
        Ok(())
    }

    fn list_role_policies(&self, role: &str) -> Result<Vec<String>> {
        self.recorder.record("list_role_policies", &[role])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .roles
            .iter()
            .find(|existing| existing.name == role)
            .map(|existing| existing.inline.clone())
            .unwrap_or_default())
    }

    fn delete_role_policy(&self, role: &str, policy: &str) -> Result<()> {
        self.recorder.record("delete_role_policy", &[role, policy])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(existing) = inventory.roles.iter_mut().find(|r| r.name == role) {
            existing.inline.retain(|name| name != policy);
        }
        Ok(())
    }

    fn delete_role(&self, role: &str) -> Result<()> {
        self.recorder.record("delete_role", &[role])?;

        self.inventory
            .write()
            .unwrap()
            .roles
            .retain(|existing| existing.name != role);
        Ok(())
    }

    fn list_policies(&self) -> Result<Vec<Policy>> {
        self.recorder.record("list_policies", &[])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .policies
            .iter()
            .map(|existing| existing.policy.clone())
            .collect())
    }

    fn list_policy_versions(&self, policy_arn: &str) -> Result<Vec<PolicyVersion>> {
        self.recorder.record("list_policy_versions", &[policy_arn])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .policies
            .iter()
            .find(|existing| existing.policy.arn == policy_arn)
            .map(|existing| existing.versions.clone())
            .unwrap_or_default())
    }

    fn delete_policy_version(&self, policy_arn: &str, version_id: &str) -> Result<()> {
        self.recorder
            .record("delete_policy_version", &[policy_arn, version_id])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(existing) = inventory
            .policies
            .iter_mut()
            .find(|existing| existing.policy.arn == policy_arn)
        {
            existing.versions.retain(|version| version.id != version_id);
        }
        Ok(())
    }

    fn delete_policy(&self, policy_arn: &str) -> Result<()> {
        self.recorder.record("delete_policy", &[policy_arn])?;

        self.inventory
            .write()
            .unwrap()
            .policies
            .retain(|existing| existing.policy.arn != policy_arn);
        Ok(())
    }

    fn list_server_certificates(&self) -> Result<Vec<String>> {
        self.recorder.record("list_server_certificates", &[])?;
        Ok(self.server_certificates())
    }

    fn delete_server_certificate(&self, name: &str) -> Result<()> {
        self.recorder.record("delete_server_certificate", &[name])?;

        self.inventory
            .write()
            .unwrap()
            .server_certificates
            .retain(|existing| existing != name);
        Ok(())
    }
}

#[derive(Default)]
struct Ec2Inventory {
    instances: Vec<Instance>,
    key_pairs: Vec<String>,
    network_interfaces: Vec<NetworkInterface>,
    volumes: Vec<Volume>,
    security_groups: Vec<SecurityGroup>,
    internet_gateways: Vec<InternetGateway>,
    subnets: Vec<Subnet>,
    vpcs: Vec<Vpc>,
}

/// In-memory EC2 region. Terminated instances move to `terminated`
/// instead of disappearing, as they do on the real API.
#[derive(Default)]
pub struct MockEc2 {
    inventory: RwLock<Ec2Inventory>,
    recorder: Recorder,
}

impl MockEc2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instance(&self, id: &str, name: Option<&str>, state: &str) {
        self.inventory.write().unwrap().instances.push(Instance {
            id: id.to_string(),
            name: name.map(str::to_string),
            state: state.to_string(),
        });
    }

    pub fn add_key_pair(&self, name: &str) {
        self.inventory.write().unwrap().key_pairs.push(name.to_string());
    }

    pub fn add_network_interface(&self, id: &str, status: &str) {
        self.inventory
            .write()
            .unwrap()
            .network_interfaces
            .push(NetworkInterface {
                id: id.to_string(),
                status: status.to_string(),
            });
    }

    pub fn add_volume(&self, id: &str, state: &str) {
        self.inventory.write().unwrap().volumes.push(Volume {
            id: id.to_string(),
            state: state.to_string(),
        });
    }

    pub fn add_security_group(&self, id: &str, name: &str, has_ingress: bool, has_egress: bool) {
        self.inventory
            .write()
            .unwrap()
            .security_groups
            .push(SecurityGroup {
                id: id.to_string(),
                name: name.to_string(),
                has_ingress,
                has_egress,
            });
    }

    pub fn add_internet_gateway(&self, id: &str, name: Option<&str>, vpc_ids: &[&str]) {
        self.inventory
            .write()
            .unwrap()
            .internet_gateways
            .push(InternetGateway {
                id: id.to_string(),
                name: name.map(str::to_string),
                vpc_ids: vpc_ids.iter().map(|vpc| vpc.to_string()).collect(),
            });
    }

    pub fn add_subnet(&self, id: &str, name: Option<&str>, vpc_id: &str) {
        self.inventory.write().unwrap().subnets.push(Subnet {
            id: id.to_string(),
            name: name.map(str::to_string),
            vpc_id: vpc_id.to_string(),
        });
    }

    pub fn add_vpc(&self, id: &str, name: Option<&str>, is_default: bool) {
        self.inventory.write().unwrap().vpcs.push(Vpc {
            id: id.to_string(),
            name: name.map(str::to_string),
            is_default,
        });
    }

    pub fn instances(&self) -> Vec<Instance> {
        self.inventory.read().unwrap().instances.clone()
    }

    pub fn vpcs(&self) -> Vec<String> {
        self.inventory
            .read()
            .unwrap()
            .vpcs
            .iter()
            .map(|vpc| vpc.id.clone())
            .collect()
    }

    pub fn set_fail_on(&self, command: &str, message: &str) {
        self.recorder.set_fail_on(command, message);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.recorder.commands()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.recorder.count(operation)
    }
}

impl Ec2Client for MockEc2 {
    fn describe_instances(&self) -> Result<Vec<Instance>> {
        self.recorder.record("describe_instances", &[])?;
        Ok(self.instances())
    }

    fn terminate_instance(&self, id: &str) -> Result<()> {
        self.recorder.record("terminate_instance", &[id])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(instance) = inventory.instances.iter_mut().find(|i| i.id == id) {
            instance.state = "terminated".to_string();
        }
        Ok(())
    }

    fn describe_key_pairs(&self) -> Result<Vec<String>> {
        self.recorder.record("describe_key_pairs", &[])?;
        Ok(self.inventory.read().unwrap().key_pairs.clone())
    }

    fn delete_key_pair(&self, name: &str) -> Result<()> {
        self.recorder.record("delete_key_pair", &[name])?;
        self.inventory
            .write()
            .unwrap()
            .key_pairs
            .retain(|existing| existing != name);
        Ok(())
    }

    fn describe_network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        self.recorder.record("describe_network_interfaces", &[])?;
        Ok(self.inventory.read().unwrap().network_interfaces.clone())
    }

    fn delete_network_interface(&self, id: &str) -> Result<()> {
        self.recorder.record("delete_network_interface", &[id])?;
        self.inventory
            .write()
            .unwrap()
            .network_interfaces
            .retain(|existing| existing.id != id);
        Ok(())
    }

    fn describe_volumes(&self) -> Result<Vec<Volume>> {
        self.recorder.record("describe_volumes", &[])?;
        Ok(self.inventory.read().unwrap().volumes.clone())
    }

    fn delete_volume(&self, id: &str) -> Result<()> {
        self.recorder.record("delete_volume", &[id])?;
        self.inventory
            .write()
            .unwrap()
            .volumes
            .retain(|existing| existing.id != id);
        Ok(())
    }

    fn describe_security_groups(&self) -> Result<Vec<SecurityGroup>> {
        self.recorder.record("describe_security_groups", &[])?;
        Ok(self.inventory.read().unwrap().security_groups.clone())
    }

    fn revoke_security_group_ingress(&self, group_id: &str) -> Result<()> {
        self.recorder
            .record("revoke_security_group_ingress", &[group_id])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(group) = inventory
            .security_groups
            .iter_mut()
            .find(|group| group.id == group_id)
        {
            group.has_ingress = false;
        }
        Ok(())
    }

    fn revoke_security_group_egress(&self, group_id: &str) -> Result<()> {
        self.recorder
            .record("revoke_security_group_egress", &[group_id])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(group) = inventory
            .security_groups
            .iter_mut()
            .find(|group| group.id == group_id)
        {
            group.has_egress = false;
        }
        Ok(())
    }

    fn delete_security_group(&self, group_id: &str) -> Result<()> {
        self.recorder.record("delete_security_group", &[group_id])?;
        self.inventory
            .write()
            .unwrap()
            .security_groups
            .retain(|existing| existing.id != group_id);
        Ok(())
    }

    fn describe_internet_gateways(&self) -> Result<Vec<InternetGateway>> {
        self.recorder.record("describe_internet_gateways", &[])?;
        Ok(self.inventory.read().unwrap().internet_gateways.clone())
    }

    fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.recorder
            .record("detach_internet_gateway", &[gateway_id, vpc_id])?;

        let mut inventory = self.inventory.write().unwrap();
        if let Some(gateway) = inventory
            .internet_gateways
            .iter_mut()
            .find(|gateway| gateway.id == gateway_id)
        {
            gateway.vpc_ids.retain(|existing| existing != vpc_id);
        }
        Ok(())
    }

    fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()> {
        self.recorder
            .record("delete_internet_gateway", &[gateway_id])?;
        self.inventory
            .write()
            .unwrap()
            .internet_gateways
            .retain(|existing| existing.id != gateway_id);
        Ok(())
    }

    fn describe_subnets(&self) -> Result<Vec<Subnet>> {
        self.recorder.record("describe_subnets", &[])?;
        Ok(self.inventory.read().unwrap().subnets.clone())
    }

    fn delete_subnet(&self, id: &str) -> Result<()> {
        self.recorder.record("delete_subnet", &[id])?;
        self.inventory
            .write()
            .unwrap()
            .subnets
            .retain(|existing| existing.id != id);
        Ok(())
    }

    fn describe_vpcs(&self) -> Result<Vec<Vpc>> {
        self.recorder.record("describe_vpcs", &[])?;
        Ok(self.inventory.read().unwrap().vpcs.clone())
    }

    fn delete_vpc(&self, id: &str) -> Result<()> {
        self.recorder.record("delete_vpc", &[id])?;
        self.inventory
            .write()
            .unwrap()
            .vpcs
            .retain(|existing| existing.id != id);
        Ok(())
    }
}

/// In-memory classic load balancers.
#[derive(Default)]
pub struct MockElb {
    load_balancers: RwLock<Vec<String>>,
    recorder: Recorder,
}

impl MockElb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_load_balancer(&self, name: &str) {
        self.load_balancers.write().unwrap().push(name.to_string());
    }

    pub fn load_balancers(&self) -> Vec<String> {
        self.load_balancers.read().unwrap().clone()
    }

    pub fn set_fail_on(&self, command: &str, message: &str) {
        self.recorder.set_fail_on(command, message);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.recorder.commands()
    }
}

impl ElbClient for MockElb {
    fn describe_load_balancers(&self) -> Result<Vec<String>> {
        self.recorder.record("describe_load_balancers", &[])?;
        Ok(self.load_balancers())
    }

    fn delete_load_balancer(&self, name: &str) -> Result<()> {
        self.recorder.record("delete_load_balancer", &[name])?;
        self.load_balancers
            .write()
            .unwrap()
            .retain(|existing| existing != name);
        Ok(())
    }
}

/// In-memory S3 buckets.
#[derive(Default)]
pub struct MockS3 {
    buckets: RwLock<Vec<String>>,
    recorder: Recorder,
}

impl MockS3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bucket(&self, name: &str) {
        self.buckets.write().unwrap().push(name.to_string());
    }

    pub fn buckets(&self) -> Vec<String> {
        self.buckets.read().unwrap().clone()
    }

    pub fn set_fail_on(&self, command: &str, message: &str) {
        self.recorder.set_fail_on(command, message);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.recorder.commands()
    }
}

impl S3Client for MockS3 {
    fn list_buckets(&self) -> Result<Vec<String>> {
        self.recorder.record("list_buckets", &[])?;
        Ok(self.buckets())
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.recorder.record("delete_bucket", &[name])?;
        self.buckets
            .write()
            .unwrap()
            .retain(|existing| existing != name);
        Ok(())
    }
}
