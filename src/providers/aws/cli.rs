use super::client::{
    AttachedPolicy, Ec2Client, ElbClient, IamClient, Instance, InstanceProfile, InternetGateway,
    NetworkInterface, Policy, PolicyVersion, S3Client, SecurityGroup, Subnet, Volume, Vpc,
};
use crate::infra::Tool;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// IAM, EC2, ELB and S3 through the `aws` CLI.
///
/// Credentials and region travel in the process environment; the CLI
/// handles pagination on its own.
pub struct AwsCli {
    tool: Tool,
}

impl AwsCli {
    pub fn new(access_key_id: &str, secret_access_key: &str, region: &str) -> Self {
        let tool = Tool::new("aws")
            .env("AWS_ACCESS_KEY_ID", access_key_id)
            .env("AWS_SECRET_ACCESS_KEY", secret_access_key)
            .env("AWS_DEFAULT_REGION", region)
            .arg("--output")
            .arg("json");

        Self { tool }
    }

    fn call(&self, args: &[&str]) -> Result<()> {
        self.tool.run(args).map(|_| ())
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct Tag {
    key: String,
    value: String,
}

fn name_tag(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .find(|tag| tag.key == "Name")
        .map(|tag| tag.value.clone())
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InstanceProfilesOutput {
    #[serde(default)]
    instance_profiles: Vec<InstanceProfileEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InstanceProfileEntry {
    instance_profile_name: String,
    #[serde(default)]
    roles: Vec<RoleEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RolesOutput {
    #[serde(default)]
    roles: Vec<RoleEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RoleEntry {
    role_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct AttachedPoliciesOutput {
    #[serde(default)]
    attached_policies: Vec<AttachedPolicyEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct AttachedPolicyEntry {
    policy_name: String,
    policy_arn: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PolicyNamesOutput {
    #[serde(default)]
    policy_names: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PoliciesOutput {
    #[serde(default)]
    policies: Vec<PolicyEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PolicyEntry {
    policy_name: String,
    arn: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PolicyVersionsOutput {
    #[serde(default)]
    versions: Vec<PolicyVersionEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PolicyVersionEntry {
    version_id: String,
    #[serde(default)]
    is_default_version: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ServerCertificatesOutput {
    #[serde(default)]
    server_certificate_metadata_list: Vec<ServerCertificateEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ServerCertificateEntry {
    server_certificate_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ReservationsOutput {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<InstanceEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InstanceEntry {
    instance_id: String,
    state: InstanceState,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InstanceState {
    name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct KeyPairsOutput {
    #[serde(default)]
    key_pairs: Vec<KeyPairEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct KeyPairEntry {
    key_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct NetworkInterfacesOutput {
    #[serde(default)]
    network_interfaces: Vec<NetworkInterfaceEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct NetworkInterfaceEntry {
    network_interface_id: String,
    status: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct VolumesOutput {
    #[serde(default)]
    volumes: Vec<VolumeEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct VolumeEntry {
    volume_id: String,
    state: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupsOutput {
    #[serde(default)]
    security_groups: Vec<SecurityGroupEntry>,
}

/// Rules are kept as raw JSON so they can be handed back verbatim to the
/// revoke calls.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupEntry {
    group_id: String,
    group_name: String,
    #[serde(default)]
    ip_permissions: Vec<Value>,
    #[serde(default)]
    ip_permissions_egress: Vec<Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InternetGatewaysOutput {
    #[serde(default)]
    internet_gateways: Vec<InternetGatewayEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InternetGatewayEntry {
    internet_gateway_id: String,
    #[serde(default)]
    attachments: Vec<Attachment>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Attachment {
    vpc_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SubnetsOutput {
    #[serde(default)]
    subnets: Vec<SubnetEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SubnetEntry {
    subnet_id: String,
    vpc_id: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct VpcsOutput {
    #[serde(default)]
    vpcs: Vec<VpcEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct VpcEntry {
    vpc_id: String,
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct LoadBalancersOutput {
    #[serde(default)]
    load_balancer_descriptions: Vec<LoadBalancerEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct LoadBalancerEntry {
    load_balancer_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct BucketsOutput {
    #[serde(default)]
    buckets: Vec<BucketEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct BucketEntry {
    name: String,
}

fn instance_profiles(output: InstanceProfilesOutput) -> Vec<InstanceProfile> {
    output
        .instance_profiles
        .into_iter()
        .map(|profile| InstanceProfile {
            name: profile.instance_profile_name,
            roles: profile.roles.into_iter().map(|role| role.role_name).collect(),
        })
        .collect()
}

fn instances(output: ReservationsOutput) -> Vec<Instance> {
    output
        .reservations
        .into_iter()
        .flat_map(|reservation| reservation.instances)
        .map(|instance| Instance {
            name: name_tag(&instance.tags),
            id: instance.instance_id,
            state: instance.state.name,
        })
        .collect()
}

fn security_groups(output: SecurityGroupsOutput) -> Vec<SecurityGroup> {
    output
        .security_groups
        .into_iter()
        .map(|group| SecurityGroup {
            has_ingress: !group.ip_permissions.is_empty(),
            has_egress: !group.ip_permissions_egress.is_empty(),
            id: group.group_id,
            name: group.group_name,
        })
        .collect()
}

fn internet_gateways(output: InternetGatewaysOutput) -> Vec<InternetGateway> {
    output
        .internet_gateways
        .into_iter()
        .map(|gateway| InternetGateway {
            name: name_tag(&gateway.tags),
            id: gateway.internet_gateway_id,
            vpc_ids: gateway
                .attachments
                .into_iter()
                .map(|attachment| attachment.vpc_id)
                .collect(),
        })
        .collect()
}

fn subnets(output: SubnetsOutput) -> Vec<Subnet> {
    output
        .subnets
        .into_iter()
        .map(|subnet| Subnet {
            name: name_tag(&subnet.tags),
            id: subnet.subnet_id,
            vpc_id: subnet.vpc_id,
        })
        .collect()
}

fn vpcs(output: VpcsOutput) -> Vec<Vpc> {
    output
        .vpcs
        .into_iter()
        .map(|vpc| Vpc {
            name: name_tag(&vpc.tags),
            id: vpc.vpc_id,
            is_default: vpc.is_default,
        })
        .collect()
}

impl IamClient for AwsCli {
    fn list_instance_profiles(&self) -> Result<Vec<InstanceProfile>> {
        let output = self.tool.json(["iam", "list-instance-profiles"])?;
        Ok(instance_profiles(output))
    }

    fn remove_role_from_instance_profile(&self, profile: &str, role: &str) -> Result<()> {
        self.call(&[
            "iam",
            "remove-role-from-instance-profile",
            "--instance-profile-name",
            profile,
            "--role-name",
            role,
        ])
    }

    fn delete_instance_profile(&self, profile: &str) -> Result<()> {
        self.call(&[
            "iam",
            "delete-instance-profile",
            "--instance-profile-name",
            profile,
        ])
    }

    fn list_roles(&self) -> Result<Vec<String>> {
        let output: RolesOutput = self.tool.json(["iam", "list-roles"])?;
        Ok(output.roles.into_iter().map(|role| role.role_name).collect())
    }

    fn list_attached_role_policies(&self, role: &str) -> Result<Vec<AttachedPolicy>> {
        let output: AttachedPoliciesOutput = self
            .tool
            .json(["iam", "list-attached-role-policies", "--role-name", role])?;

        Ok(output
            .attached_policies
            .into_iter()
            .map(|policy| AttachedPolicy {
                name: policy.policy_name,
                arn: policy.policy_arn,
            })
            .collect())
    }

    fn detach_role_policy(&self, role: &str, policy_arn: &str) -> Result<()> {
        self.call(&[
            "iam",
            "detach-role-policy",
            "--role-name",
            role,
            "--policy-arn",
            policy_arn,
        ])
    }

    fn list_role_policies(&self, role: &str) -> Result<Vec<String>> {
        let output: PolicyNamesOutput = self
            .tool
            .json(["iam", "list-role-policies", "--role-name", role])?;
        Ok(output.policy_names)
    }

    fn delete_role_policy(&self, role: &str, policy: &str) -> Result<()> {
        self.call(&[
            "iam",
            "delete-role-policy",
            "--role-name",
            role,
            "--policy-name",
            policy,
        ])
    }

    fn delete_role(&self, role: &str) -> Result<()> {
        self.call(&["iam", "delete-role", "--role-name", role])
    }

    fn list_policies(&self) -> Result<Vec<Policy>> {
        let output: PoliciesOutput = self
            .tool
            .json(["iam", "list-policies", "--scope", "Local"])?;

        Ok(output
            .policies
            .into_iter()
            .map(|policy| Policy {
                name: policy.policy_name,
                arn: policy.arn,
            })
            .collect())
    }

    fn list_policy_versions(&self, policy_arn: &str) -> Result<Vec<PolicyVersion>> {
        let output: PolicyVersionsOutput = self
            .tool
            .json(["iam", "list-policy-versions", "--policy-arn", policy_arn])?;

        Ok(output
            .versions
            .into_iter()
            .map(|version| PolicyVersion {
                id: version.version_id,
                is_default: version.is_default_version,
            })
            .collect())
    }

    fn delete_policy_version(&self, policy_arn: &str, version_id: &str) -> Result<()> {
        self.call(&[
            "iam",
            "delete-policy-version",
            "--policy-arn",
            policy_arn,
            "--version-id",
            version_id,
        ])
    }

    fn delete_policy(&self, policy_arn: &str) -> Result<()> {
        self.call(&["iam", "delete-policy", "--policy-arn", policy_arn])
    }

    fn list_server_certificates(&self) -> Result<Vec<String>> {
        let output: ServerCertificatesOutput =
            self.tool.json(["iam", "list-server-certificates"])?;

        Ok(output
            .server_certificate_metadata_list
            .into_iter()
            .map(|certificate| certificate.server_certificate_name)
            .collect())
    }

    fn delete_server_certificate(&self, name: &str) -> Result<()> {
        self.call(&[
            "iam",
            "delete-server-certificate",
            "--server-certificate-name",
            name,
        ])
    }
}

impl AwsCli {
    /// Current rules of one group, in the shape `--ip-permissions` expects
    fn security_group_rules(&self, group_id: &str) -> Result<SecurityGroupEntry> {
        let output: SecurityGroupsOutput = self
            .tool
            .json(["ec2", "describe-security-groups", "--group-ids", group_id])?;

        output
            .security_groups
            .into_iter()
            .next()
            .with_context(|| format!("security group {group_id} not found"))
    }

    fn revoke(&self, operation: &str, group_id: &str, rules: Vec<Value>) -> Result<()> {
        if rules.is_empty() {
            return Ok(());
        }

        let permissions = serde_json::to_string(&rules)?;
        self.call(&[
            "ec2",
            operation,
            "--group-id",
            group_id,
            "--ip-permissions",
            permissions.as_str(),
        ])
    }
}

impl Ec2Client for AwsCli {
    fn describe_instances(&self) -> Result<Vec<Instance>> {
        let output = self.tool.json(["ec2", "describe-instances"])?;
        Ok(instances(output))
    }

    fn terminate_instance(&self, id: &str) -> Result<()> {
        self.call(&["ec2", "terminate-instances", "--instance-ids", id])
    }

    fn describe_key_pairs(&self) -> Result<Vec<String>> {
        let output: KeyPairsOutput = self.tool.json(["ec2", "describe-key-pairs"])?;
        Ok(output.key_pairs.into_iter().map(|pair| pair.key_name).collect())
    }

    fn delete_key_pair(&self, name: &str) -> Result<()> {
        self.call(&["ec2", "delete-key-pair", "--key-name", name])
    }

    fn describe_network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        let output: NetworkInterfacesOutput =
            self.tool.json(["ec2", "describe-network-interfaces"])?;

        Ok(output
            .network_interfaces
            .into_iter()
            .map(|interface| NetworkInterface {
                id: interface.network_interface_id,
                status: interface.status,
            })
            .collect())
    }

    fn delete_network_interface(&self, id: &str) -> Result<()> {
        self.call(&[
            "ec2",
            "delete-network-interface",
            "--network-interface-id",
            id,
        ])
    }

    fn describe_volumes(&self) -> Result<Vec<Volume>> {
        let output: VolumesOutput = self.tool.json(["ec2", "describe-volumes"])?;

        Ok(output
            .volumes
            .into_iter()
            .map(|volume| Volume {
                id: volume.volume_id,
                state: volume.state,
            })
            .collect())
    }

    fn delete_volume(&self, id: &str) -> Result<()> {
        self.call(&["ec2", "delete-volume", "--volume-id", id])
    }

    fn describe_security_groups(&self) -> Result<Vec<SecurityGroup>> {
        let output = self.tool.json(["ec2", "describe-security-groups"])?;
        Ok(security_groups(output))
    }

    fn revoke_security_group_ingress(&self, group_id: &str) -> Result<()> {
        let group = self.security_group_rules(group_id)?;
        self.revoke(
            "revoke-security-group-ingress",
            group_id,
            group.ip_permissions,
        )
    }

    fn revoke_security_group_egress(&self, group_id: &str) -> Result<()> {
        let group = self.security_group_rules(group_id)?;
        self.revoke(
            "revoke-security-group-egress",
            group_id,
            group.ip_permissions_egress,
        )
    }

    fn delete_security_group(&self, group_id: &str) -> Result<()> {
        self.call(&["ec2", "delete-security-group", "--group-id", group_id])
    }

    fn describe_internet_gateways(&self) -> Result<Vec<InternetGateway>> {
        let output = self.tool.json(["ec2", "describe-internet-gateways"])?;
        Ok(internet_gateways(output))
    }

    fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.call(&[
            "ec2",
            "detach-internet-gateway",
            "--internet-gateway-id",
            gateway_id,
            "--vpc-id",
            vpc_id,
        ])
    }

    fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()> {
        self.call(&[
            "ec2",
            "delete-internet-gateway",
            "--internet-gateway-id",
            gateway_id,
        ])
    }

    fn describe_subnets(&self) -> Result<Vec<Subnet>> {
        let output = self.tool.json(["ec2", "describe-subnets"])?;
        Ok(subnets(output))
    }

    fn delete_subnet(&self, id: &str) -> Result<()> {
        self.call(&["ec2", "delete-subnet", "--subnet-id", id])
    }

    fn describe_vpcs(&self) -> Result<Vec<Vpc>> {
        let output = self.tool.json(["ec2", "describe-vpcs"])?;
        Ok(vpcs(output))
    }

    fn delete_vpc(&self, id: &str) -> Result<()> {
        self.call(&["ec2", "delete-vpc", "--vpc-id", id])
    }
}

impl ElbClient for AwsCli {
    fn describe_load_balancers(&self) -> Result<Vec<String>> {
        let output: LoadBalancersOutput = self.tool.json(["elb", "describe-load-balancers"])?;

        Ok(output
            .load_balancer_descriptions
            .into_iter()
            .map(|balancer| balancer.load_balancer_name)
            .collect())
    }

    fn delete_load_balancer(&self, name: &str) -> Result<()> {
        self.call(&["elb", "delete-load-balancer", "--load-balancer-name", name])
    }
}

impl S3Client for AwsCli {
    fn list_buckets(&self) -> Result<Vec<String>> {
        let output: BucketsOutput = self.tool.json(["s3api", "list-buckets"])?;
        Ok(output.buckets.into_iter().map(|bucket| bucket.name).collect())
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        let url = format!("s3://{name}");
        self.call(&["s3", "rb", url.as_str(), "--force"])
    }
}
