use super::client::Ec2Client;
use super::labelled;
use crate::domain::{Filter, Logger, Noun, Resource, ResourceKind};
use crate::services::report;
use anyhow::Result;
use std::sync::Arc;

/// States in which an instance is already on its way out.
const GONE_STATES: [&str; 2] = ["terminated", "shutting-down"];

pub struct Instances {
    client: Arc<dyn Ec2Client>,
}

impl Instances {
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Instances {
    fn type_name(&self) -> &'static str {
        "ec2-instance"
    }

    fn noun(&self) -> Noun {
        Noun::new("instance", "instances")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_instances()?
            .into_iter()
            .filter(|instance| !GONE_STATES.contains(&instance.state.as_str()))
            .map(|instance| {
                let name = labelled(&instance.id, instance.name.as_deref());
                Resource::new(instance.id).named(name)
            })
            .filter(|resource| filter.matches(&resource.name))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.terminate_instance(&resource.id)
    }
}

pub struct KeyPairs {
    client: Arc<dyn Ec2Client>,
}

impl KeyPairs {
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for KeyPairs {
    fn type_name(&self) -> &'static str {
        "ec2-key-pair"
    }

    fn noun(&self) -> Noun {
        Noun::new("key pair", "key pairs")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_key_pairs()?
            .into_iter()
            .filter(|name| filter.matches(name))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_key_pair(&resource.id)
    }
}

/// Detached network interfaces. Attached ones go with their instance.
pub struct NetworkInterfaces {
    client: Arc<dyn Ec2Client>,
}

impl NetworkInterfaces {
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for NetworkInterfaces {
    fn type_name(&self) -> &'static str {
        "ec2-network-interface"
    }

    fn noun(&self) -> Noun {
        Noun::new("network interface", "network interfaces")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_network_interfaces()?
            .into_iter()
            .filter(|interface| interface.status == "available")
            .filter(|interface| filter.matches(&interface.id))
            .map(|interface| Resource::new(interface.id))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_network_interface(&resource.id)
    }
}

/// Unattached EBS volumes.
pub struct Volumes {
    client: Arc<dyn Ec2Client>,
}

impl Volumes {
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Volumes {
    fn type_name(&self) -> &'static str {
        "ec2-volume"
    }

    fn noun(&self) -> Noun {
        Noun::new("volume", "volumes")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_volumes()?
            .into_iter()
            .filter(|volume| volume.state == "available")
            .filter(|volume| filter.matches(&volume.id))
            .map(|volume| Resource::new(volume.id))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_volume(&resource.id)
    }
}

/// Security groups other than a VPC's `default` group. Rules are revoked
/// first so groups referencing each other can be deleted.
pub struct SecurityGroups {
    client: Arc<dyn Ec2Client>,
    logger: Arc<dyn Logger>,
}

impl SecurityGroups {
    pub fn new(client: Arc<dyn Ec2Client>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }
}

const INGRESS: &str = "ingress";
const EGRESS: &str = "egress";

impl ResourceKind for SecurityGroups {
    fn type_name(&self) -> &'static str {
        "ec2-security-group"
    }

    fn noun(&self) -> Noun {
        Noun::new("security group", "security groups")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_security_groups()?
            .into_iter()
            .filter(|group| group.name != "default")
            .map(|group| {
                let name = labelled(&group.id, Some(&group.name));
                let mut rules = Vec::new();
                if group.has_ingress {
                    rules.push(INGRESS.to_string());
                }
                if group.has_egress {
                    rules.push(EGRESS.to_string());
                }
                Resource::new(group.id).named(name).with_dependents(rules)
            })
            .filter(|resource| filter.matches(&resource.name))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        for rules in &resource.dependents {
            let revoked = if rules == INGRESS {
                self.client.revoke_security_group_ingress(&resource.id)
            } else {
                self.client.revoke_security_group_egress(&resource.id)
            };

            report(
                self.logger.as_ref(),
                &format!("revoking {rules} rules of"),
                self.noun(),
                &resource.name,
                revoked,
            );
        }

        self.client.delete_security_group(&resource.id)
    }
}

/// Internet gateways, detached from their VPCs before deletion.
pub struct InternetGateways {
    client: Arc<dyn Ec2Client>,
    logger: Arc<dyn Logger>,
}

impl InternetGateways {
    pub fn new(client: Arc<dyn Ec2Client>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }
}

impl ResourceKind for InternetGateways {
    fn type_name(&self) -> &'static str {
        "ec2-internet-gateway"
    }

    fn noun(&self) -> Noun {
        Noun::new("internet gateway", "internet gateways")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_internet_gateways()?
            .into_iter()
            .map(|gateway| {
                let name = labelled(&gateway.id, gateway.name.as_deref());
                Resource::new(gateway.id)
                    .named(name)
                    .with_dependents(gateway.vpc_ids)
            })
            .filter(|resource| filter.matches(&resource.name))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        for vpc in &resource.dependents {
            report(
                self.logger.as_ref(),
                &format!("detaching vpc {vpc} from"),
                self.noun(),
                &resource.name,
                self.client.detach_internet_gateway(&resource.id, vpc),
            );
        }

        self.client.delete_internet_gateway(&resource.id)
    }
}

pub struct Subnets {
    client: Arc<dyn Ec2Client>,
}

impl Subnets {
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Subnets {
    fn type_name(&self) -> &'static str {
        "ec2-subnet"
    }

    fn noun(&self) -> Noun {
        Noun::new("subnet", "subnets")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_subnets()?
            .into_iter()
            .map(|subnet| {
                let name = labelled(&subnet.id, subnet.name.as_deref());
                Resource::new(subnet.id)
                    .named(name)
                    .located(Some(subnet.vpc_id))
            })
            .filter(|resource| filter.matches(&resource.name))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_subnet(&resource.id)
    }
}

/// Non-default VPCs. Their subnets, gateways and groups come earlier in the
/// deletion order.
pub struct Vpcs {
    client: Arc<dyn Ec2Client>,
}

impl Vpcs {
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Vpcs {
    fn type_name(&self) -> &'static str {
        "ec2-vpc"
    }

    fn noun(&self) -> Noun {
        Noun::new("vpc", "vpcs")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_vpcs()?
            .into_iter()
            .filter(|vpc| !vpc.is_default)
            .map(|vpc| {
                let name = labelled(&vpc.id, vpc.name.as_deref());
                Resource::new(vpc.id).named(name)
            })
            .filter(|resource| filter.matches(&resource.name))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_vpc(&resource.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockEc2, RecordingLogger};

    fn setup() -> (Arc<MockEc2>, Arc<RecordingLogger>) {
        (Arc::new(MockEc2::new()), Arc::new(RecordingLogger::new(true)))
    }

    #[test]
    fn test_instances_skip_terminated_and_label_names() {
        let (ec2, _logger) = setup();
        ec2.add_instance("i-1", Some("env-bosh"), "running");
        ec2.add_instance("i-2", None, "stopped");
        ec2.add_instance("i-3", Some("env-gone"), "terminated");
        ec2.add_instance("i-4", Some("env-leaving"), "shutting-down");
        let kind = Instances::new(ec2.clone());

        let names: Vec<String> = kind
            .list(&Filter::default())
            .unwrap()
            .into_iter()
            .map(|resource| resource.name)
            .collect();

        assert_eq!(names, vec!["i-1 (Name:env-bosh)".to_string(), "i-2".to_string()]);
    }

    #[test]
    fn test_instances_filter_matches_name_tag() {
        let (ec2, _logger) = setup();
        ec2.add_instance("i-1", Some("env-bosh"), "running");
        ec2.add_instance("i-2", Some("prod-web"), "running");
        let kind = Instances::new(ec2.clone());

        let resources = kind.list(&Filter::new("env")).unwrap();
        assert_eq!(resources.len(), 1);

        kind.delete(&resources[0]).unwrap();
        assert_eq!(ec2.get_commands().last().map(String::as_str), Some("terminate_instance:i-1"));
    }

    #[test]
    fn test_volumes_and_interfaces_only_when_available() {
        let (ec2, _logger) = setup();
        ec2.add_volume("vol-1", "available");
        ec2.add_volume("vol-2", "in-use");
        ec2.add_network_interface("eni-1", "in-use");
        ec2.add_network_interface("eni-2", "available");

        let volumes = Volumes::new(ec2.clone()).list(&Filter::default()).unwrap();
        let interfaces = NetworkInterfaces::new(ec2.clone())
            .list(&Filter::default())
            .unwrap();

        assert_eq!(volumes, vec![Resource::new("vol-1")]);
        assert_eq!(interfaces, vec![Resource::new("eni-2")]);
    }

    #[test]
    fn test_security_groups_revoke_rules_then_delete() {
        let (ec2, logger) = setup();
        ec2.add_security_group("sg-1", "env-bosh", true, true);
        ec2.add_security_group("sg-2", "default", true, true);
        let kind = SecurityGroups::new(ec2.clone(), logger.clone());

        let resources = kind.list(&Filter::default()).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "sg-1 (Name:env-bosh)");

        kind.delete(&resources[0]).unwrap();

        assert_eq!(
            ec2.get_commands()[1..],
            [
                "revoke_security_group_ingress:sg-1".to_string(),
                "revoke_security_group_egress:sg-1".to_string(),
                "delete_security_group:sg-1".to_string(),
            ]
        );
        assert_eq!(
            logger.messages(),
            vec![
                "SUCCESS revoking ingress rules of security group sg-1 (Name:env-bosh)\n"
                    .to_string(),
                "SUCCESS revoking egress rules of security group sg-1 (Name:env-bosh)\n"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_security_group_without_rules_skips_revokes() {
        let (ec2, logger) = setup();
        ec2.add_security_group("sg-1", "env-bosh", false, false);
        let kind = SecurityGroups::new(ec2.clone(), logger.clone());

        let resources = kind.list(&Filter::default()).unwrap();
        kind.delete(&resources[0]).unwrap();

        assert_eq!(ec2.call_count("revoke_security_group_ingress"), 0);
        assert_eq!(ec2.call_count("revoke_security_group_egress"), 0);
        assert!(logger.messages().is_empty());
    }

    #[test]
    fn test_internet_gateway_detach_failure_still_deletes() {
        let (ec2, logger) = setup();
        ec2.add_internet_gateway("igw-1", Some("env-igw"), &["vpc-1"]);
        ec2.set_fail_on("detach_internet_gateway", "dependency violation");
        let kind = InternetGateways::new(ec2.clone(), logger.clone());

        let resources = kind.list(&Filter::new("env")).unwrap();
        let result = kind.delete(&resources[0]);

        assert!(result.is_ok());
        assert_eq!(
            logger.messages(),
            vec![
                "ERROR detaching vpc vpc-1 from internet gateway igw-1 (Name:env-igw): dependency violation\n"
                    .to_string()
            ]
        );
        assert_eq!(ec2.call_count("delete_internet_gateway"), 1);
    }

    #[test]
    fn test_vpcs_skip_default() {
        let (ec2, _logger) = setup();
        ec2.add_vpc("vpc-1", None, true);
        ec2.add_vpc("vpc-2", Some("env-vpc"), false);
        let kind = Vpcs::new(ec2.clone());

        let resources = kind.list(&Filter::default()).unwrap();

        assert_eq!(
            resources,
            vec![Resource::new("vpc-2").named("vpc-2 (Name:env-vpc)")]
        );
    }

    #[test]
    fn test_subnets_delete_by_id() {
        let (ec2, _logger) = setup();
        ec2.add_subnet("subnet-1", Some("env-internal"), "vpc-2");
        let kind = Subnets::new(ec2.clone());

        let resources = kind.list(&Filter::new("internal")).unwrap();
        assert_eq!(resources[0].location.as_deref(), Some("vpc-2"));

        kind.delete(&resources[0]).unwrap();
        assert_eq!(ec2.call_count("delete_subnet"), 1);
        assert!(kind.list(&Filter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_key_pairs_list_error_propagates() {
        let (ec2, _logger) = setup();
        ec2.set_fail_on("describe_key_pairs", "unauthorized");
        let kind = KeyPairs::new(ec2.clone());

        let err = kind.list(&Filter::default()).unwrap_err();
        assert_eq!(err.to_string(), "unauthorized");
    }
}
