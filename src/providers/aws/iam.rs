use super::client::IamClient;
use crate::domain::{Filter, Logger, Noun, Resource, ResourceKind};
use crate::services::report;
use anyhow::Result;
use std::sync::Arc;

/// IAM instance profiles. Attached roles are removed before the profile is
/// deleted.
pub struct InstanceProfiles {
    client: Arc<dyn IamClient>,
    logger: Arc<dyn Logger>,
}

impl InstanceProfiles {
    pub fn new(client: Arc<dyn IamClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }
}

impl ResourceKind for InstanceProfiles {
    fn type_name(&self) -> &'static str {
        "iam-instance-profile"
    }

    fn noun(&self) -> Noun {
        Noun::new("instance profile", "instance profiles")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_instance_profiles()?
            .into_iter()
            .filter(|profile| filter.matches(&profile.name))
            .map(|profile| Resource::new(profile.name).with_dependents(profile.roles))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        for role in &resource.dependents {
            report(
                self.logger.as_ref(),
                &format!("removing role {role} from"),
                self.noun(),
                &resource.name,
                self.client
                    .remove_role_from_instance_profile(&resource.id, role),
            );
        }

        self.client.delete_instance_profile(&resource.id)
    }
}

/// IAM roles. Managed policies are detached and inline policies deleted
/// before the role goes.
pub struct Roles {
    client: Arc<dyn IamClient>,
    logger: Arc<dyn Logger>,
}

impl Roles {
    pub fn new(client: Arc<dyn IamClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }

    fn detach_managed_policies(&self, resource: &Resource) {
        let attached = match self.client.list_attached_role_policies(&resource.id) {
            Ok(attached) => attached,
            Err(cause) => {
                report(
                    self.logger.as_ref(),
                    "listing attached policies for",
                    self.noun(),
                    &resource.name,
                    Err(cause),
                );
                return;
            }
        };

        for policy in attached {
            report(
                self.logger.as_ref(),
                &format!("detaching policy {} from", policy.name),
                self.noun(),
                &resource.name,
                self.client.detach_role_policy(&resource.id, &policy.arn),
            );
        }
    }

    fn delete_inline_policies(&self, resource: &Resource) {
        let inline = match self.client.list_role_policies(&resource.id) {
            Ok(inline) => inline,
            Err(cause) => {
                report(
                    self.logger.as_ref(),
                    "listing inline policies for",
                    self.noun(),
                    &resource.name,
                    Err(cause),
                );
                return;
            }
        };

        for policy in inline {
            report(
                self.logger.as_ref(),
                &format!("deleting inline policy {policy} from"),
                self.noun(),
                &resource.name,
                self.client.delete_role_policy(&resource.id, &policy),
            );
        }
    }
}

impl ResourceKind for Roles {
    fn type_name(&self) -> &'static str {
        "iam-role"
    }

    fn noun(&self) -> Noun {
        Noun::new("role", "roles")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_roles()?
            .into_iter()
            .filter(|role| filter.matches(role))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.detach_managed_policies(resource);
        self.delete_inline_policies(resource);

        self.client.delete_role(&resource.id)
    }
}

/// Customer managed IAM policies. Non-default versions are deleted first;
/// the default version goes with the policy.
pub struct Policies {
    client: Arc<dyn IamClient>,
    logger: Arc<dyn Logger>,
}

impl Policies {
    pub fn new(client: Arc<dyn IamClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }
}

impl ResourceKind for Policies {
    fn type_name(&self) -> &'static str {
        "iam-policy"
    }

    fn noun(&self) -> Noun {
        Noun::new("policy", "policies")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_policies()?
            .into_iter()
            .filter(|policy| filter.matches(&policy.name))
            .map(|policy| Resource::new(policy.arn).named(policy.name))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        match self.client.list_policy_versions(&resource.id) {
            Ok(versions) => {
                for version in versions.into_iter().filter(|v| !v.is_default) {
                    report(
                        self.logger.as_ref(),
                        &format!("deleting version {} of", version.id),
                        self.noun(),
                        &resource.name,
                        self.client.delete_policy_version(&resource.id, &version.id),
                    );
                }
            }
            Err(cause) => report(
                self.logger.as_ref(),
                "listing versions of",
                self.noun(),
                &resource.name,
                Err(cause),
            ),
        }

        self.client.delete_policy(&resource.id)
    }
}

pub struct ServerCertificates {
    client: Arc<dyn IamClient>,
}

impl ServerCertificates {
    pub fn new(client: Arc<dyn IamClient>) -> Self {
        Self { client }
    }
}

impl ResourceKind for ServerCertificates {
    fn type_name(&self) -> &'static str {
        "iam-server-certificate"
    }

    fn noun(&self) -> Noun {
        Noun::new("server certificate", "server certificates")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_server_certificates()?
            .into_iter()
            .filter(|name| filter.matches(name))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_server_certificate(&resource.id)
    }
}
