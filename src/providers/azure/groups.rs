use super::client::GroupsClient;
use crate::domain::{Filter, Noun, Resource, ResourceKind};
use anyhow::Result;
use std::sync::Arc;

/// Resource groups. Azure removes a group's contents with it, so there are
/// no pre-steps; groups already being deleted are left alone.
pub struct Groups {
    client: Arc<dyn GroupsClient>,
}

impl Groups {
    pub fn new(client: Arc<dyn GroupsClient>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Groups {
    fn type_name(&self) -> &'static str {
        "resource-group"
    }

    fn noun(&self) -> Noun {
        Noun::new("resource group", "resource groups")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_groups()?
            .into_iter()
            .filter(|group| group.state != "Deleting")
            .filter(|group| filter.matches(&group.name))
            .map(|group| Resource::new(group.name).located(Some(group.location)))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_group(&resource.id)
    }
}
