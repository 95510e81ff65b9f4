use super::client::{Collection, ComputeClient, Scope};
use crate::domain::{Filter, Noun, Resource, ResourceKind};
use anyhow::{Result, bail};
use std::sync::Arc;

/// Any compute collection whose members go with a single delete call.
pub struct ComputeKind {
    collection: Collection,
    client: Arc<dyn ComputeClient>,
}

impl ComputeKind {
    pub fn new(collection: Collection, client: Arc<dyn ComputeClient>) -> Self {
        Self { collection, client }
    }

    fn in_scope(&self, location: Option<&str>) -> bool {
        match self.collection.scope() {
            Scope::Region | Scope::Zone => location.is_some(),
            Scope::Global => location.is_none(),
            Scope::Project => true,
        }
    }
}

impl ResourceKind for ComputeKind {
    fn type_name(&self) -> &'static str {
        self.collection.type_name()
    }

    fn noun(&self) -> Noun {
        self.collection.noun()
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list(self.collection)?
            .into_iter()
            .filter(|item| self.in_scope(item.location.as_deref()))
            .filter(|item| filter.matches(&item.name))
            .map(|item| Resource::new(item.name).located(item.location))
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        let location = resource.location.as_deref();
        if matches!(self.collection.scope(), Scope::Region | Scope::Zone) && location.is_none() {
            bail!("{} has no location", resource.name);
        }

        self.client.delete(self.collection, &resource.id, location)
    }
}
