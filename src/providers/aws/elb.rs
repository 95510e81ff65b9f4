use super::client::ElbClient;
use crate::domain::{Filter, Noun, Resource, ResourceKind};
use anyhow::Result;
use std::sync::Arc;

/// Classic load balancers.
pub struct LoadBalancers {
    client: Arc<dyn ElbClient>,
}

impl LoadBalancers {
    pub fn new(client: Arc<dyn ElbClient>) -> Self {
        Self { client }
    }
}

impl ResourceKind for LoadBalancers {
    fn type_name(&self) -> &'static str {
        "elb-load-balancer"
    }

    fn noun(&self) -> Noun {
        Noun::new("load balancer", "load balancers")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .describe_load_balancers()?
            .into_iter()
            .filter(|name| filter.matches(name))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_load_balancer(&resource.id)
    }
}
