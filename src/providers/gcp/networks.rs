use super::client::ComputeClient;
use crate::domain::{Filter, Logger, Noun, Resource, ResourceKind};
use crate::services::report;
use anyhow::Result;
use std::sync::Arc;

/// VPC networks other than `default`. Subnetworks are looked up and
/// deleted one by one before the network.
pub struct Networks {
    client: Arc<dyn ComputeClient>,
    logger: Arc<dyn Logger>,
}

impl Networks {
    pub fn new(client: Arc<dyn ComputeClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }
}

impl ResourceKind for Networks {
    fn type_name(&self) -> &'static str {
        "network"
    }

    fn noun(&self) -> Noun {
        Noun::new("network", "networks")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_networks()?
            .into_iter()
            .filter(|name| name != "default")
            .filter(|name| filter.matches(name))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        match self.client.list_subnetworks(&resource.id) {
            Ok(subnetworks) => {
                for subnetwork in subnetworks {
                    let outcome = match subnetwork.location.as_deref() {
                        Some(region) => self.client.delete_subnetwork(&subnetwork.name, region),
                        None => Err(anyhow::anyhow!("subnetwork has no region")),
                    };

                    report(
                        self.logger.as_ref(),
                        &format!("deleting subnetwork {} of", subnetwork.name),
                        self.noun(),
                        &resource.name,
                        outcome,
                    );
                }
            }
            Err(cause) => report(
                self.logger.as_ref(),
                "listing subnetworks of",
                self.noun(),
                &resource.name,
                Err(cause),
            ),
        }

        self.client.delete_network(&resource.id)
    }
}
