use super::client::VSphereClient;
use super::relative;
use crate::domain::{Filter, Logger, Noun, Resource, ResourceKind};
use crate::services::report;
use anyhow::Result;
use std::sync::Arc;

/// Virtual machines, powered off before they are destroyed.
pub struct VirtualMachines {
    client: Arc<dyn VSphereClient>,
    logger: Arc<dyn Logger>,
}

impl VirtualMachines {
    pub fn new(client: Arc<dyn VSphereClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }
}

impl ResourceKind for VirtualMachines {
    fn type_name(&self) -> &'static str {
        "virtual-machine"
    }

    fn noun(&self) -> Noun {
        Noun::new("virtual machine", "virtual machines")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_virtual_machines()?
            .into_iter()
            .filter(|path| filter.matches(relative(path)))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        match self.client.is_powered_on(&resource.id) {
            Ok(true) => report(
                self.logger.as_ref(),
                "powering off",
                self.noun(),
                &resource.name,
                self.client.power_off(&resource.id),
            ),
            Ok(false) => {}
            Err(cause) => report(
                self.logger.as_ref(),
                "checking power state of",
                self.noun(),
                &resource.name,
                Err(cause),
            ),
        }

        self.client.destroy_virtual_machine(&resource.id)
    }
}
