use super::Recorder;
use crate::providers::gcp::client::{Collection, ComputeClient, Located};
use anyhow::Result;
use std::sync::RwLock;

struct MockNetwork {
    name: String,
    subnetworks: Vec<Located>,
}

#[derive(Default)]
struct ComputeInventory {
    items: Vec<(Collection, Located)>,
    networks: Vec<MockNetwork>,
}

/// In-memory Compute Engine project.
///
/// Collection calls are recorded under the kind's type name, e.g.
/// `list:disk` and `delete:disk:env-disk:us-east1-b`.
#[derive(Default)]
pub struct MockCompute {
    inventory: RwLock<ComputeInventory>,
    recorder: Recorder,
}

impl MockCompute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, collection: Collection, name: &str, location: Option<&str>) {
        self.inventory
            .write()
            .unwrap()
            .items
            .push((collection, Located::new(name, location)));
    }

    pub fn add_network(&self, name: &str) {
        self.inventory.write().unwrap().networks.push(MockNetwork {
            name: name.to_string(),
            subnetworks: Vec::new(),
        });
    }

    /// Adds a subnetwork to an existing network
    pub fn add_subnetwork(&self, network: &str, name: &str, region: &str) {
        let mut inventory = self.inventory.write().unwrap();
        let network = inventory
            .networks
            .iter_mut()
            .find(|existing| existing.name == network)
            .expect("add_network first");
        network.subnetworks.push(Located::new(name, Some(region)));
    }

    pub fn names(&self, collection: Collection) -> Vec<String> {
        self.inventory
            .read()
            .unwrap()
            .items
            .iter()
            .filter(|(existing, _)| *existing == collection)
            .map(|(_, item)| item.name.clone())
            .collect()
    }

    pub fn networks(&self) -> Vec<String> {
        self.inventory
            .read()
            .unwrap()
            .networks
            .iter()
            .map(|network| network.name.clone())
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

impl ComputeClient for MockCompute {
    fn list(&self, collection: Collection) -> Result<Vec<Located>> {
        self.recorder.record("list", &[collection.type_name()])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .items
            .iter()
            .filter(|(existing, _)| *existing == collection)
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn delete(&self, collection: Collection, name: &str, location: Option<&str>) -> Result<()> {
        let mut args = vec![collection.type_name(), name];
        args.extend(location);
        self.recorder.record("delete", &args)?;

        self.inventory
            .write()
            .unwrap()
            .items
            .retain(|(existing, item)| !(*existing == collection && item.name == name));
        Ok(())
    }

    fn list_networks(&self) -> Result<Vec<String>> {
        self.recorder.record("list_networks", &[])?;
        Ok(self.networks())
    }

    fn list_subnetworks(&self, network: &str) -> Result<Vec<Located>> {
        self.recorder.record("list_subnetworks", &[network])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .networks
            .iter()
            .find(|existing| existing.name == network)
            .map(|existing| existing.subnetworks.clone())
            .unwrap_or_default())
    }

    fn delete_subnetwork(&self, name: &str, region: &str) -> Result<()> {
        self.recorder.record("delete_subnetwork", &[name, region])?;

        for network in &mut self.inventory.write().unwrap().networks {
            network.subnetworks.retain(|subnetwork| subnetwork.name != name);
        }
        Ok(())
    }

    fn delete_network(&self, name: &str) -> Result<()> {
        self.recorder.record("delete_network", &[name])?;

        self.inventory
            .write()
            .unwrap()
            .networks
            .retain(|existing| existing.name != name);
        Ok(())
    }
}
