use super::Recorder;
use crate::providers::vsphere::client::VSphereClient;
use anyhow::Result;
use std::sync::RwLock;

#[derive(Default)]
struct Inventory {
    /// (path, powered on)
    virtual_machines: Vec<(String, bool)>,
    /// (path, number of children)
    folders: Vec<(String, usize)>,
}

/// In-memory vCenter datacenter.
#[derive(Default)]
pub struct MockVSphere {
    inventory: RwLock<Inventory>,
    recorder: Recorder,
}

impl MockVSphere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_virtual_machine(&self, path: &str, powered_on: bool) {
        self.inventory
            .write()
            .unwrap()
            .virtual_machines
            .push((path.to_string(), powered_on));
    }

    pub fn add_folder(&self, path: &str, children: usize) {
        self.inventory
            .write()
            .unwrap()
            .folders
            .push((path.to_string(), children));
    }

    pub fn virtual_machines(&self) -> Vec<String> {
        self.inventory
            .read()
            .unwrap()
            .virtual_machines
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn folders(&self) -> Vec<String> {
        self.inventory
            .read()
            .unwrap()
            .folders
            .iter()
            .map(|(path, _)| path.clone())
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

impl VSphereClient for MockVSphere {
    fn list_virtual_machines(&self) -> Result<Vec<String>> {
        self.recorder.record("list_virtual_machines", &[])?;
        Ok(self.virtual_machines())
    }

    fn is_powered_on(&self, path: &str) -> Result<bool> {
        self.recorder.record("is_powered_on", &[path])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .virtual_machines
            .iter()
            .any(|(existing, powered_on)| existing == path && *powered_on))
    }

    fn power_off(&self, path: &str) -> Result<()> {
        self.recorder.record("power_off", &[path])?;

        for (existing, powered_on) in &mut self.inventory.write().unwrap().virtual_machines {
            if existing == path {
                *powered_on = false;
            }
        }
        Ok(())
    }

    fn destroy_virtual_machine(&self, path: &str) -> Result<()> {
        self.recorder.record("destroy_virtual_machine", &[path])?;
        self.inventory
            .write()
            .unwrap()
            .virtual_machines
            .retain(|(existing, _)| existing != path);
        Ok(())
    }

    fn list_folders(&self) -> Result<Vec<String>> {
        self.recorder.record("list_folders", &[])?;
        Ok(self.folders())
    }

    fn folder_children(&self, path: &str) -> Result<usize> {
        self.recorder.record("folder_children", &[path])?;

        Ok(self
            .inventory
            .read()
            .unwrap()
            .folders
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, children)| *children)
            .unwrap_or(0))
    }

    fn destroy_folder(&self, path: &str) -> Result<()> {
        self.recorder.record("destroy_folder", &[path])?;
        self.inventory
            .write()
            .unwrap()
            .folders
            .retain(|(existing, _)| existing != path);
        Ok(())
    }
}
