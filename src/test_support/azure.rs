use super::Recorder;
use crate::providers::azure::client::{Group, GroupsClient};
use anyhow::Result;
use std::sync::RwLock;

/// In-memory Azure subscription.
#[derive(Default)]
pub struct MockGroups {
    groups: RwLock<Vec<Group>>,
    recorder: Recorder,
}

impl MockGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&self, name: &str, location: &str, state: &str) {
        self.groups.write().unwrap().push(Group {
            name: name.to_string(),
            location: location.to_string(),
            state: state.to_string(),
        });
    }

    pub fn names(&self) -> Vec<String> {
        self.groups
            .read()
            .unwrap()
            .iter()
            .map(|group| group.name.clone())
            .collect()
    }

    pub fn set_fail_on(&self, command: &str, message: &str) {
        self.recorder.set_fail_on(command, message);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.recorder.commands()
    }
}

impl GroupsClient for MockGroups {
    fn list_groups(&self) -> Result<Vec<Group>> {
        self.recorder.record("list_groups", &[])?;
        Ok(self.groups.read().unwrap().clone())
    }

    fn delete_group(&self, name: &str) -> Result<()> {
        self.recorder.record("delete_group", &[name])?;
        self.groups
            .write()
            .unwrap()
            .retain(|group| group.name != name);
        Ok(())
    }
}
