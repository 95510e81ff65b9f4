use super::Recorder;
use crate::domain::{Filter, Noun, Resource, ResourceKind};
use anyhow::Result;
use std::sync::RwLock;

/// Provider-agnostic resource kind backed by an in-memory inventory.
///
/// Records `list` and `delete:<name>`.
pub struct MockKind {
    type_name: &'static str,
    noun: Noun,
    resources: RwLock<Vec<Resource>>,
    recorder: Recorder,
}

impl MockKind {
    pub fn new(type_name: &'static str, singular: &'static str, plural: &'static str) -> Self {
        Self {
            type_name,
            noun: Noun::new(singular, plural),
            resources: RwLock::new(Vec::new()),
            recorder: Recorder::new(),
        }
    }

    pub fn add(&self, name: &str) {
        self.resources.write().unwrap().push(Resource::new(name));
    }

    pub fn names(&self) -> Vec<String> {
        self.resources
            .read()
            .unwrap()
            .iter()
            .map(|resource| resource.name.clone())
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

impl ResourceKind for MockKind {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn noun(&self) -> Noun {
        self.noun
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        self.recorder.record("list", &[])?;

        Ok(self
            .resources
            .read()
            .unwrap()
            .iter()
            .filter(|resource| filter.matches(&resource.name))
            .cloned()
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.recorder.record("delete", &[&resource.name])?;

        self.resources
            .write()
            .unwrap()
            .retain(|existing| existing.id != resource.id);
        Ok(())
    }
}
