use super::client::VSphereClient;
use super::relative;
use crate::domain::{Filter, Noun, Resource, ResourceKind};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Empty inventory folders. Runs after the virtual machines so folders
/// emptied by that pass are picked up.
pub struct Folders {
    client: Arc<dyn VSphereClient>,
}

impl Folders {
    pub fn new(client: Arc<dyn VSphereClient>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Folders {
    fn type_name(&self) -> &'static str {
        "folder"
    }

    fn noun(&self) -> Noun {
        Noun::new("folder", "folders")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        let mut empty = Vec::new();

        for path in self.client.list_folders()? {
            if !filter.matches(relative(&path)) {
                continue;
            }

            // A folder that can't be inspected is treated as in use.
            match self.client.folder_children(&path) {
                Ok(0) => empty.push(Resource::new(path)),
                Ok(_) => {}
                Err(cause) => warn!(folder = %path, error = %cause, "Skipping folder"),
            }
        }

        Ok(empty)
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.destroy_folder(&resource.id)
    }
}
