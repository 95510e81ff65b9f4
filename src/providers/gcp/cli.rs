use super::client::{Collection, ComputeClient, Located, Scope};
use crate::infra::Tool;
use crate::providers::last_segment;
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Compute Engine through `gcloud compute`, authenticated with a service
/// account key file.
pub struct GcloudCli {
    tool: Tool,
}

impl GcloudCli {
    pub fn new(project_id: &str, key_path: &Path) -> Self {
        let tool = Tool::new("gcloud")
            .env(
                "CLOUDSDK_AUTH_CREDENTIAL_FILE_OVERRIDE",
                key_path.to_string_lossy(),
            )
            .arg("--format=json")
            .arg(format!("--project={project_id}"))
            .arg("--quiet");

        Self { tool }
    }

    /// `compute <group...> <words...>`
    fn compute(&self, group: &[&str], words: &[&str]) -> Vec<String> {
        let mut args = vec!["compute".to_string()];
        args.extend(group.iter().map(|word| word.to_string()));
        args.extend(words.iter().map(|word| word.to_string()));
        args
    }
}

#[derive(Deserialize, Debug)]
struct Entry {
    name: String,
    zone: Option<String>,
    region: Option<String>,
}

fn located(entries: Vec<Entry>) -> Vec<Located> {
    entries
        .into_iter()
        .map(|entry| {
            let location = entry.zone.or(entry.region);
            Located::new(entry.name, location.as_deref().map(last_segment))
        })
        .collect()
}

/// Flag selecting where a delete applies
fn location_flag(scope: Scope, location: Option<&str>) -> Option<String> {
    match (scope, location) {
        (Scope::Zone, Some(zone)) => Some(format!("--zone={zone}")),
        (Scope::Region, Some(region)) => Some(format!("--region={region}")),
        (Scope::Global, _) => Some("--global".to_string()),
        _ => None,
    }
}

impl ComputeClient for GcloudCli {
    fn list(&self, collection: Collection) -> Result<Vec<Located>> {
        let args = self.compute(collection.command(), &["list"]);
        let entries: Vec<Entry> = self.tool.json(args)?;
        Ok(located(entries))
    }

    fn delete(&self, collection: Collection, name: &str, location: Option<&str>) -> Result<()> {
        let mut args = self.compute(collection.command(), &["delete", name]);
        args.extend(location_flag(collection.scope(), location));

        self.tool.run(args).map(|_| ())
    }

    fn list_networks(&self) -> Result<Vec<String>> {
        let entries: Vec<Entry> = self.tool.json(self.compute(&["networks"], &["list"]))?;
        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }

    fn list_subnetworks(&self, network: &str) -> Result<Vec<Located>> {
        let mut args = self.compute(&["networks", "subnets"], &["list"]);
        args.push(format!("--network={network}"));

        let entries: Vec<Entry> = self.tool.json(args)?;
        Ok(located(entries))
    }

    fn delete_subnetwork(&self, name: &str, region: &str) -> Result<()> {
        let mut args = self.compute(&["networks", "subnets"], &["delete", name]);
        args.push(format!("--region={region}"));

        self.tool.run(args).map(|_| ())
    }

    fn delete_network(&self, name: &str) -> Result<()> {
        self.tool
            .run(self.compute(&["networks"], &["delete", name]))
            .map(|_| ())
    }
}
