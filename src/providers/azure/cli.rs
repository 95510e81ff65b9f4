use super::client::{Group, GroupsClient};
use crate::infra::Tool;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tempfile::TempDir;

pub struct Credentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub tenant_id: &'a str,
    pub subscription_id: &'a str,
}

/// Resource groups through the `az` CLI, logged in as a service principal.
///
/// The login lives in a private `AZURE_CONFIG_DIR` that is removed with
/// the client, so the operator's own `~/.azure` profile is never touched.
pub struct AzCli {
    tool: Tool,
    _config_dir: TempDir,
}

impl AzCli {
    /// Logs the service principal in; every later call is pinned to the
    /// subscription.
    ///
    /// `az login` has no environment variable for the client secret, so
    /// it is the one credential passed as an argument.
    pub fn login(credentials: &Credentials<'_>) -> Result<Self> {
        let config_dir = tempfile::Builder::new()
            .prefix("leftovers-azure-")
            .tempdir()
            .context("Creating azure config directory")?;

        isolated("az", config_dir.path())
            .run([
                "login",
                "--service-principal",
                "--username",
                credentials.client_id,
                "--password",
                credentials.client_secret,
                "--tenant",
                credentials.tenant_id,
            ])
            .context("Logging in to azure")?;

        let tool = isolated("az", config_dir.path())
            .arg("--subscription")
            .arg(credentials.subscription_id)
            .arg("--output")
            .arg("json");

        Ok(Self {
            tool,
            _config_dir: config_dir,
        })
    }
}

fn isolated(program: &str, config_dir: &Path) -> Tool {
    Tool::new(program).env("AZURE_CONFIG_DIR", config_dir.to_string_lossy())
}

#[derive(Deserialize, Debug)]
struct GroupEntry {
    name: String,
    location: String,
    #[serde(default)]
    properties: GroupProperties,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GroupProperties {
    #[serde(default)]
    provisioning_state: String,
}

fn groups(entries: Vec<GroupEntry>) -> Vec<Group> {
    entries
        .into_iter()
        .map(|entry| Group {
            name: entry.name,
            location: entry.location,
            state: entry.properties.provisioning_state,
        })
        .collect()
}

impl GroupsClient for AzCli {
    fn list_groups(&self) -> Result<Vec<Group>> {
        let entries: Vec<GroupEntry> = self.tool.json(["group", "list"])?;
        Ok(groups(entries))
    }

    fn delete_group(&self, name: &str) -> Result<()> {
        self.tool
            .run(["group", "delete", "--name", name, "--yes"])
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_tool_uses_private_config_dir() {
        let dir = tempfile::tempdir().unwrap();

        let stdout = isolated("sh", dir.path())
            .run(["-c", "echo $AZURE_CONFIG_DIR"])
            .unwrap();

        assert_eq!(stdout.trim(), dir.path().to_string_lossy());
    }

    #[test]
    fn test_groups_from_cli_output() {
        let entries: Vec<GroupEntry> = serde_json::from_str(
            r#"[
                {
                    "id": "/subscriptions/s/resourceGroups/env-bosh",
                    "location": "eastus",
                    "name": "env-bosh",
                    "properties": {"provisioningState": "Succeeded"},
                    "tags": null
                },
                {"location": "westus", "name": "bare"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            groups(entries),
            vec![
                Group {
                    name: "env-bosh".to_string(),
                    location: "eastus".to_string(),
                    state: "Succeeded".to_string(),
                },
                Group {
                    name: "bare".to_string(),
                    location: "westus".to_string(),
                    state: String::new(),
                },
            ]
        );
    }
}
