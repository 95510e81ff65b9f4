//! Fakes for every external collaborator: the logger, resource kinds and
//! each provider's client. Mocks keep in-memory inventories, remove what
//! they delete, and record every call as `operation:arg:arg`.

mod aws;
mod azure;
mod gcp;
mod kind;
mod logger;
mod vsphere;

pub use aws::{MockEc2, MockElb, MockIam, MockS3};
pub use azure::MockGroups;
pub use gcp::MockCompute;
pub use kind::MockKind;
pub use logger::RecordingLogger;
pub use vsphere::MockVSphere;

use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::RwLock;

/// Call log plus failure injection shared by the mocks.
#[derive(Default)]
pub struct Recorder {
    commands: RwLock<Vec<String>>,
    failures: RwLock<HashMap<String, String>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the call and fails if either the exact command
    /// (`delete:vol-1`) or its operation (`delete`) was set to fail.
    pub fn record(&self, operation: &str, args: &[&str]) -> Result<()> {
        let command = if args.is_empty() {
            operation.to_string()
        } else {
            format!("{}:{}", operation, args.join(":"))
        };
        self.commands.write().unwrap().push(command.clone());

        let failures = self.failures.read().unwrap();
        if let Some(message) = failures.get(&command).or_else(|| failures.get(operation)) {
            bail!("{message}");
        }
        Ok(())
    }

    pub fn set_fail_on(&self, command: &str, message: &str) {
        self.failures
            .write()
            .unwrap()
            .insert(command.to_string(), message.to_string());
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Number of recorded calls to `operation`, whatever their arguments
    pub fn count(&self, operation: &str) -> usize {
        self.commands
            .read()
            .unwrap()
            .iter()
            .filter(|command| command.split(':').next() == Some(operation))
            .count()
    }
}
