use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::ffi::OsStr;
use std::process::{Command, Output};
use tracing::debug;

/// A provider CLI (`aws`, `gcloud`, `az`, `govc`) with the arguments and
/// environment every invocation carries.
///
/// Credentials travel through `envs` wherever the program reads them from
/// the environment. Error messages and log lines never include flags or
/// their values.
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
    base_args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl Tool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Argument appended after the per-call arguments of every invocation
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.base_args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Runs the tool and returns its stdout.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect();
        let description = self.describe(&args);
        debug!(command = %description, "Running");

        let output = Command::new(&self.program)
            .args(&args)
            .args(&self.base_args)
            .envs(self.envs.iter().map(|(key, value)| (key, value)))
            .output()
            .with_context(|| format!("running {description}"))?;

        ensure_success(&output, &description)?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs the tool and deserializes its stdout as JSON.
    pub fn json<T, I, S>(&self, args: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect();
        let stdout = self.run(&args)?;

        serde_json::from_str(&stdout)
            .with_context(|| format!("parsing output of {}", self.describe(&args)))
    }

    /// Runs the tool and returns its non-empty stdout lines.
    pub fn lines<I, S>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Ok(self
            .run(args)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Program plus the leading subcommand words; flags and their values are
    /// left out so secrets passed as arguments never reach a log line.
    fn describe(&self, args: &[String]) -> String {
        let mut description = self.program.clone();
        for arg in args.iter().take_while(|arg| !arg.starts_with('-')) {
            description.push(' ');
            description.push_str(arg);
        }
        description
    }
}

fn ensure_success(output: &Output, description: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        bail!("{description} exited with {}", output.status);
    }

    bail!("{description} exited with {}: {stderr}", output.status)
}
