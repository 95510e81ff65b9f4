use super::client::VSphereClient;
use crate::infra::Tool;
use anyhow::Result;

pub struct Connection<'a> {
    pub vcenter_ip: &'a str,
    pub user: &'a str,
    pub password: &'a str,
    pub datacenter: &'a str,
}

/// vCenter inventory through `govc`. govc takes its connection from the
/// environment and its flags before positional arguments, so nothing is
/// appended to the calls.
pub struct GovcCli {
    tool: Tool,
    root: String,
}

impl GovcCli {
    pub fn new(connection: &Connection<'_>) -> Self {
        let tool = Tool::new("govc")
            .env("GOVC_URL", connection.vcenter_ip)
            .env("GOVC_USERNAME", connection.user)
            .env("GOVC_PASSWORD", connection.password)
            .env("GOVC_INSECURE", "1")
            .env("GOVC_DATACENTER", connection.datacenter);

        Self {
            tool,
            root: format!("/{}/vm", connection.datacenter),
        }
    }
}

impl VSphereClient for GovcCli {
    fn list_virtual_machines(&self) -> Result<Vec<String>> {
        self.tool.lines(["find", "-type", "m", self.root.as_str()])
    }

    fn is_powered_on(&self, path: &str) -> Result<bool> {
        let state = self
            .tool
            .run(["object.collect", "-s", path, "runtime.powerState"])?;
        Ok(state.trim() == "poweredOn")
    }

    fn power_off(&self, path: &str) -> Result<()> {
        self.tool
            .run(["vm.power", "-off", "-force", path])
            .map(|_| ())
    }

    fn destroy_virtual_machine(&self, path: &str) -> Result<()> {
        self.tool.run(["vm.destroy", path]).map(|_| ())
    }

    fn list_folders(&self) -> Result<Vec<String>> {
        let folders = self.tool.lines(["find", "-type", "f", self.root.as_str()])?;
        Ok(below_root(folders, &self.root))
    }

    fn folder_children(&self, path: &str) -> Result<usize> {
        Ok(self.tool.lines(["ls", path])?.len())
    }

    fn destroy_folder(&self, path: &str) -> Result<()> {
        self.tool.run(["object.destroy", path]).map(|_| ())
    }
}

fn below_root(folders: Vec<String>, root: &str) -> Vec<String> {
    folders
        .into_iter()
        .filter(|folder| folder.trim_end_matches('/') != root)
        .collect()
}
