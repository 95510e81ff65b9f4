use anyhow::Result;

/// Inventory calls under the datacenter's `vm` folder. Paths are full
/// inventory paths (`/dc1/vm/env/bosh-0`).
pub trait VSphereClient: Send + Sync {
    fn list_virtual_machines(&self) -> Result<Vec<String>>;

    fn is_powered_on(&self, path: &str) -> Result<bool>;

    fn power_off(&self, path: &str) -> Result<()>;

    fn destroy_virtual_machine(&self, path: &str) -> Result<()>;

    /// Every folder below the root, not the root itself
    fn list_folders(&self) -> Result<Vec<String>>;

    /// Number of direct children of the folder
    fn folder_children(&self, path: &str) -> Result<usize>;

    fn destroy_folder(&self, path: &str) -> Result<()>;
}
