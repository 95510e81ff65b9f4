use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub location: String,
    /// `Succeeded`, `Deleting`, ...
    pub state: String,
}

pub trait GroupsClient: Send + Sync {
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// Deletes the group and everything in it
    fn delete_group(&self, name: &str) -> Result<()>;
}
