use std::fmt;

/// Substring filter applied to a resource's operator-facing name.
///
/// The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(String);

impl Filter {
    pub fn new(filter: impl Into<String>) -> Self {
        Self(filter.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, candidate: &str) -> bool {
        candidate.contains(self.0.as_str())
    }
}

impl From<&str> for Filter {
    fn from(filter: &str) -> Self {
        Self::new(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a resource kind names its resources in prompts and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noun {
    /// `<type>` in prompt, SUCCESS and ERROR lines ("instance profile")
    pub singular: &'static str,
    /// Used when a whole listing fails ("instance profiles")
    pub plural: &'static str,
}

impl Noun {
    pub const fn new(singular: &'static str, plural: &'static str) -> Self {
        Self { singular, plural }
    }
}

/// A resource discovered by a `ResourceKind` listing.
///
/// Resources are never cached: every list call builds them fresh from the
/// provider's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// What the provider API addresses (id, ARN, inventory path, name)
    pub id: String,
    /// What the operator sees; the filter is matched against it
    pub name: String,
    /// Zone or region the provider needs alongside `id`
    pub location: Option<String>,
    /// Sub-resources that have to be detached before the terminal delete
    pub dependents: Vec<String>,
}

impl Resource {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location: None,
            dependents: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn located(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_dependents(mut self, dependents: Vec<String>) -> Self {
        self.dependents = dependents;
        self
    }
}
