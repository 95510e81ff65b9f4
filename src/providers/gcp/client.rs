use crate::domain::Noun;
use anyhow::Result;

/// Where a compute collection lives, and so which flag addresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Project-wide, no location flag (`firewalls`, `url-maps`)
    Project,
    /// Global half of a collection that also has regional members
    Global,
    Region,
    Zone,
}

/// Compute collections deleted by plain name plus location.
///
/// Networks are not in here: they need their subnetworks removed first and
/// have their own calls on `ComputeClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    ForwardingRules,
    GlobalForwardingRules,
    TargetHttpProxies,
    UrlMaps,
    BackendServices,
    TargetPools,
    HttpHealthChecks,
    InstanceGroups,
    Instances,
    Disks,
    Addresses,
    Firewalls,
}

impl Collection {
    pub fn type_name(self) -> &'static str {
        match self {
            Self::ForwardingRules => "forwarding-rule",
            Self::GlobalForwardingRules => "global-forwarding-rule",
            Self::TargetHttpProxies => "target-http-proxy",
            Self::UrlMaps => "url-map",
            Self::BackendServices => "backend-service",
            Self::TargetPools => "target-pool",
            Self::HttpHealthChecks => "http-health-check",
            Self::InstanceGroups => "instance-group",
            Self::Instances => "instance",
            Self::Disks => "disk",
            Self::Addresses => "address",
            Self::Firewalls => "firewall",
        }
    }

    pub fn noun(self) -> Noun {
        match self {
            Self::ForwardingRules => Noun::new("forwarding rule", "forwarding rules"),
            Self::GlobalForwardingRules => {
                Noun::new("global forwarding rule", "global forwarding rules")
            }
            Self::TargetHttpProxies => Noun::new("target http proxy", "target http proxies"),
            Self::UrlMaps => Noun::new("url map", "url maps"),
            Self::BackendServices => Noun::new("backend service", "backend services"),
            Self::TargetPools => Noun::new("target pool", "target pools"),
            Self::HttpHealthChecks => Noun::new("http health check", "http health checks"),
            Self::InstanceGroups => Noun::new("instance group", "instance groups"),
            Self::Instances => Noun::new("instance", "instances"),
            Self::Disks => Noun::new("disk", "disks"),
            Self::Addresses => Noun::new("address", "addresses"),
            Self::Firewalls => Noun::new("firewall", "firewalls"),
        }
    }

    pub fn scope(self) -> Scope {
        match self {
            Self::ForwardingRules | Self::TargetPools | Self::Addresses => Scope::Region,
            Self::GlobalForwardingRules | Self::BackendServices => Scope::Global,
            Self::InstanceGroups | Self::Instances | Self::Disks => Scope::Zone,
            Self::TargetHttpProxies | Self::UrlMaps | Self::HttpHealthChecks | Self::Firewalls => {
                Scope::Project
            }
        }
    }

    /// `gcloud compute` group that manages the collection
    pub fn command(self) -> &'static [&'static str] {
        match self {
            Self::ForwardingRules | Self::GlobalForwardingRules => &["forwarding-rules"],
            Self::TargetHttpProxies => &["target-http-proxies"],
            Self::UrlMaps => &["url-maps"],
            Self::BackendServices => &["backend-services"],
            Self::TargetPools => &["target-pools"],
            Self::HttpHealthChecks => &["http-health-checks"],
            Self::InstanceGroups => &["instance-groups", "unmanaged"],
            Self::Instances => &["instances"],
            Self::Disks => &["disks"],
            Self::Addresses => &["addresses"],
            Self::Firewalls => &["firewalls"],
        }
    }
}

/// A compute resource name and the short zone or region it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub name: String,
    pub location: Option<String>,
}

impl Located {
    pub fn new(name: impl Into<String>, location: Option<&str>) -> Self {
        Self {
            name: name.into(),
            location: location.map(str::to_string),
        }
    }
}

pub trait ComputeClient: Send + Sync {
    /// Every member of the collection's group; regional and global members
    /// are told apart by `location`.
    fn list(&self, collection: Collection) -> Result<Vec<Located>>;

    fn delete(&self, collection: Collection, name: &str, location: Option<&str>) -> Result<()>;

    fn list_networks(&self) -> Result<Vec<String>>;

    /// Subnetworks of one network, located by region
    fn list_subnetworks(&self, network: &str) -> Result<Vec<Located>>;

    fn delete_subnetwork(&self, name: &str, region: &str) -> Result<()>;

    fn delete_network(&self, name: &str) -> Result<()>;
}
