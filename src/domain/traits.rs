use super::{Filter, Noun, Resource};
use anyhow::Result;

/// One category of cloud resource for one provider.
///
/// Implementations own the provider client they need and the shared
/// `Logger`, which they use only to report pre-steps.
pub trait ResourceKind {
    /// Stable identifier used by `delete_type` and printed by `types`
    fn type_name(&self) -> &'static str;

    fn noun(&self) -> Noun;

    /// Query the provider and keep the resources whose name matches `filter`,
    /// in the order the provider returned them.
    fn list(&self, filter: &Filter) -> Result<Vec<Resource>>;

    /// Run every pre-step (detach, revoke, power off), reporting each one
    /// through the logger without stopping, then issue the terminal delete.
    ///
    /// Only the terminal delete's failure is returned.
    fn delete(&self, resource: &Resource) -> Result<()>;
}

/// Confirmation gate and audit trail.
///
/// A no-confirm policy lives here, not in the callers: they always ask.
pub trait Logger: Send + Sync {
    fn prompt(&self, message: &str) -> bool;

    fn print(&self, message: &str);
}

impl<T: ResourceKind + ?Sized> ResourceKind for std::sync::Arc<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn noun(&self) -> Noun {
        (**self).noun()
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        (**self).list(filter)
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        (**self).delete(resource)
    }
}
