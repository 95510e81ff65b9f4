use super::Noun;
use thiserror::Error;

/// Failures that escape a deletion run.
///
/// Everything else (pre-step and terminal delete failures) is reported
/// through the `Logger` and swallowed.
#[derive(Debug, Error)]
pub enum LeftoversError {
    #[error("Listing {plural}: {cause:#}")]
    Listing {
        plural: &'static str,
        cause: anyhow::Error,
    },

    #[error("Unknown resource type {0}. Run 'leftovers types' to see the supported types.")]
    UnknownType(String),
}

impl LeftoversError {
    pub fn listing(noun: Noun, cause: anyhow::Error) -> Self {
        Self::Listing {
            plural: noun.plural,
            cause,
        }
    }

    pub fn is_listing(&self) -> bool {
        matches!(self, Self::Listing { .. })
    }
}
