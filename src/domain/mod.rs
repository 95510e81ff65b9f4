mod errors;
mod resource;
pub mod traits;

pub use errors::LeftoversError;
pub use resource::{Filter, Noun, Resource};
pub use traits::{Logger, ResourceKind};
