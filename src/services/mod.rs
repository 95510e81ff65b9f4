mod leftovers;
mod report;

pub use leftovers::Leftovers;
pub use report::report;
