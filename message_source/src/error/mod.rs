//! Error types produced by message providers, stores and the resolver.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::{I18nError, ResourceError};

#[cfg(test)]
mod tests;
