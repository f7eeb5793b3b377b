//! Report endpoint field catalogs
//!
//! The valid field names of an endpoint come from server metadata and are
//! used to validate `fields`, `group`, `sort` and `filter` parameters when
//! catalog validation is enabled.

mod cache;
mod catalog;
mod types;

#[cfg(test)]
mod tests;

pub use cache::FieldCatalogCache;
pub use catalog::FieldCatalog;
pub use types::{ApiField, ApiModel, FieldDescriptor, FieldMap, FieldSelection};
