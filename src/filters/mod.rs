/// Review list filters
///
/// This module handles the query-string driven filters:
/// - The closed set of values per field (catalog.rs)
/// - Reading and editing the query string (params.rs)
/// - Validating a query before it is sent (validate.rs)
pub mod catalog;
pub mod params;
pub mod validate;

pub use catalog::{Catalog, FilterField, FilterOption};
pub use params::QueryState;
pub use validate::{validate, ValidationResult};
