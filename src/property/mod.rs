pub mod types;

pub use types::{PageRequest, Property, PropertyFilters, PropertyId, PropertyPage, ReviewMetadata};
