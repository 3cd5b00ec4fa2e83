pub mod client;
pub mod errors;
pub mod store;

pub use client::HttpPropertyStore;
pub use errors::{ApiError, GENERIC_FAILURE_MESSAGE};
#[cfg(any(test, feature = "testing"))]
pub use store::MockPropertyStore;
pub use store::PropertyStore;
