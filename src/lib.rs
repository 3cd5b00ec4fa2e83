// property-review library - listing verification workflow client
// This exposes the core components for testing and integration

pub mod api;
pub mod cli;
pub mod config;
pub mod observability;
pub mod property;
pub mod telemetry;
pub mod verification;
pub mod workflow;

// Re-export key types for easy access
pub use api::{ApiError, HttpPropertyStore, PropertyStore};
pub use config::ReviewConfig;
pub use observability::{api_metrics, ApiMetrics, OperationTimer};
pub use property::{PageRequest, Property, PropertyFilters, PropertyId, PropertyPage};
pub use telemetry::{create_review_span, generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use verification::{
    allowed_transitions, is_transition_allowed, visibility_change_allowed, visibility_target,
    VerificationStatus, Visibility,
};
pub use workflow::{
    ActionMenu, MutationOutcome, Notification, PropertyListView, PropertyView, ReviewError,
    ReviewSession, SharedView, ViewHandle,
};
