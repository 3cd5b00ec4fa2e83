// Listing verification rules: pure functions, no I/O.

pub mod status;
pub mod visibility;

pub use status::{allowed_transitions, is_transition_allowed, ParseStatusError, VerificationStatus};
pub use visibility::{visibility_change_allowed, visibility_target, ParseVisibilityError, Visibility};
