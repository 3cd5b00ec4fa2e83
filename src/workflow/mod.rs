// Review workflow: views over server records and the mutation round trip.
// The API stays the source of truth; nothing here edits a record locally.

pub mod in_flight;
pub mod list;
pub mod notification;
pub mod session;
pub mod view;

pub use in_flight::{InFlightGuard, InFlightRegistry};
pub use list::PropertyListView;
pub use notification::{Notification, NotificationLevel};
pub use session::{MutationOutcome, ReviewError, ReviewSession};
pub use view::{ActionMenu, PropertyView, SharedView, ViewEvent, ViewHandle};
