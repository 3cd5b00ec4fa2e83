use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};

use super::in_flight::InFlightRegistry;
use super::list::PropertyListView;
use super::view::{PropertyView, SharedView, ViewHandle};
use crate::api::{ApiError, PropertyStore};
use crate::observability::{api_metrics, OperationTimer};
use crate::property::{Property, PropertyFilters, PropertyId};
use crate::telemetry::{create_review_span, generate_correlation_id};
use crate::verification::{
    is_transition_allowed, visibility_change_allowed, VerificationStatus, Visibility,
};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("cannot move listing from {from} to {to}")]
    TransitionNotAllowed {
        from: VerificationStatus,
        to: VerificationStatus,
    },
    #[error("visibility can only be changed on certified listings (current status: {status})")]
    VisibilityLocked { status: VerificationStatus },
    #[error("visibility is already {0}")]
    VisibilityUnchanged(Visibility),
    #[error("property {id} changed on the server (now {status}); reload and try again")]
    Stale {
        id: PropertyId,
        status: VerificationStatus,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How a review action ended.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The server accepted the change; carries the record it returned.
    Applied(Property),
    /// The request was sent and failed. The view keeps its previous record.
    Failed { message: String, error: ReviewError },
    /// The client refused to send the request.
    Rejected(ReviewError),
    /// Another mutation for the same property is still outstanding.
    Busy,
    /// The view was dropped; any response was not applied.
    Discarded,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }
}

enum Mutation {
    Status {
        target: VerificationStatus,
        notes: Option<String>,
    },
    Visibility(Visibility),
}

impl Mutation {
    fn operation(&self) -> &'static str {
        match self {
            Mutation::Status { .. } => "update_status",
            Mutation::Visibility(_) => "update_visibility",
        }
    }

    /// Client-side guard, evaluated against whatever record is current.
    fn check(&self, property: &Property) -> Result<(), ReviewError> {
        match self {
            Mutation::Status { target, .. } => {
                if is_transition_allowed(property.verification_status, *target) {
                    Ok(())
                } else {
                    Err(ReviewError::TransitionNotAllowed {
                        from: property.verification_status,
                        to: *target,
                    })
                }
            }
            Mutation::Visibility(target) => {
                if !visibility_change_allowed(property.verification_status) {
                    Err(ReviewError::VisibilityLocked {
                        status: property.verification_status,
                    })
                } else if *target == property.visibility {
                    Err(ReviewError::VisibilityUnchanged(*target))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn success_message(&self, property: &Property) -> String {
        match self {
            Mutation::Status { .. } => format!(
                "Verification status updated to {} ({})",
                property.verification_status,
                property.verification_status.label()
            ),
            Mutation::Visibility(_) => format!("Visibility set to {}", property.visibility),
        }
    }
}

/// One user's review session against the marketplace API.
///
/// Every mutation follows the same round trip: disable the property's
/// actions, send the request, then either replace the view's record with the
/// server's copy or leave it untouched and surface the error. No retries.
pub struct ReviewSession<S: ?Sized> {
    store: Arc<S>,
    in_flight: InFlightRegistry,
    refresh: watch::Sender<u64>,
    revalidate_remote: bool,
}

impl<S> ReviewSession<S>
where
    S: PropertyStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        let (refresh, _) = watch::channel(0);
        Self {
            store,
            in_flight: InFlightRegistry::new(),
            refresh,
            revalidate_remote: false,
        }
    }

    /// Re-read each property from the API right before mutating it.
    pub fn with_remote_revalidation(mut self, enabled: bool) -> Self {
        self.revalidate_remote = enabled;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Generation counter bumped after every applied mutation.
    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    pub fn list_view(&self, filters: PropertyFilters, page_size: u32) -> PropertyListView {
        PropertyListView::new(filters, page_size, self.subscribe_refresh())
    }

    /// Load a property into a fresh detail view.
    pub async fn open(&self, id: &PropertyId) -> Result<SharedView, ApiError> {
        let property = self.store.get_property(id).await?;
        Ok(PropertyView::shared(property))
    }

    pub async fn change_status(
        &self,
        view: &ViewHandle,
        target: VerificationStatus,
        notes: Option<String>,
    ) -> MutationOutcome {
        self.mutate(view, Mutation::Status { target, notes }).await
    }

    pub async fn change_visibility(&self, view: &ViewHandle, target: Visibility) -> MutationOutcome {
        self.mutate(view, Mutation::Visibility(target)).await
    }

    async fn mutate(&self, handle: &ViewHandle, mutation: Mutation) -> MutationOutcome {
        let Some(view) = handle.upgrade() else {
            return MutationOutcome::Discarded;
        };
        let id = view.lock().await.id().clone();
        drop(view);

        let correlation_id = generate_correlation_id();
        let span = create_review_span(mutation.operation(), id.as_str(), &correlation_id);
        let timer = OperationTimer::new(mutation.operation());
        let outcome = self.run(handle, id, mutation).instrument(span).await;
        timer.finish();
        outcome
    }

    async fn run(&self, handle: &ViewHandle, id: PropertyId, mutation: Mutation) -> MutationOutcome {
        let Some(_guard) = self.in_flight.try_acquire(&id) else {
            debug!("Mutation already in flight, ignoring");
            return MutationOutcome::Busy;
        };

        if self.revalidate_remote {
            let fresh = match self.store.get_property(&id).await {
                Ok(fresh) => fresh,
                Err(err) => return self.fail(handle, err).await,
            };
            let Some(view) = handle.upgrade() else {
                return MutationOutcome::Discarded;
            };
            let mut view = view.lock().await;
            let moved = view.property().verification_status != fresh.verification_status;
            view.reload(fresh);
            if moved {
                if let Err(err) = mutation.check(view.property()) {
                    warn!(error = %err, "Property moved on the server since last read");
                    let stale = ReviewError::Stale {
                        id: id.clone(),
                        status: view.property().verification_status,
                    };
                    view.notify_error(stale.to_string());
                    api_metrics().record_guard_rejection();
                    return MutationOutcome::Rejected(stale);
                }
            }
        }

        {
            let Some(view) = handle.upgrade() else {
                return MutationOutcome::Discarded;
            };
            let mut view = view.lock().await;
            if let Err(err) = mutation.check(view.property()) {
                warn!(error = %err, "Review action rejected by client guard");
                view.notify_error(err.to_string());
                api_metrics().record_guard_rejection();
                return MutationOutcome::Rejected(err);
            }
            view.begin_mutation();
        }

        let result = match &mutation {
            Mutation::Status { target, notes } => {
                self.store.update_status(&id, *target, notes.clone()).await
            }
            Mutation::Visibility(target) => self.store.update_visibility(&id, *target).await,
        };

        match result {
            Ok(property) => {
                let Some(view) = handle.upgrade() else {
                    debug!("View dropped before response arrived, discarding");
                    return MutationOutcome::Discarded;
                };
                let message = mutation.success_message(&property);
                view.lock().await.apply_success(property.clone(), message);
                self.refresh.send_modify(|generation| *generation += 1);
                api_metrics().record_mutation(true);
                info!(
                    status = %property.verification_status,
                    visibility = %property.visibility,
                    "Review action applied"
                );
                MutationOutcome::Applied(property)
            }
            Err(err) => self.fail(handle, err).await,
        }
    }

    async fn fail(&self, handle: &ViewHandle, err: ApiError) -> MutationOutcome {
        let message = err.user_message();
        warn!(error = %err, "Review action failed");
        api_metrics().record_mutation(false);
        let Some(view) = handle.upgrade() else {
            return MutationOutcome::Discarded;
        };
        let mut view = view.lock().await;
        if view.is_updating() {
            view.apply_failure(message.clone());
        } else {
            view.notify_error(message.clone());
        }
        MutationOutcome::Failed {
            message,
            error: ReviewError::Api(err),
        }
    }
}
