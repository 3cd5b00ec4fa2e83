use statig::prelude::*;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

use super::notification::Notification;
use crate::property::{Property, PropertyId};
use crate::verification::{allowed_transitions, visibility_target, VerificationStatus, Visibility};

/// Events driving a detail view's interaction state.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    MutationStarted,
    MutationSucceeded(Property),
    MutationFailed,
    /// A fresh copy of the record arrived outside a mutation (reload,
    /// revalidation). Server copies always replace the local one.
    Reloaded(Property),
}

/// Shared storage of the detail view state machine.
pub struct DetailView {
    property: Property,
    updating: bool,
}

#[state_machine(initial = "State::ready()")]
impl DetailView {
    #[state]
    fn ready(&mut self, event: &ViewEvent) -> Outcome<State> {
        match event {
            ViewEvent::MutationStarted => {
                self.updating = true;
                tracing::debug!(property.id = %self.property.id, "Mutation started");
                Transition(State::updating())
            }
            ViewEvent::Reloaded(property) => {
                self.property = property.clone();
                Handled
            }
            _ => Handled,
        }
    }

    #[state]
    fn updating(&mut self, event: &ViewEvent) -> Outcome<State> {
        match event {
            ViewEvent::MutationSucceeded(property) => {
                self.property = property.clone();
                self.updating = false;
                tracing::debug!(
                    property.id = %self.property.id,
                    status = %self.property.verification_status,
                    visibility = %self.property.visibility,
                    "Applied server record"
                );
                Transition(State::ready())
            }
            ViewEvent::MutationFailed => {
                self.updating = false;
                Transition(State::ready())
            }
            ViewEvent::Reloaded(property) => {
                self.property = property.clone();
                Handled
            }
            ViewEvent::MutationStarted => Handled,
        }
    }
}

/// What a view may offer the user right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMenu {
    /// Status targets in display order. Empty for terminal statuses.
    pub status_targets: Vec<VerificationStatus>,
    /// The single visibility target, when the gate is open.
    pub visibility_target: Option<Visibility>,
    /// False while a mutation for this property is outstanding.
    pub enabled: bool,
}

impl ActionMenu {
    pub fn for_property(property: &Property, enabled: bool) -> Self {
        Self {
            status_targets: allowed_transitions(property.verification_status).to_vec(),
            visibility_target: visibility_target(property.verification_status, property.visibility),
            enabled,
        }
    }

    pub fn offers_status(&self, target: VerificationStatus) -> bool {
        self.enabled && self.status_targets.contains(&target)
    }

    pub fn offers_visibility(&self, target: Visibility) -> bool {
        self.enabled && self.visibility_target == Some(target)
    }

    pub fn is_empty(&self) -> bool {
        self.status_targets.is_empty() && self.visibility_target.is_none()
    }
}

/// Detail view over one property record.
///
/// The record is only ever replaced by a copy the server returned.
pub struct PropertyView {
    machine: StateMachine<DetailView>,
    notifications: Vec<Notification>,
}

pub type SharedView = Arc<Mutex<PropertyView>>;

impl PropertyView {
    pub fn new(property: Property) -> Self {
        Self {
            machine: DetailView {
                property,
                updating: false,
            }
            .state_machine(),
            notifications: Vec::new(),
        }
    }

    pub fn shared(property: Property) -> SharedView {
        Arc::new(Mutex::new(Self::new(property)))
    }

    pub fn property(&self) -> &Property {
        &self.machine.inner().property
    }

    pub fn id(&self) -> &PropertyId {
        &self.property().id
    }

    pub fn is_updating(&self) -> bool {
        self.machine.inner().updating
    }

    pub fn action_menu(&self) -> ActionMenu {
        ActionMenu::for_property(self.property(), !self.is_updating())
    }

    pub(crate) fn begin_mutation(&mut self) {
        self.machine.handle(&ViewEvent::MutationStarted);
    }

    /// Apply a mutation response. Outside a mutation the server copy still
    /// replaces the record, but nothing is announced.
    pub(crate) fn apply_success(&mut self, property: Property, message: String) {
        if !self.is_updating() {
            self.reload(property);
            return;
        }
        self.machine.handle(&ViewEvent::MutationSucceeded(property));
        let id = self.id().clone();
        self.notifications.push(Notification::success(id, message));
    }

    pub(crate) fn apply_failure(&mut self, message: String) {
        self.machine.handle(&ViewEvent::MutationFailed);
        let id = self.id().clone();
        self.notifications.push(Notification::error(id, message));
    }

    pub(crate) fn notify_error(&mut self, message: String) {
        let id = self.id().clone();
        self.notifications.push(Notification::error(id, message));
    }

    /// Replace the record with a fresh server copy.
    pub fn reload(&mut self, property: Property) {
        self.machine.handle(&ViewEvent::Reloaded(property));
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

/// Non-owning handle used while a request is outstanding. If every
/// [`SharedView`] is dropped before the response arrives, the response is
/// discarded instead of applied.
#[derive(Debug, Clone)]
pub struct ViewHandle(Weak<Mutex<PropertyView>>);

impl ViewHandle {
    pub fn upgrade(&self) -> Option<SharedView> {
        self.0.upgrade()
    }
}

impl From<&SharedView> for ViewHandle {
    fn from(view: &SharedView) -> Self {
        Self(Arc::downgrade(view))
    }
}
