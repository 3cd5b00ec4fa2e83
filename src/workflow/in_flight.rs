use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::property::PropertyId;

/// Per-session set of property ids with a mutation outstanding.
///
/// At most one mutation per property may be in flight; the id is released
/// when the returned guard is dropped, on every exit path.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    ids: Arc<Mutex<HashSet<PropertyId>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn ids(&self) -> MutexGuard<'_, HashSet<PropertyId>> {
        // the set stays consistent even if a holder panicked
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim `id`, or `None` if another mutation already holds it.
    pub fn try_acquire(&self, id: &PropertyId) -> Option<InFlightGuard> {
        if !self.ids().insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            registry: self.clone(),
            id: id.clone(),
        })
    }

    pub fn is_in_flight(&self, id: &PropertyId) -> bool {
        self.ids().contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    id: PropertyId,
}

impl InFlightGuard {
    pub fn id(&self) -> &PropertyId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.ids().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_blocked_until_release() {
        let registry = InFlightRegistry::new();
        let id = PropertyId::new("prop-1");

        let guard = registry.try_acquire(&id).expect("first acquire");
        assert!(registry.is_in_flight(&id));
        assert!(registry.try_acquire(&id).is_none());

        drop(guard);
        assert!(!registry.is_in_flight(&id));
        assert!(registry.try_acquire(&id).is_some());
    }

    #[test]
    fn test_ids_are_independent() {
        let registry = InFlightRegistry::new();
        let _a = registry.try_acquire(&PropertyId::new("a")).unwrap();
        let _b = registry.try_acquire(&PropertyId::new("b")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = InFlightRegistry::new();
        let other = registry.clone();
        let _guard = registry.try_acquire(&PropertyId::new("a")).unwrap();
        assert!(other.try_acquire(&PropertyId::new("a")).is_none());
    }
}
