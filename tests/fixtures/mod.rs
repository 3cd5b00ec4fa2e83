//! In-memory marketplace used by the workflow tests.
//!
//! Enforces the same transition rules the real API does, so tests can
//! exercise server-side rejections without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use property_review::api::{ApiError, PropertyStore};
use property_review::property::{
    PageRequest, Property, PropertyFilters, PropertyId, PropertyPage, ReviewMetadata,
};
use property_review::verification::{is_transition_allowed, VerificationStatus, Visibility};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn property(id: &str, status: VerificationStatus, visibility: Visibility) -> Property {
    Property {
        id: PropertyId::new(id),
        title: format!("Listing {id}"),
        verification_status: status,
        visibility,
        review: None,
        city: Some("Abuja".to_string()),
        price: Some(45_000_000.0),
        agent_id: Some("agent-1".to_string()),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// Holds a mutation open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeMarketplace {
    records: Mutex<BTreeMap<PropertyId, Property>>,
    fail_next: Mutex<Option<ApiError>>,
    gate: Mutex<Option<Arc<Gate>>>,
    pub mutation_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeMarketplace {
    pub fn with(properties: Vec<Property>) -> Self {
        let store = Self::default();
        {
            let mut records = store.records.lock().unwrap();
            for p in properties {
                records.insert(p.id.clone(), p);
            }
        }
        store
    }

    pub fn record(&self, id: &str) -> Property {
        self.records.lock().unwrap()[&PropertyId::new(id)].clone()
    }

    /// Overwrite a record as if another client had changed it.
    pub fn set_record(&self, property: Property) {
        self.records.lock().unwrap().insert(property.id.clone(), property);
    }

    pub fn fail_next_with(&self, error: ApiError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn install_gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn mutations(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    async fn before_mutation(&self) -> Result<(), ApiError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn rejected(message: &str) -> ApiError {
        ApiError::Rejected {
            status: 422,
            message: Some(message.to_string()),
        }
    }

    fn not_found(id: &PropertyId) -> ApiError {
        ApiError::Rejected {
            status: 404,
            message: Some(format!("property {id} not found")),
        }
    }
}

#[async_trait]
impl PropertyStore for FakeMarketplace {
    async fn update_status(
        &self,
        id: &PropertyId,
        target: VerificationStatus,
        notes: Option<String>,
    ) -> Result<Property, ApiError> {
        self.before_mutation().await?;
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(id).ok_or_else(|| Self::not_found(id))?;

        if record.verification_status == VerificationStatus::Green {
            return Err(Self::rejected("cannot downgrade certified property"));
        }
        if !is_transition_allowed(record.verification_status, target) {
            return Err(Self::rejected("invalid verification transition"));
        }

        record.verification_status = target;
        if target == VerificationStatus::Green {
            record.visibility = Visibility::Private;
        }
        record.review = Some(ReviewMetadata {
            reviewed_by: Some("admin@example.test".to_string()),
            notes,
            reviewed_at: Some(timestamp()),
        });
        record.updated_at = timestamp();
        Ok(record.clone())
    }

    async fn update_visibility(&self, id: &PropertyId, target: Visibility) -> Result<Property, ApiError> {
        self.before_mutation().await?;
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(id).ok_or_else(|| Self::not_found(id))?;

        if record.verification_status != VerificationStatus::Green {
            return Err(Self::rejected("only certified properties can change visibility"));
        }
        record.visibility = target;
        Ok(record.clone())
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Property, ApiError> {
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list_properties(
        &self,
        filters: &PropertyFilters,
        page: PageRequest,
    ) -> Result<PropertyPage, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        let matching: Vec<Property> = records
            .values()
            .filter(|p| filters.status.map_or(true, |s| p.verification_status == s))
            .filter(|p| filters.visibility.map_or(true, |v| p.visibility == v))
            .filter(|p| {
                filters
                    .search
                    .as_deref()
                    .map_or(true, |q| p.title.to_lowercase().contains(&q.to_lowercase()))
            })
            .filter(|p| {
                filters
                    .agent_id
                    .as_deref()
                    .map_or(true, |a| p.agent_id.as_deref() == Some(a))
            })
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let total_pages = matching.len().div_ceil(page.page_size as usize) as u32;
        let start = ((page.page - 1) * page.page_size) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .collect();

        Ok(PropertyPage {
            items,
            total,
            total_pages,
            page_size: page.page_size,
            page: page.page,
        })
    }
}
