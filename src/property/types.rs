use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::verification::{VerificationStatus, Visibility};

/// Opaque listing identifier assigned by the marketplace API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PropertyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn unrecognized_status() -> VerificationStatus {
    VerificationStatus::Unknown
}

/// Canonical listing record. The API is the only authority over its
/// contents; the client replaces it wholesale after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    #[serde(default = "unrecognized_status")]
    pub verification_status: VerificationStatus,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who reviewed the listing last, and what they noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewMetadata {
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Filters accepted by the list endpoint. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilters {
    pub status: Option<VerificationStatus>,
    pub visibility: Option<Visibility>,
    pub search: Option<String>,
    pub agent_id: Option<String>,
}

impl PropertyFilters {
    /// Admin review queue: everything currently under review.
    pub fn review_queue() -> Self {
        Self {
            status: Some(VerificationStatus::Yellow),
            ..Default::default()
        }
    }

    /// Query pairs for the list endpoint, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("verification_status", status.as_str().to_string()));
        }
        if let Some(visibility) = self.visibility {
            pairs.push(("visibility", visibility.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(agent_id) = &self.agent_id {
            pairs.push(("agent_id", agent_id.clone()));
        }
        pairs
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub total: u64,
    pub total_pages: u32,
    pub page_size: u32,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl PropertyPage {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
            page_size,
            page: 1,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn contains(&self, id: &PropertyId) -> bool {
        self.items.iter().any(|p| &p.id == id)
    }
}
