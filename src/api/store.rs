use async_trait::async_trait;

use super::errors::ApiError;
use crate::property::{PageRequest, Property, PropertyFilters, PropertyId, PropertyPage};
use crate::verification::{VerificationStatus, Visibility};

/// Remote property store. The implementation owns persistence, authorization
/// and the real transition rules; every mutation returns the full record as
/// the server now sees it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn update_status(
        &self,
        id: &PropertyId,
        target: VerificationStatus,
        notes: Option<String>,
    ) -> Result<Property, ApiError>;

    async fn update_visibility(
        &self,
        id: &PropertyId,
        target: Visibility,
    ) -> Result<Property, ApiError>;

    async fn get_property(&self, id: &PropertyId) -> Result<Property, ApiError>;

    async fn list_properties(
        &self,
        filters: &PropertyFilters,
        page: PageRequest,
    ) -> Result<PropertyPage, ApiError>;
}
