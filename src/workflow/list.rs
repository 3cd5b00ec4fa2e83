use tokio::sync::watch;
use tracing::debug;

use crate::api::{ApiError, PropertyStore};
use crate::property::{PageRequest, Property, PropertyFilters, PropertyPage};

/// Paginated list of properties kept in step with the list endpoint.
///
/// Filter and page changes mark the view stale; so does a successful
/// mutation anywhere in the owning session (observed through the refresh
/// generation). Stale views re-fetch on [`PropertyListView::refresh_if_stale`].
#[derive(Debug)]
pub struct PropertyListView {
    filters: PropertyFilters,
    request: PageRequest,
    page: PropertyPage,
    refresh: watch::Receiver<u64>,
    stale: bool,
}

impl PropertyListView {
    pub fn new(filters: PropertyFilters, page_size: u32, refresh: watch::Receiver<u64>) -> Self {
        let request = PageRequest::first(page_size);
        Self {
            filters,
            request,
            page: PropertyPage::empty(request.page_size),
            refresh,
            stale: true,
        }
    }

    pub fn filters(&self) -> &PropertyFilters {
        &self.filters
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn page(&self) -> &PropertyPage {
        &self.page
    }

    pub fn items(&self) -> &[Property] {
        &self.page.items
    }

    /// New filters always restart at page 1.
    pub fn set_filters(&mut self, filters: PropertyFilters) {
        if filters != self.filters {
            self.filters = filters;
            self.request = PageRequest::first(self.request.page_size);
            self.stale = true;
        }
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        let request = PageRequest::first(page_size);
        if request.page_size != self.request.page_size {
            self.request = request;
            self.stale = true;
        }
    }

    /// Move to `page`, clamped to the last page the server reported.
    pub fn go_to_page(&mut self, page: u32) {
        let last = self.page.total_pages.max(1);
        let page = page.clamp(1, last);
        if page != self.request.page {
            self.request = PageRequest::new(page, self.request.page_size);
            self.stale = true;
        }
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.request.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.request.page.saturating_sub(1));
    }

    pub fn needs_refresh(&self) -> bool {
        self.stale || self.refresh.has_changed().unwrap_or(false)
    }

    /// Fetch the current page. If the server now has fewer pages than the
    /// one requested (rows left the filter), fall back to the last page.
    ///
    /// A failed fetch leaves the view stale so the next refresh retries it.
    pub async fn load<S>(&mut self, store: &S) -> Result<&PropertyPage, ApiError>
    where
        S: PropertyStore + ?Sized,
    {
        let _ = self.refresh.borrow_and_update();

        match self.fetch(store).await {
            Ok(page) => {
                self.page = page;
                self.stale = false;
                Ok(&self.page)
            }
            Err(err) => {
                self.stale = true;
                Err(err)
            }
        }
    }

    async fn fetch<S>(&mut self, store: &S) -> Result<PropertyPage, ApiError>
    where
        S: PropertyStore + ?Sized,
    {
        let page = store.list_properties(&self.filters, self.request).await?;
        if page.total_pages == 0 || self.request.page <= page.total_pages {
            return Ok(page);
        }

        debug!(
            requested = self.request.page,
            total_pages = page.total_pages,
            "Requested page past the end, loading last page"
        );
        self.request = PageRequest::new(page.total_pages, self.request.page_size);
        store.list_properties(&self.filters, self.request).await
    }

    /// Returns whether a fetch happened.
    pub async fn refresh_if_stale<S>(&mut self, store: &S) -> Result<bool, ApiError>
    where
        S: PropertyStore + ?Sized,
    {
        if !self.needs_refresh() {
            return Ok(false);
        }
        self.load(store).await?;
        Ok(true)
    }
}
