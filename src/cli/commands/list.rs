use anyhow::{Context, Result};

use super::{status_icon, CommandContext};
use crate::property::{PropertyFilters, PropertyPage};

pub struct ListCommand {
    pub filters: PropertyFilters,
    pub page: u32,
    pub page_size: Option<u32>,
    pub title: &'static str,
}

impl ListCommand {
    pub fn new(filters: PropertyFilters) -> Self {
        Self {
            filters,
            page: 1,
            page_size: None,
            title: "📋 PROPERTIES",
        }
    }

    /// Listings under review.
    pub fn queue() -> Self {
        Self {
            title: "🟡 REVIEW QUEUE",
            ..Self::new(PropertyFilters::review_queue())
        }
    }

    pub fn with_page(mut self, page: u32, page_size: Option<u32>) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let page_size = self.page_size.unwrap_or(ctx.config.review.default_page_size);
        let mut view = ctx.session.list_view(self.filters.clone(), page_size);

        // first load tells us how many pages exist; then move to the one asked for
        view.load(ctx.session.store())
            .await
            .context("Failed to load properties")?;
        if self.page > 1 {
            view.go_to_page(self.page);
            view.refresh_if_stale(ctx.session.store())
                .await
                .context("Failed to load properties")?;
        }

        if ctx.json {
            println!("{}", serde_json::to_string_pretty(view.page())?);
            return Ok(());
        }

        print_page(self.title, view.page());
        Ok(())
    }
}

fn print_page(title: &str, page: &PropertyPage) {
    println!("{title}");
    println!("==========================");
    if page.items.is_empty() {
        println!("   No properties match these filters");
        return;
    }

    for property in &page.items {
        let city = property.city.as_deref().unwrap_or("-");
        println!(
            "{} {:<12} {:<7} {:<8} {:<14} {}",
            status_icon(property),
            property.id,
            property.verification_status,
            property.visibility,
            city,
            property.title
        );
    }
    println!();
    println!(
        "📄 Page {} of {} ({} total, {} per page)",
        page.page,
        page.total_pages.max(1),
        page.total,
        page.page_size
    );
    if page.has_next() {
        println!("💡 Next page: --page {}", page.page + 1);
    }
}
