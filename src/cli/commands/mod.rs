use anyhow::Result;
use std::sync::Arc;

use crate::api::HttpPropertyStore;
use crate::config::ReviewConfig;
use crate::property::Property;
use crate::workflow::{ActionMenu, Notification, ReviewSession};

pub mod list;
pub mod review;
pub mod show;

/// Everything a command needs: configuration plus a session bound to the
/// configured API.
pub struct CommandContext {
    pub config: ReviewConfig,
    pub session: ReviewSession<HttpPropertyStore>,
    pub json: bool,
}

impl CommandContext {
    pub fn new(config: ReviewConfig, json: bool) -> Result<Self> {
        let store = HttpPropertyStore::new(&config.api)?;
        let session = ReviewSession::new(Arc::new(store))
            .with_remote_revalidation(config.review.revalidate_remote);
        Ok(Self {
            config,
            session,
            json,
        })
    }
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("🏠 property-review - Listing verification workflow");
    println!();
    println!("To get started:");
    println!("  📋 property-review queue                 # Listings awaiting review");
    println!("  🔎 property-review list --status red     # Newly submitted listings");
    println!("  👁️  property-review show <id>             # Details and available actions");
    println!();
    println!("Review actions:");
    println!("  🟡 property-review set-status <id> yellow --notes \"docs received\"");
    println!("  🟢 property-review set-status <id> green");
    println!("  🌐 property-review set-visibility <id> public");
    println!();
    println!("💡 Statuses only move forward: RED -> YELLOW -> GREEN.");
    Ok(())
}

pub(crate) fn status_icon(property: &Property) -> &'static str {
    use crate::verification::VerificationStatus;
    match property.verification_status {
        VerificationStatus::Red => "🔴",
        VerificationStatus::Yellow => "🟡",
        VerificationStatus::Green => "🟢",
        VerificationStatus::Unknown => "⚪",
    }
}

pub(crate) fn print_action_menu(menu: &ActionMenu) {
    println!("🔧 AVAILABLE ACTIONS:");
    println!("────────────────────");
    if !menu.enabled {
        println!("   ⏳ An update is in progress; actions are disabled");
        return;
    }
    if menu.is_empty() {
        println!("   (none)");
        return;
    }
    for target in &menu.status_targets {
        println!("   → set-status {}", target.as_str().to_lowercase());
    }
    match menu.visibility_target {
        Some(target) => println!("   → set-visibility {}", target.as_str().to_lowercase()),
        None => println!("   🔒 Visibility locked until the listing is certified (GREEN)"),
    }
}

pub(crate) fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        println!("{notification}");
    }
}
