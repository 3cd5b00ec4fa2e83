use anyhow::{Context, Result};
use serde_json::json;

use super::{print_action_menu, status_icon, CommandContext};
use crate::property::PropertyId;

pub struct ShowCommand {
    pub id: PropertyId,
}

impl ShowCommand {
    pub fn new(id: impl Into<PropertyId>) -> Self {
        Self { id: id.into() }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let view = ctx
            .session
            .open(&self.id)
            .await
            .with_context(|| format!("Failed to load property {}", self.id))?;
        let view = view.lock().await;
        let property = view.property();
        let menu = view.action_menu();

        if ctx.json {
            let output = json!({
                "property": property,
                "actions": {
                    "status_targets": menu.status_targets,
                    "visibility_target": menu.visibility_target,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{} {} - {}", status_icon(property), property.id, property.title);
        println!("   Status:     {} ({})", property.verification_status, property.verification_status.label());
        println!("   Visibility: {}", property.visibility);
        if let Some(city) = &property.city {
            println!("   City:       {city}");
        }
        if let Some(price) = property.price {
            println!("   Price:      {price:.2}");
        }
        if let Some(review) = &property.review {
            if let Some(by) = &review.reviewed_by {
                println!("   Reviewed by: {by}");
            }
            if let Some(at) = review.reviewed_at {
                println!("   Reviewed at: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(notes) = &review.notes {
                println!("   Notes:       {notes}");
            }
        }
        println!("   Updated:    {}", property.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!();
        print_action_menu(&menu);
        Ok(())
    }
}
