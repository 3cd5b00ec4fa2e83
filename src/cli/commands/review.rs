use anyhow::{bail, Context, Result};

use super::{print_action_menu, print_notifications, CommandContext};
use crate::property::PropertyId;
use crate::verification::{VerificationStatus, Visibility};
use crate::workflow::{MutationOutcome, SharedView, ViewHandle};

pub enum ReviewAction {
    Status {
        target: VerificationStatus,
        notes: Option<String>,
    },
    Visibility(Visibility),
}

pub struct ReviewCommand {
    pub id: PropertyId,
    pub action: ReviewAction,
}

impl ReviewCommand {
    pub fn set_status(id: impl Into<PropertyId>, target: VerificationStatus, notes: Option<String>) -> Self {
        Self {
            id: id.into(),
            action: ReviewAction::Status { target, notes },
        }
    }

    pub fn set_visibility(id: impl Into<PropertyId>, target: Visibility) -> Self {
        Self {
            id: id.into(),
            action: ReviewAction::Visibility(target),
        }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let view = ctx
            .session
            .open(&self.id)
            .await
            .with_context(|| format!("Failed to load property {}", self.id))?;

        if !self.is_offered(&view).await {
            // the session rejects it too; this just explains what is allowed
            println!("🚫 That action is not available for {}", self.id);
            print_action_menu(&view.lock().await.action_menu());
            println!();
        }

        let handle = ViewHandle::from(&view);
        let outcome = match &self.action {
            ReviewAction::Status { target, notes } => {
                ctx.session.change_status(&handle, *target, notes.clone()).await
            }
            ReviewAction::Visibility(target) => ctx.session.change_visibility(&handle, *target).await,
        };

        let mut view = view.lock().await;
        let notifications = view.take_notifications();

        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&notifications)?);
        } else {
            print_notifications(&notifications);
        }

        match outcome {
            MutationOutcome::Applied(_) => {
                if !ctx.json {
                    println!();
                    print_action_menu(&view.action_menu());
                }
                Ok(())
            }
            MutationOutcome::Failed { message, .. } => bail!("Review action failed: {message}"),
            MutationOutcome::Rejected(err) => bail!("Review action rejected: {err}"),
            MutationOutcome::Busy => bail!("Another update for {} is still in progress", self.id),
            MutationOutcome::Discarded => bail!("Review action was not applied"),
        }
    }

    async fn is_offered(&self, view: &SharedView) -> bool {
        let menu = view.lock().await.action_menu();
        match &self.action {
            ReviewAction::Status { target, .. } => menu.offers_status(*target),
            ReviewAction::Visibility(target) => menu.offers_visibility(*target),
        }
    }
}
