use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use property_review::cli::commands::list::ListCommand;
use property_review::cli::commands::review::ReviewCommand;
use property_review::cli::commands::show::ShowCommand;
use property_review::cli::commands::{show_how_to_get_started, CommandContext};
use property_review::cli::{Cli, Commands};
use property_review::config::ReviewConfig;
use property_review::property::PropertyFilters;
use property_review::telemetry::{init_telemetry, shutdown_telemetry};
use property_review::verification::{VerificationStatus, Visibility};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env feeds the config layers; its outcome is logged once telemetry is up
    let env_file = ReviewConfig::load_env_file();
    let config = ReviewConfig::load_with_file(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_telemetry(&config.observability)?;
    match env_file {
        Ok(true) => info!("Loaded environment variables from .env file"),
        Ok(false) => {}
        Err(err) => warn!("Ignoring .env file: {err:#}"),
    }

    let Some(command) = cli.command else {
        return tokio::runtime::Runtime::new()?.block_on(show_how_to_get_started());
    };

    let metrics_enabled = config.observability.metrics_enabled;
    let ctx = CommandContext::new(config, cli.json)?;

    let result = tokio::runtime::Runtime::new()?.block_on(run(command, &ctx));

    if metrics_enabled {
        property_review::observability::api_metrics().log_stats();
    }
    shutdown_telemetry();
    result
}

async fn run(command: Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::List {
            status,
            visibility,
            search,
            agent,
            page,
            page_size,
        } => {
            let filters = PropertyFilters {
                status: status.as_deref().map(str::parse::<VerificationStatus>).transpose()?,
                visibility: visibility.as_deref().map(str::parse::<Visibility>).transpose()?,
                search,
                agent_id: agent,
            };
            ListCommand::new(filters)
                .with_page(page, page_size)
                .execute(ctx)
                .await
        }
        Commands::Queue { page } => ListCommand::queue().with_page(page, None).execute(ctx).await,
        Commands::Show { id } => ShowCommand::new(id).execute(ctx).await,
        Commands::SetStatus { id, status, notes } => {
            let target: VerificationStatus = status.parse()?;
            ReviewCommand::set_status(id, target, notes).execute(ctx).await
        }
        Commands::SetVisibility { id, visibility } => {
            let target: Visibility = visibility.parse()?;
            ReviewCommand::set_visibility(id, target).execute(ctx).await
        }
    }
}
