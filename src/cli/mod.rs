use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "property-review")]
#[command(about = "Review and certify marketplace property listings")]
#[command(long_about = "property-review drives the listing verification workflow against the marketplace API. \
                       Listings move RED -> YELLOW -> GREEN and never back; only certified (GREEN) listings \
                       can be made public or private. Start with 'property-review queue' to see what is awaiting review.")]
pub struct Cli {
    /// Extra configuration file layered over property-review.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List properties with optional filters
    List {
        /// Only listings with this verification status (red, yellow, green)
        #[arg(long)]
        status: Option<String>,
        /// Only listings with this visibility (public, private)
        #[arg(long)]
        visibility: Option<String>,
        /// Free-text search passed to the API
        #[arg(long)]
        search: Option<String>,
        /// Only listings owned by this agent
        #[arg(long)]
        agent: Option<String>,
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Rows per page (defaults to review.default_page_size)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show listings currently under review (YELLOW)
    Queue {
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show one listing and the review actions available for it
    Show {
        /// Property id
        id: String,
    },
    /// Move a listing to a new verification status
    SetStatus {
        /// Property id
        id: String,
        /// Target status: yellow or green
        status: String,
        /// Review notes sent with the change
        #[arg(long)]
        notes: Option<String>,
    },
    /// Make a certified listing public or private
    SetVisibility {
        /// Property id
        id: String,
        /// Target visibility: public or private
        visibility: String,
    },
}
