//! Command line front-end.
//!
//! Parses arguments with clap, loads the configuration, wires the HTTP
//! adapters and routes each subcommand to its use case. No business logic
//! lives here.

mod browse;
mod commands;
pub mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dd_core::search::{SortDirection, SortField, StatusFilter};
use tokio::sync::mpsc;
use tracing::debug;

use crate::bootstrap::{init_tracing_subscriber, resolve_config, wire_dependencies};

#[derive(Parser, Debug)]
#[command(name = "docdesk", version)]
#[command(about = "Browse, search and discuss your documents", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/docdesk/docdesk.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents, optionally searched on the server
    List(ListArgs),
    /// Show one document
    Show {
        id: String,
        /// Print the full extracted text
        #[arg(long)]
        text: bool,
    },
    /// Delete a document
    Delete { id: String },
    /// Change a document's title
    Rename { id: String, title: String },
    /// Replace a document's extracted text with the contents of a file
    Edit {
        id: String,
        /// UTF-8 text file holding the new content
        #[arg(short, long)]
        from: PathBuf,
    },
    /// Upload images or PDFs
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Classification tag sent with every file
        #[arg(long)]
        doc_type: Option<String>,
    },
    /// Talk to the assistant about a document
    Chat {
        #[command(subcommand)]
        command: ChatCommand,
    },
    /// Interactive browser with live search
    Browse {
        /// Initial search term
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Server-side full-text search
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, default_value = "uploaded_at")]
    pub sort: SortField,

    #[arg(long, default_value = "desc")]
    pub order: SortDirection,

    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// Ask a question about a document
    Ask { id: String, message: String },
    /// Print the conversation so far
    History { id: String },
    /// Forget the conversation
    Clear { id: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        dotenvy::dotenv().ok();

        let mut config = resolve_config(self.config.as_deref())?;
        if let Some(url) = self.api_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
            config.api.base_url = url.to_string();
        }
        init_tracing_subscriber(config.logging.file)?;
        debug!(?config, "configuration resolved");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let deps = wire_dependencies(&config, Arc::new(events_tx))?;

        match self.command {
            Commands::List(args) => commands::list(&deps, &config.search, args).await,
            Commands::Show { id, text } => commands::show(&deps, &id, text).await,
            Commands::Delete { id } => commands::delete(&deps, &id).await,
            Commands::Rename { id, title } => commands::rename(&deps, &id, &title).await,
            Commands::Edit { id, from } => commands::edit(&deps, &id, &from).await,
            Commands::Upload { files, doc_type } => commands::upload(&deps, &files, doc_type).await,
            Commands::Chat { command } => match command {
                ChatCommand::Ask { id, message } => commands::chat_ask(&deps, &id, &message).await,
                ChatCommand::History { id } => commands::chat_history(&deps, &id).await,
                ChatCommand::Clear { id } => commands::chat_clear(&deps, &id).await,
            },
            Commands::Browse { search } => {
                browse::run(&deps, &config.search, events_rx, search).await
            }
        }
    }
}
