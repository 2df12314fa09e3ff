use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::{tui, version};
use super::run::RunCommand;

/// goto-page - a page selector with optimistic edits for your terminal
#[derive(Parser, Debug)]
#[command(
    name = "goto-page",
    version,
    about = "A page selector with optimistic edits for your terminal",
    long_about = r#"goto-page renders a page selector (up/down arrows and a page field).
Edits apply at once and are sent to a simulated owner; if the owner has not
confirmed a page shortly after the field loses focus, the edit is reverted.

Examples:
  goto-page                                  # Start interactive mode
  goto-page --pages 40 --owner-latency-ms 400  # Slow owner, watch edits revert
  goto-page run type:15 enter blur wait:150  # Replay a script, print JSON"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Number of pages
    #[arg(short = 'p', long = "pages", global = true)]
    pub pages: Option<i64>,

    /// Page to start on
    #[arg(short = 's', long = "page", global = true)]
    pub page: Option<i64>,

    /// How long the owner takes to accept a page, in milliseconds
    #[arg(long = "owner-latency-ms", global = true)]
    pub owner_latency_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a script of interactions non-interactively
    Run(RunCommand),
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }
        info!("{}", version::full_version());

        let config = self.resolve_config().await?;
        debug!(?config, "Configuration initialized");

        match self.command {
            Some(Commands::Run(run_cmd)) => run_cmd.execute(&config),
            None => {
                info!("Starting interactive mode");
                tui::run(&config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }

    /// Load configuration, then apply command line overrides
    pub async fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::init(self.config.as_deref()).await?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(pages) = self.pages {
            config.total_pages = pages;
        }
        if let Some(page) = self.page {
            config.selected_page = page;
        }
        if let Some(latency) = self.owner_latency_ms {
            config.owner_latency_ms = latency;
        }
    }
}
