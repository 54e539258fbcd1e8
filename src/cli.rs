//! Command line flags. Each flag overrides the matching `settings.conf` entry.

use std::path::PathBuf;

use clap::Parser;

use crate::app::Settings;

#[derive(Parser, Debug, Clone)]
#[command(name = "userform", version, about = "Edit a list of user records in the terminal")]
pub struct Cli {
    /// Remote collection to load the initial rows from.
    #[arg(long, env = "USERFORM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Duration of the simulated submission, in milliseconds.
    #[arg(long)]
    pub submit_delay_ms: Option<u64>,

    /// Timeout of the seed request, in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub fetch_timeout_secs: Option<u64>,

    /// Start with an empty list instead of fetching the seed rows.
    #[arg(long)]
    pub no_seed: bool,

    /// Write logs to this file. Without it logs are discarded, since the TUI owns the terminal.
    #[arg(long, env = "USERFORM_LOG")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(ms) = self.submit_delay_ms {
            settings.submit_delay_ms = ms;
        }
        if let Some(secs) = self.fetch_timeout_secs {
            settings.fetch_timeout_secs = secs;
        }
    }
}
