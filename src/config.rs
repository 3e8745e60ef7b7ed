use anyhow::{anyhow, Result};
use clap::Args;

use crate::pagination::PaginationMode;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PER_PAGE: usize = 5;

/// Options shared by every subcommand. Each one can also come from the
/// environment.
#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// Base URL of the candidate API
    #[arg(long = "api-url", env = "CANDIDATES_API_BASE_URL", global = true)]
    pub api_url: Option<String>,

    /// Candidates per page
    #[arg(long, env = "CANDIDATES_PER_PAGE", global = true)]
    pub per_page: Option<usize>,

    /// Where pagination happens (client slices a full result set)
    #[arg(long, value_enum, env = "CANDIDATES_PAGINATION", global = true)]
    pub pagination: Option<PaginationMode>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, env = "CANDIDATES_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub per_page: usize,
    pub pagination: PaginationMode,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(args: &SettingsArgs) -> Result<Self> {
        let api_base_url = args
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let per_page = args.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if per_page == 0 {
            return Err(anyhow!("--per-page must be greater than zero"));
        }

        Ok(Self {
            api_base_url,
            per_page,
            pagination: args.pagination.unwrap_or_default(),
            log_level: args.log_level.clone().unwrap_or_else(|| "info".to_string()),
        })
    }
}
