mod catalog;
mod client;
mod config;
mod controller;
mod models;
mod pagination;
mod query;
mod search;
mod selection;
mod state;
mod telemetry;
mod tui;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use catalog::FilterCatalog;
use client::HttpCandidateSource;
use config::{Settings, SettingsArgs};
use controller::RetrievalController;
use models::SortOrder;
use state::ListingState;

#[derive(Parser)]
#[command(name = "candidates")]
#[command(about = "Search, filter, sort and page through job candidates")]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse candidates interactively (default)
    Browse,

    /// Fetch one page of candidates and print it
    List {
        /// Search by name, position, or company
        #[arg(short, long, default_value = "")]
        search: String,

        /// Also search resumes and notes (needs --search)
        #[arg(long)]
        full_text: bool,

        /// Filter key to activate (repeatable), e.g. active, job-123, LinkedIn
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortOrder::ActivityDesc)]
        sort: SortOrder,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show the filter catalog
    Filters,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli.settings)?;

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            let log_path = telemetry::init_file(&settings.log_level)?;
            tracing::info!(api = %settings.api_base_url, mode = ?settings.pagination, "starting browser");
            tui::run_browse(&settings)?;
            println!("Log written to {}", log_path.display());
        }

        Commands::List {
            search,
            full_text,
            filters,
            sort,
            page,
        } => {
            telemetry::init_stderr(&settings.log_level)?;
            run_list(&settings, &search, full_text, &filters, sort, page).await?;
        }

        Commands::Filters => {
            let catalog = FilterCatalog::default();
            println!("{:<18} {:<36} {:<20}", "SECTION", "LABEL", "KEY");
            println!("{}", "-".repeat(74));
            for section in catalog.sections() {
                for option in section.options {
                    println!(
                        "{:<18} {:<36} {:<20}",
                        section.title,
                        truncate(option.label, 34),
                        option.key()
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_list(
    settings: &Settings,
    search: &str,
    full_text: bool,
    filters: &[String],
    sort: SortOrder,
    page: usize,
) -> Result<()> {
    let catalog = FilterCatalog::default();
    let mut listing = ListingState::new(settings.per_page);
    listing.set_search_text(search);
    listing.set_full_text_search(full_text);
    listing.set_sort(sort);
    for key in filters {
        listing.set_filter(key, true);
    }

    // Page is only known to be in range once the total is known; in server
    // mode the requested page goes out with the first request.
    listing.set_page(page, page);

    let mut controller = RetrievalController::new(
        HttpCandidateSource::new(&settings.api_base_url),
        catalog,
        settings.pagination,
    );
    controller.refresh(&listing).await;

    if let Some(message) = controller.error() {
        return Err(anyhow!("{}", message));
    }

    let total_pages = controller.total_pages(settings.per_page);
    listing.set_page(page, total_pages);

    let rows = controller.visible(listing.query());
    if rows.is_empty() {
        println!("No candidates found.");
        return Ok(());
    }

    println!("{:<8} {:<24} {:<30} {:<20}", "ID", "NAME", "POSITION", "STATUS");
    println!("{}", "-".repeat(84));
    for candidate in rows {
        println!(
            "{:<8} {:<24} {:<30} {:<20}",
            truncate(&candidate.id.to_string(), 8),
            truncate(&candidate.name, 22),
            truncate(&candidate.headline().unwrap_or_default(), 28),
            truncate(candidate.status.as_deref().unwrap_or("-"), 18),
        );
    }

    let active: Vec<&str> = listing
        .selection()
        .iter()
        .map(|key| catalog.label_for(key))
        .collect();
    println!(
        "\nShowing {} candidate applications, page {} of {}",
        controller.total(),
        listing.query().page,
        total_pages
    );
    if !active.is_empty() {
        println!("Filters: {}", active.join(", "));
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer name", 10), "a much ...");
        assert_eq!(truncate("Ünïcödé names", 8), "Ünïcö...");
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "candidates",
            "--api-url",
            "http://api.test",
            "list",
            "-s",
            "alice",
            "--full-text",
            "-f",
            "active",
            "-f",
            "LinkedIn",
            "--sort",
            "name_desc",
        ])
        .unwrap();
        assert_eq!(cli.settings.api_url.as_deref(), Some("http://api.test"));
        match cli.command {
            Some(Commands::List {
                search,
                full_text,
                filters,
                sort,
                page,
            }) => {
                assert_eq!(search, "alice");
                assert!(full_text);
                assert_eq!(filters, vec!["active".to_string(), "LinkedIn".to_string()]);
                assert_eq!(sort, SortOrder::NameDesc);
                assert_eq!(page, 1);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_cli_defaults_to_browse() {
        let cli = Cli::try_parse_from(["candidates"]).unwrap();
        assert!(cli.command.is_none());
    }
}
