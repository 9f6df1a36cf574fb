//! Command-line front end over the dashboard session.

use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::date_range::{end_of_day, DateRange, DEFAULT_RANGE_DAYS};
use crate::deepgram::{RequestPage, RequestRecord, UsageSummary};
use crate::error::{DashboardError, Result};
use crate::pager::RequestsPager;
use crate::path_format::{format_api_path, parse_path_components};
use crate::session::DashboardSession;
use crate::settings::{self, AppSettings};

#[derive(Parser, Debug)]
#[command(name = "deepgram-dashboard")]
#[command(about = "Usage summaries and request logs for a Deepgram project", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Origin serving the /api/deepgram proxy
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Talk to api.deepgram.com instead of the proxy
    #[arg(long, global = true)]
    pub direct: bool,

    /// Project id to query instead of the first listed project
    #[arg(long, global = true)]
    pub project: Option<String>,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Total requests and hours over a range of days
    Usage {
        /// First day (YYYY-MM-DD), defaults to 7 days before --to
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// One page of requests for the 24 hours ending with a day
    Requests {
        /// Day whose end closes the window (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Zero-based page, 0 is the newest
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Full detail of one request
    Request { id: String },
    /// Show the effective settings, optionally saving them
    Settings {
        #[arg(long)]
        save: bool,
    },
}

/// Install the log subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli.log_level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| DashboardError::Initialization(e.to_string()))?;

    runtime.block_on(execute(cli))
}

fn effective_settings(cli: &Cli) -> AppSettings {
    let mut settings = settings::load_settings();
    if let Some(origin) = &cli.origin {
        settings.origin = origin.clone();
    }
    if cli.direct {
        settings.direct = true;
    }
    if let Some(project) = &cli.project {
        settings.project_id = Some(project.clone());
    }
    settings
}

async fn execute(cli: Cli) -> Result<()> {
    let settings = effective_settings(&cli);

    if let Commands::Settings { save } = &cli.command {
        if *save {
            let path = settings::save_settings(&settings)?;
            println!("Saved {}", path.display());
        }
        return print_json(&settings);
    }

    let mut session = DashboardSession::new(settings.client_options());
    if !session.initialize_from_env()? {
        log::warn!("No API key found; set DEEPGRAM_API_KEY");
    }

    let today = Utc::now().date_naive();
    match cli.command {
        Commands::Usage { from, to } => {
            let to = to.unwrap_or(today);
            let from = from.unwrap_or(to - Duration::days(DEFAULT_RANGE_DAYS));
            let range = DateRange::for_days(from, to)?;
            let summary = session.usage(&range).await?;
            if cli.json {
                print_json(&summary)
            } else {
                print_usage(&summary);
                Ok(())
            }
        }
        Commands::Requests { date, page, limit } => {
            let end = end_of_day(date.unwrap_or(today));
            let mut pager =
                RequestsPager::with_limit(end, limit.unwrap_or(settings.page_limit))?;
            pager.jump_to(page);

            pager.load(&session).await?;
            let has_older = pager.has_older();
            let Some(loaded) = pager.current() else {
                return Ok(());
            };

            if cli.json {
                print_json(loaded)
            } else {
                let window = pager.window();
                println!(
                    "Requests {} .. {} (page {})",
                    window.start.format("%Y-%m-%d %H:%M:%S"),
                    window.end.format("%Y-%m-%d %H:%M:%S"),
                    u64::from(pager.page()) + 1
                );
                print_requests(loaded);
                if has_older && pager.older() {
                    println!("Older requests: --page {}", pager.page());
                }
                Ok(())
            }
        }
        Commands::Request { id } => {
            let record = session.request_detail(&id).await?;
            if cli.json {
                print_json(&record)
            } else {
                print_request(&record)
            }
        }
        Commands::Settings { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| DashboardError::Output(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

fn print_usage(summary: &UsageSummary) {
    println!("Usage {} .. {}", summary.start_date, summary.end_date);
    println!("  Requests: {}", summary.requests_count);
    println!("  Hours:    {:.2}", summary.hours);
}

fn print_requests(page: &RequestPage) {
    if page.requests.is_empty() {
        println!("No requests found for the selected date range");
        return;
    }

    for record in &page.requests {
        let path = format_api_path(&record.path);
        println!(
            "{:<26} {:<3} {:<44} {}",
            record.created,
            record.status_code(),
            path.display_path,
            record.request_id
        );
    }
}

fn print_request(record: &RequestRecord) -> Result<()> {
    let components = parse_path_components(&record.path);

    println!("Request {}", record.request_id);
    println!("  Created:    {}", record.created);
    println!("  Path:       {}", components.base_path);
    for (key, value) in components.query_params.iter() {
        println!("    {} = {}", key, value);
    }
    println!(
        "  Status:     {} ({})",
        record.code,
        if record.is_success() { "succeeded" } else { "failed" }
    );
    println!("  API Key ID: {}", record.api_key_id);
    println!(
        "  Deployment: {}",
        record.deployment.as_deref().unwrap_or("N/A")
    );
    if let Some(callback) = record.callback.as_deref().filter(|c| !c.is_empty()) {
        println!("  Callback:   {}", callback);
    }

    println!("Response:");
    print_json(&record.response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_usage_with_dates() {
        let cli = Cli::try_parse_from([
            "deepgram-dashboard",
            "usage",
            "--from",
            "2024-05-01",
            "--to",
            "2024-05-07",
        ])
        .unwrap();

        match cli.command {
            Commands::Usage { from, to } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 5, 1));
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 5, 7));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "deepgram-dashboard",
            "requests",
            "--page",
            "2",
            "--direct",
            "--project",
            "p-5",
        ])
        .unwrap();

        assert!(cli.direct);
        assert_eq!(cli.project.as_deref(), Some("p-5"));
        assert!(matches!(
            cli.command,
            Commands::Requests { page: 2, limit: None, date: None }
        ));
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Cli::try_parse_from(["deepgram-dashboard", "usage", "--from", "May 1"]);
        assert!(result.is_err());
    }
}
