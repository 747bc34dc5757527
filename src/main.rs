//! Linksweep main entry point
//!
//! Command-line interface for the linksweep broken-link auditor.

use clap::Parser;
use linksweep::config::CrawlConfig;
use linksweep::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linksweep: a broken-link auditor
///
/// Crawls every page reachable within the given domain and writes a JSON
/// report of all URLs that answered with a 4xx or 5xx status, together with
/// the page that referenced them.
#[derive(Parser, Debug)]
#[command(name = "linksweep")]
#[command(version)]
#[command(about = "Audit a domain for broken links", long_about = None)]
struct Cli {
    /// Domain to audit (bare hostname, no scheme, no path)
    #[arg(value_name = "DOMAIN")]
    domain: String,

    /// Directory the report is written into
    #[arg(long, value_name = "DIR", default_value = "./reports")]
    report_dir: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = CrawlConfig::new(&cli.domain)?.with_report_dir(&cli.report_dir);

    tracing::info!(
        "Auditing {} (fetch x{}, extract x{})",
        config.domain,
        config.fetch_concurrency,
        config.extract_concurrency
    );

    crawl(config).await?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linksweep=info,warn"),
            1 => EnvFilter::new("linksweep=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
