//! CLI entry point for the cookiescan tool.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cookiescan::{BANNER_HTML, SidecarScanner, classify_all, partition, render_today};
use tracing::{debug, info};
use url::Url;

mod cli;

use cli::Args;

/// Filename of the banner preview written next to the policy document.
const BANNER_FILENAME: &str = "banner_preview.html";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // Reject non-http(s) input before any scanner process is spawned.
    if !args.url.starts_with("http") {
        bail!("Please enter a full URL starting with http:// or https://");
    }
    let parsed = Url::parse(&args.url)
        .with_context(|| format!("invalid URL: {}", args.url))?;
    debug!(host = ?parsed.host_str(), "URL validated");

    let scanner = match &args.scanner_bin {
        Some(path) => SidecarScanner::with_binary(path),
        None => SidecarScanner::discover(),
    }
    .context("scanner sidecar not available")?
    .with_timeout(Duration::from_secs(args.timeout));

    info!(url = %args.url, "scanning site, this may take a few seconds");
    let result = scanner.scan(&args.url).await.context("Scan failed")?;

    let classified = classify_all(result.cookies);
    let (first_party, third_party) = partition(&classified, &result.url);
    info!(
        cookies = classified.len(),
        first_party = first_party.len(),
        third_party = third_party.len(),
        requests = result.requests.len(),
        "scan complete"
    );

    let policy = render_today(&result.url, &classified);

    if args.stdout {
        println!("{policy}");
    } else {
        fs::write(&args.output, &policy)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!(path = %args.output.display(), "policy written");
    }

    if args.banner {
        let banner_path = match args.output.parent() {
            Some(dir) if dir.as_os_str().is_empty() => BANNER_FILENAME.into(),
            Some(dir) => dir.join(BANNER_FILENAME),
            None => BANNER_FILENAME.into(),
        };
        fs::write(&banner_path, BANNER_HTML)
            .with_context(|| format!("failed to write {}", banner_path.display()))?;
        info!(path = %banner_path.display(), "banner preview written");
    }

    Ok(())
}
