//! Sidecar scanner binary.
//!
//! Runs one headless browser scan and prints the result as a single pretty
//! JSON document on stdout. All logging goes to stderr so stdout stays
//! machine-readable for the caller on the other side of the process
//! boundary.
//!
//! Exit status is zero even when navigation fails (the scan degrades to a
//! partial result); only a browser that cannot be launched or a dead
//! DevTools connection exits non-zero.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cookiescan::browser::{ScanOptions, scan_site};

/// Scan one URL with headless Chrome and emit the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "scan-one")]
#[command(author, version)]
struct Args {
    /// Website URL to scan
    #[arg(default_value = "https://example.com")]
    url: String,

    /// Navigation timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stderr only: the caller parses stdout as JSON.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = ScanOptions {
        navigation_timeout: Duration::from_secs(args.timeout),
        ..ScanOptions::default()
    };

    let result = scan_site(&args.url, &options)
        .await
        .context("browser scan failed")?;

    let json = serde_json::to_string_pretty(&result)?;
    println!("{json}");
    Ok(())
}
