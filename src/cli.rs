//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use cookiescan::POLICY_FILENAME;

/// Generate a cookie policy document for a website.
///
/// Cookiescan drives a headless Chrome instance at the given URL, records
/// the cookies the site sets, classifies them, and renders a Markdown
/// cookie policy plus an optional banner preview.
#[derive(Parser, Debug)]
#[command(name = "cookiescan")]
#[command(author, version, about)]
pub struct Args {
    /// Website URL to scan (must start with http:// or https://)
    pub url: String,

    /// Navigation timeout in seconds (1-300)
    #[arg(short = 't', long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,

    /// Output path for the policy document
    #[arg(short = 'o', long, default_value = POLICY_FILENAME)]
    pub output: PathBuf,

    /// Print the policy to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Also write the static banner preview (banner_preview.html)
    #[arg(long)]
    pub banner: bool,

    /// Path to the scan-one sidecar binary (default: next to this executable)
    #[arg(long, value_name = "PATH")]
    pub scanner_bin: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_url_and_defaults_parse_successfully() {
        let args = Args::try_parse_from(["cookiescan", "https://example.com"]).unwrap();
        assert_eq!(args.url, "https://example.com");
        assert_eq!(args.timeout, 60);
        assert_eq!(args.output, PathBuf::from("cookie_policy.md"));
        assert!(!args.stdout);
        assert!(!args.banner);
        assert!(args.scanner_bin.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_missing_url_returns_error() {
        let result = Args::try_parse_from(["cookiescan"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_timeout_short_and_long_flags() {
        let args =
            Args::try_parse_from(["cookiescan", "https://example.com", "-t", "30"]).unwrap();
        assert_eq!(args.timeout, 30);

        let args =
            Args::try_parse_from(["cookiescan", "https://example.com", "--timeout", "120"])
                .unwrap();
        assert_eq!(args.timeout, 120);
    }

    #[test]
    fn test_cli_timeout_zero_rejected() {
        let result = Args::try_parse_from(["cookiescan", "https://example.com", "-t", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_over_max_rejected() {
        let result = Args::try_parse_from(["cookiescan", "https://example.com", "-t", "301"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_output_flag_sets_path() {
        let args = Args::try_parse_from([
            "cookiescan",
            "https://example.com",
            "-o",
            "policies/site.md",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("policies/site.md"));
    }

    #[test]
    fn test_cli_stdout_and_banner_flags() {
        let args = Args::try_parse_from([
            "cookiescan",
            "https://example.com",
            "--stdout",
            "--banner",
        ])
        .unwrap();
        assert!(args.stdout);
        assert!(args.banner);
    }

    #[test]
    fn test_cli_scanner_bin_override() {
        let args = Args::try_parse_from([
            "cookiescan",
            "https://example.com",
            "--scanner-bin",
            "/opt/bin/scan-one",
        ])
        .unwrap();
        assert_eq!(args.scanner_bin, Some(PathBuf::from("/opt/bin/scan-one")));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["cookiescan", "https://example.com", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["cookiescan", "https://example.com", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result =
            Args::try_parse_from(["cookiescan", "https://example.com", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
