//! Scan result model and out-of-process scanner client.
//!
//! The browser scan runs in a separate `scan-one` process and reports back
//! over standard streams as a single JSON document:
//! `{ "url": ..., "cookies": [...], "requests": [...] }`.
//! Running the scanner out-of-process keeps Chrome's subprocess tree out of
//! the caller's async runtime; the boundary behaves like a remote procedure
//! call with one request and one response, and every transport failure
//! (spawn error, non-zero exit, malformed payload) surfaces as [`ScanError`].
//!
//! # Module structure note
//!
//! This module is intentionally a single file (`mod.rs`-only): the wire
//! model and the sidecar client are small enough that sub-files would only
//! add indirection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Name of the sidecar scanner binary, resolved next to the caller by default.
pub const SCANNER_BIN: &str = "scan-one";

/// A single cookie as observed in the browser's cookie jar after the scan.
///
/// Field defaults are deliberately forgiving: the renderer must never fail
/// on incomplete cookie data, so a missing name or domain deserializes to an
/// empty string and a missing expiry stays `None` (session cookie).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name; empty when the browser reported none.
    #[serde(default)]
    pub name: String,
    /// Cookie domain, possibly with a leading dot (wildcard subdomain marker).
    #[serde(default)]
    pub domain: String,
    /// Expiry as epoch seconds. `None` means a session-only cookie; the
    /// scanner maps the DevTools `-1` sentinel (and `session: true`) here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    /// Human label for the owning service. Only meaningful for third-party
    /// cookies and never populated by the scanner itself; rendering omits
    /// the provider suffix when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl Cookie {
    /// Creates a session cookie with just a name and domain.
    #[must_use]
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            expires: None,
            provider: None,
        }
    }

    /// Cookie domain with any leading dot stripped.
    #[must_use]
    pub fn bare_domain(&self) -> &str {
        self.domain.trim_start_matches('.')
    }
}

/// Structured result of one browser scan.
///
/// Cookie order equals the order the browser context reported them; the
/// request URLs follow wall-clock emission order during the navigation
/// window. `requests` is captured for future analysis and not consumed by
/// the classifier or renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// The URL that was scanned, exactly as given.
    pub url: String,
    /// Cookies present in the browser context after page settle.
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    /// Outgoing request URLs observed while the page loaded.
    #[serde(default)]
    pub requests: Vec<String>,
}

/// Errors crossing the scanner process boundary.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The sidecar binary could not be found next to the current executable.
    #[error("scanner binary not found at {0}")]
    ScannerNotFound(PathBuf),

    /// Spawning the sidecar process failed.
    #[error("failed to launch scanner: {0}")]
    Spawn(#[from] std::io::Error),

    /// The sidecar exited with a non-zero status; `detail` carries its
    /// captured stderr for diagnosis.
    #[error("scanner failed (rc={code}): {detail}")]
    ScannerFailed {
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
        /// Captured stderr, trimmed.
        detail: String,
    },

    /// The sidecar's stdout was not a valid scan result document.
    #[error("failed to parse scanner output: {source}\nOutput:\n{stdout}")]
    MalformedOutput {
        /// Underlying JSON error.
        source: serde_json::Error,
        /// The raw stdout that failed to parse, for diagnosis.
        stdout: String,
    },
}

/// Client for the out-of-process `scan-one` scanner.
///
/// Holds the resolved path of the sidecar binary; `scan` blocks (awaits)
/// until the scanner process completes or fails. No retry is attempted.
#[derive(Clone)]
pub struct SidecarScanner {
    scanner_bin: PathBuf,
    timeout: Option<std::time::Duration>,
}

// Debug omits nothing sensitive, but keep the output short.
impl fmt::Debug for SidecarScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SidecarScanner")
            .field("scanner_bin", &self.scanner_bin)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SidecarScanner {
    /// Creates a scanner client using an explicit sidecar binary path.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ScannerNotFound`] if the path does not exist.
    pub fn with_binary(path: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let scanner_bin = path.into();
        if !scanner_bin.exists() {
            return Err(ScanError::ScannerNotFound(scanner_bin));
        }
        Ok(Self {
            scanner_bin,
            timeout: None,
        })
    }

    /// Creates a scanner client by resolving `scan-one` next to the current
    /// executable (the two binaries are installed side by side).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ScannerNotFound`] if no sibling binary exists.
    pub fn discover() -> Result<Self, ScanError> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        let candidate = dir.join(SCANNER_BIN);
        if candidate.exists() {
            return Ok(Self {
                scanner_bin: candidate,
                timeout: None,
            });
        }
        // Windows installs carry an .exe suffix.
        let candidate_exe = dir.join(format!("{SCANNER_BIN}.exe"));
        if candidate_exe.exists() {
            return Ok(Self {
                scanner_bin: candidate_exe,
                timeout: None,
            });
        }
        Err(ScanError::ScannerNotFound(candidate))
    }

    /// Sets the navigation timeout forwarded to the sidecar.
    ///
    /// When unset the sidecar applies its own 60 second default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Path of the sidecar binary this client will run.
    #[must_use]
    pub fn scanner_bin(&self) -> &Path {
        &self.scanner_bin
    }

    /// Runs one scan in the sidecar process and parses its JSON output.
    ///
    /// The call completes when the scanner process exits. A navigation
    /// failure inside the scanner is not an error here: the sidecar
    /// downgrades it to a warning and still exits zero with a (possibly
    /// empty) result.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the process cannot be spawned, exits
    /// non-zero, or emits output that is not a scan result document.
    #[instrument(level = "debug", skip(self), fields(scanner = %self.scanner_bin.display()))]
    pub async fn scan(&self, url: &str) -> Result<ScanResult, ScanError> {
        debug!(url, "spawning scanner sidecar");

        let mut cmd = Command::new(&self.scanner_bin);
        cmd.arg(url);
        if let Some(timeout) = self.timeout {
            cmd.arg("--timeout").arg(timeout.as_secs().to_string());
        }
        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            return Err(ScanError::ScannerFailed {
                code,
                detail: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            // The sidecar logs navigation warnings on stderr even on success.
            warn!(detail = %stderr.trim(), "scanner reported warnings");
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        parse_scan_output(&stdout)
    }
}

/// Parses a scanner stdout capture into a [`ScanResult`].
///
/// # Errors
///
/// Returns [`ScanError::MalformedOutput`] carrying the raw output when the
/// payload is not valid JSON for the wire format.
pub fn parse_scan_output(stdout: &str) -> Result<ScanResult, ScanError> {
    serde_json::from_str(stdout).map_err(|source| ScanError::MalformedOutput {
        source,
        stdout: stdout.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ───── wire format ──────────────────────────────────────────────────────

    #[test]
    fn test_scan_result_parses_full_document() {
        let json = r#"{
            "url": "https://example.com",
            "cookies": [
                {"name": "sessionid", "domain": "example.com"},
                {"name": "_ga", "domain": ".doubleclick.net", "expires": 1772000000.5}
            ],
            "requests": ["https://example.com/", "https://cdn.example.com/app.js"]
        }"#;
        let result = parse_scan_output(json).unwrap();
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.cookies.len(), 2);
        assert_eq!(result.cookies[0].name, "sessionid");
        assert!(result.cookies[0].expires.is_none());
        assert_eq!(result.cookies[1].expires, Some(1_772_000_000.5));
        assert_eq!(result.requests.len(), 2);
    }

    #[test]
    fn test_scan_result_missing_lists_default_empty() {
        let result = parse_scan_output(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(result.cookies.is_empty());
        assert!(result.requests.is_empty());
    }

    #[test]
    fn test_cookie_missing_fields_default_rather_than_fail() {
        let result =
            parse_scan_output(r#"{"url": "u", "cookies": [{}], "requests": []}"#).unwrap();
        let cookie = &result.cookies[0];
        assert_eq!(cookie.name, "");
        assert_eq!(cookie.domain, "");
        assert!(cookie.expires.is_none());
        assert!(cookie.provider.is_none());
    }

    #[test]
    fn test_cookie_order_preserved_from_document() {
        let json = r#"{"url": "u", "cookies": [
            {"name": "c"}, {"name": "a"}, {"name": "b"}
        ], "requests": []}"#;
        let result = parse_scan_output(json).unwrap();
        let names: Vec<&str> = result.cookies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_session_cookie_serializes_without_expires_key() {
        let cookie = Cookie::new("sid", "example.com");
        let value = serde_json::to_value(&cookie).unwrap();
        assert!(value.get("expires").is_none());
        assert!(value.get("provider").is_none());
    }

    #[test]
    fn test_malformed_output_error_carries_raw_stdout() {
        let err = parse_scan_output("not json at all").unwrap_err();
        match err {
            ScanError::MalformedOutput { stdout, .. } => {
                assert_eq!(stdout, "not json at all");
            }
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
        // The Display impl must surface the captured output for diagnosis.
        let err = parse_scan_output("garbage").unwrap_err();
        assert!(err.to_string().contains("garbage"));
    }

    // ───── bare_domain ──────────────────────────────────────────────────────

    #[test]
    fn test_bare_domain_strips_leading_dot() {
        let cookie = Cookie::new("_ga", ".doubleclick.net");
        assert_eq!(cookie.bare_domain(), "doubleclick.net");
    }

    #[test]
    fn test_bare_domain_plain_domain_unchanged() {
        let cookie = Cookie::new("sid", "example.com");
        assert_eq!(cookie.bare_domain(), "example.com");
    }

    // ───── SidecarScanner construction ──────────────────────────────────────

    #[test]
    fn test_with_binary_missing_path_returns_not_found() {
        let err = SidecarScanner::with_binary("/nonexistent/scan-one").unwrap_err();
        match err {
            ScanError::ScannerNotFound(path) => {
                assert_eq!(path, PathBuf::from("/nonexistent/scan-one"));
            }
            other => panic!("expected ScannerNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_with_binary_existing_path_accepted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bin = tmp.path().join(SCANNER_BIN);
        std::fs::write(&bin, b"#!/bin/sh\n").unwrap();
        let scanner = SidecarScanner::with_binary(&bin).unwrap();
        assert_eq!(scanner.scanner_bin(), bin.as_path());
    }
}
