//! Headless Chrome process management.
//!
//! Launches Chrome with `--headless=new` on an ephemeral DevTools port and a
//! throwaway profile directory, waits until the DevTools endpoint accepts
//! connections, and guarantees process kill plus profile cleanup on every
//! exit path. Chrome announces the ephemeral port by writing a
//! `DevToolsActivePort` file into the profile directory.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::error::BrowserError;

/// How long to wait for Chrome to publish its DevTools port.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval while waiting for startup.
const STARTUP_POLL: Duration = Duration::from_millis(200);

/// Find a Chrome/Chromium executable on this host.
///
/// The `COOKIESCAN_CHROME` environment variable overrides the search.
#[must_use]
pub fn find_chrome() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("COOKIESCAN_CHROME") {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
        warn!(path = %p.display(), "COOKIESCAN_CHROME set but does not exist");
    }

    #[cfg(target_os = "linux")]
    let candidates: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "macos")]
    let candidates: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "windows")]
    let candidates: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// A running headless Chrome instance scoped to one scan.
///
/// The profile directory lives only as long as this value; dropping it
/// without calling [`HeadlessChrome::shutdown`] still sends a kill to the
/// child process as a last resort.
pub struct HeadlessChrome {
    child: Child,
    // Held for its Drop impl: removes the profile directory.
    _profile_dir: TempDir,
    endpoint: String,
}

impl HeadlessChrome {
    /// Launches headless Chrome and waits for its DevTools endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ChromeNotFound`] when no executable exists,
    /// [`BrowserError::LaunchFailed`] when the spawn fails, and
    /// [`BrowserError::EndpointNotReady`] when the DevTools endpoint does
    /// not come up within the startup timeout.
    pub async fn launch() -> Result<Self, BrowserError> {
        let chrome_path = find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = TempDir::with_prefix("cookiescan-profile-")?;

        info!(chrome = %chrome_path.display(), "launching headless Chrome");

        // Port 0: Chrome picks an ephemeral port and writes it to the
        // DevToolsActivePort file inside the profile directory.
        let mut cmd = Command::new(&chrome_path);
        cmd.arg("--remote-debugging-port=0")
            .arg(format!("--user-data-dir={}", profile_dir.path().display()))
            .arg("--headless=new")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .arg("about:blank")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        debug!(pid = ?child.id(), "Chrome process spawned");

        let port_file = profile_dir.path().join("DevToolsActivePort");
        let deadline = tokio::time::Instant::now() + STARTUP_TIMEOUT;
        let port = loop {
            if let Some(status) = child.try_wait()? {
                return Err(BrowserError::LaunchFailed(format!(
                    "Chrome exited during startup with {status}"
                )));
            }
            if let Ok(contents) = std::fs::read_to_string(&port_file)
                && let Some(port) = parse_devtools_port(&contents)
            {
                break port;
            }
            if tokio::time::Instant::now() >= deadline {
                let _ = child.start_kill();
                return Err(BrowserError::EndpointNotReady(
                    "DevToolsActivePort file never appeared".to_string(),
                ));
            }
            tokio::time::sleep(STARTUP_POLL).await;
        };

        let endpoint = format!("http://127.0.0.1:{port}");
        wait_for_endpoint(&endpoint, deadline).await?;

        info!(%endpoint, "DevTools endpoint ready");
        Ok(Self {
            child,
            _profile_dir: profile_dir,
            endpoint,
        })
    }

    /// The DevTools HTTP endpoint, e.g. `http://127.0.0.1:34567`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Kills the Chrome process and removes the profile directory.
    ///
    /// Errors from the kill are logged, not returned: teardown is
    /// best-effort and must never mask a scan result.
    pub async fn shutdown(mut self) {
        debug!("shutting down Chrome");
        if let Err(e) = self.child.kill().await {
            warn!(error = %e, "failed to kill Chrome process");
        }
        // Profile TempDir is removed when self drops.
    }
}

/// Parses the first line of a `DevToolsActivePort` file into a port number.
fn parse_devtools_port(contents: &str) -> Option<u16> {
    contents.lines().next()?.trim().parse().ok()
}

/// Polls `GET /json/version` until the endpoint answers or `deadline` passes.
async fn wait_for_endpoint(
    endpoint: &str,
    deadline: tokio::time::Instant,
) -> Result<(), BrowserError> {
    let url = format!("{endpoint}/json/version");
    loop {
        match reqwest::get(&url).await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ if tokio::time::Instant::now() >= deadline => {
                return Err(BrowserError::EndpointNotReady(format!(
                    "{url} not answering"
                )));
            }
            _ => tokio::time::sleep(STARTUP_POLL).await,
        }
    }
}
