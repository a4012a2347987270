//! The single-navigation cookie scan.
//!
//! Drives one headless page load: subscribe to network events, navigate,
//! wait for network idle (or the navigation timeout), then read every
//! cookie visible to the browser. Navigation failures are downgraded to
//! warnings on purpose — the site may have redirected, blocked, or stalled,
//! but cookies already set are still useful, so the scan always proceeds to
//! cookie collection and returns a (possibly partial) result.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::cdp::{CdpEvent, PageClient};
use super::error::BrowserError;
use super::launch::HeadlessChrome;
use crate::scan::{Cookie, ScanResult};

/// Scan tuning knobs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Upper bound on the whole navigation window.
    pub navigation_timeout: Duration,
    /// Quiescence window: the network counts as idle after this long with
    /// no in-flight requests.
    pub idle_window: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(60),
            idle_window: Duration::from_millis(500),
        }
    }
}

/// Cookie entry as `Network.getAllCookies` reports it.
#[derive(Debug, Deserialize)]
struct CdpCookie {
    #[serde(default)]
    name: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    expires: Option<f64>,
    #[serde(default)]
    session: bool,
}

/// Scans `url` with a fresh headless browser.
///
/// Launches Chrome, performs one navigation, and returns the cookies and
/// request URLs observed. The browser and its profile directory are torn
/// down unconditionally before this function returns, on error paths too.
///
/// # Errors
///
/// Returns [`BrowserError`] only when the browser cannot be launched or the
/// DevTools connection fails outright. Navigation timeouts and transient
/// `goto` errors are logged as warnings and produce a partial result.
#[instrument(skip(options))]
pub async fn scan_site(url: &str, options: &ScanOptions) -> Result<ScanResult, BrowserError> {
    let chrome = HeadlessChrome::launch().await?;
    // Scoped acquisition: whatever drive() returns, Chrome goes away.
    let result = drive(chrome.endpoint(), url, options).await;
    chrome.shutdown().await;
    result
}

/// Runs the navigation and cookie collection against a live endpoint.
async fn drive(
    endpoint: &str,
    url: &str,
    options: &ScanOptions,
) -> Result<ScanResult, BrowserError> {
    let mut client = PageClient::connect(endpoint).await?;
    let Some(events) = client.take_events() else {
        // take_events is called exactly once per client.
        return Err(BrowserError::ConnectionClosed);
    };

    client.call("Network.enable", None).await?;
    client.call("Page.enable", None).await?;

    // Page.navigate resolves as soon as navigation is accepted; the page
    // keeps loading while we drain network events below.
    match client.call("Page.navigate", Some(json!({ "url": url }))).await {
        Ok(result) => {
            if let Some(error_text) = result.get("errorText").and_then(Value::as_str) {
                warn!(url, error_text, "navigation reported an error, continuing");
            }
        }
        Err(e) => {
            warn!(url, error = %e, "navigation failed, continuing to cookie collection");
        }
    }

    let requests = collect_requests(events, options).await;

    let cookies = match client.call("Network.getAllCookies", None).await {
        Ok(result) => parse_cookies(&result),
        Err(e) => {
            warn!(error = %e, "cookie collection failed, returning empty jar");
            Vec::new()
        }
    };

    info!(
        url,
        cookies = cookies.len(),
        requests = requests.len(),
        "scan complete"
    );

    Ok(ScanResult {
        url: url.to_string(),
        cookies,
        requests,
    })
}

/// Drains network events until idle or the navigation timeout.
///
/// The accumulator is owned by this call alone; request URLs are appended
/// in the order the browser emits them. Idle means no in-flight requests
/// for one quiescence window. A site that never settles (persistent
/// polling) simply runs into the timeout and keeps what was captured.
async fn collect_requests(
    mut events: mpsc::UnboundedReceiver<CdpEvent>,
    options: &ScanOptions,
) -> Vec<String> {
    let deadline = tokio::time::Instant::now() + options.navigation_timeout;
    let mut requests: Vec<String> = Vec::new();
    let mut inflight: HashSet<String> = HashSet::new();

    loop {
        let now = tokio::time::Instant::now();
        if now >= deadline {
            warn!("navigation timed out before network idle");
            break;
        }
        let remaining = deadline - now;
        let wait = if inflight.is_empty() {
            options.idle_window.min(remaining)
        } else {
            remaining
        };

        match tokio::time::timeout(wait, events.recv()).await {
            Ok(Some(event)) => track_network_event(&event, &mut requests, &mut inflight),
            Ok(None) => {
                warn!("DevTools event stream closed during navigation");
                break;
            }
            Err(_) if inflight.is_empty() => {
                debug!(requests = requests.len(), "network idle");
                break;
            }
            Err(_) => {
                warn!(
                    inflight = inflight.len(),
                    "navigation timed out with requests in flight"
                );
                break;
            }
        }
    }

    requests
}

/// Applies one protocol event to the request accumulator.
fn track_network_event(
    event: &CdpEvent,
    requests: &mut Vec<String>,
    inflight: &mut HashSet<String>,
) {
    match event.method.as_str() {
        "Network.requestWillBeSent" => {
            if let Some(url) = event.params["request"]["url"].as_str() {
                requests.push(url.to_string());
            }
            if let Some(id) = event.params["requestId"].as_str() {
                inflight.insert(id.to_string());
            }
        }
        "Network.loadingFinished" | "Network.loadingFailed" => {
            if let Some(id) = event.params["requestId"].as_str() {
                inflight.remove(id);
            }
        }
        _ => {}
    }
}

/// Maps a `Network.getAllCookies` result into the wire cookie model.
///
/// The DevTools sentinel for session cookies (`expires: -1`, or the
/// explicit `session` flag) becomes an absent expiry. Entries that fail to
/// deserialize are skipped with a warning rather than failing the scan.
fn parse_cookies(result: &Value) -> Vec<Cookie> {
    let Some(entries) = result["cookies"].as_array() else {
        warn!("getAllCookies result carried no cookie array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<CdpCookie>(entry.clone()) {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                warn!(error = %e, "skipping unparseable cookie entry");
                None
            }
        })
        .map(|cdp| {
            let expires = match cdp.expires {
                Some(epoch) if !cdp.session && epoch >= 0.0 => Some(epoch),
                _ => None,
            };
            Cookie {
                name: cdp.name,
                domain: cdp.domain,
                expires,
                provider: None,
            }
        })
        .collect()
}
