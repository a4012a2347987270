//! Browser driver error types.

use thiserror::Error;

/// Errors from launching or driving the headless browser.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No Chrome/Chromium executable was found on this host.
    #[error("Chrome not found. Install Google Chrome or Chromium, or set COOKIESCAN_CHROME.")]
    ChromeNotFound,

    /// Spawning the Chrome process failed.
    #[error("failed to launch Chrome: {0}")]
    LaunchFailed(String),

    /// Chrome started but its DevTools endpoint never came up.
    #[error("DevTools endpoint not ready: {0}")]
    EndpointNotReady(String),

    /// HTTP error talking to the DevTools discovery endpoint.
    #[error("DevTools HTTP error: {0}")]
    Http(String),

    /// The browser exposed no page target to attach to.
    #[error("no page target available in the browser")]
    NoPageTarget,

    /// WebSocket transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The browser rejected a protocol command.
    #[error("CDP error: {message} (code: {code})")]
    Protocol {
        /// Protocol error code.
        code: i64,
        /// Protocol error message.
        message: String,
    },

    /// A protocol command got no response in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The DevTools connection closed while a command was outstanding.
    #[error("DevTools connection closed")]
    ConnectionClosed,

    /// A protocol payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error around the Chrome process or its profile directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BrowserError {
    fn from(e: reqwest::Error) -> Self {
        BrowserError::Http(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BrowserError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        BrowserError::WebSocket(e.to_string())
    }
}
