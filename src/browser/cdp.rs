//! Minimal Chrome DevTools Protocol client for a single page.
//!
//! The client discovers the initial page target through the DevTools HTTP
//! endpoint and connects straight to that target's WebSocket debugger URL,
//! so commands need no session multiplexing. A background task routes
//! incoming frames: responses are matched to callers by id, protocol events
//! are forwarded to an owned mpsc channel that the scan loop drains.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::BrowserError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// How long to wait for a command response before giving up.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Outgoing protocol command.
#[derive(Debug, Serialize)]
struct CdpRequest<'a> {
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// Incoming protocol frame: either a command response (has `id`) or an
/// event (has `method`).
#[derive(Debug, Deserialize)]
struct CdpMessage {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<CdpErrorBody>,
    method: Option<String>,
    params: Option<Value>,
}

/// Error body inside a command response.
#[derive(Debug, Deserialize)]
struct CdpErrorBody {
    code: i64,
    message: String,
}

/// A protocol event delivered to the scan loop.
#[derive(Debug, Clone)]
pub struct CdpEvent {
    /// Event method, e.g. `Network.requestWillBeSent`.
    pub method: String,
    /// Event parameters.
    pub params: Value,
}

/// Page target entry from `GET /json/list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageTarget {
    #[serde(rename = "type")]
    target_type: String,
    url: String,
    web_socket_debugger_url: Option<String>,
}

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, BrowserError>>>>>;

/// DevTools client attached to one page target.
pub struct PageClient {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    request_id: AtomicU64,
    pending: PendingMap,
    events: Option<mpsc::UnboundedReceiver<CdpEvent>>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl PageClient {
    /// Connects to the first page target exposed by `endpoint`.
    ///
    /// Headless Chrome always opens one initial page (`about:blank` here),
    /// so target creation is not needed for a one-shot scan.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NoPageTarget`] when the browser lists no
    /// attachable page, or a transport error from discovery/connect.
    pub async fn connect(endpoint: &str) -> Result<Self, BrowserError> {
        let list_url = format!("{}/json/list", endpoint.trim_end_matches('/'));
        debug!(%list_url, "discovering page targets");

        let targets: Vec<PageTarget> = reqwest::get(&list_url).await?.json().await?;
        let ws_url = targets
            .into_iter()
            .find(|t| t.target_type == "page" && t.web_socket_debugger_url.is_some())
            .and_then(|t| {
                debug!(page_url = %t.url, "attaching to page target");
                t.web_socket_debugger_url
            })
            .ok_or(BrowserError::NoPageTarget)?;

        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
        let (ws_sink, ws_source) = ws_stream.split();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let recv_task = {
            let pending = Arc::clone(&pending);
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending, event_tx).await;
            })
        };

        debug!(%ws_url, "CDP client connected");
        Ok(Self {
            ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
            request_id: AtomicU64::new(1),
            pending,
            events: Some(event_rx),
            recv_task,
        })
    }

    /// Takes ownership of the event stream.
    ///
    /// The receiver is handed out once; the scan call owns it exclusively
    /// for the duration of the navigation window.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<CdpEvent>> {
        self.events.take()
    }

    /// Sends a protocol command and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Protocol`] when the browser rejects the
    /// command, [`BrowserError::Timeout`] when no response arrives, and
    /// [`BrowserError::ConnectionClosed`] when the socket dies first.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, BrowserError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest { id, method, params };
        let json = serde_json::to_string(&request)?;
        trace!(%json, "CDP send");

        let (tx, rx) = oneshot::channel();
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id, tx);
        }

        {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await?;
        }

        match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(BrowserError::ConnectionClosed),
            Err(_) => {
                if let Ok(mut pending) = self.pending.lock() {
                    pending.remove(&id);
                }
                Err(BrowserError::Timeout(format!("no response to {method}")))
            }
        }
    }

    /// Routes incoming frames to pending callers and the event channel.
    async fn receive_loop(
        mut ws_source: WsSource,
        pending: PendingMap,
        event_tx: mpsc::UnboundedSender<CdpEvent>,
    ) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!(frame = %text, "CDP recv");
                    match serde_json::from_str::<CdpMessage>(&text) {
                        Ok(message) => Self::dispatch(message, &pending, &event_tx),
                        Err(e) => warn!(error = %e, "unparseable CDP frame"),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("DevTools WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "DevTools WebSocket error");
                    break;
                }
                _ => {}
            }
        }
        // Wake up any caller still waiting on a response.
        if let Ok(mut pending) = pending.lock() {
            for (_, tx) in pending.drain() {
                let _ = tx.send(Err(BrowserError::ConnectionClosed));
            }
        }
    }

    fn dispatch(
        message: CdpMessage,
        pending: &PendingMap,
        event_tx: &mpsc::UnboundedSender<CdpEvent>,
    ) {
        if let Some(id) = message.id {
            let waiter = pending.lock().ok().and_then(|mut p| p.remove(&id));
            if let Some(tx) = waiter {
                let result = match message.error {
                    Some(error) => Err(BrowserError::Protocol {
                        code: error.code,
                        message: error.message,
                    }),
                    None => Ok(message.result.unwrap_or(Value::Null)),
                };
                let _ = tx.send(result);
            }
        } else if let Some(method) = message.method {
            let event = CdpEvent {
                method,
                params: message.params.unwrap_or(Value::Null),
            };
            // A closed receiver just means the scan stopped listening.
            let _ = event_tx.send(event);
        }
    }
}

impl Drop for PageClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
