//! Headless Chrome driver for the cookie scan.
//!
//! Built directly on the Chrome DevTools Protocol: [`launch`] starts a
//! throwaway headless Chrome, [`cdp`] speaks the protocol over a WebSocket,
//! and [`scan`] drives one navigation, records outgoing request URLs, and
//! reads the cookie jar afterwards.

mod cdp;
mod error;
mod launch;
mod scan;

pub use cdp::{CdpEvent, PageClient};
pub use error::BrowserError;
pub use launch::{HeadlessChrome, find_chrome};
pub use scan::{ScanOptions, scan_site};
