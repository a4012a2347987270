//! Cookiescan Core Library
//!
//! This library provides the core functionality for the cookiescan tool,
//! which drives a headless Chrome instance at a single URL, records the
//! cookies the site sets, classifies them heuristically, and renders a
//! templated cookie-policy document plus a static banner preview.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`browser`] - Headless Chrome launch and DevTools Protocol driver
//! - [`scan`] - Scan result model and out-of-process scanner client
//! - [`classify`] - Heuristic cookie classification and partitioning
//! - [`policy`] - Cookie policy document renderer
//! - [`banner`] - Static cookie banner preview fragment
//!
//! The browser scan runs in a separate `scan-one` process so the caller
//! never spawns Chrome from inside its own async runtime; the two sides
//! exchange a single JSON document over standard streams.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod banner;
pub mod browser;
pub mod classify;
pub mod policy;
pub mod scan;

// Re-export commonly used types
pub use banner::BANNER_HTML;
pub use browser::{BrowserError, ScanOptions, scan_site};
pub use classify::{Category, ClassifiedCookie, classify, classify_all, partition};
pub use policy::{POLICY_FILENAME, render, render_today};
pub use scan::{Cookie, ScanError, ScanResult, SidecarScanner};
