//! Integration tests for the classify-and-render pipeline.
//!
//! Feeds scan result documents (as the sidecar would emit them) through
//! classification, partitioning, and rendering, checking the end-to-end
//! behavior a user sees in the generated document.

use chrono::NaiveDate;
use cookiescan::scan::parse_scan_output;
use cookiescan::{Category, classify_all, partition, render};

const SITE: &str = "https://example.com";

fn render_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
}

#[test]
fn test_first_party_session_cookie_end_to_end() {
    let json = r#"{
        "url": "https://example.com",
        "cookies": [{"name": "sessionid", "domain": "example.com"}],
        "requests": ["https://example.com/"]
    }"#;
    let result = parse_scan_output(json).unwrap();
    let classified = classify_all(result.cookies);

    assert_eq!(classified[0].category, Category::Essential);

    let (first, third) = partition(&classified, &result.url);
    assert_eq!(first.len(), 1);
    assert!(third.is_empty());

    let doc = render(&result.url, &classified, render_date());
    assert!(doc.contains("- **sessionid** | Essential | domain: example.com | expires: session"));
}

#[test]
fn test_third_party_analytics_cookie_end_to_end() {
    let json = r#"{
        "url": "https://example.com",
        "cookies": [{"name": "_ga", "domain": ".doubleclick.net"}],
        "requests": []
    }"#;
    let result = parse_scan_output(json).unwrap();
    let classified = classify_all(result.cookies);

    assert_eq!(classified[0].category, Category::Analytics);

    let (first, third) = partition(&classified, &result.url);
    assert!(first.is_empty());
    assert_eq!(third.len(), 1);

    let doc = render(&result.url, &classified, render_date());
    assert!(doc.contains("- **_ga** | Analytics | domain: .doubleclick.net | expires: session"));
    assert!(!doc.contains("provider:"), "no provider suffix when absent");
}

#[test]
fn test_empty_scan_renders_both_none_detected_sentences() {
    let result = parse_scan_output(r#"{"url": "https://example.com"}"#).unwrap();
    let classified = classify_all(result.cookies);
    let doc = render(SITE, &classified, render_date());

    assert!(doc.contains("No first-party cookies detected during the scan."));
    assert!(doc.contains("No third-party cookies detected during the scan."));
    assert!(!doc.contains("- **"));
}

#[test]
fn test_mixed_jar_partition_is_exhaustive_and_rendering_deterministic() {
    let json = r#"{
        "url": "https://example.com",
        "cookies": [
            {"name": "sessionid", "domain": "example.com"},
            {"name": "_ga", "domain": ".doubleclick.net"},
            {"name": "theme", "domain": ".example.com"},
            {"name": "_fbp", "domain": ".facebook.com", "expires": 1772000000.0},
            {"name": "", "domain": ""}
        ],
        "requests": []
    }"#;
    let result = parse_scan_output(json).unwrap();
    let classified = classify_all(result.cookies);
    assert_eq!(classified.len(), 5);

    let (first, third) = partition(&classified, &result.url);
    assert_eq!(first.len() + third.len(), classified.len());

    let a = render(&result.url, &classified, render_date());
    let b = render(&result.url, &classified, render_date());
    assert_eq!(a, b, "same input and date must render byte-identically");

    assert!(a.contains("- **<no-name>** | Unclassified"));
    assert!(a.contains("expires: 1772000000"));
}
