//! Cookie policy document renderer.
//!
//! Serializes a classified cookie set into a fixed-structure Markdown
//! document: a date stamp, static boilerplate sections, then the
//! first-party and third-party cookie lists. The only dynamic parts are the
//! `[Last Updated: ...]` stamp and the two lists, so the output is
//! byte-identical for identical input and the same render date.

use chrono::{Local, NaiveDate};

use crate::classify::{ClassifiedCookie, partition};

/// Default filename for the rendered document.
pub const POLICY_FILENAME: &str = "cookie_policy.md";

/// Date stamp format used in the document header.
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Renders the policy document for `site`, stamped with today's local date.
#[must_use]
pub fn render_today(site: &str, cookies: &[ClassifiedCookie]) -> String {
    render(site, cookies, Local::now().date_naive())
}

/// Renders the policy document for `site` with an explicit render date.
///
/// Deterministic, pure, and total: malformed cookies (no name, no expiry,
/// no domain) render with defaults rather than failing.
#[must_use]
pub fn render(site: &str, cookies: &[ClassifiedCookie], date: NaiveDate) -> String {
    let (first_party, third_party) = partition(cookies, site);

    let mut lines: Vec<String> = Vec::new();
    let mut push = |line: &str| lines.push(line.to_string());

    push(&format!("[Last Updated: {}]", date.format(DATE_FORMAT)));
    push("# Cookie Policy");
    push("");
    push(
        "This Cookie Policy (the \"Policy\") explains how we use cookies and other similar \
         technologies to recognize you when you visit our website at [WEBSITE ADDRESS] (the \
         \"Website\"). It explains what these technologies are, why we use them, and your \
         rights to control their use.",
    );
    push("");
    push(
        "Please take the time to read this Policy carefully. If you have any questions or \
         comments, please contact us at [CONTACT EMAIL].",
    );
    push("");
    push("## What are cookies");
    push(
        "Cookies are small data files that are placed on your computer or mobile device when \
         you visit a website. Cookies are widely used by website owners to make their websites \
         work, or to work more efficiently, as well as to provide reporting information.",
    );
    push("");
    push("## What cookies we use");
    push(
        "We use first-party and third-party cookies for several reasons. They are categorized \
         as follows:",
    );
    push("");
    push("### Technical and Functional (Strictly Necessary) Cookies");
    push(
        "These cookies are necessary for the Website to function properly when you visit it \
         and cannot be disabled on our systems.",
    );
    push("");
    push("### Analytical Cookies");
    push(
        "These cookies allow us to understand how you use our Website (e.g., count visits and \
         traffic sources) so we can measure and improve the performance of our site and make \
         our Website more user-friendly in the future.",
    );
    push("");
    push("### Marketing Cookies");
    push(
        "These cookies may be set through our site by our advertising partners. They may be \
         used by those companies to build a profile of your interests and show you relevant \
         adverts on other sites.",
    );
    push("");
    push("## Detailed list of cookies we use");
    push("");
    push("### First-Party Cookies");
    push("");
    if first_party.is_empty() {
        push("No first-party cookies detected during the scan.");
    } else {
        for cookie in &first_party {
            push(&cookie_row(cookie, site));
        }
    }

    push("");
    push("### Third-Party Cookies");
    push("");
    if third_party.is_empty() {
        push("No third-party cookies detected during the scan.");
    } else {
        for cookie in &third_party {
            let mut row = cookie_row(cookie, site);
            if let Some(provider) = cookie.cookie.provider.as_deref()
                && !provider.is_empty()
            {
                row.push_str(&format!(" | provider: {provider}"));
            }
            push(&row);
        }
    }

    push("");
    push("## How to manage cookie settings");
    push(
        "You can accept or refuse certain types of cookies when you first visit our Website \
         via the cookie banner, or at any time in our cookie preference center / privacy \
         settings panel.",
    );
    push("");
    push(
        "You can also manage cookies through your browser settings. Most browsers allow you \
         to: see what cookies you've got and delete them individually, block third-party \
         cookies, or block cookies from particular sites.",
    );
    push("");
    push("## Policy Updates");
    push(
        "We may update this Cookie Policy from time to time to reflect changes to the cookies \
         we use or for other operational, legal, or regulatory reasons. Please re-visit this \
         Policy regularly to stay informed about our use of cookies.",
    );

    lines.join("\n")
}

/// Formats one cookie list row: `- **name** | Category | domain: d | expires: e`.
///
/// Missing fields fall back rather than fail: an empty name renders as
/// `<no-name>`, an empty domain as the site string, and an absent expiry as
/// `session`.
fn cookie_row(classified: &ClassifiedCookie, site: &str) -> String {
    let cookie = &classified.cookie;
    let name = if cookie.name.is_empty() {
        "<no-name>"
    } else {
        &cookie.name
    };
    let domain = if cookie.domain.is_empty() {
        site
    } else {
        &cookie.domain
    };
    let expires = cookie
        .expires
        .map_or_else(|| "session".to_string(), format_expiry);
    format!(
        "- **{name}** | {category} | domain: {domain} | expires: {expires}",
        category = classified.category
    )
}

/// Formats an epoch-seconds expiry, dropping a trailing `.0` for whole
/// second values so rows stay stable across serialization round trips.
#[allow(clippy::cast_possible_truncation)]
fn format_expiry(epoch_seconds: f64) -> String {
    if epoch_seconds.fract() == 0.0 {
        format!("{}", epoch_seconds as i64)
    } else {
        format!("{epoch_seconds}")
    }
}
