//! Static cookie banner preview.
//!
//! The banner is a fixed HTML fragment with Accept / Reject / Manage
//! controls. Its content does not vary with scan results; it exists so the
//! generated policy can be previewed next to the consent UI a site would
//! ship alongside it.

/// The banner preview fragment, ready to embed or write to a file.
pub const BANNER_HTML: &str = r##"<div style="max-width:700px;padding:16px;border-radius:8px;border:1px solid #e2e8f0;background:#fafafa;color:#0f172a;">
    <strong style="font-size:1.05em;">Cookies</strong>
    <p style="margin:8px 0;">We'd like to set cookies to provide you our web-services properly and to improve our website by collecting information on how you use it.</p>
    <p style="margin:8px 0;">For more information on how these cookies work please see our <a href="#" target="_blank">Cookie Policy</a>.</p>
    <p style="margin:8px 0;">You can manage your consent preferences by clicking the "Manage cookies" button.</p>
    <p style="margin:8px 0;">If you decline cookies, only strictly necessary cookies will be set into your browser. Please note that in this case we cannot guarantee that you will be able to use all website features in the fast and convenient way.</p>
    <div style="margin-top:8px;">
        <button id="accept-cookie" style="margin-right:8px;padding:8px 14px;border-radius:6px;background:#10b981;color:white;border:none;">Accept</button>
        <button id="reject-cookie" style="margin-right:8px;padding:8px 14px;border-radius:6px;background:#f3f4f6;border:none;color:#111827;">Reject</button>
        <button id="manage-cookie" style="padding:8px 14px;border-radius:6px;background:#3b82f6;color:white;border:none;">Manage cookies</button>
    </div>
</div>
"##;
