//! Server-rendered HTML pages.
//!
//! Pages are assembled with `format!`; every interpolated value goes through
//! [`escape`].

pub mod pages;
mod scripts;

use axum::response::Html;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #111418; color: #e8e8e8; }
main { max-width: 960px; margin: 0 auto; padding: 32px 16px; display: flex; flex-direction: column; gap: 24px; }
a { color: #9cc4ff; }
section { border: 1px solid #2a2f36; border-radius: 12px; padding: 20px; background: #171b21; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 12px; }
.grid img { width: 100%; aspect-ratio: 1; object-fit: cover; border-radius: 8px; }
.detail img { max-width: 100%; border-radius: 8px; }
.muted { color: #8a929c; font-size: 0.9em; }
.error { color: #ff8f8f; }
form { display: flex; flex-direction: column; gap: 8px; }
form.inline { flex-direction: row; flex-wrap: wrap; align-items: center; }
input, textarea, button { font: inherit; }
button.danger { color: #ff8f8f; }
"#;

/// HTML-escape text for element content and quoted attribute values.
pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap `body` in the shared document shell.
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        concat!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            "<title>{title}</title><style>{style}</style></head>",
            "<body><main>{body}</main></body></html>"
        ),
        title = escape(title),
        style = STYLE,
        body = body,
    ))
}

/// Human-readable byte count.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes.max(0), UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Page URL for a blob key; each path segment is encoded on its own.
pub fn gallery_url(key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect();
    format!("/gallery/{}", encoded.join("/"))
}
