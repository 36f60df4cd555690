//! Extra per-probe lines printed with `-v`

use crate::messages::{fill, Catalog};
use crate::models::HttpDetail;
use std::fmt::Write as _;
use std::net::SocketAddr;

const KEY_HEADERS: [&str; 5] = [
    "Content-Type",
    "Server",
    "Content-Length",
    "Last-Modified",
    "Cache-Control",
];

/// Values longer than this go on their own line
const WRAP_WIDTH: usize = 60;

pub fn insecure_warning() -> &'static str {
    "  Warning: SSL/TLS certificate verification disabled\n"
}

/// Detail line after a failed connect; `dial_host` is bracketed for IPv6
pub fn tcp_failure_details(catalog: &Catalog, elapsed_ms: f64, dial_host: &str, port: u16) -> String {
    fill(
        catalog.tcp_attempt_details,
        &[&format!("{:.2}", elapsed_ms), &dial_host, &port],
    )
}

/// Detail line after a successful connect
pub fn tcp_connection_details(catalog: &Catalog, local_addr: Option<SocketAddr>, ip: &str, port: u16) -> String {
    let local = local_addr
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    fill(catalog.tcp_connection_details, &[&local, &ip, &port])
}

/// `content-type` becomes `Content-Type`
pub fn canonical_header_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            canonical.extend(c.to_uppercase());
        } else {
            canonical.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    canonical
}

/// Status, well-known headers, then every header sorted by name
pub fn http_details(catalog: &Catalog, detail: &HttpDetail) -> String {
    let mut out = String::from(catalog.http_details_title);
    out.push_str(&fill(catalog.http_status, &[&detail.status_line]));

    for name in KEY_HEADERS {
        if let Some(value) = detail.header(name).filter(|value| !value.is_empty()) {
            let _ = writeln!(out, "    {}: {}", name, value);
        }
    }

    out.push_str(catalog.http_headers_title);

    let mut headers: Vec<(String, &str)> = detail
        .headers
        .iter()
        .map(|(name, value)| (canonical_header_name(name), value.as_str()))
        .collect();
    // stable: repeated headers keep arrival order
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in headers {
        if value.len() > WRAP_WIDTH {
            let _ = writeln!(out, "    {}:\n      {}", name, value);
        } else {
            let _ = writeln!(out, "    {}: {}", name, value);
        }
    }

    out
}
