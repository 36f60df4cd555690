//! Text of every line the probe run prints

use super::{
    colored::{paint, Tone},
    verbose,
};
use crate::{
    dns::ResolvedAddress,
    error::ProbeError,
    messages::{fill, Catalog, Locale},
    models::{ProbeOutcome, Statistics},
    types::ProbeMode,
    GIT_COMMIT, VERSION,
};

/// How the probed target appears in output lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetLabel {
    Tcp {
        /// Address without brackets, as shown in response lines
        ip: String,
        /// Address as dialed, bracketed for IPv6
        dial_host: String,
        port: u16,
    },
    Http {
        uri: String,
    },
}

impl TargetLabel {
    pub fn tcp(address: &ResolvedAddress, port: u16) -> Self {
        TargetLabel::Tcp {
            ip: address.ip.to_string(),
            dial_host: address.to_string(),
            port,
        }
    }

    pub fn http(uri: impl Into<String>) -> Self {
        TargetLabel::Http { uri: uri.into() }
    }

    pub fn mode(&self) -> ProbeMode {
        match self {
            TargetLabel::Tcp { .. } => ProbeMode::Tcp,
            TargetLabel::Http { .. } => ProbeMode::Http,
        }
    }
}

/// Renders probe output for one target
#[derive(Debug, Clone)]
pub struct ProbeFormatter {
    target: TargetLabel,
    catalog: &'static Catalog,
    use_color: bool,
    verbose: bool,
    insecure: bool,
}

impl ProbeFormatter {
    /// English output; see [`ProbeFormatter::with_locale`]
    pub fn new(target: TargetLabel, use_color: bool, verbose: bool) -> Self {
        Self {
            target,
            catalog: Locale::default().catalog(),
            use_color,
            verbose,
            insecure: false,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.catalog = locale.catalog();
        self
    }

    /// Mention disabled certificate checks in verbose HTTP output
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Start line of a TCP run
    pub fn tcp_banner(locale: Locale, host: &str, address: &ResolvedAddress, port: u16) -> String {
        fill(
            locale.catalog().tcp_banner,
            &[&host, &address.family(), &address.ip, &port],
        )
    }

    /// Start line of an HTTP run
    pub fn http_banner(locale: Locale, uri: &str) -> String {
        fill(locale.catalog().http_banner, &[&uri, &VERSION, &GIT_COMMIT])
    }

    /// Printed once when the operator interrupts the run
    pub fn interrupted(locale: Locale) -> &'static str {
        locale.catalog().interrupted
    }

    /// Result line of one recorded probe, plus verbose details
    pub fn format_outcome(&self, outcome: &ProbeOutcome) -> String {
        match &self.target {
            TargetLabel::Tcp { ip, dial_host, port } => self.format_tcp(outcome, ip, dial_host, *port),
            TargetLabel::Http { uri } => self.format_http(outcome, uri),
        }
    }

    fn format_tcp(&self, outcome: &ProbeOutcome, ip: &str, dial_host: &str, port: u16) -> String {
        if outcome.is_success() {
            let line = fill(
                self.catalog.tcp_response,
                &[&ip, &port, &outcome.seq, &two_places(outcome.elapsed_ms)],
            );
            let mut out = paint(&line, Tone::Success, self.use_color);
            if self.verbose {
                out.push_str(&verbose::tcp_connection_details(self.catalog, outcome.local_addr, ip, port));
            }
            return out;
        }

        let line = fill(
            self.catalog.tcp_failed,
            &[&ip, &port, &outcome.seq, &error_text(outcome.error.as_ref())],
        );
        let mut out = paint(&line, Tone::Error, self.use_color);
        if self.verbose {
            out.push_str(&verbose::tcp_failure_details(self.catalog, outcome.elapsed_ms, dial_host, port));
        }
        out
    }

    fn format_http(&self, outcome: &ProbeOutcome, uri: &str) -> String {
        let mut out = String::new();
        if self.verbose && self.insecure {
            out.push_str(verbose::insecure_warning());
        }

        let Some(status_code) = outcome.status_code else {
            let template = match outcome.error {
                Some(ProbeError::RequestBuild(_)) => self.catalog.http_request_build_failed,
                Some(ProbeError::ResponseRead(_)) => self.catalog.http_read_failed,
                _ => self.catalog.http_request_failed,
            };
            let line = fill(
                template,
                &[&uri, &outcome.seq, &error_text(outcome.error.as_ref())],
            );
            out.push_str(&paint(&line, Tone::Error, self.use_color));
            return out;
        };

        let line = fill(
            self.catalog.http_response,
            &[
                &status_code,
                &uri,
                &outcome.seq,
                &two_places(outcome.elapsed_ms),
                &outcome.bytes,
                &two_places(outcome.bandwidth_mbps()),
            ],
        );
        let tone = if outcome.is_success() { Tone::Success } else { Tone::Error };
        out.push_str(&paint(&line, tone, self.use_color));

        if self.verbose {
            if let Some(ref detail) = outcome.http {
                out.push_str(&verbose::http_details(self.catalog, detail));
            }
        }
        out
    }

    /// Notice for a probe aborted by cancellation
    pub fn format_cancelled(&self) -> String {
        let text = match self.target {
            TargetLabel::Tcp { .. } => self.catalog.tcp_aborted,
            TargetLabel::Http { .. } => self.catalog.http_aborted,
        };
        paint(text, Tone::Info, self.use_color)
    }
}

fn error_text(error: Option<&ProbeError>) -> String {
    error.map(|e| e.to_string()).unwrap_or_else(|| "unknown error".to_string())
}

fn two_places(value: f64) -> String {
    format!("{:.2}", value)
}

/// Final statistics block for a run of `mode`
pub fn format_statistics(locale: Locale, mode: ProbeMode, stats: &Statistics) -> String {
    let catalog = locale.catalog();
    let mut out = String::from(match mode {
        ProbeMode::Tcp => catalog.tcp_statistics_title,
        ProbeMode::Http => catalog.http_statistics_title,
    });

    if stats.sent == 0 {
        return out;
    }

    out.push_str(&fill(
        catalog.statistics_summary,
        &[
            &stats.sent,
            &stats.responded,
            &stats.lost(),
            &format!("{:.1}", stats.loss_rate()),
        ],
    ));

    if stats.responded > 0 {
        out.push_str(&fill(
            catalog.statistics_rtt,
            &[
                &two_places(stats.min_ms),
                &two_places(stats.max_ms),
                &two_places(stats.avg_ms),
            ],
        ));

        if mode == ProbeMode::Http {
            out.push_str(&fill(
                catalog.statistics_total_data,
                &[&stats.total_bytes, &two_places(stats.total_megabytes())],
            ));
            out.push_str(&fill(
                catalog.statistics_bandwidth,
                &[
                    &two_places(stats.min_bandwidth_mbps),
                    &two_places(stats.max_bandwidth_mbps),
                    &two_places(stats.avg_bandwidth_mbps),
                ],
            ));
        }
    }

    out
}
