//! HTTP(S) GET probe
//!
//! The measured time ends when the response headers arrive. The body is
//! then drained so the byte count covers the whole response, and the
//! per-probe timeout bounds both phases together.

use super::{elapsed_ms, with_deadline, Prober};
use crate::{
    error::{AppError, ProbeError, Result},
    models::{HttpDetail, Options, ProbeOutcome},
    types::ProbeMode,
    user_agent,
};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, redirect, Client, Response, Url};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Issues one GET per probe against a fixed URI
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    uri: Url,
    timeout: Option<Duration>,
}

impl HttpProber {
    /// Build the prober and its HTTP client from run options
    pub fn new(uri: Url, options: &Options) -> Result<Self> {
        Ok(Self {
            client: build_client(options.insecure)?,
            uri,
            timeout: options.timeout(),
        })
    }

    async fn exchange(&self, seq: u64, start: Instant) -> std::result::Result<ProbeOutcome, ProbeError> {
        let request = self
            .client
            .get(self.uri.clone())
            .build()
            .map_err(|e| ProbeError::RequestBuild(e.to_string()))?;

        let mut response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ProbeError::Request(describe_error(&e)))?;
        let elapsed = elapsed_ms(start);

        let status = response.status().as_u16();
        let detail = response_detail(&response);
        let mut bytes = header_size(response.headers());

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProbeError::ResponseRead(describe_error(&e)))?
        {
            bytes += chunk.len() as u64;
        }

        Ok(ProbeOutcome::http_response(seq, elapsed, bytes, status, detail))
    }
}

#[async_trait]
impl Prober for HttpProber {
    fn mode(&self) -> ProbeMode {
        ProbeMode::Http
    }

    async fn probe(&self, seq: u64, cancel: &CancellationToken) -> ProbeOutcome {
        let start = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ProbeOutcome::cancelled(seq, elapsed_ms(start)),
            result = with_deadline(self.timeout, self.exchange(seq, start)) => result,
        };

        match result {
            Some(Ok(outcome)) => outcome,
            Some(Err(error)) => ProbeOutcome::failure(seq, elapsed_ms(start), error),
            None => ProbeOutcome::failure(
                seq,
                elapsed_ms(start),
                ProbeError::Timeout(self.timeout.unwrap_or_default()),
            ),
        }
    }
}

/// Client that never follows redirects and identifies itself as tcping
pub fn build_client(insecure: bool) -> Result<Client> {
    Client::builder()
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(insecure)
        .user_agent(user_agent())
        .build()
        .map_err(|e| AppError::http(format!("Failed to create HTTP client: {}", e)))
}

/// Approximate header size: every name and every value plus two bytes each
/// for the separators.
pub fn header_size(headers: &HeaderMap) -> u64 {
    headers
        .keys()
        .map(|name| {
            let values: u64 = headers
                .get_all(name)
                .iter()
                .map(|value| value.len() as u64 + 2)
                .sum();
            name.as_str().len() as u64 + 2 + values
        })
        .sum()
}

fn response_detail(response: &Response) -> HttpDetail {
    let status = response.status();
    let status_line = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    };

    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    HttpDetail { status_line, headers }
}

/// reqwest's top-level message omits the cause, so the source chain is appended
fn describe_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
