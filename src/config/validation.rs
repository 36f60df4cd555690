//! Configuration validation utilities and rules

use crate::{
    error::{AppError, Result},
    models::Options,
    types::ProbeMode,
};
use url::Url;

const TCP_USAGE: &str = "Usage: tcping [options] <host> [port]\nTry 'tcping -h' for more information";
const HTTP_USAGE: &str = "Usage: tcping -H [options] <URI>\nTry 'tcping -h' for more information";

/// Validated positional target of a run
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec {
    /// Host as entered plus the effective port
    Tcp { host: String, port: u16 },
    /// Absolute `http` or `https` URI
    Http { uri: Url },
}

impl TargetSpec {
    pub fn mode(&self) -> ProbeMode {
        match self {
            TargetSpec::Tcp { .. } => ProbeMode::Tcp,
            TargetSpec::Http { .. } => ProbeMode::Http,
        }
    }
}

/// Parse and range-check a port string, `1..=65535`
pub fn validate_port(port: &str) -> Result<u16> {
    let value: i64 = port
        .parse()
        .map_err(|_| AppError::validation("Invalid port number format"))?;
    if !(1..=65535).contains(&value) {
        return Err(AppError::validation("Port number must be between 1 and 65535"));
    }
    Ok(value as u16)
}

/// Reject negative millisecond values, naming the offending setting
pub fn non_negative_ms(name: &str, value: i64) -> Result<u64> {
    if value < 0 {
        return Err(AppError::validation(format!("{} cannot be negative", name)));
    }
    Ok(value as u64)
}

/// Validate an HTTP mode URI: it must parse and use `http` or `https`
pub fn validate_uri(uri: &str) -> Result<Url> {
    let parsed = Url::parse(uri)?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(AppError::validation("URI must start with http:// or https://")),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::validation("Invalid URI format: missing host"));
    }
    Ok(parsed)
}

/// Select the run target from positional arguments.
///
/// TCP mode takes `<host> [port]` where a positional port beats `-p`
/// (`port_flag`), which beats `TCPING_PORT` and then the default of 80.
/// `-p` is only checked when it decides the port. HTTP mode takes `<URI>`.
pub fn validate_target(options: &Options, port_flag: Option<&str>, args: &[String]) -> Result<TargetSpec> {
    match options.mode {
        ProbeMode::Http => {
            let uri = args.first().ok_or_else(|| {
                AppError::validation(format!("HTTP mode requires URI parameter\n\n{}", HTTP_USAGE))
            })?;
            Ok(TargetSpec::Http { uri: validate_uri(uri)? })
        }
        ProbeMode::Tcp => {
            let host = args
                .first()
                .filter(|host| !host.is_empty())
                .ok_or_else(|| {
                    AppError::validation(format!("Host parameter is required\n\n{}", TCP_USAGE))
                })?;

            let port = match (args.get(1), port_flag) {
                (Some(port), _) => validate_port(port)?,
                (None, Some(flag)) => validate_port(flag)?,
                (None, None) => options.effective_port(),
            };

            Ok(TargetSpec::Tcp { host: host.clone(), port })
        }
    }
}

/// Non-fatal observations about a configuration
pub struct ConfigValidator;

impl ConfigValidator {
    /// Settings that are accepted but have no effect, or change behavior
    /// in ways worth pointing out in verbose mode
    pub fn warnings(options: &Options, target: &TargetSpec, port_flag: Option<&str>) -> Vec<String> {
        let mut warnings = Vec::new();

        match target {
            TargetSpec::Tcp { port, .. } => {
                if options.insecure {
                    warnings.push("-k/--insecure only applies to HTTP mode and is ignored".to_string());
                }
                if let Some(flag) = port_flag {
                    if flag.parse::<u16>().ok() != Some(*port) {
                        warnings.push(format!(
                            "-p/--port {} is ignored, the positional port {} takes precedence",
                            flag, port
                        ));
                    }
                }
            }
            TargetSpec::Http { uri } => {
                if port_flag.is_some() {
                    warnings.push("-p/--port is ignored in HTTP mode, put the port in the URI".to_string());
                }
                if options.use_ipv4 || options.use_ipv6 {
                    warnings.push("-4/-6 are ignored in HTTP mode".to_string());
                }
                if options.insecure && uri.scheme() == "http" {
                    warnings.push("-k/--insecure has no effect on plain http:// URIs".to_string());
                }
            }
        }

        if options.timeout_ms == 0 {
            warnings.push("Timeout is 0, probes wait until they finish or the run is interrupted".to_string());
        }

        warnings
    }
}

/// Validate the whole configuration and pick the target
pub fn validate_config(options: &Options, port_flag: Option<&str>, args: &[String]) -> Result<TargetSpec> {
    options.validate()?;
    validate_target(options, port_flag, args)
}
