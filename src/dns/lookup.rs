//! Name lookup backends

use async_trait::async_trait;
use std::net::IpAddr;
use trust_dns_resolver::{
    config::{LookupIpStrategy, ResolverConfig, ResolverOpts},
    system_conf,
    TokioAsyncResolver,
};

/// Host name to address lookup, the last step of address resolution
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// All addresses for `host` in resolver order. The error carries the
    /// resolver's own description of the failure.
    async fn lookup_ip(&self, host: &str) -> std::result::Result<Vec<IpAddr>, String>;
}

/// System resolver configuration, including the hosts file
pub struct SystemLookup {
    resolver: TokioAsyncResolver,
}

impl SystemLookup {
    /// Build a resolver from the system configuration. Library defaults are
    /// used when it cannot be read or lists no name servers.
    pub fn new() -> Self {
        let (config, mut opts) = match system_conf::read_system_conf() {
            Ok((config, opts)) if !config.name_servers().is_empty() => (config, opts),
            _ => (ResolverConfig::default(), ResolverOpts::default()),
        };

        // -6 needs AAAA answers even when A records exist
        opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl Default for SystemLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameLookup for SystemLookup {
    async fn lookup_ip(&self, host: &str) -> std::result::Result<Vec<IpAddr>, String> {
        let response = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| e.to_string())?;
        Ok(response.iter().collect())
    }
}
