//! Target address resolution
//!
//! Turns the host argument plus the address family flags into exactly one
//! address. Three paths are tried in order:
//!
//! 1. 32-bit numeric shorthand (`3232235777`, `0xC0A80101`, `c0a80101`)
//! 2. IP literals (`192.168.1.1`, `2001:db8::1`)
//! 3. DNS lookup through a [`NameLookup`] backend

pub mod lookup;

pub use lookup::{NameLookup, SystemLookup};

use crate::{
    error::ResolveError,
    logging::Logger,
    models::Options,
    types::AddressFamily,
};
use serde::Serialize;
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

/// How an address was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionPath {
    Numeric,
    Literal,
    Dns,
}

impl ResolutionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPath::Numeric => "numeric",
            ResolutionPath::Literal => "literal",
            ResolutionPath::Dns => "dns",
        }
    }
}

/// The single address a TCP run connects to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub ip: IpAddr,
    pub path: ResolutionPath,
}

impl ResolvedAddress {
    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.ip)
    }

    /// Socket address for a connect to `port`
    pub fn socket_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.ip, port)
    }
}

/// Dial form of the address: IPv4 as-is, IPv6 wrapped in brackets
impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            IpAddr::V4(ip) => write!(f, "{}", ip),
            IpAddr::V6(ip) => write!(f, "[{}]", ip),
        }
    }
}

/// Effective family restriction for a host.
///
/// IPv4 applies when forced with `-4`, or when `-6` is absent and the host
/// is itself an IPv4 literal or numeric shorthand. IPv6 applies when forced
/// with `-6`, or when the host contains at least two colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FamilyPreference {
    pub use_ipv4: bool,
    pub use_ipv6: bool,
}

impl FamilyPreference {
    pub fn for_host(host: &str, options: &Options) -> Self {
        Self {
            use_ipv4: options.use_ipv4 || (!options.use_ipv6 && looks_like_ipv4(host)),
            use_ipv6: options.use_ipv6 || looks_like_ipv6(host),
        }
    }
}

/// Interpret `input` as a 32-bit number, decimal first, then hexadecimal
/// with an optional `0x` prefix. The value is split big-endian into a
/// dotted quad, so `3232235777` and `0xC0A80101` are both `192.168.1.1`.
pub fn parse_numeric_ipv4(input: &str) -> Option<Ipv4Addr> {
    parse_decimal_u32(input)
        .or_else(|| parse_hex_u32(input))
        .map(Ipv4Addr::from)
}

fn parse_decimal_u32(input: &str) -> Option<u32> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

fn parse_hex_u32(input: &str) -> Option<u32> {
    let lowered = input.to_ascii_lowercase();
    let digits = lowered.strip_prefix("0x").unwrap_or(&lowered);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Parse an IP literal. IPv4-mapped IPv6 literals count as IPv4.
pub fn parse_ip_literal(input: &str) -> Option<IpAddr> {
    input.parse::<IpAddr>().ok().map(normalize)
}

fn normalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}

/// Numeric shorthand, or an IP literal without colons
pub fn looks_like_ipv4(host: &str) -> bool {
    parse_numeric_ipv4(host).is_some() || (parse_ip_literal(host).is_some() && !host.contains(':'))
}

/// Two or more colons
pub fn looks_like_ipv6(host: &str) -> bool {
    host.matches(':').count() >= 2
}

/// Resolves a host argument to a single address
pub struct AddressResolver {
    lookup: Box<dyn NameLookup>,
    logger: Logger,
}

impl AddressResolver {
    pub fn new(lookup: Box<dyn NameLookup>, logger: Logger) -> Self {
        Self { lookup, logger }
    }

    /// Resolver backed by the system DNS configuration
    pub fn system(logger: Logger) -> Self {
        Self::new(Box::new(SystemLookup::new()), logger)
    }

    /// Resolve `host` honoring the family restriction.
    ///
    /// Without a restriction the first DNS answer wins.
    pub async fn resolve(&self, host: &str, preference: FamilyPreference) -> std::result::Result<ResolvedAddress, ResolveError> {
        let FamilyPreference { use_ipv4, use_ipv6 } = preference;

        if use_ipv6 {
            if parse_decimal_u32(host).is_some() {
                return Err(ResolveError::UnsupportedNumericFormat {
                    input: host.to_string(),
                    format: "decimal",
                });
            }
            let lowered = host.to_ascii_lowercase();
            if let Some(digits) = lowered.strip_prefix("0x") {
                if parse_hex_u32(digits).is_some() {
                    return Err(ResolveError::UnsupportedNumericFormat {
                        input: host.to_string(),
                        format: "hexadecimal",
                    });
                }
            }
        }

        if use_ipv4 || !use_ipv6 {
            if let Some(ip) = parse_numeric_ipv4(host) {
                return Ok(self.resolved(host, IpAddr::V4(ip), ResolutionPath::Numeric));
            }
        }

        if let Some(ip) = parse_ip_literal(host) {
            let family = AddressFamily::of(&ip);
            if use_ipv4 && family != AddressFamily::V4 {
                return Err(ResolveError::AddressFamilyMismatch {
                    address: host.to_string(),
                    expected: AddressFamily::V4.name(),
                });
            }
            if use_ipv6 && family != AddressFamily::V6 {
                return Err(ResolveError::AddressFamilyMismatch {
                    address: host.to_string(),
                    expected: AddressFamily::V6.name(),
                });
            }
            return Ok(self.resolved(host, ip, ResolutionPath::Literal));
        }

        self.resolve_dns(host, preference).await
    }

    async fn resolve_dns(&self, host: &str, preference: FamilyPreference) -> std::result::Result<ResolvedAddress, ResolveError> {
        let addresses = self.lookup.lookup_ip(host).await.map_err(|cause| {
            self.logger
                .debug("DNS lookup failed")
                .field("host", host)
                .field("cause", &cause)
                .log();
            ResolveError::ResolutionFailure {
                host: host.to_string(),
                cause,
            }
        })?;

        let addresses: Vec<IpAddr> = addresses.into_iter().map(normalize).collect();
        self.logger
            .debug("DNS lookup answered")
            .field("host", host)
            .field("addresses", addresses.iter().map(ToString::to_string).collect::<Vec<_>>())
            .log();

        if addresses.is_empty() {
            return Err(ResolveError::NoAddressFound { host: host.to_string() });
        }

        let wanted = if preference.use_ipv4 {
            Some(AddressFamily::V4)
        } else if preference.use_ipv6 {
            Some(AddressFamily::V6)
        } else {
            None
        };

        let chosen = match wanted {
            Some(family) => addresses
                .iter()
                .copied()
                .find(|ip| AddressFamily::of(ip) == family)
                .ok_or_else(|| ResolveError::NoAddressOfFamily {
                    host: host.to_string(),
                    family: family.name(),
                })?,
            None => addresses[0],
        };

        Ok(self.resolved(host, chosen, ResolutionPath::Dns))
    }

    fn resolved(&self, host: &str, ip: IpAddr, path: ResolutionPath) -> ResolvedAddress {
        self.logger
            .debug("Resolved target address")
            .field("host", host)
            .field("address", ip.to_string())
            .field("path", path.as_str())
            .log();
        ResolvedAddress { ip, path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Canned answers; unknown names fail like NXDOMAIN
    struct StaticLookup {
        answers: HashMap<String, Vec<IpAddr>>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticLookup {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            let answers = entries
                .iter()
                .map(|(host, ips)| {
                    (host.to_string(), ips.iter().map(|ip| ip.parse().unwrap()).collect())
                })
                .collect();
            Self {
                answers,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl NameLookup for StaticLookup {
        async fn lookup_ip(&self, host: &str) -> std::result::Result<Vec<IpAddr>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers
                .get(host)
                .cloned()
                .ok_or_else(|| format!("no record found for {}", host))
        }
    }

    fn resolver(entries: &[(&str, &[&str])]) -> (AddressResolver, Arc<AtomicUsize>) {
        let lookup = StaticLookup::new(entries);
        let calls = lookup.calls.clone();
        (AddressResolver::new(Box::new(lookup), Logger::quiet("dns")), calls)
    }

    const ANY: FamilyPreference = FamilyPreference { use_ipv4: false, use_ipv6: false };
    const V4: FamilyPreference = FamilyPreference { use_ipv4: true, use_ipv6: false };
    const V6: FamilyPreference = FamilyPreference { use_ipv4: false, use_ipv6: true };

    #[test]
    fn test_parse_numeric_ipv4() {
        let expected = Ipv4Addr::new(192, 168, 1, 1);
        assert_eq!(parse_numeric_ipv4("3232235777"), Some(expected));
        assert_eq!(parse_numeric_ipv4("0xC0A80101"), Some(expected));
        assert_eq!(parse_numeric_ipv4("0xc0a80101"), Some(expected));
        assert_eq!(parse_numeric_ipv4("c0a80101"), Some(expected));
        assert_eq!(parse_numeric_ipv4("0"), Some(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(parse_numeric_ipv4("4294967295"), Some(Ipv4Addr::new(255, 255, 255, 255)));
    }

    #[test]
    fn test_parse_numeric_ipv4_rejects() {
        assert_eq!(parse_numeric_ipv4("4294967296"), None);
        assert_eq!(parse_numeric_ipv4("0x100000000"), None);
        assert_eq!(parse_numeric_ipv4("0x"), None);
        assert_eq!(parse_numeric_ipv4(""), None);
        assert_eq!(parse_numeric_ipv4("+123"), None);
        assert_eq!(parse_numeric_ipv4("-1"), None);
        assert_eq!(parse_numeric_ipv4("example.com"), None);
        assert_eq!(parse_numeric_ipv4("192.168.1.1"), None);
    }

    #[test]
    fn test_family_hints() {
        assert!(looks_like_ipv4("8.8.8.8"));
        assert!(looks_like_ipv4("3232235777"));
        assert!(!looks_like_ipv4("::1"));
        assert!(!looks_like_ipv4("example.com"));

        assert!(looks_like_ipv6("::1"));
        assert!(looks_like_ipv6("2001:db8::1"));
        assert!(!looks_like_ipv6("example.com"));
    }

    #[test]
    fn test_family_preference_for_host() {
        let options = Options::default();
        assert_eq!(FamilyPreference::for_host("8.8.8.8", &options), V4);
        assert_eq!(FamilyPreference::for_host("::1", &options), V6);
        assert_eq!(FamilyPreference::for_host("example.com", &options), ANY);

        let forced_v6 = Options { use_ipv6: true, ..Default::default() };
        assert_eq!(FamilyPreference::for_host("8.8.8.8", &forced_v6), V6);

        let forced_v4 = Options { use_ipv4: true, ..Default::default() };
        let preference = FamilyPreference::for_host("::1", &forced_v4);
        assert!(preference.use_ipv4 && preference.use_ipv6);
    }

    #[tokio::test]
    async fn test_numeric_shorthand_skips_dns() {
        let (resolver, calls) = resolver(&[]);
        let resolved = resolver.resolve("3232235777", ANY).await.unwrap();
        assert_eq!(resolved.to_string(), "192.168.1.1");
        assert_eq!(resolved.path, ResolutionPath::Numeric);

        let resolved = resolver.resolve("0xC0A80101", V4).await.unwrap();
        assert_eq!(resolved.ip, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ipv6_mode_rejects_numeric_shorthand() {
        let (resolver, _) = resolver(&[]);

        let error = resolver.resolve("3232235777", V6).await.unwrap_err();
        assert!(matches!(error, ResolveError::UnsupportedNumericFormat { format: "decimal", .. }));

        let error = resolver.resolve("0xC0A80101", V6).await.unwrap_err();
        assert!(matches!(error, ResolveError::UnsupportedNumericFormat { format: "hexadecimal", .. }));
    }

    #[tokio::test]
    async fn test_ip_literals() {
        let (resolver, calls) = resolver(&[]);

        let resolved = resolver.resolve("10.0.0.1", V4).await.unwrap();
        assert_eq!(resolved.to_string(), "10.0.0.1");
        assert_eq!(resolved.path, ResolutionPath::Literal);

        let resolved = resolver.resolve("::1", V6).await.unwrap();
        assert_eq!(resolved.to_string(), "[::1]");
        assert_eq!(resolved.family(), AddressFamily::V6);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_literal_family_mismatch() {
        let (resolver, _) = resolver(&[]);

        let error = resolver.resolve("::1", FamilyPreference { use_ipv4: true, use_ipv6: true }).await.unwrap_err();
        assert!(matches!(error, ResolveError::AddressFamilyMismatch { expected: "IPv4", .. }));

        let error = resolver.resolve("10.0.0.1", V6).await.unwrap_err();
        assert!(matches!(error, ResolveError::AddressFamilyMismatch { expected: "IPv6", .. }));
        assert_eq!(error.to_string(), "Address 10.0.0.1 is not an IPv6 address");
    }

    #[tokio::test]
    async fn test_ipv4_mapped_literal_counts_as_ipv4() {
        let (resolver, _) = resolver(&[]);
        let resolved = resolver.resolve("::ffff:192.0.2.1", FamilyPreference { use_ipv4: false, use_ipv6: false }).await.unwrap();
        assert_eq!(resolved.to_string(), "192.0.2.1");
    }

    #[tokio::test]
    async fn test_dns_first_answer_without_restriction() {
        let (resolver, _) = resolver(&[("dual.example", &["2001:db8::1", "192.0.2.1"])]);
        let resolved = resolver.resolve("dual.example", ANY).await.unwrap();
        assert_eq!(resolved.to_string(), "[2001:db8::1]");
        assert_eq!(resolved.path, ResolutionPath::Dns);
    }

    #[tokio::test]
    async fn test_dns_family_filtering() {
        let (resolver, _) = resolver(&[
            ("dual.example", &["2001:db8::1", "192.0.2.1"]),
            ("v4only.example", &["192.0.2.7"]),
        ]);

        let resolved = resolver.resolve("dual.example", V4).await.unwrap();
        assert_eq!(resolved.to_string(), "192.0.2.1");

        let resolved = resolver.resolve("dual.example", V6).await.unwrap();
        assert_eq!(resolved.to_string(), "[2001:db8::1]");

        let error = resolver.resolve("v4only.example", V6).await.unwrap_err();
        assert!(matches!(error, ResolveError::NoAddressOfFamily { family: "IPv6", .. }));
    }

    #[tokio::test]
    async fn test_dns_failures() {
        let (resolver, _) = resolver(&[("empty.example", &[])]);

        let error = resolver.resolve("missing.example", ANY).await.unwrap_err();
        match error {
            ResolveError::ResolutionFailure { host, cause } => {
                assert_eq!(host, "missing.example");
                assert!(cause.contains("no record found"));
            }
            other => panic!("unexpected error {:?}", other),
        }

        let error = resolver.resolve("empty.example", ANY).await.unwrap_err();
        assert!(matches!(error, ResolveError::NoAddressFound { .. }));
    }

    #[test]
    fn test_hex_looking_names_are_numeric_when_ipv6_is_off() {
        // "cafe" is valid hexadecimal
        let resolved = tokio_test::block_on(resolver(&[]).0.resolve("cafe", ANY)).unwrap();
        assert_eq!(resolved.ip, IpAddr::V4(Ipv4Addr::from(0xcafe)));
    }

    #[test]
    fn test_socket_addr() {
        let resolved = ResolvedAddress {
            ip: "::1".parse().unwrap(),
            path: ResolutionPath::Literal,
        };
        assert_eq!(resolved.socket_addr(443).to_string(), "[::1]:443");
    }

    proptest! {
        #[test]
        fn prop_decimal_round_trip(value in any::<u32>()) {
            prop_assert_eq!(parse_numeric_ipv4(&value.to_string()), Some(Ipv4Addr::from(value)));
        }

        #[test]
        fn prop_hex_with_prefix(value in any::<u32>()) {
            prop_assert_eq!(parse_numeric_ipv4(&format!("0x{:X}", value)), Some(Ipv4Addr::from(value)));
        }

        #[test]
        fn prop_numeric_is_never_ipv6(value in any::<u32>()) {
            let host = value.to_string();
            prop_assert!(looks_like_ipv4(&host));
            prop_assert!(!looks_like_ipv6(&host));
        }
    }
}
