//! Hostname classification
//!
//! Splits inbound Host headers into root-domain and tenant-subdomain traffic.

/// Subdomain labels that can never belong to an organization
pub const RESERVED_SUBDOMAINS: &[&str] = &[
    "www", "api", "app", "admin", "mail", "static", "assets", "docs", "help", "support", "status",
    "blog", "staging", "dev", "demo",
];

/// How a hostname relates to the platform's base host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The platform's own marketing/auth host, no tenant context
    Root,
    /// Tenant traffic with the candidate subdomain still to be resolved.
    /// Foreign hosts land here too, carrying their full hostname as a
    /// candidate that can never match a slug.
    Tenant(String),
}

/// Normalize a Host header value: strip any port, lowercase
pub fn normalize_host(host: &str) -> String {
    let host = host.split(':').next().unwrap_or(host);
    host.trim().to_lowercase()
}

/// Classify a normalized hostname against the configured base host
pub fn classify_host(host: &str, base_host: &str) -> HostClass {
    if host == base_host {
        return HostClass::Root;
    }

    let base_suffix = format!(".{}", base_host);
    match host.strip_suffix(&base_suffix) {
        Some(subdomain) => HostClass::Tenant(subdomain.to_string()),
        None => HostClass::Tenant(host.to_string()),
    }
}

/// Check for reserved subdomains
pub fn is_reserved_subdomain(subdomain: &str) -> bool {
    RESERVED_SUBDOMAINS.contains(&subdomain)
}
