//! Tenant resolution
//!
//! This module maps inbound hostnames to the owning organization:
//! - Root domain: quiverhq.com (marketing and auth, no tenant context)
//! - Tenant subdomains: bowman.quiverhq.com -> org lookup by subdomain
//! - Anything else fails resolution and is sent back to the marketing root

mod cache;
mod context;
mod host;
mod store;

pub use cache::TenantCache;
pub use context::TenantContext;
pub use host::{classify_host, is_reserved_subdomain, normalize_host, HostClass, RESERVED_SUBDOMAINS};
pub use store::{OrganizationStore, PgOrganizationStore, ResolvedTenant, StoreError};
