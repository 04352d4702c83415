//! Tenant routing decisions
//!
//! The router runs in front of every page and API handler. It classifies
//! the request by hostname, resolves the session and (for tenant hosts) the
//! owning organization, and produces a [`RouteAction`] the HTTP layer
//! applies. The decision logic is a pure function of the classified host,
//! the path, and the two lookup results; all I/O happens before it.
//!
//! Nothing here is fatal: a failed lookup degrades the single request it
//! happened on, and an invalid tenant is sent to the marketing root rather
//! than ever rendering tenant-scoped content.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::{debug, error, warn};
use uuid::Uuid;

use quiver_shared::{is_valid_subdomain, Session};

use crate::session::{SessionError, SessionResolver};
use crate::tenancy::{
    classify_host, is_reserved_subdomain, normalize_host, HostClass, OrganizationStore,
    ResolvedTenant, StoreError,
};

/// Path prefixes that are never tenant-sensitive: framework assets, the API
/// namespace, static files, infrastructure probes. Matched before any lookup
/// so asset fetches never cost a database round trip.
const BYPASS_PREFIXES: &[&str] = &["/_assets", "/api", "/static", "/health"];

/// Protected area requiring an authenticated session
const PROTECTED_PREFIX: &str = "/dashboard";

/// Login page, always on the same host as the request
const LOGIN_PATH: &str = "/login";

/// Routing decision for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Pass the request through untouched
    Forward,
    /// Pass the request through with tenant context headers set
    ForwardWithTenant { org_id: Uuid, subdomain: String },
    /// Redirect (307) to `location`
    Redirect(String),
}

/// Organization lookup outcome as seen by the decision logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantLookup {
    Found(ResolvedTenant),
    NotFound,
}

/// Per-request tenant router.
///
/// Holds no mutable state; every request is an independent evaluation of
/// (hostname, path, session, organization). Collaborators are optional so a
/// misconfigured deployment degrades to forwarding instead of failing closed.
pub struct TenantRouter {
    base_host: Option<String>,
    sessions: Option<Arc<dyn SessionResolver>>,
    organizations: Option<Arc<dyn OrganizationStore>>,
}

impl TenantRouter {
    pub fn new(
        base_host: Option<String>,
        sessions: Option<Arc<dyn SessionResolver>>,
        organizations: Option<Arc<dyn OrganizationStore>>,
    ) -> Self {
        Self {
            base_host,
            sessions,
            organizations,
        }
    }

    /// Decide how to route one request.
    ///
    /// Never fails: lookup errors degrade to the unauthenticated or
    /// invalid-tenant branch for this request only.
    pub async fn route(&self, host: &str, path: &str, headers: &HeaderMap) -> RouteAction {
        if is_bypass_path(path) {
            return RouteAction::Forward;
        }

        let Some(base_host) = self.base_host.as_deref() else {
            // Deployment defect, not a request error
            warn!("BASE_HOST is not configured; forwarding request untouched");
            return RouteAction::Forward;
        };

        let host = normalize_host(host);
        let session = self.resolve_session(headers).await;

        match classify_host(&host, base_host) {
            HostClass::Root => decide_root(path, session.as_ref()),
            HostClass::Tenant(candidate) => {
                let lookup = match self.lookup_tenant(&candidate).await {
                    Ok(Some(lookup)) => lookup,
                    Ok(None) => {
                        warn!("DATABASE_URL is not configured; forwarding tenant request untouched");
                        return RouteAction::Forward;
                    }
                    Err(e) => {
                        // Fail safe: an unresolvable tenant never renders
                        // tenant-scoped content
                        error!(subdomain = %candidate, "organization lookup failed: {e}");
                        TenantLookup::NotFound
                    }
                };
                decide_tenant(base_host, path, session.as_ref(), lookup)
            }
        }
    }

    async fn resolve_session(&self, headers: &HeaderMap) -> Option<Session> {
        let resolver = self.sessions.as_ref()?;
        match resolver.resolve(headers).await {
            Ok(session) => session,
            Err(e) => {
                // Recoverable: this request proceeds anonymously, the next
                // one gets a fresh attempt
                warn!("session resolution failed, treating request as anonymous: {e}");
                None
            }
        }
    }

    /// `Ok(None)` means no organization store is configured at all.
    async fn lookup_tenant(&self, candidate: &str) -> Result<Option<TenantLookup>, StoreError> {
        let Some(store) = self.organizations.as_ref() else {
            return Ok(None);
        };

        if is_reserved_subdomain(candidate) || !is_valid_subdomain(candidate) {
            debug!(subdomain = %candidate, "candidate subdomain can never resolve");
            return Ok(Some(TenantLookup::NotFound));
        }

        Ok(Some(match store.find_active_by_subdomain(candidate).await? {
            Some(tenant) => TenantLookup::Found(tenant),
            None => TenantLookup::NotFound,
        }))
    }
}

/// Root-domain flow: gate the protected area, otherwise stay out of the way
fn decide_root(path: &str, session: Option<&Session>) -> RouteAction {
    if path.starts_with(PROTECTED_PREFIX) && session.is_none() {
        return RouteAction::Redirect(LOGIN_PATH.to_string());
    }
    RouteAction::Forward
}

/// Tenant-domain flow: resolve the organization, then gate and enrich
fn decide_tenant(
    base_host: &str,
    path: &str,
    session: Option<&Session>,
    lookup: TenantLookup,
) -> RouteAction {
    let tenant = match lookup {
        TenantLookup::Found(tenant) => tenant,
        // Expected outcome for stray hosts and retired clubs, not an error
        TenantLookup::NotFound => return RouteAction::Redirect(format!("https://{base_host}/")),
    };

    // Signed-in members skip the club landing page
    if session.is_some() && path == "/" {
        return RouteAction::Redirect(PROTECTED_PREFIX.to_string());
    }

    if path.starts_with(PROTECTED_PREFIX) && session.is_none() {
        return RouteAction::Redirect(LOGIN_PATH.to_string());
    }

    RouteAction::ForwardWithTenant {
        org_id: tenant.org_id,
        subdomain: tenant.subdomain,
    }
}

/// Bypass paths skip tenant processing entirely
pub(crate) fn is_bypass_path(path: &str) -> bool {
    let prefixed = BYPASS_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
    });
    prefixed || path.contains('.')
}
