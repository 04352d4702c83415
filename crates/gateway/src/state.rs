//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::router::TenantRouter;
use crate::session::{JwtSessionResolver, SessionResolver};
use crate::tenancy::{OrganizationStore, PgOrganizationStore};

/// Application state shared across handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub router: Arc<TenantRouter>,
    /// Absent when DATABASE_URL is not configured (degraded deployment)
    pub pool: Option<PgPool>,
}

impl AppState {
    /// Wire the router from configuration; unset collaborators degrade to
    /// pass-through routing instead of refusing to boot.
    pub fn new(config: Config, pool: Option<PgPool>) -> Self {
        let sessions: Option<Arc<dyn SessionResolver>> =
            config.session_jwt_secret.as_deref().map(|secret| {
                Arc::new(JwtSessionResolver::new(secret, config.session_cookie.clone()))
                    as Arc<dyn SessionResolver>
            });

        let organizations: Option<Arc<dyn OrganizationStore>> = pool
            .clone()
            .map(|pool| Arc::new(PgOrganizationStore::new(pool)) as Arc<dyn OrganizationStore>);

        let router = TenantRouter::new(config.base_host.clone(), sessions, organizations);

        Self {
            config: Arc::new(config),
            router: Arc::new(router),
            pool,
        }
    }

    /// Wire the state around an explicit router (tests, bespoke deployments)
    pub fn with_router(config: Config, router: TenantRouter, pool: Option<PgPool>) -> Self {
        Self {
            config: Arc::new(config),
            router: Arc::new(router),
            pool,
        }
    }
}
