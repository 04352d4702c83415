//! Gateway routes
//!
//! The gateway fronts the application deployment; the handlers here are the
//! infrastructure endpoints plus the thin pages the router redirects
//! between. Tenant-facing CRUD lives in the application behind us.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::GatewayResult;
use crate::middleware::tenant_router_middleware;
use crate::state::AppState;
use crate::tenancy::TenantContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match &state.pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => "healthy".to_string(),
            Err(_) => "unhealthy".to_string(),
        },
        None => "unconfigured".to_string(),
    };

    let overall_status = if db_status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        overall_status,
        Json(HealthResponse {
            status: if overall_status == StatusCode::OK {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: db_status,
        }),
    )
}

/// Liveness probe (just returns 200 if the server is running)
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe (a gateway without a database still routes pass-through)
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match &state.pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::OK,
    }
}

#[derive(Serialize)]
pub struct PageResponse {
    pub page: &'static str,
}

/// Marketing / club landing stub; the real pages live in the app deployment
pub async fn landing() -> Json<PageResponse> {
    Json(PageResponse { page: "landing" })
}

/// Login page stub served on both the root and tenant hosts
pub async fn login() -> Json<PageResponse> {
    Json(PageResponse { page: "login" })
}

#[derive(Serialize)]
pub struct TenantInfo {
    pub id: Uuid,
    pub subdomain: String,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub page: &'static str,
    /// Present on tenant hosts, absent on the platform root
    pub organization: Option<TenantInfo>,
}

/// Dashboard stub; on tenant hosts it carries the routed organization
pub async fn dashboard(tenant: Option<TenantContext>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        page: "dashboard",
        organization: tenant.map(|t| TenantInfo {
            id: t.org_id,
            subdomain: t.subdomain,
        }),
    })
}

/// Club overview; only meaningful with tenant context, so the extractor
/// rejects root-domain requests
pub async fn club_overview(tenant: TenantContext) -> GatewayResult<Json<TenantInfo>> {
    Ok(Json(TenantInfo {
        id: tenant.org_id,
        subdomain: tenant.subdomain,
    }))
}

/// Create all gateway routes with the tenant router in front
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring;
    // they sit under the router's bypass prefixes)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness));

    // Page stubs the routing decisions land on
    let page_routes = Router::new()
        .route("/", get(landing))
        .route("/login", get(login))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/club", get(club_overview));

    Router::new()
        .merge(health_routes)
        .merge(page_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_router_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
