//! Tenant router middleware
//!
//! Runs in front of every route: extracts the hostname, asks the
//! [`TenantRouter`](crate::router::TenantRouter) for a decision, and applies
//! it. Inbound copies of the tenant headers are stripped first so a client
//! can never spoof tenant context.

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use quiver_shared::{ORG_ID_HEADER, ORG_SUBDOMAIN_HEADER};

use crate::router::RouteAction;
use crate::state::AppState;

/// Middleware applying the tenant routing decision to each request
pub async fn tenant_router_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Tenant context comes only from the router
    request.headers_mut().remove(ORG_ID_HEADER);
    request.headers_mut().remove(ORG_SUBDOMAIN_HEADER);

    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string))
        .unwrap_or_default();
    let path = request.uri().path().to_string();

    match state.router.route(&host, &path, request.headers()).await {
        RouteAction::Forward => next.run(request).await,
        RouteAction::ForwardWithTenant { org_id, subdomain } => {
            let headers = request.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&org_id.to_string()) {
                headers.insert(ORG_ID_HEADER, value);
            }
            if let Ok(value) = HeaderValue::from_str(&subdomain) {
                headers.insert(ORG_SUBDOMAIN_HEADER, value);
            }
            next.run(request).await
        }
        RouteAction::Redirect(location) => Redirect::temporary(&location).into_response(),
    }
}
