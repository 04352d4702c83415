//! Tenant context for downstream handlers
//!
//! The router injects the resolved organization into request headers;
//! handlers read it back through this extractor instead of re-querying the
//! organization store.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use quiver_shared::{ORG_ID_HEADER, ORG_SUBDOMAIN_HEADER};

use crate::error::GatewayError;

/// Resolved tenant for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub org_id: Uuid,
    pub subdomain: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let org_id = parts
            .headers
            .get(ORG_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(GatewayError::MissingTenantContext)?;
        let org_id = Uuid::parse_str(org_id)
            .map_err(|_| GatewayError::BadRequest("Malformed organization id".to_string()))?;

        let subdomain = parts
            .headers
            .get(ORG_SUBDOMAIN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(GatewayError::MissingTenantContext)?
            .to_string();

        Ok(Self { org_id, subdomain })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<TenantContext, GatewayError> {
        let (mut parts, _) = request.into_parts();
        TenantContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_injected_headers() {
        let org_id = Uuid::new_v4();
        let request = Request::builder()
            .header(ORG_ID_HEADER, org_id.to_string())
            .header(ORG_SUBDOMAIN_HEADER, "bowman")
            .body(())
            .unwrap();

        let context = extract(request).await.unwrap();
        assert_eq!(context.org_id, org_id);
        assert_eq!(context.subdomain, "bowman");
    }

    #[tokio::test]
    async fn test_missing_headers_reject() {
        let request = Request::builder().body(()).unwrap();
        let result = extract(request).await;
        assert!(matches!(result, Err(GatewayError::MissingTenantContext)));
    }

    #[tokio::test]
    async fn test_malformed_org_id_rejects() {
        let request = Request::builder()
            .header(ORG_ID_HEADER, "not-a-uuid")
            .header(ORG_SUBDOMAIN_HEADER, "bowman")
            .body(())
            .unwrap();

        let result = extract(request).await;
        assert!(matches!(result, Err(GatewayError::BadRequest(_))));
    }
}
