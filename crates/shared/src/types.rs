//! Core platform types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Tenant context headers
// =============================================================================

/// Header carrying the resolved organization id on forwarded tenant requests.
pub const ORG_ID_HEADER: &str = "x-organization-id";

/// Header carrying the resolved organization subdomain.
pub const ORG_SUBDOMAIN_HEADER: &str = "x-organization-subdomain";

// =============================================================================
// Status Enums
// =============================================================================

/// Organization lifecycle status
///
/// Only `Active` organizations resolve to a tenant context; `Trial` clubs are
/// still onboarding and `Inactive` clubs have lapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrgStatus {
    Active,
    Inactive,
    Trial,
}

impl std::fmt::Display for OrgStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Trial => write!(f, "trial"),
        }
    }
}

impl std::str::FromStr for OrgStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "trial" => Ok(Self::Trial),
            _ => Err(format!("Invalid organization status: {}", s)),
        }
    }
}

// =============================================================================
// Database Models
// =============================================================================

/// Organization (tenant) model
///
/// The subdomain slug uniquely and immutably identifies at most one
/// organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// Lowercase subdomain slug, e.g. "bowman" for bowman.quiverhq.com
    pub subdomain: String,
    pub status: OrgStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Authenticated session for the current request's user.
///
/// Absence of a session means the request is anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// =============================================================================
// Validation
// =============================================================================

/// Check a candidate subdomain slug against the `^[a-z0-9-]+$` shape.
///
/// Candidates derived from foreign hostnames contain dots and fail here, so
/// they never reach the organization store.
pub fn is_valid_subdomain(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
