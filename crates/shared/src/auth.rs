//! Authentication types: JWT claims and the per-request access context.
//!
//! Campus tenancy is the isolation boundary of the whole system. Every
//! ledger operation receives an explicit [`AccessContext`] value built once
//! per request from validated claims - there is no hidden global session
//! state, and a context with no grants fails every check.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Per-campus permission grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Read-only access to campus data.
    Read,
    /// Can record ledger mutations (invoices, payments, void requests).
    Write,
    /// Can resolve void requests and manage campus data.
    Admin,
}

impl AccessLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }

    /// Parses a level from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One campus the user may act on, with the granted level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusGrant {
    /// Campus ID.
    pub id: Uuid,
    /// Granted access level.
    pub level: AccessLevel,
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Username, carried for audit fields (`received_by`, `requested_by`).
    pub username: String,
    /// Campuses the user may act on.
    pub campuses: Vec<CampusGrant>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: &str,
        campuses: Vec<CampusGrant>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            campuses,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Resolved identity and campus scope of the acting user.
///
/// Constructed once per request by the auth middleware from validated
/// [`Claims`] plus the optional `X-Campus-Id` header. Passed explicitly
/// into every campus-gated operation.
#[derive(Debug, Clone)]
pub struct AccessContext {
    user_id: Uuid,
    username: String,
    grants: HashMap<Uuid, AccessLevel>,
    selected_campus: Option<Uuid>,
}

impl AccessContext {
    /// Builds a context from validated claims and the requested campus.
    ///
    /// A `requested_campus` outside the grant set is discarded: the caller
    /// ends up with no selected scope rather than an unauthorized one.
    #[must_use]
    pub fn from_claims(claims: &Claims, requested_campus: Option<Uuid>) -> Self {
        let grants: HashMap<Uuid, AccessLevel> =
            claims.campuses.iter().map(|g| (g.id, g.level)).collect();

        let selected_campus = requested_campus.filter(|id| grants.contains_key(id));

        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            grants,
            selected_campus,
        }
    }

    /// Builds a context directly from parts (used in tests and the seeder).
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: &str,
        grants: Vec<CampusGrant>,
        selected_campus: Option<Uuid>,
    ) -> Self {
        let grants: HashMap<Uuid, AccessLevel> =
            grants.into_iter().map(|g| (g.id, g.level)).collect();
        let selected_campus = selected_campus.filter(|id| grants.contains_key(id));
        Self {
            user_id,
            username: username.to_string(),
            grants,
            selected_campus,
        }
    }

    /// Returns the acting user's ID.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the acting user's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns true if the user holds any grant for the campus.
    #[must_use]
    pub fn has_access(&self, campus_id: Uuid) -> bool {
        self.grants.contains_key(&campus_id)
    }

    /// Returns the campus selected for this request, if one was resolved.
    ///
    /// `None` means "no campus scope": operations that need a scope must
    /// fail closed, never fall back to all campuses.
    #[must_use]
    pub const fn selected_campus(&self) -> Option<Uuid> {
        self.selected_campus
    }

    /// Fails with `Forbidden` unless the user holds any grant for the campus.
    pub fn require_access(&self, campus_id: Uuid) -> AppResult<()> {
        if self.has_access(campus_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("no access to this campus".to_string()))
        }
    }

    /// Fails with `Forbidden` unless the user holds at least the given level.
    pub fn require_level(&self, campus_id: Uuid, level: AccessLevel) -> AppResult<()> {
        match self.grants.get(&campus_id) {
            Some(granted) if *granted >= level => Ok(()),
            Some(_) => Err(AppError::Forbidden(format!(
                "{level} access required for this campus"
            ))),
            None => Err(AppError::Forbidden("no access to this campus".to_string())),
        }
    }

    /// Fails with `Forbidden` unless the user can write to the campus.
    pub fn require_write(&self, campus_id: Uuid) -> AppResult<()> {
        self.require_level(campus_id, AccessLevel::Write)
    }

    /// Campuses the user holds any grant for.
    #[must_use]
    pub fn granted_campuses(&self) -> Vec<Uuid> {
        self.grants.keys().copied().collect()
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Full name.
    pub full_name: String,
    /// Campuses the user may act on.
    pub campuses: Vec<CampusGrant>,
}
