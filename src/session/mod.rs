//! Session state: who is logged in, with which role, and the token the API
//! client presents on their behalf.
//!
//! Every reader (guard, navigation shell, API client) goes through a
//! [`SessionContext`]. The only writers are [`SessionContext::login`] and
//! [`SessionContext::logout`].

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ClientError, Result};

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// The closed set of roles the console knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Unknown role strings map to `None` rather than an error
    pub fn parse(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "super_admin" => Ok(Role::SuperAdmin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(ClientError::Session(format!("unknown role '{}'", other))),
        }
    }
}

/// Deserialize an optional role string, treating unknown values as no role
pub fn deserialize_lenient_role<'de, D>(deserializer: D) -> std::result::Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::parse))
}

/// User block of a successful login response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_role")]
    pub role: Option<Role>,
}

/// Client-held record of the current user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Option<Role>, display_name: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            role,
            display_name,
            logged_in_at: Some(Utc::now()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A stored token is the only thing that makes a session authenticated
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// Shared handle over the configured session store
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Current session; an unreadable store reads as logged out
    pub fn current(&self) -> Session {
        match self.store.get() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("failed to read session store: {}", e);
                Session::empty()
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current().token.filter(|t| !t.is_empty())
    }

    /// Record a successful login
    pub fn login(&self, token: impl Into<String>, user: &AuthUser) -> Result<Session> {
        let session = Session::new(token, user.role, user.name.clone());
        self.store.set(&session)?;
        tracing::info!(
            role = session.role.map(|r| r.as_str()).unwrap_or("none"),
            "session started"
        );
        Ok(session)
    }

    /// Drop token, role and name together
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("session cleared");
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}
