use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::session::{Role, Session};

/// Persisted key/value state behind a [`crate::session::SessionContext`]
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Session>;
    fn set(&self, session: &Session) -> Result<()>;
    /// Removes token, role and name as one operation
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Session> {
        let guard = self
            .inner
            .read()
            .map_err(|e| ClientError::Session(e.to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| ClientError::Session(e.to_string()))?;
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.set(&Session::empty())
    }
}

/// On-disk layout: three flat strings plus the login timestamp
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    token: Option<String>,
    role: Option<String>,
    name: Option<String>,
    #[serde(default)]
    logged_in_at: Option<DateTime<Utc>>,
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            role: session.role.map(|r| r.as_str().to_string()),
            name: session.display_name.clone(),
            logged_in_at: session.logged_in_at,
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(p: PersistedSession) -> Self {
        Session {
            token: p.token,
            role: p.role.as_deref().and_then(Role::parse),
            display_name: p.name,
            logged_in_at: p.logged_in_at,
        }
    }
}

/// Session kept in `session.json` under the console's config directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(Self::FILE_NAME),
        }
    }

    /// Store under the configured directory, or `$HOME/.config/school-admin`
    pub fn from_config() -> Result<Self> {
        Ok(Self::new(get_config_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::empty());
        }

        let content = fs::read_to_string(&self.path)?;
        let persisted: PersistedSession = serde_json::from_str(&content)?;
        Ok(persisted.into())
    }

    fn set(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&PersistedSession::from(session))?;
        let mut file = owner_only().open(&self.path)?;
        restrict_permissions(&self.path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The file holds a bearer token; on unix only the owner may read it
fn owner_only() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

// `mode` only applies on create; an older file keeps its bits otherwise
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(dir) = &crate::config::config().session.config_dir {
        return Ok(dir.clone());
    }

    let home = std::env::var("HOME")
        .map_err(|_| ClientError::Session("HOME environment variable not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join("school-admin"))
}
