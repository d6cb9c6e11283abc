//! # Session Store
//!
//! Persisted client state: the bearer token, the role it was issued for, the
//! last national ID looked up, and the dark-mode display preference.
//!
//! State lives in a flat string key-value [`Storage`]. [`SessionStore`] is the
//! only accessor the rest of the crate uses; it is handed to the API client at
//! construction and read on every authenticated call, so a token written by
//! login or cleared by a 401 takes effect on the very next call.
//!
//! ## Keys
//!
//! | Key            | Value                                  |
//! |----------------|----------------------------------------|
//! | `access_token` | bearer token                           |
//! | `role`         | `doctor` / `patient` / `clinic_admin`  |
//! | `nric`         | last-viewed national ID                |
//! | `dark-mode`    | `enabled` / `disabled`                 |

use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::common::models::Role;

const ACCESS_TOKEN_KEY: &str = "access_token";
const ROLE_KEY: &str = "role";
const NRIC_KEY: &str = "nric";
const DARK_MODE_KEY: &str = "dark-mode";

/// Keys dropped when a session ends. Display preferences are not among them.
const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, ROLE_KEY, NRIC_KEY];

/// String key-value storage backing a [`SessionStore`].
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Volatile storage, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object of strings, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the file at `path`, starting empty if it does not exist yet.
    ///
    /// A file that exists but does not parse is treated as empty and will be
    /// overwritten on the next change.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("⚠️  Ignoring unreadable session file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        debug!("Session state written to {}", self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// Snapshot of the persisted session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Display theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DarkMode {
    Enabled,
    Disabled,
}

impl DarkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DarkMode::Enabled => "enabled",
            DarkMode::Disabled => "disabled",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DarkMode::Enabled => DarkMode::Disabled,
            DarkMode::Disabled => DarkMode::Enabled,
        }
    }
}

/// Typed accessor over a shared [`Storage`]. Cheap to clone.
///
/// If [`invalidate`](Self::invalidate) cannot remove a key, the session is
/// still treated as ended by every clone of this store until the next
/// [`begin`](Self::begin).
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    ended: Arc<AtomicBool>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            ended: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(Arc::new(FileStorage::open(path)?)))
    }

    pub fn session(&self) -> Session {
        Session {
            access_token: self.access_token(),
            role: self.role(),
        }
    }

    /// Current bearer token. Empty strings count as no token.
    pub fn access_token(&self) -> Option<String> {
        self.session_value(ACCESS_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.session_value(ROLE_KEY)?.parse().ok()
    }

    /// Starts a session after a successful login.
    pub fn begin(&self, access_token: &str, role: Role) -> io::Result<()> {
        self.storage.set(ACCESS_TOKEN_KEY, access_token)?;
        self.storage.set(ROLE_KEY, role.as_str())?;
        self.ended.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Ends the session: token, role and last-viewed national ID are removed.
    ///
    /// Every key is attempted even if an earlier one fails. The first storage
    /// error is returned, but the session counts as ended regardless.
    pub fn invalidate(&self) -> io::Result<()> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!("⚠️  Could not remove session key '{}': {}", key, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => {
                self.ended.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    pub fn remember_nric(&self, nric: &str) -> io::Result<()> {
        self.storage.set(NRIC_KEY, nric)
    }

    pub fn last_nric(&self) -> Option<String> {
        self.session_value(NRIC_KEY)
    }

    fn session_value(&self, key: &str) -> Option<String> {
        if self.ended.load(Ordering::SeqCst) {
            return None;
        }
        self.storage.get(key)
    }

    pub fn dark_mode(&self) -> DarkMode {
        match self.storage.get(DARK_MODE_KEY).as_deref() {
            Some("enabled") => DarkMode::Enabled,
            _ => DarkMode::Disabled,
        }
    }

    pub fn set_dark_mode(&self, mode: DarkMode) -> io::Result<()> {
        self.storage.set(DARK_MODE_KEY, mode.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_invalidate() {
        let store = SessionStore::in_memory();
        assert!(!store.session().is_authenticated());

        store.begin("tok-123", Role::ClinicAdmin).unwrap();
        store.remember_nric("990101-01-1234").unwrap();
        store.set_dark_mode(DarkMode::Enabled).unwrap();

        assert_eq!(
            store.session(),
            Session {
                access_token: Some("tok-123".to_string()),
                role: Some(Role::ClinicAdmin),
            }
        );

        store.invalidate().unwrap();

        assert_eq!(store.session(), Session::default());
        assert_eq!(store.last_nric(), None);
        // Display preference outlives the session
        assert_eq!(store.dark_mode(), DarkMode::Enabled);
    }

    /// Storage that can be written but never shrinks.
    #[derive(Default)]
    struct AppendOnlyStorage {
        inner: MemoryStorage,
    }

    impl Storage for AppendOnlyStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> io::Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, _key: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn test_invalidate_ends_session_even_if_storage_refuses() {
        let store = SessionStore::new(Arc::new(AppendOnlyStorage::default()));
        store.begin("tok-123", Role::Doctor).unwrap();
        store.remember_nric("990101-01-1234").unwrap();
        store.set_dark_mode(DarkMode::Enabled).unwrap();

        let err = store.invalidate().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        let clone = store.clone();
        assert_eq!(clone.session(), Session::default());
        assert_eq!(clone.last_nric(), None);
        assert_eq!(clone.dark_mode(), DarkMode::Enabled);

        // A new login brings the session back
        store.begin("tok-456", Role::Patient).unwrap();
        assert_eq!(clone.access_token().as_deref(), Some("tok-456"));
        assert_eq!(clone.role(), Some(Role::Patient));
    }

    #[test]
    fn test_blank_token_is_no_token() {
        let store = SessionStore::in_memory();
        store.begin("  ", Role::Doctor).unwrap();
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::open(&path).unwrap();
        store.begin("tok-abc", Role::Patient).unwrap();
        store.set_dark_mode(DarkMode::Enabled).unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("tok-abc"));
        assert_eq!(reopened.role(), Some(Role::Patient));
        assert_eq!(reopened.dark_mode(), DarkMode::Enabled);

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("role").map(String::as_str), Some("patient"));
        assert_eq!(raw.get("dark-mode").map(String::as_str), Some("enabled"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.session(), Session::default());
        assert_eq!(store.dark_mode(), DarkMode::Disabled);
    }
}
