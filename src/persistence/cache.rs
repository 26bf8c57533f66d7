//! Local key-value cache
//!
//! The cache is the fallback of record on this device: it is read once at
//! startup and written synchronously on every mutation, whatever the
//! identity or network state.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::model::A11yConfig;

/// Key holding the serialized configuration
pub const CONFIG_KEY: &str = "a11y-sync:config:v1";

/// Sibling key holding the onboarding flag
pub const ONBOARDING_KEY: &str = "a11y-sync:onboarding:v1";

/// Errors from the local cache
#[derive(Debug)]
pub enum CacheError {
    Io(std::io::Error),
    Serialize(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Cache I/O error: {}", e),
            Self::Serialize(msg) => write!(f, "Cache serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(_) => None,
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Synchronous string key-value store
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// Whatever the cache held at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedState {
    pub config: Option<A11yConfig>,
    pub onboarding_completed: Option<bool>,
}

/// Read both cache entries. Corrupt entries are logged and treated as absent.
pub fn read_cached(cache: &dyn LocalCache) -> CachedState {
    let config = cache.get(CONFIG_KEY).and_then(|raw| {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                let decoded = A11yConfig::from_snapshot(&value);
                if decoded.is_none() {
                    tracing::warn!("Cached config is not an object, ignoring");
                }
                decoded
            }
            Err(e) => {
                tracing::warn!("Cached config is not valid JSON, ignoring: {}", e);
                None
            }
        }
    });

    let onboarding_completed = cache
        .get(ONBOARDING_KEY)
        .and_then(|raw| match raw.trim() {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                tracing::warn!("Cached onboarding flag unreadable: {:?}", other);
                None
            }
        });

    CachedState {
        config,
        onboarding_completed,
    }
}

pub fn write_config(cache: &dyn LocalCache, config: &A11yConfig) -> Result<(), CacheError> {
    let json = serde_json::to_string(config).map_err(|e| CacheError::Serialize(e.to_string()))?;
    cache.set(CONFIG_KEY, &json)
}

pub fn write_onboarding(cache: &dyn LocalCache, completed: bool) -> Result<(), CacheError> {
    cache.set(ONBOARDING_KEY, if completed { "true" } else { "false" })
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory cache
// ─────────────────────────────────────────────────────────────────────────────

/// Process-lifetime cache; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed cache
// ─────────────────────────────────────────────────────────────────────────────

/// JSON file holding every entry as one object.
///
/// Entries are kept in memory; each `set` rewrites the file through a
/// temporary sibling and a rename so a crash never leaves a torn file.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileCache {
    /// Open (or lazily create) the cache at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Cache file {:?} is corrupt, starting empty: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CacheError::Io(e)),
        };

        tracing::debug!("Opened cache {:?} ({} entries)", path, entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| CacheError::Serialize(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }
}
