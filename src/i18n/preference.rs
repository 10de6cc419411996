//! Persisted language preference.
//!
//! A single scalar stored under [`STORAGE_KEY`]. The browser page keeps it in
//! local storage; here a store is anything that can load and save one code.

use super::Language;
use crate::error::PreferenceError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key the preference is stored under, in every backend.
pub const STORAGE_KEY: &str = "portfolio-language";

/// Cookie lifetime in seconds (one year).
pub const COOKIE_MAX_AGE: u64 = 31_536_000;

pub trait PreferenceStore: Send + Sync {
    /// The stored code, if any. Not validated against the registry.
    fn load(&self) -> Result<Option<String>, PreferenceError>;

    fn save(&mut self, code: &str) -> Result<(), PreferenceError>;
}

/// Resolve the active language from `store`.
///
/// Unreadable stores and codes outside the registry fall back to the
/// default language.
pub fn resolve_language(store: &dyn PreferenceStore) -> Language {
    match store.load() {
        Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|e| {
            warn!("Ignoring stored language preference: {}", e);
            Language::default()
        }),
        Ok(None) => Language::default(),
        Err(e) => {
            warn!("Failed to load language preference: {}", e);
            Language::default()
        }
    }
}

/// Preference held for the lifetime of the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    code: Option<String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> Result<Option<String>, PreferenceError> {
        Ok(self.code.clone())
    }

    fn save(&mut self, code: &str) -> Result<(), PreferenceError> {
        self.code = Some(code.to_string());
        Ok(())
    }
}

/// Preference kept in a small JSON object file: `{"portfolio-language": "en"}`.
///
/// Other keys in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, PreferenceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| PreferenceError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn load(&self) -> Result<Option<String>, PreferenceError> {
        Ok(self
            .read_map()?
            .get(STORAGE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn save(&mut self, code: &str) -> Result<(), PreferenceError> {
        // A corrupt file is replaced rather than blocking the save
        let mut map = self.read_map().unwrap_or_default();
        map.insert(STORAGE_KEY.to_string(), Value::String(code.to_string()));

        let body = serde_json::to_string_pretty(&map).map_err(|source| {
            PreferenceError::Corrupt {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        std::fs::write(&self.path, body).map_err(|source| PreferenceError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// Preference carried in a request cookie and written back as `Set-Cookie`.
#[derive(Debug, Clone, Default)]
pub struct CookiePreferences {
    code: Option<String>,
    changed: bool,
}

impl CookiePreferences {
    /// Read the preference from a `Cookie` request header value.
    pub fn from_header(header: Option<&str>) -> Self {
        let code = header.and_then(|header| {
            header.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == STORAGE_KEY).then(|| value.trim_matches('"').to_string())
            })
        });
        Self {
            code,
            changed: false,
        }
    }

    /// `Set-Cookie` value for a saved preference; `None` if nothing changed.
    pub fn set_cookie(&self) -> Option<String> {
        if !self.changed {
            return None;
        }
        self.code.as_ref().map(|code| {
            format!(
                "{}={}; Path=/; Max-Age={}; SameSite=Lax",
                STORAGE_KEY, code, COOKIE_MAX_AGE
            )
        })
    }
}

impl PreferenceStore for CookiePreferences {
    fn load(&self) -> Result<Option<String>, PreferenceError> {
        Ok(self.code.clone())
    }

    fn save(&mut self, code: &str) -> Result<(), PreferenceError> {
        self.code = Some(code.to_string());
        self.changed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Resolution ====================

    #[test]
    fn test_resolve_without_preference_is_default() {
        assert_eq!(resolve_language(&MemoryPreferences::new()), Language::PORTUGUESE);
    }

    #[test]
    fn test_resolve_stored_language() {
        let store = MemoryPreferences::with_code("en");
        assert_eq!(resolve_language(&store), Language::ENGLISH);
    }

    #[test]
    fn test_resolve_unknown_code_is_default() {
        let store = MemoryPreferences::with_code("fr");
        assert_eq!(resolve_language(&store), Language::PORTUGUESE);
    }

    // ==================== File ====================

    #[test]
    fn test_file_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferences::new(dir.path().join("prefs.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut store = FilePreferences::new(&path);
        store.save("en").unwrap();

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("en"));
        assert_eq!(resolve_language(&reopened), Language::ENGLISH);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[STORAGE_KEY], "en");
    }

    #[test]
    fn test_file_save_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut store = FilePreferences::new(&path);
        store.save("pt").unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw[STORAGE_KEY], "pt");
    }

    #[test]
    fn test_file_corrupt_resolves_default_and_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = FilePreferences::new(&path);
        assert!(matches!(store.load(), Err(PreferenceError::Corrupt { .. })));
        assert_eq!(resolve_language(&store), Language::PORTUGUESE);

        store.save("en").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_file_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = FilePreferences::new(dir.path().join("missing").join("prefs.json"));
        assert!(matches!(store.save("en"), Err(PreferenceError::Io { .. })));
    }

    // ==================== Cookie ====================

    #[test]
    fn test_cookie_parsed_from_header() {
        let store = CookiePreferences::from_header(Some("theme=dark; portfolio-language=en"));
        assert_eq!(store.load().unwrap().as_deref(), Some("en"));
        assert_eq!(store.set_cookie(), None);
    }

    #[test]
    fn test_cookie_absent() {
        assert_eq!(CookiePreferences::from_header(None).load().unwrap(), None);
        let other = CookiePreferences::from_header(Some("session=abc"));
        assert_eq!(other.load().unwrap(), None);
    }

    #[test]
    fn test_cookie_save_emits_set_cookie() {
        let mut store = CookiePreferences::from_header(None);
        store.save("en").unwrap();
        assert_eq!(
            store.set_cookie().as_deref(),
            Some("portfolio-language=en; Path=/; Max-Age=31536000; SameSite=Lax")
        );
    }
}
