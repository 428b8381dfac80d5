//! Loading of the extractor's on-disk resource files
//!
//! Layout: `<base>/<locale>/<namespace>.json` maps opaque keys to templates and
//! the optional `<base>/<locale>/<namespace>.meta.json` maps source phrases to
//! those keys.

use crate::error::{I18nError, I18nResult};
use crate::store::{string_entries, MessageStore};
use crate::Locale;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MESSAGES_EXTENSION: &str = ".json";
const META_EXTENSION: &str = ".meta.json";

/// Loads per-locale resource directories into a [`MessageStore`]
#[derive(Debug)]
pub struct ResourceManager {
    /// Directory holding one subdirectory per locale
    base_dir: PathBuf,
    loaded_locales: HashSet<Locale>,
}

impl ResourceManager {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            loaded_locales: HashSet::new(),
        }
    }

    /// Locale subdirectories under the base directory with their paths, sorted
    ///
    /// Directory names are normalised (`en_us` is `en-US`); the path is the
    /// directory as found on disk.
    pub fn discover_locales(&self) -> I18nResult<Vec<(Locale, PathBuf)>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|source| I18nError::ResourceLoad {
            path: self.base_dir.display().to_string(),
            source,
        })?;

        let mut locales = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| I18nError::ResourceLoad {
                path: self.base_dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                locales.push((Locale::new(name), path));
            }
        }
        locales.sort();
        debug!(base_dir = ?self.base_dir, count = locales.len(), "Discovered locale directories");
        Ok(locales)
    }

    /// Load every directory under the base directory that names `locale`
    pub fn load_locale(&mut self, store: &mut MessageStore, locale: &Locale) -> I18nResult<()> {
        let dirs: Vec<PathBuf> = self
            .discover_locales()?
            .into_iter()
            .filter(|(found, _)| found == locale)
            .map(|(_, dir)| dir)
            .collect();
        if dirs.is_empty() {
            return Err(I18nError::ResourceLoad {
                path: self.base_dir.join(locale.as_str()).display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no directory for locale"),
            });
        }
        for dir in dirs {
            self.load_dir(store, locale, &dir)?;
        }
        Ok(())
    }

    /// Load every namespace file in `dir` as `locale`
    pub fn load_dir(
        &mut self,
        store: &mut MessageStore,
        locale: &Locale,
        dir: &Path,
    ) -> I18nResult<()> {
        debug!("Loading locale directory: {:?}", dir);

        let namespaces = namespace_files(dir)?;
        if namespaces.is_empty() {
            warn!("No message files found for locale {} in {:?}", locale, dir);
        }

        for (namespace, path) in namespaces {
            let messages = read_entries(&path)?;
            let meta_path = dir.join(format!("{namespace}{META_EXTENSION}"));
            let meta = if meta_path.is_file() {
                Some(read_entries(&meta_path)?)
            } else {
                None
            };
            debug!(
                locale = %locale,
                namespace = %namespace,
                messages = messages.len(),
                has_meta = meta.is_some(),
                "Loaded namespace"
            );
            store.merge_namespace(locale, &namespace, messages, meta);
        }

        // A locale directory with no files still counts as configured
        if !store.has_locale(locale) {
            store.merge_namespace(locale, crate::DEFAULT_NAMESPACE, HashMap::new(), None);
        }

        self.loaded_locales.insert(locale.clone());
        info!("Successfully loaded locale: {}", locale);
        Ok(())
    }

    /// Discover and load every locale
    pub fn load_all(&mut self) -> I18nResult<MessageStore> {
        let mut store = MessageStore::new();
        for (locale, dir) in self.discover_locales()? {
            self.load_dir(&mut store, &locale, &dir)?;
        }
        info!(
            base_dir = ?self.base_dir,
            locales = self.loaded_locales.len(),
            messages = store.len(),
            "Loaded translation resources"
        );
        Ok(store)
    }

    /// Locales loaded so far, sorted
    pub fn loaded_locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<_> = self.loaded_locales.iter().collect();
        locales.sort();
        locales
    }

    pub fn is_loaded(&self, locale: &Locale) -> bool {
        self.loaded_locales.contains(locale)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new("locales")
    }
}

/// `(namespace, path)` for each messages file in `dir`, sorted by namespace
fn namespace_files(dir: &Path) -> I18nResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|source| I18nError::ResourceLoad {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| I18nError::ResourceLoad {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(META_EXTENSION) || !path.is_file() {
            continue;
        }
        if let Some(namespace) = name.strip_suffix(MESSAGES_EXTENSION) {
            files.push((namespace.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

fn read_entries(path: &Path) -> I18nResult<HashMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|source| I18nError::ResourceLoad {
        path: path.display().to_string(),
        source,
    })?;
    let json: JsonValue =
        serde_json::from_str(&content).map_err(|source| I18nError::ResourceParse {
            path: path.display().to_string(),
            source,
        })?;
    string_entries(&json, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::message_key;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_all() {
        let temp = TempDir::new().unwrap();
        let key = message_key("Save");
        write(temp.path(), "de/common.json", &format!(r#"{{"{key}": "Speichern"}}"#));
        write(temp.path(), "de/common.meta.json", &format!(r#"{{"Save": "{key}"}}"#));
        write(temp.path(), "de/admin.json", r#"{"k": "Verwaltung"}"#);
        write(temp.path(), "en_US/common.json", r#"{"k": "Admin"}"#);
        write(temp.path(), "README.md", "not a locale");

        let mut manager = ResourceManager::new(temp.path());
        let store = manager.load_all().unwrap();

        let de = Locale::new("de");
        assert_eq!(store.namespaces(&de), vec!["admin", "common"]);
        assert_eq!(store.meta_key(&de, "common", "Save"), Some(key.as_str()));
        assert_eq!(store.message(&de, "common", &key), Some("Speichern"));
        assert!(store.has_locale(&Locale::new("en-US")));
        assert!(manager.is_loaded(&de));
        assert_eq!(manager.loaded_locales().len(), 2);
    }

    #[test]
    fn test_directory_names_are_normalised_but_read_as_found() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "en_us/common.json", r#"{"k": "color"}"#);
        write(temp.path(), "EN/common.json", r#"{"k": "colour"}"#);
        write(temp.path(), "zh-hans/common.json", r#"{"k": "颜色"}"#);

        let mut manager = ResourceManager::new(temp.path());
        let store = manager.load_all().unwrap();

        let en_us = Locale::new("en-US");
        assert_eq!(en_us.as_str(), "en-US");
        assert_eq!(store.message(&en_us, "common", "k"), Some("color"));
        assert_eq!(store.message(&Locale::new("en"), "common", "k"), Some("colour"));
        assert_eq!(store.message(&Locale::new("zh-Hans"), "common", "k"), Some("颜色"));
        assert_eq!(manager.loaded_locales().len(), 3);

        let mut single = MessageStore::new();
        ResourceManager::new(temp.path())
            .load_locale(&mut single, &en_us)
            .unwrap();
        assert_eq!(single.message(&en_us, "common", "k"), Some("color"));
    }

    #[test]
    fn test_load_locale_without_directory_is_a_load_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "de/common.json", "{}");

        let err = ResourceManager::new(temp.path())
            .load_locale(&mut MessageStore::new(), &Locale::new("fr"))
            .unwrap_err();
        assert!(matches!(err, I18nError::ResourceLoad { .. }));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "fr/common.json", "{ not json");

        let err = ResourceManager::new(temp.path()).load_all().unwrap_err();
        assert!(matches!(err, I18nError::ResourceParse { .. }));
    }

    #[test]
    fn test_missing_base_dir_is_a_load_error() {
        let temp = TempDir::new().unwrap();
        let err = ResourceManager::new(temp.path().join("missing"))
            .load_all()
            .unwrap_err();
        assert!(matches!(err, I18nError::ResourceLoad { .. }));
    }

    #[test]
    fn test_empty_locale_directory_is_configured() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("ja")).unwrap();

        let store = ResourceManager::new(temp.path()).load_all().unwrap();
        assert!(store.has_locale(&Locale::new("ja")));
        assert!(store.is_empty());
    }
}
