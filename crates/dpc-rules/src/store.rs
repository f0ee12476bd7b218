//! # Profile Store
//!
//! Holds the loaded compliance profiles for the lifetime of the process.
//! Constructed explicitly and handed to consumers (usually as
//! `Arc<ProfileStore>`); there is no global profile map.
//!
//! ## Concurrency
//!
//! Reads vastly outnumber loads, so the map sits behind a
//! `parking_lot::RwLock`. Profiles are handed out as `Arc<ComplianceProfile>`
//! so an audit keeps evaluating the catalogue it started with even if the
//! set is replaced mid-audit.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use dpc_core::ProfileNotFoundError;

use crate::error::{LoadResult, ProfileLoadError};
use crate::profile::{ComplianceProfile, ProfileDocument};

/// Named compliance profiles, keyed by name.
#[derive(Debug, Default)]
pub struct ProfileStore {
    /// BTreeMap gives `list_all` a deterministic order.
    profiles: RwLock<BTreeMap<String, Arc<ComplianceProfile>>>,
}

impl ProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with the given profiles.
    pub fn with_profiles(profiles: impl IntoIterator<Item = ComplianceProfile>) -> Self {
        let store = Self::new();
        store.load(profiles);
        store
    }

    /// Replace the whole profile set.
    ///
    /// Idempotent: loading the same set twice leaves the store unchanged.
    /// Profiles with an empty name are skipped, and a later profile with a
    /// duplicate name replaces the earlier one. Both cases are logged.
    /// Returns the number of profiles now held.
    pub fn load(&self, profiles: impl IntoIterator<Item = ComplianceProfile>) -> usize {
        let mut next = BTreeMap::new();
        for profile in profiles {
            if profile.name.trim().is_empty() {
                tracing::warn!(
                    rule_count = profile.rules.len(),
                    "skipping compliance profile with empty name"
                );
                continue;
            }
            if !profile.levels.is_well_ordered() {
                tracing::warn!(
                    profile = %profile.name,
                    green = profile.levels.green.threshold,
                    yellow = profile.levels.yellow.threshold,
                    red = profile.levels.red.threshold,
                    "compliance thresholds are not strictly descending"
                );
            }
            let name = profile.name.clone();
            if next.insert(name.clone(), Arc::new(profile)).is_some() {
                tracing::warn!(profile = %name, "duplicate profile name, keeping the last definition");
            }
        }
        let count = next.len();
        *self.profiles.write() = next;
        tracing::info!(profile_count = count, "compliance profiles loaded");
        count
    }

    /// Replace the profile set with the contents of one or more files.
    ///
    /// Each file holds a single profile or a list, as YAML (`.yaml`/`.yml`)
    /// or JSON (anything else). Files are parsed before the store is touched,
    /// so a parse failure leaves the previous set in place.
    pub fn load_from_paths<P: AsRef<Path>>(&self, paths: &[P]) -> LoadResult<usize> {
        let mut all = Vec::new();
        for path in paths {
            all.extend(read_profiles(path.as_ref())?);
        }
        Ok(self.load(all))
    }

    /// Replace the profile set with the contents of a single file.
    pub fn load_from_path(&self, path: &Path) -> LoadResult<usize> {
        self.load_from_paths(&[path])
    }

    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileNotFoundError`] if no profile has that name.
    pub fn get(&self, name: &str) -> Result<Arc<ComplianceProfile>, ProfileNotFoundError> {
        self.profiles
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileNotFoundError::new(name))
    }

    /// All profiles, sorted by name.
    pub fn list_all(&self) -> Vec<Arc<ComplianceProfile>> {
        self.profiles.read().values().cloned().collect()
    }

    /// Profile names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.profiles.read().keys().cloned().collect()
    }

    /// Whether a profile with this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.read().contains_key(name)
    }

    /// Number of loaded profiles.
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a profile file without touching any store.
pub fn read_profiles(path: &Path) -> LoadResult<Vec<ComplianceProfile>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProfileLoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProfileLoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let document: ProfileDocument = if is_yaml {
        serde_yaml::from_str(&content).map_err(|source| ProfileLoadError::YamlParse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&content).map_err(|source| ProfileLoadError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?
    };

    let profiles = document.into_profiles();
    tracing::debug!(path = %path.display(), count = profiles.len(), "parsed profile file");
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ComplianceLevel, ComplianceLevels, ComplianceRule};
    use dpc_core::Severity;
    use std::io::Write;

    fn profile(name: &str, rules: usize) -> ComplianceProfile {
        let mut p = ComplianceProfile::new(name);
        for i in 0..rules {
            p.rules.push(ComplianceRule::new(
                format!("R{i}"),
                "General",
                "text",
                Severity::Medium,
                "fix it",
            ));
        }
        p
    }

    #[test]
    fn get_known_and_unknown() {
        let store = ProfileStore::with_profiles([profile("IMCA", 2)]);
        assert_eq!(store.get("IMCA").unwrap().rule_count(), 2);
        let err = store.get("DNV").unwrap_err();
        assert_eq!(err.name, "DNV");
    }

    #[test]
    fn load_replaces_previous_set() {
        let store = ProfileStore::with_profiles([profile("A", 1), profile("B", 1)]);
        assert_eq!(store.len(), 2);
        store.load([profile("C", 1)]);
        assert_eq!(store.names(), vec!["C".to_string()]);
        assert!(!store.contains("A"));
    }

    #[test]
    fn load_is_idempotent() {
        let store = ProfileStore::new();
        let set = vec![profile("A", 3), profile("B", 1)];
        store.load(set.clone());
        let first: Vec<_> = store.list_all().iter().map(|p| (**p).clone()).collect();
        store.load(set);
        let second: Vec<_> = store.list_all().iter().map(|p| (**p).clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn list_all_sorted_by_name() {
        let store = ProfileStore::with_profiles([profile("zeta", 0), profile("alpha", 0)]);
        let names: Vec<_> = store.list_all().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn empty_name_is_skipped_and_duplicate_last_wins() {
        let store = ProfileStore::new();
        let count = store.load([profile("", 1), profile("A", 1), profile("A", 4)]);
        assert_eq!(count, 1);
        assert_eq!(store.get("A").unwrap().rule_count(), 4);
    }

    #[test]
    fn inverted_thresholds_are_loaded_anyway() {
        let mut p = profile("odd", 1);
        p.levels = ComplianceLevels {
            green: ComplianceLevel::new(50.0, ""),
            yellow: ComplianceLevel::new(80.0, ""),
            red: ComplianceLevel::new(0.0, ""),
        };
        let store = ProfileStore::with_profiles([p]);
        assert!(store.contains("odd"));
    }

    #[test]
    fn load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "- name: IMCA M 103\n  version: '2'\n  rules:\n    - id: PRS-01\n      category: Position Reference\n      text: three refs\n      severity: critical\n      action_required: add ref\n- name: Operator ASOG"
        )
        .unwrap();
        let store = ProfileStore::new();
        assert_eq!(store.load_from_path(file.path()).unwrap(), 2);
        assert_eq!(store.get("IMCA M 103").unwrap().rules[0].id, "PRS-01");
    }

    #[test]
    fn load_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name":"Single","rules":[]}}"#).unwrap();
        let store = ProfileStore::new();
        assert_eq!(store.load_from_path(file.path()).unwrap(), 1);
        assert!(store.contains("Single"));
    }

    #[test]
    fn parse_failure_keeps_previous_set() {
        let store = ProfileStore::with_profiles([profile("keep", 1)]);
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        let err = store.load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ProfileLoadError::JsonParse { .. }));
        assert!(store.contains("keep"));
    }

    #[test]
    fn missing_file_is_reported() {
        let store = ProfileStore::new();
        let err = store
            .load_from_path(Path::new("/nonexistent/dpc/profile.yaml"))
            .unwrap_err();
        assert!(matches!(err, ProfileLoadError::FileNotFound { .. }));
    }

    #[test]
    fn store_is_shareable_across_threads() {
        let store = Arc::new(ProfileStore::with_profiles([profile("A", 5)]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get("A").map(|p| p.rule_count()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), 5);
        }
    }
}
