use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use microsite::PreferenceStore;
use serde::{Deserialize, Serialize};

/// Persisted visitor preferences (`state.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub preferences: BTreeMap<String, String>,
    #[serde(skip)]
    dirty: bool,
}

impl AppState {
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read state file at {}", path.display()))?;
            let state: Self = toml::from_str(&contents)
                .with_context(|| format!("failed to parse state file at {}", path.display()))?;
            Ok(state)
        } else {
            Ok(Self::default())
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn persist(&mut self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("state path has no parent: {}", path.display()))?;
        fs::create_dir_all(dir).with_context(|| {
            format!(
                "failed to prepare directory for state file at {}",
                dir.display()
            )
        })?;
        let serialized = toml::to_string_pretty(self)
            .with_context(|| "failed to serialize state file to TOML".to_string())?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write state file to {}", path.display()))?;
        self.dirty = false;
        Ok(())
    }

    pub fn persist_if_changed(&mut self, path: &Path) -> Result<()> {
        if self.dirty {
            self.persist(path)?;
            tracing::debug!(path = %path.display(), "saved preferences");
        }
        Ok(())
    }
}

impl PreferenceStore for AppState {
    fn get(&self, key: &str) -> Option<String> {
        self.preferences.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.preferences.get(key).map(String::as_str) != Some(value) {
            self.preferences.insert(key.to_string(), value.to_string());
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn preferences_round_trip_through_toml() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("nested/state.toml");

        let mut state = AppState::load_or_default(&path).unwrap();
        assert!(state.preferences.is_empty());
        state.set("theme", "dark");
        assert!(state.is_dirty());
        state.persist_if_changed(&path).unwrap();
        assert!(!state.is_dirty());

        let reloaded = AppState::load_or_default(&path).unwrap();
        assert_eq!(reloaded.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn unchanged_values_do_not_mark_dirty() {
        let mut state = AppState::default();
        state.set("language", "hi");
        state.dirty = false;
        state.set("language", "hi");
        assert!(!state.is_dirty());
    }
}
