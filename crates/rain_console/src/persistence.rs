use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rain_core::BundleInfo;
use rain_logging::{rain_info, rain_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

const RECENT_FILENAME: &str = "recent_bundles.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory unusable: {0}")]
    StateDir(String),
    #[error("failed to encode recent bundles: {0}")]
    Encode(#[from] ron::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedBundle {
    hash: String,
    name: String,
    #[serde(default)]
    issue: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedRecent {
    bundles: Vec<PersistedBundle>,
}

/// Recent-bundle list kept as RON in the state directory.
#[derive(Debug, Clone)]
pub struct RecentStore {
    dir: PathBuf,
}

impl RecentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(RECENT_FILENAME)
    }

    /// Missing or unreadable state yields an empty list.
    pub fn load(&self) -> Vec<BundleInfo> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                rain_warn!("Failed to read recent bundles from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        let state: PersistedRecent = match ron::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                rain_warn!("Failed to parse recent bundles from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        rain_info!("Loaded {} recent bundles from {:?}", state.bundles.len(), path);
        state
            .bundles
            .into_iter()
            .map(|bundle| BundleInfo::new(bundle.hash, bundle.name, bundle.issue))
            .collect()
    }

    pub fn save(&self, bundles: &[BundleInfo]) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let state = PersistedRecent {
            bundles: bundles
                .iter()
                .map(|bundle| PersistedBundle {
                    hash: bundle.hash.clone(),
                    name: bundle.name.clone(),
                    issue: bundle.issue.clone(),
                })
                .collect(),
        };
        let content = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())?;

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PersistError::StateDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|err| PersistError::StateDir(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<BundleInfo> {
        vec![
            BundleInfo::new("lp1yp7", "demo", Some("CN013".to_string())),
            BundleInfo::new("zz9", "", None),
        ]
    }

    #[test]
    fn save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecentStore::new(dir.path().join("nested"));

        let path = store.save(&sample()).unwrap();
        assert!(path.ends_with(RECENT_FILENAME));
        assert_eq!(store.load(), sample());
    }

    #[test]
    fn save_replaces_previous_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecentStore::new(dir.path());
        store.save(&sample()).unwrap();
        store.save(&sample()[1..]).unwrap();
        assert_eq!(store.load(), sample()[1..].to_vec());
    }

    #[test]
    fn missing_or_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecentStore::new(dir.path());
        assert!(store.load().is_empty());

        fs::write(store.path(), "not ron at all {").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn file_in_place_of_state_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("state");
        fs::write(&blocker, "x").unwrap();

        let err = RecentStore::new(&blocker).save(&sample()).unwrap_err();
        assert!(matches!(err, PersistError::StateDir(_)));
    }
}
