//! Application state: data directory, settings and the collection

use anyhow::{Context, Result};
use edit_engine::SessionConfig;
use library::Collection;
use std::path::{Path, PathBuf};
use store::{AppSettings, SettingsManager, COLLECTION_FILE_NAME};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "LYRICBOOK_DATA_DIR";

/// Pick the data directory: explicit flag, then environment, then the platform default
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join("lyricbook"))
        .context("Could not determine data directory; pass --data-dir")
}

/// Everything a command needs, loaded from the data directory
pub struct AppState {
    data_dir: PathBuf,
    pub settings: AppSettings,
    pub collection: Collection,
}

impl AppState {
    /// Read settings only, before logging is set up
    pub fn read_settings(data_dir: &Path) -> Result<AppSettings> {
        let mut manager = SettingsManager::new(data_dir);
        let settings = manager
            .load_sync()
            .with_context(|| format!("Failed to read settings in {}", data_dir.display()))?;
        Ok(settings.clone())
    }

    /// Load the collection, starting from the sample items on first run
    pub async fn load(data_dir: PathBuf, settings: AppSettings) -> Result<Self> {
        let path = data_dir.join(COLLECTION_FILE_NAME);
        let collection = store::load_or_seed(&path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        tracing::debug!(items = collection.len(), "collection loaded");

        Ok(Self {
            data_dir,
            settings,
            collection,
        })
    }

    pub fn collection_path(&self) -> PathBuf {
        self.data_dir.join(COLLECTION_FILE_NAME)
    }

    /// Write the collection back to disk
    pub async fn save(&self) -> Result<()> {
        let path = self.collection_path();
        store::save_collection(&self.collection, &path)
            .await
            .with_context(|| format!("Failed to save {}", path.display()))
    }

    /// Session configuration derived from the editing settings
    pub fn session_config(&self) -> SessionConfig {
        let editing = &self.settings.editing;
        SessionConfig {
            read_only: editing.read_only,
            allow_empty_note_on_edit: editing.allow_empty_note_on_edit,
            undo_limit: editing.undo_limit,
            ..SessionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flag_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/books"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/books"));
    }

    #[tokio::test]
    async fn test_first_run_seeds_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let settings = AppState::read_settings(temp_dir.path()).unwrap();
        let state = AppState::load(temp_dir.path().to_path_buf(), settings).await.unwrap();

        assert_eq!(state.collection.len(), 3);
        assert!(!state.collection_path().exists());

        state.save().await.unwrap();
        assert!(state.collection_path().exists());
    }

    #[test]
    fn test_session_config_follows_settings() {
        let mut settings = AppSettings::default();
        settings.editing.read_only = true;
        settings.editing.undo_limit = 5;
        let state = AppState {
            data_dir: PathBuf::from("."),
            settings,
            collection: Collection::new(),
        };

        let config = state.session_config();
        assert!(config.read_only);
        assert_eq!(config.undo_limit, 5);
    }
}
