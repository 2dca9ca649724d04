//! File I/O operations

use crate::{Result, StoreError};
use library::Collection;
use std::path::Path;

/// Save a collection to a file, creating its directory if needed
pub async fn save_collection(collection: &Collection, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = crate::serialize(collection)?;
    tokio::fs::write(path, json).await?;
    tracing::debug!(path = %path.display(), items = collection.len(), "collection saved");
    Ok(())
}

/// Load a collection from a file
pub async fn load_collection(path: impl AsRef<Path>) -> Result<Collection> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    crate::deserialize(&json)
}

/// Load a collection, or start from the sample items if there is no file yet
pub async fn load_or_seed(path: impl AsRef<Path>) -> Result<Collection> {
    match load_collection(path.as_ref()).await {
        Err(StoreError::FileNotFound(_)) => seed(path.as_ref()),
        other => other,
    }
}

/// Save a collection synchronously
pub fn save_collection_sync(collection: &Collection, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = crate::serialize(collection)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), items = collection.len(), "collection saved");
    Ok(())
}

/// Load a collection synchronously
pub fn load_collection_sync(path: impl AsRef<Path>) -> Result<Collection> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path)?;
    crate::deserialize(&json)
}

/// Synchronous [`load_or_seed`]
pub fn load_or_seed_sync(path: impl AsRef<Path>) -> Result<Collection> {
    match load_collection_sync(path.as_ref()) {
        Err(StoreError::FileNotFound(_)) => seed(path.as_ref()),
        other => other,
    }
}

fn seed(path: &Path) -> Result<Collection> {
    tracing::info!(path = %path.display(), "no collection file, starting from sample items");
    Ok(library::sample_collection()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::COLLECTION_FILE_NAME;
    use library::{ItemDraft, ItemKind};
    use tempfile::TempDir;

    #[test]
    fn test_save_load_sync() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(COLLECTION_FILE_NAME);

        let mut collection = Collection::new();
        collection
            .insert(ItemDraft::new("Ode", "O verse", ItemKind::Poem))
            .unwrap();
        save_collection_sync(&collection, &path).unwrap();

        assert_eq!(load_collection_sync(&path).unwrap(), collection);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(COLLECTION_FILE_NAME);

        assert!(matches!(load_collection_sync(&path), Err(StoreError::FileNotFound(_))));
        assert_eq!(load_or_seed_sync(&path).unwrap().len(), 3);
        // Seeding does not write the file
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_a_reseed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(COLLECTION_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(load_or_seed_sync(&path), Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_save_load_async() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(COLLECTION_FILE_NAME);

        let collection = load_or_seed(&path).await.unwrap();
        save_collection(&collection, &path).await.unwrap();

        let loaded = load_collection(&path).await.unwrap();
        assert_eq!(loaded, collection);
    }
}
