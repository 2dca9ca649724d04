//! Collection serialization

use crate::{CollectionFile, Result, StoreError};
use library::Collection;

/// Serialize a collection to JSON
pub fn serialize(collection: &Collection) -> Result<String> {
    let file = CollectionFile::new(collection.clone());
    let json = serde_json::to_string_pretty(&file)?;
    Ok(json)
}

/// Deserialize a collection from JSON
pub fn deserialize(json: &str) -> Result<Collection> {
    let file: CollectionFile = serde_json::from_str(json)?;

    if !file.header.is_valid() {
        return Err(StoreError::InvalidFormat(format!(
            "Unrecognized file header: {}",
            file.header.magic
        )));
    }

    let mismatched = mismatched_items(&file.items);
    if mismatched > 0 {
        // Offsets count chars. Files whose offsets count UTF-16 units are
        // shifted after any char outside the Basic Multilingual Plane.
        tracing::warn!(
            items = mismatched,
            offset_unit = "char",
            "loaded items with annotations that do not match their content; \
             offsets counted in UTF-16 units drift after emoji and other astral chars"
        );
    }

    Ok(file.items)
}

/// Items with an annotation that fails validation or no longer sits over
/// its selected text
fn mismatched_items(collection: &Collection) -> usize {
    collection
        .iter()
        .filter(|item| {
            let annotations = item.annotations();
            annotations.validate_against(item.content()).is_err()
                || !annotations.drifted(item.content()).is_empty()
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let collection = library::sample_collection().unwrap();
        let json = serialize(&collection).unwrap();
        let loaded = deserialize(&json).unwrap();

        assert_eq!(collection, loaded);
    }

    #[test]
    fn test_file_shape() {
        let json = serialize(&library::sample_collection().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["header"]["magic"], "LYRICBOOK");
        assert!(value["header"].get("version").is_none());
        assert_eq!(value["items"][0]["type"], "lyrics");
        assert_eq!(value["items"][2]["annotations"][0]["id"], "ann1");
    }

    #[test]
    fn test_rejects_foreign_header() {
        let json = r#"{"header": {"magic": "MSWORD-DOC"}, "items": []}"#;
        assert!(matches!(deserialize(json), Err(StoreError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(deserialize("[1, 2"), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_stale_annotations_are_loaded() {
        let json = r#"{
            "header": {"magic": "LYRICBOOK"},
            "items": [{
                "id": "1",
                "title": "Short",
                "content": "abc",
                "type": "poem",
                "tags": [],
                "annotations": [{
                    "id": "a",
                    "textStart": 1,
                    "textEnd": 10,
                    "selectedText": "bc and more",
                    "note": "stale",
                    "createdAt": "2024-01-15T00:00:00Z"
                }],
                "createdAt": "2024-01-15T00:00:00Z",
                "updatedAt": "2024-01-15T00:00:00Z"
            }]
        }"#;

        let collection = deserialize(json).unwrap();
        assert_eq!(collection.items()[0].annotation_count(), 1);
    }

    #[test]
    fn test_utf16_offsets_are_reported_as_mismatched() {
        // "la" is at UTF-16 units 3..5 but chars 2..4
        let json = r#"{
            "header": {"magic": "LYRICBOOK"},
            "items": [{
                "id": "1",
                "title": "Tune",
                "content": "🎵 la la",
                "type": "lyrics",
                "tags": [],
                "annotations": [{
                    "id": "a",
                    "textStart": 3,
                    "textEnd": 5,
                    "selectedText": "la",
                    "note": "refrain",
                    "createdAt": "2024-01-15T00:00:00Z"
                }],
                "createdAt": "2024-01-15T00:00:00Z",
                "updatedAt": "2024-01-15T00:00:00Z"
            }]
        }"#;

        let collection = deserialize(json).unwrap();
        assert_eq!(mismatched_items(&collection), 1);
        assert_eq!(mismatched_items(&library::sample_collection().unwrap()), 0);
    }
}
