//! Collection items and the form input they are built from

use crate::{ItemId, LibraryError, Result};
use annotation_model::AnnotationSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use unicode_segmentation::UnicodeSegmentation;

/// Earliest year accepted on an item
pub const MIN_YEAR: u16 = 1000;
/// Latest year accepted on an item
pub const MAX_YEAR: u16 = 2100;
/// Number of graphemes shown in an item excerpt
pub const EXCERPT_LEN: usize = 150;

/// Whether an item is song lyrics or a poem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lyrics,
    #[default]
    Poem,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Lyrics => "lyrics",
            ItemKind::Poem => "poem",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lyrics" | "lyric" | "song" => Ok(ItemKind::Lyrics),
            "poem" | "poetry" => Ok(ItemKind::Poem),
            _ => Err(LibraryError::UnknownKind(s.to_string())),
        }
    }
}

/// Split a comma-separated tag string, dropping blank entries
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a year field. A blank field means no year.
pub fn parse_year(input: &str) -> Result<Option<u16>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let year: i64 = input
        .parse()
        .map_err(|_| LibraryError::InvalidYear(input.to_string()))?;
    check_year(year).map(Some)
}

fn check_year(year: i64) -> Result<u16> {
    if (i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        Ok(year as u16)
    } else {
        Err(LibraryError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

/// Editable fields of an item, as entered in a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub content: String,
    pub kind: ItemKind,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub collection: Option<String>,
    pub year: Option<u16>,
    pub tags: Vec<String>,
    pub annotations: AnnotationSet,
}

impl ItemDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            kind,
            ..Default::default()
        }
    }

    /// Prefill a draft from an existing item, annotations included
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            content: item.content.clone(),
            kind: item.kind,
            artist: item.artist.clone(),
            album: item.album.clone(),
            collection: item.collection.clone(),
            year: item.year,
            tags: item.tags.clone(),
            annotations: item.annotations.clone(),
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check the draft and return its normalized form.
    ///
    /// The title is trimmed, blank optional fields become `None` and tags are
    /// trimmed with blanks dropped. Content is kept byte for byte since
    /// annotation offsets point into it.
    pub fn validate(self) -> Result<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(LibraryError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(LibraryError::EmptyContent);
        }
        if let Some(year) = self.year {
            check_year(i64::from(year))?;
        }

        Ok(Self {
            title,
            artist: non_blank(self.artist),
            album: non_blank(self.album),
            collection: non_blank(self.collection),
            tags: self
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            ..self
        })
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A song lyric or poem in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    title: String,
    content: String,
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<u16>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    annotations: AnnotationSet,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Create an item from a draft with a fresh ID
    pub fn from_draft(draft: ItemDraft) -> Result<Self> {
        Self::with_id(ItemId::new(), draft, Utc::now())
    }

    /// Create an item with a specific ID and creation date
    pub fn with_id(id: ItemId, draft: ItemDraft, created_at: DateTime<Utc>) -> Result<Self> {
        let draft = draft.validate()?;
        Ok(Self {
            id,
            title: draft.title,
            content: draft.content,
            kind: draft.kind,
            artist: draft.artist,
            album: draft.album,
            collection: draft.collection,
            year: draft.year,
            tags: draft.tags,
            annotations: draft.annotations,
            created_at,
            updated_at: created_at,
        })
    }

    /// Replace the editable fields, keeping ID and creation date
    pub(crate) fn apply_draft(&mut self, draft: ItemDraft) -> Result<()> {
        let draft = draft.validate()?;
        self.title = draft.title;
        self.content = draft.content;
        self.kind = draft.kind;
        self.artist = draft.artist;
        self.album = draft.album;
        self.collection = draft.collection;
        self.year = draft.year;
        self.tags = draft.tags;
        self.annotations = draft.annotations;
        self.touch();
        Ok(())
    }

    pub(crate) fn set_annotations(&mut self, annotations: AnnotationSet) {
        self.annotations = annotations;
        self.touch();
    }

    fn touch(&mut self) {
        // Never move backwards, even if the clock does
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check if the item carries `tag` (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// First [`EXCERPT_LEN`] graphemes of the content, with `...` when cut
    pub fn excerpt(&self) -> String {
        let mut graphemes = self.content.graphemes(true);
        let mut excerpt: String = graphemes.by_ref().take(EXCERPT_LEN).collect();
        if graphemes.next().is_some() {
            excerpt.push_str("...");
        }
        excerpt
    }

    /// Number of whitespace-separated words in the content
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Content length in chars, the unit annotation offsets use
    pub fn char_count(&self) -> usize {
        annotation_model::text::char_len(&self.content)
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_model::{Annotation, TextRange};
    use proptest::prelude::*;

    fn draft() -> ItemDraft {
        ItemDraft::new("Morning Glory", "Golden rays break through", ItemKind::Poem)
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("rock, ballad,love"), vec!["rock", "ballad", "love"]);
        assert_eq!(parse_tags(" , ,"), Vec::<String>::new());
        assert_eq!(parse_tags(""), Vec::<String>::new());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(""), Ok(None));
        assert_eq!(parse_year(" 2024 "), Ok(Some(2024)));
        assert_eq!(parse_year("1000"), Ok(Some(1000)));
        assert_eq!(parse_year("2100"), Ok(Some(2100)));
        assert!(matches!(parse_year("999"), Err(LibraryError::YearOutOfRange { year: 999, .. })));
        assert!(matches!(parse_year("2101"), Err(LibraryError::YearOutOfRange { .. })));
        assert!(matches!(parse_year("soon"), Err(LibraryError::InvalidYear(_))));
    }

    #[test]
    fn test_kind_parsing_and_serialization() {
        assert_eq!("Lyrics".parse::<ItemKind>(), Ok(ItemKind::Lyrics));
        assert_eq!("poem".parse::<ItemKind>(), Ok(ItemKind::Poem));
        assert!("novel".parse::<ItemKind>().is_err());
        assert_eq!(serde_json::to_string(&ItemKind::Lyrics).unwrap(), "\"lyrics\"");
    }

    #[test]
    fn test_validate_rejects_blank_title_and_content() {
        let blank_title = ItemDraft { title: "  ".into(), ..draft() };
        assert_eq!(blank_title.validate(), Err(LibraryError::EmptyTitle));

        let blank_content = ItemDraft { content: "\n\n".into(), ..draft() };
        assert_eq!(blank_content.validate(), Err(LibraryError::EmptyContent));

        let bad_year = draft().with_year(3000);
        assert!(matches!(bad_year.validate(), Err(LibraryError::YearOutOfRange { .. })));
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let raw = ItemDraft {
            title: "  Morning Glory ".into(),
            content: "  keep my spaces  ".into(),
            artist: Some("   ".into()),
            album: Some(" Live ".into()),
            tags: vec![" nature ".into(), "".into()],
            ..draft()
        };

        let clean = raw.validate().unwrap();
        assert_eq!(clean.title, "Morning Glory");
        assert_eq!(clean.content, "  keep my spaces  ");
        assert_eq!(clean.artist, None);
        assert_eq!(clean.album.as_deref(), Some("Live"));
        assert_eq!(clean.tags, vec!["nature"]);
    }

    #[test]
    fn test_item_json_shape() {
        let content = "Golden rays break through";
        let ann = Annotation::from_content(content, TextRange::new(0, 6), "gold").unwrap();
        let mut d = draft().with_artist("Anonymous").with_tags(["nature"]);
        d.annotations = AnnotationSet::new().add(ann).unwrap();
        let item = Item::with_id(ItemId::from("1"), d, Utc::now()).unwrap();

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["type"], "poem");
        assert_eq!(json["artist"], "Anonymous");
        assert!(json.get("album").is_none());
        assert_eq!(json["annotations"][0]["textStart"], 0);
        assert_eq!(json["annotations"][0]["selectedText"], "Golden");
        assert!(json["createdAt"].is_string());

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_item_missing_optional_fields_deserialize() {
        let json = r#"{
            "id": "x",
            "title": "T",
            "content": "C",
            "type": "lyrics",
            "createdAt": "2024-01-15T00:00:00Z",
            "updatedAt": "2024-01-15T00:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), ItemKind::Lyrics);
        assert!(item.tags().is_empty());
        assert!(item.annotations().is_empty());
    }

    #[test]
    fn test_excerpt() {
        let short = Item::from_draft(draft()).unwrap();
        assert_eq!(short.excerpt(), "Golden rays break through");

        let long = Item::from_draft(ItemDraft { content: "é".repeat(151), ..draft() }).unwrap();
        let excerpt = long.excerpt();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 153);

        let exact = Item::from_draft(ItemDraft { content: "a".repeat(150), ..draft() }).unwrap();
        assert!(!exact.excerpt().ends_with("..."));
    }

    #[test]
    fn test_counts() {
        let item = Item::from_draft(ItemDraft {
            content: "Café au lait\nsweet song".into(),
            ..draft()
        })
        .unwrap();
        assert_eq!(item.word_count(), 5);
        assert_eq!(item.char_count(), 23);
        assert_eq!(item.annotation_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_parsed_tags_are_trimmed_and_non_empty(input in "[a-z ,]{0,40}") {
            for tag in parse_tags(&input) {
                prop_assert!(!tag.is_empty());
                prop_assert_eq!(tag.trim(), tag.as_str());
                prop_assert!(!tag.contains(','));
            }
        }
    }
}
