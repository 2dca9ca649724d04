//! Filtering and sorting items

use crate::{Item, ItemKind, LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Criteria an item must meet to be listed. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Case-insensitive text searched in title, content, artist, album,
    /// collection and tags
    pub query: String,
    /// Only items of this kind
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    /// Items carrying at least one of these tags
    pub tags: Vec<String>,
    /// Exact artist
    pub artist: Option<String>,
    /// Exact year
    pub year: Option<u16>,
}

impl SearchFilters {
    /// Filter on query text only
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.kind.is_none()
            && self.tags.is_empty()
            && self.artist.is_none()
            && self.year.is_none()
    }

    /// Check a single item against every criterion
    pub fn matches(&self, item: &Item) -> bool {
        if !self.query.is_empty() && !searchable_text(item).contains(&self.query.to_lowercase()) {
            return false;
        }
        if self.kind.is_some_and(|kind| item.kind() != kind) {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| item.has_tag(tag)) {
            return false;
        }
        if self.artist.as_deref().is_some_and(|artist| item.artist() != Some(artist)) {
            return false;
        }
        if self.year.is_some_and(|year| item.year() != Some(year)) {
            return false;
        }
        true
    }
}

/// Lowercased text of all searchable fields, joined by spaces
fn searchable_text(item: &Item) -> String {
    [Some(item.title()), Some(item.content()), item.artist(), item.album(), item.collection()]
        .into_iter()
        .flatten()
        .chain(item.tags().iter().map(String::as_str))
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Items matching `filters`, in their original order
pub fn filter_items<'a, I>(items: I, filters: &SearchFilters) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().filter(|item| filters.matches(item)).collect()
}

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Title, A to Z
    Title,
    /// Creation date, newest first
    #[default]
    Date,
    /// Artist, A to Z; items without an artist come first
    Artist,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Title => "title",
            SortBy::Date => "date",
            SortBy::Artist => "artist",
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortBy::Title),
            "date" => Ok(SortBy::Date),
            "artist" => Ok(SortBy::Artist),
            _ => Err(LibraryError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// Sort items in place. The sort is stable, so ties keep their order.
pub fn sort_items(items: &mut [&Item], sort_by: SortBy) {
    match sort_by {
        SortBy::Title => items.sort_by(|a, b| compare_text(a.title(), b.title())),
        SortBy::Artist => items.sort_by(|a, b| {
            compare_text(a.artist().unwrap_or_default(), b.artist().unwrap_or_default())
        }),
        SortBy::Date => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
    }
}

/// Case-insensitive comparison, falling back to exact order for ties
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter then sort, as a listing shows them
pub fn search<'a, I>(items: I, filters: &SearchFilters, sort_by: SortBy) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut found = filter_items(items, filters);
    sort_items(&mut found, sort_by);
    found
}
