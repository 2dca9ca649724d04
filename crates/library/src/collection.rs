//! The item collection
//!
//! Items are kept newest first: new items are prepended, which is also the
//! order the collection is written to disk in.

use crate::{Item, ItemDraft, ItemId, LibraryError, Result};
use annotation_model::AnnotationSet;
use serde::{Deserialize, Serialize};

/// All items of a user's library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Wrap items already in display order (e.g. loaded from disk)
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Create an item from `draft` and put it first
    pub fn insert(&mut self, draft: ItemDraft) -> Result<ItemId> {
        let item = Item::from_draft(draft)?;
        let id = item.id().clone();
        tracing::debug!(%id, title = item.title(), "item added");
        self.items.insert(0, item);
        Ok(id)
    }

    /// Replace the editable fields of item `id`.
    ///
    /// The item keeps its ID and creation date. Annotations are taken from the
    /// draft as-is; their offsets are not moved when the content changes, so
    /// any that no longer match the new content are logged.
    pub fn update(&mut self, id: &ItemId, draft: ItemDraft) -> Result<()> {
        let item = self.get_mut(id).ok_or_else(|| LibraryError::not_found(id))?;
        item.apply_draft(draft)?;

        let drifted = item.annotations().drifted(item.content());
        if !drifted.is_empty() {
            tracing::warn!(
                %id,
                count = drifted.len(),
                "content edit left annotations pointing at different text"
            );
        }
        tracing::debug!(%id, "item updated");
        Ok(())
    }

    /// Replace the annotations of item `id`
    pub fn set_annotations(&mut self, id: &ItemId, annotations: AnnotationSet) -> Result<()> {
        let item = self.get_mut(id).ok_or_else(|| LibraryError::not_found(id))?;
        item.set_annotations(annotations);
        Ok(())
    }

    /// Remove item `id` together with its annotations
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        tracing::debug!(%id, "item removed");
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Find an item by its full ID or an unambiguous ID prefix
    pub fn find(&self, id_or_prefix: &str) -> Result<&Item> {
        if let Some(item) = self.get(&ItemId::from(id_or_prefix)) {
            return Ok(item);
        }

        let mut matches = self
            .items
            .iter()
            .filter(|item| item.id().as_str().starts_with(id_or_prefix));
        match (matches.next(), matches.count()) {
            (Some(item), 0) => Ok(item),
            (Some(_), rest) => Err(LibraryError::AmbiguousId {
                prefix: id_or_prefix.to_string(),
                count: rest + 1,
            }),
            (None, _) => Err(LibraryError::ItemNotFound(id_or_prefix.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
