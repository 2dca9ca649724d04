//! Collection statistics and tag listing

use crate::{Item, ItemKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Item counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total: usize,
    pub lyrics: usize,
    pub poems: usize,
    /// Annotations across all items
    pub annotations: usize,
}

impl CollectionStats {
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items.into_iter().fold(Self::default(), |mut stats, item| {
            stats.total += 1;
            match item.kind() {
                ItemKind::Lyrics => stats.lyrics += 1,
                ItemKind::Poem => stats.poems += 1,
            }
            stats.annotations += item.annotation_count();
            stats
        })
    }
}

/// Every tag used in `items`, sorted and without duplicates
pub fn all_tags<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .flat_map(|item| item.tags().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
