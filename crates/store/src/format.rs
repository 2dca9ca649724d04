//! Collection file format

use library::Collection;
use serde::{Deserialize, Serialize};

/// Name of the collection file inside the data directory
pub const COLLECTION_FILE_NAME: &str = "collection.json";

/// File header for format identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// Magic string for format identification
    pub magic: String,
}

impl FileHeader {
    pub const MAGIC: &'static str = "LYRICBOOK";

    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
        }
    }
}

/// Complete file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFile {
    pub header: FileHeader,
    pub items: Collection,
}

impl CollectionFile {
    pub fn new(items: Collection) -> Self {
        Self {
            header: FileHeader::default(),
            items,
        }
    }
}
