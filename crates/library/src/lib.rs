//! Library - the lyrics and poems collection
//!
//! Items (song lyrics or poems) with their metadata and annotations, the
//! ordered collection that owns them, and the search, sort, and statistics
//! helpers used to browse it.

mod collection;
mod error;
mod item;
mod item_id;
mod sample;
mod search;
mod stats;

pub use collection::*;
pub use error::*;
pub use item::*;
pub use item_id::*;
pub use sample::*;
pub use search::*;
pub use stats::*;
