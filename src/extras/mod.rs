pub mod bulk;
pub mod catalog;
pub mod filter;
pub mod group;
pub mod selection;
pub mod types;

pub use bulk::{select_all_visible, unselect_all_visible, visible_ids};
pub use catalog::Catalog;
pub use filter::{filter, SearchQuery};
pub use group::{group, GroupCache, GroupedCatalog, Section};
pub use selection::{ExtrasStore, MemoryStore, SelectionBridge};
pub use types::{ExtraType, ItemId, ItemMeta, ItemRecord};
