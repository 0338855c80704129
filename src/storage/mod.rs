pub mod database;
pub mod ui_cache;

pub use database::SqliteStore;
pub use ui_cache::UiCache;
