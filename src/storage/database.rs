use crate::extras::{ExtraType, ExtrasStore, ItemId};
use crate::utils::paths::{ensure_gearopt_dir_exists, get_database_path};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

/// Extras selections persisted in SQLite, one row per selected position.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the default database under the gearopt directory.
    pub fn open_default() -> Result<Self> {
        ensure_gearopt_dir_exists()?;
        Self::open(&get_database_path()?)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {path:?}"))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS extra_selections (
            extra_type TEXT NOT NULL,
            position INTEGER NOT NULL,
            item_id TEXT NOT NULL,
            PRIMARY KEY (extra_type, position)
        )",
        [],
    )?;
    Ok(())
}

impl ExtrasStore for SqliteStore {
    fn read(&self, ty: ExtraType) -> Result<Vec<ItemId>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id FROM extra_selections WHERE extra_type = ?1 ORDER BY position",
        )?;
        let ids = stmt
            .query_map(params![ty.as_str()], |row| row.get::<_, String>(0))?
            .map(|id| id.map(ItemId::new))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    fn write(&mut self, ty: ExtraType, ids: &[ItemId]) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM extra_selections WHERE extra_type = ?1",
            params![ty.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO extra_selections (extra_type, position, item_id) VALUES (?1, ?2, ?3)",
            )?;
            for (position, id) in ids.iter().enumerate() {
                stmt.execute(params![ty.as_str(), position as i64, id.as_str()])?;
            }
        }

        tx.commit()
            .with_context(|| format!("Failed to save {ty} selection"))?;
        debug!(extra_type = %ty, count = ids.len(), "Saved selection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extras::SelectionBridge;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn ids(list: &[&str]) -> Vec<ItemId> {
        list.iter().map(|s| ItemId::new(*s)).collect()
    }

    #[test]
    fn test_empty_read() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.read(ExtraType::Runes).unwrap().is_empty());
    }

    #[test]
    fn test_write_replaces_whole_set_in_order() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.write(ExtraType::Runes, &ids(&["b", "a", "c"])).unwrap();
        store.write(ExtraType::Runes, &ids(&["c", "a"])).unwrap();

        assert_eq!(store.read(ExtraType::Runes).unwrap(), ids(&["c", "a"]));
    }

    #[test]
    fn test_types_do_not_mix() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.write(ExtraType::Sigil1, &ids(&["force"])).unwrap();
        store.write(ExtraType::Sigil2, &ids(&["air"])).unwrap();
        store.write(ExtraType::Sigil1, &[]).unwrap();

        assert!(store.read(ExtraType::Sigil1).unwrap().is_empty());
        assert_eq!(store.read(ExtraType::Sigil2).unwrap(), ids(&["air"]));
    }

    #[test]
    fn test_duplicates_are_stored() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.write(ExtraType::Relics, &ids(&["a", "a"])).unwrap();
        assert_eq!(store.read(ExtraType::Relics).unwrap(), ids(&["a", "a"]));
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("selections.db");

        {
            let mut bridge = SelectionBridge::new(SqliteStore::open(&path).unwrap());
            bridge
                .toggle(ExtraType::Nourishment, &ItemId::new("food-rendang"), true)
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.read(ExtraType::Nourishment).unwrap(),
            ids(&["food-rendang"])
        );
    }
}
