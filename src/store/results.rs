//! Judged results

use rusqlite::{params, OptionalExtension, Row};

use super::{Store, StoreError, StoreResult};
use crate::model::ResultEntry;

fn result_from_row(row: &Row<'_>) -> rusqlite::Result<ResultEntry> {
    Ok(ResultEntry {
        id: row.get(0)?,
        team_id: row.get(1)?,
        round: row.get(2)?,
        score: row.get(3)?,
        remarks: row.get(4)?,
        published_at: row.get(5)?,
    })
}

impl Store {
    pub fn insert_result(&self, entry: &ResultEntry) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO results (id, team_id, round, score, remarks, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.team_id,
                entry.round,
                entry.score,
                entry.remarks,
                entry.published_at
            ],
        )
        .map_err(|e| StoreError::from_write(e, &format!("Result {}", entry.id)))?;
        Ok(())
    }

    pub fn get_result(&self, id: &str) -> StoreResult<Option<ResultEntry>> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                "SELECT id, team_id, round, score, remarks, published_at FROM results WHERE id = ?1",
                params![id],
                result_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Results ordered by round then score (highest first)
    pub fn list_results(&self, team_id: Option<&str>) -> StoreResult<Vec<ResultEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, team_id, round, score, remarks, published_at FROM results
             WHERE (?1 IS NULL OR team_id = ?1)
             ORDER BY round, score DESC, published_at",
        )?;
        let entries = stmt
            .query_map(params![team_id], result_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn update_result(&self, entry: &ResultEntry) -> StoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE results SET round = ?2, score = ?3, remarks = ?4 WHERE id = ?1",
            params![entry.id, entry.round, entry.score, entry.remarks],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("Result", &entry.id));
        }
        Ok(())
    }

    pub fn delete_result(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM results WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Team;

    #[test]
    fn test_results_ordering_and_filter() {
        let store = Store::open_in_memory().unwrap();
        let a = Team::new("A");
        let b = Team::new("B");
        store.insert_team(&a).unwrap();
        store.insert_team(&b).unwrap();

        store.insert_result(&ResultEntry::new(&a.id, "Round 1", 6.0)).unwrap();
        store.insert_result(&ResultEntry::new(&b.id, "Round 1", 8.0)).unwrap();
        store
            .insert_result(&ResultEntry::new(&a.id, "Round 2", 7.5).remarks("Solid demo"))
            .unwrap();

        let all = store.list_results(None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].team_id, b.id);
        assert_eq!(all[2].round, "Round 2");

        let only_a = store.list_results(Some(a.id.as_str())).unwrap();
        assert_eq!(only_a.len(), 2);
    }

    #[test]
    fn test_result_requires_team() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .insert_result(&ResultEntry::new("no-such-team", "Round 1", 1.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_) | StoreError::Database(_)));
    }

    #[test]
    fn test_update_and_delete() {
        let store = Store::open_in_memory().unwrap();
        let team = Team::new("T");
        store.insert_team(&team).unwrap();
        let mut entry = ResultEntry::new(&team.id, "Round 1", 5.0);
        store.insert_result(&entry).unwrap();

        entry.score = 9.5;
        store.update_result(&entry).unwrap();
        assert_eq!(store.get_result(&entry.id).unwrap().unwrap().score, 9.5);

        assert!(store.delete_result(&entry.id).unwrap());
        assert!(store.get_result(&entry.id).unwrap().is_none());
        assert!(matches!(
            store.update_result(&entry).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
