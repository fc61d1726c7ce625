//! Teams

use rusqlite::{params, OptionalExtension, Row};

use super::{Store, StoreError, StoreResult};
use crate::model::Team;

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        project_title: row.get(2)?,
        track: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Store {
    pub fn insert_team(&self, team: &Team) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO teams (id, name, project_title, track, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![team.id, team.name, team.project_title, team.track, team.created_at],
        )
        .map_err(|e| StoreError::from_write(e, &format!("Team '{}'", team.name)))?;

        tracing::debug!(team_id = %team.id, name = %team.name, "Inserted team");
        Ok(())
    }

    pub fn get_team(&self, id: &str) -> StoreResult<Option<Team>> {
        let conn = self.conn()?;
        let team = conn
            .query_row(
                "SELECT id, name, project_title, track, created_at FROM teams WHERE id = ?1",
                params![id],
                team_from_row,
            )
            .optional()?;
        Ok(team)
    }

    pub fn list_teams(&self) -> StoreResult<Vec<Team>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, project_title, track, created_at FROM teams ORDER BY name COLLATE NOCASE",
        )?;
        let teams = stmt
            .query_map([], team_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(teams)
    }

    pub fn update_team(&self, team: &Team) -> StoreResult<()> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE teams SET name = ?2, project_title = ?3, track = ?4 WHERE id = ?1",
                params![team.id, team.name, team.project_title, team.track],
            )
            .map_err(|e| StoreError::from_write(e, &format!("Team '{}'", team.name)))?;

        if changed == 0 {
            return Err(StoreError::not_found("Team", &team.id));
        }
        Ok(())
    }

    /// Delete a team with its results and payments; members are detached, not deleted
    pub fn delete_team(&self, id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("UPDATE users SET team_id = NULL WHERE team_id = ?1", params![id])?;
        tx.execute("DELETE FROM results WHERE team_id = ?1", params![id])?;
        tx.execute("DELETE FROM payments WHERE team_id = ?1", params![id])?;
        let removed = tx.execute("DELETE FROM teams WHERE id = ?1", params![id])?;

        tx.commit()?;

        if removed > 0 {
            tracing::info!(team_id = %id, "Deleted team");
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResultEntry, User, UserRole};

    #[test]
    fn test_insert_get_list() {
        let store = Store::open_in_memory().unwrap();
        let b = Team::new("beta").track("Fintech");
        let a = Team::new("Alpha");
        store.insert_team(&b).unwrap();
        store.insert_team(&a).unwrap();

        assert_eq!(store.get_team(&b.id).unwrap().unwrap(), b);
        let names: Vec<_> = store.list_teams().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_duplicate_name_conflicts() {
        let store = Store::open_in_memory().unwrap();
        store.insert_team(&Team::new("Same")).unwrap();
        let err = store.insert_team(&Team::new("Same")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_update_missing_team() {
        let store = Store::open_in_memory().unwrap();
        let err = store.update_team(&Team::new("Ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "Team", .. }));
    }

    #[test]
    fn test_delete_cascades() {
        let store = Store::open_in_memory().unwrap();
        let team = Team::new("Doomed");
        store.insert_team(&team).unwrap();
        let user = User::new("Lead", "lead@example.com", UserRole::TeamLeader).team(&team.id);
        store.insert_user(&user).unwrap();
        store
            .insert_result(&ResultEntry::new(&team.id, "Final", 9.0))
            .unwrap();

        assert!(store.delete_team(&team.id).unwrap());
        assert!(store.get_team(&team.id).unwrap().is_none());
        assert!(store.list_results(Some(team.id.as_str())).unwrap().is_empty());

        let detached = store.get_user(&user.id).unwrap().unwrap();
        assert!(detached.team_id.is_none());

        assert!(!store.delete_team(&team.id).unwrap());
    }
}
