//! User accounts

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Store, StoreError, StoreResult};
use crate::model::{User, UserRole};

const USER_COLUMNS: &str = "id, name, email, role, team_id, phone, college, created_at";

/// Optional filters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub team_id: Option<String>,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        team_id: row.get(4)?,
        phone: row.get(5)?,
        college: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl Store {
    pub fn insert_user(&self, user: &User) -> StoreResult<()> {
        insert_user_with(&*self.conn()?, user)
    }

    pub fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 COLLATE NOCASE"),
                params![email],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE (?1 IS NULL OR role = ?1) AND (?2 IS NULL OR team_id = ?2)
             ORDER BY created_at, id"
        ))?;

        let users = stmt
            .query_map(params![filter.role, filter.team_id], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Replace every mutable field of an existing user
    pub fn update_user(&self, user: &User) -> StoreResult<()> {
        update_user_with(&*self.conn()?, user)
    }

    /// Insert `user` after `check` accepts the roster of the team they join.
    ///
    /// The roster read and the insert happen under one connection guard, so
    /// two concurrent joins cannot both see the last free slot.
    pub fn insert_user_checked<E, F>(&self, user: &User, check: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnOnce(&str, &[User]) -> Result<(), E>,
    {
        let conn = self.conn()?;
        check_roster(&conn, user, check)?;
        Ok(insert_user_with(&conn, user)?)
    }

    /// [`Store::update_user`] with the same roster check as
    /// [`Store::insert_user_checked`]. The user is left out of the roster
    /// handed to `check`.
    pub fn update_user_checked<E, F>(&self, user: &User, check: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnOnce(&str, &[User]) -> Result<(), E>,
    {
        let conn = self.conn()?;
        check_roster(&conn, user, check)?;
        Ok(update_user_with(&conn, user)?)
    }

    pub fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Leader and members of a team, leader first, then by join order
    pub fn team_members(&self, team_id: &str) -> StoreResult<Vec<User>> {
        team_members_with(&*self.conn()?, team_id)
    }
}

fn insert_user_with(conn: &Connection, user: &User) -> StoreResult<()> {
    conn.execute(
        &format!("INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        params![
            user.id,
            user.name,
            user.email,
            user.role,
            user.team_id,
            user.phone,
            user.college,
            user.created_at
        ],
    )
    .map_err(|e| StoreError::from_write(e, &format!("User with email {}", user.email)))?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Inserted user");
    Ok(())
}

fn update_user_with(conn: &Connection, user: &User) -> StoreResult<()> {
    let changed = conn
        .execute(
            "UPDATE users SET name = ?2, email = ?3, role = ?4, team_id = ?5, phone = ?6, college = ?7
             WHERE id = ?1",
            params![
                user.id,
                user.name,
                user.email,
                user.role,
                user.team_id,
                user.phone,
                user.college
            ],
        )
        .map_err(|e| StoreError::from_write(e, &format!("User with email {}", user.email)))?;

    if changed == 0 {
        return Err(StoreError::not_found("User", &user.id));
    }
    Ok(())
}

fn team_members_with(conn: &Connection, team_id: &str) -> StoreResult<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users
         WHERE team_id = ?1 AND role IN ('team_leader', 'team_member')
         ORDER BY CASE role WHEN 'team_leader' THEN 0 ELSE 1 END, created_at, id"
    ))?;

    let users = stmt
        .query_map(params![team_id], user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// Run `check` against the roster `user` is about to join, if any
fn check_roster<E, F>(conn: &Connection, user: &User, check: F) -> Result<(), E>
where
    E: From<StoreError>,
    F: FnOnce(&str, &[User]) -> Result<(), E>,
{
    let Some(team_id) = user.team_id.as_deref() else {
        return Ok(());
    };

    let exists = conn
        .query_row("SELECT 1 FROM teams WHERE id = ?1", params![team_id], |_| Ok(()))
        .optional()
        .map_err(StoreError::from)?
        .is_some();
    if !exists {
        return Err(StoreError::not_found("Team", team_id).into());
    }

    let mut members = team_members_with(conn, team_id)?;
    members.retain(|m| m.id != user.id);
    check(team_id, &members)
}
