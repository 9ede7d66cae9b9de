//! Order-index bookkeeping for sibling groups.
//!
//! Moving a node inside a dense sequence is the array operation "remove at
//! `old`, insert at `new`": every sibling strictly between the two positions
//! moves one step towards the gap. [`Shift`] describes that step and the
//! functions below express it as ranged `UPDATE` statements.

use std::cmp::Ordering;

use sqlx::SqliteConnection;
use uuid::Uuid;

use super::{MenuError, MenuResult};

/// Siblings with `from <= order_index <= to` move by `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub from: i64,
    pub to: i64,
    pub delta: i64,
}

impl Shift {
    /// The shift applied to the other siblings when one node moves from `old` to `new`.
    pub fn for_reorder(old: i64, new: i64) -> Option<Shift> {
        match old.cmp(&new) {
            Ordering::Equal => None,
            Ordering::Less => Some(Shift { from: old + 1, to: new, delta: -1 }),
            Ordering::Greater => Some(Shift { from: new, to: old - 1, delta: 1 }),
        }
    }

    pub fn apply(&self, index: i64) -> i64 {
        if (self.from..=self.to).contains(&index) {
            index + self.delta
        } else {
            index
        }
    }
}

/// Resolves a reorder target within a group of `count` siblings (the node included).
///
/// Targets past the end are clamped to the last position.
pub fn clamp_target(new_index: i64, count: i64) -> MenuResult<i64> {
    if new_index < 0 || count <= 0 {
        return Err(MenuError::validation("new_index", "invalid target position"));
    }
    Ok(new_index.min(count - 1))
}

/// Position for a node inserted into a group that currently has `count` members.
pub fn insert_position(requested: Option<i64>, count: i64) -> i64 {
    match requested {
        Some(idx) if idx < count => idx.max(0),
        _ => count,
    }
}

pub(crate) fn key(id: Option<Uuid>) -> Option<String> {
    id.map(|id| id.to_string())
}

// SQLite takes its write lock on the first write of a transaction. Every
// mutating transaction starts with one of these no-op writes so that
// concurrent writers wait on busy_timeout before reading anything.

pub(crate) async fn lock_node(conn: &mut SqliteConnection, id: Uuid) -> sqlx::Result<()> {
    sqlx::query("UPDATE menus SET order_index = order_index WHERE id = ?1")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn lock_group(conn: &mut SqliteConnection, parent: Option<Uuid>) -> sqlx::Result<()> {
    sqlx::query("UPDATE menus SET order_index = order_index WHERE parent_id IS ?1")
        .bind(key(parent))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn sibling_count(conn: &mut SqliteConnection, parent: Option<Uuid>) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM menus WHERE parent_id IS ?1")
        .bind(key(parent))
        .fetch_one(&mut *conn)
        .await
}

/// Applies `shift` to every sibling of `node` in `parent`'s group, `node` itself excluded.
pub(crate) async fn apply_shift(
    conn: &mut SqliteConnection,
    parent: Option<Uuid>,
    node: Uuid,
    shift: Shift,
) -> sqlx::Result<u64> {
    let res = sqlx::query(
        r#"UPDATE menus SET order_index = order_index + ?1
           WHERE parent_id IS ?2 AND id <> ?3 AND order_index BETWEEN ?4 AND ?5"#,
    )
    .bind(shift.delta)
    .bind(key(parent))
    .bind(node.to_string())
    .bind(shift.from)
    .bind(shift.to)
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected())
}

/// Makes room at `at` by pushing every sibling at or after it one step back.
pub(crate) async fn open_slot(conn: &mut SqliteConnection, parent: Option<Uuid>, at: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(
        "UPDATE menus SET order_index = order_index + 1 WHERE parent_id IS ?1 AND order_index >= ?2",
    )
    .bind(key(parent))
    .bind(at)
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected())
}

/// Closes the hole left at `at` after a node leaves the group.
pub(crate) async fn close_gap(conn: &mut SqliteConnection, parent: Option<Uuid>, at: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(
        "UPDATE menus SET order_index = order_index - 1 WHERE parent_id IS ?1 AND order_index > ?2",
    )
    .bind(key(parent))
    .bind(at)
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected())
}
