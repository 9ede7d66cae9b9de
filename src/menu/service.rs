use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::order::{self, key, Shift};
use super::tree::{self, MenuRow, MENU_COLUMNS};
use super::{MenuError, MenuResult};
use crate::types::{Menu, MenuPatch, NewMenu, Patch};

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ','now')";

/// Create/read/update/delete/move/reorder over the `menus` table.
///
/// The service holds nothing but the pool handle; every call reads the
/// current state from the store.
#[derive(Clone)]
pub struct MenuService {
    db: SqlitePool,
}

impl MenuService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts a node. Without `order_index`, or with one past the end, the
    /// node is appended; otherwise later siblings move back to make room.
    pub async fn create(&self, input: NewMenu) -> MenuResult<Menu> {
        input.validate()?;

        let mut tx = self.db.begin().await?;
        order::lock_group(&mut tx, input.parent_id).await?;
        if let Some(parent) = input.parent_id {
            if fetch_row(&mut tx, parent).await?.is_none() {
                return Err(MenuError::ParentNotFound(parent));
            }
        }

        let count = order::sibling_count(&mut tx, input.parent_id).await?;
        let position = order::insert_position(input.order_index, count);
        if position < count {
            order::open_slot(&mut tx, input.parent_id, position).await?;
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO menus (id, parent_id, title, path, icon, order_index)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
        )
        .bind(id.to_string())
        .bind(key(input.parent_id))
        .bind(&input.title)
        .bind(&input.path)
        .bind(&input.icon)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        let row = fetch_row(&mut tx, id).await?.ok_or(MenuError::NotFound(id))?;
        tx.commit().await?;

        tracing::info!(menu_id = %id, parent_id = ?input.parent_id, order_index = position, "menu created");
        Ok(Menu::try_from(row)?)
    }

    /// The node with its direct children.
    pub async fn get_by_id(&self, id: Uuid) -> MenuResult<Menu> {
        let mut conn = self.db.acquire().await?;
        let row = fetch_row(&mut conn, id).await?.ok_or(MenuError::NotFound(id))?;
        let mut menu = Menu::try_from(row)?;

        let sql = format!(
            "SELECT {} FROM menus WHERE parent_id = ?1 ORDER BY order_index ASC, created_at ASC, id ASC",
            MENU_COLUMNS
        );
        let children: Vec<MenuRow> = sqlx::query_as(&sql).bind(id.to_string()).fetch_all(&mut *conn).await?;
        menu.children = children.into_iter().map(Menu::try_from).collect::<Result<_, _>>()?;
        Ok(menu)
    }

    /// The whole forest, roots and every level of children ordered by `order_index`.
    pub async fn get_tree(&self) -> MenuResult<Vec<Menu>> {
        let sql = format!("SELECT {} FROM menus ORDER BY order_index ASC, created_at ASC, id ASC", MENU_COLUMNS);
        let rows: Vec<MenuRow> = sqlx::query_as(&sql).fetch_all(&self.db).await?;
        let nodes = rows.into_iter().map(Menu::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(tree::build_forest(nodes))
    }

    /// Applies a partial update. A new `parent_id` follows the [`move_to`](Self::move_to)
    /// rules and a new `order_index` the [`reorder`](Self::reorder) rules; everything
    /// commits together. A patch with no fields only checks that the node exists.
    pub async fn update(&self, id: Uuid, patch: MenuPatch) -> MenuResult<()> {
        patch.validate()?;

        let mut tx = self.db.begin().await?;
        order::lock_node(&mut tx, id).await?;
        let mut current = fetch_menu(&mut tx, id).await?;
        if patch.is_empty() {
            tracing::debug!(menu_id = %id, "empty update ignored");
            return Ok(());
        }

        match patch.parent_id {
            Patch::Absent => {}
            Patch::Null => current = relocate(&mut tx, current, None).await?,
            Patch::Value(parent) => current = relocate(&mut tx, current, Some(parent)).await?,
        }

        if let Patch::Value(new_index) = patch.order_index {
            if new_index != current.order_index {
                shift_within_group(&mut tx, &current, new_index).await?;
            }
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE menus SET updated_at = ");
        qb.push(NOW);
        if let Patch::Value(title) = &patch.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(path) = patch.path.as_update() {
            qb.push(", path = ").push_bind(path.cloned());
        }
        if let Some(icon) = patch.icon.as_update() {
            qb.push(", icon = ").push_bind(icon.cloned());
        }
        qb.push(" WHERE id = ").push_bind(id.to_string());
        qb.build().execute(&mut *tx).await?;

        tx.commit().await?;
        tracing::info!(menu_id = %id, "menu updated");
        Ok(())
    }

    /// Deletes the node and its whole subtree, then closes the gap in the
    /// surviving sibling group. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: Uuid) -> MenuResult<()> {
        let mut tx = self.db.begin().await?;
        order::lock_node(&mut tx, id).await?;
        let Some(row) = fetch_row(&mut tx, id).await? else {
            tracing::debug!(menu_id = %id, "delete of unknown menu ignored");
            return Ok(());
        };
        let node = Menu::try_from(row)?;

        let removed = sqlx::query(
            r#"WITH RECURSIVE subtree(id) AS (
                   SELECT id FROM menus WHERE id = ?1
                   UNION
                   SELECT m.id FROM menus m JOIN subtree s ON m.parent_id = s.id
               )
               DELETE FROM menus WHERE id IN (SELECT id FROM subtree)"#,
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        order::close_gap(&mut tx, node.parent_id, node.order_index).await?;

        tx.commit().await?;
        tracing::info!(menu_id = %id, removed, "menu deleted");
        Ok(())
    }

    /// Reparents a node. It leaves a closed gap behind and is appended to the
    /// end of the destination group.
    pub async fn move_to(&self, id: Uuid, new_parent_id: Option<Uuid>) -> MenuResult<()> {
        let mut tx = self.db.begin().await?;
        order::lock_node(&mut tx, id).await?;
        let current = fetch_menu(&mut tx, id).await?;
        let moved = relocate(&mut tx, current, new_parent_id).await?;
        tx.commit().await?;

        tracing::info!(menu_id = %id, parent_id = ?moved.parent_id, order_index = moved.order_index, "menu moved");
        Ok(())
    }

    /// Moves a node to `new_index` within its sibling group.
    ///
    /// `old_index`, when given, must match the stored position. Targets past
    /// the end of the group are clamped to the last position.
    pub async fn reorder(&self, id: Uuid, new_index: i64, old_index: Option<i64>) -> MenuResult<()> {
        if new_index < 0 {
            return Err(MenuError::validation("new_index", "invalid target position"));
        }

        let mut tx = self.db.begin().await?;
        order::lock_node(&mut tx, id).await?;
        let current = fetch_menu(&mut tx, id).await?;
        if let Some(old) = old_index {
            if old != current.order_index {
                return Err(MenuError::validation(
                    "old_index",
                    format!("old_index {} does not match current position {}", old, current.order_index),
                ));
            }
        }

        let target = shift_within_group(&mut tx, &current, new_index).await?;
        tx.commit().await?;

        tracing::info!(menu_id = %id, from = current.order_index, to = target, "menu reordered");
        Ok(())
    }
}

async fn fetch_row(conn: &mut SqliteConnection, id: Uuid) -> sqlx::Result<Option<MenuRow>> {
    let sql = format!("SELECT {} FROM menus WHERE id = ?1", MENU_COLUMNS);
    sqlx::query_as(&sql).bind(id.to_string()).fetch_optional(&mut *conn).await
}

async fn fetch_menu(conn: &mut SqliteConnection, id: Uuid) -> MenuResult<Menu> {
    let row = fetch_row(conn, id).await?.ok_or(MenuError::NotFound(id))?;
    Ok(Menu::try_from(row)?)
}

/// Shift-then-set inside the caller's transaction. Returns the clamped target.
async fn shift_within_group(conn: &mut SqliteConnection, node: &Menu, new_index: i64) -> MenuResult<i64> {
    let count = order::sibling_count(conn, node.parent_id).await?;
    let target = order::clamp_target(new_index, count)?;
    let Some(shift) = Shift::for_reorder(node.order_index, target) else {
        return Ok(target);
    };

    order::apply_shift(conn, node.parent_id, node.id, shift).await?;
    let sql = format!("UPDATE menus SET order_index = ?1, updated_at = {} WHERE id = ?2", NOW);
    sqlx::query(&sql).bind(target).bind(node.id.to_string()).execute(&mut *conn).await?;
    Ok(target)
}

/// Reparents `node` inside the caller's transaction and returns its new state.
async fn relocate(conn: &mut SqliteConnection, node: Menu, new_parent: Option<Uuid>) -> MenuResult<Menu> {
    if new_parent == node.parent_id {
        return Ok(node);
    }
    if let Some(parent) = new_parent {
        if parent == node.id {
            return Err(MenuError::validation("parent_id", "menu cannot be its own parent"));
        }
        if fetch_row(conn, parent).await?.is_none() {
            return Err(MenuError::ParentNotFound(parent));
        }
        if is_ancestor(conn, node.id, parent).await? {
            return Err(MenuError::validation("parent_id", "menu cannot be moved below its own descendant"));
        }
    }

    order::close_gap(conn, node.parent_id, node.order_index).await?;
    let position = order::sibling_count(conn, new_parent).await?;
    let sql = format!(
        "UPDATE menus SET parent_id = ?1, order_index = ?2, updated_at = {} WHERE id = ?3",
        NOW
    );
    sqlx::query(&sql)
        .bind(key(new_parent))
        .bind(position)
        .bind(node.id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(Menu { parent_id: new_parent, order_index: position, ..node })
}

/// Whether `ancestor` lies on the parent chain of `node`. `UNION` keeps the
/// walk finite even if the stored data already contains a cycle.
async fn is_ancestor(conn: &mut SqliteConnection, ancestor: Uuid, node: Uuid) -> sqlx::Result<bool> {
    let hits: i64 = sqlx::query_scalar(
        r#"WITH RECURSIVE chain(id, parent_id) AS (
               SELECT id, parent_id FROM menus WHERE id = ?1
               UNION
               SELECT m.id, m.parent_id FROM menus m JOIN chain c ON m.id = c.parent_id
           )
           SELECT COUNT(*) FROM chain WHERE id = ?2"#,
    )
    .bind(node.to_string())
    .bind(ancestor.to_string())
    .fetch_one(&mut *conn)
    .await?;
    Ok(hits > 0)
}
