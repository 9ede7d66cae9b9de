//! Flat rows to nested forest.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::Menu;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MenuRow {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub order_index: i64,
    pub created_at: String,
    pub updated_at: String,
}

pub(crate) const MENU_COLUMNS: &str =
    "id, parent_id, title, path, icon, order_index, created_at, updated_at";

fn parse_id(raw: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl TryFrom<MenuRow> for Menu {
    type Error = sqlx::Error;

    fn try_from(row: MenuRow) -> Result<Self, Self::Error> {
        Ok(Menu {
            id: parse_id(&row.id)?,
            parent_id: row.parent_id.as_deref().map(parse_id).transpose()?,
            title: row.title,
            path: row.path,
            icon: row.icon,
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
            children: Vec::new(),
        })
    }
}

/// Assembles a forest from `nodes`, which must already be sorted by `order_index`.
///
/// Roots are the nodes without a parent. Each node is emitted at most once,
/// under its actual parent, and sibling order follows the input order.
/// Nodes that cannot be reached from a root (dangling parent, cycles) are dropped.
pub fn build_forest(nodes: Vec<Menu>) -> Vec<Menu> {
    let mut children_of: HashMap<Option<Uuid>, Vec<usize>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        children_of.entry(node.parent_id).or_default().push(i);
    }

    let mut slots: Vec<Option<Menu>> = nodes.into_iter().map(Some).collect();
    let roots = children_of.remove(&None).unwrap_or_default();
    roots
        .into_iter()
        .filter_map(|i| materialize(i, &mut slots, &children_of))
        .collect()
}

fn materialize(
    i: usize,
    slots: &mut [Option<Menu>],
    children_of: &HashMap<Option<Uuid>, Vec<usize>>,
) -> Option<Menu> {
    let mut node = slots[i].take()?;
    if let Some(kids) = children_of.get(&Some(node.id)) {
        node.children = kids.iter().filter_map(|&k| materialize(k, slots, children_of)).collect();
    }
    Some(node)
}
