//! Menu tree maintenance.
//!
//! Menu nodes form a forest stored in the `menus` table. Every group of
//! siblings (nodes sharing a `parent_id`, including the root group) keeps a
//! dense `order_index` sequence `0..n`. All operations that touch ordering
//! run inside a single transaction so the sequence is never observed with
//! gaps or duplicates.
//!
//! - [`order`]: shift arithmetic and the ranged `UPDATE`s that apply it
//! - [`tree`]: flat row list to nested forest
//! - [`service`]: [`MenuService`], the create/read/update/delete/move/reorder API

pub mod order;
pub mod service;
pub mod tree;

use uuid::Uuid;

pub use service::MenuService;

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// Malformed or out-of-range input.
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error("menu {0} not found")]
    NotFound(Uuid),
    /// A `parent_id` in the request points at a node that does not exist.
    #[error("parent menu {0} not found")]
    ParentNotFound(Uuid),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl MenuError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        MenuError::Validation { field, message: message.into() }
    }
}

pub type MenuResult<T> = Result<T, MenuError>;
