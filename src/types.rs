use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::menu::MenuError;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_PATH_LEN: usize = 255;
pub const MAX_ICON_LEN: usize = 100;

/// A navigation entry. `children` is never stored; it is filled in on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order_index: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Menu>,
}

/// Input for creating a menu node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMenu {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order_index: Option<i64>,
}

impl NewMenu {
    pub fn validate(&self) -> Result<(), MenuError> {
        validate_title(&self.title)?;
        if let Some(path) = &self.path {
            validate_len("path", path, MAX_PATH_LEN)?;
        }
        if let Some(icon) = &self.icon {
            validate_len("icon", icon, MAX_ICON_LEN)?;
        }
        if let Some(idx) = self.order_index {
            validate_index("order_index", idx)?;
        }
        Ok(())
    }
}

/// One field of a partial update.
///
/// A missing JSON key deserializes to `Absent` (via `#[serde(default)]`),
/// an explicit `null` to `Null` and anything else to `Value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// `None` when absent, `Some(None)` for an explicit null.
    pub fn as_update(&self) -> Option<Option<&T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Partial update of a menu node. Only fields that are not `Absent` are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuPatch {
    #[serde(default)]
    pub parent_id: Patch<Uuid>,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub path: Patch<String>,
    #[serde(default)]
    pub icon: Patch<String>,
    #[serde(default)]
    pub order_index: Patch<i64>,
}

impl MenuPatch {
    pub fn validate(&self) -> Result<(), MenuError> {
        match &self.title {
            Patch::Absent => {}
            Patch::Null => return Err(MenuError::validation("title", "title cannot be null")),
            Patch::Value(title) => validate_title(title)?,
        }
        if let Patch::Value(path) = &self.path {
            validate_len("path", path, MAX_PATH_LEN)?;
        }
        if let Patch::Value(icon) = &self.icon {
            validate_len("icon", icon, MAX_ICON_LEN)?;
        }
        match self.order_index {
            Patch::Absent => {}
            Patch::Null => {
                return Err(MenuError::validation("order_index", "order_index cannot be null"))
            }
            Patch::Value(idx) => validate_index("order_index", idx)?,
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.parent_id.is_absent()
            && self.title.is_absent()
            && self.path.is_absent()
            && self.icon.is_absent()
            && self.order_index.is_absent()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveMenuRequest {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderMenuRequest {
    pub new_index: i64,
    #[serde(default)]
    pub old_index: Option<i64>,
}

impl ReorderMenuRequest {
    pub fn validate(&self) -> Result<(), MenuError> {
        validate_index("new_index", self.new_index)?;
        if let Some(old) = self.old_index {
            validate_index("old_index", old)?;
        }
        Ok(())
    }
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(status: u16, message: impl Into<String>, data: T) -> Self {
        Self { status, message: message.into(), data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), data: None, error: None }
    }

    pub fn failure(status: u16, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { status, message: message.into(), data: None, error: Some(error.into()) }
    }
}

fn validate_title(title: &str) -> Result<(), MenuError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(MenuError::validation("title", "title is required and cannot be empty"));
    }
    validate_len("title", title, MAX_TITLE_LEN)
}

fn validate_len(field: &'static str, value: &str, max: usize) -> Result<(), MenuError> {
    if value.chars().count() > max {
        return Err(MenuError::validation(field, format!("{} cannot exceed {} characters", field, max)));
    }
    Ok(())
}

fn validate_index(field: &'static str, value: i64) -> Result<(), MenuError> {
    if value < 0 {
        return Err(MenuError::validation(field, format!("{} must be a non-negative integer", field)));
    }
    Ok(())
}
