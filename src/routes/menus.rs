use axum::{
    extract::{FromRequest, FromRequestParts, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    types::{ApiResponse, MenuPatch, MoveMenuRequest, NewMenu, ReorderMenuRequest},
};

/// JSON body whose rejections render as the standard envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// The `{id}` path segment parsed as a menu id.
#[derive(FromRequestParts, Deserialize)]
#[from_request(via(Path), rejection(AppError))]
pub struct MenuId(pub Uuid);

// GET /api/menus
pub async fn get_menus(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.metrics.inc_tree_reads();
    let menus = state.menus.get_tree().await.map_err(|e| {
        tracing::error!("[get_menus] failed to fetch menu tree: {}", e);
        e
    })?;
    Ok(Json(ApiResponse::success(200, "Menus retrieved successfully", menus)))
}

// GET /api/menus/{id}
pub async fn get_menu(State(state): State<AppState>, MenuId(id): MenuId) -> AppResult<impl IntoResponse> {
    let menu = state.menus.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(200, "Menu retrieved successfully", menu)))
}

// POST /api/menus
pub async fn create_menu(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewMenu>,
) -> AppResult<impl IntoResponse> {
    let title = req.title.clone();
    let menu = state.menus.create(req).await.map_err(|e| {
        tracing::warn!("[create_menu] failed to create menu '{}': {}", title, e);
        e
    })?;
    state.metrics.inc_created();
    Ok((StatusCode::CREATED, Json(ApiResponse::success(201, "Menu created successfully", menu))))
}

// PUT /api/menus/{id}
pub async fn update_menu(
    State(state): State<AppState>,
    MenuId(id): MenuId,
    ApiJson(patch): ApiJson<MenuPatch>,
) -> AppResult<impl IntoResponse> {
    state.menus.update(id, patch).await.map_err(|e| {
        tracing::warn!("[update_menu] menu_id={} error: {}", id, e);
        e
    })?;
    state.metrics.inc_updated();
    let updated = state.menus.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(200, "Menu updated successfully", updated)))
}

// DELETE /api/menus/{id}
pub async fn delete_menu(State(state): State<AppState>, MenuId(id): MenuId) -> AppResult<impl IntoResponse> {
    state.menus.delete(id).await?;
    state.metrics.inc_deleted();
    Ok(Json(ApiResponse::message(200, "Menu deleted successfully")))
}

// PATCH /api/menus/{id}/move
pub async fn move_menu(
    State(state): State<AppState>,
    MenuId(id): MenuId,
    ApiJson(req): ApiJson<MoveMenuRequest>,
) -> AppResult<impl IntoResponse> {
    state.menus.move_to(id, req.parent_id).await.map_err(|e| {
        tracing::warn!("[move_menu] menu_id={} error: {}", id, e);
        e
    })?;
    state.metrics.inc_moved();
    let moved = state.menus.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(200, "Menu moved successfully", moved)))
}

// PATCH /api/menus/{id}/reorder
pub async fn reorder_menu(
    State(state): State<AppState>,
    MenuId(id): MenuId,
    ApiJson(req): ApiJson<ReorderMenuRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate()?;
    state.menus.reorder(id, req.new_index, req.old_index).await.map_err(|e| {
        tracing::warn!("[reorder_menu] menu_id={} new_index={} error: {}", id, req.new_index, e);
        e
    })?;
    state.metrics.inc_reordered();
    let reordered = state.menus.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(200, "Menu reordered successfully", reordered)))
}

// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}
