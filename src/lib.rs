//! # Menutree Backend Library
//!
//! Core library for Menutree, a REST backend that stores a hierarchical
//! navigation menu and keeps every level of it in a stable, gap-free order.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server and routing
//! - **SQLx**: Asynchronous database operations with SQLite
//! - **Tokio**: Async runtime
//! - **Serde**: Serialization/deserialization for JSON APIs
//!
//! ## Core Components
//!
//! - [`config`]: Application configuration management
//! - [`db`]: Connection pool and schema initialization
//! - [`error`]: HTTP error type and the error envelope
//! - [`menu`]: Menu tree service (ordering, reparenting, tree assembly)
//! - [`metrics`]: Operation counters
//! - [`routes`]: HTTP API endpoint handlers
//! - [`state`]: Shared application state
//! - [`types`]: Menu model, request payloads and the response envelope
//!
//! ## Features
//!
//! - Dense per-level ordering maintained across create, delete, move and reorder
//! - Subtree delete and cycle-safe reparenting
//! - Whole-forest reads assembled from a single query
//! - Health, readiness and Prometheus metrics endpoints

pub mod config;
pub mod db;
pub mod error;
pub mod menu;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
