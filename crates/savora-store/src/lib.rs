//! # savora-store
//!
//! Relational persistence for the Savora content service, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model: profiles, recipes, video lessons, favorites, notifications,
//! activities, chat messages, and video view events.

pub mod activities;
pub mod chat;
pub mod database;
pub mod favorites;
pub mod migrations;
pub mod models;
pub mod notifications;
pub mod profiles;
pub mod recipes;
pub mod videos;
pub mod views;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use favorites::FavoriteToggle;
pub use models::*;
