//! stepvc store - SQLite persistence for the versioning engine
//!
//! Provides:
//! - Connection management (`db`)
//! - Embedded, checksummed migrations
//! - One repository per collection, all as associated functions on
//!   [`SqliteRepo`] taking `&Connection` so they compose inside transactions

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{SqliteCommitSource, SqliteRepo};
