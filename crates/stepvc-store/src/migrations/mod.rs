//! Schema migrations for the version store
//!
//! The SQL files under `migrations/` are compiled into the binary and
//! applied in order. A ledger table records each applied migration with the
//! SHA-256 of its SQL, so an edited migration is caught instead of silently
//! diverging from databases that ran the old text.

mod catalog;
mod runner;

pub use catalog::{migration_ids, Migration, MIGRATIONS};
pub use runner::{applied_migrations, apply_migrations, MigrationReport, LEDGER_TABLE};
