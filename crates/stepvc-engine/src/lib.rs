//! stepvc engine - orchestration layer
//!
//! Coordinates the pure kernel in `stepvc-core` with SQLite persistence in
//! `stepvc-store`. Commands are free functions over a `rusqlite::Connection`;
//! [`VersionEngine`] owns a connection plus the event bus and exposes the
//! consumer API.

pub mod commands;
pub mod engine;

pub use commands::cleanup::CleanupReport;
pub use commands::commit::CommitOptions;
pub use commands::merge::MergeOutcome;
pub use commands::restore::RestorePreview;
pub use engine::VersionEngine;
