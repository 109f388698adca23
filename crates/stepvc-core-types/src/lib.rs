//! Core types shared across stepvc facilities
//!
//! This crate provides foundational types used by the error handling,
//! logging and persistence layers:
//!
//! - **Schema constants**: Canonical field keys and event names
//! - **Identifiers**: UUIDv7 id generation for stored records

pub mod ids;
pub mod schema;

pub use ids::{new_id, RecordKind};
