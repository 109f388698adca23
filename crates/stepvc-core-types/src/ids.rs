//! Record identifiers
//!
//! Every stored record gets a UUIDv7 id so that ids sort roughly by
//! creation time. The kind prefix keeps ids self-describing in logs.

use uuid::Uuid;

/// The kind of record an id is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Snapshot,
    Commit,
    Branch,
    Tag,
    MergeRequest,
    Stash,
}

impl RecordKind {
    /// Stable prefix used in the textual id
    pub fn prefix(&self) -> &'static str {
        match self {
            RecordKind::Snapshot => "snap",
            RecordKind::Commit => "commit",
            RecordKind::Branch => "branch",
            RecordKind::Tag => "tag",
            RecordKind::MergeRequest => "mr",
            RecordKind::Stash => "stash",
        }
    }
}

/// Generate a fresh id of the form `<prefix>:<uuidv7>`
pub fn new_id(kind: RecordKind) -> String {
    format!("{}:{}", kind.prefix(), Uuid::now_v7())
}
