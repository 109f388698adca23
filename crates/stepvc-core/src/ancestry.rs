//! Ancestry over single-parent commit chains.
//!
//! Chains are walked iteratively from a head through `parent_id` links with
//! a seen-set, so long histories never grow the call stack and a corrupted
//! cycle terminates the walk. A parent id that no longer resolves (for
//! example after retention cleanup pruned it) ends the chain as if a root
//! had been reached.
//!
//! The parent lookup is abstracted behind [`CommitSource`] so the same walk
//! runs against the SQLite store or an in-memory map.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Result of looking up one commit's parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLookup {
    /// Commit exists; carries its parent id (None for a root)
    Found(Option<String>),
    /// Commit id does not resolve
    Missing,
}

/// Anything that can resolve a commit id to its parent
pub trait CommitSource {
    type Error;

    fn parent_of(&self, commit_id: &str) -> Result<ParentLookup, Self::Error>;
}

impl CommitSource for BTreeMap<String, Option<String>> {
    type Error = std::convert::Infallible;

    fn parent_of(&self, commit_id: &str) -> Result<ParentLookup, Self::Error> {
        Ok(match self.get(commit_id) {
            Some(parent) => ParentLookup::Found(parent.clone()),
            None => ParentLookup::Missing,
        })
    }
}

impl CommitSource for HashMap<String, Option<String>> {
    type Error = std::convert::Infallible;

    fn parent_of(&self, commit_id: &str) -> Result<ParentLookup, Self::Error> {
        Ok(match self.get(commit_id) {
            Some(parent) => ParentLookup::Found(parent.clone()),
            None => ParentLookup::Missing,
        })
    }
}

/// Commit ids from `head` back to the root, head first
///
/// Ids that do not resolve are not included. A repeated id stops the walk.
pub fn commit_chain<S: CommitSource + ?Sized>(
    source: &S,
    head: &str,
) -> Result<Vec<String>, S::Error> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = Some(head.to_string());

    while let Some(id) = cursor.take() {
        if !seen.insert(id.clone()) {
            tracing::warn!(commit_id = %id, "Cycle detected in commit chain; stopping walk");
            break;
        }
        match source.parent_of(&id)? {
            ParentLookup::Found(parent) => {
                chain.push(id);
                cursor = parent;
            }
            ParentLookup::Missing => {
                tracing::debug!(commit_id = %id, "Commit chain reached a pruned or unknown id");
                break;
            }
        }
    }

    Ok(chain)
}

/// First id of `chain_a` that also appears in `chain_b`
///
/// For linear chains this is the most recent shared ancestor.
pub fn find_common_ancestor(chain_a: &[String], chain_b: &[String]) -> Option<String> {
    let in_b: HashSet<&str> = chain_b.iter().map(|s| s.as_str()).collect();
    chain_a.iter().find(|id| in_b.contains(id.as_str())).cloned()
}

/// True when `ancestor` lies on `chain`
pub fn chain_contains(chain: &[String], ancestor: &str) -> bool {
    chain.iter().any(|id| id == ancestor)
}

/// Commits each side has that the other lacks: `(ahead, behind)`
///
/// `ahead` counts source commits above the common ancestor and `behind`
/// counts target commits above it. With no shared ancestor every commit of
/// each chain counts.
pub fn ahead_behind(
    source_chain: &[String],
    target_chain: &[String],
    ancestor: Option<&str>,
) -> (usize, usize) {
    match ancestor {
        Some(a) => {
            let ahead = source_chain
                .iter()
                .position(|id| id == a)
                .unwrap_or(source_chain.len());
            let behind = target_chain
                .iter()
                .position(|id| id == a)
                .unwrap_or(target_chain.len());
            (ahead, behind)
        }
        None => (source_chain.len(), target_chain.len()),
    }
}
