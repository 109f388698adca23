//! Three-way merge over project documents.

use crate::diff::{leaf_diff, LeafChange};
use crate::errors::{Result, VcsError};
use crate::model::{ConflictType, MergeConflict, ProjectData, Resolution, ResolutionStrategy};
use crate::path::{clamp_to_array_end, delete_path, get_path, set_path, ValuePath};
use serde_json::Value;
use std::collections::HashMap;

/// Outcome of a three-way pass
#[derive(Debug, Clone, PartialEq)]
pub struct ThreeWayMerge {
    /// Target with every non-conflicting source change folded in
    pub merged: ProjectData,
    /// Conflicts with no matching resolution
    pub conflicts: Vec<MergeConflict>,
    /// Conflicts settled by a caller resolution
    pub resolved: Vec<MergeConflict>,
    /// Number of source changes applied onto the target
    pub applied: usize,
}

impl ThreeWayMerge {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// A pending write to the merged tree; `None` removes the path
struct Write {
    path: ValuePath,
    value: Option<Value>,
}

/// Merge `source` into `target` using `base` as the common ancestor
///
/// For every leaf path changed from `base` to `source`:
/// - target still holds the base value: take the source value;
/// - target already holds the source value: keep it;
/// - otherwise both sides diverged: apply the caller's resolution for that
///   path if one exists, else record a content conflict.
///
/// The result is returned even when conflicts remain; callers decide whether
/// to commit.
///
/// # Errors
///
/// - `InvalidResolution` for a `Manual` resolution without a value
/// - `Serialization` if a document cannot be converted to or from JSON
pub fn three_way_merge(
    base: &ProjectData,
    source: &ProjectData,
    target: &ProjectData,
    resolutions: &[Resolution],
) -> Result<ThreeWayMerge> {
    let base_v = base.to_value()?;
    let source_v = source.to_value()?;
    let target_v = target.to_value()?;

    let by_path: HashMap<&str, &Resolution> =
        resolutions.iter().map(|r| (r.path.as_str(), r)).collect();

    let mut writes = Vec::new();
    let mut conflicts = Vec::new();
    let mut resolved = Vec::new();
    let mut applied = 0;

    for LeafChange { path, change } in leaf_diff(&base_v, &source_v) {
        let b = get_path(&base_v, &path);
        let s = get_path(&source_v, &path);
        let t = get_path(&target_v, &path);

        if t == b {
            writes.push(Write {
                path,
                value: s.cloned(),
            });
            applied += 1;
            continue;
        }
        if t == s {
            continue;
        }

        let conflict = MergeConflict {
            path: change.path,
            conflict_type: ConflictType::Content,
            base_value: b.cloned(),
            source_value: s.cloned(),
            target_value: t.cloned(),
        };

        match by_path.get(conflict.path.as_str()) {
            Some(resolution) => {
                let value = resolve(resolution, &conflict)?;
                writes.push(Write { path, value });
                resolved.push(conflict);
            }
            None => conflicts.push(conflict),
        }
    }

    let mut merged = target_v;
    let (deletes, sets): (Vec<Write>, Vec<Write>) =
        writes.into_iter().partition(|w| w.value.is_none());

    for write in sets {
        let path = clamp_to_array_end(&merged, write.path);
        let rendered = path.to_string();
        if let Some(value) = write.value {
            if let Err(e) = set_path(&mut merged, &path, value.clone()) {
                // The target reshaped an intermediate container; surface it as
                // a conflict instead of failing the whole merge.
                tracing::debug!(path = %rendered, error = %e, "Merge write blocked by target structure");
                conflicts.push(MergeConflict {
                    path: rendered.clone(),
                    conflict_type: ConflictType::Content,
                    base_value: get_path(&base_v, &path).cloned(),
                    source_value: Some(value),
                    target_value: None,
                });
            }
        }
    }

    // Highest indices first so earlier removals do not shift later ones.
    let mut deletes = deletes;
    deletes.sort_by(|a, b| b.path.cmp(&a.path));
    for write in deletes {
        delete_path(&mut merged, &write.path);
    }

    conflicts.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ThreeWayMerge {
        merged: ProjectData::from_value(merged)?,
        conflicts,
        resolved,
        applied,
    })
}

fn resolve(resolution: &Resolution, conflict: &MergeConflict) -> Result<Option<Value>> {
    match resolution.strategy {
        ResolutionStrategy::UseSource => Ok(conflict.source_value.clone()),
        ResolutionStrategy::UseTarget => Ok(conflict.target_value.clone()),
        ResolutionStrategy::UseBase => Ok(conflict.base_value.clone()),
        ResolutionStrategy::Manual => match &resolution.value {
            Some(v) => Ok(Some(v.clone())),
            None => Err(VcsError::InvalidResolution {
                path: resolution.path.clone(),
                reason: "manual resolution requires a value".to_string(),
            }),
        },
    }
}
