//! Re-applying a recorded change list onto a document.

use crate::errors::Result;
use crate::model::{Change, ChangeType, ProjectData};
use crate::path::{clamp_to_array_end, delete_path, set_path, ValuePath};

/// Apply `changes` on top of `base`
///
/// Adds and modifications write `new_value` at their path; deletions remove
/// the path. An add past the end of a list that has since shrunk is
/// appended instead. Paths are parsed with their escapes, so a key such as
/// `user.name` is written back as one key. Deletions run last, highest index first, so positional step
/// removals do not shift each other. A rename moves `old_value`'s path to the
/// path recorded under `metadata.to`.
///
/// # Errors
///
/// `InvalidPath` for an unparseable path or a write through a scalar, and
/// `Serialization` if the result is no longer a valid project document.
pub fn apply_changes(base: &ProjectData, changes: &[Change]) -> Result<ProjectData> {
    let mut root = base.to_value()?;
    let mut deletes = Vec::new();

    for change in changes {
        let path = ValuePath::parse(&change.path)?;
        match change.change_type {
            ChangeType::Add | ChangeType::Modify => {
                let value = change.new_value.clone().unwrap_or_default();
                let path = if change.change_type == ChangeType::Add {
                    clamp_to_array_end(&root, path)
                } else {
                    path
                };
                set_path(&mut root, &path, value)?;
            }
            ChangeType::Delete => deletes.push(path),
            ChangeType::Rename => {
                let target = change
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("to"))
                    .and_then(|v| v.as_str());
                if let Some(to) = target {
                    let to = ValuePath::parse(to)?;
                    if let Some(moved) = delete_path(&mut root, &path) {
                        set_path(&mut root, &to, moved)?;
                    }
                }
            }
        }
    }

    deletes.sort_by(|a, b| b.cmp(a));
    for path in deletes {
        delete_path(&mut root, &path);
    }

    Ok(ProjectData::from_value(root)?)
}
