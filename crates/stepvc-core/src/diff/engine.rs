//! Change-list computation.

use crate::model::{Change, ProjectData};
use crate::path::{PathSegment, ValuePath};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Map sections of the document, in reporting order
const MAP_SECTIONS: &[&str] = &["variables", "metadata", "assets"];

/// Compute the step-granular change list from `old` to `new`
///
/// - `steps`: index `i` present only in the longer list is an add/delete;
///   present in both with unequal value is a modify. Inserting at the front
///   therefore reports every shifted index as modified plus one add.
/// - `variables`, `metadata`, `assets`: key union; a missing `assets` map is
///   treated as empty.
///
/// Output order: steps by index, then each map section by sorted key.
pub fn calculate_changes(old: &ProjectData, new: &ProjectData) -> Vec<Change> {
    let mut changes = Vec::new();

    let steps = ValuePath::field("steps");
    let longest = old.steps.len().max(new.steps.len());
    for i in 0..longest {
        let path = steps.index(i).to_string();
        match (old.steps.get(i), new.steps.get(i)) {
            (None, Some(n)) => changes.push(Change::add(path, n.clone())),
            (Some(o), None) => changes.push(Change::delete(path, o.clone())),
            (Some(o), Some(n)) if o != n => changes.push(Change::modify(path, o.clone(), n.clone())),
            _ => {}
        }
    }

    let empty = Map::new();
    for section in MAP_SECTIONS {
        let (old_map, new_map) = match *section {
            "variables" => (&old.variables, &new.variables),
            "metadata" => (&old.metadata, &new.metadata),
            _ => (
                old.assets.as_ref().unwrap_or(&empty),
                new.assets.as_ref().unwrap_or(&empty),
            ),
        };
        diff_map(section, old_map, new_map, &mut changes);
    }

    changes
}

fn diff_map(section: &str, old: &Map<String, Value>, new: &Map<String, Value>, out: &mut Vec<Change>) {
    let section = ValuePath::field(section);
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    for key in keys {
        let path = section.key(key.as_str()).to_string();
        match (old.get(key), new.get(key)) {
            (Some(o), None) => out.push(Change::delete(path, o.clone())),
            (None, Some(n)) => out.push(Change::add(path, n.clone())),
            (Some(o), Some(n)) if o != n => out.push(Change::modify(path, o.clone(), n.clone())),
            _ => {}
        }
    }
}

/// A leaf change together with the typed location it was found at
///
/// `change.path` is the rendered form of `path`; work on the tree should use
/// `path` directly.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafChange {
    pub path: ValuePath,
    pub change: Change,
}

/// Compute leaf-level changes between two JSON trees
///
/// Objects present on both sides are compared key by key and arrays index by
/// index; any other difference is reported at the path where it occurs. The
/// root itself is never reported, so two unequal scalars yield no changes.
/// Output is ordered segment-wise, indices numerically.
pub fn leaf_diff(old: &Value, new: &Value) -> Vec<LeafChange> {
    let mut out = Vec::new();
    let mut stack: Vec<(Option<ValuePath>, &Value, &Value)> = vec![(None, old, new)];

    // Explicit stack keeps deep documents off the call stack.
    while let Some((at, o, n)) = stack.pop() {
        let children: Vec<(PathSegment, Option<&Value>, Option<&Value>)> = match (o, n) {
            (Value::Object(om), Value::Object(nm)) => om
                .keys()
                .chain(nm.keys())
                .collect::<BTreeSet<&String>>()
                .into_iter()
                .map(|k| (PathSegment::Key(k.clone()), om.get(k), nm.get(k)))
                .collect(),
            (Value::Array(oa), Value::Array(na)) => (0..oa.len().max(na.len()))
                .map(|i| (PathSegment::Index(i), oa.get(i), na.get(i)))
                .collect(),
            _ => {
                if let Some(path) = at {
                    let change = Change::modify(path.to_string(), o.clone(), n.clone());
                    out.push(LeafChange { path, change });
                }
                continue;
            }
        };

        for (segment, ov, nv) in children {
            let path = match &at {
                Some(parent) => parent.child(segment),
                None => ValuePath::from(segment),
            };
            let change = match (ov, nv) {
                (Some(ov), None) => Change::delete(path.to_string(), ov.clone()),
                (None, Some(nv)) => Change::add(path.to_string(), nv.clone()),
                (Some(ov), Some(nv)) if ov != nv => {
                    stack.push((Some(path), ov, nv));
                    continue;
                }
                _ => continue,
            };
            out.push(LeafChange { path, change });
        }
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

/// [`leaf_diff`] without the typed paths
pub fn leaf_changes(old: &Value, new: &Value) -> Vec<Change> {
    leaf_diff(old, new).into_iter().map(|leaf| leaf.change).collect()
}

/// Distinct paths touched by a change list
pub fn touched_paths(changes: &[Change]) -> BTreeSet<String> {
    changes.iter().map(|c| c.path.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeType;
    use serde_json::json;

    #[test]
    fn test_identical_documents_have_no_changes() {
        let data = ProjectData::new()
            .with_steps(vec![json!({"title": "A"})])
            .with_variable("x", json!(1));
        assert!(calculate_changes(&data, &data).is_empty());
    }

    #[test]
    fn test_front_insert_reports_shift() {
        let old = ProjectData::new().with_steps(vec![json!("A"), json!("B")]);
        let new = ProjectData::new().with_steps(vec![json!("Z"), json!("A"), json!("B")]);
        let changes = calculate_changes(&old, &new);
        let types: Vec<_> = changes.iter().map(|c| c.change_type).collect();
        assert_eq!(
            types,
            vec![ChangeType::Modify, ChangeType::Modify, ChangeType::Add]
        );
        assert_eq!(changes[2].path, "steps.2");
    }

    #[test]
    fn test_leaf_changes_descend_into_steps() {
        let old = json!({"steps": [{"title": "A", "n": 1}]});
        let new = json!({"steps": [{"title": "A2", "n": 1}]});
        let changes = leaf_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "steps.0.title");
        assert_eq!(changes[0].change_type, ChangeType::Modify);
    }

    #[test]
    fn test_leaf_changes_type_change_reported_at_node() {
        let old = json!({"variables": {"x": {"a": 1}}});
        let new = json!({"variables": {"x": [1]}});
        let changes = leaf_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "variables.x");
    }

    #[test]
    fn test_dotted_key_is_one_segment() {
        let old = json!({"variables": {"x": 0}});
        let new = json!({"variables": {"x": 0, "user.name": "ann"}});
        let leaves = leaf_diff(&old, &new);
        assert_eq!(leaves.len(), 1);
        assert_eq!(
            leaves[0].path,
            ValuePath::field("variables").key("user.name")
        );
        assert_eq!(leaves[0].change.path, r"variables.user\.name");
    }

    #[test]
    fn test_calculate_changes_escapes_map_keys() {
        let old = ProjectData::new();
        let new = ProjectData::new().with_variable("user.name", json!("ann"));
        let changes = calculate_changes(&old, &new);
        assert_eq!(changes[0].path, r"variables.user\.name");
    }

    #[test]
    fn test_leaf_changes_sorted_numerically() {
        let old = json!({"steps": (0..12).map(|i| json!(i)).collect::<Vec<_>>()});
        let new = json!({"steps": (0..12).map(|i| json!(i + 1)).collect::<Vec<_>>()});
        let paths: Vec<_> = leaf_changes(&old, &new).into_iter().map(|c| c.path).collect();
        assert_eq!(paths[1], "steps.1");
        assert_eq!(paths[2], "steps.2");
        assert_eq!(paths[11], "steps.11");
    }
}
