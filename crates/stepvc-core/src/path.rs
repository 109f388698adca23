//! Dot-path addressing into JSON trees.
//!
//! A path such as `steps.0.title` is parsed into typed segments
//! (`Key("steps")`, `Index(0)`, `Key("title")`) and walked with explicit
//! get/set/delete functions over `serde_json::Value`.
//!
//! Numeric segments index arrays. Against an object, a numeric segment falls
//! back to the decimal key, so maps with numeric-looking keys stay
//! addressable.
//!
//! Keys may themselves contain dots (`variables.user\.name`): the rendered
//! form escapes `.` and `\` with a backslash, and [`ValuePath::parse`] reads
//! the escapes back, so rendering then parsing yields the same segments.

use crate::errors::{Result, VcsError};
use serde_json::{Map, Value};
use std::fmt;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    fn from_raw(raw: String, escaped: bool) -> Self {
        if escaped {
            return PathSegment::Key(raw);
        }
        match raw.parse::<usize>() {
            Ok(i) if raw == i.to_string() => PathSegment::Index(i),
            _ => PathSegment::Key(raw),
        }
    }

    fn as_key(&self) -> String {
        match self {
            PathSegment::Key(k) => k.clone(),
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => {
                for c in k.chars() {
                    if c == '.' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A parsed, non-empty dot path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    /// Parse a dot-delimited path, honouring `\.` and `\\` escapes
    ///
    /// # Errors
    ///
    /// `InvalidPath` if the path is empty, has an empty segment, or ends in
    /// a lone backslash.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |reason: &str| VcsError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        if path.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        let mut raw = String::new();
        let mut escaped = false;
        let mut chars = path.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    let next = chars
                        .next()
                        .ok_or_else(|| invalid("path ends in an escape"))?;
                    raw.push(next);
                    escaped = true;
                }
                '.' => {
                    if raw.is_empty() && !escaped {
                        return Err(invalid("path has an empty segment"));
                    }
                    segments.push(PathSegment::from_raw(std::mem::take(&mut raw), escaped));
                    escaped = false;
                }
                other => raw.push(other),
            }
        }
        if raw.is_empty() && !escaped {
            return Err(invalid("path has an empty segment"));
        }
        segments.push(PathSegment::from_raw(raw, escaped));
        Ok(Self { segments })
    }

    /// Single-key path such as `variables`
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// Build a path from already-typed segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Extend with an object key
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Extend with an array index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Extend with an already-typed segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Path one level up; `None` for a single-segment path
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Self::from_segments(rest.to_vec())
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// True if `self` equals `other` or lies beneath it
    pub fn starts_with(&self, other: &ValuePath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl From<PathSegment> for ValuePath {
    fn from(segment: PathSegment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl std::str::FromStr for ValuePath {
    type Err = VcsError;

    fn from_str(s: &str) -> Result<Self> {
        ValuePath::parse(s)
    }
}

fn step<'a>(value: &'a Value, seg: &PathSegment) -> Option<&'a Value> {
    match (value, seg) {
        (Value::Object(map), seg) => map.get(&seg.as_key()),
        (Value::Array(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    }
}

/// Read the value at `path`, if present
pub fn get_path<'a>(root: &'a Value, path: &ValuePath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(root, |current, seg| step(current, seg))
}

/// Write `value` at `path`, creating missing containers on the way
///
/// A missing (or null) intermediate becomes an array when the next segment
/// is numeric and an object otherwise. Writing past the end of an array pads
/// it with nulls.
///
/// # Errors
///
/// `InvalidPath` when the walk hits a scalar, or a key segment meets an array.
pub fn set_path(root: &mut Value, path: &ValuePath, value: Value) -> Result<()> {
    set_segments(root, &path.segments, value, path)
}

/// Re-target a write past the end of an array onto the array's end
///
/// A change recorded against a longer list lands as an append on a list
/// that has since shrunk, instead of padding the gap with nulls. Paths that
/// do not end in an index, or whose parent is not an array, are returned
/// unchanged.
pub fn clamp_to_array_end(root: &Value, path: ValuePath) -> ValuePath {
    let i = match path.last() {
        Some(PathSegment::Index(i)) => *i,
        _ => return path,
    };
    let Some(parent) = path.parent() else {
        return path;
    };
    match get_path(root, &parent) {
        Some(Value::Array(items)) if i > items.len() => parent.index(items.len()),
        _ => path,
    }
}

fn empty_container_for(seg: &PathSegment) -> Value {
    match seg {
        PathSegment::Index(_) => Value::Array(Vec::new()),
        PathSegment::Key(_) => Value::Object(Map::new()),
    }
}

fn set_segments(
    current: &mut Value,
    segments: &[PathSegment],
    value: Value,
    full: &ValuePath,
) -> Result<()> {
    let (seg, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *current = value;
            return Ok(());
        }
    };

    if current.is_null() {
        *current = empty_container_for(seg);
    }

    let slot = match (current, seg) {
        (Value::Object(map), seg) => map.entry(seg.as_key()).or_insert(Value::Null),
        (Value::Array(items), PathSegment::Index(i)) => {
            if *i >= items.len() {
                items.resize(*i + 1, Value::Null);
            }
            &mut items[*i]
        }
        (Value::Array(_), PathSegment::Key(k)) => {
            return Err(VcsError::InvalidPath {
                path: full.to_string(),
                reason: format!("key segment '{}' applied to an array", k),
            })
        }
        (_, seg) => {
            return Err(VcsError::InvalidPath {
                path: full.to_string(),
                reason: format!("cannot descend into scalar at segment '{}'", seg),
            })
        }
    };

    set_segments(slot, rest, value, full)
}

/// Remove the value at `path`, returning it if it existed
///
/// Removing an array element shifts the later elements down.
pub fn delete_path(root: &mut Value, path: &ValuePath) -> Option<Value> {
    let (last, parents) = path.segments.split_last()?;
    let mut current = root;
    for seg in parents {
        current = match (current, seg) {
            (Value::Object(map), seg) => map.get_mut(&seg.as_key())?,
            (Value::Array(items), PathSegment::Index(i)) => items.get_mut(*i)?,
            _ => return None,
        };
    }
    match (current, last) {
        (Value::Object(map), seg) => map.remove(&seg.as_key()),
        (Value::Array(items), PathSegment::Index(i)) if *i < items.len() => {
            Some(items.remove(*i))
        }
        _ => None,
    }
}
