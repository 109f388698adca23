use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The versioned payload: an ordered list of steps plus keyed maps
///
/// Step records and map values are opaque JSON; the diff and merge engines
/// align steps by index and maps by key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectData {
    /// Ordered step records
    #[serde(default)]
    pub steps: Vec<Value>,

    /// Named variables
    #[serde(default)]
    pub variables: Map<String, Value>,

    /// Free-form project metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Optional asset map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Map<String, Value>>,
}

impl ProjectData {
    /// Create an empty project document
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder helper: replace the step list
    pub fn with_steps(mut self, steps: Vec<Value>) -> Self {
        self.steps = steps;
        self
    }

    /// Builder helper: set one variable
    pub fn with_variable(mut self, key: impl Into<String>, value: Value) -> Self {
        self.variables.insert(key.into(), value);
        self
    }

    /// Builder helper: set one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Builder helper: set one asset entry, creating the asset map if needed
    pub fn with_asset(mut self, key: impl Into<String>, value: Value) -> Self {
        self.assets
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Convert into a generic JSON tree for path addressing
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild from a generic JSON tree
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
