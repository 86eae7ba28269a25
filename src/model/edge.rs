use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// Variable path to raw value, applied in key order when the edge is traversed.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub update_variables: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeModel {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub source: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::opt_string_or_number")]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub data: EdgeData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeModel {
    pub fn new(
        id: &str,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
            data: EdgeData::default(),
            extra: Map::new(),
        }
    }
}
