use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Result, StoryflowError,
    model::{EdgeModel, NodeModel, NodeType, VariableModel},
};

/// The persisted story document, as exchanged with the editor and written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentModel {
    pub nodes: Vec<NodeModel>,
    pub edges: Vec<EdgeModel>,
    #[serde(default)]
    pub variables: Vec<VariableModel>,
}

impl DocumentModel {
    /// Parses a document. Loading is all-or-nothing: any structural problem is an
    /// error and no partially parsed document is returned.
    pub fn from_json(s: &str) -> Result<Self> {
        let value = serde_json::from_str::<Value>(s).map_err(|e| StoryflowError::Document(format!("{}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &value)?;
        serde_json::from_value::<DocumentModel>(value).map_err(|e| StoryflowError::Document(format!("{}", e)))
    }

    /// Serializes the document for saving. Container nodes never carry `showInfo`.
    pub fn to_json(&self) -> Result<String> {
        let mut doc = self.clone();
        for node in doc.nodes.iter_mut().filter(|n| n.node_type == NodeType::Container) {
            node.data.show_info = None;
        }
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn node(
        &self,
        id: &str,
    ) -> Option<&NodeModel> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "nodes": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": ["string", "number"] },
                            "type": { "type": "string" },
                            "data": { "type": "object" }
                        },
                        "required": ["id", "type"]
                    }
                },
                "edges": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": ["string", "number"] },
                            "source": { "type": ["string", "number"] },
                            "target": { "type": ["string", "number"] }
                        },
                        "required": ["id", "source", "target"]
                    }
                },
                "variables": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" }
                        },
                        "required": ["name"]
                    }
                }
            },
            "required": ["nodes", "edges"]
        })
    }
}
