use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConditionModel, de};

/// Role a node plays in the story graph.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    /// Early editor builds saved the start node as `input`.
    #[default]
    #[serde(alias = "input")]
    Start,
    Plot,
    End,
    Container,
    Entry,
    Exit,
    Condition,
}

impl NodeType {
    /// Whether the node carries player-facing `showInfo` text.
    pub fn has_show_info(&self) -> bool {
        matches!(self, NodeType::Start | NodeType::Plot | NodeType::End | NodeType::Condition)
    }

    /// Whether the node carries an author-only `note`.
    pub fn has_note(&self) -> bool {
        matches!(self, NodeType::Container | NodeType::Entry | NodeType::Exit)
    }

    /// Whether the author may pick a transition mode for the node.
    pub fn has_transition(&self) -> bool {
        matches!(self, NodeType::Start | NodeType::Plot)
    }
}

/// How the outgoing edges of a start or plot node are offered to the player.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionType {
    /// Exactly one outgoing edge is followed automatically.
    #[default]
    #[serde(rename = "goto", alias = "direct")]
    Direct,
    /// Each outgoing edge is bound to a named button.
    #[serde(rename = "btnsto", alias = "buttons")]
    ButtonChoice,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ButtonModel {
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ButtonModel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            extra: Map::new(),
        }
    }
}

/// Author-editable payload of a node.
///
/// Fields the runtime does not understand (canvas labels, styling hints) are kept
/// in `extra` so that a load/save cycle is lossless.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub mname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::opt_transition_type")]
    pub transition_type: Option<TransitionType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ButtonModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionModel>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::opt_string_or_number")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeModel {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub data: NodeData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeModel {
    /// Creates a node with the defaults the editor uses for a fresh node.
    pub fn new(
        id: &str,
        node_type: NodeType,
        position: Position,
    ) -> Self {
        let mut data = NodeData {
            mname: format!("module{}", id),
            ..Default::default()
        };
        if node_type.has_show_info() {
            data.show_info = Some(String::new());
        }
        if node_type.has_note() {
            data.note = Some(String::new());
        }
        if node_type.has_transition() {
            data.transition_type = Some(TransitionType::Direct);
        }

        Self {
            id: id.to_string(),
            position,
            node_type,
            data,
            extra: Map::new(),
        }
    }

    pub fn transition_type(&self) -> TransitionType {
        self.data.transition_type.unwrap_or_default()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.data.parent_id.as_deref()
    }
}
