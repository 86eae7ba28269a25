//! Story edge definitions for connecting nodes.
//!
//! Edges define the transitions between nodes. The source handle tells which
//! outgoing slot of the source node the edge is bound to: a button, a condition
//! branch, the default branch or a container exit.

use std::{fmt, str::FromStr};

use serde_json::{Map, Value};

use crate::{model::EdgeModel, story::node::NodeId};

/// Unique identifier for an edge within a story.
pub type EdgeId = String;

const BUTTON_PREFIX: &str = "button-";
const CONDITION_PREFIX: &str = "condition-";
const EXIT_PREFIX: &str = "exit-";
const DEFAULT_HANDLE: &str = "default";

/// Source handle identifying which outgoing slot of a node an edge originates from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SourceHandle {
    /// No handle: a direct transition.
    #[default]
    Direct,
    /// `button-<i>`
    Button(usize),
    /// `condition-<i>`
    Condition(usize),
    /// `default`: fallback branch of a condition node.
    Default,
    /// `exit-<exitNodeId>`: leaves a container through one of its exits.
    Exit(NodeId),
    /// Any other handle the canvas produced; treated as direct.
    Other(String),
}

impl SourceHandle {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => SourceHandle::Direct,
            Some(s) => s.parse().unwrap_or_else(|_| SourceHandle::Other(s.to_string())),
        }
    }

    /// Whether a direct-mode node may follow an edge with this handle.
    pub fn is_direct(&self) -> bool {
        matches!(self, SourceHandle::Direct | SourceHandle::Other(_))
    }

    /// Persisted form, `None` for direct transitions.
    pub fn to_model(&self) -> Option<String> {
        match self {
            SourceHandle::Direct => None,
            other => Some(other.to_string()),
        }
    }
}

impl FromStr for SourceHandle {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(SourceHandle::Direct);
        }
        if s == DEFAULT_HANDLE {
            return Ok(SourceHandle::Default);
        }
        if let Some(idx) = s.strip_prefix(BUTTON_PREFIX) {
            return idx.parse().map(SourceHandle::Button).map_err(|_| ());
        }
        if let Some(idx) = s.strip_prefix(CONDITION_PREFIX) {
            return idx.parse().map(SourceHandle::Condition).map_err(|_| ());
        }
        if let Some(nid) = s.strip_prefix(EXIT_PREFIX) {
            if !nid.is_empty() {
                return Ok(SourceHandle::Exit(nid.to_string()));
            }
        }
        Err(())
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            SourceHandle::Direct => write!(f, "direct"),
            SourceHandle::Button(i) => write!(f, "{}{}", BUTTON_PREFIX, i),
            SourceHandle::Condition(i) => write!(f, "{}{}", CONDITION_PREFIX, i),
            SourceHandle::Default => write!(f, "{}", DEFAULT_HANDLE),
            SourceHandle::Exit(nid) => write!(f, "{}{}", EXIT_PREFIX, nid),
            SourceHandle::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Runtime edge representation connecting two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// ID of the source node.
    pub source: NodeId,
    /// ID of the target node.
    pub target: NodeId,
    /// Which outgoing slot this edge connects from.
    pub source_handle: SourceHandle,
    /// Variable mutations applied when the edge is traversed, in order.
    pub update_variables: Map<String, Value>,
}

impl From<&EdgeModel> for Edge {
    fn from(model: &EdgeModel) -> Self {
        Self {
            id: model.id.clone(),
            source: model.source.clone(),
            target: model.target.clone(),
            source_handle: SourceHandle::parse(model.source_handle.as_deref()),
            update_variables: model.data.update_variables.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handles() {
        assert_eq!(SourceHandle::parse(None), SourceHandle::Direct);
        assert_eq!(SourceHandle::parse(Some("")), SourceHandle::Direct);
        assert_eq!(SourceHandle::parse(Some("button-2")), SourceHandle::Button(2));
        assert_eq!(SourceHandle::parse(Some("condition-0")), SourceHandle::Condition(0));
        assert_eq!(SourceHandle::parse(Some("default")), SourceHandle::Default);
        assert_eq!(SourceHandle::parse(Some("exit-17")), SourceHandle::Exit("17".to_string()));
        assert_eq!(SourceHandle::parse(Some("button-x")), SourceHandle::Other("button-x".to_string()));
        assert_eq!(SourceHandle::parse(Some("bottom")), SourceHandle::Other("bottom".to_string()));
    }

    #[test]
    fn test_handle_display_matches_persisted_form() {
        for raw in ["button-1", "condition-3", "default", "exit-9"] {
            assert_eq!(SourceHandle::parse(Some(raw)).to_model().as_deref(), Some(raw));
        }
        assert_eq!(SourceHandle::Direct.to_model(), None);
    }

    #[test]
    fn test_direct_handles() {
        assert!(SourceHandle::Direct.is_direct());
        assert!(SourceHandle::Other("bottom".to_string()).is_direct());
        assert!(!SourceHandle::Button(0).is_direct());
        assert!(!SourceHandle::Default.is_direct());
        assert!(!SourceHandle::Exit("3".to_string()).is_direct());
    }
}
