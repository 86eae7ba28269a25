use serde::Serialize;

use crate::model::{Comparator, ConditionModel, NodeModel, NodeType, TransitionType};

/// node id
pub type NodeId = String;

/// How a start or plot node hands control to its successor.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The single direct outgoing edge is followed.
    Direct,
    /// The player picks one of the buttons; each holds the button title.
    Buttons(Vec<String>),
}

/// Player-facing content node with a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub show_info: String,
    pub transition: Transition,
}

/// One ordered branch of a condition node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub variable: String,
    pub comparator: Comparator,
    pub value: String,
    pub label: String,
}

impl From<&ConditionModel> for Condition {
    fn from(model: &ConditionModel) -> Self {
        Self {
            variable: model.variable.trim().to_string(),
            comparator: model.comparator,
            value: model.value.clone(),
            label: model.label.clone(),
        }
    }
}

/// Behavior of a node, one variant per node type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Start(Passage),
    Plot(Passage),
    End {
        show_info: String,
    },
    Container {
        note: String,
    },
    Entry {
        note: String,
    },
    Exit {
        note: String,
    },
    Condition {
        show_info: String,
        conditions: Vec<Condition>,
    },
}

/// Runtime node of a story graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// node id
    pub id: NodeId,
    /// author-facing name
    pub name: String,
    /// enclosing container, `None` at the document root
    pub parent: Option<NodeId>,
    /// node behavior
    pub kind: NodeKind,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Start(_) => NodeType::Start,
            NodeKind::Plot(_) => NodeType::Plot,
            NodeKind::End { .. } => NodeType::End,
            NodeKind::Container { .. } => NodeType::Container,
            NodeKind::Entry { .. } => NodeType::Entry,
            NodeKind::Exit { .. } => NodeType::Exit,
            NodeKind::Condition { .. } => NodeType::Condition,
        }
    }

    /// Template shown to the player; container and its entry/exit nodes have none.
    pub fn show_info(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Start(p) | NodeKind::Plot(p) => Some(&p.show_info),
            NodeKind::End { show_info } | NodeKind::Condition { show_info, .. } => Some(show_info),
            NodeKind::Container { .. } | NodeKind::Entry { .. } | NodeKind::Exit { .. } => None,
        }
    }
}

impl From<&NodeModel> for Node {
    fn from(model: &NodeModel) -> Self {
        let data = &model.data;
        let show_info = data.show_info.clone().unwrap_or_default();
        let note = data.note.clone().unwrap_or_default();
        let passage = || Passage {
            show_info: show_info.clone(),
            transition: match model.transition_type() {
                TransitionType::Direct => Transition::Direct,
                TransitionType::ButtonChoice => Transition::Buttons(data.buttons.iter().map(|b| b.title.clone()).collect()),
            },
        };

        let kind = match model.node_type {
            NodeType::Start => NodeKind::Start(passage()),
            NodeType::Plot => NodeKind::Plot(passage()),
            NodeType::End => NodeKind::End {
                show_info: show_info.clone(),
            },
            NodeType::Container => NodeKind::Container {
                note,
            },
            NodeType::Entry => NodeKind::Entry {
                note,
            },
            NodeType::Exit => NodeKind::Exit {
                note,
            },
            NodeType::Condition => NodeKind::Condition {
                show_info: show_info.clone(),
                conditions: data.conditions.iter().map(Condition::from).collect(),
            },
        };

        Self {
            id: model.id.clone(),
            name: data.mname.clone(),
            parent: data.parent_id.clone(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_node_from_model_buttons() {
        let model: NodeModel = serde_json::from_value(json!({
            "id": "2",
            "type": "plot",
            "data": {"mname": "Fork", "showInfo": "Pick", "transitionType": "btnsto", "buttons": [{"title": "Left"}, {"title": ""}]}
        }))
        .unwrap();
        let node = Node::from(&model);

        assert_eq!(node.node_type(), NodeType::Plot);
        assert_eq!(node.show_info(), Some("Pick"));
        match node.kind {
            NodeKind::Plot(Passage {
                transition: Transition::Buttons(titles),
                ..
            }) => assert_eq!(titles, vec!["Left".to_string(), String::new()]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_container_has_note_not_show_info() {
        let model: NodeModel = serde_json::from_value(json!({
            "id": "5",
            "type": "container",
            "data": {"mname": "Cave", "note": "author only", "showInfo": "ignored"}
        }))
        .unwrap();
        let node = Node::from(&model);
        assert_eq!(node.show_info(), None);
        assert!(matches!(&node.kind, NodeKind::Container { note } if note == "author only"));
    }
}
