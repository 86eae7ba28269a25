//! Decides which outgoing edge a node hands control to.

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    runtime::VariableStore,
    story::{
        Story,
        edge::{Edge, EdgeId, SourceHandle},
        node::{Condition, Node, NodeId, NodeKind, Transition},
    },
};

/// A button offered to the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// id of the edge the button is bound to
    pub id: EdgeId,
    pub label: String,
    pub target: NodeId,
}

/// Outcome of resolving a node's transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Follow this edge.
    Route(EdgeId),
    /// Wait for the player to pick one of these.
    Choices(Vec<Choice>),
    /// The graph does not say where to go; the reason is for logs.
    DeadEnd(String),
    /// The node ends the story.
    Terminal,
}

pub struct TransitionResolver<'a> {
    story: &'a Story,
}

impl<'a> TransitionResolver<'a> {
    pub fn new(story: &'a Story) -> Self {
        Self {
            story,
        }
    }

    pub fn resolve(
        &self,
        node: &Node,
        store: &VariableStore,
    ) -> Resolution {
        let resolution = match &node.kind {
            NodeKind::Start(passage) | NodeKind::Plot(passage) => match &passage.transition {
                Transition::Direct => self.direct(node),
                Transition::Buttons(titles) => Resolution::Choices(self.choices(node, titles)),
            },
            NodeKind::Entry { .. } => self.direct(node),
            NodeKind::Condition { conditions, .. } => self.branch(node, conditions, store),
            NodeKind::End { .. } => Resolution::Terminal,
            NodeKind::Container { .. } | NodeKind::Exit { .. } => Resolution::DeadEnd(format!("{} node {} has no transition of its own", node.node_type().as_ref(), node.id)),
        };
        trace!(node = %node.id, ?resolution, "resolved transition");
        resolution
    }

    /// Edge bound to the choice the player picked, if the node offers it.
    pub fn resolve_choice(
        &self,
        node: &Node,
        choice_id: &str,
    ) -> Option<EdgeId> {
        let (NodeKind::Start(passage) | NodeKind::Plot(passage)) = &node.kind else {
            return None;
        };
        let Transition::Buttons(titles) = &passage.transition else {
            return None;
        };
        self.choices(node, titles).into_iter().find(|c| c.id == choice_id).map(|c| c.id)
    }

    /// The unique direct outgoing edge.
    fn direct(
        &self,
        node: &Node,
    ) -> Resolution {
        let edges: Vec<&Edge> = self.story.outgoing_edges(&node.id).into_iter().filter(|e| e.source_handle.is_direct()).collect();
        match edges.as_slice() {
            [edge] => Resolution::Route(edge.id.clone()),
            [] => Resolution::DeadEnd(format!("node {} has no direct outgoing edge", node.id)),
            many => Resolution::DeadEnd(format!("node {} has {} direct outgoing edges", node.id, many.len())),
        }
    }

    /// One choice per button with a bound edge, in button order.
    fn choices(
        &self,
        node: &Node,
        titles: &[String],
    ) -> Vec<Choice> {
        let edges = self.story.outgoing_edges(&node.id);
        titles
            .iter()
            .enumerate()
            .filter_map(|(i, title)| {
                let edge = edges.iter().find(|e| e.source_handle == SourceHandle::Button(i))?;
                let label = if title.trim().is_empty() { format!("Button {}", i + 1) } else { title.clone() };
                Some(Choice {
                    id: edge.id.clone(),
                    label,
                    target: edge.target.clone(),
                })
            })
            .collect()
    }

    /// First true condition with a bound edge wins, then the default branch.
    fn branch(
        &self,
        node: &Node,
        conditions: &[Condition],
        store: &VariableStore,
    ) -> Resolution {
        let edges = self.story.outgoing_edges(&node.id);

        for (i, condition) in conditions.iter().enumerate() {
            let Some(edge) = edges.iter().find(|e| e.source_handle == SourceHandle::Condition(i)) else {
                continue;
            };
            if condition.variable.is_empty() {
                continue;
            }
            if condition.evaluate(store) {
                debug!(node = %node.id, branch = i, label = %condition.label, "condition matched");
                return Resolution::Route(edge.id.clone());
            }
        }

        match edges.iter().find(|e| e.source_handle == SourceHandle::Default) {
            Some(edge) => {
                debug!(node = %node.id, "taking default branch");
                Resolution::Route(edge.id.clone())
            }
            None => Resolution::DeadEnd(format!("no condition of node {} matched and it has no default branch", node.id)),
        }
    }
}
