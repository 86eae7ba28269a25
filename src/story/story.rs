//! Runtime story representation using a directed graph.
//!
//! Wraps the document model in a petgraph directed graph with typed nodes and
//! edges. The graph is immutable for the lifetime of a preview session.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::warn;

use crate::{
    DocumentModel, Result, StoryflowError,
    story::{
        edge::Edge,
        node::{Node, NodeId, NodeKind},
    },
};

/// Story graph: nodes are passages and control nodes, edges are transitions.
#[derive(Debug, Clone)]
pub struct Story {
    graph: DiGraph<Node, Edge>,
    index: HashMap<NodeId, NodeIndex>,
    start: NodeIndex,
}

impl Story {
    /// Output a human-readable representation of the story graph
    pub fn schema(&self) -> String {
        let graph = &self.graph;
        let mut lines = Vec::new();

        lines.push("=== Story Graph ===".to_string());
        lines.push(format!("Nodes: {}, Edges: {}", graph.node_count(), graph.edge_count()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for idx in graph.node_indices() {
            let node = &graph[idx];
            let parent = node.parent.as_deref().unwrap_or("root");
            lines.push(format!("[{}] {} (type: {}, parent: {})", node.id, node.name, node.node_type().as_ref(), parent));
        }
        lines.push(String::new());

        lines.push("--- Edges ---".to_string());
        for idx in graph.edge_indices() {
            let edge = &graph[idx];
            lines.push(format!("{} --[{}]--> {} (id: {}, updates: {})", edge.source, edge.source_handle, edge.target, edge.id, edge.update_variables.len()));
        }

        lines.join("\n")
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// get node by id
    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    /// get edge by id
    pub fn edge(
        &self,
        id: &str,
    ) -> Option<&Edge> {
        self.graph.edge_weights().find(|e| e.id == id)
    }

    /// the unique start node
    pub fn start_node(&self) -> &Node {
        &self.graph[self.start]
    }

    /// Outgoing edges of a node in document order.
    pub fn outgoing_edges(
        &self,
        nid: &str,
    ) -> Vec<&Edge> {
        let Some(idx) = self.index.get(nid) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges_directed(*idx, Direction::Outgoing).collect();
        // petgraph walks the adjacency list newest first
        edges.sort_by_key(|e| e.id());
        edges.into_iter().map(|e| e.weight()).collect()
    }

    /// The entry node created inside a container.
    pub fn entry_of(
        &self,
        container: &str,
    ) -> Option<&Node> {
        self.children_of(container).into_iter().find(|n| matches!(n.kind, NodeKind::Entry { .. }))
    }

    /// Nodes whose parent is the given container.
    pub fn children_of(
        &self,
        container: &str,
    ) -> Vec<&Node> {
        self.graph.node_weights().filter(|n| n.parent.as_deref() == Some(container)).collect()
    }
}

impl TryFrom<&DocumentModel> for Story {
    type Error = StoryflowError;

    fn try_from(model: &DocumentModel) -> Result<Self> {
        let mut graph: DiGraph<Node, Edge> = DiGraph::new();
        let mut index = HashMap::new();
        let mut starts = Vec::new();

        for node in model.nodes.iter() {
            let node = Node::from(node);
            if index.contains_key(&node.id) {
                return Err(StoryflowError::Node(format!("duplicate node id {}", node.id)));
            }
            let is_start = matches!(node.kind, NodeKind::Start(_));
            let nid = node.id.clone();
            let node_idx = graph.add_node(node);
            if is_start {
                starts.push(node_idx);
            }
            index.insert(nid, node_idx);
        }

        let start = match starts.as_slice() {
            [start] => *start,
            [] => return Err(StoryflowError::Document("document has no start node".to_string())),
            _ => return Err(StoryflowError::Document(format!("document has {} start nodes, expected exactly one", starts.len()))),
        };

        for edge in model.edges.iter() {
            let edge = Edge::from(edge);
            let (Some(source), Some(target)) = (index.get(&edge.source), index.get(&edge.target)) else {
                warn!(edge = %edge.id, source = %edge.source, target = %edge.target, "skipping edge with unknown endpoint");
                continue;
            };
            graph.add_edge(*source, *target, edge);
        }

        Ok(Self {
            graph,
            index,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::story::edge::SourceHandle;

    fn doc(value: serde_json::Value) -> DocumentModel {
        DocumentModel::from_value(value).unwrap()
    }

    #[test]
    fn test_story_from_document() {
        let story = Story::try_from(&doc(json!({
            "nodes": [
                {"id": "1", "type": "start", "data": {"mname": "Start"}},
                {"id": "2", "type": "plot", "data": {"mname": "A"}},
                {"id": "3", "type": "container", "data": {"mname": "Box"}},
                {"id": "4", "type": "entry", "data": {"parentId": "3"}},
                {"id": "5", "type": "exit", "data": {"parentId": "3"}}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "2"},
                {"id": "e2", "source": "2", "target": "3", "sourceHandle": "button-0"},
                {"id": "e3", "source": "2", "target": "1", "sourceHandle": "button-1"},
                {"id": "e4", "source": "2", "target": "99"}
            ]
        })))
        .unwrap();

        assert_eq!(story.node_count(), 5);
        assert_eq!(story.edge_count(), 3);
        assert_eq!(story.start_node().id, "1");
        assert_eq!(story.entry_of("3").unwrap().id, "4");
        assert_eq!(story.children_of("3").len(), 2);

        let out: Vec<&str> = story.outgoing_edges("2").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(out, vec!["e2", "e3"]);
        assert_eq!(story.edge("e3").unwrap().source_handle, SourceHandle::Button(1));
        assert!(story.schema().contains("2 --[button-0]--> 3"));
    }

    #[test]
    fn test_story_requires_one_start() {
        let none = Story::try_from(&doc(json!({"nodes": [{"id": "1", "type": "plot"}], "edges": []})));
        assert!(matches!(none, Err(StoryflowError::Document(_))));

        let two = Story::try_from(&doc(json!({"nodes": [{"id": "1", "type": "start"}, {"id": "2", "type": "start"}], "edges": []})));
        assert!(matches!(two, Err(StoryflowError::Document(_))));
    }

    #[test]
    fn test_story_rejects_duplicate_ids() {
        let dup = Story::try_from(&doc(json!({"nodes": [{"id": "1", "type": "start"}, {"id": 1, "type": "plot"}], "edges": []})));
        assert!(matches!(dup, Err(StoryflowError::Node(_))));
    }
}
