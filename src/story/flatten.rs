//! Makes containers transparent to traversal.
//!
//! Entering a container continues at the node its entry points to; reaching one
//! of its exits continues along the container edge bound to that exit. The player
//! never stops on a container, entry or exit node.

use tracing::trace;

use crate::story::{
    Story,
    edge::{Edge, EdgeId, SourceHandle},
    node::{NodeId, NodeKind},
};

/// Where following an edge ends up, with every edge crossed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    /// traversed edges in route order, starting with the followed edge
    pub edges: Vec<EdgeId>,
    pub node: NodeId,
}

pub struct ContainerFlattener<'a> {
    story: &'a Story,
    max_hops: usize,
}

impl<'a> ContainerFlattener<'a> {
    pub fn new(
        story: &'a Story,
        max_hops: usize,
    ) -> Self {
        Self {
            story,
            max_hops,
        }
    }

    /// Follows `edge` through any container boundaries it lands on.
    ///
    /// Fails with the dead-end reason when a boundary leads nowhere or the hop
    /// limit is exceeded.
    pub fn follow(
        &self,
        edge: &Edge,
    ) -> Result<Landing, String> {
        let mut edges = vec![edge.id.clone()];
        let mut current = edge.target.clone();

        for _ in 0..=self.max_hops {
            let Some(node) = self.story.node(&current) else {
                return Err(format!("edge leads to unknown node {}", current));
            };

            let next = match &node.kind {
                NodeKind::Container { .. } => {
                    let Some(entry) = self.story.entry_of(&node.id) else {
                        return Err(format!("container {} has no entry node", node.id));
                    };
                    self.entry_edge(&entry.id)
                        .ok_or_else(|| format!("entry {} of container {} is not connected", entry.id, node.id))?
                }
                NodeKind::Entry { .. } => self.entry_edge(&node.id).ok_or_else(|| format!("entry {} is not connected", node.id))?,
                NodeKind::Exit { .. } => {
                    let Some(container) = node.parent.as_deref() else {
                        return Err(format!("exit {} is not inside a container", node.id));
                    };
                    let handle = SourceHandle::Exit(node.id.clone());
                    self.story
                        .outgoing_edges(container)
                        .into_iter()
                        .find(|e| e.source_handle == handle)
                        .ok_or_else(|| format!("container {} has no edge for exit {}", container, node.id))?
                }
                _ => {
                    trace!(edges = ?edges, node = %current, "landed");
                    return Ok(Landing {
                        edges,
                        node: current,
                    });
                }
            };

            trace!(from = %node.id, edge = %next.id, to = %next.target, "crossing container boundary");
            edges.push(next.id.clone());
            current = next.target.clone();
        }

        Err(format!("more than {} container hops from edge {}", self.max_hops, edge.id))
    }

    /// The first direct outgoing edge of an entry node.
    fn entry_edge(
        &self,
        entry: &str,
    ) -> Option<&'a Edge> {
        self.story.outgoing_edges(entry).into_iter().find(|e| e.source_handle.is_direct())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::DocumentModel;

    fn story(value: serde_json::Value) -> Story {
        Story::try_from(&DocumentModel::from_value(value).unwrap()).unwrap()
    }

    fn follow(
        story: &Story,
        edge: &str,
    ) -> Result<Landing, String> {
        ContainerFlattener::new(story, 8).follow(story.edge(edge).unwrap())
    }

    #[test]
    fn test_plain_edge() {
        let story = story(json!({
            "nodes": [{"id": "1", "type": "start"}, {"id": "2", "type": "plot"}],
            "edges": [{"id": "e1", "source": "1", "target": "2"}]
        }));
        assert_eq!(
            follow(&story, "e1"),
            Ok(Landing {
                edges: vec!["e1".to_string()],
                node: "2".to_string()
            })
        );
    }

    #[test]
    fn test_container_transparency() {
        // 1 -> [C: entry -> 3 -> exit X] -> 4
        let story = story(json!({
            "nodes": [
                {"id": "1", "type": "start"},
                {"id": "2", "type": "container"},
                {"id": "5", "type": "entry", "data": {"parentId": "2"}},
                {"id": "3", "type": "plot", "data": {"parentId": "2"}},
                {"id": "6", "type": "exit", "data": {"parentId": "2"}},
                {"id": "4", "type": "plot"}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "2"},
                {"id": "e2", "source": "5", "target": "3"},
                {"id": "e3", "source": "3", "target": "6"},
                {"id": "e4", "source": "2", "target": "4", "sourceHandle": "exit-6"}
            ]
        }));

        let into = follow(&story, "e1").unwrap();
        assert_eq!(into.node, "3");
        assert_eq!(into.edges, vec!["e1", "e2"]);

        let out = follow(&story, "e3").unwrap();
        assert_eq!(out.node, "4");
        assert_eq!(out.edges, vec!["e3", "e4"]);
    }

    #[test]
    fn test_adjacent_containers_collapse() {
        let story = story(json!({
            "nodes": [
                {"id": "1", "type": "start"},
                {"id": "a", "type": "container"},
                {"id": "a_in", "type": "entry", "data": {"parentId": "a"}},
                {"id": "a_out", "type": "exit", "data": {"parentId": "a"}},
                {"id": "b", "type": "container"},
                {"id": "b_in", "type": "entry", "data": {"parentId": "b"}},
                {"id": "p", "type": "plot", "data": {"parentId": "b"}}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "a"},
                {"id": "e2", "source": "a_in", "target": "a_out"},
                {"id": "e3", "source": "a", "target": "b", "sourceHandle": "exit-a_out"},
                {"id": "e4", "source": "b_in", "target": "p"}
            ]
        }));

        let landing = follow(&story, "e1").unwrap();
        assert_eq!(landing.node, "p");
        assert_eq!(landing.edges, vec!["e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn test_dead_ends() {
        let story = story(json!({
            "nodes": [
                {"id": "1", "type": "start"},
                {"id": "2", "type": "container"},
                {"id": "3", "type": "entry", "data": {"parentId": "2"}},
                {"id": "4", "type": "container"},
                {"id": "5", "type": "exit", "data": {"parentId": "4"}},
                {"id": "6", "type": "exit"}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "2"},
                {"id": "e2", "source": "1", "target": "4"},
                {"id": "e3", "source": "1", "target": "5"},
                {"id": "e4", "source": "1", "target": "6"}
            ]
        }));

        assert!(follow(&story, "e1").is_err());
        assert!(follow(&story, "e2").is_err());
        assert!(follow(&story, "e3").is_err());
        assert!(follow(&story, "e4").is_err());
    }

    #[test]
    fn test_cycle_is_bounded() {
        // the container's exit edge leads back into itself
        let story = story(json!({
            "nodes": [
                {"id": "1", "type": "start"},
                {"id": "c", "type": "container"},
                {"id": "in", "type": "entry", "data": {"parentId": "c"}},
                {"id": "out", "type": "exit", "data": {"parentId": "c"}}
            ],
            "edges": [
                {"id": "e1", "source": "1", "target": "c"},
                {"id": "e2", "source": "in", "target": "out"},
                {"id": "e3", "source": "c", "target": "c", "sourceHandle": "exit-out"}
            ]
        }));

        let err = follow(&story, "e1").unwrap_err();
        assert!(err.contains("hops"));
    }
}
