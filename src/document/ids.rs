use crate::model::DocumentModel;

const EDGE_ID_PREFIX: &str = "e";

/// Hands out ids for new nodes and edges of one document.
///
/// Node ids are decimal numbers and edge ids are `e<n>`; after a load the
/// counters continue above the highest id of either form already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_node: u64,
    next_edge: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_node: 1,
            next_edge: 1,
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters continuing after the ids of a loaded document.
    pub fn resume_from(model: &DocumentModel) -> Self {
        let max_node = model.nodes.iter().filter_map(|n| n.id.parse::<u64>().ok()).max().unwrap_or(0);
        let max_edge = model.edges.iter().filter_map(|e| e.id.strip_prefix(EDGE_ID_PREFIX)?.parse::<u64>().ok()).max().unwrap_or(0);
        Self {
            next_node: max_node + 1,
            next_edge: max_edge + 1,
        }
    }

    pub fn next_node_id(&mut self) -> String {
        let id = self.next_node;
        self.next_node += 1;
        id.to_string()
    }

    pub fn next_edge_id(&mut self) -> String {
        let id = self.next_edge;
        self.next_edge += 1;
        format!("{}{}", EDGE_ID_PREFIX, id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_node_id(), "1");
        assert_eq!(ids.next_node_id(), "2");
        assert_eq!(ids.next_edge_id(), "e1");
        assert_eq!(ids.next_edge_id(), "e2");
    }

    #[test]
    fn test_resume_after_load() {
        let model = DocumentModel::from_value(json!({
            "nodes": [{"id": "1", "type": "start"}, {"id": 12, "type": "plot"}, {"id": "custom", "type": "end"}],
            "edges": [{"id": "e7", "source": "1", "target": "12"}, {"id": "reactflow__edge-1-12", "source": "1", "target": "12"}]
        }))
        .unwrap();

        let mut ids = IdAllocator::resume_from(&model);
        assert_eq!(ids.next_node_id(), "13");
        assert_eq!(ids.next_edge_id(), "e8");
    }
}
