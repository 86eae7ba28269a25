//! Editing operations on a story document.
//!
//! [`Document`] keeps the structural rules of the flowchart while it is edited:
//! one start node, an entry node inside every container, edges bound to handles
//! that exist, and button or condition edges re-indexed when the list they are
//! bound to changes.

mod ids;

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

pub use ids::IdAllocator;

use crate::{
    Result, StoryflowError,
    model::{ButtonModel, ConditionModel, DocumentModel, EdgeModel, NodeModel, NodeType, Position, TransitionType, VariableModel, duplicate_names},
    story::{EdgeId, NodeId, SourceHandle},
};

/// A story document being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    model: DocumentModel,
    ids: IdAllocator,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only its start node.
    pub fn new() -> Self {
        let mut ids = IdAllocator::new();
        let mut start = NodeModel::new(&ids.next_node_id(), NodeType::Start, Position::default());
        start.data.mname = "Start".to_string();

        Self {
            model: DocumentModel {
                nodes: vec![start],
                ..Default::default()
            },
            ids,
        }
    }

    pub fn from_model(model: DocumentModel) -> Self {
        let ids = IdAllocator::resume_from(&model);
        Self {
            model,
            ids,
        }
    }

    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    pub fn into_model(self) -> DocumentModel {
        self.model
    }

    /// Adds a node, optionally inside a container.
    ///
    /// A new container gets its entry node. Start nodes cannot be added, and
    /// exits are added with [`Document::add_exit`].
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        position: Position,
        parent: Option<&str>,
    ) -> Result<NodeId> {
        match node_type {
            NodeType::Start => return Err(StoryflowError::Node("a document has exactly one start node".to_string())),
            NodeType::Entry => return Err(StoryflowError::Node("entry nodes are created with their container".to_string())),
            NodeType::Exit => return Err(StoryflowError::Node("exit nodes are added with add_exit".to_string())),
            _ => {}
        }
        if let Some(parent) = parent {
            self.container(parent)?;
        }

        let id = self.push_node(node_type, position, parent);
        if node_type == NodeType::Container {
            let entry = self.push_node(NodeType::Entry, Position::default(), Some(&id));
            debug!(container = %id, entry = %entry, "container created");
        }
        Ok(id)
    }

    /// Adds an exit to a container.
    pub fn add_exit(
        &mut self,
        container: &str,
        position: Position,
    ) -> Result<NodeId> {
        self.container(container)?;
        Ok(self.push_node(NodeType::Exit, position, Some(container)))
    }

    /// Connects two nodes of the same level through a handle of the source.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Result<EdgeId> {
        let src = self.node(source)?;
        let dst = self.node(target)?;

        if matches!(src.node_type, NodeType::End | NodeType::Exit) {
            return Err(StoryflowError::Edge(format!("{} node {} has no outgoing handle", src.node_type.as_ref(), source)));
        }
        if matches!(dst.node_type, NodeType::Entry | NodeType::Start) {
            return Err(StoryflowError::Edge(format!("{} node {} cannot be a target", dst.node_type.as_ref(), target)));
        }
        if src.parent_id() != dst.parent_id() {
            return Err(StoryflowError::Edge(format!("nodes {} and {} are not in the same container", source, target)));
        }

        let handle = SourceHandle::parse(source_handle);
        self.check_handle(src, &handle)?;
        if self.model.edges.iter().any(|e| e.source == source && SourceHandle::parse(e.source_handle.as_deref()) == handle) {
            return Err(StoryflowError::Edge(format!("handle {} of node {} is already connected", handle, source)));
        }

        let id = self.ids.next_edge_id();
        let handle = handle.to_model();
        self.model.edges.push(EdgeModel::new(&id, source, target, handle.as_deref()));
        debug!(edge = %id, source, target, "edge connected");
        Ok(id)
    }

    /// Deletes a node with its edges; containers take their contents with them.
    pub fn delete_node(
        &mut self,
        id: &str,
    ) -> Result<()> {
        let node = self.node(id)?;
        match node.node_type {
            NodeType::Start => return Err(StoryflowError::Node("the start node cannot be deleted".to_string())),
            NodeType::Entry => return Err(StoryflowError::Node("entry nodes are deleted with their container".to_string())),
            _ => {}
        }

        let mut removed: HashSet<String> = HashSet::from([id.to_string()]);
        loop {
            let before = removed.len();
            for n in self.model.nodes.iter() {
                if n.parent_id().is_some_and(|p| removed.contains(p)) {
                    removed.insert(n.id.clone());
                }
            }
            if removed.len() == before {
                break;
            }
        }

        let exit_handles: HashSet<String> = self
            .model
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Exit && removed.contains(&n.id))
            .map(|n| SourceHandle::Exit(n.id.clone()).to_string())
            .collect();

        self.model.nodes.retain(|n| !removed.contains(&n.id));
        self.model.edges.retain(|e| !removed.contains(&e.source) && !removed.contains(&e.target) && !e.source_handle.as_ref().is_some_and(|h| exit_handles.contains(h)));
        debug!(node = id, removed = removed.len(), "node deleted");
        Ok(())
    }

    pub fn delete_edge(
        &mut self,
        id: &str,
    ) -> Result<()> {
        let len = self.model.edges.len();
        self.model.edges.retain(|e| e.id != id);
        if self.model.edges.len() == len {
            return Err(StoryflowError::Edge(format!("edge {} not found", id)));
        }
        Ok(())
    }

    /// Appends a button to a start or plot node; returns its index.
    pub fn add_button(
        &mut self,
        node: &str,
        title: &str,
    ) -> Result<usize> {
        let model = self.transition_node_mut(node)?;
        model.data.buttons.push(ButtonModel::new(title));
        Ok(model.data.buttons.len() - 1)
    }

    /// Removes a button, its edge, and shifts the edges of later buttons down.
    pub fn remove_button(
        &mut self,
        node: &str,
        index: usize,
    ) -> Result<()> {
        let model = self.transition_node_mut(node)?;
        if index >= model.data.buttons.len() {
            return Err(StoryflowError::Node(format!("node {} has no button {}", node, index)));
        }
        model.data.buttons.remove(index);
        self.reindex(node, index, |h| match h {
            SourceHandle::Button(i) => Some(i),
            _ => None,
        }, SourceHandle::Button);
        Ok(())
    }

    /// Appends a branch to a condition node; returns its index.
    pub fn add_condition(
        &mut self,
        node: &str,
        condition: ConditionModel,
    ) -> Result<usize> {
        let model = self.condition_node_mut(node)?;
        model.data.conditions.push(condition);
        Ok(model.data.conditions.len() - 1)
    }

    /// Removes a branch, its edge, and shifts the edges of later branches down.
    pub fn remove_condition(
        &mut self,
        node: &str,
        index: usize,
    ) -> Result<()> {
        let model = self.condition_node_mut(node)?;
        if index >= model.data.conditions.len() {
            return Err(StoryflowError::Node(format!("node {} has no condition {}", node, index)));
        }
        model.data.conditions.remove(index);
        self.reindex(node, index, |h| match h {
            SourceHandle::Condition(i) => Some(i),
            _ => None,
        }, SourceHandle::Condition);
        Ok(())
    }

    pub fn set_transition_type(
        &mut self,
        node: &str,
        transition_type: TransitionType,
    ) -> Result<()> {
        self.transition_node_mut(node)?.data.transition_type = Some(transition_type);
        Ok(())
    }

    pub fn set_show_info(
        &mut self,
        node: &str,
        show_info: &str,
    ) -> Result<()> {
        let model = self.node_mut(node)?;
        if !model.node_type.has_show_info() {
            return Err(StoryflowError::Node(format!("{} node {} has no display text", model.node_type.as_ref(), node)));
        }
        model.data.show_info = Some(show_info.to_string());
        Ok(())
    }

    /// Replaces the mutations an edge applies when traversed.
    pub fn set_edge_updates(
        &mut self,
        edge: &str,
        updates: Map<String, Value>,
    ) -> Result<()> {
        let model = self.model.edges.iter_mut().find(|e| e.id == edge).ok_or_else(|| StoryflowError::Edge(format!("edge {} not found", edge)))?;
        model.data.update_variables = updates;
        Ok(())
    }

    /// Replaces the variable declarations; sibling names must be unique.
    pub fn set_variables(
        &mut self,
        variables: Vec<VariableModel>,
    ) -> Result<()> {
        let dups = duplicate_names(&variables);
        if !dups.is_empty() {
            return Err(StoryflowError::Variable(format!("duplicate variable names: {}", dups.join(", "))));
        }
        if let Some(var) = variables.iter().find(|v| v.name.trim().is_empty() || v.name.contains('.')) {
            return Err(StoryflowError::Variable(format!("invalid variable name '{}'", var.name)));
        }
        self.model.variables = variables;
        Ok(())
    }

    fn push_node(
        &mut self,
        node_type: NodeType,
        position: Position,
        parent: Option<&str>,
    ) -> NodeId {
        let id = self.ids.next_node_id();
        let mut node = NodeModel::new(&id, node_type, position);
        node.data.parent_id = parent.map(str::to_string);
        self.model.nodes.push(node);
        id
    }

    fn node(
        &self,
        id: &str,
    ) -> Result<&NodeModel> {
        self.model.node(id).ok_or_else(|| StoryflowError::Node(format!("node {} not found", id)))
    }

    fn node_mut(
        &mut self,
        id: &str,
    ) -> Result<&mut NodeModel> {
        self.model.nodes.iter_mut().find(|n| n.id == id).ok_or_else(|| StoryflowError::Node(format!("node {} not found", id)))
    }

    fn container(
        &self,
        id: &str,
    ) -> Result<&NodeModel> {
        let node = self.node(id)?;
        if node.node_type != NodeType::Container {
            return Err(StoryflowError::Node(format!("node {} is not a container", id)));
        }
        Ok(node)
    }

    fn transition_node_mut(
        &mut self,
        id: &str,
    ) -> Result<&mut NodeModel> {
        let node = self.node_mut(id)?;
        if !node.node_type.has_transition() {
            return Err(StoryflowError::Node(format!("{} node {} has no transition", node.node_type.as_ref(), id)));
        }
        Ok(node)
    }

    fn condition_node_mut(
        &mut self,
        id: &str,
    ) -> Result<&mut NodeModel> {
        let node = self.node_mut(id)?;
        if node.node_type != NodeType::Condition {
            return Err(StoryflowError::Node(format!("node {} is not a condition node", id)));
        }
        Ok(node)
    }

    /// Whether `handle` is a slot the source node currently offers.
    fn check_handle(
        &self,
        src: &NodeModel,
        handle: &SourceHandle,
    ) -> Result<()> {
        let ok = match (src.node_type, handle) {
            (NodeType::Start | NodeType::Plot, SourceHandle::Button(i)) => src.transition_type() == TransitionType::ButtonChoice && *i < src.data.buttons.len(),
            (NodeType::Start | NodeType::Plot, h) if h.is_direct() => src.transition_type() == TransitionType::Direct,
            (NodeType::Entry, h) => h.is_direct(),
            (NodeType::Condition, SourceHandle::Condition(i)) => *i < src.data.conditions.len(),
            (NodeType::Condition, SourceHandle::Default) => true,
            (NodeType::Container, SourceHandle::Exit(exit)) => self.model.node(exit).is_some_and(|n| n.node_type == NodeType::Exit && n.parent_id() == Some(src.id.as_str())),
            _ => false,
        };
        if !ok {
            return Err(StoryflowError::Edge(format!("{} node {} has no handle {}", src.node_type.as_ref(), src.id, handle)));
        }
        Ok(())
    }

    /// Drops the edge bound to slot `removed` of `node` and moves the edges of
    /// later slots one down.
    fn reindex(
        &mut self,
        node: &str,
        removed: usize,
        index_of: impl Fn(SourceHandle) -> Option<usize>,
        handle_for: impl Fn(usize) -> SourceHandle,
    ) {
        self.model.edges.retain(|e| e.source != node || index_of(SourceHandle::parse(e.source_handle.as_deref())) != Some(removed));
        for edge in self.model.edges.iter_mut().filter(|e| e.source == node) {
            if let Some(i) = index_of(SourceHandle::parse(edge.source_handle.as_deref())) {
                if i > removed {
                    edge.source_handle = handle_for(i - 1).to_model();
                }
            }
        }
    }
}
