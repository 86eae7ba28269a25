use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    Result, StoryflowError,
    config::RuntimeConfig,
    model::{NodeType, VariableModel},
    runtime::VariableStore,
    story::{Choice, ContainerFlattener, EdgeId, NodeId, Resolution, Story, TransitionResolver},
    utils,
};

pub type SessionId = String;

/// What the preview shows for the current node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub node_id: NodeId,
    pub kind: NodeType,
    /// author-facing node name
    pub title: String,
    /// `showInfo` rendered against the current variables
    pub text: String,
    /// buttons of a button-choice node, `None` for any other node
    pub choices: Option<Vec<Choice>>,
    pub is_terminal: bool,
}

/// One move of the session, from a node to where its route landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub from: NodeId,
    /// every edge crossed, in the order their mutations were applied
    pub edges: Vec<EdgeId>,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Running,
    Ended,
    Stalled(String),
}

/// An interactive walk through a story.
///
/// The session owns its graph and variable declarations, so edits made to the
/// document afterwards do not reach it. Condition nodes are passed through
/// automatically; the session only rests on nodes the player sees.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    story: Story,
    declarations: Vec<VariableModel>,
    store: VariableStore,
    current: NodeId,
    state: SessionState,
    history: Vec<Step>,
    config: RuntimeConfig,
}

impl Session {
    pub(crate) fn new(
        story: Story,
        declarations: Vec<VariableModel>,
        config: RuntimeConfig,
    ) -> Self {
        let store = VariableStore::seed(&declarations, config.max_template_depth);
        let current = story.start_node().id.clone();
        let mut session = Self {
            id: utils::longid(),
            story,
            declarations,
            store,
            current,
            state: SessionState::Running,
            history: Vec::new(),
            config,
        };
        info!(session = %session.id, nodes = session.story.node_count(), edges = session.story.edge_count(), "preview session started");
        session.settle();
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn current_node_id(&self) -> &str {
        &self.current
    }

    pub fn variables(&self) -> &VariableStore {
        &self.store
    }

    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Whether the session reached an end node or a dead end.
    pub fn is_terminal(&self) -> bool {
        self.state != SessionState::Running
    }

    /// Why the session stopped short of an end node.
    pub fn dead_end(&self) -> Option<&str> {
        match &self.state {
            SessionState::Stalled(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn render(&self) -> RenderPayload {
        let node = self.story.node(&self.current).unwrap_or_else(|| self.story.start_node());
        let resolution = TransitionResolver::new(&self.story).resolve(node, &self.store);
        let choices = match resolution {
            Resolution::Choices(choices) => Some(choices),
            _ => None,
        };

        RenderPayload {
            node_id: node.id.clone(),
            kind: node.node_type(),
            title: node.name.clone(),
            text: self.store.render(node.show_info().unwrap_or_default()),
            choices,
            is_terminal: self.is_terminal(),
        }
    }

    /// Advances from the current node.
    ///
    /// Button-choice nodes need the id of one of the offered choices; any other
    /// node follows its own route and ignores `choice_id`.
    pub fn choose(
        &mut self,
        choice_id: Option<&str>,
    ) -> Result<RenderPayload> {
        if self.is_terminal() {
            return Err(StoryflowError::Session(format!("session {} has ended at node {}", self.id, self.current)));
        }

        let edge = {
            let resolver = TransitionResolver::new(&self.story);
            let node = self.story.node(&self.current).ok_or_else(|| StoryflowError::Node(format!("current node {} is missing", self.current)))?;
            match resolver.resolve(node, &self.store) {
                Resolution::Route(edge) => edge,
                Resolution::Choices(_) => {
                    let choice_id = choice_id.ok_or_else(|| StoryflowError::Session(format!("node {} waits for a choice", node.id)))?;
                    resolver
                        .resolve_choice(node, choice_id)
                        .ok_or_else(|| StoryflowError::Session(format!("node {} offers no choice {}", node.id, choice_id)))?
                }
                Resolution::DeadEnd(reason) => return Err(StoryflowError::Session(reason)),
                Resolution::Terminal => return Err(StoryflowError::Session(format!("node {} ends the story", node.id))),
            }
        };

        debug!(session = %self.id, from = %self.current, edge = %edge, "choose");
        self.advance(&edge);
        self.settle();
        Ok(self.render())
    }

    /// Back to the start node with the declared default values.
    pub fn restart(&mut self) -> RenderPayload {
        self.store = VariableStore::seed(&self.declarations, self.config.max_template_depth);
        self.current = self.story.start_node().id.clone();
        self.state = SessionState::Running;
        self.history.clear();
        debug!(session = %self.id, "restart");
        self.settle();
        self.render()
    }

    /// Follows an edge through container boundaries, applying the mutations of
    /// every crossed edge. A dead end keeps the session where it is.
    fn advance(
        &mut self,
        edge_id: &str,
    ) {
        let landing = match self.story.edge(edge_id) {
            Some(edge) => ContainerFlattener::new(&self.story, self.config.max_auto_steps).follow(edge),
            None => Err(format!("edge {} is missing", edge_id)),
        };

        match landing {
            Ok(landing) => {
                for eid in &landing.edges {
                    if let Some(edge) = self.story.edge(eid) {
                        self.store.apply(&edge.update_variables);
                    }
                }
                debug!(session = %self.id, from = %self.current, to = %landing.node, edges = ?landing.edges, "moved");
                self.history.push(Step {
                    from: self.current.clone(),
                    edges: landing.edges,
                    to: landing.node.clone(),
                });
                self.current = landing.node;
            }
            Err(reason) => self.stall(reason),
        }
    }

    /// Passes through nodes the player does not stop on and decides whether the
    /// session can continue from where it rests.
    fn settle(&mut self) {
        for _ in 0..=self.config.max_auto_steps {
            if self.is_terminal() {
                return;
            }
            let Some(node) = self.story.node(&self.current) else {
                self.stall(format!("current node {} is missing", self.current));
                return;
            };
            let auto = matches!(node.node_type(), NodeType::Condition | NodeType::Entry);
            let resolution = TransitionResolver::new(&self.story).resolve(node, &self.store);

            match resolution {
                Resolution::Terminal => {
                    info!(session = %self.id, node = %self.current, "story ended");
                    self.state = SessionState::Ended;
                    return;
                }
                Resolution::DeadEnd(reason) => {
                    self.stall(reason);
                    return;
                }
                Resolution::Choices(choices) if choices.is_empty() => {
                    let reason = format!("node {} has no connected buttons", self.current);
                    self.stall(reason);
                    return;
                }
                Resolution::Route(edge) if auto => self.advance(&edge),
                _ => return,
            }
        }
        self.stall(format!("more than {} automatic steps", self.config.max_auto_steps));
    }

    fn stall(
        &mut self,
        reason: String,
    ) {
        warn!(session = %self.id, node = %self.current, reason = %reason, "dead end");
        self.state = SessionState::Stalled(reason);
    }
}
