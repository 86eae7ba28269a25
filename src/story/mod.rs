//! Runtime story graph and the rules for walking it.

mod condition;
pub mod edge;
pub mod expr;
pub mod flatten;
pub mod node;
pub mod resolver;
#[allow(clippy::module_inception)]
mod story;
pub mod template;

pub use edge::{Edge, EdgeId, SourceHandle};
pub use flatten::{ContainerFlattener, Landing};
pub use node::{Condition, Node, NodeId, NodeKind, Passage, Transition};
pub use resolver::{Choice, Resolution, TransitionResolver};
pub use story::Story;
