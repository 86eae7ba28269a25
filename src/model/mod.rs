mod condition;
mod de;
mod document;
mod edge;
mod node;
mod variable;

pub use condition::{Comparator, ConditionModel};
pub use document::DocumentModel;
pub use edge::{EdgeData, EdgeModel};
pub use node::{ButtonModel, NodeData, NodeModel, NodeType, Position, TransitionType};
pub use variable::{VariableModel, VariableType, duplicate_names};
