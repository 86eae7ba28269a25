mod session;
mod vars;

pub use session::{RenderPayload, Session, SessionId, Step};
pub use vars::VariableStore;
