//! # Storyflow
//!
//! Storyflow is a lightweight runtime for branching narrative flowcharts, the kind
//! a visual-novel editor produces. It is designed to be embedded behind an editor
//! canvas: the editor owns layout and widgets, storyflow owns the story.
//!
//! ## Core Features
//!
//! - **Story Documents**: Load, validate, edit and save the JSON documents the editor exchanges
//! - **Preview Sessions**: Walk a story interactively with live variables, conditional branches and nested containers
//! - **Text Templates**: `{{player.name}}` references and `{{flag}?"yes":"no"}` conditional text
//! - **Safe Arithmetic**: Edge mutations such as `{{gold}}+10` are evaluated by a small expression parser
//! - **Pluggable Storage**: In-memory storage (testing) and a JSON file store
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storyflow::{DocumentModel, SessionBuilder};
//!
//! let doc = DocumentModel::from_json(json_str)?;
//! let mut session = SessionBuilder::new().build(&doc)?;
//!
//! let page = session.render();
//! println!("{}", page.text);
//! if let Some(choices) = &page.choices {
//!     session.choose(Some(&choices[0].id))?;
//! }
//! ```

mod builder;
mod common;
mod config;
pub mod document;
mod error;
mod model;
pub mod runtime;
pub mod store;
pub mod story;
mod utils;

pub use builder::SessionBuilder;
pub use config::{Config, FileStoreConfig, RuntimeConfig, StoreConfig, StoreType};
pub use document::{Document, IdAllocator};
pub use error::StoryflowError;
pub use model::*;
pub use runtime::{RenderPayload, Session, SessionId, Step, VariableStore};
pub use store::{DocumentStore, FileStore, MemStore};
pub use story::{Choice, Resolution, Story};

/// Result type alias for Storyflow operations.
pub type Result<T> = std::result::Result<T, StoryflowError>;
