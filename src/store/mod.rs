//! Persistence of the story document being edited.
//!
//! A store holds one saved document under the `flowData` key:
//! - `MemStore`: in-memory storage for tests and throwaway sessions
//! - `FileStore`: a JSON file on disk, with dated exports next to it

mod file;
mod mem;

use std::error::Error;

use tracing::info;

use crate::{
    Result, StoryflowError,
    config::{StoreConfig, StoreType},
    model::DocumentModel,
};

pub use file::{FileStore, export_file_name};
pub use mem::MemStore;

/// Key the current document is saved under.
pub const SAVE_KEY: &str = "flowData";

/// Maps storage errors to StoryflowError.
fn map_store_err(err: impl Error) -> StoryflowError {
    StoryflowError::Store(err.to_string())
}

/// Saved slot of the document being edited.
pub trait DocumentStore: Send + Sync {
    /// Saves the document, replacing any previous save.
    fn save(
        &self,
        doc: &DocumentModel,
    ) -> Result<()>;

    /// The saved document, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<DocumentModel>>;

    /// Forgets the saved document.
    fn clear(&self) -> Result<()>;
}

/// Opens the store selected by the config.
pub fn open(config: &StoreConfig) -> Result<Box<dyn DocumentStore>> {
    info!(store_type = ?config.store_type, "opening document store");
    match config.store_type {
        StoreType::Mem => Ok(Box::new(MemStore::new())),
        StoreType::File => {
            let file = config.file.as_ref().ok_or_else(|| StoryflowError::Config("[store.file] is required when store type is file".to_string()))?;
            Ok(Box::new(FileStore::new(&file.dir)?))
        }
    }
}
