use tracing::debug;

use crate::{
    Result,
    common::MemCache,
    model::DocumentModel,
    store::{DocumentStore, SAVE_KEY},
};

const SLOT_CAPACITY: usize = 16;

/// Keeps the saved document in memory, serialized as it would be on disk.
#[derive(Clone)]
pub struct MemStore {
    slots: MemCache<String, String>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            slots: MemCache::new(SLOT_CAPACITY),
        }
    }
}

impl DocumentStore for MemStore {
    fn save(
        &self,
        doc: &DocumentModel,
    ) -> Result<()> {
        let json = doc.to_json()?;
        debug!(key = SAVE_KEY, bytes = json.len(), "document saved to memory");
        self.slots.set(SAVE_KEY.to_string(), json);
        Ok(())
    }

    fn load(&self) -> Result<Option<DocumentModel>> {
        match self.slots.get(&SAVE_KEY.to_string()) {
            Some(json) => DocumentModel::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        self.slots.remove(&SAVE_KEY.to_string());
        Ok(())
    }
}
