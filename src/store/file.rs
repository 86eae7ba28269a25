use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    Result,
    model::DocumentModel,
    store::{DocumentStore, SAVE_KEY, map_store_err},
    utils,
};

/// Saves the document as `<dir>/flowData.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store in `dir`, creating the directory when missing.
    pub fn new<T: AsRef<Path>>(dir: T) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(map_store_err)?;
        Ok(Self {
            dir,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SAVE_KEY))
    }

    /// Writes a dated copy of the document, `flow-YYYY-MM-DD.json`, and
    /// returns its path. A second export on the same day replaces the first.
    pub fn export(
        &self,
        doc: &DocumentModel,
    ) -> Result<PathBuf> {
        let path = self.dir.join(export_file_name(&utils::date_stamp()));
        fs::write(&path, doc.to_json()?).map_err(map_store_err)?;
        info!(path = %path.display(), "document exported");
        Ok(path)
    }
}

/// File name of an export made on `date` (`YYYY-MM-DD`).
pub fn export_file_name(date: &str) -> String {
    format!("flow-{}.json", date)
}

impl DocumentStore for FileStore {
    fn save(
        &self,
        doc: &DocumentModel,
    ) -> Result<()> {
        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, doc.to_json()?).map_err(map_store_err)?;
        // the previous save stays intact until the new one is complete
        fs::rename(&tmp, &path).map_err(map_store_err)?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<DocumentModel>> {
        let data = match fs::read_to_string(self.path()) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_store_err(e)),
        };
        DocumentModel::from_json(&data).map(Some)
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_store_err(e)),
        }
    }
}
