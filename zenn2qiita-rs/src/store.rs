//! Read-only lookup of previously converted documents.

use crate::error::{ConvertError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of prior output documents, keyed by output path.
pub trait PriorStore {
    /// Return the text of the document at `path`, or `None` if there is none.
    ///
    /// A document that exists but cannot be read is an error, not `None`.
    fn read_prior(&self, path: &Path) -> Result<Option<String>>;
}

/// Reads prior documents from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl PriorStore for FsStore {
    fn read_prior(&self, path: &Path) -> Result<Option<String>> {
        let exists = path.try_exists().map_err(|e| ConvertError::io(path, e))?;
        if !exists {
            return Ok(None);
        }

        std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| ConvertError::io(path, e))
    }
}

/// In-memory documents, e.g. fetched from elsewhere before converting.
impl PriorStore for HashMap<PathBuf, String> {
    fn read_prior(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.get(path).cloned())
    }
}
