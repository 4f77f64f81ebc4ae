use crate::error::{GenError, GenResult};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Rendered output files keyed by absolute path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestTree {
    pub files: BTreeMap<PathBuf, String>,
}

impl ManifestTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: PathBuf, content: String) {
        self.files.insert(path, content);
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Create or truncate every file in path order.
    ///
    /// Stops at the first failure; files written before it are left in place.
    pub fn write_to_disk(&self) -> GenResult<usize> {
        for (path, content) in &self.files {
            fs::write(path, content).map_err(|e| GenError::io(path, e))?;
            debug!("Wrote {}", path.display());
        }
        Ok(self.files.len())
    }
}
