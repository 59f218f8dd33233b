// Serve root probing
// Decides once, at startup, whether the root is a file or a directory

use std::fs;
use std::path::PathBuf;

use super::types::{RootKind, ServerConfig};
use crate::error::StartupError;

impl ServerConfig {
    /// Inspect `root_path` and build the immutable serve description.
    ///
    /// Blocking on purpose: this runs before the runtime and the listener exist.
    pub fn probe(root_path: impl Into<PathBuf>, port: u16) -> Result<Self, StartupError> {
        let root_path = root_path.into();

        let metadata = fs::metadata(&root_path)
            .map_err(|e| StartupError::from_probe(root_path.clone(), e))?;

        let root_kind = if metadata.is_dir() {
            RootKind::Directory
        } else if metadata.is_file() {
            RootKind::File
        } else {
            RootKind::Other
        };

        let canonical_root = fs::canonicalize(&root_path)
            .map_err(|e| StartupError::from_probe(root_path.clone(), e))?;

        Ok(Self {
            root_path,
            root_kind,
            canonical_root,
            port,
        })
    }
}
