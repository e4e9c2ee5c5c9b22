//! Writes exports into a directory.

use crate::domain::config_validation::DEFAULT_EXPORT_DIR;
use crate::domain::error::PicksError;
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;
use std::fs;
use std::path::PathBuf;

pub struct FileExportAdapter {
    directory: PathBuf,
}

impl FileExportAdapter {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let dir = config
            .get_string("export", "directory")
            .unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string());
        Self::new(PathBuf::from(dir))
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }
}

impl ExportPort for FileExportAdapter {
    fn deliver(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, PicksError> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(PicksError::Export {
                reason: format!("invalid export filename {filename:?}"),
            });
        }
        fs::create_dir_all(&self.directory).map_err(|e| PicksError::Export {
            reason: format!("cannot create {}: {}", self.directory.display(), e),
        })?;
        let path = self.directory.join(filename);
        fs::write(&path, contents).map_err(|e| PicksError::Export {
            reason: format!("cannot write {}: {}", path.display(), e),
        })?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "export written");
        Ok(path)
    }
}
