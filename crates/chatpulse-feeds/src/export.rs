//! Export sink writing one JSON array per row to an append-only file.

use chatpulse_core::sinks::ExportSink;
use chatpulse_core::ExportError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonlExportSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlExportSink {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!(path = %path.display(), "export sink opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for JsonlExportSink {
    fn append_row(&self, fields: &[String]) -> Result<(), ExportError> {
        let mut line = serde_json::to_vec(fields)?;
        line.push(b'\n');
        let mut file = self
            .file
            .lock()
            .map_err(|_| ExportError::Unavailable("export file lock poisoned".to_string()))?;
        file.write_all(&line)?;
        Ok(())
    }
}
