//! Where JSON documents live.
//!
//! A [`Backend`] reads and replaces whole documents by name. The file
//! backend maps names to files in a data directory; the memory backend keeps
//! them in a map so tests never touch the filesystem.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::InvoiceError;

/// Whole-document storage.
pub trait Backend: Send + Sync {
    /// Read a document. `Ok(None)` when it does not exist.
    fn read(&self, name: &str) -> Result<Option<String>, InvoiceError>;

    /// Replace a document. Readers observe either the old or the new content.
    fn write(&self, name: &str, contents: &str) -> Result<(), InvoiceError>;
}

/// Shared handle to a backend.
pub type SharedBackend = Arc<dyn Backend>;

/// Documents stored as files in one directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl Backend for FileBackend {
    fn read(&self, name: &str) -> Result<Option<String>, InvoiceError> {
        match fs::read_to_string(self.path(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InvoiceError::io(name, e)),
        }
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), InvoiceError> {
        fs::create_dir_all(&self.dir).map_err(|e| InvoiceError::io(name, e))?;

        // Temp file in the target directory so the rename stays on one filesystem.
        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| InvoiceError::io(name, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| InvoiceError::io(name, e))?;
        let target = self.path(name);
        // The temp file is created private; keep the mode of the file it replaces.
        match fs::metadata(&target) {
            Ok(meta) => tmp
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| InvoiceError::io(name, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(InvoiceError::io(name, e)),
        }
        tmp.persist(&target)
            .map_err(|e| InvoiceError::io(name, e.error))?;

        tracing::debug!(document = name, bytes = contents.len(), "document replaced");
        Ok(())
    }
}

/// Documents held in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, e.g. with deliberately broken content.
    pub fn with_document(self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        if let Ok(mut docs) = self.docs.lock() {
            docs.insert(name.into(), contents.into());
        }
        self
    }

    fn poisoned(name: &str) -> InvoiceError {
        InvoiceError::io(name, std::io::Error::other("memory backend lock poisoned"))
    }
}

impl Backend for MemoryBackend {
    fn read(&self, name: &str) -> Result<Option<String>, InvoiceError> {
        let docs = self.docs.lock().map_err(|_| Self::poisoned(name))?;
        Ok(docs.get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), InvoiceError> {
        let mut docs = self.docs.lock().map_err(|_| Self::poisoned(name))?;
        docs.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Load a JSON document, falling back to `T::default()` when it is absent.
///
/// Content that does not parse as `T` is `CorruptData`; it is never
/// replaced by an empty value.
pub fn load_json<T>(backend: &dyn Backend, name: &str) -> Result<T, InvoiceError>
where
    T: DeserializeOwned + Default,
{
    match backend.read(name)? {
        None => Ok(T::default()),
        Some(contents) => {
            serde_json::from_str(&contents).map_err(|e| InvoiceError::corrupt(name, e))
        }
    }
}

/// Serialize `value` as indented JSON (UTF-8, non-ASCII kept verbatim) and
/// replace the document.
pub fn save_json<T: Serialize + ?Sized>(
    backend: &dyn Backend,
    name: &str,
    value: &T,
) -> Result<(), InvoiceError> {
    let mut contents = serde_json::to_string_pretty(value)
        .map_err(|e| InvoiceError::InvalidState(format!("cannot serialize {name}: {e}")))?;
    contents.push('\n');
    backend.write(name, &contents)
}
