//! Receipt export sinks
//!
//! A [`ReceiptSink`] is the "save as file" collaborator: given bytes and a
//! suggested file name it makes the bytes available as a file.

use crate::error::ConsentError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Makes receipt bytes available to the user as a named file
pub trait ReceiptSink {
    /// Save `bytes` under `file_name`, returning where they landed
    ///
    /// # Errors
    /// Returns [`ConsentError::InvalidFileName`] unless `file_name` is a bare
    /// file name, or [`ConsentError::Export`] if the bytes could not be written
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsentError>;
}

impl<S: ReceiptSink + ?Sized> ReceiptSink for &mut S {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsentError> {
        (**self).save(file_name, bytes)
    }
}

/// Reject anything but a single plain path component
fn check_file_name(file_name: &str) -> Result<(), ConsentError> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConsentError::InvalidFileName(file_name.to_string())),
    }
}

/// Writes receipts into a directory, replacing any previous file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink rooted at `dir`; the directory is created on first save
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReceiptSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsentError> {
        check_file_name(file_name)?;
        fs::create_dir_all(&self.dir).map_err(|e| ConsentError::export_error(&self.dir, e))?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|e| ConsentError::export_error(&path, e))?;
        tracing::info!("Saved receipt to {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keeps saved receipts in memory, keyed by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    /// Empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes saved under `file_name`
    #[inline]
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.files.get(file_name).map(Vec::as_slice)
    }

    /// Saved file as UTF-8 text
    #[must_use]
    pub fn text(&self, file_name: &str) -> Option<&str> {
        self.get(file_name).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of distinct files saved
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was saved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ReceiptSink for MemorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsentError> {
        check_file_name(file_name)?;
        self.files.insert(file_name.to_string(), bytes.to_vec());
        Ok(PathBuf::from(file_name))
    }
}
