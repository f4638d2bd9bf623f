//! Artifact Writers
//!
//! The only place generated source touches the outside world. Writers are
//! handed a fully rendered artifact exactly once per run.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::TweakError;

/// Result of handing an artifact to a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The destination already held identical content
    Unchanged,
}

/// Destination for a rendered artifact
pub trait ArtifactWriter {
    fn write_artifact(&mut self, contents: &str) -> Result<WriteOutcome, TweakError>;
}

/// Writes to a file through a sibling temp file, so the destination is
/// never observed half-written
#[derive(Debug, Clone)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current content of the destination, if it exists and is readable
    pub fn existing(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }
}

impl ArtifactWriter for FileWriter {
    fn write_artifact(&mut self, contents: &str) -> Result<WriteOutcome, TweakError> {
        if self.existing().as_deref() == Some(contents) {
            log::info!("{} is up to date", self.path.display());
            return Ok(WriteOutcome::Unchanged);
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| TweakError::io(dir, e))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| TweakError::io(dir, e))?;
        staged
            .write_all(contents.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| TweakError::io(staged.path(), e))?;
        staged
            .persist(&self.path)
            .map_err(|e| TweakError::io(&self.path, e.error))?;

        log::info!("Wrote {} ({} bytes)", self.path.display(), contents.len());
        Ok(WriteOutcome::Written)
    }
}

/// Writes the artifact to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter;

impl ArtifactWriter for StdoutWriter {
    fn write_artifact(&mut self, contents: &str) -> Result<WriteOutcome, TweakError> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(contents.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| TweakError::io("<stdout>", e))?;
        Ok(WriteOutcome::Written)
    }
}

/// Keeps the artifact in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    contents: Option<String>,
    writes: usize,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of times the writer was invoked
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ArtifactWriter for MemoryWriter {
    fn write_artifact(&mut self, contents: &str) -> Result<WriteOutcome, TweakError> {
        self.writes += 1;
        self.contents = Some(contents.to_string());
        Ok(WriteOutcome::Written)
    }
}
