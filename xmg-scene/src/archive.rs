//! Named-resource lookup.
//!
//! An [`Archive`] maps member names to byte streams. Names use `/` as the
//! separator regardless of platform.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from archive lookups.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No member with this name exists.
    #[error("Archive member not found: {0}")]
    NotFound(String),

    /// The name is empty, absolute or tries to leave the archive.
    #[error("Invalid archive member name: {0:?}")]
    InvalidName(String),

    /// The member exists but could not be read.
    #[error("Failed to read archive member {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    /// Returns true if the member simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Source of named byte streams.
#[allow(async_fn_in_trait)]
pub trait Archive {
    /// Read a member in full.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::NotFound`] if the member does not exist.
    async fn read_member(&self, name: &str) -> Result<Bytes, ArchiveError>;

    /// Returns true if a member with this name exists.
    async fn contains(&self, name: &str) -> bool;

    /// All member names, sorted.
    async fn member_names(&self) -> Result<Vec<String>, ArchiveError>;
}

/// Archive backed by a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a member name to a path under the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, ArchiveError> {
        let relative = Path::new(name);
        let mut path = self.root.clone();
        let mut parts = 0;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    parts += 1;
                }
                Component::CurDir => {}
                _ => return Err(ArchiveError::InvalidName(name.to_string())),
            }
        }
        if parts == 0 {
            return Err(ArchiveError::InvalidName(name.to_string()));
        }
        Ok(path)
    }
}

impl Archive for DirectoryArchive {
    async fn read_member(&self, name: &str) -> Result<Bytes, ArchiveError> {
        let path = self.resolve(name)?;
        trace!("Reading archive member {} from {}", name, path.display());
        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!("Read archive member {} ({} bytes)", name, data.len());
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ArchiveError::NotFound(name.to_string()))
            }
            Err(source) => Err(ArchiveError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }

    async fn contains(&self, name: &str) -> bool {
        let Ok(path) = self.resolve(name) else {
            return false;
        };
        tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn member_names(&self) -> Result<Vec<String>, ArchiveError> {
        let io_error = |source: io::Error| ArchiveError::Io {
            name: self.root.display().to_string(),
            source,
        };

        let mut names = Vec::new();
        let mut pending = vec![(self.root.clone(), String::new())];
        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_error)?;
            while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                let name = if prefix.is_empty() {
                    file_name
                } else {
                    format!("{}/{}", prefix, file_name)
                };
                let file_type = entry.file_type().await.map_err(io_error)?;
                if file_type.is_dir() {
                    pending.push((entry.path(), name));
                } else if file_type.is_file() {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Archive held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    members: BTreeMap<String, Bytes>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a member.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.members.insert(name.into(), data.into());
    }

    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Archive for MemoryArchive {
    async fn read_member(&self, name: &str) -> Result<Bytes, ArchiveError> {
        self.members
            .get(name)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(name.to_string()))
    }

    async fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    async fn member_names(&self) -> Result<Vec<String>, ArchiveError> {
        Ok(self.members.keys().cloned().collect())
    }
}
