//! File-backed artifact store for a single project directory.

mod layout;

pub use layout::Artifact;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::InterviewRecord;

/// Separator written after every draft scene.
const SCENE_SEPARATOR: &str = "\n\n";

/// Artifact store errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{artifact} file not found at: {}", path.display())]
    NotFound { artifact: Artifact, path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ArtifactError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Maps a project directory to its four artifacts.
///
/// The directory itself is created lazily by the first write.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.root.join(artifact.file_name())
    }

    // ============================================================
    // Raw text
    // ============================================================

    pub fn load_raw_text(&self) -> Result<String> {
        self.read(Artifact::RawText)
    }

    // ============================================================
    // Outline
    // ============================================================

    pub fn load_outline(&self) -> Result<String> {
        self.read(Artifact::Outline)
    }

    pub fn save_outline(&self, text: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path(Artifact::Outline);
        fs::write(&path, text).map_err(|source| ArtifactError::Io { path, source })
    }

    // ============================================================
    // Interview data
    // ============================================================

    /// Load interview records, treating a missing file as an empty sequence.
    pub fn load_interview_records(&self) -> Result<Vec<InterviewRecord>> {
        Ok(self.read_interview_records()?.unwrap_or_default())
    }

    /// Load interview records, returning `None` when the file does not exist.
    pub fn read_interview_records(&self) -> Result<Option<Vec<InterviewRecord>>> {
        let content = match self.read(Artifact::InterviewData) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let records = serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
            path: self.path(Artifact::InterviewData),
            source,
        })?;
        Ok(Some(records))
    }

    /// Replace the persisted records with `records`.
    ///
    /// Written to a uniquely named temp file in the project directory, synced,
    /// then renamed over the old one, so an interrupted save leaves the
    /// previous sequence intact.
    pub fn save_interview_records(&self, records: &[InterviewRecord]) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path(Artifact::InterviewData);
        let json = to_json_pretty(records).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;

        let io_err = |source: io::Error| ArtifactError::Io {
            path: path.clone(),
            source,
        };
        let mut temp_file = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        temp_file.write_all(&json).map_err(io_err)?;
        temp_file.as_file().sync_all().map_err(io_err)?;
        temp_file.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    // ============================================================
    // Draft
    // ============================================================

    pub fn load_draft(&self) -> Result<String> {
        self.read(Artifact::Draft)
    }

    /// Append a markdown block plus a blank-line separator, creating the draft
    /// if needed.
    pub fn append_draft_scene(&self, block: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path(Artifact::Draft);
        let write = || -> io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(block.as_bytes())?;
            file.write_all(SCENE_SEPARATOR.as_bytes())?;
            file.flush()
        };
        write().map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })
    }

    /// Truncate the draft to empty, creating it if needed.
    pub fn clear_draft(&self) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path(Artifact::Draft);
        fs::write(&path, "").map_err(|source| ArtifactError::Io { path, source })
    }

    // ============================================================
    // Helpers
    // ============================================================

    fn read(&self, artifact: Artifact) -> Result<String> {
        let path = self.path(artifact);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ArtifactError::NotFound { artifact, path },
            _ => ArtifactError::Io { path, source },
        })
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| ArtifactError::Io {
            path: self.root.clone(),
            source,
        })
    }
}

/// Pretty-print with 4-space indentation.
fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
