//! Abstract documents handed to the linter.
//!
//! Discovery of documents happens outside the core; the core only needs an
//! identifier, a type tag, lazy access to the text, and the stat data the
//! cache keys on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use parking_lot::RwLock;

/// Modification data used to decide whether a cached result is stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStat {
    /// Modification time in milliseconds since the Unix epoch.
    pub mtime: f64,
    /// Size in bytes, when known.
    pub size: Option<u64>,
}

/// A source document.
pub trait Document: Send + Sync {
    /// Stable identifier; absolute path for files.
    fn id(&self) -> &str;

    /// Type tag such as `css`, `tsx` or `vue`.
    fn kind(&self) -> &str;

    /// Reads the document text. Called at most when the linter needs it.
    fn text(&self) -> io::Result<String>;

    /// Returns the current modification data.
    fn stat(&self) -> io::Result<DocumentStat>;

    /// Replaces the document text. Used by fix application.
    fn write_text(&self, text: &str) -> io::Result<()>;
}

/// Derives a document type tag from a path's extension.
pub fn kind_from_path(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// A document backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    id: String,
    kind: String,
}

impl FileDocument {
    /// Creates a document for `path`. The type tag comes from the extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = kind_from_path(&path);
        let id = path.to_string_lossy().to_string();
        Self { path, id, kind }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Document for FileDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn text(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn stat(&self) -> io::Result<DocumentStat> {
        let metadata = fs::metadata(&self.path)?;
        let mtime = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        Ok(DocumentStat {
            mtime,
            size: Some(metadata.len()),
        })
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        fs::write(&self.path, text)
    }
}

/// An in-memory document.
///
/// Writes bump the modification time so that a cache sees the change.
#[derive(Debug)]
pub struct SourceDocument {
    id: String,
    kind: String,
    state: RwLock<SourceState>,
}

#[derive(Debug)]
struct SourceState {
    text: String,
    mtime: f64,
}

impl SourceDocument {
    /// Creates an in-memory document with modification time `0`.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            state: RwLock::new(SourceState {
                text: text.into(),
                mtime: 0.0,
            }),
        }
    }

    /// Sets the modification time.
    pub fn with_mtime(self, mtime: f64) -> Self {
        self.state.write().mtime = mtime;
        self
    }

    /// Returns a copy of the current text.
    pub fn current_text(&self) -> String {
        self.state.read().text.clone()
    }
}

impl Document for SourceDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn text(&self) -> io::Result<String> {
        Ok(self.state.read().text.clone())
    }

    fn stat(&self) -> io::Result<DocumentStat> {
        let state = self.state.read();
        Ok(DocumentStat {
            mtime: state.mtime,
            size: Some(state.text.len() as u64),
        })
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        let mut state = self.state.write();
        state.text = text.to_string();
        state.mtime += 1.0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(kind_from_path(Path::new("/a/b/App.TSX")), "tsx");
        assert_eq!(kind_from_path(Path::new("styles.css")), "css");
        assert_eq!(kind_from_path(Path::new("Makefile")), "");
    }

    #[test]
    fn test_file_document_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{color:red}").unwrap();

        let doc = FileDocument::new(&path);
        assert_eq!(doc.kind(), "css");
        assert_eq!(doc.text().unwrap(), "a{color:red}");
        assert_eq!(doc.stat().unwrap().size, Some(12));

        doc.write_text("a{}").unwrap();
        assert_eq!(doc.text().unwrap(), "a{}");
    }

    #[test]
    fn test_file_document_missing() {
        let doc = FileDocument::new("/nonexistent/file.css");
        assert!(doc.text().is_err());
        assert!(doc.stat().is_err());
    }

    #[test]
    fn test_source_document_write_bumps_mtime() {
        let doc = SourceDocument::new("mem.css", "css", "bad").with_mtime(10.0);
        assert_eq!(doc.stat().unwrap().mtime, 10.0);

        doc.write_text("good").unwrap();
        let stat = doc.stat().unwrap();
        assert_eq!(stat.mtime, 11.0);
        assert_eq!(stat.size, Some(4));
        assert_eq!(doc.current_text(), "good");
    }
}
