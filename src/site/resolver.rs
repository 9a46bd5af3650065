//! Request target resolution.
//!
//! Targets are normalized onto the document root by its marker (the root
//! directory's own name), then classified:
//!
//! ```text
//! ends in .html/.txt ──► regular file under root? ──► File
//!                                 └─ else ──────────► NotFound
//! otherwise ──► <path>/index.html is a file? ──► File
//!               <path> is a directory? ──────► Listing
//!               else ────────────────────────► NotFound
//! ```
//!
//! Every candidate is canonicalized and must stay under the canonical root.
//! Anything outside is treated as absent.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::site::{listing, not_found};

/// Suffixes that mark a target as a direct file reference.
const FILE_SUFFIXES: [&str; 2] = [".html", ".txt"];

/// What a request target resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Contents of a file, either named directly or a directory's index.
    File { content: Vec<u8>, source: PathBuf },
    /// Generated listing of a directory with no index file.
    Listing { content: Vec<u8>, source: PathBuf },
    /// Nothing matched.
    NotFound { target: String },
}

impl Resource {
    /// Body bytes for this resource. `NotFound` renders the error page.
    pub fn into_body(self) -> Vec<u8> {
        match self {
            Resource::File { content, .. } | Resource::Listing { content, .. } => content,
            Resource::NotFound { target } => not_found::render(&target).into_bytes(),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Resource::NotFound { .. })
    }
}

#[derive(Debug)]
pub enum ResolveError {
    /// The configured root is missing, not a directory, or has no name.
    InvalidRoot { path: PathBuf, reason: String },
    /// A file or directory under the root was identified but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoot { path, reason } => {
                write!(f, "invalid document root {}: {}", path.display(), reason)
            }
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRoot { .. } => None,
            Self::Read { source, .. } => Some(source),
        }
    }
}

/// A canonicalized document root.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    /// Canonical path of the root directory itself
    root: PathBuf,
    /// Directory holding the root; normalized paths are joined onto it
    base: PathBuf,
    /// The root directory's name, e.g. "webroot"
    marker: String,
    /// File served in place of a directory when present
    index_file: String,
}

impl DocumentRoot {
    /// Opens `dir` as the document root, serving `index_file` for directories.
    pub async fn open(
        dir: impl AsRef<Path>,
        index_file: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let dir = dir.as_ref();
        let invalid = |reason: String| ResolveError::InvalidRoot {
            path: dir.to_path_buf(),
            reason,
        };

        let root = fs::canonicalize(dir).await.map_err(|e| invalid(e.to_string()))?;

        let meta = fs::metadata(&root).await.map_err(|e| invalid(e.to_string()))?;
        if !meta.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }

        let marker = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid("root directory has no name".to_string()))?;

        let base = root
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| invalid("root directory has no parent".to_string()))?;

        Ok(Self {
            root,
            base,
            marker,
            index_file: index_file.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Maps a request target onto the marker namespace.
    ///
    /// A target already carrying the marker (with or without one leading
    /// slash) keeps it; anything else gets the marker prepended verbatim.
    pub fn normalize(&self, target: &str) -> String {
        let unslashed = target.strip_prefix('/').unwrap_or(target);

        if unslashed.starts_with(&self.marker) {
            unslashed.to_string()
        } else {
            format!("{}{}", self.marker, target)
        }
    }

    /// Resolves a request target to exactly one resource.
    pub async fn resolve(&self, target: &str) -> Result<Resource, ResolveError> {
        let normalized = self.normalize(target);
        let path = self.base.join(&normalized);

        if FILE_SUFFIXES.iter().any(|s| normalized.ends_with(s)) {
            return match self.contained_file(&path).await {
                Some(file) => self.read_file(file).await,
                None => Ok(Self::not_found(target)),
            };
        }

        if let Some(index) = self.contained_file(&path.join(&self.index_file)).await {
            return self.read_file(index).await;
        }

        if let Some(dir) = self.contained_dir(&path).await {
            let names = listing::entry_names(&dir)
                .await
                .map_err(|source| ResolveError::Read {
                    path: dir.clone(),
                    source,
                })?;

            let public_dir = self.public_path(&normalized);
            let page = listing::render(&self.marker, public_dir, target, &names);

            return Ok(Resource::Listing {
                content: page.into_bytes(),
                source: dir,
            });
        }

        Ok(Self::not_found(target))
    }

    /// The normalized path as clients see it: marker prefix removed.
    fn public_path<'a>(&self, normalized: &'a str) -> &'a str {
        normalized.strip_prefix(&self.marker).unwrap_or(normalized)
    }

    fn not_found(target: &str) -> Resource {
        Resource::NotFound {
            target: target.to_string(),
        }
    }

    async fn read_file(&self, path: PathBuf) -> Result<Resource, ResolveError> {
        match fs::read(&path).await {
            Ok(content) => Ok(Resource::File {
                content,
                source: path,
            }),
            Err(source) => Err(ResolveError::Read { path, source }),
        }
    }

    async fn contained_file(&self, candidate: &Path) -> Option<PathBuf> {
        let path = self.contain(candidate).await?;
        let meta = fs::metadata(&path).await.ok()?;
        meta.is_file().then_some(path)
    }

    async fn contained_dir(&self, candidate: &Path) -> Option<PathBuf> {
        let path = self.contain(candidate).await?;
        let meta = fs::metadata(&path).await.ok()?;
        meta.is_dir().then_some(path)
    }

    /// Canonicalizes `candidate` and checks it lies under the root.
    async fn contain(&self, candidate: &Path) -> Option<PathBuf> {
        // A missing path is the common case, not worth a log line.
        let canonical = fs::canonicalize(candidate).await.ok()?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!(
                requested = %candidate.display(),
                resolved = %canonical.display(),
                "Path outside document root blocked"
            );
            return None;
        }

        Some(canonical)
    }
}
