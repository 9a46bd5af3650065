//! Shared filesystem fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use docserve::http::respond::StatusPolicy;
use docserve::site::{DocumentRoot, Site};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A scratch directory holding a `webroot/` document root. Removed on drop.
pub struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("docserve-test-{}-{}", std::process::id(), id));

        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("webroot")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.join("webroot")
    }

    /// Directory containing the document root.
    pub fn outside(&self) -> &Path {
        &self.dir
    }

    /// Writes a file relative to the document root, creating parent dirs.
    pub fn write(&self, rel: &str, contents: &str) -> &Self {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
        self
    }

    pub fn mkdir(&self, rel: &str) -> &Self {
        std::fs::create_dir_all(self.root().join(rel)).unwrap();
        self
    }

    pub async fn document_root(&self) -> DocumentRoot {
        DocumentRoot::open(self.root(), "index.html").await.unwrap()
    }

    pub async fn site(&self, policy: StatusPolicy) -> Site {
        Site::new(self.document_root().await, policy)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
