// src/loader/source.rs
//! Text file sources for the loader.
use crate::error::MapError;
use std::path::PathBuf;

/// Where map text files come from. Paths are relative to the map root and
/// always use `/`.
#[allow(async_fn_in_trait)]
pub trait MapSource {
    /// Fetch one text file.
    async fn fetch_text(&self, path: &str) -> Result<String, MapError>;

    /// Cooperative yield between load batches. No-op by default.
    async fn yield_now(&self) {}
}

/// Reads straight from the local file system.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsSource { root: root.into() }
    }
}

impl MapSource for FsSource {
    async fn fetch_text(&self, path: &str) -> Result<String, MapError> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                MapError::NotFound(path.to_owned())
            } else {
                MapError::Io { path: full, source }
            }
        })
    }
}

/// Loads through macroquad's asset layer, which is a browser fetch on wasm.
/// Needs a running macroquad context.
#[derive(Debug, Clone)]
pub struct MacroquadSource {
    root: String,
}

impl MacroquadSource {
    /// Source rooted at `root` (URL prefix or asset folder).
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.ends_with('/') {
            root.pop();
        }
        MacroquadSource { root }
    }

    fn url(&self, path: &str) -> String {
        if self.root.is_empty() {
            path.to_owned()
        } else {
            format!("{}/{}", self.root, path)
        }
    }
}

impl MapSource for MacroquadSource {
    async fn fetch_text(&self, path: &str) -> Result<String, MapError> {
        let url = self.url(path);
        macroquad::file::load_string(&url)
            .await
            .map_err(|err| MapError::Fetch {
                path: url,
                message: err.to_string(),
            })
    }

    async fn yield_now(&self) {
        macroquad::window::next_frame().await;
    }
}
