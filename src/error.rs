use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for map data loading
#[derive(Debug)]
pub enum MapError {
    /// File I/O error while reading `path`
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// The requested file does not exist
    NotFound(String),
    /// A remote/asset fetch failed for a reason other than "not found"
    Fetch {
        /// Requested path
        path: String,
        /// Message from the fetch layer
        message: String,
    },
    /// JSON parse/encode error for the bulk map file
    Json {
        /// Bulk file path (or `<memory>`)
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// Structurally valid data that cannot be used
    InvalidMap(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => write!(f, "I/O error reading {}: {}", path.display(), source),
            MapError::NotFound(path) => write!(f, "File not found: {}", path),
            MapError::Fetch { path, message } => write!(f, "Failed to fetch {}: {}", path, message),
            MapError::Json { path, source } => write!(f, "JSON error in {}: {}", path.display(), source),
            MapError::InvalidMap(msg) => write!(f, "Invalid map data: {}", msg),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl MapError {
    /// True for the "file is simply absent" case, which loaders skip quietly.
    pub fn is_not_found(&self) -> bool {
        match self {
            MapError::NotFound(_) => true,
            MapError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
