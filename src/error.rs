//! Fatal error taxonomy for a manifest run.
//!
//! Per-dependency problems that can be recovered from (malformed descriptors,
//! missing licenses) never surface here; they are logged and reported as gaps.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Error, Debug)]
pub enum ManifestError {
    /// A bundled license text could not be read in full.
    #[error("Failed to read license text.")]
    LicenseTextRead(#[source] std::io::Error),

    #[error("Failed to initialize output at {path:?}")]
    OutputInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid license text directory name {name:?}: must be a relative path without `.` or `..`")]
    InvalidTextDir { name: String },

    #[error("Failed to write license record to {path:?}")]
    RecordWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write license text to {path:?}")]
    TextWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read license archive {path:?}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Invalid license index in archive {path:?}")]
    BundleIndex {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid override manifest {path:?}: {message}")]
    Overrides { path: PathBuf, message: String },

    #[error("Failed to process dependency {coordinate}")]
    Dependency {
        coordinate: String,
        #[source]
        source: Box<ManifestError>,
    },
}

impl ManifestError {
    /// Attach the failing dependency's coordinate.
    pub fn for_dependency(self, coordinate: impl Into<String>) -> Self {
        ManifestError::Dependency {
            coordinate: coordinate.into(),
            source: Box::new(self),
        }
    }
}
