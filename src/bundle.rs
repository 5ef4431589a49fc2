//! Sub-component license texts bundled inside an artifact archive.
//!
//! Legacy releases of the aggregated family ship `third_party_licenses.json`
//! (component name → byte range) next to `third_party_licenses.txt` (all texts
//! concatenated). Each component's text is cut out of the `.txt` entry with
//! [`extract_range`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{ManifestError, Result};
use crate::extract::extract_range;

pub const INDEX_ENTRY: &str = "third_party_licenses.json";
pub const TEXT_ENTRY: &str = "third_party_licenses.txt";

/// Location of one component's text inside [`TEXT_ENTRY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TextRange {
    pub start: u64,
    pub length: usize,
}

/// An opened archive that carries a license index.
pub struct LicenseBundle {
    path: PathBuf,
    archive: ZipArchive<File>,
    index: BTreeMap<String, TextRange>,
}

impl LicenseBundle {
    /// Open `path`. Returns `Ok(None)` when the archive does not contain both
    /// the index and the text entry.
    pub fn open(path: &Path) -> Result<Option<Self>> {
        let archive_err = |source| ManifestError::Archive {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|e| archive_err(zip::result::ZipError::Io(e)))?;
        let mut archive = ZipArchive::new(file).map_err(archive_err)?;

        let names: Vec<&str> = archive.file_names().collect();
        if !names.contains(&INDEX_ENTRY) || !names.contains(&TEXT_ENTRY) {
            debug!("{} carries no license index, skipping", path.display());
            return Ok(None);
        }

        let mut json = String::new();
        archive
            .by_name(INDEX_ENTRY)
            .map_err(archive_err)?
            .read_to_string(&mut json)
            .map_err(|e| archive_err(zip::result::ZipError::Io(e)))?;
        let index: BTreeMap<String, TextRange> =
            serde_json::from_str(&json).map_err(|source| ManifestError::BundleIndex {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "{} bundles {} component license(s)",
            path.display(),
            index.len()
        );
        Ok(Some(Self {
            path: path.to_path_buf(),
            archive,
            index,
        }))
    }

    /// Components in ascending name order.
    pub fn components(&self) -> Vec<(String, TextRange)> {
        self.index
            .iter()
            .map(|(name, range)| (name.clone(), *range))
            .collect()
    }

    /// Read one component's text from a fresh stream over the text entry.
    pub fn read_text(&mut self, range: TextRange) -> Result<Vec<u8>> {
        let mut entry = self
            .archive
            .by_name(TEXT_ENTRY)
            .map_err(|source| ManifestError::Archive {
                path: self.path.clone(),
                source,
            })?;
        extract_range(&mut entry, range.start, range.length)
    }
}
