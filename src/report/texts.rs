use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ManifestError, Result};

/// Directory of raw license texts referenced from the record file.
///
/// File names are `<NNNN>-<slug>.txt`, numbered in storage order, so the same
/// input always yields the same names.
#[derive(Debug)]
pub struct TextStore {
    root: PathBuf,
    /// Name of `root` as written into record rows.
    prefix: String,
    stored: usize,
}

impl TextStore {
    /// `dir` is the output directory; `name` the store's subdirectory.
    ///
    /// `name` must stay strictly below `dir`, since [`init`](Self::init)
    /// deletes the whole store.
    pub fn new(dir: &Path, name: &str) -> Result<Self> {
        let relative = Path::new(name);
        let below_dir = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !below_dir {
            return Err(ManifestError::InvalidTextDir {
                name: name.to_string(),
            });
        }
        Ok(Self {
            root: dir.join(relative),
            prefix: name.to_string(),
            stored: 0,
        })
    }

    pub fn stored(&self) -> usize {
        self.stored
    }

    /// Create the directory, discarding texts left by a previous run.
    pub fn init(&mut self) -> Result<()> {
        let init_err = |source| ManifestError::OutputInit {
            path: self.root.clone(),
            source,
        };
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root).map_err(init_err)?;
        }
        std::fs::create_dir_all(&self.root).map_err(init_err)?;
        self.stored = 0;
        Ok(())
    }

    /// Write `text` for `component` and return the reference to put in the
    /// record row.
    pub fn store(&mut self, component: &str, text: &[u8]) -> Result<String> {
        let file_name = format!("{:04}-{}.txt", self.stored + 1, slug(component));
        let path = self.root.join(&file_name);
        std::fs::write(&path, text).map_err(|source| ManifestError::TextWrite {
            path: path.clone(),
            source,
        })?;
        self.stored += 1;
        Ok(format!("{}/{}", self.prefix, file_name))
    }
}

fn slug(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));
    let lower = name.to_lowercase();
    let replaced = re.replace_all(&lower, "-");
    let cleaned = replaced.trim_matches('-');
    if cleaned.is_empty() {
        "license".to_string()
    } else {
        cleaned.to_string()
    }
}
