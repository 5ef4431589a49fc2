use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ManifestError, Result};
use crate::models::LicenseInfo;

/// On-disk form of the override manifest.
#[derive(Debug, Default, Deserialize)]
struct OverrideManifest {
    #[serde(default, rename = "dependency")]
    dependencies: Vec<OverrideRecord>,
}

#[derive(Debug, Deserialize)]
struct OverrideRecord {
    /// Omitted for legacy entries keyed by bare name.
    #[serde(default)]
    group: Option<String>,
    name: String,
    #[serde(default)]
    license: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// A substitute license for a dependency whose descriptor declares none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub license: LicenseInfo,
    pub display_name: Option<String>,
}

/// Curated substitutes, loaded once before any dependency is processed.
///
/// Lookup prefers an exact `group:name` entry; a bare-name entry applies to a
/// dependency of that name in any group when no qualified entry exists.
#[derive(Debug, Default)]
pub struct OverrideResolver {
    qualified: HashMap<String, OverrideEntry>,
    bare: HashMap<String, OverrideEntry>,
}

impl OverrideResolver {
    /// Load a TOML override manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Overrides {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let resolver = Self::from_toml(&content).map_err(|message| ManifestError::Overrides {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(
            "loaded {} override(s) from {}",
            resolver.len(),
            path.display()
        );
        Ok(resolver)
    }

    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        let manifest: OverrideManifest = toml::from_str(content).map_err(|e| e.to_string())?;
        let mut resolver = Self::default();
        for record in manifest.dependencies {
            let entry = OverrideEntry {
                license: LicenseInfo::new(record.license, record.url),
                display_name: record.display_name,
            };
            let (map, key) = match record.group {
                Some(group) => (&mut resolver.qualified, format!("{}:{}", group, record.name)),
                None => (&mut resolver.bare, record.name),
            };
            if map.contains_key(&key) {
                warn!("duplicate override for {}, keeping the first", key);
                continue;
            }
            map.insert(key, entry);
        }
        Ok(resolver)
    }

    pub fn lookup(&self, group: &str, name: &str) -> Option<&OverrideEntry> {
        self.qualified
            .get(&format!("{}:{}", group, name))
            .or_else(|| self.bare.get(name))
    }

    pub fn len(&self) -> usize {
        self.qualified.len() + self.bare.len()
    }
}
