use std::path::PathBuf;

use serde::Deserialize;

/// Marker written in the URL column when a dependency declares no project URL.
pub const NO_URL_MARKER: &str = "x";

/// Value of the fixed flag column on every row.
pub const ROW_FLAG: &str = "N";

/// One externally resolved third-party artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct Dependency {
    pub group: String,
    pub name: String,
    pub version: String,
    /// Path to the dependency's descriptor document (a POM).
    #[serde(default)]
    pub descriptor: Option<PathBuf>,
    /// Path to a bundled license archive, if the artifact ships one.
    #[serde(default)]
    pub archive: Option<PathBuf>,
}

impl Dependency {
    /// Identity key, `group:name`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    /// Full coordinate used in error and log context.
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.version)
    }

    /// Display name used when nothing better is known.
    pub fn default_display_name(&self) -> String {
        format!("{} {} ({})", self.group, self.name, self.key())
    }
}

/// A license name and reference URL. Both empty means "unknown license".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseInfo {
    pub name: String,
    pub url: String,
}

impl LicenseInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One row of the structured-record output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseEntry {
    pub display_name: String,
    pub version: String,
    pub url_or_marker: String,
    pub license_name: String,
    pub license_url: String,
}

impl LicenseEntry {
    /// Fields in output column order. Always 13 entries.
    pub fn fields(&self) -> [&str; 13] {
        [
            "",
            "",
            &self.display_name,
            &self.version,
            &self.url_or_marker,
            ROW_FLAG,
            "",
            "",
            &self.license_name,
            &self.license_url,
            "",
            "",
            "",
        ]
    }
}

/// How many of a dependency's declared licenses become rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPolicy {
    /// Only the first declared license.
    Single,
    /// Every declared license, in declaration order.
    AllDeclared,
}

impl std::fmt::Display for EmitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitPolicy::Single => write!(f, "single"),
            EmitPolicy::AllDeclared => write!(f, "all-declared"),
        }
    }
}

/// Where the license of an emitted row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseSource {
    Descriptor,
    Override,
    Bundled,
    Missing,
}

impl std::fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseSource::Descriptor => write!(f, "descriptor"),
            LicenseSource::Override => write!(f, "override"),
            LicenseSource::Bundled => write!(f, "bundled"),
            LicenseSource::Missing => write!(f, "missing"),
        }
    }
}
