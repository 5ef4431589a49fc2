use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::license::version::{GranularFamily, NumericVersion};

/// Root configuration, deserialized from `.oss-licenses/config.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override manifest used when `--overrides` is not given.
    pub overrides: Option<PathBuf>,
    pub output: OutputConfig,
    pub granular: GranularConfig,
}

/// Where the record file and raw texts are written.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Record file name inside `dir`.
    pub records: String,
    /// Raw-text subdirectory name inside `dir`.
    pub texts: String,
}

/// The aggregated dependency family whose licensing depends on its version.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GranularConfig {
    pub group: String,
    /// Lowest version that lists sub-component licenses individually.
    pub threshold: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            overrides: None,
            output: OutputConfig::default(),
            granular: GranularConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("build/oss-licenses"),
            records: "third_party_licenses.csv".to_string(),
            texts: "third_party_license_texts".to_string(),
        }
    }
}

impl Default for GranularConfig {
    fn default() -> Self {
        GranularConfig {
            group: "com.google.android.gms".to_string(),
            threshold: "14.0.0".to_string(),
        }
    }
}

impl Config {
    pub fn records_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.records)
    }

    /// Build the family classifier, rejecting a threshold that is not a version.
    pub fn granular_family(&self) -> Result<GranularFamily> {
        let threshold = NumericVersion::parse(&self.granular.threshold).with_context(|| {
            format!(
                "granular.threshold {:?} is not a version",
                self.granular.threshold
            )
        })?;
        Ok(GranularFamily::new(self.granular.group.clone(), threshold))
    }
}

/// Load the run configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.oss-licenses/config.toml`
/// 3. `~/.config/oss-licenses/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".oss-licenses").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("oss-licenses").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}
