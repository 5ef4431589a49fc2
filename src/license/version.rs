use std::sync::OnceLock;

use regex::Regex;

use crate::models::EmitPolicy;

/// A `major.minor.patch` triple; missing components count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NumericVersion(pub u64, pub u64, pub u64);

impl NumericVersion {
    /// Parse the leading numeric part of a version string.
    ///
    /// `"14.6.0"`, `"14.6"`, and `"14.6.0-beta"` all parse; anything not starting
    /// with a digit returns `None`.
    pub fn parse(version: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("static version pattern")
        });

        let caps = re.captures(version.trim())?;
        let part = |i: usize| -> Option<u64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };
        Some(NumericVersion(part(1)?, part(2)?, part(3)?))
    }
}

impl std::fmt::Display for NumericVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// The one aggregated dependency family whose licensing changed at a version
/// boundary: at or above `threshold` every sub-component license is listed.
#[derive(Debug, Clone)]
pub struct GranularFamily {
    pub group: String,
    pub threshold: NumericVersion,
}

impl GranularFamily {
    pub fn new(group: impl Into<String>, threshold: NumericVersion) -> Self {
        Self {
            group: group.into(),
            threshold,
        }
    }

    pub fn contains(&self, group: &str) -> bool {
        self.group == group
    }

    /// True when `version` is at or above the threshold. Unparseable versions
    /// fall back to the legacy regime.
    pub fn is_granular(&self, version: &str) -> bool {
        NumericVersion::parse(version).is_some_and(|v| v >= self.threshold)
    }

    /// Emission policy for a dependency. Only legacy members of the family are
    /// restricted to a single license.
    pub fn policy_for(&self, group: &str, version: &str) -> EmitPolicy {
        if self.contains(group) && !self.is_granular(version) {
            EmitPolicy::Single
        } else {
            EmitPolicy::AllDeclared
        }
    }
}
