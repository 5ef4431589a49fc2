//! Per-dependency license resolution and emission.
//!
//! For each dependency: classify its version, extract declared licenses, fall
//! back to the override manifest, de-duplicate, and append rows. Bundled
//! component texts are handled afterwards for dependencies that ship an archive.

use std::path::Path;

use tracing::{debug, warn};

use crate::bundle::LicenseBundle;
use crate::descriptor::{read_descriptor, Descriptor};
use crate::error::Result;
use crate::ledger::DedupLedger;
use crate::license::known::canonical_name;
use crate::license::overrides::OverrideResolver;
use crate::license::version::GranularFamily;
use crate::models::{
    Dependency, EmitPolicy, LicenseEntry, LicenseInfo, LicenseSource, NO_URL_MARKER,
};
use crate::report::records::RecordWriter;
use crate::report::texts::TextStore;

/// Counters and gap rows collected over one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub dependencies: usize,
    pub rows: usize,
    pub duplicates: usize,
    pub overrides: usize,
    pub texts: usize,
    /// Rows emitted with no license at all.
    pub gaps: Vec<LicenseEntry>,
}

/// Owns every piece of mutable run state: the ledger, the record file and the
/// text store. Construct one per run.
pub struct Generator {
    family: GranularFamily,
    overrides: OverrideResolver,
    ledger: DedupLedger,
    records: RecordWriter,
    texts: TextStore,
    stats: RunStats,
}

impl Generator {
    pub fn new(
        family: GranularFamily,
        overrides: OverrideResolver,
        records: RecordWriter,
        texts: TextStore,
    ) -> Self {
        Self {
            family,
            overrides,
            ledger: DedupLedger::new(),
            records,
            texts,
            stats: RunStats::default(),
        }
    }

    /// Prepare the output. Must succeed before any dependency is processed.
    ///
    /// The text store is reset first so it can never remove a freshly
    /// initialized record file.
    pub fn init(&mut self) -> Result<()> {
        self.texts.init()?;
        self.records.init()
    }

    pub fn records_path(&self) -> &Path {
        self.records.path()
    }

    /// Process one dependency. Fatal errors carry its coordinate.
    pub fn process(&mut self, dep: &Dependency) -> Result<()> {
        self.stats.dependencies += 1;
        self.process_inner(dep)
            .map_err(|e| e.for_dependency(dep.coordinate()))
    }

    fn process_inner(&mut self, dep: &Dependency) -> Result<()> {
        let descriptor = dep
            .descriptor
            .as_deref()
            .map(read_descriptor)
            .unwrap_or_default();
        self.add_licenses_from_descriptor(dep, &descriptor)?;

        if let Some(archive) = dep.archive.as_deref() {
            self.add_bundled_licenses(dep, archive)?;
        }
        Ok(())
    }

    /// Emit rows for the licenses `descriptor` declares, or a substitute.
    pub fn add_licenses_from_descriptor(
        &mut self,
        dep: &Dependency,
        descriptor: &Descriptor,
    ) -> Result<()> {
        let policy = self.family.policy_for(&dep.group, &dep.version);
        let display_name = match &descriptor.project_name {
            Some(name) => format!("{} ({})", name, dep.key()),
            None => dep.default_display_name(),
        };
        let url = descriptor
            .project_url
            .clone()
            .unwrap_or_else(|| NO_URL_MARKER.to_string());

        debug!(
            "{}: {} declared license(s), policy {}",
            dep.coordinate(),
            descriptor.licenses.len(),
            policy
        );

        let mut candidates: Vec<(String, LicenseInfo, LicenseSource)> =
            select(policy, &descriptor.licenses)
                .iter()
                .map(|license| {
                    (
                        display_name.clone(),
                        license.clone(),
                        LicenseSource::Descriptor,
                    )
                })
                .collect();

        if candidates.is_empty() {
            candidates.push(match self.overrides.lookup(&dep.group, &dep.name) {
                Some(entry) => (
                    entry.display_name.clone().unwrap_or(display_name),
                    entry.license.clone(),
                    LicenseSource::Override,
                ),
                None => (display_name, LicenseInfo::default(), LicenseSource::Missing),
            });
        }

        for (display_name, license, source) in candidates {
            let license = with_canonical_name(license);
            let entry = LicenseEntry {
                display_name,
                version: dep.version.clone(),
                url_or_marker: url.clone(),
                license_name: license.name,
                license_url: license.url,
            };
            self.emit(entry, source)?;
        }
        Ok(())
    }

    /// Emit one row per component text bundled in `archive`.
    pub fn add_bundled_licenses(&mut self, dep: &Dependency, archive: &Path) -> Result<()> {
        let Some(mut bundle) = LicenseBundle::open(archive)? else {
            return Ok(());
        };

        for (component, range) in bundle.components() {
            let text = bundle.read_text(range)?;
            if !self.ledger.should_emit(&component, &component) {
                self.stats.duplicates += 1;
                continue;
            }
            let reference = self.texts.store(&component, &text)?;
            let entry = LicenseEntry {
                display_name: component.clone(),
                version: dep.version.clone(),
                url_or_marker: NO_URL_MARKER.to_string(),
                license_name: component,
                license_url: reference,
            };
            self.write(entry, LicenseSource::Bundled)?;
        }
        Ok(())
    }

    fn emit(&mut self, entry: LicenseEntry, source: LicenseSource) -> Result<()> {
        if !self
            .ledger
            .should_emit(&entry.display_name, &entry.license_name)
        {
            debug!(
                "suppressed duplicate {} / {:?}",
                entry.display_name, entry.license_name
            );
            self.stats.duplicates += 1;
            return Ok(());
        }
        self.write(entry, source)
    }

    fn write(&mut self, entry: LicenseEntry, source: LicenseSource) -> Result<()> {
        self.records.append(&entry)?;
        self.stats.rows = self.records.rows();
        debug!("row {} from {}", entry.display_name, source);
        match source {
            LicenseSource::Override => self.stats.overrides += 1,
            LicenseSource::Bundled => self.stats.texts = self.texts.stored(),
            LicenseSource::Missing => {
                warn!("no license found for {}", entry.display_name);
                self.stats.gaps.push(entry);
            }
            LicenseSource::Descriptor => {}
        }
        Ok(())
    }

    pub fn finish(self) -> RunStats {
        self.stats
    }
}

fn select(policy: EmitPolicy, licenses: &[LicenseInfo]) -> &[LicenseInfo] {
    match policy {
        EmitPolicy::Single => &licenses[..licenses.len().min(1)],
        EmitPolicy::AllDeclared => licenses,
    }
}

fn with_canonical_name(mut license: LicenseInfo) -> LicenseInfo {
    if license.name.is_empty() {
        if let Some(name) = canonical_name(&license.url) {
            license.name = name.to_string();
        }
    }
    license
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::tests::play_services_zip;
    use crate::descriptor::parse_descriptor;
    use crate::license::version::NumericVersion;
    use crate::report::records::{HEADER, LINE_ENDING};
    use tempfile::TempDir;

    const DEPS1: &str = r#"<project>
  <name>groupA deps1</name>
  <licenses><license>
    <name>MIT License</name>
    <url>http://www.opensource.org/licenses/mit-license.php</url>
  </license></licenses>
</project>"#;

    const DEPS5: &str = r#"<project>
  <name>groupE deps5</name>
  <url>5</url>
  <licenses>
    <license><name>MIT License</name><url>http://www.opensource.org/licenses/mit-license.php</url></license>
    <license><name>Apache License, version 2.0</name><url>https://www.apache.org/licenses/LICENSE-2.0</url></license>
  </licenses>
</project>"#;

    const NO_LICENSE: &str = r#"<project>
  <name>no license</name>
  <url>https://github.com/google/guava</url>
</project>"#;

    const OVERRIDES: &str = r#"
[[dependency]]
group = "guava"
name = "guava"
license = "Apache License, version 2.0"
url = "http://www.apache.org/licenses/LICENSE-2.0.txt"

[[dependency]]
name = "jsr305"
url = "https://opensource.org/licenses/BSD-3-Clause"
display_name = "JSR 305"
"#;

    struct Fixture {
        dir: TempDir,
        generator: Generator,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let overrides_path = dir.path().join("overrides.toml");
            std::fs::write(&overrides_path, OVERRIDES).unwrap();
            let generator = Generator::new(
                GranularFamily::new("com.google.android.gms", NumericVersion(14, 0, 0)),
                OverrideResolver::load(&overrides_path).unwrap(),
                RecordWriter::new(dir.path().join("out").join("licenses.csv")),
                TextStore::new(&dir.path().join("out"), "texts").unwrap(),
            );
            Fixture { dir, generator }
        }

        /// Record file contents without the header line.
        fn rows(&self) -> String {
            let content = std::fs::read_to_string(self.generator.records_path()).unwrap();
            let header = format!("{}{}", HEADER.join(","), LINE_ENDING);
            content.strip_prefix(&header).unwrap().to_string()
        }

        fn add(&mut self, xml: &str, group: &str, name: &str, version: &str) {
            self.generator
                .add_licenses_from_descriptor(&dep(group, name, version), &parse_descriptor(xml))
                .unwrap();
        }
    }

    fn dep(group: &str, name: &str, version: &str) -> Dependency {
        Dependency {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            descriptor: None,
            archive: None,
        }
    }

    fn lines(rows: &[&str]) -> String {
        rows.iter().map(|r| format!("{}{}", r, LINE_ENDING)).collect()
    }

    #[test]
    fn test_single_license() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(DEPS1, "groupA", "deps1", "1");
        assert_eq!(
            f.rows(),
            lines(&[",,groupA deps1 (groupA:deps1),1,x,N,,,MIT License,http://www.opensource.org/licenses/mit-license.php,,,"])
        );
    }

    #[test]
    fn test_duplicate_suppressed() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(DEPS1, "groupA", "deps1", "1");
        f.add(DEPS1, "groupA", "deps1", "2");
        assert_eq!(f.rows().lines().count(), 1);
        let stats = f.generator.finish();
        assert_eq!(stats.rows, 1);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_same_license_different_identity_is_kept() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(DEPS1, "groupA", "deps1", "1");
        f.add(DEPS1, "groupB", "deps2", "1");
        assert_eq!(f.rows().lines().count(), 2);
    }

    #[test]
    fn test_multiple_licenses_in_declaration_order() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(DEPS5, "groupE", "deps5", "1");
        assert_eq!(
            f.rows(),
            lines(&[
                ",,groupE deps5 (groupE:deps5),1,5,N,,,MIT License,http://www.opensource.org/licenses/mit-license.php,,,",
                ",,groupE deps5 (groupE:deps5),1,5,N,,,\"Apache License, version 2.0\",https://www.apache.org/licenses/LICENSE-2.0,,,",
            ])
        );
    }

    #[test]
    fn test_granular_family_fans_out() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(DEPS5, "com.google.android.gms", "play-services-base", "14.6.0");
        assert_eq!(f.rows().lines().count(), 2);
    }

    #[test]
    fn test_legacy_family_keeps_first_license() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(DEPS5, "com.google.android.gms", "play-services-base", "11.4.0");
        let rows = f.rows();
        assert_eq!(rows.lines().count(), 1);
        assert!(rows.contains("MIT License"));
    }

    #[test]
    fn test_override_fallback_and_visible_gap() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add(NO_LICENSE, "guava", "guava", "1");
        f.add(r#"<project><name>no license2</name></project>"#, "guava2", "guava2", "1");
        assert_eq!(
            f.rows(),
            lines(&[
                ",,no license (guava:guava),1,https://github.com/google/guava,N,,,\"Apache License, version 2.0\",http://www.apache.org/licenses/LICENSE-2.0.txt,,,",
                ",,no license2 (guava2:guava2),1,x,N,,,,,,,",
            ])
        );
        let stats = f.generator.finish();
        assert_eq!(stats.overrides, 1);
        assert_eq!(stats.gaps.len(), 1);
        assert_eq!(stats.gaps[0].display_name, "no license2 (guava2:guava2)");
    }

    #[test]
    fn test_override_display_name_and_canonical_license_name() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add("<project/>", "com.google.code.findbugs", "jsr305", "3.0.2");
        assert_eq!(
            f.rows(),
            lines(&[",,JSR 305,3.0.2,x,N,,,BSD 3-Clause License,https://opensource.org/licenses/BSD-3-Clause,,,"])
        );
    }

    #[test]
    fn test_malformed_descriptor_falls_through() {
        let mut f = Fixture::new();
        f.generator.init().unwrap();
        f.add("<project><licenses></project>", "groupZ", "broken", "1");
        assert_eq!(
            f.rows(),
            lines(&[",,groupZ broken (groupZ:broken),1,x,N,,,,,,,"])
        );
    }

    #[test]
    fn test_process_reads_descriptor_and_bundle() {
        let mut f = Fixture::new();
        let pom = f.dir.path().join("base.pom");
        std::fs::write(&pom, DEPS1).unwrap();
        let aar = f.dir.path().join("play-services-foo-license.aar");
        play_services_zip(&aar);

        let mut base = dep("com.google.android.gms", "play-services-foo", "11.4.0");
        base.descriptor = Some(pom);
        base.archive = Some(aar.clone());
        let mut other = dep("com.google.android.gms", "play-services-bar", "11.4.0");
        other.archive = Some(aar);

        f.generator.init().unwrap();
        f.generator.process(&base).unwrap();
        f.generator.process(&other).unwrap();

        let rows = f.rows();
        let lines: Vec<&str> = rows.lines().collect();
        assert_eq!(
            lines,
            vec![
                ",,groupA deps1 (com.google.android.gms:play-services-foo),11.4.0,x,N,,,MIT License,http://www.opensource.org/licenses/mit-license.php,,,",
                ",,JSR 305,11.4.0,x,N,,,JSR 305,texts/0001-jsr-305.txt,,,",
                ",,safeparcel,11.4.0,x,N,,,safeparcel,texts/0002-safeparcel.txt,,,",
                ",,com.google.android.gms play-services-bar (com.google.android.gms:play-services-bar),11.4.0,x,N,,,,,,,",
            ]
        );
        assert_eq!(
            std::fs::read_to_string(f.dir.path().join("out/texts/0002-safeparcel.txt")).unwrap(),
            "Apache text for safeparcel"
        );

        let stats = f.generator.finish();
        assert_eq!(stats.dependencies, 2);
        assert_eq!(stats.texts, 2);
        assert_eq!(stats.duplicates, 2);
    }

    #[test]
    fn test_unreadable_archive_names_dependency() {
        let mut f = Fixture::new();
        let aar = f.dir.path().join("broken.aar");
        std::fs::write(&aar, "not a zip").unwrap();
        let mut d = dep("com.google.android.gms", "play-services-foo", "11.4.0");
        d.archive = Some(aar);

        f.generator.init().unwrap();
        let err = f.generator.process(&d).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to process dependency com.google.android.gms:play-services-foo:11.4.0"
        );
    }

    #[test]
    fn test_record_file_inside_text_store_survives_init() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let records = out.join("texts").join("licenses.csv");
        let mut generator = Generator::new(
            GranularFamily::new("com.google.android.gms", NumericVersion(14, 0, 0)),
            OverrideResolver::default(),
            RecordWriter::new(&records),
            TextStore::new(&out, "texts").unwrap(),
        );
        let aar = dir.path().join("play-services-foo-license.aar");
        play_services_zip(&aar);
        let mut d = dep("com.google.android.gms", "play-services-foo", "11.4.0");
        d.archive = Some(aar);

        generator.init().unwrap();
        generator.process(&d).unwrap();

        let content = std::fs::read_to_string(&records).unwrap();
        assert!(content.starts_with(&HEADER.join(",")));
        assert!(content.contains(",,safeparcel,11.4.0,x,N,,,safeparcel,texts/0002-safeparcel.txt,,,"));
        assert!(out.join("texts/0001-jsr-305.txt").is_file());
    }

    #[test]
    fn test_select_policy() {
        let licenses = vec![LicenseInfo::new("a", ""), LicenseInfo::new("b", "")];
        assert_eq!(select(EmitPolicy::Single, &licenses).len(), 1);
        assert_eq!(select(EmitPolicy::AllDeclared, &licenses).len(), 2);
        assert!(select(EmitPolicy::Single, &[]).is_empty());
    }
}
