use crate::resolver::platform::Platform;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Extension of interface/schema files.
pub const SCHEMA_EXT: &str = ".proto";

/// Suffix replacing [`SCHEMA_EXT`] for sources generated from a schema.
pub const GENERATED_SUFFIX: &str = ".pb.go";

/// How a unit's identity is derived and which terminal rules it includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Identity is the directory path relative to the package root.
    Package,
    /// Identity is the name of the containing directory.
    Command,
}

impl TargetMode {
    pub fn is_package(self) -> bool {
        self == TargetMode::Package
    }
}

/// Plain Go sources versus sources that import the cgo marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Go,
    Cgo,
}

/// Platform key → sorted file names.
pub type FilesMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformFiles {
    pub arch: FilesMap,
    pub os: FilesMap,
    pub os_arch: FilesMap,
}

impl PlatformFiles {
    pub fn is_empty(&self) -> bool {
        self.arch.is_empty() && self.os.is_empty() && self.os_arch.is_empty()
    }

    /// Append to the bucket selected by `platform`. Generic files have no
    /// bucket here and are returned back to the caller.
    fn append(&mut self, platform: &Platform, name: String) -> Option<String> {
        let (map, key) = match platform {
            Platform::Generic => return Some(name),
            Platform::Arch(arch) => (&mut self.arch, arch.clone()),
            Platform::Os(os) => (&mut self.os, os.clone()),
            Platform::OsArch { os, arch } => (&mut self.os_arch, format!("{}_{}", os, arch)),
        };
        insert_sorted(map.entry(key).or_default(), name);
        None
    }
}

/// One compilation unit and every file routed into it.
///
/// All file lists stay sorted after each insertion.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    name: String,
    mode: TargetMode,
    path: PathBuf,
    imports: BTreeSet<String>,
    makeinc: bool,
    go_files: Vec<String>,
    cgo_files: Vec<String>,
    proto_files: Vec<String>,
    test_files: Vec<String>,
    go_platform: PlatformFiles,
    cgo_platform: PlatformFiles,
}

impl Target {
    pub fn new(name: impl Into<String>, mode: TargetMode, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            mode,
            path: path.into(),
            imports: BTreeSet::new(),
            makeinc: false,
            go_files: Vec::new(),
            cgo_files: Vec::new(),
            proto_files: Vec::new(),
            test_files: Vec::new(),
            go_platform: PlatformFiles::default(),
            cgo_platform: PlatformFiles::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    /// Directory the descriptor is written into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    pub fn has_makeinc(&self) -> bool {
        self.makeinc
    }

    pub fn go_files(&self) -> &[String] {
        &self.go_files
    }

    pub fn cgo_files(&self) -> &[String] {
        &self.cgo_files
    }

    pub fn proto_files(&self) -> &[String] {
        &self.proto_files
    }

    pub fn test_files(&self) -> &[String] {
        &self.test_files
    }

    pub fn go_platform(&self) -> &PlatformFiles {
        &self.go_platform
    }

    pub fn cgo_platform(&self) -> &PlatformFiles {
        &self.cgo_platform
    }

    pub fn record_imports<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.imports.extend(ids);
    }

    pub fn mark_makeinc(&mut self) {
        self.makeinc = true;
    }

    pub fn append_proto(&mut self, name: impl Into<String>) {
        insert_sorted(&mut self.proto_files, name.into());
    }

    pub fn append_test(&mut self, name: impl Into<String>) {
        insert_sorted(&mut self.test_files, name.into());
    }

    pub fn append_source(&mut self, kind: SourceKind, platform: &Platform, name: impl Into<String>) {
        let (flat, by_platform) = match kind {
            SourceKind::Go => (&mut self.go_files, &mut self.go_platform),
            SourceKind::Cgo => (&mut self.cgo_files, &mut self.cgo_platform),
        };
        if let Some(name) = by_platform.append(platform, name.into()) {
            insert_sorted(flat, name);
        }
    }

    /// A unit with nothing to compile. Tests and schema files alone do not
    /// make a unit buildable.
    pub fn is_empty(&self) -> bool {
        self.go_files.is_empty()
            && self.cgo_files.is_empty()
            && self.go_platform.is_empty()
            && self.cgo_platform.is_empty()
    }

    /// Names of the sources generated from this unit's schema files.
    pub fn generated_names(&self) -> Vec<String> {
        self.proto_files
            .iter()
            .map(|proto| {
                let stem = proto.strip_suffix(SCHEMA_EXT).unwrap_or(proto);
                format!("{}{}", stem, GENERATED_SUFFIX)
            })
            .collect()
    }

    /// Plain sources merged with the generated sources, sorted.
    pub fn go_files_with_generated(&self) -> Vec<String> {
        let mut files = self.go_files.clone();
        for generated in self.generated_names() {
            insert_sorted(&mut files, generated);
        }
        files
    }
}

fn insert_sorted(list: &mut Vec<String>, name: String) {
    let pos = match list.binary_search(&name) {
        Ok(pos) | Err(pos) => pos,
    };
    list.insert(pos, name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch(a: &str) -> Platform {
        Platform::Arch(a.to_string())
    }

    #[test]
    fn test_lists_sorted_for_any_order() {
        let orders: Vec<Vec<&str>> = vec![
            vec!["c.go", "a.go", "b.go"],
            vec!["b.go", "c.go", "a.go"],
            vec!["a.go", "b.go", "c.go"],
        ];

        for order in orders {
            let mut target = Target::new("x", TargetMode::Package, "/src/pkg/x");
            for name in &order {
                target.append_source(SourceKind::Go, &Platform::Generic, *name);
                target.append_source(SourceKind::Go, &arch("amd64"), format!("z_{}", name));
                target.append_test(format!("t_{}", name));
            }
            assert_eq!(target.go_files(), &["a.go", "b.go", "c.go"]);
            assert_eq!(target.go_platform().arch["amd64"], vec!["z_a.go", "z_b.go", "z_c.go"]);
            assert_eq!(target.test_files(), &["t_a.go", "t_b.go", "t_c.go"]);
        }
    }

    #[test]
    fn test_empty_ignores_tests_and_schema() {
        let mut target = Target::new("x", TargetMode::Package, "/src/pkg/x");
        assert!(target.is_empty());

        target.append_test("x_test.go");
        target.append_proto("y.proto");
        target.mark_makeinc();
        assert!(target.is_empty());

        target.append_source(SourceKind::Cgo, &Platform::Os("linux".to_string()), "x_linux.go");
        assert!(!target.is_empty());
    }

    #[test]
    fn test_generated_names_merge_sorted() {
        let mut target = Target::new("x", TargetMode::Package, "/src/pkg/x");
        target.append_source(SourceKind::Go, &Platform::Generic, "a.go");
        target.append_source(SourceKind::Go, &Platform::Generic, "z.go");
        target.append_proto("msg.proto");

        assert_eq!(target.generated_names(), vec!["msg.pb.go"]);
        assert_eq!(target.go_files_with_generated(), vec!["a.go", "msg.pb.go", "z.go"]);
        assert_eq!(target.go_files(), &["a.go", "z.go"]);
    }

    #[test]
    fn test_record_imports_deduplicates() {
        let mut target = Target::new("x", TargetMode::Command, "/src/cmd/x");
        target.record_imports(vec!["io".to_string(), "os".to_string()]);
        target.record_imports(vec!["io".to_string()]);
        assert_eq!(target.imports().len(), 2);
    }
}
