use crate::config::GenConfig;
use crate::error::{GenError, GenResult};
use crate::model::{Target, TargetMode, TargetUniverse};
use crate::parser::{scan_file, ImportScan};
use crate::resolver::{FileClassification, FileClassifier};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walks one root and builds its target universe.
///
/// Entries are visited sorted by file name so that repeated runs classify
/// files in the same order.
pub struct SourceWalker<'a> {
    root: PathBuf,
    mode: TargetMode,
    config: &'a GenConfig,
    classifier: &'a FileClassifier,
    targets: BTreeMap<String, Target>,
}

impl<'a> SourceWalker<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        mode: TargetMode,
        config: &'a GenConfig,
        classifier: &'a FileClassifier,
    ) -> Self {
        Self {
            root: root.into(),
            mode,
            config,
            classifier,
            targets: BTreeMap::new(),
        }
    }

    pub fn walk(self) -> GenResult<TargetUniverse> {
        self.walk_with(|_, _, _| {})
    }

    /// Walk the root, reporting every classified file to `on_file`.
    pub fn walk_with<F>(mut self, mut on_file: F) -> GenResult<TargetUniverse>
    where
        F: FnMut(&Path, &str, &FileClassification),
    {
        if !self.root.is_dir() {
            warn!("Source root {} does not exist, nothing to generate", self.root.display());
            return Ok(TargetUniverse::empty(self.mode, self.root));
        }

        let config = self.config;
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(config, entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                GenError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some((name, classification)) = self.visit_file(entry.path())? {
                on_file(entry.path(), &name, &classification);
            }
        }

        Ok(TargetUniverse::freeze(self.mode, self.root, self.targets))
    }

    /// Route one file into its unit. Returns `None` for files that belong to
    /// no unit or are outputs of an earlier build.
    pub fn visit_file(&mut self, path: &Path) -> GenResult<Option<(String, FileClassification)>> {
        let dir = match path.parent() {
            Some(dir) if dir != self.root => dir,
            _ => return Ok(None),
        };

        let base = match path.file_name().and_then(|n| n.to_str()) {
            Some(base) => base,
            None => {
                warn!("Skipping non UTF-8 file name {}", path.display());
                return Ok(None);
            }
        };

        if is_build_output(base) {
            return Ok(None);
        }

        let name = match self.target_name(dir) {
            Some(name) => name,
            None => return Ok(None),
        };

        let scan = if FileClassifier::is_source(base) {
            scan_file(path)?
        } else {
            ImportScan::default()
        };

        let mode = self.mode;
        let target = self
            .targets
            .entry(name.clone())
            .or_insert_with(|| Target::new(name.clone(), mode, dir));

        if target.path() != dir {
            if mode == TargetMode::Command {
                warn!(
                    "Command {} has sources in both {} and {}",
                    name,
                    target.path().display(),
                    dir.display()
                );
            }
            target.set_path(dir);
        }

        let classification = self.classifier.classify(target, base, &scan);
        debug!("{}: {} -> {}", name, base, classification);

        Ok(Some((name, classification)))
    }

    fn target_name(&self, dir: &Path) -> Option<String> {
        match self.mode {
            TargetMode::Package => {
                let rel = dir.strip_prefix(&self.root).ok()?;
                let parts: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("/"))
                }
            }
            TargetMode::Command => dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
        }
    }
}

fn is_skipped_dir(config: &GenConfig, entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| config.is_skipped_dir(name))
            .unwrap_or(false)
}

/// Files produced by the build itself: cgo intermediates, generated protobuf
/// sources and the test driver.
fn is_build_output(base: &str) -> bool {
    base.starts_with("_cgo") || base.ends_with(".pb.go") || base == "_testmain.go"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_package_identities_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "toplevel.go", "package x\n");
        write(root, "net/http/client.go", "package http\nimport (\"io\"; \"net\")\n");
        write(root, "net/http/client.pb.go", "not go at all");
        write(root, "net/http/_cgo_defun.go", "not go at all");
        write(root, "net/http/testdata/broken.go", "not go at all");
        write(root, "net/net.go", "package net\n");

        let config = GenConfig::default();
        let classifier = FileClassifier::new();
        let universe = SourceWalker::new(root, TargetMode::Package, &config, &classifier)
            .walk()
            .unwrap();

        let names: Vec<&str> = universe.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["net", "net/http"]);
        assert_eq!(universe.get("net/http").unwrap().go_files(), &["client.go"]);
    }

    #[test]
    fn test_command_identity_is_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "tools/vet/main.go", "package main\n");

        let config = GenConfig::default();
        let classifier = FileClassifier::new();
        let universe = SourceWalker::new(root, TargetMode::Command, &config, &classifier)
            .walk()
            .unwrap();

        let target = universe.get("vet").unwrap();
        assert_eq!(universe.relative_dir(target), "tools/vet");
    }

    #[test]
    fn test_scan_error_aborts_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "bad/bad.go", "func main() {}\n");

        let config = GenConfig::default();
        let classifier = FileClassifier::new();
        let err = SourceWalker::new(root, TargetMode::Package, &config, &classifier)
            .walk()
            .unwrap_err();

        match err {
            GenError::Scan { path, .. } => assert!(path.ends_with("bad/bad.go")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenConfig::default();
        let classifier = FileClassifier::new();
        let universe = SourceWalker::new(dir.path().join("nope"), TargetMode::Command, &config, &classifier)
            .walk()
            .unwrap();
        assert!(universe.is_empty());
    }
}
