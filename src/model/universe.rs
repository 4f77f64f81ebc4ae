use super::target::{Target, TargetMode};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Every surviving unit found under one root, keyed by identity.
///
/// Built once by the walker and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct TargetUniverse {
    mode: TargetMode,
    root: PathBuf,
    targets: BTreeMap<String, Target>,
}

impl TargetUniverse {
    /// Freeze a walked root, discarding units with nothing to build.
    pub fn freeze(mode: TargetMode, root: impl Into<PathBuf>, mut targets: BTreeMap<String, Target>) -> Self {
        targets.retain(|name, target| {
            let keep = !target.is_empty();
            if !keep {
                debug!("Pruning empty target {}", name);
            }
            keep
        });

        Self {
            mode,
            root: root.into(),
            targets,
        }
    }

    pub fn empty(mode: TargetMode, root: impl Into<PathBuf>) -> Self {
        Self::freeze(mode, root, BTreeMap::new())
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.targets.iter().map(|(name, target)| (name.as_str(), target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Directory of `target` relative to the root, `/`-separated.
    pub fn relative_dir(&self, target: &Target) -> String {
        let rel = target.path().strip_prefix(&self.root).unwrap_or(target.path());
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::target::SourceKind;
    use crate::resolver::platform::Platform;

    #[test]
    fn test_freeze_prunes_empty_targets() {
        let mut targets = BTreeMap::new();

        let mut tests_only = Target::new("onlytests", TargetMode::Package, "/r/onlytests");
        tests_only.append_test("x_test.go");
        tests_only.append_proto("y.proto");
        targets.insert("onlytests".to_string(), tests_only);

        let mut real = Target::new("a/b", TargetMode::Package, "/r/a/b");
        real.append_source(SourceKind::Go, &Platform::Generic, "b.go");
        targets.insert("a/b".to_string(), real);

        let universe = TargetUniverse::freeze(TargetMode::Package, "/r", targets);
        assert_eq!(universe.len(), 1);
        assert!(universe.contains("a/b"));
        assert!(!universe.contains("onlytests"));

        let target = universe.get("a/b").unwrap();
        assert_eq!(universe.relative_dir(target), "a/b");
    }
}
