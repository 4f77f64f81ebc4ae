pub mod listings;
pub mod makefile;
pub mod manifest_tree;

use crate::config::GenConfig;
use crate::error::GenResult;
use crate::model::{TargetMode, TargetUniverse};
use crate::resolver::{DependencyResolver, FileClassifier};
use crate::walker::SourceWalker;
use log::info;
use std::path::{Path, PathBuf};

pub use manifest_tree::ManifestTree;

/// The two universes of one working root.
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub packages: TargetUniverse,
    pub commands: TargetUniverse,
}

impl SourceTree {
    /// Walk the package root, then the command root.
    pub fn scan(root: &Path, config: &GenConfig) -> GenResult<Self> {
        let classifier = FileClassifier::with_vocabulary(config.vocabulary()?);
        Self::scan_with(root, config, &classifier, |_, _, _| {})
    }

    pub fn scan_with<F>(root: &Path, config: &GenConfig, classifier: &FileClassifier, mut on_file: F) -> GenResult<Self>
    where
        F: FnMut(&Path, &str, &crate::resolver::FileClassification),
    {
        let pkg_root = clean_join(root, &config.pkg_dir);
        let packages = SourceWalker::new(pkg_root, TargetMode::Package, config, classifier)
            .walk_with(&mut on_file)?;
        info!("Found {} packages under {}", packages.len(), packages.root().display());

        let cmd_root = clean_join(root, &config.cmd_dir);
        let commands = SourceWalker::new(cmd_root, TargetMode::Command, config, classifier)
            .walk_with(&mut on_file)?;
        info!("Found {} commands under {}", commands.len(), commands.root().display());

        Ok(Self { packages, commands })
    }
}

/// Renders descriptors and listings for a scanned tree.
pub struct ManifestGenerator<'a> {
    tree: &'a SourceTree,
    emit_external_deps: bool,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(tree: &'a SourceTree) -> Self {
        Self {
            tree,
            emit_external_deps: false,
        }
    }

    pub fn emit_external_deps(mut self, emit: bool) -> Self {
        self.emit_external_deps = emit;
        self
    }

    pub fn generate(&self) -> ManifestTree {
        let mut out = ManifestTree::new();
        let packages = &self.tree.packages;
        let commands = &self.tree.commands;

        // commands link against packages, never against each other
        let pkg_resolver = DependencyResolver::new(packages);

        for (_, target) in packages.iter() {
            let deps = pkg_resolver.resolve(target);
            out.add_file(
                target.path().join(makefile::MAKEFILE),
                makefile::render_descriptor(target, &deps, self.emit_external_deps),
            );
        }
        if packages.root().is_dir() {
            out.add_file(packages.root().join(listings::DIRS_FILE), listings::render_dirs(packages));
            out.add_file(
                packages.root().join(listings::DEPS_FILE),
                listings::render_deps(packages, self.emit_external_deps),
            );
        }

        for (_, target) in commands.iter() {
            let deps = pkg_resolver.resolve(target);
            out.add_file(
                target.path().join(makefile::MAKEFILE),
                makefile::render_descriptor(target, &deps, self.emit_external_deps),
            );
        }
        if commands.root().is_dir() {
            out.add_file(commands.root().join(listings::DIRS_FILE), listings::render_dirs(commands));
            out.add_file(commands.root().join(listings::IGNORE_FILE), listings::render_gitignore(commands));
        }

        out
    }
}

fn clean_join(root: &Path, sub: &Path) -> PathBuf {
    let mut path = PathBuf::new();
    for component in root.join(sub).components() {
        match component {
            std::path::Component::CurDir => {}
            other => path.push(other.as_os_str()),
        }
    }
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}
