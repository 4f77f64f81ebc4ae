use super::makefile::INSTALLED_PKG_DIR;
use crate::model::TargetUniverse;
use crate::resolver::DependencyResolver;

pub const DIRS_FILE: &str = "Make.dirs";
pub const DEPS_FILE: &str = "Make.deps";
pub const IGNORE_FILE: &str = ".gitignore";

/// `DIRS` and `NOTEST` listings of every unit under the root.
pub fn render_dirs(universe: &TargetUniverse) -> String {
    let mut dirs = Vec::new();
    let mut notest = Vec::new();
    for (_, target) in universe.iter() {
        let rel = universe.relative_dir(target);
        if target.test_files().is_empty() {
            notest.push(rel.clone());
        }
        dirs.push(rel);
    }
    dirs.sort();
    notest.sort();

    let mut out = String::new();
    write_continued(&mut out, "DIRS", &dirs);
    write_continued(&mut out, "NOTEST", &notest);
    out.push_str("TEST=$(filter-out $(NOTEST),$(DIRS))\n\n");
    out.push_str("BENCH=$(filter-out $(NOBENCH),$(TEST))\n");
    out
}

/// One `<unit>.install:` rule per unit, listing its internal dependencies.
/// External dependencies are appended as installed archives only when
/// `include_external` is set.
pub fn render_deps(universe: &TargetUniverse, include_external: bool) -> String {
    let resolver = DependencyResolver::new(universe);

    let mut out = String::new();
    for (name, target) in universe.iter() {
        let deps = resolver.resolve(target);
        out.push_str(&format!("{}.install:", name));
        for dep in &deps.internal {
            out.push_str(&format!(" {}.install", dep));
        }
        if include_external {
            for dep in &deps.external {
                out.push_str(&format!(" {}/{}.a", INSTALLED_PKG_DIR, dep));
            }
        }
        out.push('\n');
    }
    out
}

/// One line per command ignoring the binary built inside its directory.
pub fn render_gitignore(universe: &TargetUniverse) -> String {
    let mut lines: Vec<String> = universe
        .iter()
        .map(|(name, target)| format!("{}/{}", universe.relative_dir(target), name))
        .collect();
    lines.sort();

    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn write_continued(out: &mut String, var: &str, items: &[String]) {
    out.push_str(&format!("{}=\\\n", var));
    for item in items {
        out.push_str(&format!("\t{}\\\n", item));
    }
    out.push('\n');
}
