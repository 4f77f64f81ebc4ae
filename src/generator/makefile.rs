use crate::model::{FilesMap, PlatformFiles, Target, TargetMode};
use crate::resolver::ResolvedDeps;

/// File name of a unit's generated descriptor.
pub const MAKEFILE: &str = "Makefile";

/// Directory holding installed package archives.
pub const INSTALLED_PKG_DIR: &str = "$(QUOTED_GOROOT)/pkg/$(GOOS)_$(GOARCH)";

/// Render the descriptor of one unit. External dependencies are listed as
/// installed archives only when `include_external` is set.
pub fn render_descriptor(target: &Target, deps: &ResolvedDeps, include_external: bool) -> String {
    let mut out = String::new();

    out.push_str("include $(GOROOT)/src/Make.inc\n\n");
    out.push_str(&format!("TARG={}\n\n", target.name()));

    write_files(&mut out, "GOFILES", &target.go_files_with_generated(), target.go_platform());
    write_files(&mut out, "GOTESTFILES", target.test_files(), &PlatformFiles::default());
    write_files(&mut out, "CGOFILES", target.cgo_files(), target.cgo_platform());

    if !target.proto_files().is_empty() {
        out.push_str("CLEANFILES+=*.pb.go\n\n");
        out.push_str("%.pb.go: *.proto\n\tprotoc --go_out=. *.proto\n\n");
    }

    if target.has_makeinc() {
        out.push_str("include Make.inc\n\n");
    }

    write_prereqs(&mut out, target, &deps.internal);
    if include_external {
        write_external_prereqs(&mut out, &deps.external);
    }

    match target.mode() {
        TargetMode::Package => out.push_str("include $(GOROOT)/src/Make.pkg\n"),
        TargetMode::Command => out.push_str("include $(GOROOT)/src/Make.cmd\n"),
    }

    out
}

/// Relative path from a unit's directory to the package root.
pub fn path_to_pkg_root(target: &Target) -> String {
    match target.mode() {
        TargetMode::Command => "../../pkg/".to_string(),
        TargetMode::Package => "../".repeat(target.name().split('/').count()),
    }
}

fn write_files(out: &mut String, basevar: &str, files: &[String], platform: &PlatformFiles) {
    if !files.is_empty() {
        write_list(out, basevar, files);
    }

    write_platform(out, basevar, "$(GOARCH)", &platform.arch);
    write_platform(out, basevar, "$(GOOS)", &platform.os);
    write_platform(out, basevar, "$(GOOS)_$(GOARCH)", &platform.os_arch);
}

fn write_platform(out: &mut String, basevar: &str, selector: &str, files: &FilesMap) {
    if files.is_empty() {
        return;
    }

    out.push_str(&format!("{}+=$({}_{})\n\n", basevar, basevar, selector));
    for (key, names) in files {
        write_list(out, &format!("{}_{}", basevar, key), names);
    }
}

fn write_list(out: &mut String, var: &str, items: &[String]) {
    out.push_str(&format!("{}=\\\n", var));
    for item in items {
        out.push_str(&format!("\t{}\\\n", item));
    }
    out.push('\n');
}

fn write_prereqs(out: &mut String, target: &Target, internal: &[String]) {
    if internal.is_empty() {
        return;
    }

    let up = path_to_pkg_root(target);

    out.push_str("PREREQ+=\\\n");
    for dep in internal {
        out.push_str(&format!("\t{}/{}.a\\\n", INSTALLED_PKG_DIR, dep));
    }
    out.push('\n');

    for dep in internal {
        out.push_str(&format!("{}/{}.a:\n", INSTALLED_PKG_DIR, dep));
        out.push_str(&format!("\t$(MAKE) -C {}{} install\n\n", up, dep));
    }
    out.push_str(".DEFAULT_GOAL:=\n\n");
}

// Built outside this tree, so no rule to make them.
fn write_external_prereqs(out: &mut String, external: &[String]) {
    if external.is_empty() {
        return;
    }

    out.push_str("PREREQ+=\\\n");
    for dep in external {
        out.push_str(&format!("\t{}/{}.a\\\n", INSTALLED_PKG_DIR, dep));
    }
    out.push('\n');
}
