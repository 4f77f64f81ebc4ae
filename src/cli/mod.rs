use crate::config::GenConfig;
use crate::generator::{ManifestGenerator, SourceTree};
use crate::model::{FilesMap, Target, TargetUniverse};
use crate::resolver::{DependencyResolver, FileClassifier, ResolvedDeps};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "genmake")]
#[command(version, about = "Generate Makefiles for a multi-platform Go source tree", long_about = None)]
pub struct Args {
    /// Working root containing the package and command trees
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Configuration file (default: <ROOT>/genmake.toml if present)
    #[arg(short, long, value_name = "FILE", env = "GENMAKE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (warnings only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Dry run (list the files that would be written)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// List external dependencies in Make.deps and each Makefile
    #[arg(long)]
    pub emit_external_deps: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan and classify the tree without writing anything
    Check {
        /// Only report these units
        units: Vec<String>,

        /// Print every classified file
        #[arg(long)]
        files: bool,

        /// Print the scanned units as JSON
        #[arg(long, conflicts_with = "files")]
        json: bool,
    },

    /// Show the recognised operating systems and architectures
    Platforms,
}

/// Default log filter for the given verbosity flags. `RUST_LOG` still wins.
pub fn log_filter(args: &Args) -> &'static str {
    if args.quiet {
        "warn"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    }
}

pub fn run(args: Args) -> Result<()> {
    let mut config = GenConfig::discover(&args.root, args.config.as_deref())
        .context("Failed to load configuration")?;
    if args.emit_external_deps {
        config.emit_external_deps = true;
    }

    match &args.command {
        Some(Commands::Check { units, files, json }) => check_tree(&args, &config, units, *files, *json),
        Some(Commands::Platforms) => show_platforms(&config),
        None => generate(&args, &config),
    }
}

fn generate(args: &Args, config: &GenConfig) -> Result<()> {
    let tree = SourceTree::scan(&args.root, config).context("Failed to scan source tree")?;

    let manifest = ManifestGenerator::new(&tree)
        .emit_external_deps(config.emit_external_deps)
        .generate();

    if args.dry_run {
        for path in manifest.paths() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let written = manifest.write_to_disk().context("Failed to write build descriptors")?;
    info!(
        "Generated {} files for {} packages and {} commands",
        written,
        tree.packages.len(),
        tree.commands.len()
    );

    if !args.quiet {
        println!("{} Wrote {} files", "✓".green(), written);
    }

    Ok(())
}

#[derive(Serialize)]
struct UnitReport<'a> {
    target: &'a Target,
    deps: ResolvedDeps,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    packages: Vec<UnitReport<'a>>,
    commands: Vec<UnitReport<'a>>,
}

fn check_tree(args: &Args, config: &GenConfig, units: &[String], files: bool, json: bool) -> Result<()> {
    let classifier = FileClassifier::with_vocabulary(config.vocabulary()?);

    let tree = SourceTree::scan_with(&args.root, config, &classifier, |path, name, classification| {
        if files && (units.is_empty() || units.iter().any(|u| u == name)) {
            println!("{} {} {}", name.cyan(), path.display(), format!("→ {}", classification).dimmed());
        }
    })
    .context("Failed to scan source tree")?;

    let pkg_resolver = DependencyResolver::new(&tree.packages);
    let report = CheckReport {
        packages: unit_reports(&tree.packages, &pkg_resolver, units),
        commands: unit_reports(&tree.commands, &pkg_resolver, units),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if files {
        println!();
    }
    for unit in report.packages.iter().chain(report.commands.iter()) {
        print_unit(unit);
    }

    println!(
        "{} {} packages, {} commands",
        "✓".green(),
        tree.packages.len(),
        tree.commands.len()
    );
    Ok(())
}

fn unit_reports<'t>(
    universe: &'t TargetUniverse,
    resolver: &DependencyResolver<'_>,
    units: &[String],
) -> Vec<UnitReport<'t>> {
    universe
        .iter()
        .filter(|(name, _)| units.is_empty() || units.iter().any(|u| u == name))
        .map(|(_, target)| UnitReport {
            target,
            deps: resolver.resolve(target),
        })
        .collect()
}

fn print_unit(unit: &UnitReport<'_>) {
    let target = unit.target;
    println!(
        "{} ({:?}, {})",
        target.name().bold(),
        target.mode(),
        target.path().display()
    );

    print_list("GOFILES", &target.go_files_with_generated());
    print_platform("GOFILES", &target.go_platform().arch);
    print_platform("GOFILES", &target.go_platform().os);
    print_platform("GOFILES", &target.go_platform().os_arch);
    print_list("GOTESTFILES", target.test_files());
    print_list("CGOFILES", target.cgo_files());
    print_platform("CGOFILES", &target.cgo_platform().arch);
    print_platform("CGOFILES", &target.cgo_platform().os);
    print_platform("CGOFILES", &target.cgo_platform().os_arch);
    print_list("proto", target.proto_files());
    if target.has_makeinc() {
        println!("  {}", "includes Make.inc".yellow());
    }

    print_list("internal", &unit.deps.internal);
    if !unit.deps.external.is_empty() {
        println!("  {}: {}", "external".dimmed(), unit.deps.external.join(", ").dimmed());
    }
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("  {}: {}", label.blue(), items.join(", "));
    }
}

fn print_platform(label: &str, files: &FilesMap) {
    for (key, names) in files {
        print_list(&format!("{}_{}", label, key), names);
    }
}

fn show_platforms(config: &GenConfig) -> Result<()> {
    let vocabulary = config.vocabulary()?;

    println!("{}", "Recognised filename suffixes:".bold());
    println!("  {:<8} {}", "os".blue(), vocabulary.os().collect::<Vec<_>>().join(", "));
    println!("  {:<8} {}", "arch".blue(), vocabulary.arch().collect::<Vec<_>>().join(", "));
    println!();
    println!("Shapes, in priority order: _<os>_<arch>, _<arch>, _<os>");

    Ok(())
}
