//! `get` command: download and install packages.

use std::path::PathBuf;

use clap::Args;
use console::style;
use rayon::prelude::*;
use srcget::manager::{AcquireOptions, AcquireStage, Acquirer, InstallOutcome};
use srcget::package::parse_package;
use tracing::debug;

use super::resolve_config;
use crate::error::CliError;

/// Arguments for `srcget get`.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Download without installing
    #[arg(short = 'd', long = "download-only")]
    pub download_only: bool,

    /// Force update of installed packages
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Install root (defaults to paths.root_dir, then GOPATH)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Archive cache directory (defaults to paths.repos_dir)
    #[arg(long, value_name = "DIR")]
    pub repos: Option<PathBuf>,

    /// Number of packages acquired at once
    #[arg(short = 'j', long, default_value_t = 1)]
    pub jobs: usize,

    /// `<package> [version]`, or one or more `<package>[@version]`
    #[arg(required = true, value_name = "PACKAGE")]
    pub targets: Vec<String>,
}

/// A package name with its optional version token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub version: Option<String>,
}

/// Split positional arguments into targets.
///
/// Two arguments where the second looks like a version (contains `:` or no
/// `/`) mean `<package> <version>`. Otherwise every argument is a package,
/// optionally suffixed with `@version`.
pub fn split_targets(args: &[String]) -> Vec<Target> {
    if let [name, version] = args {
        if !name.contains('@') && looks_like_version(version) {
            return vec![Target {
                name: name.clone(),
                version: Some(version.clone()),
            }];
        }
    }

    args.iter()
        .map(|arg| match arg.split_once('@') {
            Some((name, version)) => Target {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Target {
                name: arg.clone(),
                version: None,
            },
        })
        .collect()
}

fn looks_like_version(arg: &str) -> bool {
    arg.contains(':') || !arg.contains('/')
}

/// Run the get command.
pub fn run(args: GetArgs) -> Result<(), CliError> {
    if args.download_only {
        println!("{} You enabled download without installing.", style("[INFO]").green());
    }
    if args.update {
        println!("{} You enabled force update.", style("[INFO]").green());
    }

    let config = resolve_config(args.root, args.repos)?;
    debug!(root = %config.root_dir.display(), repos = %config.repos_dir.display(), "resolved configuration");

    let acquirer = Acquirer::from_config(&config)?.with_progress(Box::new(
        |stage: AcquireStage, message: &str| {
            if stage != AcquireStage::Complete {
                println!("{}", message);
            }
        },
    ));

    let options = AcquireOptions {
        force_update: args.update,
        download_only: args.download_only,
    };

    let targets = split_targets(&args.targets);
    let acquire = |target: &Target| acquire_one(&acquirer, target, options);

    let results: Vec<Result<(), CliError>> = if args.jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build()
            .map_err(|e| CliError::Config(format!("failed to start worker pool: {}", e)))?;
        pool.install(|| targets.par_iter().map(acquire).collect())
    } else {
        targets.iter().map(acquire).collect()
    };

    let mut failed = 0;
    for (target, result) in targets.iter().zip(&results) {
        if let Err(e) = result {
            failed += 1;
            eprintln!("{} {}: {}", style("[ERROR]").red().bold(), target.name, e);
        }
    }

    if failed > 0 {
        return Err(CliError::Failed {
            failed,
            total: targets.len(),
        });
    }

    println!("done.");
    Ok(())
}

fn acquire_one(acquirer: &Acquirer, target: &Target, options: AcquireOptions) -> Result<(), CliError> {
    let pkg = parse_package(&target.name, target.version.as_deref())?;
    let report = acquirer.acquire_with(&pkg, options)?;

    if let Some(InstallOutcome::AlreadyInstalled { path }) = &report.install {
        println!("{} is already installed at {} (use -u to update)", pkg, path.display());
    }

    Ok(())
}
