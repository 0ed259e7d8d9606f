//! `path` command: print where a package is (or would be) installed.

use std::path::PathBuf;

use clap::Args;
use srcget::manager::ArchiveInstaller;
use srcget::package::parse_package;

use super::resolve_config;
use crate::error::CliError;

/// Arguments for `srcget path`.
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Install root (defaults to paths.root_dir, then GOPATH)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Package import path, e.g. github.com/org/repo
    pub package: String,

    /// Version as kind:id (branch, tag, commit) or trunk
    pub version: Option<String>,
}

/// Run the path command.
pub fn run(args: PathArgs) -> Result<(), CliError> {
    let config = resolve_config(args.root, None)?;
    let pkg = parse_package(&args.package, args.version.as_deref())?;
    let installer = ArchiveInstaller::new(config.root_dir);

    println!("{}", installer.install_path(&pkg).display());
    Ok(())
}
