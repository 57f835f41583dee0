//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use permfix_core::Scope;

/// Repair filesystem permissions that drifted from what the package
/// database declares, without reinstalling anything.
#[derive(Parser, Debug)]
#[command(name = "permfix")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("selection").args(["all", "packages", "filesystem_paths"])))]
pub struct Cli {
    /// Process all installed packages (the default)
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Package names to process
    #[arg(short = 'p', long, num_args = 1.., value_name = "NAME")]
    pub packages: Vec<String>,

    /// Filesystem paths to reconcile against the default attribute policy,
    /// bypassing package metadata entirely
    #[arg(short = 'f', long, num_args = 1.., value_name = "PATH")]
    pub filesystem_paths: Vec<PathBuf>,

    /// Filesystem root declared paths are resolved under
    #[arg(long, default_value = "/", value_name = "PATH")]
    pub root: PathBuf,

    /// Package database path (defaults to <root>/var/lib/pacman)
    #[arg(long, value_name = "PATH")]
    pub dbpath: Option<PathBuf>,

    /// Report what would change without applying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output the full report as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Map the selector flags onto a run scope.
    pub fn scope(&self) -> Scope {
        if !self.packages.is_empty() {
            Scope::Packages(self.packages.clone())
        } else if !self.filesystem_paths.is_empty() {
            Scope::Paths(self.filesystem_paths.clone())
        } else {
            Scope::All
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args_defaults_to_all_scope() {
        let cli = Cli::parse_from(["permfix"]);
        assert!(!cli.verbose);
        assert!(!cli.dry_run);
        assert_eq!(cli.root, PathBuf::from("/"));
        assert_eq!(cli.scope(), Scope::All);
    }

    #[test]
    fn parse_explicit_all_flag() {
        let cli = Cli::parse_from(["permfix", "--all"]);
        assert!(cli.all);
        assert_eq!(cli.scope(), Scope::All);
    }

    #[test]
    fn parse_packages_scope() {
        let cli = Cli::parse_from(["permfix", "-p", "openssl", "zlib"]);
        assert_eq!(
            cli.scope(),
            Scope::Packages(vec!["openssl".into(), "zlib".into()])
        );
    }

    #[test]
    fn parse_filesystem_paths_scope() {
        let cli = Cli::parse_from(["permfix", "--filesystem-paths", "/usr/bin/foo", "/etc/hosts"]);
        assert_eq!(
            cli.scope(),
            Scope::Paths(vec![
                PathBuf::from("/usr/bin/foo"),
                PathBuf::from("/etc/hosts"),
            ])
        );
    }

    #[test]
    fn selector_flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["permfix", "-a", "-p", "zlib"]).is_err());
        assert!(Cli::try_parse_from(["permfix", "-p", "zlib", "-f", "/etc/hosts"]).is_err());
        assert!(Cli::try_parse_from(["permfix", "-a", "-f", "/etc/hosts"]).is_err());
    }

    #[test]
    fn empty_package_list_is_a_usage_error() {
        assert!(Cli::try_parse_from(["permfix", "--packages"]).is_err());
        assert!(Cli::try_parse_from(["permfix", "--filesystem-paths"]).is_err());
    }

    #[test]
    fn parse_root_and_dbpath_overrides() {
        let cli = Cli::parse_from(["permfix", "--root", "/mnt", "--dbpath", "/mnt/db"]);
        assert_eq!(cli.root, PathBuf::from("/mnt"));
        assert_eq!(cli.dbpath, Some(PathBuf::from("/mnt/db")));
    }

    #[test]
    fn parse_dry_run_and_json() {
        let cli = Cli::parse_from(["permfix", "--dry-run", "--json"]);
        assert!(cli.dry_run);
        assert!(cli.json);
    }
}
