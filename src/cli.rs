//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// cladder-stats - rung and query_type statistics for the cladder dataset
///
/// Reads src/dataset/cladder/data_full_v1.5_default.jsonl under the project
/// root and prints the rung, query_type and joint distributions.
///
/// Examples:
///   cladder-stats
///   cladder-stats --root ~/work/causal-bench
///   cladder-stats --verbose
///   cladder-stats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Project root containing src/dataset/cladder/
    ///
    /// If not specified, the nearest ancestor of the current directory
    /// holding the dataset is used, falling back to the current directory.
    #[arg(long, value_name = "DIR", env = "CLADDER_STATS_ROOT")]
    pub root: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cladder-stats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, per-line warnings suppressed)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cladder-stats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref root) = self.root {
            if !root.exists() {
                return Err(format!("Project root does not exist: {}", root.display()));
            }
            if !root.is_dir() {
                return Err(format!(
                    "Project root is not a directory: {}",
                    root.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_args() -> Args {
        Args {
            root: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from(["cladder-stats", "--root", "/tmp", "-v"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/tmp")));
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_root() {
        let mut args = make_args();
        args.root = Some(PathBuf::from("/definitely/not/a/real/project/root"));
        let err = args.validate().unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_validation_root_is_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not_a_dir.txt");
        std::fs::write(&file, "x").unwrap();

        let mut args = make_args();
        args.root = Some(file);
        assert!(args.validate().unwrap_err().contains("not a directory"));
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
