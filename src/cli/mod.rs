//! CLI definitions using clap.

use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;

use crate::config::MigrationConfig;
use crate::error::{Error, Result};

/// One-line usage shown on argument errors.
pub const USAGE: &str = "stocatima [<store-path> <archive-output-path>]";

/// Migrate Stocard loyalty cards into a Catima import archive
#[derive(Parser, Debug)]
#[command(name = "stocatima", author, version, about, long_about = None, override_usage = USAGE)]
pub struct Cli {
    /// Synced Stocard SQLite database (default: sync_db.sqlite)
    #[arg(requires = "output")]
    pub store: Option<PathBuf>,

    /// Catima archive to write (default: output.zip)
    pub output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse arguments, mapping argument errors to [`Error::Usage`].
    ///
    /// `--help` and `--version` print and exit the process as usual.
    ///
    /// # Errors
    ///
    /// Returns `Usage` when the arguments do not match [`USAGE`].
    pub fn try_parse_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                let rendered = e.render().to_string();
                let reason = rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string();
                Err(Error::Usage(reason))
            }
        }
    }

    /// Resolve the run configuration.
    #[must_use]
    pub fn config(&self) -> MigrationConfig {
        MigrationConfig::new(self.store.as_deref(), self.output.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::try_parse_args(["stocatima"]).unwrap();
        let config = cli.config();
        assert_eq!(config.store_path, Path::new("sync_db.sqlite"));
        assert_eq!(config.output_path, Path::new("output.zip"));
    }

    #[test]
    fn test_two_arguments() {
        let cli = Cli::try_parse_args(["stocatima", "cards.sqlite", "catima.zip"]).unwrap();
        let config = cli.config();
        assert_eq!(config.store_path, Path::new("cards.sqlite"));
        assert_eq!(config.output_path, Path::new("catima.zip"));
    }

    #[test]
    fn test_one_argument_is_usage_error() {
        let err = Cli::try_parse_args(["stocatima", "cards.sqlite"]).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn test_three_arguments_is_usage_error() {
        let err = Cli::try_parse_args(["stocatima", "a", "b", "c"]).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_verbosity_flag() {
        let cli = Cli::try_parse_args(["stocatima", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
