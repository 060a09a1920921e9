//! Command-line configuration.
//!
//! Configuration can be provided via:
//! - CLI arguments (`--save-path`, `--no-backup`, `-v`)
//! - Environment variables (`LOCKDOWN_SAVE_PATH`)
//! - Default values (the game's save location under `%LOCALAPPDATA%`)
//!
//! # Example
//!
//! ```no_run
//! use lockdown_banlist::Config;
//!
//! let config = Config::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Ban list: {}", config.save_path().display());
//! ```

use crate::error::ConfigError;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Save location relative to `%LOCALAPPDATA%`.
pub const DEFAULT_SAVE_SUBPATH: &str = "LockdownProtocol/Saved/SaveGames/Save_BanList.sav";

/// Ban list manager configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lockdown-banlist",
    about = "Manage the ban list stored in a Lockdown Protocol save file",
    version
)]
pub struct Config {
    /// Path to Save_BanList.sav
    #[arg(long, global = true, env = "LOCKDOWN_SAVE_PATH")]
    pub save_path: Option<PathBuf>,

    /// Skip the .bak backup before modifying the save
    #[arg(long, global = true)]
    pub no_backup: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Action to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Ban list actions.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the banned Steam64 IDs
    List {
        /// Print one ID per line with no decoration
        #[arg(long)]
        plain: bool,
    },
    /// Ban one or more players
    Add {
        /// Steam64 IDs to ban
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Unban a player
    Remove {
        /// Steam64 ID to unban
        id: String,
    },
    /// Write the ban list to a file (JSON when the path ends in .json)
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Ban every valid ID in a JSON or plain-text file
    Import {
        /// File holding the IDs, or `-` for stdin
        source: PathBuf,
    },
    /// Add every ID from a community list (one base64-encoded ID per line)
    Community {
        /// File holding the community list, or `-` for stdin
        source: PathBuf,
    },
    /// Restore the save from its .bak backup
    Revert,
}

impl Config {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Save path from the arguments, environment or the default location.
    #[must_use]
    pub fn save_path(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(default_save_path)
    }

    /// Log filter directive matching the verbosity flags.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the save path is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.save_path().as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired(
                "save path is empty; set --save-path or LOCKDOWN_SAVE_PATH".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default save location under `%LOCALAPPDATA%`.
#[must_use]
pub fn default_save_path() -> PathBuf {
    let base = std::env::var_os("LOCALAPPDATA").unwrap_or_default();
    Path::new(&base).join(DEFAULT_SAVE_SUBPATH)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_plain() {
        let config =
            Config::try_parse_from(["lockdown-banlist", "list", "--plain", "--save-path", "a.sav"])
                .unwrap();
        assert_eq!(config.command, Command::List { plain: true });
        assert_eq!(config.save_path(), PathBuf::from("a.sav"));
        assert!(!config.no_backup);
    }

    #[test]
    fn test_parse_add_many() {
        let config = Config::try_parse_from([
            "lockdown-banlist",
            "--no-backup",
            "-vv",
            "add",
            "76561198000000001",
            "76561198000000002",
        ])
        .unwrap();
        assert_eq!(
            config.command,
            Command::Add {
                ids: vec![
                    "76561198000000001".to_string(),
                    "76561198000000002".to_string()
                ]
            }
        );
        assert!(config.no_backup);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_add_requires_ids() {
        assert!(Config::try_parse_from(["lockdown-banlist", "add"]).is_err());
    }

    #[test]
    fn test_remove_takes_one_id() {
        assert!(Config::try_parse_from(["lockdown-banlist", "remove"]).is_err());
        assert!(
            Config::try_parse_from(["lockdown-banlist", "remove", "765", "766"]).is_err()
        );
    }

    #[test]
    fn test_parse_export_and_imports() {
        let config =
            Config::try_parse_from(["lockdown-banlist", "export", "out/bans.json"]).unwrap();
        assert_eq!(
            config.command,
            Command::Export {
                path: PathBuf::from("out/bans.json")
            }
        );

        let config = Config::try_parse_from(["lockdown-banlist", "import", "-"]).unwrap();
        assert_eq!(
            config.command,
            Command::Import {
                source: PathBuf::from("-")
            }
        );

        let config =
            Config::try_parse_from(["lockdown-banlist", "community", "bans.txt"]).unwrap();
        assert_eq!(
            config.command,
            Command::Community {
                source: PathBuf::from("bans.txt")
            }
        );

        assert!(Config::try_parse_from(["lockdown-banlist", "export"]).is_err());
    }

    #[test]
    fn test_default_save_path_suffix() {
        assert!(default_save_path().ends_with("Save_BanList.sav"));
    }

    #[test]
    fn test_validate_empty_path() {
        let mut config =
            Config::try_parse_from(["lockdown-banlist", "revert", "--save-path", "x.sav"]).unwrap();
        assert!(config.validate().is_ok());

        config.save_path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }
}
