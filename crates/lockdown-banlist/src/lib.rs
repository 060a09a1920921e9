//! Ban list manager for Lockdown Protocol save files.
//!
//! This crate wraps the [`lockdown_gvas`] codec with the file handling the
//! codec leaves out:
//! - `save_file`: precondition checks and `list`/`add`/`remove` on a path
//! - `backup`: the `.bak` copy made before a save is modified
//! - `community`: decoding of base64 community ban lists
//! - `transfer`: plain-text and JSON export/import files
//! - `config`: CLI arguments and environment configuration
//! - `error`: error types and the [`ErrorKind`] categories
//!
//! # Example
//!
//! ```no_run
//! use lockdown_banlist::{SaveFile, validate_identifier};
//!
//! let save = SaveFile::open("Save_BanList.sav")?;
//!
//! validate_identifier("76561198000000001")?;
//! let added = save.add(&["76561198000000001"])?;
//! println!("added {added}, now {} banned", save.list()?.len());
//! # Ok::<(), lockdown_banlist::BanListError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Module declarations
pub mod backup;
pub mod community;
pub mod config;
pub mod error;
pub mod save_file;
pub mod transfer;

// Re-exports for public API
pub use backup::{BakFileBackup, Backup, NoBackup, restore_from_backup};
pub use community::decode_community_list;
pub use config::{Command, Config};
pub use error::{BanListError, ConfigError, ErrorKind, Result};
pub use save_file::{SaveFile, add, list, remove, validate_identifier};
pub use transfer::{
    BanListExport, ExportFormat, export_to_file, parse_import, prepare_additions, render_export,
};
