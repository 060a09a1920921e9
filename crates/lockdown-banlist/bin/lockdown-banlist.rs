//! Lockdown ban list manager binary entry point.
//!
//! This is a thin wrapper around the lockdown-banlist library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Runs the requested ban list action
//!
//! For library usage, see the lockdown-banlist crate documentation.

use anyhow::{Context, Result};
use lockdown_banlist::{
    BakFileBackup, Backup, BanListError, Command, Config, ErrorKind, NoBackup, SaveFile,
    decode_community_list, export_to_file, parse_import, prepare_additions, restore_from_backup,
    validate_identifier,
};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::from_args();

    // Logs go to stderr so `list --plain` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;
    let path = config.save_path();
    tracing::debug!(path = %path.display(), command = ?config.command, "starting");

    let backup: &dyn Backup = if config.no_backup {
        &NoBackup
    } else {
        &BakFileBackup
    };

    match &config.command {
        Command::List { plain } => {
            let ids = SaveFile::open(&path)?.list()?;
            print_list(&ids, *plain);
        }
        Command::Add { ids } => {
            for id in ids {
                validate_identifier(id)?;
            }
            backup_before_write(backup, &path)?;
            let added = SaveFile::open(&path)?.add(ids)?;
            println!("Successfully added {added} player(s) to your ban list!");
        }
        Command::Remove { id } => {
            validate_identifier(id)?;
            backup_before_write(backup, &path)?;
            let removed = SaveFile::open(&path)?.remove(id)?;
            println!("Successfully removed {removed} player(s) from your ban list!");
        }
        Command::Export { path: target } => {
            let ids = SaveFile::open(&path)?.list()?;
            let written = export_to_file(&ids, target)?;
            let plural = if written == 1 { "" } else { "s" };
            println!("Exported {written} ID{plural} to {}", target.display());
        }
        Command::Import { source } => {
            let text = read_source(source)?;
            let valid = prepare_additions(&parse_import(&text));
            if valid.is_empty() {
                println!("No valid Steam IDs to add.");
                return Ok(());
            }

            backup_before_write(backup, &path)?;
            let added = SaveFile::open(&path)?.add(&valid)?;
            println!("Successfully added {added} player(s) to your ban list!");
        }
        Command::Community { source } => {
            let text = read_source(source)?;
            let decoded = decode_community_list(&text);
            println!("Found {} Steam IDs in the community list.", decoded.len());

            let valid = prepare_additions(&decoded);
            if valid.is_empty() {
                println!("No valid Steam IDs to add.");
                return Ok(());
            }

            backup_before_write(backup, &path)?;
            let added = SaveFile::open(&path)?.add(&valid)?;
            println!("Successfully added {added} new players from the community ban list!");
        }
        Command::Revert => {
            restore_from_backup(&path)?;
            println!("Successfully reverted ban list from backup.");
        }
    }

    Ok(())
}

fn backup_before_write(backup: &dyn Backup, path: &Path) -> Result<()> {
    if let Some(copy) = backup.backup(path)? {
        eprintln!("Backup created: {}", copy.display());
    }
    Ok(())
}

fn read_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading IDs from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(source)
        .with_context(|| format!("reading IDs from {}", source.display()))
}

fn print_list(ids: &[String], plain: bool) {
    if plain {
        for id in ids {
            println!("{id}");
        }
        return;
    }

    if ids.is_empty() {
        println!("No players are currently banned.");
        return;
    }

    println!("Current banned Steam64 IDs:");
    for (index, id) in ids.iter().enumerate() {
        println!("{}) {id}", index + 1);
    }
}

fn report(err: &anyhow::Error) {
    let Some(ban_err) = err.downcast_ref::<BanListError>() else {
        eprintln!("Error: {err:#}");
        return;
    };

    tracing::debug!(error = %ban_err, kind = %ban_err.kind(), "command failed");
    match ban_err.kind() {
        ErrorKind::FileNotFound => {
            eprintln!("The Lockdown Protocol ban list was not found. Please check the file path.");
        }
        ErrorKind::FileNotAccessible => eprintln!(
            "Your Lockdown Protocol ban list was found, but can't be opened for reading/writing. Please close the game if running."
        ),
        ErrorKind::InvalidFileFormat => {
            eprintln!("Could not successfully parse your ban list file.");
            eprintln!("  {ban_err}");
        }
        ErrorKind::Unknown => eprintln!("Error: {ban_err}"),
    }
}
