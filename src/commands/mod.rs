//! Command implementations for shpfiles.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command builds one locator set from its seed.

use crate::cli::{Command, RoleArgs, SeedArgs};
use shpfiles::{ComponentRole, Config, Requestor, Result, ShpFiles, ShpFilesError};
use std::io;
use std::path::PathBuf;

/// Dispatch a command to its implementation.
pub fn dispatch(config: Option<PathBuf>, command: Command) -> Result<()> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };

    match command {
        Command::Components(args) => cmd_components(args, config),
        Command::Delete(args) => cmd_delete(args, config),
        Command::Stage(args) => cmd_stage(args, config),
        Command::Probe(args) => cmd_probe(args, config),
    }
}

fn cmd_components(args: SeedArgs, config: Config) -> Result<()> {
    let files = ShpFiles::with_config(&args.seed, config)?;

    println!("dataset: {} ({})", files.type_name(), files.base());
    for (role, identifier) in files.identifiers() {
        if files.is_local() {
            let marker = if files.exists(role)? { "present" } else { "missing" };
            println!("  {:<8} {:<8} {}", role, marker, identifier);
        } else {
            println!("  {:<8} {}", role, identifier);
        }
    }
    Ok(())
}

fn cmd_delete(args: SeedArgs, config: Config) -> Result<()> {
    let files = ShpFiles::with_config(&args.seed, config)?;

    if files.delete()? {
        println!("Deleted all components of '{}'", files.base());
        Ok(())
    } else {
        Err(ShpFilesError::io(
            format!("some components of '{}' could not be deleted", files.base()),
            io::Error::other("see log for details"),
        ))
    }
}

fn cmd_stage(args: RoleArgs, config: Config) -> Result<()> {
    let files = ShpFiles::with_config(&args.seed, config)?;
    let staged = files.storage_file(args.role)?;
    println!("{}", staged.path().display());
    Ok(())
}

fn cmd_probe(args: RoleArgs, config: Config) -> Result<()> {
    let files = ShpFiles::with_config(&args.seed, config)?;
    let requestor = Requestor::new("shpfiles-probe");

    let mut stream = files.open_input_stream(args.role, &requestor)?;
    let size = io::copy(&mut stream, &mut io::sink()).map_err(|e| {
        ShpFilesError::io(format!("failed to read '{}'", stream.identifier()), e)
    })?;
    stream.close()?;

    println!("{} {} bytes", describe(args.role, files.get(args.role)), size);
    Ok(())
}

fn describe(role: ComponentRole, identifier: &str) -> String {
    format!("{} ({})", identifier, role)
}
