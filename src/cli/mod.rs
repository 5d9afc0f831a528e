//! CLI argument parsing for shpfiles.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use shpfiles::ComponentRole;
use std::path::PathBuf;

/// shpfiles: inspect and manage datasets stored as a group of sidecar files.
///
/// Any one component (e.g. roads.shp, roads.dbf) names the whole dataset.
#[derive(Parser, Debug)]
#[command(name = "shpfiles")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML config file (defaults to $SHPFILES_CONFIG, then built-in defaults).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for shpfiles.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every component identifier of a dataset.
    ///
    /// For local datasets, also shows whether each component exists.
    Components(SeedArgs),

    /// Delete every component file of a local dataset.
    Delete(SeedArgs),

    /// Create a staging file for one component and print its path.
    Stage(RoleArgs),

    /// Open one component for reading under the group lock and print its size.
    Probe(RoleArgs),
}

/// Arguments naming a dataset.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Path or URI of any component of the dataset.
    pub seed: String,
}

/// Arguments naming one component of a dataset.
#[derive(Args, Debug)]
pub struct RoleArgs {
    /// Path or URI of any component of the dataset.
    pub seed: String,

    /// Component role (shp, dbf, shx, prj, qix, fix, shp.xml, grx).
    pub role: ComponentRole,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
