//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod cleanup;
pub mod github;
pub mod sync;

use crate::config::{DEBUG_ORG_FILE, ORG_FILE};

/// iqsync - Sync Azure DevOps and GitHub repositories into Sonatype IQ Server
#[derive(Parser, Debug)]
#[command(name = "iqsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Use the debug organization subset and verbose logging
    #[arg(long, global = true, env = "IQSYNC_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Override the organization list file
    #[arg(long, global = true, value_name = "PATH")]
    pub org_file: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync Azure DevOps repositories into IQ Server and trigger scans
    Sync,

    /// Sync GitHub repositories matching a search term into IQ Server
    Github,

    /// Delete all IQ Server applications in each configured organization
    Cleanup,

    /// Display version information
    Version,
}

/// Resolve the organization file: an explicit override wins, otherwise
/// `--debug` selects the debug subset.
pub fn org_file_path(override_path: Option<&str>, debug: bool) -> PathBuf {
    match override_path {
        Some(path) => PathBuf::from(path),
        None if debug => PathBuf::from(DEBUG_ORG_FILE),
        None => PathBuf::from(ORG_FILE),
    }
}
