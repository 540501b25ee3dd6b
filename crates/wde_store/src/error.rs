//! Error types that can be emitted from this library

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::settings::ClientVersion;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// A table file exists but could not be decoded
    #[error("failed to read {file} for version {version}")]
    #[diagnostic(
        code(wde_store::format),
        help("the table does not match the layout expected for {version}, check the configured path: {}", path.display())
    )]
    Format {
        file: String,
        version: ClientVersion,
        path: PathBuf,
        #[source]
        source: wde_dbc::error::Error,
    },

    /// The published data does not belong to the configured client
    #[error("Invalid DBC path")]
    #[diagnostic(
        code(wde_store::integrity),
        help("In specified path, there is no DBC for version {version}. Ensure the path contains Spell.dbc or Spell.db2 file.\n\nPath: {}", path.display())
    )]
    Integrity {
        version: ClientVersion,
        path: PathBuf,
        expected: &'static str,
        found: Option<String>,
    },

    /// A load was requested while another one is still running
    #[error("a load is already in progress")]
    LoadInProgress,

    /// The spell service failed to load its own tables
    #[error("spell service failed: {0}")]
    SpellService(String),

    /// The loading thread went away without reporting a result
    #[error("load worker stopped unexpectedly")]
    Worker,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
