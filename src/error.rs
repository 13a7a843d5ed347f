/*============================================================
  Synavera Project: Upkg
  Module: upkg_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Upkg error types to provide consistent
    diagnostics and exit semantics.

  Security / Safety Notes:
    Error contexts expose only configuration keys and paths
    chosen by the operator.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used by configuration loading and logging to propagate
    failures to the binary entry point. The status report
    itself never fails.

  Revision History:
    2025-12-01 COD  Established shared error definitions.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Upkg operations.
pub type Result<T> = std::result::Result<T, UpkgError>;

/// Enumerates high-level error domains surfaced by Upkg.
#[derive(Debug, Error)]
pub enum UpkgError {
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl UpkgError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            UpkgError::Config(_) => 20,
            UpkgError::Serialization(_) => 31,
            UpkgError::Filesystem(_) => 40,
            UpkgError::Io(_) => 41,
        }
    }
}
