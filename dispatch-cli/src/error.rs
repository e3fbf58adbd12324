//! Error types emitted by the dispatch CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use dispatch_core::{InputError, SolveError, UnknownVehicleProfile};
use dispatch_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the dispatch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that may supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The vehicle profile override is not recognised.
    #[error("invalid --{field}: {source}")]
    InvalidVehicleProfile {
        /// Flag name.
        field: &'static str,
        /// Parse failure.
        #[source]
        source: UnknownVehicleProfile,
    },
    /// The service date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid --{field} '{value}': {source}")]
    InvalidServiceDate {
        /// Flag name.
        field: &'static str,
        /// Supplied value.
        value: String,
        /// Parse failure.
        #[source]
        source: chrono::ParseError,
    },
    /// Opening the solve request file failed.
    #[error("failed to open dispatch request at {path:?}: {source}")]
    OpenSolveRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Solve request JSON could not be decoded.
    #[error("failed to parse dispatch request JSON at {path:?}: {source}")]
    ParseSolveRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The request payload failed validation.
    #[error("dispatch request in {path:?} failed validation: {source}")]
    InvalidSolveRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: InputError,
    },
    /// Constructing the distance matrix provider failed.
    #[error("failed to build distance matrix provider for {base_url:?}: {source}")]
    BuildMatrixProvider {
        /// Configured OSRM base URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The solver could not produce a plan.
    #[error("solver failed: {source}")]
    Solve {
        /// Solver failure.
        #[source]
        source: SolveError,
    },
    /// Serialising the plan failed.
    #[error("failed to serialise dispatch plan: {0}")]
    SerialiseSolveResponse(#[source] serde_json::Error),
    /// Writing the plan failed.
    #[error("failed to write dispatch plan: {0}")]
    WriteSolveOutput(#[source] std::io::Error),
}
