//! Solve command implementation for the dispatch CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use dispatch_core::{DispatchPlan, DispatchRequest, Solver, VehicleProfile};
use dispatch_data::routing::{OsrmMatrixProvider, OsrmMatrixProviderConfig};
use dispatch_solver::GreedyDispatcher;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_SOLVE_OSRM_BASE_URL, ARG_SOLVE_REQUEST, ARG_SOLVE_SERVICE_DATE, ARG_SOLVE_TIMEOUT_SECS,
    ARG_SOLVE_VEHICLE_PROFILE, CliError, ENV_SOLVE_REQUEST,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Assign the orders in a JSON dispatch request to its workers. \
                 Travel times come from an OSRM table service; the plan is \
                 printed to stdout as JSON.",
    about = "Solve a dispatch request"
)]
#[ortho_config(prefix = "DISPATCH")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a dispatch request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_SOLVE_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Override the request's vehicle profile (driving, cycling, walking).
    #[arg(long = ARG_SOLVE_VEHICLE_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) vehicle_profile: Option<String>,
    /// OSRM request timeout in seconds.
    #[arg(long = ARG_SOLVE_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Calendar date (YYYY-MM-DD) for clock-time shift starts; defaults to
    /// today in UTC.
    #[arg(long = ARG_SOLVE_SERVICE_DATE, value_name = "date")]
    #[serde(default)]
    pub(crate) service_date: Option<String>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Base URL for the OSRM table service.
    pub(crate) osrm_base_url: String,
    /// Profile replacing the request's own, if any.
    pub(crate) vehicle_profile: Option<VehicleProfile>,
    /// OSRM request timeout.
    pub(crate) timeout: Duration,
    /// Date clock-time shift starts are placed on.
    pub(crate) service_date: NaiveDate,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.request_path;
        let field = ARG_SOLVE_REQUEST;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;

        let defaults = OsrmMatrixProviderConfig::default();
        let osrm_base_url = args.osrm_base_url.unwrap_or(defaults.base_url);
        let timeout = args
            .timeout_secs
            .map_or(defaults.timeout, Duration::from_secs);

        let vehicle_profile = args
            .vehicle_profile
            .map(|value| value.parse::<VehicleProfile>())
            .transpose()
            .map_err(|source| CliError::InvalidVehicleProfile {
                field: ARG_SOLVE_VEHICLE_PROFILE,
                source,
            })?;

        let service_date = match args.service_date {
            Some(value) => {
                value
                    .parse::<NaiveDate>()
                    .map_err(|source| CliError::InvalidServiceDate {
                        field: ARG_SOLVE_SERVICE_DATE,
                        value: value.clone(),
                        source,
                    })?
            }
            None => Utc::now().date_naive(),
        };

        Ok(Self {
            request_path,
            osrm_base_url,
            vehicle_profile,
            timeout,
            service_date,
        })
    }
}

/// Builds a solver instance for the current solve invocation.
pub(super) trait SolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError>;
}

pub(super) struct DefaultSolveSolverBuilder;

impl SolveSolverBuilder for DefaultSolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
        let provider_config = OsrmMatrixProviderConfig::new(config.osrm_base_url.clone())
            .with_timeout(config.timeout);
        let provider = OsrmMatrixProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildMatrixProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(GreedyDispatcher::new(provider)))
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSolveSolverBuilder;
    run_solve_with(args, &builder, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let plan = execute_solve(args, builder)?;
    write_dispatch_plan(writer, &plan)
}

fn execute_solve(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
) -> Result<DispatchPlan, CliError> {
    let config = resolve_solve_config(args)?;
    let mut request = load_solve_request(&config.request_path)?;
    if let Some(profile) = config.vehicle_profile {
        request.vehicle_profile = profile;
    }
    let snapshot =
        request
            .resolve(config.service_date)
            .map_err(|source| CliError::InvalidSolveRequest {
                path: config.request_path.clone(),
                source,
            })?;
    info!(
        "solving {} orders for {} workers from {}",
        snapshot.orders().len(),
        snapshot.workers().len(),
        config.request_path
    );
    let solver = builder.build(&config)?;
    solver
        .solve(&snapshot)
        .map_err(|source| CliError::Solve { source })
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`DispatchRequest`] from disk.
pub(super) fn load_solve_request(path: &Utf8Path) -> Result<DispatchRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenSolveRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseSolveRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_dispatch_plan(writer: &mut dyn Write, plan: &DispatchPlan) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(plan).map_err(CliError::SerialiseSolveResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSolveOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WriteSolveOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
