#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans SafeRoute requests.
//!
//! Requests are read from a file or stdin. Responses go to stdout and logs go
//! to stderr. The process exits with status 2 when a request is rejected and
//! with status 1 when the command itself fails.

mod config;
mod grid_transfer;
mod render;

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use rayon::prelude::*;
use saferoute_core::{MalformedInputError, SearchParams};
use saferoute_grid::normalize;
use saferoute_protocol::{solve, solve_json, Failure, SolveRequest, SolveResponse};

use grid_transfer::GridSnapshot;
use render::render_grid;

/// SafeRoute - risk-ranked route enumeration on occupancy grids
#[derive(Debug, Parser)]
#[command(name = "saferoute", version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); defaults to RUST_LOG or warn
    #[arg(long, global = true, value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: Option<String>,

    /// TOML file whose [tuning] table replaces the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan one JSON request and print the response
    Solve {
        /// Request file (default: stdin)
        input: Option<PathBuf>,

        /// Share code used in place of the request's grid
        #[arg(long)]
        grid_code: Option<String>,

        /// Indent the response
        #[arg(long)]
        pretty: bool,
    },

    /// Plan JSON Lines requests in parallel and print one response per line
    Batch {
        /// Requests file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Print the share code of a request's grid
    Encode {
        /// Request file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Draw the best route of a request over its grid
    Render {
        /// Request file (default: stdin)
        input: Option<PathBuf>,

        /// Share code used in place of the request's grid
        #[arg(long)]
        grid_code: Option<String>,
    },
}

/// How a successfully executed command ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Completed,
    Rejected,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(2),
        }
    }
}

/// Entry point for the SafeRoute command-line interface.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        let _ = builder.parse_filters(level);
    }
    let _ = builder.target(env_logger::Target::Stderr);
    builder.init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let defaults = config::load(cli.config.as_deref())?;
    debug!("search defaults: {defaults:?}");

    match cli.command {
        Command::Solve {
            input,
            grid_code,
            pretty,
        } => run_solve(input.as_deref(), grid_code.as_deref(), pretty, &defaults),
        Command::Batch { input } => run_batch(input.as_deref(), &defaults),
        Command::Encode { input } => run_encode(input.as_deref()),
        Command::Render { input, grid_code } => {
            run_render(input.as_deref(), grid_code.as_deref(), &defaults)
        }
    }
}

fn run_solve(
    input: Option<&Path>,
    grid_code: Option<&str>,
    pretty: bool,
    defaults: &SearchParams,
) -> Result<Outcome> {
    let body = read_input(input)?;
    let response = match decode_request(&body, grid_code) {
        Ok(request) => solve(request, defaults),
        Err(failure) => SolveResponse::Failed(failure),
    };

    let text = if pretty {
        response.to_json_pretty()
    } else {
        response.to_json()
    }
    .context("failed to serialize response")?;
    write_stdout(&text)?;

    Ok(if response.is_ok() {
        Outcome::Completed
    } else {
        Outcome::Rejected
    })
}

fn run_batch(input: Option<&Path>, defaults: &SearchParams) -> Result<Outcome> {
    let body = read_input(input)?;
    let requests: Vec<&str> = body.lines().filter(|line| !line.trim().is_empty()).collect();

    let responses = requests
        .par_iter()
        .map(|line| solve_json(line, defaults).to_json())
        .collect::<Result<Vec<_>, _>>()
        .context("failed to serialize batch response")?;
    info!("solved {} batch requests", responses.len());

    let mut output = String::new();
    for response in &responses {
        output.push_str(response);
        output.push('\n');
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(output.as_bytes())
        .context("failed to write batch responses")?;

    Ok(Outcome::Completed)
}

fn run_encode(input: Option<&Path>) -> Result<Outcome> {
    let body = read_input(input)?;
    let request = match SolveRequest::from_json(&body) {
        Ok(request) => request,
        Err(error) => return Ok(reject(&error)),
    };
    let Some(rows) = request.grid else {
        return Ok(reject(&MalformedInputError::MissingField { field: "grid" }));
    };
    let grid = match normalize(&rows) {
        Ok(grid) => grid,
        Err(error) => return Ok(reject(&error)),
    };

    let snapshot = GridSnapshot::from_grid(&grid).context("grid cannot be encoded")?;
    write_stdout(&snapshot.encode())?;
    Ok(Outcome::Completed)
}

fn run_render(
    input: Option<&Path>,
    grid_code: Option<&str>,
    defaults: &SearchParams,
) -> Result<Outcome> {
    let body = read_input(input)?;
    let request = match decode_request(&body, grid_code) {
        Ok(request) => request,
        Err(failure) => {
            eprintln!("error: {}", failure.error);
            return Ok(Outcome::Rejected);
        }
    };
    let planned = request
        .resolve(defaults)
        .and_then(|resolved| {
            let grid = normalize(&resolved.grid)?;
            let result = resolved.run()?;
            Ok((resolved, grid, result))
        });
    let (resolved, grid, result) = match planned {
        Ok(planned) => planned,
        Err(error) => return Ok(reject(&error)),
    };

    let route = result
        .solutions()
        .first()
        .map(|best| best.path().cells())
        .unwrap_or_default();
    let mut text = render_grid(
        &grid,
        route,
        resolved.start.to_cell(),
        resolved.goal.to_cell(),
    );
    match result.solutions().first() {
        Some(best) => text.push_str(&format!(
            "\nbest of {} routes: steps {}, risk {:.3}, score {:.3}",
            result.found_candidates(),
            best.steps(),
            best.risk_sum(),
            best.score()
        )),
        None => text.push_str("\nno route found"),
    }
    write_stdout(&text)?;
    Ok(Outcome::Completed)
}

fn decode_request(body: &str, grid_code: Option<&str>) -> Result<SolveRequest, Failure> {
    let mut request = SolveRequest::from_json(body).map_err(|error| Failure::from(&error))?;
    if let Some(code) = grid_code {
        let snapshot =
            GridSnapshot::decode(code).map_err(|error| Failure::new(error.to_string()))?;
        request.grid = Some(snapshot.into_rows());
    }
    Ok(request)
}

fn reject(error: &MalformedInputError) -> Outcome {
    eprintln!("error: {error}");
    Outcome::Rejected
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut body = String::new();
            let _ = io::stdin()
                .read_to_string(&mut body)
                .context("failed to read stdin")?;
            Ok(body)
        }
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{text}").context("failed to write to stdout")
}
