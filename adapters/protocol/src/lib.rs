#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! JSON wire protocol for SafeRoute.
//!
//! Requests name a grid, two endpoints and optional tuning. Responses are a
//! single envelope that either carries the ranked routes or an error message.

mod request;
mod response;

use log::debug;
use saferoute_core::SearchParams;

pub use request::{PlanRequest, RawCell, SolveRequest, Tuning};
pub use response::{Failure, Route, SolveResponse, Solution};

/// Plans a decoded request, layering its tuning over `defaults`.
#[must_use]
pub fn solve(request: SolveRequest, defaults: &SearchParams) -> SolveResponse {
    let outcome = request
        .resolve(defaults)
        .and_then(|resolved| resolved.run());
    if let Err(error) = &outcome {
        debug!("request rejected: {error}");
    }
    SolveResponse::from(outcome)
}

/// Decodes and plans a JSON request body.
#[must_use]
pub fn solve_json(body: &str, defaults: &SearchParams) -> SolveResponse {
    match SolveRequest::from_json(body) {
        Ok(request) => solve(request, defaults),
        Err(error) => {
            debug!("request rejected: {error}");
            SolveResponse::Failed(Failure::from(&error))
        }
    }
}
