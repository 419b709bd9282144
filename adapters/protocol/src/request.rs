use saferoute_core::{CellKind, MalformedInputError, RankedResult, SearchParams};
use saferoute_grid::RawCellValue;
use saferoute_system_planner::{plan, Endpoint};
use serde::Deserialize;

/// Grid cell exactly as it arrived on the wire.
///
/// Integers are taken as-is, finite floats are truncated toward zero and
/// strings are accepted when they hold a base-ten integer. Anything else is
/// reported as a non-numeric cell once the grid is normalized.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    /// Plain JSON integer.
    Integer(i64),
    /// JSON number with a fractional part or outside the `i64` range.
    Float(f64),
    /// JSON string, possibly holding digits.
    Text(String),
    /// Booleans, nulls, arrays and objects.
    Other(serde_json::Value),
}

impl RawCellValue for RawCell {
    fn code(&self) -> Option<i64> {
        match self {
            RawCell::Integer(value) => Some(*value),
            RawCell::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            RawCell::Float(_) => None,
            RawCell::Text(text) => text.trim().parse().ok(),
            RawCell::Other(_) => None,
        }
    }
}

impl From<CellKind> for RawCell {
    fn from(kind: CellKind) -> Self {
        RawCell::Integer(kind.code())
    }
}

/// Optional tuning overrides layered on top of a set of defaults.
///
/// The same table is read from request bodies and from configuration files.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of ranked routes to return.
    pub k: Option<usize>,
    /// Candidate collection cap.
    pub cap: Option<usize>,
    /// Depth bound; derived from the grid size when absent.
    pub max_depth: Option<usize>,
    /// Hazard decay radius.
    pub radius: Option<i64>,
    /// Weight applied to the risk sum.
    pub risk_weight: Option<f64>,
    /// Treat hazards as walls.
    pub strict_hazard: Option<bool>,
}

impl Tuning {
    /// Parameters obtained by overriding `base` with every value present here.
    #[must_use]
    pub fn layered_over(&self, base: &SearchParams) -> SearchParams {
        SearchParams {
            k: self.k.unwrap_or(base.k),
            cap: self.cap.unwrap_or(base.cap),
            max_depth: self.max_depth.or(base.max_depth),
            radius: self.radius.unwrap_or(base.radius),
            risk_weight: self.risk_weight.unwrap_or(base.risk_weight),
            strict_hazard: self.strict_hazard.unwrap_or(base.strict_hazard),
        }
    }
}

/// Request body accepted by the planner.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SolveRequest {
    /// Rectangular grid of cell codes.
    #[serde(default)]
    pub grid: Option<Vec<Vec<RawCell>>>,
    /// `[row, col]` of the first cell.
    #[serde(default)]
    pub start: Option<[i64; 2]>,
    /// `[row, col]` of the last cell.
    #[serde(default)]
    pub goal: Option<[i64; 2]>,
    /// Per-request tuning overrides.
    #[serde(flatten)]
    pub tuning: Tuning,
}

impl SolveRequest {
    /// Decodes a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, MalformedInputError> {
        serde_json::from_str(body).map_err(|error| MalformedInputError::InvalidJson(error.to_string()))
    }

    /// Checks the required fields and resolves tuning against `defaults`.
    pub fn resolve(self, defaults: &SearchParams) -> Result<PlanRequest, MalformedInputError> {
        let grid = self
            .grid
            .ok_or(MalformedInputError::MissingField { field: "grid" })?;
        let [start_row, start_column] = self
            .start
            .ok_or(MalformedInputError::MissingField { field: "start" })?;
        let [goal_row, goal_column] = self
            .goal
            .ok_or(MalformedInputError::MissingField { field: "goal" })?;

        Ok(PlanRequest {
            grid,
            start: Endpoint::new(start_row, start_column),
            goal: Endpoint::new(goal_row, goal_column),
            params: self.tuning.layered_over(defaults),
        })
    }
}

/// Fully resolved request, ready to be planned.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanRequest {
    /// Raw grid cells.
    pub grid: Vec<Vec<RawCell>>,
    /// First endpoint.
    pub start: Endpoint,
    /// Last endpoint.
    pub goal: Endpoint,
    /// Tuning after defaults were layered in.
    pub params: SearchParams,
}

impl PlanRequest {
    /// Plans the request.
    pub fn run(&self) -> Result<RankedResult, MalformedInputError> {
        plan(&self.grid, self.start, self.goal, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(json: &str) -> Vec<RawCell> {
        serde_json::from_str(json).expect("valid cell list")
    }

    #[test]
    fn cells_accept_integers_floats_and_digit_strings() {
        let codes: Vec<Option<i64>> = cells(r#"[0, 1, 2.9, -0.5, " 2 ", "x", true, null, [1]]"#)
            .iter()
            .map(RawCellValue::code)
            .collect();

        assert_eq!(
            codes,
            vec![Some(0), Some(1), Some(2), Some(0), Some(2), None, None, None, None]
        );
    }

    #[test]
    fn tuning_overrides_only_present_values() {
        let base = SearchParams {
            k: 3,
            radius: 5,
            ..SearchParams::default()
        };
        let tuning = Tuning {
            radius: Some(1),
            strict_hazard: Some(true),
            ..Tuning::default()
        };

        let params = tuning.layered_over(&base);
        assert_eq!(params.k, 3);
        assert_eq!(params.radius, 1);
        assert!(params.strict_hazard);
        assert_eq!(params.cap, base.cap);
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let request = SolveRequest::from_json(r#"{"start": [0, 0]}"#).expect("valid json");
        assert_eq!(
            request.resolve(&SearchParams::default()),
            Err(MalformedInputError::MissingField { field: "grid" })
        );

        let request =
            SolveRequest::from_json(r#"{"grid": [[0]], "start": [0, 0]}"#).expect("valid json");
        assert_eq!(
            request.resolve(&SearchParams::default()),
            Err(MalformedInputError::MissingField { field: "goal" })
        );
    }

    #[test]
    fn flattened_tuning_is_read_from_the_body() {
        let request = SolveRequest::from_json(
            r#"{"grid": [[0]], "start": [0, 0], "goal": [0, 0], "k": 2, "risk_weight": 3, "max_depth": null}"#,
        )
        .expect("valid json");

        assert_eq!(request.tuning.k, Some(2));
        assert_eq!(request.tuning.risk_weight, Some(3.0));
        assert_eq!(request.tuning.max_depth, None);
    }

    #[test]
    fn garbage_is_invalid_json() {
        assert!(matches!(
            SolveRequest::from_json("{grid:"),
            Err(MalformedInputError::InvalidJson(_))
        ));
    }
}
