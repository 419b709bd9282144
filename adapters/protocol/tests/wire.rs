use saferoute_core::SearchParams;
use saferoute_protocol::{solve_json, SolveResponse};
use serde_json::{json, Value};

fn respond(body: &Value) -> Value {
    let response = solve_json(&body.to_string(), &SearchParams::default());
    let text = response.to_json().expect("responses serialize");
    serde_json::from_str(&text).expect("responses are valid JSON")
}

#[test]
fn single_step_route_has_the_documented_shape() {
    let response = solve_json(
        r#"{"grid": [[0, 0]], "start": [0, 0], "goal": [0, 1]}"#,
        &SearchParams::default(),
    );

    assert_eq!(
        response.to_json().expect("serializes"),
        concat!(
            r#"{"ok":true,"requested":10,"found_candidates":1,"returned":1,"#,
            r#""params":{"radius":2,"risk_weight":8.0,"strict_hazard":false,"cap":1500,"max_depth":4},"#,
            r#""stats":{"rows":1,"cols":2,"walls":0,"hazards":0},"#,
            r#""solutions":[{"path":[[0,0],[0,1]],"steps":2,"risk_sum":0.0,"score":2.0}]}"#
        )
    );
}

#[test]
fn failures_carry_only_ok_and_error() {
    let response = respond(&json!({"grid": [[0]], "start": [0, 0]}));

    assert_eq!(
        response,
        json!({"ok": false, "error": "missing required field `goal`"})
    );
}

#[test]
fn jagged_grids_fail_without_solutions() {
    let response = respond(&json!({
        "grid": [[0, 0, 0], [0, 0], [0, 0, 0]],
        "start": [0, 0],
        "goal": [2, 2],
    }));

    assert_eq!(response["ok"], json!(false));
    assert!(response.get("solutions").is_none());
    assert!(response["error"]
        .as_str()
        .is_some_and(|error| error.contains("row 1")));
}

#[test]
fn non_numeric_cells_are_rejected() {
    let response = respond(&json!({
        "grid": [[0, "wall"]],
        "start": [0, 0],
        "goal": [0, 1],
    }));

    assert_eq!(response["ok"], json!(false));
}

#[test]
fn float_and_string_cells_are_coerced() {
    let response = respond(&json!({
        "grid": [[0.0, "0", 1.7], [0, 2.2, 0]],
        "start": [0, 0],
        "goal": [1, 2],
        "radius": 0,
    }));

    assert_eq!(response["ok"], json!(true));
    assert_eq!(response["stats"]["walls"], json!(1));
    assert_eq!(response["stats"]["hazards"], json!(1));
    assert_eq!(response["found_candidates"], json!(2));
}

#[test]
fn strict_hazard_blocks_routes_through_hazards() {
    let relaxed = respond(&json!({
        "grid": [[0, 2, 0], [0, 0, 0]],
        "start": [0, 0],
        "goal": [0, 2],
    }));
    let strict = respond(&json!({
        "grid": [[0, 2, 0], [0, 0, 0]],
        "start": [0, 0],
        "goal": [0, 2],
        "strict_hazard": true,
    }));

    assert_eq!(relaxed["found_candidates"], json!(4));
    assert_eq!(strict["found_candidates"], json!(1));
    assert_eq!(
        strict["solutions"][0]["path"],
        json!([[0, 0], [1, 0], [1, 1], [1, 2], [0, 2]])
    );
}

#[test]
fn unreachable_goal_is_an_empty_success() {
    let response = respond(&json!({
        "grid": [[0, 1, 0]],
        "start": [0, 0],
        "goal": [0, 2],
    }));

    assert_eq!(response["ok"], json!(true));
    assert_eq!(response["found_candidates"], json!(0));
    assert_eq!(response["returned"], json!(0));
    assert_eq!(response["solutions"], json!([]));
}

#[test]
fn out_of_bounds_endpoints_are_an_empty_success() {
    let response = respond(&json!({
        "grid": [[0, 0]],
        "start": [-1, 0],
        "goal": [0, 5],
    }));

    assert_eq!(response["ok"], json!(true));
    assert_eq!(response["found_candidates"], json!(0));
}

#[test]
fn request_tuning_overrides_defaults() {
    let defaults = SearchParams {
        k: 1,
        radius: 4,
        ..SearchParams::default()
    };
    let response = solve_json(
        r#"{"grid": [[0, 0], [0, 0]], "start": [0, 0], "goal": [1, 1], "radius": 1, "cap": 5}"#,
        &defaults,
    );

    let SolveResponse::Solved(solution) = response else {
        panic!("expected a solved response");
    };
    assert_eq!(solution.requested, 1);
    assert_eq!(solution.returned, 1);
    assert_eq!(solution.params.radius, 1);
    assert_eq!(solution.params.cap, 5);
    assert_eq!(solution.params.max_depth, 8);
}

#[test]
fn negative_risk_weight_is_rejected() {
    let response = respond(&json!({
        "grid": [[0]],
        "start": [0, 0],
        "goal": [0, 0],
        "risk_weight": -1.0,
    }));

    assert_eq!(response["ok"], json!(false));
}

#[test]
fn repeated_requests_are_byte_identical() {
    let body = json!({
        "grid": [[0, 0, 0, 0], [0, 2, 1, 0], [0, 0, 0, 0]],
        "start": [0, 0],
        "goal": [2, 3],
        "k": 5,
    })
    .to_string();

    let first = solve_json(&body, &SearchParams::default()).to_json();
    let second = solve_json(&body, &SearchParams::default()).to_json();
    assert_eq!(first.expect("serializes"), second.expect("serializes"));
}
