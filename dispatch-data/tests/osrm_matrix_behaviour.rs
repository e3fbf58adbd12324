//! Behavioural tests for distance-matrix providers.
//!
//! These tests use [`StubMatrixProvider`] to exercise the gateway contract
//! without requiring a running OSRM service.

use dispatch_core::{DistanceMatrix, DistanceMatrixProvider, MatrixError, VehicleProfile};
use dispatch_data::routing::test_support::StubMatrixProvider;
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::time::Duration;

/// Result cell holding the outcome of a matrix request.
type ResultCell = RefCell<Option<Result<DistanceMatrix, MatrixError>>>;

#[fixture]
fn provider() -> RefCell<Option<StubMatrixProvider>> {
    RefCell::new(None)
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

#[expect(
    clippy::float_arithmetic,
    reason = "test coordinates are offset from a fixed origin"
)]
fn sample_locations(count: u32) -> Vec<Coord<f64>> {
    (0..count)
        .map(|i| {
            let offset = f64::from(i) * 0.01;
            Coord {
                x: 13.40 + offset,
                y: 52.52 + offset,
            }
        })
        .collect()
}

fn sample_matrix() -> DistanceMatrix {
    DistanceMatrix::new(
        vec![
            vec![Duration::ZERO, Duration::from_secs(120)],
            vec![Duration::from_secs(125), Duration::ZERO],
        ],
        vec![vec![0.0, 900.0], vec![930.0, 0.0]],
    )
    .expect("valid matrix")
}

fn matrix_with_unreachable_pairs() -> DistanceMatrix {
    DistanceMatrix::new(
        vec![
            vec![Duration::ZERO, Duration::MAX],
            vec![Duration::MAX, Duration::ZERO],
        ],
        vec![vec![0.0, f64::INFINITY], vec![f64::INFINITY, 0.0]],
    )
    .expect("valid matrix")
}

fn set_provider(cell: &RefCell<Option<StubMatrixProvider>>, stub: StubMatrixProvider) {
    *cell.borrow_mut() = Some(stub);
}

// --- Given steps ---

#[given("a routing service returning valid durations")]
fn routing_service_ok(#[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>) {
    set_provider(provider, StubMatrixProvider::with_matrix(sample_matrix()));
}

#[given("a routing service that fails with a network error")]
fn routing_service_network_error(#[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>) {
    set_provider(
        provider,
        StubMatrixProvider::with_error(MatrixError::NetworkError {
            url: "http://example.com/table/v1/driving".to_owned(),
            message: "connection refused".to_owned(),
        }),
    );
}

#[given("a routing service that times out")]
fn routing_service_timeout(#[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>) {
    set_provider(
        provider,
        StubMatrixProvider::with_error(MatrixError::Timeout {
            url: "http://example.com/table/v1/driving".to_owned(),
            timeout_secs: 30,
        }),
    );
}

#[given("a routing service returning an error response")]
fn routing_service_error(#[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>) {
    set_provider(
        provider,
        StubMatrixProvider::with_error(MatrixError::ServiceError {
            code: "NoTable".to_owned(),
            message: "Could not compute table".to_owned(),
        }),
    );
}

#[given("a routing service returning null for unreachable pairs")]
fn routing_service_with_nulls(#[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>) {
    set_provider(
        provider,
        StubMatrixProvider::with_matrix(matrix_with_unreachable_pairs()),
    );
}

// --- When steps ---

fn request(
    provider: &RefCell<Option<StubMatrixProvider>>,
    result: &ResultCell,
    locations: &[Coord<f64>],
) {
    let guard = provider.borrow();
    let stub = guard.as_ref().expect("provider must be initialised");
    *result.borrow_mut() = Some(stub.get_distance_matrix(locations, VehicleProfile::Driving));
}

#[when("I request a matrix for two locations")]
fn request_two(
    #[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>,
    #[from(result)] result: &ResultCell,
) {
    request(provider, result, &sample_locations(2));
}

#[when("I request a matrix for no locations")]
fn request_none(
    #[from(provider)] provider: &RefCell<Option<StubMatrixProvider>>,
    #[from(result)] result: &ResultCell,
) {
    request(provider, result, &[]);
}

// --- Then steps ---

fn with_error(result: &ResultCell, check: impl FnOnce(&MatrixError) -> bool, expected: &str) {
    let borrowed = result.borrow();
    match borrowed.as_ref() {
        Some(Err(err)) => assert!(check(err), "expected {expected}, got {err:?}"),
        other => panic!("expected {expected}, got {other:?}"),
    }
}

#[then("a 2x2 matrix is returned")]
fn then_matrix(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let matrix = borrowed
        .as_ref()
        .expect("request must run")
        .as_ref()
        .expect("expected Ok result");
    assert_eq!(matrix.len(), 2, "expected 2 locations");
    assert_eq!(matrix.duration(0, 0), Duration::ZERO, "diagonal should be zero");
    assert_eq!(matrix.duration(1, 0), Duration::from_secs(125));
    assert_eq!(matrix.distance(0, 1), 900.0);
}

#[then("an empty input error is returned")]
fn then_empty_error(#[from(result)] result: &ResultCell) {
    with_error(result, |err| matches!(err, MatrixError::EmptyInput), "EmptyInput");
}

#[then("a network error is returned")]
fn then_network_error(#[from(result)] result: &ResultCell) {
    with_error(
        result,
        |err| matches!(err, MatrixError::NetworkError { .. }),
        "NetworkError",
    );
}

#[then("a timeout error is returned")]
fn then_timeout_error(#[from(result)] result: &ResultCell) {
    with_error(result, |err| matches!(err, MatrixError::Timeout { .. }), "Timeout");
}

#[then("a service error is returned")]
fn then_service_error(#[from(result)] result: &ResultCell) {
    with_error(
        result,
        |err| matches!(err, MatrixError::ServiceError { .. }),
        "ServiceError",
    );
}

#[then("unreachable pairs have maximum duration and infinite distance")]
fn then_unreachable(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let matrix = borrowed
        .as_ref()
        .expect("request must run")
        .as_ref()
        .expect("expected Ok result");
    assert!(!matrix.is_reachable(0, 1), "unreachable should be MAX");
    assert!(!matrix.is_reachable(1, 0), "unreachable should be MAX");
    assert!(matrix.distance(0, 1).is_infinite());
    assert!(matrix.is_reachable(1, 1), "diagonal stays reachable");
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/osrm_matrix.feature", name = $title)]
        fn $fn_name(provider: RefCell<Option<StubMatrixProvider>>, result: ResultCell) {
            let _ = (provider, result);
        }
    };
}

register_scenario!(
    returning_matrix_for_two_locations,
    "returning a distance matrix for two locations"
);
register_scenario!(
    returning_error_for_empty_input,
    "returning an error for empty input"
);
register_scenario!(handling_network_error, "handling a network error");
register_scenario!(handling_timeout, "handling a timeout");
register_scenario!(handling_service_error, "handling a service error response");
register_scenario!(handling_unreachable_pairs, "handling unreachable pairs");
