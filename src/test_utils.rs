// License: MIT
// Copyright © 2026 multistate-net contributors

//! This module is only compiled when running unit tests and contains
//! assertion helpers shared by the test modules of the crate.

use crate::Ugf;

/// Absolute tolerance for comparing computed probabilities against expected
/// values in tests.
pub(crate) const TEST_EPS: f64 = 1e-9;

/// Asserts that two floats are equal within [`TEST_EPS`].
#[track_caller]
pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TEST_EPS,
        "expected {expected}, got {actual}"
    );
}

/// Asserts that a UGF has the given values and probabilities (within
/// [`TEST_EPS`] per entry).
#[track_caller]
pub(crate) fn assert_ugf(ugf: &Ugf, values: &[f64], probabilities: &[f64]) {
    assert_eq!(
        ugf.values(),
        values,
        "values mismatch: expected {values:?}, got {:?}",
        ugf.values()
    );
    assert_eq!(ugf.probabilities().len(), probabilities.len());
    for (i, (actual, expected)) in ugf
        .probabilities()
        .iter()
        .zip(probabilities)
        .enumerate()
    {
        assert!(
            (actual - expected).abs() < TEST_EPS,
            "probability {i}: expected {expected}, got {actual}"
        );
    }
}
