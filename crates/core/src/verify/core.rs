//! Core-pass comparison.

use std::collections::{BTreeMap, BTreeSet};

use super::trace;
use crate::common::error::VerifyError;

/// Compares a core trace against the expected result at each output address.
///
/// An address may be stored more than once (callees run once per call site); every store is
/// checked and counted.
///
/// # Returns
///
/// Number of records that matched.
///
/// # Errors
///
/// The first [`VerifyError`]: a wrong value, a store to an address nothing expects, a
/// malformed record, or an expected address the trace never reports.
pub fn verify(trace: &str, expected: &BTreeMap<u32, i32>) -> Result<usize, VerifyError> {
    let mut passed = 0;
    let mut seen = BTreeSet::new();
    for record in trace::core_records(trace) {
        let record = record?;
        let exp = expected.get(&record.address).copied();
        if exp.map(i64::from) != Some(record.value) {
            return Err(VerifyError::CoreMismatch {
                address: record.address,
                actual: record.value,
                expected: exp,
            });
        }
        let _ = seen.insert(record.address);
        passed += 1;
    }
    if let Some(&missing) = expected.keys().find(|a| !seen.contains(*a)) {
        return Err(VerifyError::Incomplete {
            expected: expected.len(),
            found: seen.len(),
            first_missing: missing,
        });
    }
    Ok(passed)
}
