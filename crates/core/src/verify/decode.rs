//! Decode-pass comparison.

use super::trace::{self, Field};
use crate::common::error::VerifyError;
use crate::isa::Encoded;
use crate::isa::signals::FIELD_NAMES;

/// Compares a decoder trace against the expected signals, in emission order.
///
/// Don't-care fields are skipped. When `check_encoding` is set, the instruction word column
/// is compared first, since a wrong word makes every field comparison meaningless.
///
/// # Arguments
///
/// * `trace`          - Captured simulator output.
/// * `expected`       - Encoded instructions in emission order.
/// * `check_encoding` - Compare the instruction word column.
///
/// # Returns
///
/// Number of records checked.
///
/// # Errors
///
/// The first [`VerifyError`]: a mismatch, a malformed record, an extra record, or a trace
/// that ends early.
pub fn verify(trace: &str, expected: &[Encoded], check_encoding: bool) -> Result<usize, VerifyError> {
    let mut checked = 0;
    for (index, record) in trace::decode_records(trace).enumerate() {
        let record = record?;
        let exp = expected.get(index).ok_or(VerifyError::ExtraRecord { index })?;
        if check_encoding {
            if let Some(word) = exp.word.filter(|&w| w != record.word) {
                return Err(VerifyError::EncodingMismatch { index, actual: record.word, expected: word });
            }
        }
        let values = exp.signals.values();
        for ((name, actual), value) in FIELD_NAMES.iter().zip(record.fields).zip(values) {
            let Some(value) = value else { continue };
            if actual != Field::Value(value) {
                return Err(VerifyError::DecodeMismatch {
                    encoding: record.encoding,
                    index,
                    field: *name,
                    actual: actual.to_string(),
                    expected: value,
                });
            }
        }
        checked += 1;
    }
    if checked < expected.len() {
        return Err(VerifyError::Incomplete {
            expected: expected.len(),
            found: checked,
            first_missing: u32::try_from(checked).unwrap_or(u32::MAX),
        });
    }
    Ok(checked)
}
