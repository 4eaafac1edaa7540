//! Decode-Pass Comparison Tests.

use pretty_assertions::assert_eq;

use rvtest_core::common::error::VerifyError;
use rvtest_core::isa::encoder::{Immediate, build};
use rvtest_core::isa::{Encoded, Mnemonic, Operands};
use rvtest_core::program::Label;
use rvtest_core::verify::decode::verify;

use crate::common::builder::x;
use crate::common::trace::{decode_record, decode_trace};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn addi() -> Encoded {
    build(Mnemonic::Addi, Operands::new(Some(x(5)), Some(x(0)), None), &Immediate::Value(12))
}

fn sub() -> Encoded {
    build(Mnemonic::Sub, Operands::new(Some(x(1)), Some(x(1)), Some(x(4))), &Immediate::Value(0))
}

fn beq() -> Encoded {
    build(Mnemonic::Beq, Operands::new(None, Some(x(7)), Some(x(9))), &Immediate::Label(Label::taken(4)))
}

// ═════════════════════════════════════════════════════════════════════════════
//  Matching traces
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn matching_trace_counts_every_record() {
    let expected = [addi(), sub(), beq()];
    assert_eq!(verify(&decode_trace(&expected), &expected, true), Ok(3));
}

#[test]
fn label_target_skips_encoding_check() {
    let expected = [beq()];
    assert_eq!(expected[0].word, None);
    assert_eq!(verify(&decode_trace(&expected), &expected, true), Ok(1));
}

#[test]
fn dont_care_fields_accept_any_value() {
    let expected = [addi()];
    // rs2 is unused by an I-type instruction.
    let trace = decode_record(&expected[0]).replacen(" 12 1 0 x ", " 12 1 0 9 ", 1);
    assert_eq!(verify(&trace, &expected, true), Ok(1));
}

// ═════════════════════════════════════════════════════════════════════════════
//  First counterexample
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn wrong_field_reports_name_and_values() {
    let expected = [sub(), addi()];
    let trace = decode_trace(&expected).replacen("00c00293 12 ", "00c00293 13 ", 1);
    let err = verify(&trace, &expected, true).unwrap_err();
    assert_eq!(err.to_string(), "00c00293 (1): imm=13, expected 12");
}

#[test]
fn unknown_field_where_value_expected_is_a_mismatch() {
    let expected = [addi()];
    let trace = decode_record(&expected[0]).replacen("00c00293 12 ", "00c00293 x ", 1);
    let err = verify(&trace, &expected, false).unwrap_err();
    assert!(matches!(err, VerifyError::DecodeMismatch { field: "imm", ref actual, .. } if actual == "x"));
}

#[test]
fn wrong_word_is_reported_before_fields() {
    let expected = [addi()];
    let trace = decode_record(&expected[0]).replacen("00c00293 12 ", "00c00393 13 ", 1);
    let err = verify(&trace, &expected, true).unwrap_err();
    assert_eq!(err, VerifyError::EncodingMismatch { index: 0, actual: 0x00c0_0393, expected: 0x00c0_0293 });
    assert_eq!(err.to_string(), "00c00393 (0): encoding, expected 00c00293");
}

#[test]
fn wrong_word_ignored_when_check_disabled() {
    let expected = [addi()];
    let trace = decode_record(&expected[0]).replacen("00c00293", "00c00393", 1);
    assert_eq!(verify(&trace, &expected, false), Ok(1));
}

#[test]
fn extra_record_is_rejected() {
    let expected = [addi()];
    let trace = decode_trace(&[addi(), addi()]);
    assert_eq!(verify(&trace, &expected, true), Err(VerifyError::ExtraRecord { index: 1 }));
}

#[test]
fn short_trace_is_incomplete() {
    let expected = [addi(), sub(), beq()];
    let trace = decode_trace(&expected[..1]);
    assert_eq!(
        verify(&trace, &expected, true),
        Err(VerifyError::Incomplete { expected: 3, found: 1, first_missing: 1 })
    );
}

#[test]
fn malformed_record_stops_verification() {
    let expected = [addi()];
    let err = verify("# 00c00293 12 0\n", &expected, true).unwrap_err();
    assert!(matches!(err, VerifyError::Parse(ref e) if e.line_no == 1));
}
