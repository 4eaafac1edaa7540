//! Trace Grammar Tests.
//!
//! Verifies record parsing for both passes, which simulator chatter is ignored, and which
//! record-shaped lines are rejected as malformed.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rvtest_core::verify::trace::{core_line, core_records, decode_line, decode_records};
use rvtest_core::verify::{CoreRecord, Field};

// ─── Constants ───────────────────────────────────────────────────────────────

/// `addi x5, x0, 12` as a decoder prints it.
const ADDI_RECORD: &str = "# 00c00293 12 1 0 x 5 0 0 0 x x 1 0 0 0 0 x x";

// ═════════════════════════════════════════════════════════════════════════════
//  Decode records
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn decode_record_parses_fields() {
    let record = decode_line(3, ADDI_RECORD).expect("valid").expect("record");
    assert_eq!(record.line_no, 3);
    assert_eq!(record.encoding, "00c00293");
    assert_eq!(record.word, 0x00c0_0293);
    assert_eq!(record.fields[0], Field::Value(12));
    assert_eq!(record.fields[3], Field::Unknown);
    assert_eq!(record.fields[4], Field::Value(5));
}

#[test]
fn decode_record_without_hash_and_uppercase_x() {
    let line = "FFF00093 -1 0 0 X 1 0 0 0 X X 1 0 0 0 0 X X";
    let record = decode_line(1, line).expect("valid").expect("record");
    assert_eq!(record.fields[0], Field::Value(-1));
    assert_eq!(record.fields[3], Field::Unknown);
}

#[rstest]
#[case::banner("# Loading work.tb_decode")]
#[case::note("# ** Note: $finish    : tb_decode.sv(31)")]
#[case::time("#    Time: 1200 ns  Iteration: 0")]
#[case::blank("")]
#[case::bare_word("# 00c00293")]
fn decode_chatter_is_ignored(#[case] line: &str) {
    assert_eq!(decode_line(1, line), Ok(None));
}

#[test]
fn decode_record_with_missing_fields_is_rejected() {
    let err = decode_line(7, "# 00c00293 12 0 0").unwrap_err();
    assert_eq!(err.line_no, 7);
    assert_eq!(err.reason, "expected 17 fields, found 3");
}

#[test]
fn decode_record_with_bad_field_is_rejected() {
    let line = ADDI_RECORD.replacen(" 5 ", " z ", 1);
    let err = decode_line(2, &line).unwrap_err();
    assert_eq!(err.reason, "bad field \"z\"");
    assert_eq!(err.line, line);
}

#[test]
fn decode_records_skip_chatter() {
    let trace = format!("# Loading work.tb\n{ADDI_RECORD}\n# ** Note: done\n{ADDI_RECORD}\n");
    let lines: Vec<usize> = decode_records(&trace).map(|r| r.expect("valid").line_no).collect();
    assert_eq!(lines, [2, 4]);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Core records
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case::hashed("# 4 -1", 4, -1)]
#[case::plain("  1024   2147483647 ", 1024, 2_147_483_647)]
#[case::unsigned_print("8 4294967295", 8, 4_294_967_295)]
fn core_record_parses(#[case] line: &str, #[case] address: u32, #[case] value: i64) {
    let record = core_line(5, line).expect("valid");
    assert_eq!(record, Some(CoreRecord { line_no: 5, address, value }));
}

#[rstest]
#[case::banner("# Loading work.tb_top")]
#[case::time("#    Time: 1200 ns  Iteration: 0")]
#[case::single_number("# 12")]
#[case::text_after_number("# 12 cycles elapsed")]
fn core_chatter_is_ignored(#[case] line: &str) {
    assert_eq!(core_line(1, line), Ok(None));
}

#[rstest]
#[case::undriven_value("# 4 x", "bad value \"x\"")]
#[case::extra_column("# 4 5 6", "expected 2 columns, found 3")]
#[case::high_impedance("# 8 zz", "bad value \"zz\"")]
fn core_record_shape_is_enforced(#[case] line: &str, #[case] reason: &str) {
    assert_eq!(core_line(1, line).unwrap_err().reason, reason);
}

#[test]
fn core_records_report_line_numbers() {
    let trace = "# Loading work.tb\n# 4 1\n# 8 x\n";
    let results: Vec<_> = core_records(trace).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].as_ref().unwrap_err().line_no, 3);
}
