//! Encoder Tests.
//!
//! Verifies the assembly text, expected decode immediate and machine word produced for
//! each instruction class, including label targets and the bare mnemonics.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rvtest_core::isa::encoder::{Immediate, build, emit};
use rvtest_core::isa::fields::{EBREAK_WORD, ECALL_WORD, FENCE_WORD, encode_word};
use rvtest_core::isa::{Encoded, Mnemonic, Operands};
use rvtest_core::program::Label;

use crate::common::builder::x;

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Encodes `m` with all three slots populated and a numeric seed.
fn enc(m: Mnemonic, rd: u8, rs1: u8, rs2: u8, seed: i64) -> Encoded {
    build(m, Operands::new(Some(x(rd)), Some(x(rs1)), Some(x(rs2))), &Immediate::Value(seed))
}

// ═════════════════════════════════════════════════════════════════════════════
//  Assembly text
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case::op(Mnemonic::Add, "add x2, x4, x15")]
#[case::op_imm(Mnemonic::Addi, "addi x2, x4, 12")]
#[case::load(Mnemonic::Lb, "lb x2, 12(x4)")]
#[case::store(Mnemonic::Sw, "sw x15, 12(x4)")]
#[case::branch(Mnemonic::Beq, "beq x4, x15, .+12")]
#[case::upper(Mnemonic::Lui, "lui x2, 12")]
#[case::jal(Mnemonic::Jal, "jal x2, .+12")]
#[case::jalr(Mnemonic::Jalr, "jalr x2, x4, 12")]
#[case::bare(Mnemonic::Ecall, "ecall")]
fn text_follows_class_syntax(#[case] m: Mnemonic, #[case] text: &str) {
    assert_eq!(enc(m, 2, 4, 15, 12).text, text);
}

#[test]
fn negative_branch_offset_is_signed() {
    assert_eq!(enc(Mnemonic::Bne, 0, 1, 2, 0x1ffe).text, "bne x1, x2, .-2");
}

#[test]
fn label_target_leaves_word_unknown() {
    let ops = Operands::new(None, Some(x(7)), Some(x(9)));
    let enc = build(Mnemonic::Blt, ops, &Immediate::Label(Label::taken(40)));
    assert_eq!(enc.text, "blt x7, x9, .b40");
    assert_eq!(enc.target, Some(Label::taken(40)));
    assert_eq!(enc.word, None);
    assert_eq!(enc.signals.imm, None);
}

#[test]
fn jal_label_target_names_link_register() {
    let ops = Operands::new(Some(x(1)), Some(x(7)), Some(x(9)));
    let enc = build(Mnemonic::Jal, ops, &Immediate::Label(Label::entry(28)));
    assert_eq!(enc.text, "jal x1, .l28");
    assert_eq!(enc.target, Some(Label::entry(28)));
    assert_eq!(enc.word, None);
}

#[test]
fn emit_writes_setup_instructions() {
    assert_eq!(emit(Mnemonic::Lui, Some(x(5)), None, None, 0xc0000).text, "lui x5, 786432");
    assert_eq!(emit(Mnemonic::Sw, None, Some(x(5)), Some(x(3)), -4).text, "sw x3, -4(x5)");
}

// ═════════════════════════════════════════════════════════════════════════════
//  Decoded immediates
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn addi_reports_plain_immediate() {
    let enc = build(Mnemonic::Addi, Operands::new(Some(x(5)), Some(x(0)), None), &Immediate::Value(12));
    assert_eq!(enc.text, "addi x5, x0, 12");
    assert_eq!(enc.signals.imm, Some(12));
    assert_eq!(enc.text_imm(), Some(12));
}

#[test]
fn lui_reports_shifted_immediate() {
    let enc = enc(Mnemonic::Lui, 3, 0, 0, 0x12345);
    assert_eq!(enc.text, "lui x3, 74565");
    assert_eq!(enc.signals.imm, Some(0x1234_5000));
    assert_eq!(enc.signals.format.tag(), 4);
    assert_eq!(enc.text_imm(), Some(0x12345));
}

#[test]
fn srai_text_keeps_shift_amount() {
    let enc = enc(Mnemonic::Srai, 2, 4, 0, 5);
    assert_eq!(enc.text, "srai x2, x4, 5");
    assert_eq!(enc.signals.imm, Some(1029));
    assert_eq!(enc.text_imm(), Some(5));
}

// ═════════════════════════════════════════════════════════════════════════════
//  Machine words
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case::addi(enc(Mnemonic::Addi, 5, 0, 0, 12), 0x00c0_0293)]
#[case::add(enc(Mnemonic::Add, 2, 4, 15, 0), 0x00f2_0133)]
#[case::sub(enc(Mnemonic::Sub, 1, 1, 4, 0), 0x4040_80b3)]
#[case::srai(enc(Mnemonic::Srai, 2, 4, 0, 5), 0x4052_5113)]
#[case::lui(enc(Mnemonic::Lui, 3, 0, 0, 0x12345), 0x1234_51b7)]
#[case::nop(enc(Mnemonic::Nop, 2, 4, 15, 7), 0x0000_0013)]
#[case::fence(enc(Mnemonic::Fence, 2, 4, 15, 7), FENCE_WORD)]
#[case::ecall(enc(Mnemonic::Ecall, 2, 4, 15, 7), ECALL_WORD)]
#[case::ebreak(enc(Mnemonic::Ebreak, 2, 4, 15, 7), EBREAK_WORD)]
fn word_matches_reference_encoding(#[case] enc: Encoded, #[case] word: u32) {
    assert_eq!(enc.word, Some(word), "{}", enc.text);
}

#[test]
fn store_word_splits_immediate() {
    // sw x15, -4(x4): imm[11:5]=0x7f, imm[4:0]=0x1c.
    let word = encode_word(Mnemonic::Sw, None, Some(x(4)), Some(x(15)), -4);
    assert_eq!(word, 0xfef2_2e23);
}

#[test]
fn branch_word_scatters_immediate() {
    // beq x1, x2, +16: imm[4:1]=0b1000 lands in bits 11:8.
    let word = encode_word(Mnemonic::Beq, None, Some(x(1)), Some(x(2)), 16);
    assert_eq!(word, 0x0020_8863);
}

#[test]
fn bare_mnemonics_ignore_operands() {
    let enc = enc(Mnemonic::Nop, 2, 4, 15, 7);
    assert_eq!(enc.text, "nop");
    assert_eq!(enc.signals.imm, None);
    assert_eq!(enc.signals.regs, Operands::new(Some(x(0)), None, None));
}
