//! Decode Signal Tests.
//!
//! Verifies the 17-field record expected from the decoder for each instruction family,
//! with particular attention to which fields are don't-care.

use pretty_assertions::assert_eq;

use rvtest_core::isa::encoder::{Immediate, build};
use rvtest_core::isa::signals::FIELD_NAMES;
use rvtest_core::isa::{Mnemonic, Operands};

use crate::common::builder::x;

/// Expected field values of `m` built with `rd=x2, rs1=x4, rs2=x15` and seed 12.
fn values(m: Mnemonic) -> [Option<i64>; 17] {
    let ops = Operands::new(Some(x(2)), Some(x(4)), Some(x(15)));
    build(m, ops, &Immediate::Value(12)).signals.values()
}

/// Value of the named field.
fn field(m: Mnemonic, name: &str) -> Option<i64> {
    let index = FIELD_NAMES.iter().position(|f| *f == name).expect("known field");
    values(m)[index]
}

#[test]
fn addi_record() {
    assert_eq!(
        values(Mnemonic::Addi),
        [
            Some(12), // imm
            Some(1),  // inst_type I
            Some(4),  // rs1
            None,     // rs2
            Some(2),  // rd
            Some(0),  // branch
            Some(0),  // jump
            Some(0),  // compare
            None,     // cmp_imm
            None,     // cmp_op
            Some(1),  // alu_imm
            Some(0),  // alu_pc
            Some(0),  // alu_op
            Some(0),  // mem_read
            Some(0),  // mem_write
            None,     // mem_size
            None,     // mem_unsigned
        ]
    );
}

#[test]
fn register_form_uses_both_sources() {
    assert_eq!(field(Mnemonic::Sub, "rs2"), Some(15));
    assert_eq!(field(Mnemonic::Sub, "alu_imm"), Some(0));
    assert_eq!(field(Mnemonic::Sub, "imm"), None);
    assert_eq!(field(Mnemonic::Sub, "alu_op"), None);
}

#[test]
fn compares_report_comparator() {
    assert_eq!(field(Mnemonic::Slt, "compare"), Some(1));
    assert_eq!(field(Mnemonic::Slt, "cmp_imm"), Some(0));
    assert_eq!(field(Mnemonic::Slt, "cmp_op"), Some(4));
    assert_eq!(field(Mnemonic::Sltiu, "cmp_imm"), Some(1));
    assert_eq!(field(Mnemonic::Sltiu, "cmp_op"), Some(6));
}

#[test]
fn branches_report_condition_as_comparator() {
    assert_eq!(field(Mnemonic::Blt, "branch"), Some(1));
    assert_eq!(field(Mnemonic::Blt, "cmp_imm"), Some(0));
    assert_eq!(field(Mnemonic::Blt, "cmp_op"), Some(4));
    assert_eq!(field(Mnemonic::Bgeu, "cmp_op"), Some(7));
    assert_eq!(field(Mnemonic::Beq, "alu_pc"), Some(1));
    assert_eq!(field(Mnemonic::Beq, "rd"), None);
}

#[test]
fn memory_records_width_and_sign() {
    assert_eq!(field(Mnemonic::Lbu, "mem_read"), Some(1));
    assert_eq!(field(Mnemonic::Lbu, "mem_size"), Some(0));
    assert_eq!(field(Mnemonic::Lbu, "mem_unsigned"), Some(1));
    assert_eq!(field(Mnemonic::Lh, "mem_size"), Some(1));
    assert_eq!(field(Mnemonic::Lh, "mem_unsigned"), Some(0));
    assert_eq!(field(Mnemonic::Sw, "mem_write"), Some(1));
    assert_eq!(field(Mnemonic::Sw, "mem_size"), Some(2));
    assert_eq!(field(Mnemonic::Sw, "inst_type"), Some(2));
    assert_eq!(field(Mnemonic::Sw, "rd"), None);
}

#[test]
fn pc_relative_instructions_set_alu_pc() {
    assert_eq!(field(Mnemonic::Auipc, "alu_pc"), Some(1));
    assert_eq!(field(Mnemonic::Lui, "alu_pc"), Some(0));
    assert_eq!(field(Mnemonic::Jal, "alu_pc"), Some(1));
    assert_eq!(field(Mnemonic::Jalr, "alu_pc"), Some(0));
    assert_eq!(field(Mnemonic::Jalr, "jump"), Some(1));
    assert_eq!(field(Mnemonic::Jal, "inst_type"), Some(5));
}

#[test]
fn bare_mnemonics_pin_only_structural_fields() {
    let record = values(Mnemonic::Fence);
    let pinned: Vec<&str> = FIELD_NAMES
        .iter()
        .zip(record)
        .filter_map(|(name, v)| v.map(|_| *name))
        .collect();
    assert_eq!(pinned, ["inst_type", "rd", "branch", "jump", "mem_write"]);
    assert_eq!(field(Mnemonic::Nop, "rd"), Some(0));
}
