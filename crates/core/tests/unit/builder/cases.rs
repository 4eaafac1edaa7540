//! Test Case Builder Tests.
//!
//! Verifies expected results for every layout and each rejection the builder makes before
//! a case can reach a listing.

use std::rc::Rc;

use rvtest_core::builder::{Filler, TestCase, TestCaseBuilder};
use rvtest_core::common::{BuildError, Reg, Rng};
use rvtest_core::isa::Mnemonic;

use crate::common::builder::{FILLER_RD, build, filler, opts, rng, x};

// ─── Constants ───────────────────────────────────────────────────────────────

const WORD: u32 = 0xaabb_ccdd;

/// Result of the taken-path filler: x2 = 5, x3 = x2 + 1.
const TAKEN: i32 = 6;
/// Result of the not-taken filler: x4 = 7, x3 = x4 + 2.
const NOT_TAKEN: i32 = 9;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn try_build(builder: TestCaseBuilder) -> Result<TestCase, BuildError> {
    builder.build(&opts(), &mut rng())
}

/// Branch on x7/x9 writing x3, with the two standard fillers.
fn branch(m: Mnemonic, v1: u32, v2: u32) -> TestCaseBuilder {
    TestCaseBuilder::new(m, 4)
        .rd(x(FILLER_RD))
        .rs1(x(7))
        .rs2(x(9))
        .values(v1, v2)
        .fill1(filler(8, 2, 5, 1))
        .fill2(filler(12, 4, 7, 2))
}

/// `jal` linking through x4, with a callee writing x3.
fn jump(m: Mnemonic) -> TestCaseBuilder {
    TestCaseBuilder::new(m, 20)
        .rd(Reg::RA)
        .rs1(x(2))
        .rs2(x(4))
        .fill1(filler(24, 2, 5, 1))
        .fill2(filler(28, 4, 7, 2))
}

// ═════════════════════════════════════════════════════════════════════════════
//  Leaf cases
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn add_wraps_on_overflow() {
    let case = build(TestCaseBuilder::new(Mnemonic::Add, 4).rd(x(2)).rs1(x(4)).rs2(x(15)).values(0x7fff_ffff, 1));
    assert_eq!(case.expected(), i32::MIN);
}

#[test]
fn zero_destination_expects_zero() {
    let case = build(TestCaseBuilder::new(Mnemonic::Addi, 4).rd(x(0)).rs1(x(2)).values(5, 7));
    assert_eq!(case.expected(), 0);
}

#[test]
fn aliased_sources_read_rs1_value() {
    let case = build(TestCaseBuilder::new(Mnemonic::Add, 4).rd(x(2)).rs1(x(4)).rs2(x(4)).values(10, 20));
    assert_eq!(case.expected(), 20);
}

#[test]
fn immediate_form_ignores_rs2() {
    let case = build(TestCaseBuilder::new(Mnemonic::Slli, 4).rd(x(2)).rs1(x(4)).rs2(x(15)).values(1, 33));
    assert_eq!(case.expected(), 2);
    assert_eq!(case.rs2(), x(0));
}

#[test]
fn byte_load_extracts_lane() {
    let case = build(TestCaseBuilder::new(Mnemonic::Lb, 4).rd(x(2)).rs1(x(4)).rs2(x(15)).values(0x1001, WORD));
    assert_eq!(case.expected(), -52);
    assert_eq!(case.v1(), 0xc000_1001);
}

#[test]
fn load_with_zero_data_register_reads_zero() {
    let case = build(TestCaseBuilder::new(Mnemonic::Lw, 4).rd(x(2)).rs1(x(4)).rs2(x(0)).values(0x1000, WORD));
    assert_eq!(case.expected(), 0);
}

#[test]
fn store_reads_back_word() {
    let case = build(TestCaseBuilder::new(Mnemonic::Sb, 4).rd(x(2)).rs1(x(4)).rs2(x(15)).values(0x1001, WORD));
    assert_eq!(case.expected(), 0xdd00);
}

#[test]
fn lui_expects_shifted_immediate() {
    let case = build(TestCaseBuilder::new(Mnemonic::Lui, 4).rd(x(2)).values(0, 0x12345));
    assert_eq!(case.expected(), 0x1234_5000);
    assert!(case.is_inlinable());
}

#[test]
fn auipc_expects_immediate_after_anchor_correction() {
    let case = build(TestCaseBuilder::new(Mnemonic::Auipc, 4).rd(x(2)).rs1(x(4)).values(0, 0x12345));
    assert_eq!(case.expected(), 0x1234_5000);
    assert!(!case.is_inlinable());
}

#[test]
fn bare_mnemonic_captures_x0() {
    let case = build(TestCaseBuilder::new(Mnemonic::Ebreak, 4).rd(x(2)).rs1(x(4)));
    assert_eq!(case.rd(), x(0));
    assert_eq!(case.expected(), 0);
    assert!(case.clobbers().is_empty());
}

#[test]
fn missing_values_are_drawn_from_generator() {
    let first = build(TestCaseBuilder::new(Mnemonic::Xor, 4).rd(x(2)).rs1(x(4)).rs2(x(15)));
    let second = build(TestCaseBuilder::new(Mnemonic::Xor, 4).rd(x(2)).rs1(x(4)).rs2(x(15)));
    let other = TestCaseBuilder::new(Mnemonic::Xor, 4)
        .rd(x(2))
        .rs1(x(4))
        .rs2(x(15))
        .build(&opts(), &mut Rng::new(99))
        .expect("builds");
    assert_eq!((first.v1(), first.v2()), (second.v1(), second.v2()));
    assert_ne!(first.v1(), other.v1());
}

#[test]
fn memory_access_rejects_zero_base() {
    let err = try_build(TestCaseBuilder::new(Mnemonic::Lb, 4).rd(x(2)).rs1(x(0)).rs2(x(15)));
    assert_eq!(err.unwrap_err(), BuildError::ZeroBase { mnemonic: Mnemonic::Lb });
}

#[test]
fn memory_access_rejects_base_aliasing_data() {
    let err = try_build(TestCaseBuilder::new(Mnemonic::Sw, 4).rd(x(2)).rs1(x(4)).rs2(x(4)));
    assert_eq!(err.unwrap_err(), BuildError::BaseAliasesData { mnemonic: Mnemonic::Sw, reg: x(4) });
}

#[test]
fn scratch_register_is_not_a_destination() {
    let err = try_build(TestCaseBuilder::new(Mnemonic::Add, 4).rd(Reg::SCRATCH).rs1(x(4)));
    assert!(matches!(err, Err(BuildError::ScratchRegister { .. })));
}

#[test]
fn auipc_rejects_anchor_equal_to_destination() {
    let err = try_build(TestCaseBuilder::new(Mnemonic::Auipc, 4).rd(x(2)).rs1(x(2)));
    assert_eq!(err.unwrap_err(), BuildError::LinkRegister { mnemonic: Mnemonic::Auipc, reg: x(2) });
}

#[test]
fn extras_must_not_write_destination() {
    let base = filler(8, 2, 5, 1);
    let clobbering = filler(12, 4, 7, 2).instruction().clone();
    let err = base.clone().with_extra([clobbering]);
    assert!(matches!(err, Err(BuildError::FillerClobbers { reg, .. }) if reg == x(FILLER_RD)));

    let harmless = build(TestCaseBuilder::new(Mnemonic::Or, 16).rd(x(4)).rs1(x(2)).rs2(x(15)));
    let padded = base.with_extra([harmless.instruction().clone()]).expect("extra accepted");
    assert_eq!(padded.extras().len(), 1);
    assert!(padded.clobbers().contains(&x(4)));
    assert_eq!(padded.expected(), TAKEN);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Branches
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn taken_branch_expects_taken_filler() {
    let case = build(branch(Mnemonic::Bge, 10, 3));
    assert_eq!(case.expected(), TAKEN);
    assert_eq!(case.loop_trips(), None);
}

#[test]
fn untaken_branch_expects_fallthrough_filler() {
    let case = build(branch(Mnemonic::Bge, 3, 10).forward(true));
    assert_eq!(case.expected(), NOT_TAKEN);
    assert!(case.is_forward());
}

#[test]
fn loop_exits_to_not_taken_filler() {
    let case = build(branch(Mnemonic::Blt, 0, 5).make_loop(true));
    assert_eq!(case.loop_trips(), Some(5));
    assert_eq!(case.expected(), NOT_TAKEN);
}

#[test]
fn loop_beyond_bound_is_rejected() {
    let err = try_build(branch(Mnemonic::Bltu, 0, 100).make_loop(true));
    assert_eq!(err.unwrap_err(), BuildError::LoopDiverges { mnemonic: Mnemonic::Bltu, bound: 64 });
}

#[test]
fn forward_loop_is_rejected() {
    let err = try_build(branch(Mnemonic::Blt, 0, 5).forward(true).make_loop(true));
    assert_eq!(err.unwrap_err(), BuildError::ForwardLoop { mnemonic: Mnemonic::Blt });
}

#[test]
fn branch_needs_both_fillers() {
    let err = try_build(TestCaseBuilder::new(Mnemonic::Beq, 4).rd(x(3)).rs1(x(7)).rs2(x(9)));
    assert_eq!(err.unwrap_err(), BuildError::MissingFiller { mnemonic: Mnemonic::Beq, slot: "taken" });
}

#[test]
fn branch_rejects_flat_filler() {
    let err = try_build(branch(Mnemonic::Beq, 1, 1).fill2(Filler::Flat(Vec::new())));
    assert_eq!(err.unwrap_err(), BuildError::FlatBranchFiller { mnemonic: Mnemonic::Beq });
}

#[test]
fn filler_must_write_branch_destination() {
    let stray = build(TestCaseBuilder::new(Mnemonic::Addi, 12).rd(x(2)).rs1(x(4)).values(7, 2));
    let err = try_build(branch(Mnemonic::Beq, 1, 1).fill2(stray));
    assert_eq!(
        err.unwrap_err(),
        BuildError::FillerDestination { mnemonic: Mnemonic::Beq, expected: x(3), found: x(2) }
    );
}

#[test]
fn filler_must_not_clobber_branch_operand() {
    let err = try_build(branch(Mnemonic::Bne, 1, 2).fill1(filler(8, 7, 5, 1)));
    assert_eq!(err.unwrap_err(), BuildError::FillerClobbers { mnemonic: Mnemonic::Bne, reg: x(7) });
}

#[test]
fn filler_must_be_inlinable() {
    let anchored = build(TestCaseBuilder::new(Mnemonic::Auipc, 8).rd(x(3)).rs1(x(2)).values(0, 1));
    let err = try_build(branch(Mnemonic::Beq, 1, 1).fill1(anchored));
    assert_eq!(err.unwrap_err(), BuildError::NotInlinable { mnemonic: Mnemonic::Auipc, addr: 8 });
}

// ═════════════════════════════════════════════════════════════════════════════
//  Jumps
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn jump_expects_zero_and_names_callee() {
    let case = build(jump(Mnemonic::Jal));
    assert_eq!(case.expected(), 0);
    let callees: Vec<u32> = case.callees().iter().map(|c| c.out_addr()).collect();
    assert_eq!(callees, [28]);
    assert!(case.clobbers().contains(&Reg::RA));
    assert!(case.clobbers().contains(&x(4)));
}

#[test]
fn flat_jump_has_no_callee() {
    let case = build(jump(Mnemonic::Jalr).fill2(Filler::Flat(Vec::new())));
    assert!(case.callees().is_empty());
    assert!(!case.is_inlinable());
}

#[test]
fn jump_must_link_through_ra() {
    let err = try_build(jump(Mnemonic::Jal).rd(x(2)));
    assert_eq!(err.unwrap_err(), BuildError::JumpDestination { mnemonic: Mnemonic::Jal, found: x(2) });
}

#[test]
fn jump_link_falls_back_to_rs1() {
    let err = try_build(jump(Mnemonic::Jalr).rs1(x(0)).rs2(x(0)));
    assert_eq!(err.unwrap_err(), BuildError::LinkRegister { mnemonic: Mnemonic::Jalr, reg: x(0) });
}

#[test]
fn jump_needs_callee() {
    let err = try_build(TestCaseBuilder::new(Mnemonic::Jal, 20).rd(Reg::RA).rs1(x(2)));
    assert_eq!(err.unwrap_err(), BuildError::MissingFiller { mnemonic: Mnemonic::Jal, slot: "callee" });
}

#[test]
fn callee_must_preserve_return_address() {
    let callee = build(TestCaseBuilder::new(Mnemonic::Addi, 28).rd(Reg::RA).rs1(x(2)).values(1, 1));
    let err = try_build(jump(Mnemonic::Jal).fill2(Rc::new(callee)));
    assert_eq!(err.unwrap_err(), BuildError::CalleeClobbersReturn { mnemonic: Mnemonic::Addi, addr: 28 });
}
