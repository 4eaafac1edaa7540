//! ALU shift operations.
//!
//! Shift amounts are masked to 5 bits (0-31).

use super::AluOp;
use crate::common::constants::SHIFT_MASK;

/// Executes a shift operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a shift variant).
/// * `a`  - The value to be shifted.
/// * `b`  - The shift amount (upper bits ignored).
///
/// # Returns
///
/// The shifted word. Returns `0` for non-shift opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    let sh = b & SHIFT_MASK;
    match op {
        AluOp::Sll => a << sh,
        AluOp::Srl => a >> sh,
        AluOp::Sra => ((a as i32) >> sh) as u32,
        _ => 0,
    }
}
