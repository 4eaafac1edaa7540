//! Machine-word packing.
//!
//! Builds the 32-bit encodings the decoder trace reports in its first column, and extracts
//! immediates back out of them. The bit layouts follow the base ISA formats:
//!
//! - I: `imm[11:0] | rs1 | funct3 | rd | opcode`
//! - S: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
//! - B: `imm[12|10:5] | rs2 | rs1 | funct3 | imm[4:1|11] | opcode`
//! - U: `imm[31:12] | rd | opcode`
//! - J: `imm[20|10:1|11|19:12] | rd | opcode`

use super::format::InstructionFormat;
use super::mnemonic::Mnemonic;
use super::rv32i::{funct3, funct7, opcodes};
use crate::common::Reg;
use crate::common::constants::NOP_WORD;

/// `fence` with the default `iorw, iorw` ordering.
pub const FENCE_WORD: u32 = 0x0ff0_000f;
/// `ecall`.
pub const ECALL_WORD: u32 = 0x0000_0073;
/// `ebreak`.
pub const EBREAK_WORD: u32 = 0x0010_0073;

const RD_SHIFT: u32 = 7;
const FUNCT3_SHIFT: u32 = 12;
const RS1_SHIFT: u32 = 15;
const RS2_SHIFT: u32 = 20;
const FUNCT7_SHIFT: u32 = 25;
const I_IMM_SHIFT: u32 = 20;
const U_IMM_MASK: u32 = 0xffff_f000;

fn reg(r: Option<Reg>) -> u32 {
    u32::from(r.unwrap_or(Reg::ZERO).index())
}

/// Places `imm` into the immediate bit positions of `format`.
///
/// # Arguments
///
/// * `format` - Encoding format.
/// * `imm`    - Immediate as the decoder reports it (upper formats already shifted by 12).
pub const fn pack_immediate(format: InstructionFormat, imm: i64) -> u32 {
    let v = imm as u32;
    match format {
        InstructionFormat::R => 0,
        InstructionFormat::I => (v & 0xfff) << I_IMM_SHIFT,
        InstructionFormat::S => ((v >> 5) & 0x7f) << 25 | (v & 0x1f) << 7,
        InstructionFormat::B => {
            ((v >> 12) & 1) << 31
                | ((v >> 5) & 0x3f) << 25
                | ((v >> 1) & 0xf) << 8
                | ((v >> 11) & 1) << 7
        }
        InstructionFormat::U => v & U_IMM_MASK,
        InstructionFormat::J => {
            ((v >> 20) & 1) << 31
                | ((v >> 1) & 0x3ff) << 21
                | ((v >> 11) & 1) << 20
                | ((v >> 12) & 0xff) << 12
        }
    }
}

/// Extracts the sign-extended immediate of `format` from `word`.
pub const fn unpack_immediate(format: InstructionFormat, word: u32) -> i64 {
    let signed = word as i32;
    let imm = match format {
        InstructionFormat::R => 0,
        InstructionFormat::I => signed >> 20,
        InstructionFormat::S => ((signed >> 25) << 5) | ((word >> 7) & 0x1f) as i32,
        InstructionFormat::B => {
            ((signed >> 31) << 12)
                | (((word >> 7) & 1) << 11) as i32
                | (((word >> 25) & 0x3f) << 5) as i32
                | (((word >> 8) & 0xf) << 1) as i32
        }
        InstructionFormat::U => (word & U_IMM_MASK) as i32,
        InstructionFormat::J => {
            ((signed >> 31) << 20)
                | (word & 0x000f_f000) as i32
                | (((word >> 20) & 1) << 11) as i32
                | (((word >> 21) & 0x3ff) << 1) as i32
        }
    };
    imm as i64
}

const fn opcode_funct(mnemonic: Mnemonic) -> (u32, u32, u32) {
    use Mnemonic as M;
    match mnemonic {
        M::Add => (opcodes::OP_REG, funct3::ADD_SUB, funct7::DEFAULT),
        M::Sub => (opcodes::OP_REG, funct3::ADD_SUB, funct7::ALT),
        M::And => (opcodes::OP_REG, funct3::AND, funct7::DEFAULT),
        M::Or => (opcodes::OP_REG, funct3::OR, funct7::DEFAULT),
        M::Xor => (opcodes::OP_REG, funct3::XOR, funct7::DEFAULT),
        M::Sll => (opcodes::OP_REG, funct3::SLL, funct7::DEFAULT),
        M::Srl => (opcodes::OP_REG, funct3::SRL_SRA, funct7::DEFAULT),
        M::Sra => (opcodes::OP_REG, funct3::SRL_SRA, funct7::ALT),
        M::Slt => (opcodes::OP_REG, funct3::SLT, funct7::DEFAULT),
        M::Sltu => (opcodes::OP_REG, funct3::SLTU, funct7::DEFAULT),
        M::Addi | M::Nop => (opcodes::OP_IMM, funct3::ADD_SUB, 0),
        M::Andi => (opcodes::OP_IMM, funct3::AND, 0),
        M::Ori => (opcodes::OP_IMM, funct3::OR, 0),
        M::Xori => (opcodes::OP_IMM, funct3::XOR, 0),
        M::Slli => (opcodes::OP_IMM, funct3::SLL, 0),
        M::Srli | M::Srai => (opcodes::OP_IMM, funct3::SRL_SRA, 0),
        M::Slti => (opcodes::OP_IMM, funct3::SLT, 0),
        M::Sltiu => (opcodes::OP_IMM, funct3::SLTU, 0),
        M::Lb => (opcodes::OP_LOAD, funct3::LB, 0),
        M::Lh => (opcodes::OP_LOAD, funct3::LH, 0),
        M::Lw => (opcodes::OP_LOAD, funct3::LW, 0),
        M::Lbu => (opcodes::OP_LOAD, funct3::LBU, 0),
        M::Lhu => (opcodes::OP_LOAD, funct3::LHU, 0),
        M::Sb => (opcodes::OP_STORE, funct3::SB, 0),
        M::Sh => (opcodes::OP_STORE, funct3::SH, 0),
        M::Sw => (opcodes::OP_STORE, funct3::SW, 0),
        M::Beq => (opcodes::OP_BRANCH, funct3::BEQ, 0),
        M::Bne => (opcodes::OP_BRANCH, funct3::BNE, 0),
        M::Blt => (opcodes::OP_BRANCH, funct3::BLT, 0),
        M::Bge => (opcodes::OP_BRANCH, funct3::BGE, 0),
        M::Bltu => (opcodes::OP_BRANCH, funct3::BLTU, 0),
        M::Bgeu => (opcodes::OP_BRANCH, funct3::BGEU, 0),
        M::Lui => (opcodes::OP_LUI, 0, 0),
        M::Auipc => (opcodes::OP_AUIPC, 0, 0),
        M::Jal => (opcodes::OP_JAL, 0, 0),
        M::Jalr => (opcodes::OP_JALR, funct3::JALR, 0),
        M::Fence => (opcodes::OP_MISC_MEM, 0, 0),
        M::Ecall | M::Ebreak => (opcodes::OP_SYSTEM, 0, 0),
    }
}

/// Encodes a complete instruction word.
///
/// # Arguments
///
/// * `mnemonic`      - Instruction to encode.
/// * `rd`/`rs1`/`rs2` - Register slots; absent slots encode as zero.
/// * `imm`           - Immediate as the decoder reports it (see [`super::immediate::decoded`]).
///
/// # Returns
///
/// The little-endian instruction word as a `u32`.
pub fn encode_word(
    mnemonic: Mnemonic,
    rd: Option<Reg>,
    rs1: Option<Reg>,
    rs2: Option<Reg>,
    imm: i64,
) -> u32 {
    match mnemonic {
        Mnemonic::Nop => return NOP_WORD,
        Mnemonic::Fence => return FENCE_WORD,
        Mnemonic::Ecall => return ECALL_WORD,
        Mnemonic::Ebreak => return EBREAK_WORD,
        _ => {}
    }
    let (opcode, f3, f7) = opcode_funct(mnemonic);
    let format = mnemonic.format();
    let mut word = opcode | pack_immediate(format, imm);
    if !matches!(format, InstructionFormat::S | InstructionFormat::B) {
        word |= reg(rd) << RD_SHIFT;
    }
    if !matches!(format, InstructionFormat::U | InstructionFormat::J) {
        word |= f3 << FUNCT3_SHIFT | reg(rs1) << RS1_SHIFT;
    }
    if matches!(format, InstructionFormat::R | InstructionFormat::S | InstructionFormat::B) {
        word |= reg(rs2) << RS2_SHIFT;
    }
    if format == InstructionFormat::R {
        word |= f7 << FUNCT7_SHIFT;
    }
    word
}
