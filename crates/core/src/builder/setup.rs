//! Setup and capture sequences shared by every layout.

use crate::common::Reg;
use crate::isa::encoder::{Immediate, build, emit};
use crate::isa::immediate::split_upper;
use crate::isa::{Class, Mnemonic, Operands};
use crate::program::{Label, Line};

/// `lui` + `addi` materialising an arbitrary 32-bit constant in `rd`.
pub fn li32(rd: Reg, value: u32) -> Vec<Line> {
    let (ui, offset) = split_upper(value);
    vec![
        emit(Mnemonic::Lui, Some(rd), None, None, ui).into(),
        emit(Mnemonic::Addi, Some(rd), Some(rd), None, offset).into(),
    ]
}

/// `lui` of the rounded upper part of `value` into `rd`; the low part is left to the user.
pub fn upper(rd: Reg, value: u32) -> Line {
    let (ui, _) = split_upper(value);
    emit(Mnemonic::Lui, Some(rd), None, None, ui).into()
}

/// Load or store of `data` at absolute `addr`, using `base` to hold the address.
///
/// # Arguments
///
/// * `mnemonic` - Any load or store.
/// * `data`     - Destination of a load, source of a store.
/// * `addr`     - Absolute address.
/// * `base`     - Register that receives the upper part of `addr`.
pub fn mem_access(mnemonic: Mnemonic, data: Reg, addr: u32, base: Reg) -> Vec<Line> {
    let (_, offset) = split_upper(addr);
    let access = if mnemonic.class() == Class::Load {
        emit(mnemonic, Some(data), Some(base), None, offset)
    } else {
        emit(mnemonic, None, Some(base), Some(data), offset)
    };
    vec![upper(base, addr), access.into()]
}

/// Stores `rd` to the result word at `out_addr` through the scratch register.
pub fn capture(rd: Reg, out_addr: u32) -> Vec<Line> {
    mem_access(Mnemonic::Sw, rd, out_addr, Reg::SCRATCH)
}

/// Unconditional jump to `label`, written as a branch so it has no link side effect.
pub fn jump_to(label: Label) -> Line {
    let ops = Operands::new(None, Some(Reg::ZERO), Some(Reg::ZERO));
    build(Mnemonic::Beq, ops, &Immediate::Label(label)).into()
}

/// `addi reg, reg, 1`.
pub fn increment(reg: Reg) -> Line {
    emit(Mnemonic::Addi, Some(reg), Some(reg), None, 1).into()
}

/// `la reg, label`.
pub fn load_address(reg: Reg, label: Label) -> Line {
    Line::to(format!("la {reg}, {label}"), label)
}

/// Calls `label` through `ra` with the jump under test.
///
/// `jal ra, label` for `jal`; `la link, label; jalr ra, link, 0` for `jalr`, whose target
/// is not limited by distance.
pub fn link_to(mnemonic: Mnemonic, link: Reg, label: Label) -> Vec<Line> {
    if mnemonic == Mnemonic::Jal {
        let ops = Operands::new(Some(Reg::RA), None, None);
        return vec![build(Mnemonic::Jal, ops, &Immediate::Label(label)).into()];
    }
    vec![load_address(link, label), emit(Mnemonic::Jalr, Some(Reg::RA), Some(link), None, 0).into()]
}

/// `sub rd, rd, link`.
pub fn subtract_link(rd: Reg, link: Reg) -> Line {
    emit(Mnemonic::Sub, Some(rd), Some(rd), Some(link), 0).into()
}

/// `ret`.
pub fn ret() -> Line {
    Line::new("ret")
}
