//! Fluent construction of [`TestCase`]s.

use super::BuildOptions;
use super::case::{Filler, Layout, TestCase};
use super::model::{self, MemAccess};
use crate::alu::branch::BranchCond;
use crate::common::{BuildError, Reg, Rng};
use crate::isa::encoder::{Immediate, build};
use crate::isa::immediate::split_upper;
use crate::isa::{Class, Encoded, MemWidth, Mnemonic, Operands};
use crate::program::Label;

/// Builder for a [`TestCase`].
///
/// Registers default to `x0`, operand values to fresh random words and fillers to none.
///
/// # Examples
///
/// ```
/// use rvtest_core::builder::{BuildOptions, TestCaseBuilder};
/// use rvtest_core::common::{Reg, Rng};
/// use rvtest_core::isa::Mnemonic;
///
/// let x = |i| Reg::new(i).unwrap();
/// let case = TestCaseBuilder::new(Mnemonic::Add, 4)
///     .rd(x(2))
///     .rs1(x(4))
///     .rs2(x(15))
///     .values(0x7fff_ffff, 1)
///     .build(&BuildOptions::default(), &mut Rng::new(1))
///     .unwrap();
/// assert_eq!(case.expected(), i32::MIN);
/// ```
#[derive(Clone, Debug)]
pub struct TestCaseBuilder {
    mnemonic: Mnemonic,
    out_addr: u32,
    rd: Reg,
    rs1: Reg,
    rs2: Reg,
    v1: Option<u32>,
    v2: Option<u32>,
    fill1: Option<Filler>,
    fill2: Option<Filler>,
    forward: bool,
    make_loop: bool,
}

impl TestCaseBuilder {
    /// Starts a case for `mnemonic` capturing its result at `out_addr`.
    pub const fn new(mnemonic: Mnemonic, out_addr: u32) -> Self {
        Self {
            mnemonic,
            out_addr,
            rd: Reg::ZERO,
            rs1: Reg::ZERO,
            rs2: Reg::ZERO,
            v1: None,
            v2: None,
            fill1: None,
            fill2: None,
            forward: false,
            make_loop: false,
        }
    }

    /// Mnemonic under test.
    pub const fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    /// Destination register.
    #[must_use]
    pub const fn rd(mut self, rd: Reg) -> Self {
        self.rd = rd;
        self
    }

    /// First source register.
    #[must_use]
    pub const fn rs1(mut self, rs1: Reg) -> Self {
        self.rs1 = rs1;
        self
    }

    /// Second source register.
    #[must_use]
    pub const fn rs2(mut self, rs2: Reg) -> Self {
        self.rs2 = rs2;
        self
    }

    /// Both operand values.
    #[must_use]
    pub const fn values(mut self, v1: u32, v2: u32) -> Self {
        self.v1 = Some(v1);
        self.v2 = Some(v2);
        self
    }

    /// Operand values where `None` is drawn at build time.
    #[must_use]
    pub const fn seeds(mut self, v1: Option<u32>, v2: Option<u32>) -> Self {
        self.v1 = v1;
        self.v2 = v2;
        self
    }

    /// Taken-path body of a branch, or instructions before the target / the call.
    #[must_use]
    pub fn fill1(mut self, fill: impl Into<Filler>) -> Self {
        self.fill1 = Some(fill.into());
        self
    }

    /// Not-taken body of a branch, callee or flat body of a jump, or instructions after
    /// the target.
    #[must_use]
    pub fn fill2(mut self, fill: impl Into<Filler>) -> Self {
        self.fill2 = Some(fill.into());
        self
    }

    /// Lay a branch out forward.
    #[must_use]
    pub const fn forward(mut self, forward: bool) -> Self {
        self.forward = forward;
        self
    }

    /// Turn a backward branch into a counted loop.
    #[must_use]
    pub const fn make_loop(mut self, make_loop: bool) -> Self {
        self.make_loop = make_loop;
        self
    }

    /// Validates the request and computes the expected result.
    ///
    /// # Errors
    ///
    /// [`BuildError`] when the register assignment or fillers cannot produce a
    /// self-checking sequence.
    pub fn build(self, opts: &BuildOptions, rng: &mut Rng) -> Result<TestCase, BuildError> {
        let v1 = self.v1.unwrap_or_else(|| rng.next_u32());
        let v2 = self.v2.unwrap_or_else(|| rng.next_u32());
        let m = self.mnemonic;
        if m.is_bare() {
            return Ok(self.bare(v1, v2));
        }
        if self.rd == Reg::SCRATCH {
            return Err(BuildError::ScratchRegister { mnemonic: m, reg: self.rd, role: "destination" });
        }
        match (m.class(), m.mem_width(), m.condition()) {
            (Class::Op | Class::OpImm, ..) => Ok(self.alu(v1, v2)),
            (Class::Load | Class::Store, Some(width), _) => self.memory(width, v1, v2, opts),
            (Class::Upper, ..) => self.upper(v1, v2),
            (Class::Branch, _, Some(cond)) => self.branch(cond, v1, v2, opts),
            (Class::Jump, ..) => self.jump(v1, v2),
            _ => Ok(self.bare(v1, v2)),
        }
    }

    fn encode(&self, rd: Option<Reg>, imm: &Immediate) -> Encoded {
        build(self.mnemonic, Operands::new(rd, Some(self.rs1), Some(self.rs2)), imm)
    }

    fn case(self, v1: u32, v2: u32, instruction: Encoded, layout: Layout, expected: i32) -> TestCase {
        let rs2 = if self.mnemonic.class() == Class::OpImm { Reg::ZERO } else { self.rs2 };
        TestCase {
            mnemonic: self.mnemonic,
            rd: self.rd,
            rs1: self.rs1,
            rs2,
            v1,
            v2,
            out_addr: self.out_addr,
            instruction,
            layout,
            fill1: self.fill1,
            fill2: self.fill2,
            extras: Vec::new(),
            expected: if self.rd.is_zero() { 0 } else { expected },
        }
    }

    fn bare(mut self, v1: u32, v2: u32) -> TestCase {
        self.rd = Reg::ZERO;
        let instruction = self.encode(None, &Immediate::Value(0));
        self.case(v1, v2, instruction, Layout::Bare, 0)
    }

    fn alu(self, v1: u32, v2: u32) -> TestCase {
        let instruction = self.encode(Some(self.rd), &Immediate::Value(i64::from(v2)));
        let imm = if self.mnemonic.class() == Class::OpImm { instruction.text_imm() } else { None };
        let expected = self
            .mnemonic
            .alu_op()
            .map_or(0, |op| model::alu(op, self.rs1, self.rs2, v1, v2, imm));
        self.case(v1, v2, instruction, Layout::Alu, expected)
    }

    fn memory(
        self,
        width: MemWidth,
        v1: u32,
        v2: u32,
        opts: &BuildOptions,
    ) -> Result<TestCase, BuildError> {
        let m = self.mnemonic;
        if self.rs1.is_zero() {
            return Err(BuildError::ZeroBase { mnemonic: m });
        }
        if self.rs1 == self.rs2 {
            return Err(BuildError::BaseAliasesData { mnemonic: m, reg: self.rs1 });
        }
        let access = MemAccess::new(v1, opts.data_region, width);
        let (_, offset) = split_upper(access.addr);
        let instruction = self.encode(Some(self.rd), &Immediate::Value(offset));
        let data = if self.rs2.is_zero() { 0 } else { v2 };
        let (expected, layout) = if m.class() == Class::Load {
            (access.load(m, data, opts.endianness), Layout::Load(access))
        } else {
            (access.store(data, opts.endianness), Layout::Store(access))
        };
        Ok(self.case(access.addr, v2, instruction, layout, expected))
    }

    fn upper(self, v1: u32, v2: u32) -> Result<TestCase, BuildError> {
        let link = if self.mnemonic == Mnemonic::Auipc {
            if self.rs1.is_zero() || self.rs1 == self.rd {
                return Err(BuildError::LinkRegister { mnemonic: self.mnemonic, reg: self.rs1 });
            }
            Some(self.rs1)
        } else {
            None
        };
        let instruction = self.encode(Some(self.rd), &Immediate::Value(i64::from(v2)));
        let expected = instruction.signals.imm.unwrap_or(0) as i32;
        Ok(self.case(v1, v2, instruction, Layout::Upper { link }, expected))
    }

    fn nested<'a>(&self, fill: Option<&'a Filler>, slot: &'static str) -> Result<&'a TestCase, BuildError> {
        let m = self.mnemonic;
        let fill = fill.ok_or(BuildError::MissingFiller { mnemonic: m, slot })?;
        let case = fill.case().ok_or(BuildError::FlatBranchFiller { mnemonic: m })?;
        if !case.is_inlinable() {
            return Err(BuildError::NotInlinable { mnemonic: case.mnemonic, addr: case.out_addr });
        }
        Ok(case)
    }

    fn branch(
        self,
        cond: BranchCond,
        v1: u32,
        v2: u32,
        opts: &BuildOptions,
    ) -> Result<TestCase, BuildError> {
        let m = self.mnemonic;
        let taken = self.nested(self.fill1.as_ref(), "taken")?;
        let not_taken = self.nested(self.fill2.as_ref(), "not-taken")?;
        for fill in [taken, not_taken] {
            if fill.rd != self.rd {
                return Err(BuildError::FillerDestination { mnemonic: m, expected: self.rd, found: fill.rd });
            }
            let clobbers = fill.clobbers();
            if let Some(&reg) = [self.rs1, self.rs2].iter().find(|r| !r.is_zero() && clobbers.contains(r)) {
                return Err(BuildError::FillerClobbers { mnemonic: m, reg });
            }
        }
        if self.forward && self.make_loop {
            return Err(BuildError::ForwardLoop { mnemonic: m });
        }
        let (e1, e2) = (taken.expected, not_taken.expected);
        let (a, b) = model::operands(self.rs1, self.rs2, v1, v2);

        let (counter, trips, expected) = if self.make_loop {
            let counter = model::loop_counter(m, self.rs1, self.rs2, a, b);
            let trips = model::loop_trips(cond, (self.rs1, self.rs2), (a, b), counter, opts.max_loop_trips)
                .ok_or(BuildError::LoopDiverges { mnemonic: m, bound: opts.max_loop_trips })?;
            (Some(counter), Some(trips), e2)
        } else {
            (None, None, if cond.holds(a, b) { e1 } else { e2 })
        };

        let instruction = self.encode(None, &Immediate::Label(Label::taken(self.out_addr)));
        let layout = Layout::Branch { forward: self.forward, counter, trips };
        Ok(self.case(v1, v2, instruction, layout, expected))
    }

    fn jump(self, v1: u32, v2: u32) -> Result<TestCase, BuildError> {
        let m = self.mnemonic;
        if self.rd != Reg::RA {
            return Err(BuildError::JumpDestination { mnemonic: m, found: self.rd });
        }
        let link = if self.rs2.is_zero() { self.rs1 } else { self.rs2 };
        if link.is_zero() || link == Reg::RA {
            return Err(BuildError::LinkRegister { mnemonic: m, reg: link });
        }
        let target = match &self.fill2 {
            None => return Err(BuildError::MissingFiller { mnemonic: m, slot: "callee" }),
            Some(Filler::Flat(_)) => Label::past(self.out_addr),
            Some(Filler::Nested(callee)) => {
                if !callee.is_inlinable() {
                    return Err(BuildError::NotInlinable { mnemonic: callee.mnemonic, addr: callee.out_addr });
                }
                if callee.clobbers().contains(&Reg::RA) {
                    return Err(BuildError::CalleeClobbersReturn { mnemonic: callee.mnemonic, addr: callee.out_addr });
                }
                Label::entry(callee.out_addr)
            }
        };
        if let Some(case) = self.fill1.as_ref().and_then(Filler::case) {
            if !case.is_inlinable() {
                return Err(BuildError::NotInlinable { mnemonic: case.mnemonic, addr: case.out_addr });
            }
        }
        let instruction = self.encode(Some(self.rd), &Immediate::Label(target));
        Ok(self.case(v1, v2, instruction, Layout::Jump { link }, 0))
    }
}
