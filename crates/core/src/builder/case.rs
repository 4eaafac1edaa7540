//! Test cases.
//!
//! A [`TestCase`] is one instruction under test together with the operand values its setup
//! writes, the output address its result is captured to and, for branches and jumps, the
//! nested cases that form its bodies. Cases are immutable once built; appending trailing
//! instructions produces a new case.

use std::collections::BTreeSet;
use std::rc::Rc;

use super::model::MemAccess;
use crate::common::{BuildError, Reg};
use crate::isa::{Class, Encoded, Mnemonic};
use crate::program::Line;

/// Body of a branch path or a jump target.
#[derive(Clone, Debug)]
pub enum Filler {
    /// Plain instructions with no known result.
    Flat(Vec<Line>),
    /// A test case rendered without its capture sequence.
    Nested(Rc<TestCase>),
}

impl Filler {
    /// Lines this filler contributes when inlined.
    pub fn lines(&self) -> Vec<Line> {
        match self {
            Self::Flat(lines) => lines.clone(),
            Self::Nested(case) => case.render(false),
        }
    }

    /// Nested case, if any.
    pub fn case(&self) -> Option<&TestCase> {
        match self {
            Self::Flat(_) => None,
            Self::Nested(case) => Some(case),
        }
    }

    pub(super) fn clobbers(&self) -> BTreeSet<Reg> {
        self.case().map(TestCase::clobbers).unwrap_or_default()
    }
}

impl From<TestCase> for Filler {
    fn from(case: TestCase) -> Self {
        Self::Nested(Rc::new(case))
    }
}

impl From<Rc<TestCase>> for Filler {
    fn from(case: Rc<TestCase>) -> Self {
        Self::Nested(case)
    }
}

/// How a case is laid out when rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Layout {
    /// `nop`, `fence`, `ecall`, `ebreak`.
    Bare,
    /// Register-register and register-immediate arithmetic.
    Alu,
    /// Load from a pre-written word.
    Load(MemAccess),
    /// Store into a zeroed word, read back with `lw`.
    Store(MemAccess),
    /// `lui`, or `auipc` corrected by the anchor address held in `link`.
    Upper { link: Option<Reg> },
    /// Conditional branch over two nested bodies.
    Branch { forward: bool, counter: Option<Reg>, trips: Option<u32> },
    /// Call to a callee or over a flat body, corrected by the return address held in `link`.
    Jump { link: Reg },
}

/// One instruction under test.
#[derive(Clone, Debug)]
pub struct TestCase {
    pub(super) mnemonic: Mnemonic,
    pub(super) rd: Reg,
    pub(super) rs1: Reg,
    pub(super) rs2: Reg,
    pub(super) v1: u32,
    pub(super) v2: u32,
    pub(super) out_addr: u32,
    pub(super) instruction: Encoded,
    pub(super) layout: Layout,
    pub(super) fill1: Option<Filler>,
    pub(super) fill2: Option<Filler>,
    pub(super) extras: Vec<Encoded>,
    pub(super) expected: i32,
}

impl TestCase {
    /// Mnemonic under test.
    pub const fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    /// Destination register.
    pub const fn rd(&self) -> Reg {
        self.rd
    }

    /// First source register.
    pub const fn rs1(&self) -> Reg {
        self.rs1
    }

    /// Second source register.
    pub const fn rs2(&self) -> Reg {
        self.rs2
    }

    /// Value written to `rs1` (effective address for memory cases).
    pub const fn v1(&self) -> u32 {
        self.v1
    }

    /// Value written to `rs2`, or the immediate seed.
    pub const fn v2(&self) -> u32 {
        self.v2
    }

    /// Address the result is captured to.
    pub const fn out_addr(&self) -> u32 {
        self.out_addr
    }

    /// Expected signed result at [`Self::out_addr`].
    pub const fn expected(&self) -> i32 {
        self.expected
    }

    /// Encoded instruction under test.
    pub const fn instruction(&self) -> &Encoded {
        &self.instruction
    }

    /// Instructions appended after the instruction under test.
    pub fn extras(&self) -> &[Encoded] {
        &self.extras
    }

    /// Trip count of a loop branch.
    pub const fn loop_trips(&self) -> Option<u32> {
        match self.layout {
            Layout::Branch { trips, .. } => trips,
            _ => None,
        }
    }

    /// True for branch cases laid out forward.
    pub const fn is_forward(&self) -> bool {
        matches!(self.layout, Layout::Branch { forward: true, .. })
    }

    /// True when the rendering defines no labels and can be inlined anywhere.
    pub const fn is_inlinable(&self) -> bool {
        matches!(
            self.layout,
            Layout::Bare | Layout::Alu | Layout::Load(_) | Layout::Store(_) | Layout::Upper { link: None }
        )
    }

    /// Cases that must be rendered, callable, before this one.
    pub fn callees(&self) -> Vec<&Self> {
        match (&self.layout, &self.fill2) {
            (Layout::Jump { .. }, Some(Filler::Nested(callee))) => vec![callee.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Registers written by the case's rendering without capture.
    pub fn clobbers(&self) -> BTreeSet<Reg> {
        let mut set = BTreeSet::new();
        match self.layout {
            Layout::Bare => {}
            Layout::Alu => {
                if self.mnemonic.class() == Class::Op {
                    let _ = set.insert(self.rs2);
                }
                set.extend([self.rs1, self.rd]);
            }
            Layout::Load(_) | Layout::Store(_) => {
                set.extend([Reg::SCRATCH, self.rs2, self.rs1, self.rd]);
            }
            Layout::Upper { link } => {
                let _ = set.insert(self.rd);
                set.extend(link);
            }
            Layout::Branch { .. } => {
                set.extend([self.rs1, self.rs2]);
                for fill in [&self.fill1, &self.fill2].into_iter().flatten() {
                    set.extend(fill.clobbers());
                }
            }
            Layout::Jump { link } => {
                set.extend([Reg::RA, link]);
                for fill in [&self.fill1, &self.fill2].into_iter().flatten() {
                    set.extend(fill.clobbers());
                }
            }
        }
        set.extend(self.extras.iter().filter_map(|e| e.signals.regs.rd));
        let _ = set.remove(&Reg::ZERO);
        set
    }

    /// Returns this case with `extras` appended after the instruction under test.
    ///
    /// # Errors
    ///
    /// [`BuildError::FillerClobbers`] when an extra writes the destination register, which
    /// would change the captured result.
    pub fn with_extra(mut self, extras: impl IntoIterator<Item = Encoded>) -> Result<Self, BuildError> {
        for extra in extras {
            if extra.signals.regs.rd == Some(self.rd) && !self.rd.is_zero() {
                return Err(BuildError::FillerClobbers { mnemonic: extra.mnemonic, reg: self.rd });
            }
            self.extras.push(extra);
        }
        Ok(self)
    }
}
