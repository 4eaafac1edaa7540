//! Test-matrix enumeration.
//!
//! The decode matrix is every mnemonic crossed with the probe seeds and the probe registers
//! for all three slots. The core matrix runs the same product as self-checking cases and
//! adds three groups that need bodies:
//! - branches over the branch registers, as a backward loop and as a forward skip, with
//!   random fillers on both paths, plus short loops whose operands are derived to converge;
//! - jumps, each with a callee block placed at a random point and a call site after it
//!   (within `jal` reach for `jal`, anywhere for `jalr`), plus a variant over a flat body;
//! - filler twins of every leaf case, writing the filler register and padded with random
//!   instructions from the pool of leaf targets.

use std::rc::Rc;

use tracing::{debug, info};

use crate::builder::model::short_loop_operands;
use crate::builder::{BuildOptions, Filler, TestCase, TestCaseBuilder};
use crate::common::constants::WORD_BYTES;
use crate::common::{BuildError, ProgramError, Reg, Rng};
use crate::config::{MemoryConfig, ProbeConfig};
use crate::isa::encoder::{Immediate, build};
use crate::isa::immediate::random_magnitude;
use crate::isa::{Class, Encoded, Mnemonic, Operands};
use crate::program::{DecodeProgram, Program, ProgramBuilder};

/// How many top-level entries a `jal` call site may trail its callee by.
///
/// Entries render to at most a few dozen words, which keeps the displacement well inside
/// the 1 MiB reach of `jal`.
const NEAR_CALL: usize = 1024;

/// Trip counts of the short-loop branch variants.
const SHORT_LOOPS: [u32; 3] = [1, 2, 5];

/// Every `(a, b)` pair of `items`, first component outermost.
fn pairs<T: Copy>(items: &[T]) -> Vec<(T, T)> {
    items.iter().flat_map(|&a| items.iter().map(move |&b| (a, b))).collect()
}

/// Every `(rs1, rs2, rd)` triple of `regs`, `rs1` outermost.
fn triples(regs: &[Reg]) -> Vec<(Reg, Reg, Reg)> {
    pairs(regs).into_iter().flat_map(|(a, b)| regs.iter().map(move |&c| (a, b, c))).collect()
}

fn of_class(class: Class) -> impl Iterator<Item = Mnemonic> {
    Mnemonic::ALL.into_iter().filter(move |m| m.class() == class)
}

/// Builds the decode-pass program.
///
/// Seeds of `None` draw a fresh magnitude from the format's range for every combination.
pub fn decode(probes: &ProbeConfig, rng: &mut Rng) -> DecodeProgram {
    let regs = triples(&probes.registers);
    let mut encoded = Vec::with_capacity(Mnemonic::ALL.len() * probes.values.len() * regs.len());
    for m in Mnemonic::ALL {
        for seed in &probes.values {
            for &(rs1, rs2, rd) in &regs {
                let magnitude = seed.map_or_else(|| random_magnitude(m.format(), rng), i64::from);
                let ops = Operands::new(Some(rd), Some(rs1), Some(rs2));
                encoded.push(build(m, ops, &Immediate::Value(magnitude)));
            }
        }
    }
    info!(instructions = encoded.len(), "decode matrix built");
    DecodeProgram::new(encoded)
}

/// Top-level item of the core listing, in emission order.
#[derive(Debug)]
enum Entry {
    /// A case rendered with its capture.
    Case(Rc<TestCase>),
    /// A callee block placed ahead of its call sites.
    Callee(Rc<TestCase>),
}

/// Core-pass enumerator.
#[derive(Debug)]
pub struct CoreMatrix<'a> {
    probes: &'a ProbeConfig,
    opts: BuildOptions,
    rng: &'a mut Rng,
    out_base: u32,
    allocated: u32,
    entries: Vec<Entry>,
    pool: Vec<Encoded>,
    twins: Vec<TestCase>,
    fillers: Vec<Rc<TestCase>>,
    skipped: usize,
}

impl<'a> CoreMatrix<'a> {
    /// Creates an empty enumerator.
    pub const fn new(probes: &'a ProbeConfig, memory: &MemoryConfig, rng: &'a mut Rng) -> Self {
        Self {
            probes,
            opts: BuildOptions::from_config(memory),
            rng,
            out_base: memory.out_base,
            allocated: 0,
            entries: Vec::new(),
            pool: Vec::new(),
            twins: Vec::new(),
            fillers: Vec::new(),
            skipped: 0,
        }
    }

    /// Enumerates every group and sequences the result.
    ///
    /// # Errors
    ///
    /// [`ProgramError`] when the sequenced listing is inconsistent.
    pub fn build(mut self) -> Result<Program, ProgramError> {
        self.leaves();
        self.pad_fillers();
        self.branches();
        self.short_loops();
        self.jumps();
        info!(
            entries = self.entries.len(),
            fillers = self.fillers.len(),
            skipped = self.skipped,
            "core matrix built"
        );

        let mut program = ProgramBuilder::new();
        for entry in &self.entries {
            let _ = match entry {
                Entry::Case(case) => program.push(case)?,
                Entry::Callee(case) => program.push_callee(case)?,
            };
        }
        program.finish()
    }

    fn next_addr(&mut self) -> u32 {
        self.allocated += 1;
        self.out_base.wrapping_add(WORD_BYTES * self.allocated)
    }

    fn pick_filler(&mut self) -> Option<Rc<TestCase>> {
        self.rng.choose(&self.fillers).cloned()
    }

    fn pick_reg(&mut self, exclude: &[Reg]) -> Option<Reg> {
        let candidates: Vec<Reg> =
            self.probes.registers.iter().copied().filter(|r| !exclude.contains(r)).collect();
        self.rng.choose(&candidates).copied()
    }

    fn skip(&mut self, m: Mnemonic, err: &BuildError) {
        debug!(mnemonic = %m, error = %err, "skipping combination");
        self.skipped += 1;
    }

    fn build_case(&mut self, builder: TestCaseBuilder) -> Option<TestCase> {
        let m = builder.mnemonic();
        match builder.build(&self.opts, self.rng) {
            Ok(case) => Some(case),
            Err(e) => {
                self.skip(m, &e);
                None
            }
        }
    }

    /// Leaf cases over the probe matrix. Bare mnemonics ignore operands and run once.
    fn leaves(&mut self) {
        let regs = triples(&self.probes.registers);
        let values = pairs(&self.probes.values);
        for m in Mnemonic::ALL {
            if matches!(m.class(), Class::Branch | Class::Jump) {
                continue;
            }
            if m.is_bare() {
                let addr = self.next_addr();
                if let Some(case) = self.build_case(TestCaseBuilder::new(m, addr)) {
                    self.pool.push(case.instruction().clone());
                    self.entries.push(Entry::Case(Rc::new(case)));
                }
                continue;
            }
            for &seeds in &values {
                for &slots in &regs {
                    self.leaf(m, seeds, slots);
                }
            }
        }
    }

    fn leaf(&mut self, m: Mnemonic, (s1, s2): (Option<u32>, Option<u32>), (rs1, rs2, rd): (Reg, Reg, Reg)) {
        let Some(rs1) = self.base_register(m, rs1, rs2, rd) else {
            return;
        };
        let addr = self.next_addr();
        let Some(case) = self.build_case(TestCaseBuilder::new(m, addr).rd(rd).rs1(rs1).rs2(rs2).seeds(s1, s2))
        else {
            return;
        };
        if !m.is_memory() && case.instruction().signals.regs.rd.is_none_or(|r| !self.is_reserved(r)) {
            self.pool.push(case.instruction().clone());
        }
        if case.is_inlinable() {
            let addr = self.next_addr();
            let twin = TestCaseBuilder::new(m, addr)
                .rd(self.probes.filler_rd)
                .rs1(rs1)
                .rs2(rs2)
                .values(case.v1(), case.v2());
            if let Some(twin) = self.build_case(twin) {
                self.twins.push(twin);
            }
        }
        self.entries.push(Entry::Case(Rc::new(case)));
    }

    /// Registers a pool instruction must not write: they carry filler results, branch
    /// operands, return addresses or capture addresses.
    fn is_reserved(&self, reg: Reg) -> bool {
        [self.probes.filler_rd, Reg::RA, Reg::SCRATCH].contains(&reg)
            || self.probes.branch_registers.contains(&reg)
    }

    /// Base register for a memory access or `auipc`, re-drawn when the probe one is unusable.
    fn base_register(&mut self, m: Mnemonic, rs1: Reg, rs2: Reg, rd: Reg) -> Option<Reg> {
        if m.is_memory() && (rs1.is_zero() || rs1 == rs2) {
            return self.pick_reg(&[Reg::ZERO, rs2]);
        }
        if m == Mnemonic::Auipc && (rs1.is_zero() || rs1 == rd) {
            return self.pick_reg(&[Reg::ZERO, rd]);
        }
        Some(rs1)
    }

    /// Turns the twins into fillers by appending random pool instructions.
    fn pad_fillers(&mut self) {
        for twin in std::mem::take(&mut self.twins) {
            let m = twin.mnemonic();
            let extras: Vec<Encoded> = (0..self.probes.pool_extras)
                .filter_map(|_| self.rng.choose(&self.pool).cloned())
                .collect();
            match twin.with_extra(extras) {
                Ok(filler) => self.fillers.push(Rc::new(filler)),
                Err(e) => self.skip(m, &e),
            }
        }
    }

    fn branch_case(
        &mut self,
        m: Mnemonic,
        (rs1, rs2): (Reg, Reg),
        (v1, v2): (u32, u32),
        forward: bool,
    ) -> Option<TestCase> {
        let fill1 = self.pick_filler()?;
        let fill2 = self.pick_filler()?;
        let addr = self.next_addr();
        let builder = TestCaseBuilder::new(m, addr)
            .rd(self.probes.filler_rd)
            .rs1(rs1)
            .rs2(rs2)
            .values(v1, v2)
            .fill1(fill1)
            .fill2(fill2)
            .forward(forward)
            .make_loop(!forward);
        self.build_case(builder)
    }

    fn push_branch(&mut self, m: Mnemonic, regs: (Reg, Reg), values: (u32, u32), forward: bool) {
        if let Some(case) = self.branch_case(m, regs, values, forward) {
            self.entries.push(Entry::Case(Rc::new(case)));
        }
    }

    /// Probe-value branches, once as a backward loop and once as a forward skip.
    fn branches(&mut self) {
        let regs = pairs(&self.probes.branch_registers);
        let values = pairs(&self.probes.values);
        for m in of_class(Class::Branch) {
            for &(s1, s2) in &values {
                for &slots in &regs {
                    let v1 = s1.unwrap_or_else(|| self.rng.next_u32());
                    let v2 = s2.unwrap_or_else(|| self.rng.next_u32());
                    self.push_branch(m, slots, (v1, v2), false);
                    self.push_branch(m, slots, (v1, v2), true);
                }
            }
        }
    }

    /// Loops with operands derived so the body runs exactly `k` times.
    fn short_loops(&mut self) {
        let regs: Vec<(Reg, Reg)> =
            pairs(&self.probes.branch_registers).into_iter().filter(|(a, b)| a != b).collect();
        let bound = self.opts.max_loop_trips;
        for m in of_class(Class::Branch) {
            for &slots in &regs {
                for k in SHORT_LOOPS.into_iter().filter(|&k| k <= bound) {
                    let values = short_loop_operands(m, self.rng.next_u32(), k);
                    self.push_branch(m, slots, values, false);
                }
            }
        }
    }

    /// Call sites with randomly placed callees, plus calls over flat bodies.
    fn jumps(&mut self) {
        let mut link_regs: Vec<Reg> = self
            .probes
            .registers
            .iter()
            .chain(&self.probes.branch_registers)
            .copied()
            .filter(|r| !r.is_zero())
            .collect();
        link_regs.sort_unstable();
        link_regs.dedup();

        for m in of_class(Class::Jump) {
            for (rs1, rs2) in pairs(&link_regs) {
                let (Some(fill1), Some(callee)) = (self.pick_filler(), self.pick_filler()) else {
                    continue;
                };
                let jump = |addr| {
                    TestCaseBuilder::new(m, addr).rd(Reg::RA).rs1(rs1).rs2(rs2).fill1(Rc::clone(&fill1))
                };

                let addr = self.next_addr();
                if let Some(case) = self.build_case(jump(addr).fill2(Rc::clone(&callee))) {
                    self.place_call(m, Rc::clone(&callee), case);
                }

                let addr = self.next_addr();
                let flat = Filler::Flat(callee.render(false));
                if let Some(case) = self.build_case(jump(addr).fill2(flat)) {
                    self.entries.push(Entry::Case(Rc::new(case)));
                }
            }
        }
    }

    /// Index of the entry placing the callee at `addr`, if any.
    fn callee_at(&self, addr: u32) -> Option<usize> {
        self.entries.iter().position(|e| matches!(e, Entry::Callee(c) if c.out_addr() == addr))
    }

    /// Inserts `callee` at a random point and `call` somewhere after it.
    ///
    /// A callee placed by an earlier jump renders where it was first placed, so the call
    /// site is measured from that entry.
    fn place_call(&mut self, m: Mnemonic, callee: Rc<TestCase>, call: TestCase) {
        let at = self.callee_at(callee.out_addr()).unwrap_or_else(|| {
            let at = self.rng.below(self.entries.len() + 1);
            self.entries.insert(at, Entry::Callee(callee));
            at
        });
        let after = self.entries.len() - at;
        let reach = if m == Mnemonic::Jal { after.min(NEAR_CALL) } else { after };
        let site = at + 1 + self.rng.below(reach);
        self.entries.insert(site, Entry::Case(Rc::new(call)));
    }
}
