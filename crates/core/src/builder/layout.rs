//! Rendering of test cases into linear instruction sequences.
//!
//! Let A be the case's output address. Rendered with capture, every case starts with `.lA`
//! and its tail (trailing extras, then the store of `rd` to A) starts with `.lA_end`.
//!
//! - Leaf: `[zero word] [li32 rs2] [setup store] lui rs1 [addi rs1] fill1 target fill2
//!   [reload word] tail`
//! - Backward branch: `setup; beq x0,x0,.cA; .bA: fill1; (addi ctr | beq x0,x0,.lA_end);
//!   .cA: branch .bA; fill2; tail`
//! - Forward branch: `setup; branch .bA; fill2; beq x0,x0,.lA_end; .bA: fill1; tail`
//! - Jump: `fill1; <jal ra | la s + jalr ra,s,0> to <callee or .jA_past>; [.jA: flat body];
//!   la s,.jA; sub ra,ra,s; tail`

use super::case::{Filler, Layout, TestCase};
use super::setup;
use crate::common::Reg;
use crate::isa::Class;
use crate::isa::immediate::split_upper;
use crate::isa::encoder::emit;
use crate::isa::Mnemonic;
use crate::program::{Label, Line, label_first};

fn fill_lines(fill: Option<&Filler>) -> Vec<Line> {
    fill.map(Filler::lines).unwrap_or_default()
}

impl TestCase {
    /// Renders the case.
    ///
    /// # Arguments
    ///
    /// * `store_out` - Emit the entry label and the result capture. Without it the rendering
    ///   is a body to inline into a parent.
    pub fn render(&self, store_out: bool) -> Vec<Line> {
        let body = match &self.layout {
            Layout::Bare => vec![Line::from(&self.instruction)],
            Layout::Alu => self.render_alu(),
            Layout::Load(access) => {
                let mut lines = setup::mem_access(Mnemonic::Sw, Reg::ZERO, access.word_addr(), Reg::SCRATCH);
                lines.extend(self.load_rs2());
                lines.extend(setup::mem_access(Mnemonic::Sw, self.rs2, access.word_addr(), self.rs1));
                lines.push(setup::upper(self.rs1, self.v1));
                self.around_target(&mut lines);
                lines
            }
            Layout::Store(access) => {
                let mut lines = setup::mem_access(Mnemonic::Sw, Reg::ZERO, access.word_addr(), Reg::SCRATCH);
                lines.extend(self.load_rs2());
                lines.push(setup::upper(self.rs1, self.v1));
                self.around_target(&mut lines);
                lines.extend(setup::mem_access(Mnemonic::Lw, self.rd, access.word_addr(), self.rs1));
                lines
            }
            Layout::Upper { link: None } => vec![Line::from(&self.instruction)],
            Layout::Upper { link: Some(link) } => {
                let anchor = Label::upper(self.out_addr);
                vec![
                    Line::from(&self.instruction).labelled(anchor.clone()),
                    setup::load_address(*link, anchor),
                    setup::subtract_link(self.rd, *link),
                ]
            }
            Layout::Branch { forward, counter, .. } => self.render_branch(*forward, *counter),
            Layout::Jump { link } => self.render_jump(*link),
        };
        self.finish(body, store_out)
    }

    /// Renders the case as a subroutine guarded against fall-through.
    ///
    /// `beq x0,x0,.lA_skip; <case with capture>; ret; .lA_skip: nop`
    pub fn callee_block(&self) -> Vec<Line> {
        let skip = Label::skip(self.out_addr);
        let mut lines = vec![setup::jump_to(skip.clone())];
        lines.extend(self.render(true));
        lines.push(setup::ret());
        lines.push(Line::new("nop").labelled(skip));
        lines
    }

    fn load_rs2(&self) -> Vec<Line> {
        if self.rs2.is_zero() { Vec::new() } else { setup::li32(self.rs2, self.v2) }
    }

    fn around_target(&self, lines: &mut Vec<Line>) {
        lines.extend(fill_lines(self.fill1.as_ref()));
        lines.push(Line::from(&self.instruction));
        lines.extend(fill_lines(self.fill2.as_ref()));
    }

    fn render_alu(&self) -> Vec<Line> {
        let mut lines = if self.mnemonic.class() == Class::Op { self.load_rs2() } else { Vec::new() };
        let (ui, offset) = split_upper(self.v1);
        lines.push(emit(Mnemonic::Lui, Some(self.rs1), None, None, ui).into());
        lines.push(emit(Mnemonic::Addi, Some(self.rs1), Some(self.rs1), None, offset).into());
        self.around_target(&mut lines);
        lines
    }

    fn render_branch(&self, forward: bool, counter: Option<Reg>) -> Vec<Line> {
        let a = self.out_addr;
        let mut lines = self.load_rs2();
        if !self.rs1.is_zero() {
            lines.extend(setup::li32(self.rs1, self.v1));
        }
        let mut taken = fill_lines(self.fill1.as_ref());
        label_first(&mut taken, Label::taken(a));
        let not_taken = fill_lines(self.fill2.as_ref());

        if forward {
            lines.push(Line::from(&self.instruction));
            lines.extend(not_taken);
            lines.push(setup::jump_to(Label::end(a)));
            lines.extend(taken);
        } else {
            lines.push(setup::jump_to(Label::check(a)));
            lines.extend(taken);
            lines.push(counter.map_or_else(|| setup::jump_to(Label::end(a)), setup::increment));
            lines.push(Line::from(&self.instruction).labelled(Label::check(a)));
            lines.extend(not_taken);
        }
        lines
    }

    fn render_jump(&self, link: Reg) -> Vec<Line> {
        let a = self.out_addr;
        let mut lines = fill_lines(self.fill1.as_ref());
        let mut fix = setup::load_address(link, Label::link(a));
        match &self.fill2 {
            Some(Filler::Nested(callee)) => {
                lines.extend(setup::link_to(self.mnemonic, link, Label::entry(callee.out_addr)));
                fix = fix.labelled(Label::link(a));
            }
            Some(Filler::Flat(body)) => {
                lines.extend(setup::link_to(self.mnemonic, link, Label::past(a)));
                fix = fix.labelled(Label::past(a));
                if body.is_empty() {
                    fix = fix.labelled(Label::link(a));
                } else {
                    let mut body = body.clone();
                    label_first(&mut body, Label::link(a));
                    lines.extend(body);
                }
            }
            None => {}
        }
        lines.push(fix);
        lines.push(setup::subtract_link(self.rd, link));
        lines
    }

    fn finish(&self, mut body: Vec<Line>, store_out: bool) -> Vec<Line> {
        let a = self.out_addr;
        let mut tail: Vec<Line> = self.extras.iter().map(Line::from).collect();
        if store_out {
            tail.extend(setup::capture(self.rd, a));
        }
        if store_out || matches!(self.layout, Layout::Branch { .. }) {
            label_first(&mut tail, Label::end(a));
        }
        body.extend(tail);
        if store_out {
            label_first(&mut body, Label::entry(a));
        }
        body
    }
}
