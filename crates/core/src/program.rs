//! Program listings.
//!
//! This module turns rendered test cases into one linear assembly program. It provides:
//! 1. **Labels & Lines:** Instruction text with inline label definitions and a tracked target.
//! 2. **Dedup Cache:** [`ProgramBuilder`] renders each output address at most once, however many
//!    parents reference it, and keeps the span of the rendering for reuse.
//! 3. **Consistency:** Every referenced label must be defined exactly once.
//! 4. **Sources:** Symmetric no-op padding around the body for both passes.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::builder::TestCase;
use crate::common::ProgramError;
use crate::isa::Encoded;

/// Line-local assembly label, displayed with its leading dot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    /// Creates a label from its name without the dot.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Entry of the case at `addr`.
    pub fn entry(addr: u32) -> Self {
        Self(format!("l{addr}"))
    }

    /// Result capture (end) of the case at `addr`.
    pub fn end(addr: u32) -> Self {
        Self(format!("l{addr}_end"))
    }

    /// Branch-taken body of the case at `addr`.
    pub fn taken(addr: u32) -> Self {
        Self(format!("b{addr}"))
    }

    /// Condition check of a backward branch at `addr`.
    pub fn check(addr: u32) -> Self {
        Self(format!("c{addr}"))
    }

    /// Return point of the jump at `addr`.
    pub fn link(addr: u32) -> Self {
        Self(format!("j{addr}"))
    }

    /// Landing point past a flat jump body at `addr`.
    pub fn past(addr: u32) -> Self {
        Self(format!("j{addr}_past"))
    }

    /// `auipc` anchor of the case at `addr`.
    pub fn upper(addr: u32) -> Self {
        Self(format!("u{addr}"))
    }

    /// Fall-through guard around the callee block at `addr`.
    pub fn skip(addr: u32) -> Self {
        Self(format!("l{addr}_skip"))
    }

    /// Label name without the dot.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.0)
    }
}

/// One assembly line with the labels defined on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    labels: Vec<Label>,
    text: String,
    target: Option<Label>,
}

impl Line {
    /// Plain instruction text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { labels: Vec::new(), text: text.into(), target: None }
    }

    /// Instruction that refers to `target`.
    pub fn to(text: impl Into<String>, target: Label) -> Self {
        Self { labels: Vec::new(), text: text.into(), target: Some(target) }
    }

    /// Defines `label` on this line, before any labels already present.
    #[must_use]
    pub fn labelled(mut self, label: Label) -> Self {
        self.labels.insert(0, label);
        self
    }

    /// Labels defined on this line.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Instruction text without labels.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Label this line refers to.
    pub const fn target(&self) -> Option<&Label> {
        self.target.as_ref()
    }
}

impl From<Encoded> for Line {
    fn from(enc: Encoded) -> Self {
        Self { labels: Vec::new(), text: enc.text, target: enc.target }
    }
}

impl From<&Encoded> for Line {
    fn from(enc: &Encoded) -> Self {
        Self { labels: Vec::new(), text: enc.text.clone(), target: enc.target.clone() }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{label}: ")?;
        }
        f.write_str(&self.text)
    }
}

/// Defines `label` on the first line of `lines`, or on a `nop` when empty.
pub fn label_first(lines: &mut Vec<Line>, label: Label) {
    if lines.is_empty() {
        lines.push(Line::new("nop"));
    }
    if let Some(first) = lines.first_mut() {
        let line = std::mem::replace(first, Line::new(String::new()));
        *first = line.labelled(label);
    }
}

fn write_source(out: &mut String, lines: impl Iterator<Item = String>, padding: usize) {
    out.push_str(".section .text\n.globl _start\n_start:\n");
    for _ in 0..padding {
        out.push_str("nop\n");
    }
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    for _ in 0..padding {
        out.push_str("nop\n");
    }
}

/// Where an address was rendered inside the builder's listing.
#[derive(Clone, Copy, Debug)]
struct Span {
    start: usize,
    len: usize,
    callable: bool,
}

/// Incremental program builder with an address-keyed dedup cache.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    lines: Vec<Line>,
    expected: BTreeMap<u32, i32>,
    sequenced: HashMap<u32, Span>,
}

impl ProgramBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `case`, preceded by any callee it needs that is not yet rendered.
    ///
    /// # Returns
    ///
    /// `false` when the case's address was already rendered and nothing was appended.
    ///
    /// # Errors
    ///
    /// [`ProgramError::ConflictingExpected`] when the address was rendered with a different
    /// expected value, [`ProgramError::NotCallable`] when a callee was rendered inline before.
    pub fn push(&mut self, case: &TestCase) -> Result<bool, ProgramError> {
        for callee in case.callees() {
            let _ = self.push_callee(callee)?;
        }
        if self.sequenced.contains_key(&case.out_addr()) {
            self.check_expected(case)?;
            return Ok(false);
        }
        self.append(case, case.render(true), false);
        Ok(true)
    }

    /// Appends `case` as a subroutine unless it is already rendered callable.
    ///
    /// # Returns
    ///
    /// `false` when the callee was already rendered and nothing was appended.
    ///
    /// # Errors
    ///
    /// [`ProgramError::NotCallable`] when the address was rendered inline,
    /// [`ProgramError::ConflictingExpected`] when it was rendered with another result.
    pub fn push_callee(&mut self, case: &TestCase) -> Result<bool, ProgramError> {
        match self.sequenced.get(&case.out_addr()) {
            Some(span) if !span.callable => Err(ProgramError::NotCallable(case.out_addr())),
            Some(_) => self.check_expected(case).map(|()| false),
            None => {
                self.append(case, case.callee_block(), true);
                Ok(true)
            }
        }
    }

    fn check_expected(&self, case: &TestCase) -> Result<(), ProgramError> {
        match self.expected.get(&case.out_addr()) {
            Some(&first) if first != case.expected() => Err(ProgramError::ConflictingExpected {
                addr: case.out_addr(),
                first,
                second: case.expected(),
            }),
            _ => Ok(()),
        }
    }

    fn append(&mut self, case: &TestCase, lines: Vec<Line>, callable: bool) {
        let span = Span { start: self.lines.len(), len: lines.len(), callable };
        self.lines.extend(lines);
        let _ = self.expected.insert(case.out_addr(), case.expected());
        let _ = self.sequenced.insert(case.out_addr(), span);
    }

    /// Lines rendered for `addr`, if it has been sequenced.
    pub fn rendered(&self, addr: u32) -> Option<&[Line]> {
        let span = self.sequenced.get(&addr)?;
        self.lines.get(span.start..span.start + span.len)
    }

    /// Number of lines appended so far.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Checks label consistency and returns the finished program.
    ///
    /// # Errors
    ///
    /// [`ProgramError::DuplicateLabel`] or [`ProgramError::UndefinedLabel`].
    pub fn finish(self) -> Result<Program, ProgramError> {
        let mut defined = HashSet::new();
        for label in self.lines.iter().flat_map(Line::labels) {
            if !defined.insert(label) {
                return Err(ProgramError::DuplicateLabel(label.name().to_string()));
            }
        }
        if let Some(missing) =
            self.lines.iter().filter_map(Line::target).find(|t| !defined.contains(t))
        {
            return Err(ProgramError::UndefinedLabel(missing.name().to_string()));
        }
        Ok(Program { lines: self.lines, expected: self.expected })
    }
}

/// Core-pass program: a listing plus the expected result at every output address.
#[derive(Debug, Clone)]
pub struct Program {
    lines: Vec<Line>,
    expected: BTreeMap<u32, i32>,
}

impl Program {
    /// Body lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Expected result per output address.
    pub const fn expected(&self) -> &BTreeMap<u32, i32> {
        &self.expected
    }

    /// Full assembly source with `padding` no-ops on each side of the body.
    pub fn source(&self, padding: usize) -> String {
        let mut out = String::new();
        write_source(&mut out, self.lines.iter().map(ToString::to_string), padding);
        out
    }
}

/// Decode-pass program: encoded instructions in emission order.
#[derive(Debug, Clone, Default)]
pub struct DecodeProgram {
    encoded: Vec<Encoded>,
}

impl DecodeProgram {
    /// Creates a program from encoded instructions.
    pub const fn new(encoded: Vec<Encoded>) -> Self {
        Self { encoded }
    }

    /// Encoded instructions in emission order.
    pub fn encoded(&self) -> &[Encoded] {
        &self.encoded
    }

    /// Body lines only, one instruction per line.
    pub fn body(&self) -> String {
        let mut out = String::new();
        for enc in &self.encoded {
            out.push_str(&enc.text);
            out.push('\n');
        }
        out
    }

    /// Full assembly source with `padding` no-ops on each side of the body.
    pub fn source(&self, padding: usize) -> String {
        let mut out = String::new();
        write_source(&mut out, self.encoded.iter().map(|e| e.text.clone()), padding);
        out
    }
}
