//! Matrix Enumeration Tests.
//!
//! Builds both programs from a reduced probe configuration and checks their size,
//! reproducibility and the structural guarantees the sequencer gives the core listing.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use rvtest_core::isa::Mnemonic;
use rvtest_core::program::{Label, Program};
use rvtest_core::suite::Suite;

use crate::common::builder::small_config;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn suite() -> Suite {
    Suite::new(small_config(std::env::temp_dir().as_path()))
}

/// Line index of every entry label `.lN`.
fn entries(program: &Program) -> HashMap<Label, usize> {
    let mut defined = HashMap::new();
    for (i, line) in program.lines().iter().enumerate() {
        for label in line.labels() {
            let _ = defined.insert(label.clone(), i);
        }
    }
    defined.retain(|label, _| {
        let name = label.name();
        name.len() > 1 && name.starts_with('l') && name[1..].bytes().all(|b| b.is_ascii_digit())
    });
    defined
}

// ═════════════════════════════════════════════════════════════════════════════
//  Decode matrix
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn decode_matrix_covers_full_product() {
    let mut suite = suite();
    let probes = &suite.config().probes;
    let per_mnemonic = probes.values.len() * probes.registers.len().pow(3);
    let program = suite.decode_program();
    assert_eq!(program.encoded().len(), Mnemonic::ALL.len() * per_mnemonic);
    assert_eq!(program.encoded().len(), Mnemonic::ALL.len() * 2 * 27);
}

#[test]
fn decode_matrix_groups_by_mnemonic() {
    let mut suite = suite();
    let program = suite.decode_program();
    let first = Mnemonic::ALL[0];
    assert!(program.encoded()[..54].iter().all(|e| e.mnemonic == first));
    assert!(program.encoded()[54].mnemonic != first);
}

#[test]
fn fixed_seeds_decode_identically_across_seeds() {
    let mut a = suite();
    let mut config = a.config().clone();
    config.general.seed ^= 1;
    let mut b = Suite::new(config);
    assert_eq!(a.decode_program().body(), b.decode_program().body());
}

// ═════════════════════════════════════════════════════════════════════════════
//  Core matrix
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn core_program_is_reproducible() {
    let first = suite().core_program().expect("consistent").source(1);
    let second = suite().core_program().expect("consistent").source(1);
    assert_eq!(first, second);
}

#[test]
fn seed_changes_core_program() {
    let mut config = suite().config().clone();
    config.general.seed ^= 1;
    let first = suite().core_program().expect("consistent").source(1);
    let other = Suite::new(config).core_program().expect("consistent").source(1);
    assert_ne!(first, other);
}

#[test]
fn core_outputs_are_word_aligned() {
    let program = suite().core_program().expect("consistent");
    assert!(!program.expected().is_empty());
    assert!(program.expected().keys().all(|addr| addr % 4 == 0 && *addr > 0));
}

#[test]
fn every_mnemonic_reaches_the_core_listing() {
    let program = suite().core_program().expect("consistent");
    let source = program.source(0);
    for m in Mnemonic::ALL {
        let name = m.to_string();
        let used = source.lines().any(|l| {
            let text = l.rsplit(": ").next().unwrap_or(l);
            text == name || text.starts_with(&format!("{name} "))
        });
        assert!(used, "{name} never emitted");
    }
}

#[test]
fn callees_precede_their_call_sites() {
    let program = suite().core_program().expect("consistent");
    let defined = entries(&program);
    let mut calls = 0;
    for (i, line) in program.lines().iter().enumerate() {
        let Some(&at) = line.target().and_then(|t| defined.get(t)) else { continue };
        if line.text().starts_with("jal ") || line.text().starts_with("la ") {
            calls += 1;
            assert!(at < i, "{} placed after its call at line {i}", line.text());
        }
    }
    assert!(calls > 0);
}

#[test]
fn core_pass_under_default_config_builds() {
    let mut config = rvtest_core::config::Config::default();
    config.probes.values.truncate(2);
    let program = Suite::new(config).core_program().expect("consistent");
    assert!(program.expected().len() > 1000);

    // Every line is at most two words (`la`), and `jal` reaches 1 MiB either way.
    let defined = entries(&program);
    let mut jals = 0;
    for (i, line) in program.lines().iter().enumerate() {
        if !line.text().starts_with("jal ") {
            continue;
        }
        if let Some(&at) = line.target().and_then(|t| defined.get(t)) {
            jals += 1;
            assert!(i.abs_diff(at) * 8 < 1 << 20, "jal at line {i} is out of reach of line {at}");
        }
    }
    assert!(jals > 0);
}
