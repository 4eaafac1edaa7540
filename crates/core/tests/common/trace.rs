//! Traces a correct design would print.
//!
//! Both renderers surround the records with simulator chatter so every test that uses them
//! also exercises the ignorable-line rules.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rvtest_core::isa::Encoded;

const BANNER: &str = "# Loading work.tb\n# ** Note: simulation started\n";
const FOOTER: &str = "# ** Note: $finish    : tb.sv(42)\n#    Time: 1200 ns  Iteration: 0\n";

/// One decode record for `enc`, with don't-care fields printed as `x`.
pub fn decode_record(enc: &Encoded) -> String {
    let mut line = format!("# {:08x}", enc.word.unwrap_or(0));
    for value in enc.signals.values() {
        let _ = match value {
            Some(v) => write!(line, " {v}"),
            None => write!(line, " x"),
        };
    }
    line
}

/// Decoder trace reporting exactly the expected signals of `encoded`.
pub fn decode_trace(encoded: &[Encoded]) -> String {
    let mut out = String::from(BANNER);
    for enc in encoded {
        out.push_str(&decode_record(enc));
        out.push('\n');
    }
    out.push_str(FOOTER);
    out
}

/// Core trace storing every expected value once, in address order.
pub fn core_trace(expected: &BTreeMap<u32, i32>) -> String {
    let mut out = String::from(BANNER);
    for (addr, value) in expected {
        let _ = writeln!(out, "# {addr} {value}");
    }
    out.push_str(FOOTER);
    out
}
