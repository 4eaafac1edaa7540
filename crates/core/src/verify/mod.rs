//! Trace verification.
//!
//! This module checks simulator output against the model. It provides:
//! 1. **Grammar:** Strict record classification of every trace line.
//! 2. **Decode Pass:** Field-by-field comparison of decoder records, skipping don't-cares.
//! 3. **Core Pass:** Result lookup by output address.
//!
//! Both comparisons stop at the first counterexample.

/// Core-pass comparison.
pub mod core;

/// Decode-pass comparison.
pub mod decode;

/// Trace line grammar.
pub mod trace;

pub use trace::{CoreRecord, DecodeRecord, Field};
