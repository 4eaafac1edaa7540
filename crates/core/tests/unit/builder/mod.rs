/// Validation and expected results of built cases.
pub mod cases;
