/// Decode and core matrix enumeration.
pub mod matrix;
