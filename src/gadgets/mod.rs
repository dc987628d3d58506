//! Reusable constraint gadgets

pub mod is_zero;
pub mod poseidon;

pub use is_zero::{is_equal, is_zero};
