//! IUPAC-degenerate motif handling.
//!
//! A [`Motif`] is a named set of definition strings over the 16-code
//! IUPAC alphabet. This crate validates definitions, compiles them to
//! regex patterns (each code expanding to its character class), derives
//! reverse-complement definitions, and ships the built-in preset
//! catalog as a [`MotifRegistry`].

pub mod errors;
pub mod motif;
pub mod presets;

pub use errors::MotifError;
pub use motif::{
    Motif, SUPPORTED_CODES, compile, complement, drill_down, reverse_complement, validate,
};
pub use presets::MotifRegistry;
