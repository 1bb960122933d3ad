#![forbid(unsafe_code)]

//! Color ramps for keyheat.
//!
//! This crate provides:
//! - [`Gradient`], an ordered list of [`GradientStop`]s sampled by percentage
//! - The textual stop format hosts use to declare gradients
//!   (`"0:ff000000 100:ffff0000"`, or a bare `"ffff0000"` for a solid color)

/// Gradient stops, sampling, and parsing.
pub mod gradient;

pub use gradient::{Gradient, GradientError, GradientStop};
