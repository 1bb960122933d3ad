#![forbid(unsafe_code)]

//! Render kernel: packed colors, compositing, and per-key frames.
//!
//! # Role in keyheat
//! `keyheat-render` is the output side of the effect. Effects never write
//! device colors directly; they blend [`PackedRgba`] values into a
//! [`FrameSink`], and the host adapter serializes the finished frame.
//!
//! # Primary responsibilities
//! - **PackedRgba**: 32-bit RGBA color with "over" compositing and lerp.
//! - **FrameSink**: the per-key write/blend contract effects render into.
//! - **KeyFrame**: a flat per-key color buffer implementing [`FrameSink`].

pub mod color;
pub mod frame;

pub use color::PackedRgba;
pub use frame::{FrameSink, KeyFrame};
