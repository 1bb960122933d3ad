#![forbid(unsafe_code)]

//! Per-key render targets.
//!
//! A [`FrameSink`] is what an effect renders into: one color slot per key,
//! addressed by key index. Effects call [`FrameSink::clear`] once at the
//! start of a render pass and then [`FrameSink::blend`] for every key they
//! contribute to. What "clear" means is up to the sink: [`KeyFrame`] resets
//! to its base color, which defaults to transparent (key off) but can hold
//! a lower effect layer.
//!
//! # Usage
//!
//! ```
//! use keyheat_render::{FrameSink, KeyFrame, PackedRgba};
//!
//! let mut frame = KeyFrame::new(3);
//! frame.clear();
//! frame.blend(1, PackedRgba::RED);
//! assert_eq!(frame.get(1), Some(PackedRgba::RED));
//! assert_eq!(frame.get(0), Some(PackedRgba::TRANSPARENT));
//! ```

use crate::color::PackedRgba;

/// Per-key write/blend contract.
pub trait FrameSink {
    /// Reset every key to the sink's base state.
    fn clear(&mut self);

    /// Composite `color` over the current color of key `index`.
    ///
    /// Indices the sink does not have are ignored.
    fn blend(&mut self, index: usize, color: PackedRgba);
}

/// Flat per-key color buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFrame {
    colors: Vec<PackedRgba>,
    base: PackedRgba,
}

impl KeyFrame {
    /// Create a frame of `key_count` transparent keys.
    #[must_use]
    pub fn new(key_count: usize) -> Self {
        Self::with_base(key_count, PackedRgba::TRANSPARENT)
    }

    /// Create a frame whose clear state is `base` instead of transparent.
    #[must_use]
    pub fn with_base(key_count: usize, base: PackedRgba) -> Self {
        Self {
            colors: vec![base; key_count],
            base,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn base(&self) -> PackedRgba {
        self.base
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<PackedRgba> {
        self.colors.get(index).copied()
    }

    /// Overwrite a key's color. Out of range indices are ignored.
    pub fn set(&mut self, index: usize, color: PackedRgba) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PackedRgba] {
        &self.colors
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, PackedRgba>> {
        self.colors.iter().copied()
    }
}

impl FrameSink for KeyFrame {
    fn clear(&mut self) {
        self.colors.fill(self.base);
    }

    fn blend(&mut self, index: usize, color: PackedRgba) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color.over(*slot);
        }
    }
}
