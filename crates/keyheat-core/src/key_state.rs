#![forbid(unsafe_code)]

//! Per-key heat state arena.
//!
//! # Invariants
//!
//! 1. **Fixed length**: the arena length is set by [`KeyStateStore::initialize`]
//!    and never changes until the next initialization.
//! 2. **Bounded heat**: every mutation path clamps `heat_ms` into
//!    `[0, max_fade_ms]` (see [`clamp_heat`]).
//! 3. **Last event wins**: `is_pressed` mirrors the most recent press or
//!    release for that key, with no debouncing.
//! 4. **Closed mutation set**: heat changes only through
//!    [`KeyStateStore::press`], [`KeyStateStore::decay`] and
//!    [`KeyStateStore::reclamp`]. Records handed out are read-only.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Index out of range | Host sent a bad key handle | `Err(KeyIndexOutOfRange)`, nothing mutated |
//! | Use before init | Events before the keymap | Empty arena, every index is out of range |
//! | NaN heat | Degenerate arithmetic upstream | Clamped to `0.0` |

use crate::keymap::KeyPosition;

/// Clamp a heat value into `[0, max_ms]`.
///
/// NaN heat maps to `0.0`; a NaN or negative bound is treated as `0.0`.
#[inline]
#[must_use]
pub fn clamp_heat(heat_ms: f64, max_ms: f64) -> f64 {
    let max_ms = max_ms.max(0.0);
    if heat_ms.is_nan() {
        0.0
    } else {
        heat_ms.clamp(0.0, max_ms)
    }
}

// ---------------------------------------------------------------------------
// KeyState
// ---------------------------------------------------------------------------

/// Heat record for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyState {
    position: KeyPosition,
    is_pressed: bool,
    heat_ms: f64,
}

impl KeyState {
    #[must_use]
    pub const fn new(position: KeyPosition) -> Self {
        Self {
            position,
            is_pressed: false,
            heat_ms: 0.0,
        }
    }

    /// Position reported at initialization.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> KeyPosition {
        self.position
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Accumulated heat in milliseconds.
    #[inline]
    #[must_use]
    pub const fn heat_ms(&self) -> f64 {
        self.heat_ms
    }

    #[inline]
    fn set_heat(&mut self, heat_ms: f64, max_ms: f64) {
        self.heat_ms = clamp_heat(heat_ms, max_ms);
    }
}

// ---------------------------------------------------------------------------
// KeyIndexOutOfRange
// ---------------------------------------------------------------------------

/// A key event addressed a key the store does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyIndexOutOfRange {
    pub index: usize,
    pub key_count: usize,
}

impl std::fmt::Display for KeyIndexOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "key index {} out of range (key count {})",
            self.index, self.key_count
        )
    }
}

impl std::error::Error for KeyIndexOutOfRange {}

// ---------------------------------------------------------------------------
// KeyStateStore
// ---------------------------------------------------------------------------

/// Fixed-length arena of [`KeyState`] records indexed by key index.
#[derive(Debug, Clone, Default)]
pub struct KeyStateStore {
    keys: Vec<KeyState>,
}

impl KeyStateStore {
    /// Create an uninitialized (empty) store.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Allocate one idle entry per position, discarding any prior state.
    pub fn initialize<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = KeyPosition>,
    {
        let previous = self.keys.len();
        self.keys.clear();
        self.keys.extend(positions.into_iter().map(KeyState::new));
        self.keys.shrink_to_fit();
        tracing::debug!(
            key_count = self.keys.len(),
            previous,
            "key state store initialized"
        );
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&KeyState> {
        self.keys.get(index)
    }

    /// Mark a key pressed and add `increment_ms` of heat, clamped to `max_ms`.
    pub fn press(
        &mut self,
        index: usize,
        increment_ms: f64,
        max_ms: f64,
    ) -> Result<&KeyState, KeyIndexOutOfRange> {
        let key = self.slot(index)?;
        key.is_pressed = true;
        let heat = key.heat_ms + increment_ms;
        key.set_heat(heat, max_ms);
        Ok(key)
    }

    /// Mark a key released. Heat is left untouched.
    pub fn release(&mut self, index: usize) -> Result<&KeyState, KeyIndexOutOfRange> {
        let key = self.slot(index)?;
        key.is_pressed = false;
        Ok(key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyState> {
        self.keys.iter()
    }

    /// Cool every released key by `delta_ms`, then clamp all heat into
    /// `[0, max_ms]`. Held keys keep their heat.
    ///
    /// Negative or NaN deltas count as zero.
    pub fn decay(&mut self, delta_ms: f64, max_ms: f64) {
        let delta_ms = if delta_ms > 0.0 { delta_ms } else { 0.0 };
        for key in &mut self.keys {
            let mut heat = key.heat_ms;
            if heat > 0.0 && !key.is_pressed {
                heat -= delta_ms;
            }
            key.set_heat(heat, max_ms);
        }
    }

    /// Clamp every key's heat into `[0, max_ms]`, for a lowered ceiling.
    pub fn reclamp(&mut self, max_ms: f64) {
        for key in &mut self.keys {
            let heat = key.heat_ms;
            key.set_heat(heat, max_ms);
        }
    }

    fn slot(&mut self, index: usize) -> Result<&mut KeyState, KeyIndexOutOfRange> {
        let key_count = self.keys.len();
        self.keys
            .get_mut(index)
            .ok_or(KeyIndexOutOfRange { index, key_count })
    }
}

impl<'a> IntoIterator for &'a KeyStateStore {
    type Item = &'a KeyState;
    type IntoIter = std::slice::Iter<'a, KeyState>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store(n: i32) -> KeyStateStore {
        let mut store = KeyStateStore::new();
        store.initialize((0..n).map(|i| KeyPosition::new(i * 10, 0)));
        store
    }

    #[test]
    fn initialize_sets_positions_and_idle_state() {
        let store = store(3);
        assert_eq!(store.len(), 3);
        for (i, key) in store.iter().enumerate() {
            assert_eq!(key.position(), KeyPosition::new(i as i32 * 10, 0));
            assert!(!key.is_pressed());
            assert_eq!(key.heat_ms(), 0.0);
        }
    }

    #[test]
    fn reinitialize_discards_prior_state() {
        let mut store = store(2);
        store.press(1, 500.0, 30_000.0).unwrap();
        store.initialize([KeyPosition::new(5, 5)]);
        assert_eq!(store.len(), 1);
        let key = store.get(0).unwrap();
        assert_eq!(key.position(), KeyPosition::new(5, 5));
        assert!(!key.is_pressed());
        assert_eq!(key.heat_ms(), 0.0);
    }

    #[test]
    fn press_accumulates_and_clamps() {
        let mut store = store(1);
        for _ in 0..3 {
            store.press(0, 500.0, 1_200.0).unwrap();
        }
        let key = store.get(0).unwrap();
        assert!(key.is_pressed());
        assert_eq!(key.heat_ms(), 1_200.0);
    }

    #[test]
    fn release_keeps_heat() {
        let mut store = store(1);
        store.press(0, 500.0, 30_000.0).unwrap();
        let key = store.release(0).unwrap();
        assert!(!key.is_pressed());
        assert_eq!(key.heat_ms(), 500.0);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_mutation() {
        let mut store = store(2);
        store.press(0, 500.0, 30_000.0).unwrap();
        let before: Vec<_> = store.iter().copied().collect();

        let err = store.press(2, 500.0, 30_000.0).unwrap_err();
        assert_eq!(
            err,
            KeyIndexOutOfRange {
                index: 2,
                key_count: 2
            }
        );
        assert!(store.release(usize::MAX).is_err());

        let after: Vec<_> = store.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn decay_cools_released_keys_only() {
        let mut store = store(3);
        store.press(0, 500.0, 30_000.0).unwrap();
        store.press(1, 500.0, 30_000.0).unwrap();
        store.release(1).unwrap();

        store.decay(200.0, 30_000.0);
        assert_eq!(store.get(0).unwrap().heat_ms(), 500.0);
        assert_eq!(store.get(1).unwrap().heat_ms(), 300.0);
        assert_eq!(store.get(2).unwrap().heat_ms(), 0.0);

        store.decay(1_000.0, 30_000.0);
        assert_eq!(store.get(1).unwrap().heat_ms(), 0.0);
    }

    #[test]
    fn decay_ignores_negative_and_nan_deltas() {
        let mut store = store(1);
        store.press(0, 500.0, 30_000.0).unwrap();
        store.release(0).unwrap();
        store.decay(-50.0, 30_000.0);
        store.decay(f64::NAN, 30_000.0);
        assert_eq!(store.get(0).unwrap().heat_ms(), 500.0);
    }

    #[test]
    fn reclamp_lowers_heat_to_new_ceiling() {
        let mut store = store(2);
        for _ in 0..4 {
            store.press(0, 500.0, 30_000.0).unwrap();
        }
        store.press(1, 500.0, 30_000.0).unwrap();
        store.reclamp(1_000.0);
        assert_eq!(store.get(0).unwrap().heat_ms(), 1_000.0);
        assert_eq!(store.get(1).unwrap().heat_ms(), 500.0);
        assert!(store.get(0).unwrap().is_pressed());
    }

    #[test]
    fn uninitialized_store_rejects_everything() {
        let mut store = KeyStateStore::new();
        assert!(store.is_empty());
        assert!(store.press(0, 1.0, 1.0).is_err());
        assert!(store.release(0).is_err());
    }

    #[test]
    fn error_display_names_index_and_count() {
        let err = KeyIndexOutOfRange {
            index: 7,
            key_count: 3,
        };
        assert_eq!(err.to_string(), "key index 7 out of range (key count 3)");
    }

    #[test]
    fn clamp_heat_edges() {
        assert_eq!(clamp_heat(-5.0, 100.0), 0.0);
        assert_eq!(clamp_heat(150.0, 100.0), 100.0);
        assert_eq!(clamp_heat(42.5, 100.0), 42.5);
        assert_eq!(clamp_heat(f64::NAN, 100.0), 0.0);
        assert_eq!(clamp_heat(10.0, -1.0), 0.0);
        assert_eq!(clamp_heat(10.0, f64::NAN), 0.0);
        assert_eq!(clamp_heat(f64::INFINITY, 100.0), 100.0);
    }

    proptest! {
        #[test]
        fn presses_never_exceed_bound(
            increments in proptest::collection::vec(0.0f64..10_000.0, 0..40),
            max_ms in 0.0f64..50_000.0,
        ) {
            let mut store = store(1);
            for inc in increments {
                let key = store.press(0, inc, max_ms).unwrap();
                prop_assert!(key.heat_ms() >= 0.0);
                prop_assert!(key.heat_ms() <= max_ms);
            }
        }
    }
}
