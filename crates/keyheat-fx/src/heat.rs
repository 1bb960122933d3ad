#![forbid(unsafe_code)]

//! Heat decay and intensity engine.
//!
//! [`HeatFx`] owns the per-key heat store and the active [`HeatConfig`].
//! Hosts drive it with three kinds of input:
//!
//! - key events ([`HeatFx::on_press`], [`HeatFx::on_release`]),
//! - elapsed time ([`HeatFx::advance`] in milliseconds, [`HeatFx::tick`] in
//!   seconds),
//! - frame requests ([`HeatFx::render`]).
//!
//! # Invariants
//!
//! 1. Every key's heat stays within `[0, max_fade_ms]` after any operation,
//!    including a configuration change that lowers the ceiling.
//! 2. Only released keys cool, linearly, at one millisecond of heat per
//!    elapsed millisecond.
//! 3. Intensity is inverted: fresh heat near the threshold reads low,
//!    heat that has nearly cooled away reads high.
//! 4. `render` is a pure function of state: two renders with no mutation in
//!    between produce identical frames.

use keyheat_core::{KeyEvent, KeyPosition, KeyState, KeyStateStore};
use keyheat_render::FrameSink;
use tracing::{debug, trace, warn};

use crate::config::HeatConfig;

/// Milliseconds per second, for [`HeatFx::tick`].
pub const MS_PER_SECOND: f64 = 1000.0;

/// Intensity used when the threshold heat is zero.
pub const SATURATED_INTENSITY: f64 = 100.0;

/// Map remaining heat to an intensity percentage in `[0, 100]`.
///
/// `max_intensity_time_ms` is the heat at which intensity bottoms out. A
/// non-positive (or NaN) threshold saturates to [`SATURATED_INTENSITY`].
///
/// ```
/// use keyheat_fx::heat_intensity;
///
/// assert_eq!(heat_intensity(500.0, 2500.0), 80.0);
/// assert_eq!(heat_intensity(2500.0, 2500.0), 0.0);
/// assert_eq!(heat_intensity(9000.0, 2500.0), 0.0);
/// assert_eq!(heat_intensity(500.0, 0.0), 100.0);
/// ```
#[inline]
#[must_use]
pub fn heat_intensity(heat_ms: f64, max_intensity_time_ms: f64) -> f64 {
    if max_intensity_time_ms.is_nan() || max_intensity_time_ms <= 0.0 {
        return SATURATED_INTENSITY;
    }
    let intensity = 100.0 * (max_intensity_time_ms - heat_ms) / max_intensity_time_ms;
    if intensity.is_nan() {
        SATURATED_INTENSITY
    } else {
        intensity.clamp(0.0, SATURATED_INTENSITY)
    }
}

// ---------------------------------------------------------------------------
// HeatPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a key, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatPhase {
    /// No heat. Not drawn.
    Idle,
    /// Held down with heat. Drawn, not cooling.
    Holding,
    /// Released with heat. Drawn and cooling.
    Cooling,
}

impl HeatPhase {
    #[must_use]
    pub fn of(key: &KeyState) -> Self {
        if key.heat_ms() <= 0.0 {
            Self::Idle
        } else if key.is_pressed() {
            Self::Holding
        } else {
            Self::Cooling
        }
    }
}

// ---------------------------------------------------------------------------
// HeatFx
// ---------------------------------------------------------------------------

/// Key heat effect engine.
#[derive(Debug, Clone, Default)]
pub struct HeatFx {
    keys: KeyStateStore,
    config: HeatConfig,
}

impl HeatFx {
    /// Create an engine with no keys.
    #[must_use]
    pub fn new(config: HeatConfig) -> Self {
        Self {
            keys: KeyStateStore::new(),
            config,
        }
    }

    /// Host-facing effect name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        "heat"
    }

    /// Allocate one idle key per position, discarding prior heat.
    pub fn initialize<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = KeyPosition>,
    {
        self.keys.initialize(positions);
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &HeatConfig {
        &self.config
    }

    /// Replace the configuration and clamp existing heat to the new ceiling.
    pub fn set_config(&mut self, config: HeatConfig) {
        self.keys.reclamp(config.max_fade_ms() as f64);
        debug!(
            fade_increment_ms = config.fade_increment_ms(),
            max_fade_ms = config.max_fade_ms(),
            presses_to_max_intensity = config.presses_to_max_intensity(),
            "heat configuration replaced"
        );
        self.config = config;
    }

    #[inline]
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn key(&self, index: usize) -> Option<&KeyState> {
        self.keys.get(index)
    }

    #[must_use]
    pub fn keys(&self) -> &KeyStateStore {
        &self.keys
    }

    #[must_use]
    pub fn phase(&self, index: usize) -> Option<HeatPhase> {
        self.keys.get(index).map(HeatPhase::of)
    }

    /// Press key `index`. Returns `false` if the index is out of range.
    pub fn on_press(&mut self, index: usize) -> bool {
        let increment = f64::from(self.config.fade_increment_ms());
        let max_ms = self.config.max_fade_ms() as f64;
        match self.keys.press(index, increment, max_ms) {
            Ok(_) => true,
            Err(err) => {
                warn!(index = err.index, key_count = err.key_count, "press ignored: {err}");
                false
            }
        }
    }

    /// Release key `index`. Returns `false` if the index is out of range.
    pub fn on_release(&mut self, index: usize) -> bool {
        match self.keys.release(index) {
            Ok(_) => true,
            Err(err) => {
                warn!(index = err.index, key_count = err.key_count, "release ignored: {err}");
                false
            }
        }
    }

    /// Dispatch a key event. Positions carried by the event are ignored.
    pub fn handle_event(&mut self, event: KeyEvent) -> bool {
        if event.action.is_press() {
            self.on_press(event.index)
        } else {
            self.on_release(event.index)
        }
    }

    /// Cool every released key by `delta_ms`.
    ///
    /// Negative or NaN deltas count as zero.
    pub fn advance(&mut self, delta_ms: f64) {
        self.keys.decay(delta_ms, self.config.max_fade_ms() as f64);
    }

    /// [`advance`](Self::advance) by an elapsed time in seconds.
    pub fn tick(&mut self, delta_s: f64) {
        self.advance(delta_s * MS_PER_SECOND);
    }

    /// Current intensity percentage of key `index`.
    #[must_use]
    pub fn intensity(&self, index: usize) -> Option<f64> {
        let threshold = self.config.max_intensity_time_ms();
        self.keys
            .get(index)
            .map(|key| heat_intensity(key.heat_ms(), threshold))
    }

    /// Clear `sink`, then blend the gradient color of every warm key.
    pub fn render<S: FrameSink + ?Sized>(&self, sink: &mut S) {
        sink.clear();
        let threshold = self.config.max_intensity_time_ms();
        let gradient = self.config.gradient();
        let mut lit = 0usize;
        for (index, key) in self.keys.iter().enumerate() {
            if key.heat_ms() <= 0.0 {
                continue;
            }
            let intensity = heat_intensity(key.heat_ms(), threshold);
            sink.blend(index, gradient.color_at(intensity));
            lit += 1;
        }
        trace!(lit, key_count = self.keys.len(), "heat frame rendered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyheat_core::KeyAction;
    use keyheat_render::{KeyFrame, PackedRgba};
    use keyheat_style::Gradient;

    fn init_logs() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    fn engine(keys: usize) -> HeatFx {
        let mut fx = HeatFx::new(HeatConfig::default());
        fx.initialize((0..keys as i32).map(|i| KeyPosition::new(i * 10, 0)));
        fx
    }

    fn green_to_blue() -> Gradient {
        "0:ff00ff00 100:ff0000ff".parse().unwrap()
    }

    fn heat(fx: &HeatFx, index: usize) -> f64 {
        fx.key(index).unwrap().heat_ms()
    }

    #[test]
    fn uninitialized_engine_ignores_everything() {
        let mut fx = HeatFx::new(HeatConfig::default());
        assert_eq!(fx.key_count(), 0);
        assert!(!fx.on_press(0));
        assert!(!fx.on_release(0));
        fx.advance(100.0);
        let mut frame = KeyFrame::new(0);
        fx.render(&mut frame);
        assert!(frame.is_empty());
    }

    #[test]
    fn name_is_heat() {
        assert_eq!(HeatFx::default().name(), "heat");
    }

    #[test]
    fn single_press_reads_eighty_percent() {
        let mut fx = engine(3);
        assert!(fx.on_press(1));
        assert_eq!(heat(&fx, 1), 500.0);
        assert_eq!(fx.config().max_intensity_time_ms(), 2500.0);
        assert_eq!(fx.intensity(1), Some(80.0));
        assert_eq!(fx.phase(1), Some(HeatPhase::Holding));
        assert_eq!(fx.phase(0), Some(HeatPhase::Idle));
    }

    #[test]
    fn released_key_cools_to_zero_and_is_not_drawn() {
        let mut fx = engine(2);
        fx.on_press(0);
        fx.on_release(0);
        assert_eq!(fx.phase(0), Some(HeatPhase::Cooling));

        fx.advance(2000.0);
        assert_eq!(heat(&fx, 0), 0.0);
        assert_eq!(fx.phase(0), Some(HeatPhase::Idle));

        let mut frame = KeyFrame::with_base(2, PackedRgba::rgb(1, 2, 3));
        fx.render(&mut frame);
        assert_eq!(frame.get(0), Some(PackedRgba::rgb(1, 2, 3)));
    }

    #[test]
    fn held_key_does_not_cool() {
        let mut fx = engine(1);
        fx.on_press(0);
        fx.advance(10_000.0);
        assert_eq!(heat(&fx, 0), 500.0);
    }

    #[test]
    fn cooling_is_linear() {
        let mut fx = engine(1);
        fx.on_press(0);
        fx.on_release(0);
        fx.advance(100.0);
        assert_eq!(heat(&fx, 0), 400.0);
        fx.tick(0.25);
        assert_eq!(heat(&fx, 0), 150.0);
    }

    #[test]
    fn five_presses_reach_zero_intensity() {
        let mut fx = engine(1);
        for _ in 0..5 {
            fx.on_press(0);
            fx.on_release(0);
        }
        assert_eq!(heat(&fx, 0), 2500.0);
        assert_eq!(fx.intensity(0), Some(0.0));
    }

    #[test]
    fn heat_is_capped_at_max_fade() {
        let mut fx = engine(1);
        fx.set_config(HeatConfig::default().with_max_fade_secs(1));
        for _ in 0..10 {
            fx.on_press(0);
        }
        assert_eq!(heat(&fx, 0), 1000.0);
    }

    #[test]
    fn out_of_range_press_mutates_nothing() {
        init_logs();
        let mut fx = engine(2);
        fx.on_press(1);
        let before: Vec<KeyState> = fx.keys().iter().copied().collect();
        assert!(!fx.on_press(2));
        assert!(!fx.on_release(usize::MAX));
        let after: Vec<KeyState> = fx.keys().iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn handle_event_dispatches_by_action() {
        let mut fx = engine(2);
        assert!(fx.handle_event(KeyEvent::press(1)));
        assert!(fx.key(1).unwrap().is_pressed());
        assert!(fx.handle_event(KeyEvent::new(1, KeyAction::Release)));
        assert!(!fx.key(1).unwrap().is_pressed());
        assert!(!fx.handle_event(KeyEvent::release(7)));
    }

    #[test]
    fn zero_increment_renders_saturated() {
        let mut fx = engine(1);
        fx.set_config(HeatConfig::default().with_gradient(green_to_blue()));
        fx.on_press(0);
        fx.set_config(fx.config().clone().with_fade_increment_ms(0));
        assert_eq!(fx.config().max_intensity_time_ms(), 0.0);
        assert_eq!(fx.intensity(0), Some(SATURATED_INTENSITY));

        let mut frame = KeyFrame::new(1);
        fx.render(&mut frame);
        assert_eq!(frame.get(0), Some(PackedRgba::BLUE));
    }

    #[test]
    fn lowering_the_ceiling_reclamps_heat() {
        let mut fx = engine(1);
        for _ in 0..10 {
            fx.on_press(0);
        }
        assert_eq!(heat(&fx, 0), 5000.0);
        fx.set_config(HeatConfig::default().with_max_fade_secs(2));
        assert_eq!(heat(&fx, 0), 2000.0);
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        let mut fx = engine(1);
        fx.on_press(0);
        fx.on_release(0);
        fx.advance(-100.0);
        fx.advance(f64::NAN);
        fx.tick(-1.0);
        assert_eq!(heat(&fx, 0), 500.0);
    }

    #[test]
    fn render_samples_gradient_by_intensity() {
        init_logs();
        let mut fx = engine(2);
        fx.set_config(HeatConfig::default().with_gradient(green_to_blue()));
        for _ in 0..5 {
            fx.on_press(0);
        }
        fx.on_press(1);
        let mut frame = KeyFrame::new(2);
        fx.render(&mut frame);
        // Key 0 at 0% samples the first stop.
        assert_eq!(frame.get(0), Some(PackedRgba::GREEN));
        // Key 1 at 80% sits between the stops, mostly blue.
        let c = frame.get(1).unwrap();
        assert!(c.b() > c.g());
        assert_eq!(c.a(), 255);
    }

    #[test]
    fn render_blends_translucent_colors_over_base() {
        let mut fx = engine(1);
        let half_red = PackedRgba::rgba(255, 0, 0, 128);
        fx.set_config(HeatConfig::default().with_gradient(Gradient::solid(half_red)));
        fx.on_press(0);

        let base = PackedRgba::rgb(0, 0, 255);
        let mut frame = KeyFrame::with_base(1, base);
        fx.render(&mut frame);
        assert_eq!(frame.get(0), Some(half_red.over(base)));
    }

    #[test]
    fn render_clears_stale_colors() {
        let mut fx = engine(2);
        let mut frame = KeyFrame::new(2);
        frame.set(0, PackedRgba::WHITE);
        fx.on_press(1);
        fx.render(&mut frame);
        assert_eq!(frame.get(0), Some(PackedRgba::TRANSPARENT));
        assert_eq!(frame.get(1), Some(PackedRgba::RED));
    }

    #[test]
    fn render_is_idempotent() {
        let mut fx = engine(4);
        fx.on_press(0);
        fx.on_press(2);
        fx.on_release(2);
        fx.advance(123.0);
        let mut a = KeyFrame::new(4);
        let mut b = KeyFrame::new(4);
        fx.render(&mut a);
        fx.render(&mut b);
        fx.render(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn reinitialize_discards_heat() {
        let mut fx = engine(2);
        fx.on_press(0);
        fx.initialize([KeyPosition::new(0, 0)]);
        assert_eq!(fx.key_count(), 1);
        assert_eq!(heat(&fx, 0), 0.0);
    }

    #[test]
    fn render_through_trait_object() {
        let mut fx = engine(1);
        fx.on_press(0);
        let mut frame = KeyFrame::new(1);
        let sink: &mut dyn FrameSink = &mut frame;
        fx.render(sink);
        assert_eq!(frame.get(0), Some(PackedRgba::RED));
    }
}
