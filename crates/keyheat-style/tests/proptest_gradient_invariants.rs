//! Property-based invariant tests for gradient sampling.
//!
//! 1. Sampling is deterministic.
//! 2. Every sampled channel lies between the channels of the bracketing stops.
//! 3. Solid gradients are constant over the whole domain.
//! 4. The textual form parses back to an identical gradient.

use keyheat_render::PackedRgba;
use keyheat_style::{Gradient, GradientStop};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn stop_strategy() -> impl Strategy<Value = GradientStop> {
    (0u8..=100, any::<u32>())
        .prop_map(|(pos, argb)| GradientStop::new(f64::from(pos), PackedRgba(argb)))
}

fn gradient_strategy() -> impl Strategy<Value = Gradient> {
    proptest::collection::vec(stop_strategy(), 1..=6)
        .prop_map(|stops| Gradient::new(stops).expect("valid stops"))
}

fn channels(c: PackedRgba) -> [u8; 4] {
    [c.r(), c.g(), c.b(), c.a()]
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sampling_is_deterministic(g in gradient_strategy(), pos in -20.0f64..120.0) {
        prop_assert_eq!(g.color_at(pos), g.color_at(pos));
    }

    #[test]
    fn sample_lies_within_bracketing_stops(g in gradient_strategy(), pos in 0.0f64..=100.0) {
        let stops = g.stops();
        let out = channels(g.color_at(pos));
        let idx = stops.partition_point(|s| s.position < pos);
        let (lo, hi) = if idx == 0 {
            (stops[0], stops[0])
        } else if idx == stops.len() {
            (stops[idx - 1], stops[idx - 1])
        } else {
            (stops[idx - 1], stops[idx])
        };
        let (lo, hi) = (channels(lo.color), channels(hi.color));
        for i in 0..4 {
            prop_assert!(out[i] >= lo[i].min(hi[i]));
            prop_assert!(out[i] <= lo[i].max(hi[i]));
        }
    }

    #[test]
    fn solid_gradient_is_constant(argb in any::<u32>(), pos in -1000.0f64..1000.0) {
        let color = PackedRgba(argb);
        prop_assert_eq!(Gradient::solid(color).color_at(pos), color);
    }

    #[test]
    fn textual_form_reparses(g in gradient_strategy()) {
        let text = g.to_string();
        let back: Gradient = text.parse().expect("display output parses");
        prop_assert_eq!(back, g);
    }
}
