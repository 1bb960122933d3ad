#![forbid(unsafe_code)]

//! Key heat effect.
//!
//! Every key accumulates heat when pressed and cools linearly while
//! released. On each frame the remaining heat is mapped to an intensity
//! percentage, sampled from a [`Gradient`](keyheat_style::Gradient), and
//! alpha-composited into a [`FrameSink`](keyheat_render::FrameSink).
//!
//! # Example
//!
//! ```
//! use keyheat_core::KeyPosition;
//! use keyheat_fx::{HeatConfig, HeatFx};
//! use keyheat_render::{KeyFrame, PackedRgba};
//!
//! let mut fx = HeatFx::new(HeatConfig::default());
//! fx.initialize([KeyPosition::new(0, 0), KeyPosition::new(10, 0)]);
//!
//! fx.on_press(1);
//! fx.on_release(1);
//! fx.tick(0.016);
//!
//! let mut frame = KeyFrame::new(fx.key_count());
//! fx.render(&mut frame);
//! assert_eq!(frame.get(0), Some(PackedRgba::TRANSPARENT));
//! assert_eq!(frame.get(1), Some(PackedRgba::RED));
//! ```

pub mod config;
pub mod heat;

pub use config::{ConfigError, HeatConfig, PARAMS, ParamKind, ParamSpec};
pub use heat::{HeatFx, HeatPhase, SATURATED_INTENSITY, heat_intensity};
