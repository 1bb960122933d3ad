#![forbid(unsafe_code)]

//! Gradient color ramps indexed by percentage.
//!
//! # Textual form
//!
//! A gradient is written as whitespace-separated `position:color` stops,
//! where `position` is a percentage in `[0, 100]` and `color` is `aarrggbb`
//! (or `rrggbb`, taken as opaque) hex:
//!
//! ```text
//! 0:00ff0000 60:ffff8000 100:ffffff00
//! ```
//!
//! A single bare color with no position is a solid gradient. This is the
//! form hosts use for defaults, e.g. `ffff0000` for opaque red.
//!
//! # Sampling
//!
//! [`Gradient::color_at`] clamps the position into `[0, 100]`, holds the
//! first/last stop color outside the stop range, and interpolates all four
//! channels linearly between neighboring stops.

use std::fmt;
use std::str::FromStr;

use keyheat_render::PackedRgba;

/// Lowest stop position.
pub const MIN_POSITION: f64 = 0.0;
/// Highest stop position.
pub const MAX_POSITION: f64 = 100.0;

/// Errors from building or parsing a gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradientError {
    /// No stops were given.
    Empty,
    /// A stop token was not of the form `position:color`.
    InvalidStop(String),
    /// A stop position was not a number in `[0, 100]`.
    InvalidPosition(String),
    /// A color was not 6 or 8 hex digits.
    InvalidColor(String),
}

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "gradient has no stops"),
            Self::InvalidStop(token) => write!(f, "invalid gradient stop: {token}"),
            Self::InvalidPosition(pos) => write!(f, "invalid gradient position: {pos}"),
            Self::InvalidColor(color) => write!(f, "invalid gradient color: {color}"),
        }
    }
}

impl std::error::Error for GradientError {}

/// One color stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Percentage in `[0, 100]`.
    pub position: f64,
    pub color: PackedRgba,
}

impl GradientStop {
    #[must_use]
    pub const fn new(position: f64, color: PackedRgba) -> Self {
        Self { position, color }
    }
}

/// Ordered, non-empty list of color stops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Build a gradient from stops in any order.
    ///
    /// Stops are sorted by position; equal positions keep their given order.
    pub fn new<I>(stops: I) -> Result<Self, GradientError>
    where
        I: IntoIterator<Item = GradientStop>,
    {
        let mut stops: Vec<GradientStop> = stops.into_iter().collect();
        if stops.is_empty() {
            return Err(GradientError::Empty);
        }
        if let Some(bad) = stops.iter().find(|s| !valid_position(s.position)) {
            return Err(GradientError::InvalidPosition(bad.position.to_string()));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    /// A gradient that is `color` everywhere.
    #[must_use]
    pub fn solid(color: PackedRgba) -> Self {
        Self {
            stops: vec![
                GradientStop::new(MIN_POSITION, color),
                GradientStop::new(MAX_POSITION, color),
            ],
        }
    }

    #[must_use]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Sample the gradient at `position` percent.
    #[must_use]
    pub fn color_at(&self, position: f64) -> PackedRgba {
        let pos = if position.is_nan() {
            MIN_POSITION
        } else {
            position.clamp(MIN_POSITION, MAX_POSITION)
        };
        let idx = self.stops.partition_point(|s| s.position < pos);
        let Some(hi) = self.stops.get(idx) else {
            return self
                .stops
                .last()
                .map_or(PackedRgba::TRANSPARENT, |stop| stop.color);
        };
        if idx == 0 {
            return hi.color;
        }
        let lo = &self.stops[idx - 1];
        let span = hi.position - lo.position;
        if span <= 0.0 {
            return hi.color;
        }
        lo.color.lerp(hi.color, (pos - lo.position) / span)
    }
}

impl Default for Gradient {
    /// Solid opaque red.
    fn default() -> Self {
        Self::solid(PackedRgba::RED)
    }
}

#[inline]
fn valid_position(position: f64) -> bool {
    (MIN_POSITION..=MAX_POSITION).contains(&position)
}

fn parse_color(token: &str) -> Result<PackedRgba, GradientError> {
    let invalid = || GradientError::InvalidColor(token.to_string());
    if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(token, 16).map_err(|_| invalid())?;
    match token.len() {
        8 => Ok(PackedRgba::from_argb_u32(value)),
        6 => Ok(PackedRgba::from_argb_u32(0xFF00_0000 | value)),
        _ => Err(invalid()),
    }
}

fn parse_stop(token: &str) -> Result<GradientStop, GradientError> {
    let (pos, color) = token
        .split_once(':')
        .ok_or_else(|| GradientError::InvalidStop(token.to_string()))?;
    let position: f64 = pos
        .parse()
        .map_err(|_| GradientError::InvalidPosition(pos.to_string()))?;
    if !valid_position(position) {
        return Err(GradientError::InvalidPosition(pos.to_string()));
    }
    Ok(GradientStop::new(position, parse_color(color)?))
}

impl FromStr for Gradient {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(GradientError::Empty),
            [single] if !single.contains(':') => parse_color(single).map(Self::solid),
            _ => Self::new(
                tokens
                    .iter()
                    .map(|token| parse_stop(token))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{:08x}", stop.position, stop.color.to_argb_u32())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Gradient {
    type Error = GradientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Gradient> for String {
    fn from(gradient: Gradient) -> Self {
        gradient.to_string()
    }
}
