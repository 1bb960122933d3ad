#![forbid(unsafe_code)]

//! Heat effect configuration and its host-facing parameter table.
//!
//! [`HeatConfig`] is a plain value. Hosts update it one named parameter at a
//! time through [`HeatConfig::apply_param`] on a working copy, then hand the
//! finished value to [`HeatFx::set_config`](crate::HeatFx::set_config), which
//! replaces the active configuration in one step.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown name | Host-standard parameter this effect ignores | `Ok(false)`, nothing changed |
//! | Unparsable number | Garbage value | `Err(InvalidValue)`, nothing changed |
//! | Out of range number | Value beyond the declared range | Clamped into range |
//! | Bad gradient | Malformed stop list | `Err(Gradient)`, nothing changed |

use std::fmt;

use keyheat_style::{Gradient, GradientError};

/// Heat added per press, in milliseconds.
pub const FADE_TIME: &str = "fadetime";
/// Upper bound on accumulated heat, in seconds.
pub const MAX_FADE_TIME: &str = "maxfadetime";
/// Presses needed to reach full intensity.
pub const PRESSES_TO_MAX_INTENSITY: &str = "pressestomaxintensity";
/// Gradient sampled by intensity.
pub const FADE_COLOR: &str = "fadecolor";

pub const DEFAULT_FADE_INCREMENT_MS: u32 = 500;
pub const MAX_FADE_INCREMENT_MS: u32 = 9_999_999;
pub const DEFAULT_MAX_FADE_SECS: u32 = 30;
pub const MAX_MAX_FADE_SECS: u32 = 99_999;
pub const DEFAULT_PRESSES_TO_MAX_INTENSITY: f64 = 5.0;
pub const MIN_PRESSES_TO_MAX_INTENSITY: f64 = 1.0;
pub const MAX_PRESSES_TO_MAX_INTENSITY: f64 = 999.0;
/// Default gradient: solid opaque red.
pub const DEFAULT_FADE_COLOR: &str = "ffff0000";

const MS_PER_SECOND: u64 = 1000;

// ---------------------------------------------------------------------------
// Parameter table
// ---------------------------------------------------------------------------

/// Value type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Integer-valued slider.
    Long { default: i64, min: i64, max: i64 },
    /// Gradient with per-stop alpha.
    AGradient { default: &'static str },
}

/// Host-side declaration of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub kind: ParamKind,
}

/// Every parameter [`HeatConfig::apply_param`] recognizes, in display order.
///
/// `pressestomaxintensity` is declared as an integer slider but parsed as a
/// real number.
pub const PARAMS: [ParamSpec; 4] = [
    ParamSpec {
        name: FADE_COLOR,
        label: "Fade color:",
        unit: "",
        kind: ParamKind::AGradient {
            default: DEFAULT_FADE_COLOR,
        },
    },
    ParamSpec {
        name: FADE_TIME,
        label: "Fade time:",
        unit: "ms",
        kind: ParamKind::Long {
            default: DEFAULT_FADE_INCREMENT_MS as i64,
            min: 0,
            max: MAX_FADE_INCREMENT_MS as i64,
        },
    },
    ParamSpec {
        name: MAX_FADE_TIME,
        label: "Max fade time:",
        unit: "s",
        kind: ParamKind::Long {
            default: DEFAULT_MAX_FADE_SECS as i64,
            min: 0,
            max: MAX_MAX_FADE_SECS as i64,
        },
    },
    ParamSpec {
        name: PRESSES_TO_MAX_INTENSITY,
        label: "Presses to max:",
        unit: "key presses",
        kind: ParamKind::Long {
            default: DEFAULT_PRESSES_TO_MAX_INTENSITY as i64,
            min: MIN_PRESSES_TO_MAX_INTENSITY as i64,
            max: MAX_PRESSES_TO_MAX_INTENSITY as i64,
        },
    },
];

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors from applying a named parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric parameter did not hold a finite number.
    InvalidValue { name: String, value: String },
    /// The gradient parameter did not parse.
    Gradient { name: String, source: GradientError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { name, value } => {
                write!(f, "invalid value for '{name}': {value:?}")
            }
            Self::Gradient { name, source } => write!(f, "invalid gradient for '{name}': {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gradient { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// HeatConfig
// ---------------------------------------------------------------------------

/// Heat effect configuration.
///
/// Setters clamp into the declared ranges, so a constructed value is always
/// within bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawHeatConfig")
)]
pub struct HeatConfig {
    fade_increment_ms: u32,
    max_fade_ms: u64,
    presses_to_max_intensity: f64,
    gradient: Gradient,
}

/// Deserialized form before range clamping. Missing fields take defaults.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct RawHeatConfig {
    fade_increment_ms: u64,
    max_fade_ms: u64,
    presses_to_max_intensity: f64,
    gradient: Gradient,
}

#[cfg(feature = "serde")]
impl Default for RawHeatConfig {
    fn default() -> Self {
        let config = HeatConfig::default();
        Self {
            fade_increment_ms: u64::from(config.fade_increment_ms),
            max_fade_ms: config.max_fade_ms,
            presses_to_max_intensity: config.presses_to_max_intensity,
            gradient: config.gradient,
        }
    }
}

#[cfg(feature = "serde")]
impl From<RawHeatConfig> for HeatConfig {
    fn from(raw: RawHeatConfig) -> Self {
        Self::default()
            .with_fade_increment_ms(u32::try_from(raw.fade_increment_ms).unwrap_or(u32::MAX))
            .with_max_fade_ms(raw.max_fade_ms)
            .with_presses_to_max_intensity(raw.presses_to_max_intensity)
            .with_gradient(raw.gradient)
    }
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            fade_increment_ms: DEFAULT_FADE_INCREMENT_MS,
            max_fade_ms: u64::from(DEFAULT_MAX_FADE_SECS) * MS_PER_SECOND,
            presses_to_max_intensity: DEFAULT_PRESSES_TO_MAX_INTENSITY,
            gradient: Gradient::default(),
        }
    }
}

impl HeatConfig {
    /// Set the heat added per press.
    #[must_use]
    pub fn with_fade_increment_ms(mut self, ms: u32) -> Self {
        self.fade_increment_ms = ms.min(MAX_FADE_INCREMENT_MS);
        self
    }

    /// Set the heat ceiling in whole seconds.
    #[must_use]
    pub fn with_max_fade_secs(mut self, secs: u32) -> Self {
        self.max_fade_ms = u64::from(secs.min(MAX_MAX_FADE_SECS)) * MS_PER_SECOND;
        self
    }

    /// Set the heat ceiling in milliseconds.
    #[must_use]
    pub fn with_max_fade_ms(mut self, ms: u64) -> Self {
        self.max_fade_ms = ms.min(u64::from(MAX_MAX_FADE_SECS) * MS_PER_SECOND);
        self
    }

    /// Set the press count that reaches full intensity. NaN is ignored.
    #[must_use]
    pub fn with_presses_to_max_intensity(mut self, presses: f64) -> Self {
        if !presses.is_nan() {
            self.presses_to_max_intensity =
                presses.clamp(MIN_PRESSES_TO_MAX_INTENSITY, MAX_PRESSES_TO_MAX_INTENSITY);
        }
        self
    }

    #[must_use]
    pub fn with_gradient(mut self, gradient: Gradient) -> Self {
        self.gradient = gradient;
        self
    }

    #[inline]
    #[must_use]
    pub const fn fade_increment_ms(&self) -> u32 {
        self.fade_increment_ms
    }

    #[inline]
    #[must_use]
    pub const fn max_fade_ms(&self) -> u64 {
        self.max_fade_ms
    }

    #[inline]
    #[must_use]
    pub const fn presses_to_max_intensity(&self) -> f64 {
        self.presses_to_max_intensity
    }

    #[inline]
    #[must_use]
    pub const fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    /// Heat at which a key reads as 0% intensity.
    ///
    /// `presses_to_max_intensity * fade_increment_ms`; zero when the fade
    /// increment is zero.
    #[inline]
    #[must_use]
    pub fn max_intensity_time_ms(&self) -> f64 {
        self.presses_to_max_intensity * f64::from(self.fade_increment_ms)
    }

    /// Apply one named parameter from its textual host value.
    ///
    /// Returns `Ok(true)` if `name` is one of [`PARAMS`], `Ok(false)` if it is
    /// not (the configuration is left untouched).
    pub fn apply_param(&mut self, name: &str, value: &str) -> Result<bool, ConfigError> {
        match name {
            FADE_TIME => {
                let ms = parse_long(name, value)?;
                *self = self
                    .clone()
                    .with_fade_increment_ms(ms.clamp(0, i64::from(MAX_FADE_INCREMENT_MS)) as u32);
            }
            MAX_FADE_TIME => {
                let secs = parse_long(name, value)?;
                *self = self
                    .clone()
                    .with_max_fade_secs(secs.clamp(0, i64::from(MAX_MAX_FADE_SECS)) as u32);
            }
            PRESSES_TO_MAX_INTENSITY => {
                let presses = parse_real(name, value)?;
                *self = self.clone().with_presses_to_max_intensity(presses);
            }
            FADE_COLOR => {
                let gradient = value.parse().map_err(|source| ConfigError::Gradient {
                    name: name.to_string(),
                    source,
                })?;
                self.gradient = gradient;
            }
            _ => return Ok(false),
        }
        tracing::debug!(name, value, "heat parameter applied");
        Ok(true)
    }
}

fn parse_real(name: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
}

/// Integer parameters accept a real-valued spelling and truncate it.
fn parse_long(name: &str, value: &str) -> Result<i64, ConfigError> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    parse_real(name, value).map(|v| v.trunc() as i64)
}
