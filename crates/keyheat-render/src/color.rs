#![forbid(unsafe_code)]

//! Packed 32-bit RGBA color.
//!
//! Layout is `0xRRGGBBAA`. Hosts that speak ARGB (the ckb-next protocol
//! prints `aarrggbb`) convert at the boundary with
//! [`PackedRgba::from_argb_u32`] / [`PackedRgba::to_argb_u32`].

/// A straight (non-premultiplied) RGBA color packed into a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent black; the "off" state of a key.
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Build from an `0xAARRGGBB` word.
    #[inline]
    #[must_use]
    pub const fn from_argb_u32(argb: u32) -> Self {
        Self(argb.rotate_left(8))
    }

    /// Convert to an `0xAARRGGBB` word.
    #[inline]
    #[must_use]
    pub const fn to_argb_u32(self) -> u32 {
        self.0.rotate_right(8)
    }

    #[inline]
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    #[must_use]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Composite `self` over `dst`.
    ///
    /// Color channels: `src * alpha + dst * (1 - alpha)`.
    /// Alpha channel: `alpha + dst_alpha * (1 - alpha)`.
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        match self.a() {
            0 => dst,
            255 => self,
            a => {
                let sa = f32::from(a) / 255.0;
                let inv = 1.0 - sa;
                let channel =
                    |s: u8, d: u8| (f32::from(s) * sa + f32::from(d) * inv).round() as u8;
                let alpha = (f32::from(a) + f32::from(dst.a()) * inv).round() as u8;
                Self::rgba(
                    channel(self.r(), dst.r()),
                    channel(self.g(), dst.g()),
                    channel(self.b(), dst.b()),
                    alpha,
                )
            }
        }
    }

    /// Linear interpolation of all four channels, `t` clamped to `[0, 1]`.
    ///
    /// Fixed-point u32 arithmetic; `t == 0` yields `self`, `t == 1` yields
    /// `other` exactly.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t256 = (t * 256.0) as u32;
        let inv = 256 - t256;
        let mix = |a: u8, b: u8| ((a as u32 * inv + b as u32 * t256) >> 8) as u8;
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }
}
