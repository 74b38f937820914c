//! Deterministic lattice noise primitives.
//!
//! Everything here is a pure function of its arguments: the hash is keyed only
//! by the input coordinates and a seed, so the same point always produces the
//! same bits. The ray marcher relies on that to get a stable distance estimate
//! when it samples the terrain many times along one ray.

use glam::{Vec2, Vec3, Vec3A};
use xxhash_rust::xxh32::xxh32;

/// Scale from the top 24 hash bits to [0, 1).
const HASH_TO_UNIT: f32 = 1.0 / (1u32 << 24) as f32;

/// Hash a 2D point to a pseudo-random value in [0, 1).
///
/// The bit patterns of both coordinates are fed through xxh32. `-0.0` is folded
/// onto `0.0` first so that lattice corners on either side of an axis agree.
pub fn hash(p: Vec2, seed: u32) -> f32 {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&canonical_zero(p.x).to_bits().to_le_bytes());
    bytes[4..].copy_from_slice(&canonical_zero(p.y).to_bits().to_le_bytes());
    (xxh32(&bytes, seed) >> 8) as f32 * HASH_TO_UNIT
}

#[inline]
fn canonical_zero(x: f32) -> f32 {
    if x == 0.0 { 0.0 } else { x }
}

/// Linear blend between two values of the same type.
pub trait Mix: Copy {
    /// Returns `self` at `t = 0` and `other` at `t = 1`.
    fn mix(self, other: Self, t: f32) -> Self;
}

impl Mix for f32 {
    #[inline]
    fn mix(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Mix for Vec2 {
    #[inline]
    fn mix(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Mix for Vec3 {
    #[inline]
    fn mix(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Mix for Vec3A {
    #[inline]
    fn mix(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

/// Blend four corner values by a fractional cell coordinate.
///
/// `a`/`b` are the corners at `j = 0`, `c`/`d` at `j = 1`; `i` runs from
/// `a` to `b` (and `c` to `d`).
pub fn bilinear_interpolation<F: Mix>(a: F, b: F, c: F, d: F, ij: Vec2) -> F {
    let i0 = a.mix(b, ij.x);
    let i1 = c.mix(d, ij.x);
    i0.mix(i1, ij.y)
}

/// Smoothstep-style ease curves applied per component.
pub trait Ease: Copy {
    /// `3t² - 2t³`, zero slope at both ends.
    fn s_curve_c1(self) -> Self;
    /// `6t⁵ - 15t⁴ + 10t³`, zero slope and curvature at both ends.
    fn s_curve_c2(self) -> Self;
}

impl Ease for f32 {
    #[inline]
    fn s_curve_c1(self) -> Self {
        self * self * (3.0 - 2.0 * self)
    }

    #[inline]
    fn s_curve_c2(self) -> Self {
        self * self * self * (self * (self * 6.0 - 15.0) + 10.0)
    }
}

impl Ease for Vec2 {
    #[inline]
    fn s_curve_c1(self) -> Self {
        Vec2::new(self.x.s_curve_c1(), self.y.s_curve_c1())
    }

    #[inline]
    fn s_curve_c2(self) -> Self {
        Vec2::new(self.x.s_curve_c2(), self.y.s_curve_c2())
    }
}

impl Ease for Vec3A {
    #[inline]
    fn s_curve_c1(self) -> Self {
        Vec3A::new(self.x.s_curve_c1(), self.y.s_curve_c1(), self.z.s_curve_c1())
    }

    #[inline]
    fn s_curve_c2(self) -> Self {
        Vec3A::new(self.x.s_curve_c2(), self.y.s_curve_c2(), self.z.s_curve_c2())
    }
}

/// Cubic ease (C1 continuous).
#[inline]
pub fn s_curve_c1<F: Ease>(t: F) -> F {
    t.s_curve_c1()
}

/// Quintic ease (C2 continuous).
#[inline]
pub fn s_curve_c2<F: Ease>(t: F) -> F {
    t.s_curve_c2()
}

/// Value noise in [0, 1]: hashes the four lattice corners around `p` and blends
/// them with the quintic curve.
pub fn lattice_noise(p: Vec2, seed: u32) -> f32 {
    let cell = p.floor();
    let local = (p - cell).s_curve_c2();

    let a = hash(cell, seed);
    let b = hash(cell + Vec2::X, seed);
    let c = hash(cell + Vec2::Y, seed);
    let d = hash(cell + Vec2::ONE, seed);

    bilinear_interpolation(a, b, c, d, local)
}
