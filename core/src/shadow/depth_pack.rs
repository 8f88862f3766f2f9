//! Base-256 depth packing
//!
//! A normalized depth in [0, 1) is spread over four channels so it
//! survives a trip through an 8-bit-per-channel color target. Channel `w`
//! holds the coarsest digit, channel `x` the finest. Decoding is the
//! weighted sum of the channels.

use bytemuck::{Pod, Zeroable};
use glam::{DVec4, Vec4};

const SHIFT: Vec4 = Vec4::new(256.0 * 256.0 * 256.0, 256.0 * 256.0, 256.0, 1.0);
const CARRY_MASK: Vec4 = Vec4::new(0.0, 1.0 / 256.0, 1.0 / 256.0, 1.0 / 256.0);
const UNSHIFT: DVec4 = DVec4::new(
    1.0 / (256.0 * 256.0 * 256.0),
    1.0 / (256.0 * 256.0),
    1.0 / 256.0,
    1.0,
);

/// Four base-256 digits of a unit depth, each in [0, 1)
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
pub struct PackedDepth(pub Vec4);

impl PackedDepth {
    #[inline]
    pub fn components(&self) -> Vec4 {
        self.0
    }

    /// Quantize to an RGBA8 texel (unorm8, round to nearest)
    pub fn to_rgba8(&self) -> [u8; 4] {
        let scaled = (self.0.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        [
            scaled.x as u8,
            scaled.y as u8,
            scaled.z as u8,
            scaled.w as u8,
        ]
    }

    /// Expand an RGBA8 texel back to unorm components
    pub fn from_rgba8(texel: [u8; 4]) -> Self {
        Self(Vec4::new(
            texel[0] as f32,
            texel[1] as f32,
            texel[2] as f32,
            texel[3] as f32,
        ) / 255.0)
    }
}

/// Pack a clip-space depth in [-1, 1]
///
/// Remaps to `d = (x + 1) / 2` first. `x = 1` gives `d = 1`, which wraps
/// to an all-zero sample.
#[inline]
pub fn encode_depth(normalized_distance: f32) -> PackedDepth {
    pack_unit_depth((normalized_distance + 1.0) / 2.0)
}

/// Pack a depth already in [0, 1)
pub fn pack_unit_depth(depth: f32) -> PackedDepth {
    let scaled = SHIFT * depth;
    let comp = scaled - scaled.floor();
    let carry = Vec4::new(comp.x, comp.x, comp.y, comp.z) * CARRY_MASK;
    PackedDepth(comp - carry)
}

/// Inverse of [`pack_unit_depth`]
///
/// Accumulates in f64 so the channel sum does not lose the low digits.
#[inline]
pub fn unpack_unit_depth(packed: PackedDepth) -> f32 {
    packed.0.as_dvec4().dot(UNSHIFT) as f32
}

/// Inverse of [`encode_depth`], back to [-1, 1]
#[inline]
pub fn decode_depth(packed: PackedDepth) -> f32 {
    unpack_unit_depth(packed) * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const UNIT_EPSILON: f32 = 1.0 / (256.0 * 256.0 * 256.0);

    #[test]
    fn test_roundtrip_random_depths() {
        let mut rng = StdRng::seed_from_u64(0x5eed_d3b7);

        for _ in 0..10_000 {
            let x = rng.random::<f32>() * 2.0 - 1.0;
            let expected = (x + 1.0) / 2.0;
            if expected >= 1.0 {
                continue;
            }

            let decoded = unpack_unit_depth(encode_depth(x));
            assert!(
                (decoded - expected).abs() <= UNIT_EPSILON,
                "x = {} decoded to {}, expected {}",
                x,
                decoded,
                expected
            );
        }
    }

    #[test]
    fn test_components_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1_000 {
            let packed = pack_unit_depth(rng.random::<f32>());
            let c = packed.components();
            assert!(c.cmpge(Vec4::ZERO).all() && c.cmplt(Vec4::ONE).all(), "{:?}", c);
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(encode_depth(-1.0), PackedDepth(Vec4::ZERO));

        // d = 0.5 lives entirely in the coarsest digit
        let half = encode_depth(0.0);
        assert_eq!(half.components(), Vec4::new(0.0, 0.0, 0.0, 0.5));
        assert_eq!(decode_depth(half), 0.0);
    }

    #[test]
    fn test_far_plane_wraps_to_zero() {
        assert_eq!(encode_depth(1.0), PackedDepth(Vec4::ZERO));
        assert_eq!(unpack_unit_depth(encode_depth(1.0)), 0.0);
    }

    #[test]
    fn test_rgba8() {
        let packed = PackedDepth(Vec4::new(0.0, 0.5, 1.0, 0.25));
        assert_eq!(packed.to_rgba8(), [0, 128, 255, 64]);

        let texel = [10, 20, 30, 255];
        assert_eq!(PackedDepth::from_rgba8(texel).to_rgba8(), texel);
    }

    #[test]
    fn test_rgba8_precision() {
        // digits are multiples of 1/256, so 8-bit storage keeps the coarse value close
        let depth = 0.123_456;
        let stored = PackedDepth::from_rgba8(pack_unit_depth(depth).to_rgba8());
        assert!((unpack_unit_depth(stored) - depth).abs() < 1.0 / 256.0);
    }
}
