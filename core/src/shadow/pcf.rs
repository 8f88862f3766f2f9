//! 4x4 percentage-closer filtering
//!
//! The filter does not produce a light factor. It produces the alpha of a
//! black fragment that is blended over the lit scene, so 0 leaves the
//! scene untouched and larger values darken it.

use glam::{Vec2, Vec4};
use skinlight_shared::SHADOWMAP_LOOKUPS;

use super::depth_map::DepthSampler;

/// Darkening added by each occluded lookup
pub const OCCLUDED_SAMPLE_ALPHA: f32 = 0.3;

/// Offset added to the fragment depth before comparison
pub const DEPTH_BIAS: f32 = 0.0;

const TOTAL_LOOKUPS: f32 = (SHADOWMAP_LOOKUPS * SHADOWMAP_LOOKUPS) as f32;

/// Per-fragment input of the shadow filter
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShadowSample {
    /// Light-space texture coordinate (xy) and depth (z); `w == 0` marks
    /// a vertex outside the light frustum
    pub shadow_coord: Vec4,
    /// Scales the filtered darkness, in [0, 1]
    pub shadow_intensity: f32,
}

/// Lookup offsets along one axis in texel units: -1.75, -0.75, 0.25, 1.25
pub fn lookup_offsets() -> impl Iterator<Item = f32> {
    let start = (-(SHADOWMAP_LOOKUPS as f32) + 0.5) / 2.0;
    (0..SHADOWMAP_LOOKUPS).map(move |i| start + i as f32)
}

/// Darkening alpha for one fragment
pub fn compute_visibility<S: DepthSampler + ?Sized>(
    sample: &ShadowSample,
    depth_map: &S,
    pixel_width: f32,
    pixel_height: f32,
) -> f32 {
    let coord = sample.shadow_coord;
    if coord.w == 0.0 {
        return 0.0;
    }

    let texel = Vec2::new(pixel_width, pixel_height);
    let mut shadow = 0.0;
    for y in lookup_offsets() {
        for x in lookup_offsets() {
            let uv = coord.truncate().truncate() + Vec2::new(x, y) * texel;
            if depth_map.sample(uv).x < coord.z + DEPTH_BIAS {
                shadow += OCCLUDED_SAMPLE_ALPHA;
            }
        }
    }

    shadow / TOTAL_LOOKUPS * sample.shadow_intensity
}

/// Fragment written by the shadow pass: black with the darkening alpha
pub fn shadow_fragment<S: DepthSampler + ?Sized>(
    sample: &ShadowSample,
    depth_map: &S,
    pixel_width: f32,
    pixel_height: f32,
) -> Vec4 {
    Vec4::new(
        0.0,
        0.0,
        0.0,
        compute_visibility(sample, depth_map, pixel_width, pixel_height),
    )
}

/// Blend a shadow fragment over a lit color (`src_alpha`, `one_minus_src_alpha`)
pub fn blend_shadow(lit: Vec4, alpha: f32) -> Vec4 {
    let source = Vec4::new(0.0, 0.0, 0.0, alpha);
    source * alpha + lit * (1.0 - alpha)
}
