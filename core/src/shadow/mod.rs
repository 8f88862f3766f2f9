// ============================================================================
// Shadow Module
// ============================================================================
//
// Two halves of shadow mapping:
// - depth_pack: depth pass output, a unit depth spread over four channels
// - projection: light-space coordinates and per-vertex shadow intensity
// - depth_map: the sampled depth texture behind the DepthSampler seam
// - pcf: 4x4 percentage-closer filter producing a darkening alpha

mod depth_map;
mod depth_pack;
mod pcf;
mod projection;

pub use depth_map::{DepthMap, DepthSampler};
pub use depth_pack::{decode_depth, encode_depth, pack_unit_depth, unpack_unit_depth, PackedDepth};
pub use pcf::{
    blend_shadow, compute_visibility, lookup_offsets, shadow_fragment, ShadowSample, DEPTH_BIAS,
    OCCLUDED_SAMPLE_ALPHA,
};
pub use projection::{depth_bias_mvp, shadow_coord, shadow_intensity, BIAS_MATRIX};
