//! Vertex passes over a frame snapshot
//!
//! The lighting, depth and shadow passes each run one independent
//! invocation per vertex. Skinning is shared: every pass blends the vertex
//! through the same [`skin`] call before its own projection math.
//!
//! The batch entry points fan the invocations out over rayon and return
//! results in input order.

use glam::{Mat4, Vec2, Vec3, Vec4};
use rayon::prelude::*;

use crate::frame::FrameSnapshot;
use crate::lighting::illuminate;
use crate::shadow::{
    compute_visibility, depth_bias_mvp, encode_depth, shadow_coord, shadow_intensity,
    DepthSampler, PackedDepth, ShadowSample,
};
use crate::skinning::{skin, Skinned};
use crate::vertex::VertexAttributes;

// ============================================================================
// Lighting Pass
// ============================================================================

/// Output of one lighting-pass invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LitVertex {
    pub clip_position: Vec4,
    /// Eye-space position after the homogeneous divide
    pub eye_position: Vec3,
    /// Eye-space unit normal
    pub normal: Vec3,
    pub color: Vec4,
    pub uv: Vec2,
    /// Only produced when the frame has a normal texture and the vertex a tangent
    pub tangent: Option<Vec3>,
    pub bitangent: Option<Vec3>,
}

fn skin_vertex(frame: &FrameSnapshot, vertex: &VertexAttributes) -> Skinned {
    skin(
        vertex.position,
        vertex.normal,
        &vertex.binding(),
        &frame.joints,
        frame.skinning_enabled,
    )
}

#[inline]
fn eye_direction(normal_matrix: Mat4, direction: Vec3) -> Vec3 {
    (normal_matrix * direction.extend(0.0)).truncate().normalize()
}

/// Skin, project and light one vertex
pub fn lighting_vertex(frame: &FrameSnapshot, vertex: &VertexAttributes) -> LitVertex {
    let skinned = skin_vertex(frame, vertex);

    let clip_position = frame.mvp * skinned.position;
    let eye = frame.model_view * skinned.position;
    let eye_position = eye.truncate() / eye.w;
    let normal = eye_direction(frame.normal_matrix, skinned.normal);

    let color = illuminate(
        eye_position,
        normal,
        &frame.material,
        &frame.lights,
        frame.scene_color,
        frame.effect_color_mul,
    );

    let tangent_frame = |direction: Option<Vec3>| {
        direction
            .filter(|_| frame.normal_texture_available)
            .map(|d| eye_direction(frame.normal_matrix, d))
    };

    LitVertex {
        clip_position,
        eye_position,
        normal,
        color,
        uv: vertex.uv,
        tangent: tangent_frame(vertex.tangent),
        bitangent: tangent_frame(vertex.bitangent),
    }
}

/// Lighting pass over a vertex stream
pub fn shade_vertices(frame: &FrameSnapshot, vertices: &[VertexAttributes]) -> Vec<LitVertex> {
    tracing::debug!(count = vertices.len(), "Lighting pass");
    vertices
        .par_iter()
        .map(|vertex| lighting_vertex(frame, vertex))
        .collect()
}

// ============================================================================
// Depth Pass
// ============================================================================

/// Output of one depth-pass invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthVertex {
    pub clip_position: Vec4,
    /// `clip_position.z` packed for an RGBA8 target
    pub packed: PackedDepth,
}

/// Skin and project one vertex, packing its clip-space depth
///
/// The packed value is taken from `clip.z` as-is, without a perspective
/// divide.
pub fn depth_vertex(frame: &FrameSnapshot, vertex: &VertexAttributes) -> DepthVertex {
    let skinned = skin_vertex(frame, vertex);
    let clip_position = frame.mvp * skinned.position;

    DepthVertex {
        clip_position,
        packed: encode_depth(clip_position.z),
    }
}

/// Depth pass over a vertex stream
pub fn depth_vertices(frame: &FrameSnapshot, vertices: &[VertexAttributes]) -> Vec<DepthVertex> {
    tracing::debug!(count = vertices.len(), "Depth pass");
    vertices
        .par_iter()
        .map(|vertex| depth_vertex(frame, vertex))
        .collect()
}

// ============================================================================
// Shadow Pass
// ============================================================================

/// Light-side parameters of the shadow pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSetup {
    /// `BIAS * light_projection * light_model_view`
    pub depth_bias_mvp: Mat4,
    /// Light position in object space, homogeneous
    pub light_position: Vec4,
}

impl ShadowSetup {
    pub fn new(light_projection: Mat4, light_model_view: Mat4, light_position: Vec4) -> Self {
        Self {
            depth_bias_mvp: depth_bias_mvp(light_projection, light_model_view),
            light_position,
        }
    }
}

/// Output of one shadow-pass vertex invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowVertex {
    pub clip_position: Vec4,
    pub sample: ShadowSample,
}

/// Skin and project one vertex into camera and light space
pub fn shadow_vertex(
    frame: &FrameSnapshot,
    setup: &ShadowSetup,
    vertex: &VertexAttributes,
) -> ShadowVertex {
    let skinned = skin_vertex(frame, vertex);

    ShadowVertex {
        clip_position: frame.mvp * skinned.position,
        sample: ShadowSample {
            shadow_coord: shadow_coord(setup.depth_bias_mvp, skinned.position.truncate()),
            shadow_intensity: shadow_intensity(
                frame.model_view,
                setup.light_position,
                frame.normal_matrix,
                skinned.normal,
            ),
        },
    }
}

/// Shadow pass vertex stage over a vertex stream
pub fn shadow_vertices(
    frame: &FrameSnapshot,
    setup: &ShadowSetup,
    vertices: &[VertexAttributes],
) -> Vec<ShadowVertex> {
    tracing::debug!(count = vertices.len(), "Shadow pass");
    vertices
        .par_iter()
        .map(|vertex| shadow_vertex(frame, setup, vertex))
        .collect()
}

/// Filter every shadow vertex against a depth map, one darkening alpha each
pub fn shadow_alphas<S: DepthSampler + Sync + ?Sized>(
    shadow_vertices: &[ShadowVertex],
    depth_map: &S,
    pixel_width: f32,
    pixel_height: f32,
) -> Vec<f32> {
    shadow_vertices
        .par_iter()
        .map(|vertex| compute_visibility(&vertex.sample, depth_map, pixel_width, pixel_height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::{Light, LightTable, Material};
    use crate::shadow::{decode_depth, DepthMap};
    use crate::skinning::JointTable;

    fn lit_frame() -> FrameSnapshot {
        FrameSnapshot {
            lights: LightTable::from_lights(&[Light::point(Vec3::new(0.0, 0.0, 10.0))]).unwrap(),
            material: Material {
                diffuse: Vec4::ONE,
                ..Material::default()
            },
            ..FrameSnapshot::default()
        }
    }

    #[test]
    fn test_overhead_light_end_to_end() {
        let frame = lit_frame();
        let out = lighting_vertex(&frame, &VertexAttributes::new(Vec3::ZERO, Vec3::Z));

        assert_eq!(out.clip_position, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(out.normal, Vec3::Z);
        // diffuse 1 plus the (0, 0, 0, 1) ambient and specular terms
        assert!(out.color.truncate().abs_diff_eq(Vec3::ONE, 1e-6));
        assert_eq!(out.color.w, 1.0);
    }

    #[test]
    fn test_normal_is_normalized_in_eye_space() {
        let mut frame = lit_frame();
        frame.set_camera(Mat4::IDENTITY, Mat4::from_scale(Vec3::splat(3.0)));

        let out = lighting_vertex(&frame, &VertexAttributes::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)));
        assert!(out.normal.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_skinning_moves_lit_vertex() {
        let frame = FrameSnapshot {
            joints: JointTable::from_matrices(&[Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))])
                .unwrap(),
            skinning_enabled: true,
            ..lit_frame()
        };
        let vertex = VertexAttributes::new(Vec3::ZERO, Vec3::Z)
            .with_skin(1.0, [0.0; 4], [1.0, 0.0, 0.0, 0.0]);

        let out = lighting_vertex(&frame, &vertex);
        assert_eq!(out.eye_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(out.clip_position, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_tangent_frame_gated() {
        let vertex = VertexAttributes::new(Vec3::ZERO, Vec3::Z)
            .with_tangent_frame(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0));

        let mut frame = lit_frame();
        let out = lighting_vertex(&frame, &vertex);
        assert!(out.tangent.is_none());
        assert!(out.bitangent.is_none());

        frame.normal_texture_available = true;
        let out = lighting_vertex(&frame, &vertex);
        assert_eq!(out.tangent, Some(Vec3::X));
        assert_eq!(out.bitangent, Some(Vec3::Y));

        // missing tangents stay missing
        let bare = lighting_vertex(&frame, &VertexAttributes::new(Vec3::ZERO, Vec3::Z));
        assert!(bare.tangent.is_none());
    }

    #[test]
    fn test_depth_vertex_packs_clip_z() {
        let projection = Mat4::orthographic_rh_gl(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0);
        let frame = FrameSnapshot::with_camera(projection, Mat4::IDENTITY);

        // z = -5 is the middle of the depth range, clip z = 0
        let out = depth_vertex(&frame, &VertexAttributes::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z));
        assert!(out.clip_position.z.abs() < 1e-6);
        assert!(decode_depth(out.packed).abs() < 1e-5);
    }

    #[test]
    fn test_batches_preserve_order() {
        let frame = lit_frame();
        let vertices: Vec<VertexAttributes> = (0..1000)
            .map(|i| VertexAttributes::new(Vec3::new(i as f32, 0.0, -1.0), Vec3::Z))
            .collect();

        let lit = shade_vertices(&frame, &vertices);
        let depth = depth_vertices(&frame, &vertices);
        assert_eq!(lit.len(), vertices.len());
        for (i, (lit, depth)) in lit.iter().zip(depth.iter()).enumerate() {
            assert_eq!(lit.eye_position.x, i as f32);
            assert_eq!(depth.clip_position.x, i as f32);
            assert_eq!(*lit, lighting_vertex(&frame, &vertices[i]));
        }
    }

    #[test]
    fn test_shadow_pass_over_floor() {
        // light straight above, looking down at a floor at y = 0
        let light_projection = Mat4::orthographic_rh_gl(-4.0, 4.0, -4.0, 4.0, 0.0, 20.0);
        let light_view = Mat4::look_at_rh(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::NEG_Z);
        let setup = ShadowSetup::new(light_projection, light_view, Vec4::new(0.0, 10.0, 0.0, 1.0));

        let frame = FrameSnapshot::default();
        let vertices = [
            VertexAttributes::new(Vec3::ZERO, Vec3::Y),
            VertexAttributes::new(Vec3::ZERO, Vec3::NEG_Y),
        ];
        let shadowed = shadow_vertices(&frame, &setup, &vertices);

        assert!(shadowed[0].sample.shadow_coord.abs_diff_eq(Vec4::new(0.5, 0.5, 0.5, 1.0), 1e-5));
        assert_eq!(shadowed[0].sample.shadow_intensity, 1.0);
        assert!(shadowed[1].sample.shadow_intensity.abs() < 1e-6);

        // occluder closer to the light than the floor
        let occluded = DepthMap::filled(16, 16, 0.25).unwrap();
        let texel = occluded.texel_size();
        let alphas = shadow_alphas(&shadowed, &occluded, texel.x, texel.y);
        assert!((alphas[0] - 0.3).abs() < 1e-6);
        assert!(alphas[1].abs() < 1e-6);

        let open = DepthMap::filled(16, 16, 1.0).unwrap();
        assert_eq!(shadow_alphas(&shadowed, &open, texel.x, texel.y), vec![0.0, 0.0]);
    }
}
