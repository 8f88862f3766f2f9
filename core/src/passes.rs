//! Unlit helper passes: point-sprite particles and plain textured geometry

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Output of the particle vertex stage
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleVertex {
    pub clip_position: Vec4,
    pub color: Vec4,
    /// Rasterized point size, shrinking with eye-space distance
    pub point_size: f32,
}

/// Project a particle and size its point sprite
///
/// `point_size / |model_view * p|`, measured on the eye-space `xyz`. A
/// particle at the eye gets an infinite size.
pub fn particle_vertex(
    mvp: Mat4,
    model_view: Mat4,
    position: Vec3,
    color: Vec4,
    point_size: f32,
) -> ParticleVertex {
    let homogeneous = position.extend(1.0);
    let distance = (model_view * homogeneous).truncate().length();

    ParticleVertex {
        clip_position: mvp * homogeneous,
        color,
        point_size: point_size * (1.0 / distance),
    }
}

/// Output of the transform-only vertex stage
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformedVertex {
    pub clip_position: Vec4,
    pub uv: Vec2,
    /// Always opaque white
    pub color: Vec4,
}

pub fn transform_vertex(mvp: Mat4, position: Vec3, uv: Vec2) -> TransformedVertex {
    TransformedVertex {
        clip_position: mvp * position.extend(1.0),
        uv,
        color: Vec4::ONE,
    }
}

/// Modulate a diffuse texel by the interpolated vertex color
#[inline]
pub fn textured_fragment(texel: Vec4, color: Vec4) -> Vec4 {
    texel * color
}
