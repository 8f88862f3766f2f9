use glam::{Mat4, Vec3, Vec4};

/// Clip space [-1, 1] to texture space [0, 1] on every axis
pub const BIAS_MATRIX: Mat4 = Mat4::from_cols_array(&[
    0.5, 0.0, 0.0, 0.0, //
    0.0, 0.5, 0.0, 0.0, //
    0.0, 0.0, 0.5, 0.0, //
    0.5, 0.5, 0.5, 1.0,
]);

/// `BIAS * light_projection * light_model_view`
#[inline]
pub fn depth_bias_mvp(light_projection: Mat4, light_model_view: Mat4) -> Mat4 {
    BIAS_MATRIX * light_projection * light_model_view
}

/// Light-space texture coordinate of an object-space position
///
/// The result is divided by `w`. A zero `w` yields `Vec4::ZERO`, which the
/// shadow filter treats as "outside the light frustum".
pub fn shadow_coord(depth_bias_mvp: Mat4, position: Vec3) -> Vec4 {
    let coord = depth_bias_mvp * position.extend(1.0);
    if coord.w == 0.0 {
        Vec4::ZERO
    } else {
        coord / coord.w
    }
}

/// How strongly a vertex should be darkened by the shadow filter
///
/// `1 - clamp(dot(normalize(origin - light), n), 0, 1)` with the object
/// origin and `light_position` both taken to eye space through
/// `model_view`, and `n = normal_matrix * normal`. The normal is not
/// renormalized, so a scaled normal matrix scales the facing term.
pub fn shadow_intensity(
    model_view: Mat4,
    light_position: Vec4,
    normal_matrix: Mat4,
    normal: Vec3,
) -> f32 {
    let eye_origin = model_view * Vec4::W;
    let eye_light = model_view * light_position;
    let origin = eye_origin.truncate() / eye_origin.w;
    let light = eye_light.truncate() / eye_light.w;

    let eye_normal = (normal_matrix * normal.extend(0.0)).truncate();
    let facing = (origin - light).normalize().dot(eye_normal);

    1.0 - facing.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_matrix_maps_clip_cube() {
        let low = BIAS_MATRIX * Vec4::new(-1.0, -1.0, -1.0, 1.0);
        let high = BIAS_MATRIX * Vec4::ONE;
        assert_eq!(low, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(high, Vec4::ONE);
    }

    #[test]
    fn test_shadow_coord_orthographic() {
        let projection = Mat4::orthographic_rh_gl(-2.0, 2.0, -2.0, 2.0, 0.0, 20.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::NEG_Z);
        let mvp = depth_bias_mvp(projection, view);

        // origin is 10 units from the light: halfway through the depth range
        let coord = shadow_coord(mvp, Vec3::ZERO);
        assert!(coord.abs_diff_eq(Vec4::new(0.5, 0.5, 0.5, 1.0), 1e-5), "{:?}", coord);
    }

    #[test]
    fn test_shadow_coord_zero_w() {
        // a projection whose w row is zero for the origin
        let mut degenerate = Mat4::IDENTITY;
        degenerate.w_axis.w = 0.0;
        assert_eq!(shadow_coord(degenerate, Vec3::ZERO), Vec4::ZERO);
    }

    #[test]
    fn test_shadow_intensity_range() {
        let model_view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let light = Vec4::new(0.0, 10.0, 0.0, 1.0);

        // origin - light points down; a normal along it gets intensity 0
        let down = shadow_intensity(model_view, light, Mat4::IDENTITY, Vec3::NEG_Y);
        assert!(down.abs() < 1e-6);

        // an upward normal gets the maximum intensity
        let up = shadow_intensity(model_view, light, Mat4::IDENTITY, Vec3::Y);
        assert_eq!(up, 1.0);

        // perpendicular normal sits at 1 as well
        let side = shadow_intensity(model_view, light, Mat4::IDENTITY, Vec3::X);
        assert!((side - 1.0).abs() < 1e-6);
    }
}
