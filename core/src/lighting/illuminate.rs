use glam::{Vec3, Vec4};

use super::light::{Light, LightTable};
use super::material::Material;

/// The highlight exponent is `shininess` scaled by this factor
pub const SPECULAR_EXPONENT_SCALE: f32 = 0.3;

/// Clamped terms one light adds to the accumulated color
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightContribution {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
}

impl LightContribution {
    /// Sum of the three (already clamped) terms
    #[inline]
    pub fn total(&self) -> Vec4 {
        self.ambient + self.diffuse + self.specular
    }
}

/// Per-channel clamp to [0, 1]
#[inline]
pub fn saturate(color: Vec4) -> Vec4 {
    color.clamp(Vec4::ZERO, Vec4::ONE)
}

/// Reflect `incident` about `normal` (`I - 2 * dot(N, I) * N`)
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// `1 / (c + l*d + q*d^2)`, unguarded
#[inline]
pub fn distance_attenuation(light: &Light, distance: f32) -> f32 {
    1.0 / (light.constant_attenuation
        + light.linear_attenuation * distance
        + light.quadratic_attenuation * distance * distance)
}

/// Cone falloff: `spot_dot ^ exponent` inside the cone (boundary included), 0 outside
#[inline]
pub fn spot_attenuation(light: &Light, spot_dot: f32) -> f32 {
    if spot_dot >= light.spot_cos_cutoff {
        spot_dot.powf(light.spot_exponent)
    } else {
        0.0
    }
}

/// Contribution of a single light at an eye-space point
///
/// `normal` is expected to be unit length. The light's `enabled` flag is
/// not consulted here; [`illuminate`] does the skipping.
pub fn light_contribution(
    light: &Light,
    position: Vec3,
    normal: Vec3,
    material: &Material,
) -> LightContribution {
    let to_light = light.position.truncate() - position;
    let distance = to_light.length();
    let l = to_light.normalize();
    let e = (-position).normalize();
    let r = (-reflect(l, normal)).normalize();

    let spot_dot = (-l).dot(light.spot_direction.normalize());
    let attenuation = distance_attenuation(light, distance) * spot_attenuation(light, spot_dot);

    let lambert = normal.dot(l).max(0.0);
    let highlight = r
        .dot(e)
        .max(0.0)
        .powf(SPECULAR_EXPONENT_SCALE * material.shininess);

    LightContribution {
        ambient: saturate(light.ambient * material.ambient),
        diffuse: saturate(light.diffuse * material.diffuse * lambert * attenuation),
        specular: saturate(light.specular * material.specular * highlight * attenuation),
    }
}

/// Accumulate scene color, emission and every enabled light
///
/// Each term is clamped before it is added, never after. The result is
/// multiplied by `effect_color_mul` and its alpha replaced by
/// `material.diffuse.a * effect_color_mul.a`.
pub fn illuminate(
    position: Vec3,
    normal: Vec3,
    material: &Material,
    lights: &LightTable,
    scene_color: Vec4,
    effect_color_mul: Vec4,
) -> Vec4 {
    let mut color = saturate(scene_color) + saturate(material.emission);

    for (_, light) in lights.enabled() {
        color += light_contribution(light, position, normal, material).total();
    }

    color *= effect_color_mul;
    color.w = material.diffuse.w * effect_color_mul.w;
    color
}
