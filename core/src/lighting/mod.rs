// ============================================================================
// Lighting Module
// ============================================================================
//
// Fixed-function style multi-light illumination:
// - light: Light slots and the fixed 8-slot LightTable
// - material: per-draw Material
// - illuminate: attenuation, spotlight cone and clamp-then-add accumulation
// - tests: behavior of the accumulation rules

mod illuminate;
mod light;
mod material;


pub use illuminate::{
    distance_attenuation, illuminate, light_contribution, reflect, saturate, spot_attenuation,
    LightContribution, SPECULAR_EXPONENT_SCALE,
};
pub use light::{spot_cos_cutoff_from_degrees, Light, LightTable};
pub use material::Material;
