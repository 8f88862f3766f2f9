use glam::{Vec3, Vec4};
use skinlight_shared::MAX_LIGHTS;

use crate::error::{Result, ShadeError};

/// One light slot
///
/// Positions are eye-space and homogeneous; only `xyz` takes part in the
/// lighting math. `spot_cos_cutoff` is the cosine of the cone half-angle,
/// so -1 means an unrestricted (omnidirectional) light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub enabled: bool,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub position: Vec4,
    pub spot_direction: Vec3,
    pub spot_exponent: f32,
    pub spot_cos_cutoff: f32,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl Default for Light {
    /// Disabled white light at the eye, no cone, no falloff
    fn default() -> Self {
        Self {
            enabled: false,
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            position: Vec4::ZERO,
            spot_direction: Vec3::NEG_Z,
            spot_exponent: 0.0,
            spot_cos_cutoff: spot_cos_cutoff_from_degrees(180.0),
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
        }
    }
}

impl Light {
    /// Enabled point light at an eye-space position with default colors
    pub fn point(position: Vec3) -> Self {
        Self {
            enabled: true,
            position: position.extend(1.0),
            ..Self::default()
        }
    }

    /// Disabled slot
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Restrict the light to a cone of `degrees` half-angle around `direction`
    pub fn with_spot(mut self, direction: Vec3, degrees: f32, exponent: f32) -> Self {
        self.spot_direction = direction;
        self.spot_cos_cutoff = spot_cos_cutoff_from_degrees(degrees);
        self.spot_exponent = exponent;
        self
    }

    pub fn with_attenuation(mut self, constant: f32, linear: f32, quadratic: f32) -> Self {
        self.constant_attenuation = constant;
        self.linear_attenuation = linear;
        self.quadratic_attenuation = quadratic;
        self
    }

    pub fn with_colors(mut self, ambient: Vec4, diffuse: Vec4, specular: Vec4) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }
}

/// Cone half-angle in degrees -> cosine cutoff
#[inline]
pub fn spot_cos_cutoff_from_degrees(degrees: f32) -> f32 {
    (std::f32::consts::PI / 180.0 * degrees).cos()
}

/// Fixed table of [`MAX_LIGHTS`] light slots
///
/// Slots are never removed; turning a light off clears its `enabled` flag.
/// Iteration is always in slot order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightTable {
    slots: [Light; MAX_LIGHTS],
}

impl LightTable {
    /// All slots disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill slots `0..lights.len()` in order; remaining slots stay disabled
    pub fn from_lights(lights: &[Light]) -> Result<Self> {
        if lights.len() > MAX_LIGHTS {
            return Err(ShadeError::TooManyLights {
                count: lights.len(),
                max: MAX_LIGHTS,
            });
        }

        let mut table = Self::default();
        table.slots[..lights.len()].copy_from_slice(lights);
        Ok(table)
    }

    /// Replace a slot
    pub fn set(&mut self, slot: usize, light: Light) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(ShadeError::LightSlotOutOfRange {
                slot,
                max: MAX_LIGHTS,
            })?;
        *entry = light;
        Ok(())
    }

    /// Toggle a slot without touching its parameters
    pub fn set_enabled(&mut self, slot: usize, enabled: bool) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(ShadeError::LightSlotOutOfRange {
                slot,
                max: MAX_LIGHTS,
            })?;
        entry.enabled = enabled;
        Ok(())
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Light> {
        self.slots.get(slot)
    }

    /// All slots, enabled or not
    #[inline]
    pub fn slots(&self) -> &[Light; MAX_LIGHTS] {
        &self.slots
    }

    /// Enabled lights with their slot index, in slot order
    pub fn enabled(&self) -> impl Iterator<Item = (usize, &Light)> {
        self.slots.iter().enumerate().filter(|(_, l)| l.enabled)
    }

    /// Check the attenuation precondition of every enabled light
    ///
    /// The illumination stage divides by `c + l*d + q*d^2` unguarded; a
    /// positive constant term keeps that denominator away from zero for
    /// non-negative linear and quadratic terms.
    pub fn validate(&self) -> Result<()> {
        for (slot, light) in self.enabled() {
            if light.constant_attenuation.is_nan() || light.constant_attenuation <= 0.0 {
                return Err(ShadeError::DegenerateAttenuation {
                    slot,
                    constant: light.constant_attenuation,
                });
            }
        }
        Ok(())
    }
}
