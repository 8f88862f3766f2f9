//! Per-frame shading parameters
//!
//! A [`FrameSnapshot`] is assembled once per draw and then only read.
//! Every vertex invocation of a pass borrows the same snapshot, so it is
//! shared across worker threads without synchronization.

use glam::{Mat4, Vec4};

use crate::error::Result;
use crate::lighting::{LightTable, Material};
use crate::skinning::JointTable;
use crate::vertex::VertexAttributes;

/// Immutable inputs of the lighting and depth passes
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Object to clip space
    pub mvp: Mat4,
    /// Object to eye space
    pub model_view: Mat4,
    /// Transforms normals to eye space (inverse transpose of `model_view`)
    pub normal_matrix: Mat4,
    pub joints: JointTable,
    pub lights: LightTable,
    pub material: Material,
    pub scene_color: Vec4,
    pub effect_color_mul: Vec4,
    pub skinning_enabled: bool,
    /// Enables the tangent frame outputs of the lighting pass
    pub normal_texture_available: bool,
    /// Carried for the fragment stage; no vertex math reads it
    pub displacement_texture_available: bool,
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            mvp: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
            joints: JointTable::default(),
            lights: LightTable::default(),
            material: Material::default(),
            scene_color: Vec4::ZERO,
            effect_color_mul: Vec4::ONE,
            skinning_enabled: false,
            normal_texture_available: false,
            displacement_texture_available: false,
        }
    }
}

impl FrameSnapshot {
    /// Snapshot with camera matrices derived from a projection and model-view
    pub fn with_camera(projection: Mat4, model_view: Mat4) -> Self {
        let mut frame = Self::default();
        frame.set_camera(projection, model_view);
        frame
    }

    /// Replace `mvp`, `model_view` and `normal_matrix` together
    pub fn set_camera(&mut self, projection: Mat4, model_view: Mat4) {
        self.mvp = projection * model_view;
        self.model_view = model_view;
        self.normal_matrix = normal_matrix(model_view);
    }

    /// Check the snapshot against a vertex stream before running a pass
    ///
    /// Rejects enabled lights with a non-positive constant attenuation and,
    /// when skinning is on, vertices that reference joints past the end of
    /// the joint table.
    pub fn validate(&self, vertices: &[VertexAttributes]) -> Result<()> {
        self.lights.validate()?;

        for (index, vertex) in vertices.iter().enumerate() {
            let binding = vertex.binding();
            if self.skinning_enabled {
                binding.validate(index, &self.joints)?;
            } else if let Some((_, joint)) = binding.first_invalid_influence(&self.joints) {
                tracing::warn!(
                    vertex = index,
                    joint,
                    "Joint index out of range, ignored because skinning is disabled"
                );
            }
        }

        Ok(())
    }
}

/// Inverse transpose of `model_view`
///
/// Singular matrices produce non-finite entries rather than an error.
#[inline]
pub fn normal_matrix(model_view: Mat4) -> Mat4 {
    model_view.inverse().transpose()
}
