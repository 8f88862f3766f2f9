use glam::{Vec2, Vec3};
use skinlight_shared::{MAX_JOINT_INFLUENCES, VertexDesc};

use crate::skinning::SkinBinding;

/// One entry of the per-vertex attribute stream
///
/// Skin attributes are floats, as a float-only vertex stream delivers them;
/// [`VertexAttributes::binding`] truncates them into a [`SkinBinding`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexAttributes {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub joint_count: f32,
    pub joint_indices: [f32; MAX_JOINT_INFLUENCES],
    pub joint_weights: [f32; MAX_JOINT_INFLUENCES],
    pub tangent: Option<Vec3>,
    pub bitangent: Option<Vec3>,
}

impl Default for VertexAttributes {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

impl VertexAttributes {
    /// Unskinned vertex without uv or tangent frame
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            uv: Vec2::ZERO,
            joint_count: 0.0,
            joint_indices: [0.0; MAX_JOINT_INFLUENCES],
            joint_weights: [0.0; MAX_JOINT_INFLUENCES],
            tangent: None,
            bitangent: None,
        }
    }

    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_skin(
        mut self,
        joint_count: f32,
        joint_indices: [f32; MAX_JOINT_INFLUENCES],
        joint_weights: [f32; MAX_JOINT_INFLUENCES],
    ) -> Self {
        self.joint_count = joint_count;
        self.joint_indices = joint_indices;
        self.joint_weights = joint_weights;
        self
    }

    pub fn with_tangent_frame(mut self, tangent: Vec3, bitangent: Vec3) -> Self {
        self.tangent = Some(tangent);
        self.bitangent = Some(bitangent);
        self
    }

    /// Skin binding after float -> integer truncation
    #[inline]
    pub fn binding(&self) -> SkinBinding {
        SkinBinding::from_attributes(self.joint_count, self.joint_indices, self.joint_weights)
    }
}

impl From<&VertexDesc> for VertexAttributes {
    fn from(desc: &VertexDesc) -> Self {
        Self {
            position: Vec3::from_array(desc.position),
            normal: Vec3::from_array(desc.normal),
            uv: Vec2::from_array(desc.uv),
            joint_count: desc.joint_count,
            joint_indices: desc.joint_indices,
            joint_weights: desc.joint_weights,
            tangent: desc.tangent.map(Vec3::from_array),
            bitangent: desc.bitangent.map(Vec3::from_array),
        }
    }
}
