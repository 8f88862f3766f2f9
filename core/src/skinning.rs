//! Skeletal skinning
//!
//! Blends a vertex position and normal across up to four joints of a
//! fixed-capacity joint table. Weights are renormalized at blend time, so
//! bindings whose weights do not sum to one still land on the skeleton.

use glam::{Mat3, Mat4, Vec3, Vec4};
use skinlight_shared::{JointMatrix, MAX_JOINT_INFLUENCES, MAX_JOINTS};

use crate::error::{Result, ShadeError};

// ============================================================================
// Joint Transform Table
// ============================================================================

/// Read-only joint palette for one frame (bone space -> model space)
///
/// Storage is a fixed array of [`MAX_JOINTS`] matrices plus a length, so a
/// table never reallocates and every lookup is bounded.
#[derive(Clone, Debug, PartialEq)]
pub struct JointTable {
    matrices: [Mat4; MAX_JOINTS],
    len: usize,
}

impl Default for JointTable {
    fn default() -> Self {
        Self {
            matrices: [Mat4::IDENTITY; MAX_JOINTS],
            len: 0,
        }
    }
}

impl JointTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from joint transforms in joint-id order
    pub fn from_matrices(matrices: &[Mat4]) -> Result<Self> {
        if matrices.len() > MAX_JOINTS {
            return Err(ShadeError::TooManyJoints {
                count: matrices.len(),
                max: MAX_JOINTS,
            });
        }

        let mut table = Self::default();
        table.matrices[..matrices.len()].copy_from_slice(matrices);
        table.len = matrices.len();
        Ok(table)
    }

    /// Build a table from POD joint matrices (e.g. read back from an upload buffer)
    pub fn from_joint_matrices(matrices: &[JointMatrix]) -> Result<Self> {
        let converted: Vec<Mat4> = matrices
            .iter()
            .map(|m| Mat4::from_cols_array_2d(&m.cols))
            .collect();
        Self::from_matrices(&converted)
    }

    /// Convert to POD joint matrices for GPU upload
    pub fn to_joint_matrices(&self) -> Vec<JointMatrix> {
        self.as_slice()
            .iter()
            .map(|m| JointMatrix::from_cols(m.to_cols_array_2d()))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Joint transform by id, `None` past the end of the table
    #[inline]
    pub fn get(&self, joint: usize) -> Option<&Mat4> {
        self.as_slice().get(joint)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices[..self.len]
    }
}

// ============================================================================
// Vertex Skin Binding
// ============================================================================

/// Per-vertex joint influences
///
/// Only the first `joint_count` slots are read. Weights are used as given
/// and need not sum to one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkinBinding {
    pub joint_count: u8,
    pub joint_indices: [u16; MAX_JOINT_INFLUENCES],
    pub joint_weights: [f32; MAX_JOINT_INFLUENCES],
}

impl SkinBinding {
    /// Create a binding, clamping `joint_count` to [`MAX_JOINT_INFLUENCES`]
    pub fn new(
        joint_count: usize,
        joint_indices: [u16; MAX_JOINT_INFLUENCES],
        joint_weights: [f32; MAX_JOINT_INFLUENCES],
    ) -> Self {
        Self {
            joint_count: joint_count.min(MAX_JOINT_INFLUENCES) as u8,
            joint_indices,
            joint_weights,
        }
    }

    /// Single joint with full weight
    pub fn rigid(joint: u16) -> Self {
        Self::new(1, [joint, 0, 0, 0], [1.0, 0.0, 0.0, 0.0])
    }

    /// Create a binding from a float-only attribute stream
    ///
    /// See [`truncate_joint_count`] and [`truncate_joint_index`] for the
    /// conversion rules.
    pub fn from_attributes(
        joint_count: f32,
        joint_indices: [f32; MAX_JOINT_INFLUENCES],
        joint_weights: [f32; MAX_JOINT_INFLUENCES],
    ) -> Self {
        Self {
            joint_count: truncate_joint_count(joint_count),
            joint_indices: joint_indices.map(truncate_joint_index),
            joint_weights,
        }
    }

    /// Active `(joint, weight)` pairs in slot order
    pub fn influences(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.joint_indices
            .iter()
            .zip(self.joint_weights.iter())
            .take(self.joint_count as usize)
            .map(|(&joint, &weight)| (joint as usize, weight))
    }

    /// First active influence whose joint is missing from `joints`, as `(slot, joint)`
    pub fn first_invalid_influence(&self, joints: &JointTable) -> Option<(usize, usize)> {
        self.influences()
            .enumerate()
            .find(|(_, (joint, _))| *joint >= joints.len())
            .map(|(slot, (joint, _))| (slot, joint))
    }

    /// Reject a binding of vertex `vertex` that references joints missing from `joints`
    pub fn validate(&self, vertex: usize, joints: &JointTable) -> Result<()> {
        match self.first_invalid_influence(joints) {
            Some((influence, joint)) => Err(ShadeError::JointIndexOutOfRange {
                vertex,
                influence,
                joint,
                len: joints.len(),
            }),
            None => Ok(()),
        }
    }
}

/// Float attribute -> joint count
///
/// Truncates toward zero. NaN and negative values become 0; values above
/// [`MAX_JOINT_INFLUENCES`] become [`MAX_JOINT_INFLUENCES`].
#[inline]
pub fn truncate_joint_count(value: f32) -> u8 {
    (value as u8).min(MAX_JOINT_INFLUENCES as u8)
}

/// Float attribute -> joint index
///
/// Truncates toward zero. NaN and negative values become 0; values above
/// `u16::MAX` saturate.
#[inline]
pub fn truncate_joint_index(value: f32) -> u16 {
    value as u16
}

// ============================================================================
// Skinning
// ============================================================================

/// Skinned vertex: homogeneous position (w = 1) and unnormalized normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Skinned {
    pub position: Vec4,
    pub normal: Vec3,
}

/// Blend `position` and `normal` across the binding's joints
///
/// With skinning disabled the position is homogenized and the normal is
/// returned untouched. Otherwise each active influence contributes
/// `M * p * w` and `mat3(M) * n * w`, and both sums are rescaled by
/// `1 / total_weight` when the total is not exactly one. A total of zero
/// rescales by zero, collapsing the vertex to the origin.
///
/// Influences pointing past the end of `joints` are skipped, weight
/// included. Use [`SkinBinding::first_invalid_influence`] to reject such
/// bindings up front.
pub fn skin(
    position: Vec3,
    normal: Vec3,
    binding: &SkinBinding,
    joints: &JointTable,
    skinning_enabled: bool,
) -> Skinned {
    if !skinning_enabled {
        return Skinned {
            position: position.extend(1.0),
            normal,
        };
    }

    let homogeneous = position.extend(1.0);
    let mut skinned_position = Vec4::ZERO;
    let mut skinned_normal = Vec3::ZERO;
    let mut total_weight = 0.0f32;

    for (joint, weight) in binding.influences() {
        let Some(transform) = joints.get(joint) else {
            continue;
        };
        skinned_position += (*transform * homogeneous) * weight;
        skinned_normal += (Mat3::from_mat4(*transform) * normal) * weight;
        total_weight += weight;
    }

    if total_weight != 1.0 {
        let scale = if total_weight != 0.0 {
            1.0 / total_weight
        } else {
            0.0
        };
        skinned_position *= scale;
        skinned_normal *= scale;
    }

    skinned_position.w = 1.0;

    Skinned {
        position: skinned_position,
        normal: skinned_normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_table(len: usize) -> JointTable {
        JointTable::from_matrices(&vec![Mat4::IDENTITY; len]).unwrap()
    }

    #[test]
    fn test_disabled_is_identity() {
        let joints = JointTable::from_matrices(&[Mat4::from_translation(Vec3::X * 10.0)]).unwrap();
        let binding = SkinBinding::rigid(0);
        let inputs = [
            (Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 3.0, 4.0)),
            (Vec3::ZERO, Vec3::ZERO),
            (Vec3::new(-7.5, 0.25, 1e6), Vec3::new(1.0, 1.0, 1.0)),
        ];

        for (position, normal) in inputs {
            let out = skin(position, normal, &binding, &joints, false);
            assert_eq!(out.position, position.extend(1.0));
            assert_eq!(out.normal, normal);
        }
    }

    #[test]
    fn test_weight_renormalization_with_identity_joints() {
        let joints = identity_table(4);
        let position = Vec3::new(1.5, -2.0, 0.75);
        let normal = Vec3::new(0.0, 1.0, 0.0);

        let weight_sets = [
            [0.1, 0.1, 0.0, 0.0],
            [3.0, 5.0, 7.0, 11.0],
            [0.25, 0.0, 0.0, 0.0],
            [100.0, 0.001, 2.0, 0.5],
        ];

        for weights in weight_sets {
            let binding = SkinBinding::new(4, [0, 1, 2, 3], weights);
            let out = skin(position, normal, &binding, &joints, true);
            assert!(
                out.position.abs_diff_eq(position.extend(1.0), 1e-5),
                "weights {:?} gave {:?}",
                weights,
                out.position
            );
            assert!(out.normal.abs_diff_eq(normal, 1e-5));
        }
    }

    #[test]
    fn test_zero_weights_collapse_to_origin() {
        let joints = JointTable::from_matrices(&[
            Mat4::from_translation(Vec3::new(3.0, 4.0, 5.0)),
            Mat4::from_scale(Vec3::splat(2.0)),
        ])
        .unwrap();
        let binding = SkinBinding::new(2, [0, 1, 0, 0], [0.0; 4]);

        let out = skin(
            Vec3::new(9.0, 9.0, 9.0),
            Vec3::Y,
            &binding,
            &joints,
            true,
        );

        assert_eq!(out.position, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(out.normal, Vec3::ZERO);
    }

    #[test]
    fn test_zero_joint_count_collapses_to_origin() {
        let joints = identity_table(1);
        let binding = SkinBinding::new(0, [0; 4], [1.0; 4]);

        let out = skin(Vec3::ONE, Vec3::Z, &binding, &joints, true);
        assert_eq!(out.position, Vec4::W);
    }

    #[test]
    fn test_two_joint_blend() {
        let joints = JointTable::from_matrices(&[
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        ])
        .unwrap();
        let binding = SkinBinding::new(2, [0, 1, 0, 0], [0.5, 0.5, 0.0, 0.0]);

        let out = skin(Vec3::ZERO, Vec3::Z, &binding, &joints, true);
        assert!(out.position.abs_diff_eq(Vec4::new(1.0, 0.0, 0.0, 1.0), 1e-6));
        // translation does not touch the normal
        assert!(out.normal.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_slots_beyond_count_ignored() {
        let joints = JointTable::from_matrices(&[
            Mat4::from_translation(Vec3::X),
            Mat4::from_translation(Vec3::new(100.0, 0.0, 0.0)),
        ])
        .unwrap();
        let binding = SkinBinding::new(1, [0, 1, 1, 1], [1.0, 1.0, 1.0, 1.0]);

        let out = skin(Vec3::ZERO, Vec3::Z, &binding, &joints, true);
        assert_eq!(out.position, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_w_forced_to_one() {
        // projective joint leaves w != 1 after blending
        let mut projective = Mat4::IDENTITY;
        projective.w_axis.w = 3.0;
        let joints = JointTable::from_matrices(&[projective]).unwrap();

        let out = skin(Vec3::ONE, Vec3::Z, &SkinBinding::rigid(0), &joints, true);
        assert_eq!(out.position.w, 1.0);
        assert_eq!(out.position.truncate(), Vec3::ONE);
    }

    #[test]
    fn test_rotation_rotates_normal() {
        let joints =
            JointTable::from_matrices(&[Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2)])
                .unwrap();

        let out = skin(Vec3::X, Vec3::X, &SkinBinding::rigid(0), &joints, true);
        assert!(out.position.truncate().abs_diff_eq(Vec3::Y, 1e-6));
        assert!(out.normal.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_out_of_range_influence_skipped() {
        let joints = JointTable::from_matrices(&[Mat4::from_translation(Vec3::X)]).unwrap();
        let binding = SkinBinding::new(2, [0, 42, 0, 0], [0.5, 0.5, 0.0, 0.0]);

        assert_eq!(binding.first_invalid_influence(&joints), Some((1, 42)));
        assert_eq!(
            binding.validate(7, &joints),
            Err(ShadeError::JointIndexOutOfRange {
                vertex: 7,
                influence: 1,
                joint: 42,
                len: 1
            })
        );
        assert!(SkinBinding::rigid(0).validate(0, &joints).is_ok());

        // only joint 0 contributes; its weight 0.5 is renormalized to 1
        let out = skin(Vec3::ZERO, Vec3::Z, &binding, &joints, true);
        assert!(out.position.abs_diff_eq(Vec4::new(1.0, 0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_attribute_truncation() {
        assert_eq!(truncate_joint_count(2.9), 2);
        assert_eq!(truncate_joint_count(-1.0), 0);
        assert_eq!(truncate_joint_count(f32::NAN), 0);
        assert_eq!(truncate_joint_count(7.0), 4);

        assert_eq!(truncate_joint_index(3.99), 3);
        assert_eq!(truncate_joint_index(-0.5), 0);
        assert_eq!(truncate_joint_index(1e9), u16::MAX);

        let binding =
            SkinBinding::from_attributes(2.0, [5.7, 1.2, 0.0, 0.0], [0.6, 0.4, 0.0, 0.0]);
        assert_eq!(binding.joint_count, 2);
        assert_eq!(binding.joint_indices, [5, 1, 0, 0]);
        assert_eq!(binding.influences().collect::<Vec<_>>(), vec![(5, 0.6), (1, 0.4)]);
    }

    #[test]
    fn test_joint_table_capacity() {
        assert!(JointTable::from_matrices(&vec![Mat4::IDENTITY; MAX_JOINTS]).is_ok());

        let err = JointTable::from_matrices(&vec![Mat4::IDENTITY; MAX_JOINTS + 1]).unwrap_err();
        assert_eq!(
            err,
            ShadeError::TooManyJoints {
                count: MAX_JOINTS + 1,
                max: MAX_JOINTS
            }
        );
    }

    #[test]
    fn test_joint_table_pod_roundtrip() {
        let matrices = [
            Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            Mat4::from_rotation_y(0.5),
        ];
        let table = JointTable::from_matrices(&matrices).unwrap();
        let pod = table.to_joint_matrices();

        assert_eq!(pod.len(), 2);
        assert_eq!(pod[0], JointMatrix::from_translation(1.0, 2.0, 3.0));
        assert_eq!(JointTable::from_joint_matrices(&pod).unwrap(), table);
        assert!(table.get(2).is_none());
    }
}
