//! Math types for skinlight
//!
//! Provides POD (Plain Old Data) math types that are serializable and
//! can be shared across crates without requiring glam as a dependency.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 4x4 joint transform (column-major storage, POD type)
///
/// Maps bone space to model space. Columns 0-2 hold the basis vectors,
/// column 3 holds the translation. Unlike a 3x4 affine matrix the bottom
/// row is stored, so projective joint transforms survive a round trip.
///
/// Memory layout (64 bytes): `cols[c][r]`, the same order a GPU uniform
/// array of `mat4` expects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
#[serde(transparent)]
pub struct JointMatrix {
    pub cols: [[f32; 4]; 4],
}

impl Default for JointMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl JointMatrix {
    /// Identity joint matrix (no transformation)
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create from column arrays
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Pure translation
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Convert to flat f32 array for GPU upload (column-major)
    pub fn to_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        out
    }

    /// Create from flat f32 array (column-major)
    pub fn from_array(arr: [f32; 16]) -> Self {
        Self {
            cols: [
                [arr[0], arr[1], arr[2], arr[3]],
                [arr[4], arr[5], arr[6], arr[7]],
                [arr[8], arr[9], arr[10], arr[11]],
                [arr[12], arr[13], arr[14], arr[15]],
            ],
        }
    }
}

impl From<[f32; 16]> for JointMatrix {
    fn from(arr: [f32; 16]) -> Self {
        Self::from_array(arr)
    }
}
