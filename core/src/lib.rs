//! Skinlight Core - CPU reference of the skinned, lit and shadowed draw path
//!
//! Every stage is a pure function of its inputs and a read-only
//! [`FrameSnapshot`]. Validation happens once, when a snapshot is built;
//! the stages themselves have no error path.
//!
//! # Architecture
//!
//! - [`skinning`] - bone-weighted vertex blending over a fixed [`JointTable`]
//! - [`lighting`] - multi-light illumination over a fixed [`LightTable`]
//! - [`shadow`] - depth packing, light-space projection and 4x4 PCF
//! - [`pipeline`] - lighting, depth and shadow passes built from the stages
//! - [`passes`] - unlit particle and textured passes
//! - [`scene`] - conversion of a scene file into a snapshot and vertex stream

pub mod error;
pub mod frame;
pub mod lighting;
pub mod passes;
pub mod pipeline;
pub mod scene;
pub mod shadow;
pub mod skinning;
pub mod vertex;

pub use error::{Result, ShadeError};
pub use frame::{normal_matrix, FrameSnapshot};
pub use lighting::{illuminate, Light, LightTable, Material};
pub use pipeline::{
    depth_vertex, depth_vertices, lighting_vertex, shade_vertices, shadow_alphas, shadow_vertex,
    shadow_vertices, DepthVertex, LitVertex, ShadowSetup, ShadowVertex,
};
pub use scene::{Scene, SceneShadow};
pub use shadow::{
    compute_visibility, decode_depth, encode_depth, DepthMap, DepthSampler, PackedDepth,
    ShadowSample,
};
pub use skinning::{skin, JointTable, SkinBinding, Skinned};
pub use vertex::VertexAttributes;
