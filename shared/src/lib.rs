//! Shared types for the skinlight shading pipeline.
//!
//! Plain serializable data with no math-library dependency:
//!
//! - [`constants`] - table capacities used by every stage
//! - [`math`] - POD 4x4 joint matrix
//! - [`scene`] - TOML scene description consumed by the CLI

pub mod constants;
pub mod math;
pub mod scene;

pub use constants::{MAX_JOINT_INFLUENCES, MAX_JOINTS, MAX_LIGHTS, SHADOWMAP_LOOKUPS};
pub use math::JointMatrix;
pub use scene::{
    CameraDesc, FrameDesc, LightDesc, MaterialDesc, MatrixDesc, OrthographicDesc, PerspectiveDesc,
    SceneError, SceneFile, ShadowDesc, TransformDesc, VertexDesc,
};
