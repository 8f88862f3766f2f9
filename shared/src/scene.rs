//! Scene description file (`*.toml`) parsing
//!
//! A scene is one frame's worth of shading inputs: camera matrices, the
//! per-frame flags and colors, one material, up to eight lights, the joint
//! table, a vertex stream and an optional shadow map setup.
//!
//! ```toml
//! [camera]
//! model_view = { translation = [0.0, 0.0, -5.0] }
//! projection = { fov_y_degrees = 60.0, aspect = 1.0, near = 0.1, far = 100.0 }
//!
//! [frame]
//! skinning_enabled = true
//!
//! [[lights]]
//! position = [0.0, 0.0, 10.0, 1.0]
//!
//! [[joints]]
//! translation = [0.0, 1.0, 0.0]
//!
//! [[vertices]]
//! position = [0.0, 0.0, 0.0]
//! joint_count = 1
//! joint_indices = [0, 0, 0, 0]
//! joint_weights = [1.0, 0.0, 0.0, 0.0]
//! ```
//!
//! Values are kept exactly as written; range checks against table
//! capacities happen when the core converts a scene into a frame snapshot.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while reading a scene file
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Failed to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level scene file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub frame: FrameDesc,
    #[serde(default)]
    pub material: MaterialDesc,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
    #[serde(default)]
    pub joints: Vec<MatrixDesc>,
    #[serde(default)]
    pub vertices: Vec<VertexDesc>,
    #[serde(default)]
    pub shadow: Option<ShadowDesc>,
}

impl SceneFile {
    /// Load scene from file
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse scene from string
    pub fn parse(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }
}

/// A 4x4 matrix as written in a scene file
///
/// Accepted spellings, tried in this order:
/// - 16 floats, column-major
/// - `{ fov_y_degrees, aspect, near, far }` perspective projection
/// - `{ left, right, bottom, top, near, far }` orthographic projection
/// - `{ translation, rotation_degrees, scale }` affine transform (all optional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixDesc {
    Columns([f32; 16]),
    Perspective(PerspectiveDesc),
    Orthographic(OrthographicDesc),
    Transform(TransformDesc),
}

impl Default for MatrixDesc {
    fn default() -> Self {
        MatrixDesc::Transform(TransformDesc::default())
    }
}

/// Right-handed perspective projection with OpenGL depth range [-1, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerspectiveDesc {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// Right-handed orthographic projection with OpenGL depth range [-1, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrthographicDesc {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

/// Scale, then rotate (X, Y, Z order, degrees), then translate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformDesc {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

impl Default for TransformDesc {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0; 3]
}

/// Camera section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraDesc {
    /// Object to eye space
    #[serde(default)]
    pub model_view: MatrixDesc,
    /// Eye to clip space
    #[serde(default)]
    pub projection: MatrixDesc,
}

/// Per-frame flags and colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDesc {
    #[serde(default)]
    pub skinning_enabled: bool,
    #[serde(default)]
    pub scene_color: [f32; 4],
    #[serde(default = "ones4")]
    pub effect_color_mul: [f32; 4],
    /// Gates tangent/bitangent output of the lighting pass
    #[serde(default)]
    pub normal_texture_available: bool,
    /// Carried through to the frame; does not alter the shading math
    #[serde(default)]
    pub displacement_texture_available: bool,
}

impl Default for FrameDesc {
    fn default() -> Self {
        Self {
            skinning_enabled: false,
            scene_color: [0.0; 4],
            effect_color_mul: ones4(),
            normal_texture_available: false,
            displacement_texture_available: false,
        }
    }
}

/// Material section. Defaults match a plain grey surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDesc {
    #[serde(default = "default_material_ambient")]
    pub ambient: [f32; 4],
    #[serde(default = "default_material_diffuse")]
    pub diffuse: [f32; 4],
    #[serde(default = "black_opaque")]
    pub specular: [f32; 4],
    #[serde(default = "black_opaque")]
    pub emission: [f32; 4],
    #[serde(default)]
    pub shininess: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            ambient: default_material_ambient(),
            diffuse: default_material_diffuse(),
            specular: black_opaque(),
            emission: black_opaque(),
            shininess: 0.0,
        }
    }
}

/// One `[[lights]]` entry
///
/// Entries fill slots in order unless `slot` is given. The spotlight cone
/// may be written either as a cosine (`spot_cos_cutoff`) or as an angle
/// (`spot_cutoff_degrees`); with neither the light is omnidirectional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightDesc {
    #[serde(default)]
    pub slot: Option<usize>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "black_opaque")]
    pub ambient: [f32; 4],
    #[serde(default = "ones4")]
    pub diffuse: [f32; 4],
    #[serde(default = "ones4")]
    pub specular: [f32; 4],
    /// Eye-space position, homogeneous
    #[serde(default)]
    pub position: [f32; 4],
    #[serde(default = "default_spot_direction")]
    pub spot_direction: [f32; 3],
    #[serde(default)]
    pub spot_exponent: f32,
    #[serde(default)]
    pub spot_cos_cutoff: Option<f32>,
    #[serde(default)]
    pub spot_cutoff_degrees: Option<f32>,
    #[serde(default = "default_constant_attenuation")]
    pub constant_attenuation: f32,
    #[serde(default)]
    pub linear_attenuation: f32,
    #[serde(default)]
    pub quadratic_attenuation: f32,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            slot: None,
            enabled: true,
            ambient: black_opaque(),
            diffuse: ones4(),
            specular: ones4(),
            position: [0.0; 4],
            spot_direction: default_spot_direction(),
            spot_exponent: 0.0,
            spot_cos_cutoff: None,
            spot_cutoff_degrees: None,
            constant_attenuation: default_constant_attenuation(),
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
        }
    }
}

/// One `[[vertices]]` entry, laid out like the vertex attribute stream
///
/// Joint counts and indices are floats, exactly as they arrive from a
/// float-only attribute stream. The core truncates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDesc {
    pub position: [f32; 3],
    #[serde(default = "default_normal")]
    pub normal: [f32; 3],
    #[serde(default)]
    pub uv: [f32; 2],
    #[serde(default)]
    pub joint_count: f32,
    #[serde(default)]
    pub joint_indices: [f32; 4],
    #[serde(default)]
    pub joint_weights: [f32; 4],
    #[serde(default)]
    pub tangent: Option<[f32; 3]>,
    #[serde(default)]
    pub bitangent: Option<[f32; 3]>,
}

/// Shadow map section
///
/// The depth map is either filled with one value (`depth`) or given texel
/// by texel (`depths`, row-major, `width * height` entries). Stored depths
/// are raw depth-attachment values in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowDesc {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub depth: Option<f32>,
    #[serde(default)]
    pub depths: Option<Vec<f32>>,
    #[serde(default)]
    pub light_model_view: MatrixDesc,
    #[serde(default)]
    pub light_projection: MatrixDesc,
    /// Light position in object space, homogeneous
    #[serde(default)]
    pub light_position: [f32; 4],
}

fn default_true() -> bool {
    true
}

fn ones4() -> [f32; 4] {
    [1.0; 4]
}

fn black_opaque() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_material_ambient() -> [f32; 4] {
    [0.2, 0.2, 0.2, 1.0]
}

fn default_material_diffuse() -> [f32; 4] {
    [0.8, 0.8, 0.8, 1.0]
}

fn default_spot_direction() -> [f32; 3] {
    [0.0, 0.0, -1.0]
}

fn default_constant_attenuation() -> f32 {
    1.0
}

fn default_normal() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}
