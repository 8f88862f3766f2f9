//! Scene description -> frame snapshot
//!
//! Converts the serde types of a scene file into the glam-based inputs of
//! the passes, and checks them against the fixed table capacities.

use glam::{Mat4, Vec3, Vec4};
use skinlight_shared::{
    LightDesc, MAX_LIGHTS, MaterialDesc, MatrixDesc, SceneFile, ShadowDesc, TransformDesc,
};

use crate::error::{Result, ShadeError};
use crate::frame::FrameSnapshot;
use crate::lighting::{spot_cos_cutoff_from_degrees, Light, LightTable, Material};
use crate::pipeline::ShadowSetup;
use crate::shadow::DepthMap;
use crate::skinning::JointTable;
use crate::vertex::VertexAttributes;

/// Depth stored where a scene gives no depth map values: the far plane
pub const DEFAULT_SHADOW_DEPTH: f32 = 1.0;

/// Everything a pass needs, converted from a [`SceneFile`]
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub frame: FrameSnapshot,
    pub vertices: Vec<VertexAttributes>,
    pub shadow: Option<SceneShadow>,
}

/// Light-side shadow inputs of a scene
#[derive(Clone, Debug, PartialEq)]
pub struct SceneShadow {
    pub setup: ShadowSetup,
    pub depth_map: DepthMap,
}

impl Scene {
    /// Convert and validate a parsed scene file
    pub fn from_file(file: &SceneFile) -> Result<Self> {
        let joint_matrices: Vec<Mat4> = file.joints.iter().map(matrix_from_desc).collect();

        let mut frame = FrameSnapshot {
            joints: JointTable::from_matrices(&joint_matrices)?,
            lights: light_table_from_descs(&file.lights)?,
            material: material_from_desc(&file.material),
            scene_color: Vec4::from_array(file.frame.scene_color),
            effect_color_mul: Vec4::from_array(file.frame.effect_color_mul),
            skinning_enabled: file.frame.skinning_enabled,
            normal_texture_available: file.frame.normal_texture_available,
            displacement_texture_available: file.frame.displacement_texture_available,
            ..FrameSnapshot::default()
        };
        frame.set_camera(
            matrix_from_desc(&file.camera.projection),
            matrix_from_desc(&file.camera.model_view),
        );

        let vertices: Vec<VertexAttributes> =
            file.vertices.iter().map(VertexAttributes::from).collect();
        frame.validate(&vertices)?;

        let shadow = file.shadow.as_ref().map(shadow_from_desc).transpose()?;

        tracing::debug!(
            vertices = vertices.len(),
            joints = frame.joints.len(),
            lights = frame.lights.enabled().count(),
            shadow = shadow.is_some(),
            "Scene converted"
        );

        Ok(Self {
            frame,
            vertices,
            shadow,
        })
    }
}

/// Resolve any matrix spelling to a column-major 4x4 matrix
pub fn matrix_from_desc(desc: &MatrixDesc) -> Mat4 {
    match desc {
        MatrixDesc::Columns(cols) => Mat4::from_cols_array(cols),
        MatrixDesc::Perspective(p) => {
            Mat4::perspective_rh_gl(p.fov_y_degrees.to_radians(), p.aspect, p.near, p.far)
        }
        MatrixDesc::Orthographic(o) => {
            Mat4::orthographic_rh_gl(o.left, o.right, o.bottom, o.top, o.near, o.far)
        }
        MatrixDesc::Transform(t) => transform_matrix(t),
    }
}

fn transform_matrix(t: &TransformDesc) -> Mat4 {
    let [rx, ry, rz] = t.rotation_degrees.map(f32::to_radians);
    Mat4::from_translation(Vec3::from_array(t.translation))
        * Mat4::from_rotation_z(rz)
        * Mat4::from_rotation_y(ry)
        * Mat4::from_rotation_x(rx)
        * Mat4::from_scale(Vec3::from_array(t.scale))
}

pub fn light_from_desc(desc: &LightDesc) -> Light {
    let spot_cos_cutoff = desc
        .spot_cos_cutoff
        .or(desc.spot_cutoff_degrees.map(spot_cos_cutoff_from_degrees))
        .unwrap_or(Light::default().spot_cos_cutoff);

    Light {
        enabled: desc.enabled,
        ambient: Vec4::from_array(desc.ambient),
        diffuse: Vec4::from_array(desc.diffuse),
        specular: Vec4::from_array(desc.specular),
        position: Vec4::from_array(desc.position),
        spot_direction: Vec3::from_array(desc.spot_direction),
        spot_exponent: desc.spot_exponent,
        spot_cos_cutoff,
        constant_attenuation: desc.constant_attenuation,
        linear_attenuation: desc.linear_attenuation,
        quadratic_attenuation: desc.quadratic_attenuation,
    }
}

/// Entries without an explicit slot take the slot after the previous entry
fn light_table_from_descs(descs: &[LightDesc]) -> Result<LightTable> {
    if descs.len() > MAX_LIGHTS {
        return Err(ShadeError::TooManyLights {
            count: descs.len(),
            max: MAX_LIGHTS,
        });
    }

    let mut table = LightTable::new();
    let mut next_slot = 0;
    for desc in descs {
        let slot = desc.slot.unwrap_or(next_slot);
        table.set(slot, light_from_desc(desc))?;
        next_slot = slot + 1;
    }
    Ok(table)
}

pub fn material_from_desc(desc: &MaterialDesc) -> Material {
    Material {
        ambient: Vec4::from_array(desc.ambient),
        diffuse: Vec4::from_array(desc.diffuse),
        specular: Vec4::from_array(desc.specular),
        emission: Vec4::from_array(desc.emission),
        shininess: desc.shininess,
    }
}

fn shadow_from_desc(desc: &ShadowDesc) -> Result<SceneShadow> {
    let depth_map = match (&desc.depths, desc.depth) {
        (Some(depths), _) => DepthMap::from_depths(desc.width, desc.height, depths.clone())?,
        (None, Some(depth)) => DepthMap::filled(desc.width, desc.height, depth)?,
        (None, None) => DepthMap::filled(desc.width, desc.height, DEFAULT_SHADOW_DEPTH)?,
    };

    Ok(SceneShadow {
        setup: ShadowSetup::new(
            matrix_from_desc(&desc.light_projection),
            matrix_from_desc(&desc.light_model_view),
            Vec4::from_array(desc.light_position),
        ),
        depth_map,
    })
}
