//! JSON reports for each pass
//!
//! Vectors are written as plain arrays so the output can be diffed and
//! consumed without knowing glam's serde layout.

use anyhow::{Context, Result};
use serde::Serialize;
use skinlight_core::{
    depth_vertices, shade_vertices, shadow_alphas, shadow_vertices, shadow::unpack_unit_depth,
    Scene,
};

#[derive(Debug, Serialize)]
pub struct ShadeReport {
    pub vertices: Vec<LitVertexReport>,
}

#[derive(Debug, Serialize)]
pub struct LitVertexReport {
    pub clip_position: [f32; 4],
    pub eye_position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tangent: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitangent: Option<[f32; 3]>,
}

#[derive(Debug, Serialize)]
pub struct DepthReport {
    pub vertices: Vec<DepthVertexReport>,
}

#[derive(Debug, Serialize)]
pub struct DepthVertexReport {
    pub clip_position: [f32; 4],
    pub packed: [f32; 4],
    pub rgba8: [u8; 4],
    /// Unit depth recovered from `packed`
    pub depth: f32,
}

#[derive(Debug, Serialize)]
pub struct ShadowReport {
    pub width: u32,
    pub height: u32,
    pub vertices: Vec<ShadowVertexReport>,
}

#[derive(Debug, Serialize)]
pub struct ShadowVertexReport {
    pub clip_position: [f32; 4],
    pub shadow_coord: [f32; 4],
    pub shadow_intensity: f32,
    /// Darkening alpha of the black shadow fragment
    pub alpha: f32,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub vertices: usize,
    pub joints: usize,
    pub enabled_lights: Vec<usize>,
    pub skinning_enabled: bool,
    pub shadow_map: Option<[u32; 2]>,
}

impl ShadeReport {
    pub fn build(scene: &Scene) -> Self {
        let vertices = shade_vertices(&scene.frame, &scene.vertices)
            .into_iter()
            .map(|v| LitVertexReport {
                clip_position: v.clip_position.to_array(),
                eye_position: v.eye_position.to_array(),
                normal: v.normal.to_array(),
                color: v.color.to_array(),
                uv: v.uv.to_array(),
                tangent: v.tangent.map(|t| t.to_array()),
                bitangent: v.bitangent.map(|b| b.to_array()),
            })
            .collect();
        Self { vertices }
    }
}

impl DepthReport {
    pub fn build(scene: &Scene) -> Self {
        let vertices = depth_vertices(&scene.frame, &scene.vertices)
            .into_iter()
            .map(|v| DepthVertexReport {
                clip_position: v.clip_position.to_array(),
                packed: v.packed.components().to_array(),
                rgba8: v.packed.to_rgba8(),
                depth: unpack_unit_depth(v.packed),
            })
            .collect();
        Self { vertices }
    }
}

impl ShadowReport {
    /// Fails when the scene has no `[shadow]` section
    pub fn build(scene: &Scene) -> Result<Self> {
        let shadow = scene
            .shadow
            .as_ref()
            .context("Scene has no [shadow] section")?;

        let shadowed = shadow_vertices(&scene.frame, &shadow.setup, &scene.vertices);
        let texel = shadow.depth_map.texel_size();
        let alphas = shadow_alphas(&shadowed, &shadow.depth_map, texel.x, texel.y);

        let vertices = shadowed
            .iter()
            .zip(alphas)
            .map(|(v, alpha)| ShadowVertexReport {
                clip_position: v.clip_position.to_array(),
                shadow_coord: v.sample.shadow_coord.to_array(),
                shadow_intensity: v.sample.shadow_intensity,
                alpha,
            })
            .collect();

        Ok(Self {
            width: shadow.depth_map.width(),
            height: shadow.depth_map.height(),
            vertices,
        })
    }
}

impl CheckReport {
    pub fn build(scene: &Scene) -> Self {
        Self {
            vertices: scene.vertices.len(),
            joints: scene.frame.joints.len(),
            enabled_lights: scene.frame.lights.enabled().map(|(slot, _)| slot).collect(),
            skinning_enabled: scene.frame.skinning_enabled,
            shadow_map: scene
                .shadow
                .as_ref()
                .map(|s| [s.depth_map.width(), s.depth_map.height()]),
        }
    }
}
