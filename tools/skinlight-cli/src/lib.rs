//! skinlight-cli library
//!
//! Scene loading and JSON report building behind the `skinlight` binary.

pub mod report;

use anyhow::{Context, Result};
use skinlight_core::Scene;
use skinlight_shared::SceneFile;
use std::path::Path;

pub use report::{CheckReport, DepthReport, ShadeReport, ShadowReport};

/// Read, parse and convert a scene file
pub fn load_scene(path: &Path) -> Result<Scene> {
    let file = SceneFile::load(path).with_context(|| format!("Failed to load scene: {:?}", path))?;
    let scene =
        Scene::from_file(&file).with_context(|| format!("Invalid scene: {:?}", path))?;
    Ok(scene)
}
