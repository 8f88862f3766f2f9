//! Centralized constants for the skinlight pipeline.
//!
//! Single source of truth for the fixed table capacities shared by the
//! scene description format and the shading stages.

/// Maximum number of joint transforms in a joint table.
pub const MAX_JOINTS: usize = 60;

/// Number of light slots in a light table.
///
/// Unused slots stay disabled; they are never removed.
pub const MAX_LIGHTS: usize = 8;

/// Maximum number of joints that may influence one vertex.
pub const MAX_JOINT_INFLUENCES: usize = 4;

/// Samples per axis of the percentage-closer shadow filter (4x4 = 16 lookups).
pub const SHADOWMAP_LOOKUPS: usize = 4;
