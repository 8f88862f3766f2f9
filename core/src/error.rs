use thiserror::Error;

/// Boundary validation failures
///
/// The shading stages themselves never fail. These errors are raised when
/// a frame snapshot is assembled from collaborator data that would break
/// the fixed-capacity tables or the numeric preconditions of a stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShadeError {
    #[error("Joint table holds at most {max} joints, got {count}")]
    TooManyJoints { count: usize, max: usize },

    #[error("Light table holds at most {max} lights, got {count}")]
    TooManyLights { count: usize, max: usize },

    #[error("Light slot {slot} out of range (table has {max} slots)")]
    LightSlotOutOfRange { slot: usize, max: usize },

    #[error("Vertex {vertex}: influence {influence} references joint {joint}, but the table has {len} joints")]
    JointIndexOutOfRange {
        vertex: usize,
        influence: usize,
        joint: usize,
        len: usize,
    },

    #[error("Light {slot} is enabled with constant attenuation {constant}; it must be positive")]
    DegenerateAttenuation { slot: usize, constant: f32 },

    #[error("Depth map must have a non-zero size, got {width}x{height}")]
    EmptyDepthMap { width: u32, height: u32 },

    #[error("Depth map {width}x{height} needs {expected} texels, got {actual}")]
    DepthMapSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ShadeError>;
