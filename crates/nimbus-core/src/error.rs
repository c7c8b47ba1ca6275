use thiserror::Error;

/// Errors that abort a sky pass. A pass that returns one of these has not
/// dispatched any geometry for the frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkyError {
    #[error("sky clip fragment has {points} points, capacity is {capacity}")]
    ClipOverflow { points: usize, capacity: usize },

    #[error("tessellation vertex capacity ({capacity}) exceeded while filling sky")]
    VertexOverflow { capacity: usize },

    #[error("tessellation index capacity ({capacity}) exceeded while filling sky")]
    IndexOverflow { capacity: usize },

    #[error("tessellation index {index} refers past the {vertices} stored vertices")]
    IndexOutOfRange { index: u32, vertices: usize },

    #[error("sky pass needs a stage iterator but none is set")]
    MissingStageIterator,

    #[error("invalid cloud height {0} (must be finite and non-negative)")]
    InvalidCloudHeight(f32),
}
