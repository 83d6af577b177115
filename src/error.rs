use thiserror::Error;

/// Errors raised by the holistic helpers themselves.
///
/// Public operations return `anyhow::Result`, so callers reach these with
/// `err.downcast_ref::<HolisticError>()`. Errors coming from the model or from
/// OpenCV are passed through untouched and never wrapped in this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HolisticError {
    #[error("image format error: {0}")]
    ImageFormat(String),

    #[error("landmark index is out of range. invalid connection from landmark #{start} to landmark #{end}")]
    LandmarkIndexOutOfRange { start: usize, end: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid keypoints: {0}")]
    Keypoints(String),
}
