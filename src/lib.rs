pub mod utils;
pub mod pipeline;
pub mod config;
pub mod error;
pub mod helper;
pub mod modules;

pub use crate::config::config::{LandmarkStyle, OverlayConfig, OverlayMode, PipelineConfig};
pub use crate::error::HolisticError;
pub use crate::helper::holistic_helper::{draw_landmarks, draw_styled_landmarks, draw_styled_landmarks_with, mediapipe_detection};
pub use crate::modules::connections::{Connection, ConnectionTopology, FaceTopology, HolisticConnections};
pub use crate::modules::drawing::{DrawingSpec, LandmarkDrawer, OpenCvDrawer};
pub use crate::modules::holistic_model::{HolisticModel, HolisticResult};
pub use crate::modules::keypoints::extract_keypoints;
pub use crate::pipeline::pipeline::HolisticPipeline;
pub use crate::utils::coordinate::{Landmark, NormalizedLandmarkList};
