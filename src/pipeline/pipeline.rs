use anyhow::Error;
use ndarray::Array1;
use opencv::core::Mat;
use tracing::{debug, instrument};
use crate::config::config::{OverlayMode, PipelineConfig};
use crate::helper::holistic_helper::{draw_landmarks, draw_styled_landmarks_with, mediapipe_detection};
use crate::modules::connections::{ConnectionTopology, HolisticConnections};
use crate::modules::drawing::{LandmarkDrawer, OpenCvDrawer};
use crate::modules::holistic_model::{HolisticModel, HolisticResult};
use crate::modules::keypoints::extract_keypoints;

/// Per-frame composition of detection, overlay drawing and keypoint extraction.
#[derive(Debug, Clone)]
pub struct HolisticPipeline<M, D = OpenCvDrawer, T = HolisticConnections> {
    model: M,
    drawer: D,
    topology: T,
    config: PipelineConfig,
    frames: u64,
}

impl<M: HolisticModel> HolisticPipeline<M> {

    /// new initializes a pipeline drawing with OpenCV, the built-in connection sets and a tessellated face.
    pub fn new(model: M, config: PipelineConfig) -> Self {
        HolisticPipeline::with_parts(model, OpenCvDrawer::new(), HolisticConnections::new(), config)
    }
}

impl<M, D, T> HolisticPipeline<M, D, T>
where
    M: HolisticModel,
    D: LandmarkDrawer,
    T: ConnectionTopology,
{
    pub fn with_parts(model: M, drawer: D, topology: T, config: PipelineConfig) -> Self {
        HolisticPipeline {
            model,
            drawer,
            topology,
            config,
            frames: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// process_frame detects landmarks on a BGR frame and draws the configured overlay on the returned copy.
    ///
    /// # Arguments
    /// * `frame` - three channel BGR OpenCV matrix
    ///
    /// # Returns
    /// * `Result<(Mat, HolisticResult), Error>`
    #[instrument(level = "debug", skip_all, fields(frame = self.frames))]
    pub fn process_frame(&mut self, frame: &Mat) -> Result<(Mat, HolisticResult), Error> {
        let (mut image, results) = mediapipe_detection(frame, &mut self.model)?;
        self.frames += 1;
        debug!(detected = ?results.detected_collections(), "holistic detection done");

        match self.config.overlay {
            OverlayMode::None => {}
            OverlayMode::Plain => draw_landmarks(&mut image, &results, &self.drawer, &self.topology)?,
            OverlayMode::Styled => {
                draw_styled_landmarks_with(&mut image, &results, &self.drawer, &self.topology, &self.config.styles)?
            }
        }
        Ok((image, results))
    }

    /// process_frame_keypoints runs `process_frame` and also returns the flattened keypoint vector.
    pub fn process_frame_keypoints(&mut self, frame: &Mat) -> Result<(Mat, HolisticResult, Array1<f32>), Error> {
        let (image, results) = self.process_frame(frame)?;
        let keypoints = extract_keypoints(&results);
        Ok((image, results, keypoints))
    }

    pub fn into_model(self) -> M {
        self.model
    }
}
