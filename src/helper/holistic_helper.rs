use std::borrow::Cow;
use anyhow::Error;
use opencv::core::Mat;
use tracing::trace;
use crate::config::config::{LandmarkStyle, OverlayConfig};
use crate::modules::connections::{Connection, ConnectionTopology};
use crate::modules::drawing::LandmarkDrawer;
use crate::modules::holistic_model::{HolisticModel, HolisticResult};
use crate::utils::coordinate::NormalizedLandmarkList;
use crate::utils::image::{bgr_to_rgb, rgb_to_bgr};

/// mediapipe_detection runs the holistic model on a BGR frame.
///
/// The frame is converted to RGB for the model and converted back afterwards,
/// so the returned image carries the same pixels as the input. The model only
/// gets a shared borrow of the RGB frame while it runs.
///
/// # Arguments
/// * `image` - three channel BGR OpenCV matrix
/// * `model` - an initialized holistic model
///
/// # Returns
/// * `Result<(Mat, HolisticResult), Error>` - `HolisticError::ImageFormat` for a
///   malformed frame, otherwise whatever error the model raised
pub fn mediapipe_detection<M>(image: &Mat, model: &mut M) -> Result<(Mat, HolisticResult), Error>
where
    M: HolisticModel + ?Sized,
{
    let image_rgb = bgr_to_rgb(image)?;
    let results = model.process(&image_rgb)?;
    let image_bgr = rgb_to_bgr(&image_rgb)?;
    Ok((image_bgr, results))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Face,
    Pose,
    LeftHand,
    RightHand,
}

// draw order; later collections paint over earlier ones
const DRAW_ORDER: [Collection; 4] = [Collection::Face, Collection::Pose, Collection::LeftHand, Collection::RightHand];

impl Collection {
    fn name(self) -> &'static str {
        match self {
            Collection::Face => "face",
            Collection::Pose => "pose",
            Collection::LeftHand => "left_hand",
            Collection::RightHand => "right_hand",
        }
    }

    fn landmarks(self, results: &HolisticResult) -> Option<&NormalizedLandmarkList> {
        match self {
            Collection::Face => results.face_landmarks.as_ref(),
            Collection::Pose => results.pose_landmarks.as_ref(),
            Collection::LeftHand => results.left_hand_landmarks.as_ref(),
            Collection::RightHand => results.right_hand_landmarks.as_ref(),
        }
    }

    fn connections<'t, T>(self, landmarks: &NormalizedLandmarkList, topology: &'t T) -> Result<Cow<'t, [Connection]>, Error>
    where
        T: ConnectionTopology + ?Sized,
    {
        match self {
            Collection::Face => topology.facemesh_tessellation(landmarks),
            Collection::Pose => Ok(Cow::Borrowed(topology.pose_connections())),
            Collection::LeftHand | Collection::RightHand => Ok(Cow::Borrowed(topology.hand_connections())),
        }
    }

    fn style(self, styles: &OverlayConfig) -> &LandmarkStyle {
        match self {
            Collection::Face => &styles.face,
            Collection::Pose => &styles.pose,
            Collection::LeftHand => &styles.left_hand,
            Collection::RightHand => &styles.right_hand,
        }
    }
}

/// draw_landmarks draws face, pose, left hand and right hand, in that order, with the drawer defaults.
///
/// Collections missing from `results` are skipped. The face connections come from
/// `topology`, which by default tessellates the detected face landmarks.
///
/// # Arguments
/// * `image` - BGR OpenCV matrix, drawn in place
/// * `results` - &HolisticResult
/// * `drawer` - drawing primitive
/// * `topology` - connection sets per collection
///
/// # Returns
/// * `Result<(), Error>`
pub fn draw_landmarks<D, T>(image: &mut Mat, results: &HolisticResult, drawer: &D, topology: &T) -> Result<(), Error>
where
    D: LandmarkDrawer + ?Sized,
    T: ConnectionTopology + ?Sized,
{
    for collection in DRAW_ORDER {
        if let Some(landmarks) = collection.landmarks(results) {
            trace!(collection = collection.name(), "drawing landmarks");
            let connections = collection.connections(landmarks, topology)?;
            drawer.draw_landmarks(image, landmarks, &connections, None, None)?;
        }
    }
    Ok(())
}

/// draw_styled_landmarks draws like `draw_landmarks` using the fixed per-collection style table.
pub fn draw_styled_landmarks<D, T>(image: &mut Mat, results: &HolisticResult, drawer: &D, topology: &T) -> Result<(), Error>
where
    D: LandmarkDrawer + ?Sized,
    T: ConnectionTopology + ?Sized,
{
    draw_styled_landmarks_with(image, results, drawer, topology, &OverlayConfig::new())
}

/// draw_styled_landmarks_with draws like `draw_landmarks` with the point and line style from `styles`.
///
/// # Arguments
/// * `image` - BGR OpenCV matrix, drawn in place
/// * `results` - &HolisticResult
/// * `drawer` - drawing primitive
/// * `topology` - connection sets per collection
/// * `styles` - point/line style of each collection
///
/// # Returns
/// * `Result<(), Error>`
pub fn draw_styled_landmarks_with<D, T>(
    image: &mut Mat,
    results: &HolisticResult,
    drawer: &D,
    topology: &T,
    styles: &OverlayConfig,
) -> Result<(), Error>
where
    D: LandmarkDrawer + ?Sized,
    T: ConnectionTopology + ?Sized,
{
    for collection in DRAW_ORDER {
        if let Some(landmarks) = collection.landmarks(results) {
            trace!(collection = collection.name(), "drawing styled landmarks");
            let style = collection.style(styles);
            let connections = collection.connections(landmarks, topology)?;
            drawer.draw_landmarks(image, landmarks, &connections, Some(&style.landmark), Some(&style.connection))?;
        }
    }
    Ok(())
}
