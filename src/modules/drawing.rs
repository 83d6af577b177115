use anyhow::Error;
use opencv::core::{Mat, MatTraitConst, Point, Scalar};
use opencv::imgproc::{circle, line, LINE_8};
use serde::{Deserialize, Serialize};
use tracing::trace;
use crate::error::HolisticError;
use crate::modules::connections::Connection;
use crate::utils::coordinate::{normalized_to_pixel_coordinates, NormalizedLandmarkList, PixelCoordinate};
use crate::utils::image::BGR_CHANNELS;

// BGR, as handed to OpenCV
pub const WHITE_COLOR: (i32, i32, i32) = (224, 224, 224);
pub const BLACK_COLOR: (i32, i32, i32) = (0, 0, 0);
pub const RED_COLOR: (i32, i32, i32) = (0, 0, 255);
pub const GREEN_COLOR: (i32, i32, i32) = (0, 128, 0);
pub const BLUE_COLOR: (i32, i32, i32) = (255, 0, 0);

pub const VISIBILITY_THRESHOLD: f32 = 0.5;
pub const PRESENCE_THRESHOLD: f32 = 0.5;

/// Color, line thickness and circle radius applied to one set of points or lines.
///
/// Channel values are kept exactly as configured, even outside `0..=255`;
/// OpenCV saturates them when drawing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawingSpec {
    pub color: (i32, i32, i32),
    pub thickness: i32,
    pub circle_radius: i32,
}

impl DrawingSpec {
    pub const fn new(color: (i32, i32, i32), thickness: i32, circle_radius: i32) -> Self {
        DrawingSpec { color, thickness, circle_radius }
    }

    pub fn scalar(&self) -> Scalar {
        Scalar::new(self.color.0 as f64, self.color.1 as f64, self.color.2 as f64, 0.0)
    }
}

impl Default for DrawingSpec {
    fn default() -> Self {
        DrawingSpec::new(WHITE_COLOR, 2, 2)
    }
}

/// Draws one landmark collection and its connections onto an image.
///
/// `None` specs mean "use the drawer's defaults".
pub trait LandmarkDrawer {
    fn draw_landmarks(
        &self,
        image: &mut Mat,
        landmarks: &NormalizedLandmarkList,
        connections: &[Connection],
        landmark_spec: Option<&DrawingSpec>,
        connection_spec: Option<&DrawingSpec>,
    ) -> Result<(), Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenCvDrawer {
    pub landmark_spec: DrawingSpec,
    pub connection_spec: DrawingSpec,
    pub visibility_threshold: f32,
    pub presence_threshold: f32,
}

impl OpenCvDrawer {
    pub fn new() -> Self {
        OpenCvDrawer {
            landmark_spec: DrawingSpec::new(RED_COLOR, 2, 2),
            connection_spec: DrawingSpec::default(),
            visibility_threshold: VISIBILITY_THRESHOLD,
            presence_threshold: PRESENCE_THRESHOLD,
        }
    }

    fn landmark_pixels(&self, landmarks: &NormalizedLandmarkList, cols: i32, rows: i32) -> Vec<Option<PixelCoordinate>> {
        landmarks.landmark.iter()
            .map(|lmk| {
                let hidden = lmk.visibility.map_or(false, |v| v < self.visibility_threshold)
                    || lmk.presence.map_or(false, |p| p < self.presence_threshold);
                if hidden {
                    return None
                }
                normalized_to_pixel_coordinates(lmk.x, lmk.y, cols, rows)
            })
            .collect()
    }
}

impl Default for OpenCvDrawer {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkDrawer for OpenCvDrawer {

    /// draw_landmarks draws connection lines first, then a bordered circle per visible landmark.
    ///
    /// # Arguments
    /// * `image` - three channel BGR OpenCV matrix, drawn in place
    /// * `landmarks` - normalized landmarks of one collection
    /// * `connections` - index pairs to join with lines
    /// * `landmark_spec` - style of the points, drawer default when `None`
    /// * `connection_spec` - style of the lines, drawer default when `None`
    ///
    /// # Returns
    /// * `Result<(), Error>`
    fn draw_landmarks(
        &self,
        image: &mut Mat,
        landmarks: &NormalizedLandmarkList,
        connections: &[Connection],
        landmark_spec: Option<&DrawingSpec>,
        connection_spec: Option<&DrawingSpec>,
    ) -> Result<(), Error> {
        if image.channels() != BGR_CHANNELS {
            return Err(HolisticError::ImageFormat("input image must contain three channel bgr data".to_string()).into())
        }

        let landmark_spec = landmark_spec.unwrap_or(&self.landmark_spec);
        let connection_spec = connection_spec.unwrap_or(&self.connection_spec);
        let pixels = self.landmark_pixels(landmarks, image.cols(), image.rows());

        let num_landmarks = landmarks.len();
        for &(start, end) in connections {
            if start >= num_landmarks || end >= num_landmarks {
                return Err(HolisticError::LandmarkIndexOutOfRange { start, end }.into())
            }
            if let (Some(from), Some(to)) = (pixels[start], pixels[end]) {
                line(
                    image,
                    Point::new(from.x, from.y),
                    Point::new(to.x, to.y),
                    connection_spec.scalar(),
                    connection_spec.thickness,
                    LINE_8,
                    0,
                )?;
            }
        }

        let radius = landmark_spec.circle_radius;
        let border_radius = (radius + 1).max((radius as f32 * 1.2) as i32);
        let border_color = DrawingSpec::new(WHITE_COLOR, landmark_spec.thickness, border_radius);
        let mut drawn = 0;
        for px in pixels.iter().flatten() {
            let center = Point::new(px.x, px.y);
            circle(image, center, border_radius, border_color.scalar(), landmark_spec.thickness, LINE_8, 0)?;
            circle(image, center, radius, landmark_spec.scalar(), landmark_spec.thickness, LINE_8, 0)?;
            drawn += 1;
        }

        trace!(landmarks = num_landmarks, drawn, connections = connections.len(), "drew landmark collection");
        Ok(())
    }
}
