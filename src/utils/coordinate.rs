use serde::{Deserialize, Serialize};

/// A single normalized landmark as produced by the holistic model.
///
/// `x` and `y` are fractions of the image width and height, `z` is the depth
/// on roughly the same scale as `x`. `visibility` and `presence` are only set
/// by models that estimate them (pose does, face mesh and hands do not).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z, visibility: None, presence: None }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_presence(mut self, presence: f32) -> Self {
        self.presence = Some(presence);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NormalizedLandmarkList {
    pub landmark: Vec<Landmark>,
}

impl NormalizedLandmarkList {
    pub fn new(landmark: Vec<Landmark>) -> Self {
        NormalizedLandmarkList { landmark }
    }

    pub fn len(&self) -> usize {
        self.landmark.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmark.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PixelCoordinate {
    pub x: i32,
    pub y: i32,
}

fn is_valid_normalized_value(value: f32) -> bool {
    (value > 0.0 || value.abs() < f32::EPSILON) && (value < 1.0 || (value - 1.0).abs() < f32::EPSILON)
}

/// normalized_to_pixel_coordinates maps a normalized landmark position onto the image grid.
///
/// Returns `None` when either coordinate falls outside `[0, 1]`, otherwise the
/// floored pixel position clamped to the last row/column.
///
/// # Arguments
/// * `normalized_x` - f32
/// * `normalized_y` - f32
/// * `image_width` - i32
/// * `image_height` - i32
///
/// # Returns
/// * `Option<PixelCoordinate>`
pub fn normalized_to_pixel_coordinates(
    normalized_x: f32,
    normalized_y: f32,
    image_width: i32,
    image_height: i32,
) -> Option<PixelCoordinate> {
    if !(is_valid_normalized_value(normalized_x) && is_valid_normalized_value(normalized_y)) {
        return None
    }
    if image_width <= 0 || image_height <= 0 {
        return None
    }

    let x_px = ((normalized_x * image_width as f32).floor() as i32).min(image_width - 1);
    let y_px = ((normalized_y * image_height as f32).floor() as i32).min(image_height - 1);
    Some(PixelCoordinate { x: x_px.max(0), y: y_px.max(0) })
}
