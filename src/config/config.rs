use std::fs;
use std::path::Path;
use anyhow::Error;
use serde::{Deserialize, Serialize};
use crate::error::HolisticError;
use crate::modules::drawing::DrawingSpec;

pub const FACE_LANDMARK_SPEC: DrawingSpec = DrawingSpec::new((80, 110, 10), 1, 1);
pub const FACE_CONNECTION_SPEC: DrawingSpec = DrawingSpec::new((80, 256, 121), 1, 1);
pub const POSE_LANDMARK_SPEC: DrawingSpec = DrawingSpec::new((80, 22, 10), 2, 4);
pub const POSE_CONNECTION_SPEC: DrawingSpec = DrawingSpec::new((80, 44, 121), 2, 2);
pub const LEFT_HAND_LANDMARK_SPEC: DrawingSpec = DrawingSpec::new((121, 22, 76), 2, 4);
pub const LEFT_HAND_CONNECTION_SPEC: DrawingSpec = DrawingSpec::new((121, 44, 250), 2, 2);
pub const RIGHT_HAND_LANDMARK_SPEC: DrawingSpec = DrawingSpec::new((245, 117, 66), 2, 4);
pub const RIGHT_HAND_CONNECTION_SPEC: DrawingSpec = DrawingSpec::new((245, 66, 230), 2, 2);

// largest thickness OpenCV accepts for lines and circles
pub const MAX_THICKNESS: i32 = 32767;

/// Point style and line style of one landmark collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LandmarkStyle {
    pub landmark: DrawingSpec,
    pub connection: DrawingSpec,
}

fn default_face_style() -> LandmarkStyle {
    LandmarkStyle { landmark: FACE_LANDMARK_SPEC, connection: FACE_CONNECTION_SPEC }
}

fn default_pose_style() -> LandmarkStyle {
    LandmarkStyle { landmark: POSE_LANDMARK_SPEC, connection: POSE_CONNECTION_SPEC }
}

fn default_left_hand_style() -> LandmarkStyle {
    LandmarkStyle { landmark: LEFT_HAND_LANDMARK_SPEC, connection: LEFT_HAND_CONNECTION_SPEC }
}

fn default_right_hand_style() -> LandmarkStyle {
    LandmarkStyle { landmark: RIGHT_HAND_LANDMARK_SPEC, connection: RIGHT_HAND_CONNECTION_SPEC }
}

/// Styles of the four collections. Collections left out of a JSON object keep their table entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverlayConfig {
    #[serde(default = "default_face_style")]
    pub face: LandmarkStyle,
    #[serde(default = "default_pose_style")]
    pub pose: LandmarkStyle,
    #[serde(default = "default_left_hand_style")]
    pub left_hand: LandmarkStyle,
    #[serde(default = "default_right_hand_style")]
    pub right_hand: LandmarkStyle,
}

impl OverlayConfig {
    pub fn new() -> Self {
        OverlayConfig {
            face: default_face_style(),
            pose: default_pose_style(),
            left_hand: default_left_hand_style(),
            right_hand: default_right_hand_style(),
        }
    }

    /// validate checks every spec against what OpenCV can draw.
    ///
    /// Radii must not be negative. Line thickness must be in `1..=MAX_THICKNESS`;
    /// landmark circles additionally accept -1, which fills them.
    pub fn validate(&self) -> Result<(), Error> {
        let styles = [
            ("face", &self.face),
            ("pose", &self.pose),
            ("left_hand", &self.left_hand),
            ("right_hand", &self.right_hand),
        ];
        for (name, style) in styles {
            for spec in [&style.landmark, &style.connection] {
                if spec.circle_radius < 0 {
                    return Err(HolisticError::Config(format!("{name}: circle_radius must not be negative")).into())
                }
            }
            let landmark_thickness = style.landmark.thickness;
            if landmark_thickness != -1 && !(1..=MAX_THICKNESS).contains(&landmark_thickness) {
                return Err(HolisticError::Config(format!(
                    "{name}: landmark thickness must be -1 or between 1 and {MAX_THICKNESS}, got {landmark_thickness}"
                )).into())
            }
            let connection_thickness = style.connection.thickness;
            if !(1..=MAX_THICKNESS).contains(&connection_thickness) {
                return Err(HolisticError::Config(format!(
                    "{name}: connection thickness must be between 1 and {MAX_THICKNESS}, got {connection_thickness}"
                )).into())
            }
        }
        Ok(())
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlayMode {
    None,
    Plain,
    #[default]
    Styled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub overlay: OverlayMode,
    #[serde(default)]
    pub styles: OverlayConfig,
}

impl PipelineConfig {
    pub fn new() -> Self {
        PipelineConfig {
            overlay: OverlayMode::Styled,
            styles: OverlayConfig::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.styles.validate()?;
        Ok(config)
    }

    /// from_json_file loads the pipeline configuration from a JSON file.
    ///
    /// Missing keys fall back to the styled overlay with the default table.
    ///
    /// # Arguments
    /// * `path` - path of the JSON file
    ///
    /// # Returns
    /// * `Result<PipelineConfig, Error>`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::config::*;
    use crate::error::HolisticError;
    use crate::modules::drawing::DrawingSpec;

    #[test]
    fn test_style_table() {
        let config = OverlayConfig::new();
        assert_eq!(config.face.landmark, DrawingSpec::new((80, 110, 10), 1, 1));
        assert_eq!(config.face.connection, DrawingSpec::new((80, 256, 121), 1, 1));
        assert_eq!(config.pose.landmark, DrawingSpec::new((80, 22, 10), 2, 4));
        assert_eq!(config.pose.connection, DrawingSpec::new((80, 44, 121), 2, 2));
        assert_eq!(config.left_hand.landmark, DrawingSpec::new((121, 22, 76), 2, 4));
        assert_eq!(config.left_hand.connection, DrawingSpec::new((121, 44, 250), 2, 2));
        assert_eq!(config.right_hand.landmark, DrawingSpec::new((245, 117, 66), 2, 4));
        assert_eq!(config.right_hand.connection, DrawingSpec::new((245, 66, 230), 2, 2));
    }

    #[test]
    fn test_json_round_trip_keeps_table() {
        let json = serde_json::to_string(&PipelineConfig::new()).unwrap();
        let config = PipelineConfig::from_json_str(&json).unwrap();
        assert_eq!(config, PipelineConfig::new());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json_str(r#"{"overlay": "plain"}"#).unwrap();
        assert_eq!(config.overlay, OverlayMode::Plain);
        assert_eq!(config.styles.pose.connection, POSE_CONNECTION_SPEC);

        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config.overlay, OverlayMode::Styled);
    }

    #[test]
    fn test_partial_styles_keep_table_entries() {
        let json = r#"{"styles": {"pose": {"landmark": {"color": [1, 2, 3], "thickness": 3, "circle_radius": 5},
                                           "connection": {"color": [4, 5, 6], "thickness": 1, "circle_radius": 1}}}}"#;
        let config = PipelineConfig::from_json_str(json).unwrap();

        assert_eq!(config.styles.pose.landmark, DrawingSpec::new((1, 2, 3), 3, 5));
        assert_eq!(config.styles.pose.connection, DrawingSpec::new((4, 5, 6), 1, 1));
        assert_eq!(config.styles.face.connection, FACE_CONNECTION_SPEC);
        assert_eq!(config.styles.left_hand.landmark, LEFT_HAND_LANDMARK_SPEC);
        assert_eq!(config.styles.right_hand.connection, RIGHT_HAND_CONNECTION_SPEC);

        let config = PipelineConfig::from_json_str(r#"{"styles": {}}"#).unwrap();
        assert_eq!(config.styles, OverlayConfig::new());
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        let invalid: [fn(&mut OverlayConfig); 5] = [
            |s| s.left_hand.landmark.circle_radius = -2,
            |s| s.pose.connection.thickness = -1,
            |s| s.face.connection.thickness = 0,
            |s| s.right_hand.landmark.thickness = -3,
            |s| s.face.landmark.thickness = MAX_THICKNESS + 1,
        ];
        for breakage in invalid {
            let mut config = PipelineConfig::new();
            breakage(&mut config.styles);
            let json = serde_json::to_string(&config).unwrap();
            let err = PipelineConfig::from_json_str(&json).unwrap_err();
            assert!(matches!(err.downcast_ref::<HolisticError>(), Some(HolisticError::Config(_))));
        }
    }

    #[test]
    fn test_filled_landmarks_are_accepted() {
        let mut styles = OverlayConfig::new();
        styles.pose.landmark.thickness = -1;
        assert!(styles.validate().is_ok());
    }
}
