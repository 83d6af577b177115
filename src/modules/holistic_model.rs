use anyhow::Error;
use opencv::core::Mat;
use serde::{Deserialize, Serialize};
use crate::utils::coordinate::NormalizedLandmarkList;

/// The four landmark collections a holistic model may return for one frame.
///
/// A `None` collection was not detected in this frame. That is a normal
/// outcome and is skipped by every consumer in this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HolisticResult {
    #[serde(default)]
    pub face_landmarks: Option<NormalizedLandmarkList>,
    #[serde(default)]
    pub pose_landmarks: Option<NormalizedLandmarkList>,
    #[serde(default)]
    pub left_hand_landmarks: Option<NormalizedLandmarkList>,
    #[serde(default)]
    pub right_hand_landmarks: Option<NormalizedLandmarkList>,
}

impl HolisticResult {
    pub fn is_empty(&self) -> bool {
        self.face_landmarks.is_none()
            && self.pose_landmarks.is_none()
            && self.left_hand_landmarks.is_none()
            && self.right_hand_landmarks.is_none()
    }

    /// detected_collections lists the names of the collections present, in drawing order.
    pub fn detected_collections(&self) -> Vec<&'static str> {
        let mut detected = Vec::with_capacity(4);
        if self.face_landmarks.is_some() {
            detected.push("face");
        }
        if self.pose_landmarks.is_some() {
            detected.push("pose");
        }
        if self.left_hand_landmarks.is_some() {
            detected.push("left_hand");
        }
        if self.right_hand_landmarks.is_some() {
            detected.push("right_hand");
        }
        detected
    }
}

/// An already-initialized holistic landmark model owned by the caller.
///
/// `process` receives the RGB frame by shared reference, so the frame cannot be
/// modified while inference runs. Whatever error the model raises is handed
/// back to the caller unchanged.
pub trait HolisticModel {
    fn process(&mut self, image: &Mat) -> Result<HolisticResult, Error>;
}

impl<M: HolisticModel + ?Sized> HolisticModel for &mut M {
    fn process(&mut self, image: &Mat) -> Result<HolisticResult, Error> {
        (**self).process(image)
    }
}

impl<M: HolisticModel + ?Sized> HolisticModel for Box<M> {
    fn process(&mut self, image: &Mat) -> Result<HolisticResult, Error> {
        (**self).process(image)
    }
}

#[cfg(test)]
mod tests {
    use crate::modules::holistic_model::HolisticResult;
    use crate::utils::coordinate::{Landmark, NormalizedLandmarkList};

    #[test]
    fn test_detected_collections_order() {
        let result = HolisticResult {
            right_hand_landmarks: Some(NormalizedLandmarkList::new(vec![Landmark::new(0.5, 0.5, 0.0)])),
            face_landmarks: Some(NormalizedLandmarkList::default()),
            ..Default::default()
        };
        assert_eq!(result.detected_collections(), vec!["face", "right_hand"]);
        assert!(!result.is_empty());
        assert!(HolisticResult::default().is_empty());
    }

    #[test]
    fn test_result_json_missing_fields() {
        let result: HolisticResult = serde_json::from_str(
            r#"{"pose_landmarks":{"landmark":[{"x":0.5,"y":0.5,"z":0.0,"visibility":1.0}]}}"#,
        ).unwrap();
        assert!(result.face_landmarks.is_none());
        assert_eq!(result.pose_landmarks.unwrap().len(), 1);
    }
}
