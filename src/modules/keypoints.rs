use std::path::Path;
use anyhow::Error;
use ndarray::Array1;
use ndarray_npy::{read_npy, write_npy};
use crate::error::HolisticError;
use crate::modules::holistic_model::HolisticResult;
use crate::utils::coordinate::NormalizedLandmarkList;

pub const POSE_LANDMARKS: usize = 33;
pub const FACE_LANDMARKS: usize = 468;
pub const HAND_LANDMARKS: usize = 21;

pub const POSE_VALUES: usize = POSE_LANDMARKS * 4;
pub const FACE_VALUES: usize = FACE_LANDMARKS * 3;
pub const HAND_VALUES: usize = HAND_LANDMARKS * 3;
pub const KEYPOINT_VALUES: usize = POSE_VALUES + FACE_VALUES + 2 * HAND_VALUES;

fn flatten_xyz(landmarks: Option<&NormalizedLandmarkList>, count: usize) -> Array1<f32> {
    let mut values = Array1::<f32>::zeros(count * 3);
    if let Some(list) = landmarks {
        for (i, lmk) in list.landmark.iter().take(count).enumerate() {
            values[i * 3] = lmk.x;
            values[i * 3 + 1] = lmk.y;
            values[i * 3 + 2] = lmk.z;
        }
    }
    values
}

fn flatten_xyzv(landmarks: Option<&NormalizedLandmarkList>, count: usize) -> Array1<f32> {
    let mut values = Array1::<f32>::zeros(count * 4);
    if let Some(list) = landmarks {
        for (i, lmk) in list.landmark.iter().take(count).enumerate() {
            values[i * 4] = lmk.x;
            values[i * 4 + 1] = lmk.y;
            values[i * 4 + 2] = lmk.z;
            values[i * 4 + 3] = lmk.visibility.unwrap_or(0.0);
        }
    }
    values
}

/// extract_keypoints flattens a holistic result into a fixed-length feature vector.
///
/// Layout is pose (x, y, z, visibility), face (x, y, z), left hand (x, y, z),
/// right hand (x, y, z). Missing collections or landmarks are zero-filled and
/// landmarks past the expected count are dropped, so the length is always
/// `KEYPOINT_VALUES`.
///
/// # Arguments
/// * `results` - &HolisticResult
///
/// # Returns
/// * `Array1<f32>`
pub fn extract_keypoints(results: &HolisticResult) -> Array1<f32> {
    let pose = flatten_xyzv(results.pose_landmarks.as_ref(), POSE_LANDMARKS);
    let face = flatten_xyz(results.face_landmarks.as_ref(), FACE_LANDMARKS);
    let left_hand = flatten_xyz(results.left_hand_landmarks.as_ref(), HAND_LANDMARKS);
    let right_hand = flatten_xyz(results.right_hand_landmarks.as_ref(), HAND_LANDMARKS);

    let mut keypoints: Vec<f32> = Vec::with_capacity(KEYPOINT_VALUES);
    for part in [pose, face, left_hand, right_hand] {
        keypoints.extend(part.iter());
    }
    Array1::from_vec(keypoints)
}

pub fn save_keypoints<P: AsRef<Path>>(path: P, keypoints: &Array1<f32>) -> Result<(), Error> {
    write_npy(path, keypoints)?;
    Ok(())
}

/// load_keypoints reads a keypoint vector written by `save_keypoints`.
pub fn load_keypoints<P: AsRef<Path>>(path: P) -> Result<Array1<f32>, Error> {
    let keypoints: Array1<f32> = read_npy(path)?;
    if keypoints.len() != KEYPOINT_VALUES {
        return Err(HolisticError::Keypoints(format!(
            "expected {} keypoint values, got {}", KEYPOINT_VALUES, keypoints.len()
        )).into())
    }
    Ok(keypoints)
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use ndarray::{s, Array1};
    use crate::error::HolisticError;
    use crate::modules::holistic_model::HolisticResult;
    use crate::modules::keypoints::*;
    use crate::utils::coordinate::{Landmark, NormalizedLandmarkList};

    fn hand(x: f32) -> NormalizedLandmarkList {
        NormalizedLandmarkList::new((0..HAND_LANDMARKS).map(|i| Landmark::new(x, i as f32 / 21.0, -0.1)).collect())
    }

    #[test]
    fn test_keypoint_length() {
        assert_eq!(KEYPOINT_VALUES, 1662);
        assert_eq!(extract_keypoints(&HolisticResult::default()).len(), 1662);
    }

    #[test]
    fn test_absent_collections_are_zero() {
        let keypoints = extract_keypoints(&HolisticResult::default());
        assert!(keypoints.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_layout() {
        let results = HolisticResult {
            pose_landmarks: Some(NormalizedLandmarkList::new(vec![Landmark::new(0.1, 0.2, 0.3).with_visibility(0.9)])),
            right_hand_landmarks: Some(hand(0.7)),
            ..Default::default()
        };
        let keypoints = extract_keypoints(&results);

        assert_eq!(keypoints.slice(s![0..4]).to_vec(), vec![0.1, 0.2, 0.3, 0.9]);
        assert!(keypoints.slice(s![4..POSE_VALUES + FACE_VALUES + HAND_VALUES]).iter().all(|&v| v == 0.0));

        let right_start = POSE_VALUES + FACE_VALUES + HAND_VALUES;
        assert_eq!(keypoints[right_start], 0.7);
        assert_eq!(keypoints[right_start + 2], -0.1);
        assert_eq!(keypoints[KEYPOINT_VALUES - 3], 0.7);
    }

    #[test]
    fn test_extra_face_landmarks_are_dropped() {
        let face = NormalizedLandmarkList::new((0..478).map(|_| Landmark::new(0.5, 0.5, 0.5)).collect());
        let results = HolisticResult { face_landmarks: Some(face), ..Default::default() };
        let keypoints = extract_keypoints(&results);
        assert_eq!(keypoints.len(), KEYPOINT_VALUES);
        assert!(keypoints.slice(s![POSE_VALUES..POSE_VALUES + FACE_VALUES]).iter().all(|&v| v == 0.5));
        assert_eq!(keypoints[POSE_VALUES + FACE_VALUES], 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let path = env::temp_dir().join(format!("holistic_keypoints_{}.npy", std::process::id()));
        let results = HolisticResult { left_hand_landmarks: Some(hand(0.25)), ..Default::default() };
        let keypoints = extract_keypoints(&results);

        save_keypoints(&path, &keypoints).unwrap();
        let loaded = load_keypoints(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, keypoints);
    }

    #[test]
    fn test_load_wrong_length() {
        let path = env::temp_dir().join(format!("holistic_short_{}.npy", std::process::id()));
        save_keypoints(&path, &Array1::<f32>::zeros(10)).unwrap();
        let err = load_keypoints(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            err.downcast_ref::<HolisticError>(),
            Some(&HolisticError::Keypoints("expected 1662 keypoint values, got 10".to_string()))
        );
    }
}
