use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use anyhow::Error;
use opencv::core::{Point2f, Rect, Vec6f, Vector};
use opencv::imgproc::{Subdiv2D, Subdiv2DTrait, Subdiv2DTraitConst};
use crate::error::HolisticError;
use crate::utils::coordinate::NormalizedLandmarkList;

/// A pair of landmark indices joined by a line when drawn.
pub type Connection = (usize, usize);

pub const POSE_CONNECTIONS: [Connection; 35] = [
    (0, 1), (1, 2), (2, 3), (3, 7), (0, 4), (4, 5), (5, 6), (6, 8), (9, 10),
    (11, 12), (11, 13), (13, 15), (15, 17), (15, 19), (15, 21), (17, 19),
    (12, 14), (14, 16), (16, 18), (16, 20), (16, 22), (18, 20),
    (11, 23), (12, 24), (23, 24), (23, 25), (24, 26), (25, 27), (26, 28),
    (27, 29), (28, 30), (29, 31), (30, 32), (27, 31), (28, 32),
];

pub const HAND_PALM_CONNECTIONS: [Connection; 6] = [(0, 1), (0, 5), (9, 13), (13, 17), (5, 9), (0, 17)];
pub const HAND_THUMB_CONNECTIONS: [Connection; 3] = [(1, 2), (2, 3), (3, 4)];
pub const HAND_INDEX_FINGER_CONNECTIONS: [Connection; 3] = [(5, 6), (6, 7), (7, 8)];
pub const HAND_MIDDLE_FINGER_CONNECTIONS: [Connection; 3] = [(9, 10), (10, 11), (11, 12)];
pub const HAND_RING_FINGER_CONNECTIONS: [Connection; 3] = [(13, 14), (14, 15), (15, 16)];
pub const HAND_PINKY_FINGER_CONNECTIONS: [Connection; 3] = [(17, 18), (18, 19), (19, 20)];

pub const HAND_CONNECTIONS: [Connection; 21] = [
    (0, 1), (0, 5), (9, 13), (13, 17), (5, 9), (0, 17),
    (1, 2), (2, 3), (3, 4),
    (5, 6), (6, 7), (7, 8),
    (9, 10), (10, 11), (11, 12),
    (13, 14), (14, 15), (15, 16),
    (17, 18), (18, 19), (19, 20),
];

pub const FACEMESH_LIPS: [Connection; 40] = [
    (61, 146), (146, 91), (91, 181), (181, 84), (84, 17), (17, 314), (314, 405), (405, 321),
    (321, 375), (375, 291), (61, 185), (185, 40), (40, 39), (39, 37), (37, 0), (0, 267),
    (267, 269), (269, 270), (270, 409), (409, 291), (78, 95), (95, 88), (88, 178), (178, 87),
    (87, 14), (14, 317), (317, 402), (402, 318), (318, 324), (324, 308), (78, 191), (191, 80),
    (80, 81), (81, 82), (82, 13), (13, 312), (312, 311), (311, 310), (310, 415), (415, 308),
];

pub const FACEMESH_LEFT_EYE: [Connection; 16] = [
    (263, 249), (249, 390), (390, 373), (373, 374), (374, 380), (380, 381), (381, 382), (382, 362),
    (263, 466), (466, 388), (388, 387), (387, 386), (386, 385), (385, 384), (384, 398), (398, 362),
];

pub const FACEMESH_LEFT_EYEBROW: [Connection; 8] = [
    (276, 283), (283, 282), (282, 295), (295, 285), (300, 293), (293, 334), (334, 296), (296, 336),
];

pub const FACEMESH_RIGHT_EYE: [Connection; 16] = [
    (33, 7), (7, 163), (163, 144), (144, 145), (145, 153), (153, 154), (154, 155), (155, 133),
    (33, 246), (246, 161), (161, 160), (160, 159), (159, 158), (158, 157), (157, 173), (173, 133),
];

pub const FACEMESH_RIGHT_EYEBROW: [Connection; 8] = [
    (46, 53), (53, 52), (52, 65), (65, 55), (70, 63), (63, 105), (105, 66), (66, 107),
];

pub const FACEMESH_FACE_OVAL: [Connection; 36] = [
    (10, 338), (338, 297), (297, 332), (332, 284), (284, 251), (251, 389), (389, 356), (356, 454),
    (454, 323), (323, 361), (361, 288), (288, 397), (397, 365), (365, 379), (379, 378), (378, 400),
    (400, 377), (377, 152), (152, 148), (148, 176), (176, 149), (149, 150), (150, 136), (136, 172),
    (172, 58), (58, 132), (132, 93), (93, 234), (234, 127), (127, 162), (162, 21), (21, 54),
    (54, 103), (103, 67), (67, 109), (109, 10),
];

/// facemesh_contours joins lips, eyes, eyebrows and face oval into one connection set.
pub fn facemesh_contours() -> Vec<Connection> {
    let mut contours = Vec::with_capacity(124);
    contours.extend_from_slice(&FACEMESH_LIPS);
    contours.extend_from_slice(&FACEMESH_LEFT_EYE);
    contours.extend_from_slice(&FACEMESH_LEFT_EYEBROW);
    contours.extend_from_slice(&FACEMESH_RIGHT_EYE);
    contours.extend_from_slice(&FACEMESH_RIGHT_EYEBROW);
    contours.extend_from_slice(&FACEMESH_FACE_OVAL);
    contours
}

// normalized coordinates are scaled onto this grid before triangulation
const TESSELLATION_SCALE: f32 = 1000.0;

/// facemesh_tessellation_of triangulates the face landmarks and returns the triangle edges.
///
/// Edges come back as `(low, high)` index pairs in ascending order. Landmarks
/// far outside the frame are left out of the mesh, and landmarks sharing a
/// position are merged into the lowest index.
///
/// # Arguments
/// * `landmarks` - normalized face landmarks
///
/// # Returns
/// * `Result<Vec<Connection>, Error>`
pub fn facemesh_tessellation_of(landmarks: &NormalizedLandmarkList) -> Result<Vec<Connection>, Error> {
    if landmarks.len() < 3 {
        return Ok(vec![])
    }

    let scale = TESSELLATION_SCALE as i32;
    let mut subdiv = Subdiv2D::new(Rect::new(-scale, -scale, 3 * scale, 3 * scale))?;
    let mut point_to_index: HashMap<(u32, u32), usize> = HashMap::with_capacity(landmarks.len());

    for (idx, lmk) in landmarks.landmark.iter().enumerate() {
        if !(lmk.x > -0.99 && lmk.x < 1.99 && lmk.y > -0.99 && lmk.y < 1.99) {
            continue
        }
        let pt = Point2f::new(lmk.x * TESSELLATION_SCALE, lmk.y * TESSELLATION_SCALE);
        if point_to_index.contains_key(&(pt.x.to_bits(), pt.y.to_bits())) {
            continue
        }
        subdiv.insert(pt)?;
        point_to_index.insert((pt.x.to_bits(), pt.y.to_bits()), idx);
    }

    let mut triangles = Vector::<Vec6f>::new();
    subdiv.get_triangle_list(&mut triangles)?;

    let mut edges: BTreeSet<Connection> = BTreeSet::new();
    for t in triangles.iter() {
        let corners = [(t[0], t[1]), (t[2], t[3]), (t[4], t[5])]
            .map(|(x, y)| point_to_index.get(&(x.to_bits(), y.to_bits())).copied());
        // triangles touching the outer virtual vertices have no landmark behind them
        if let [Some(a), Some(b), Some(c)] = corners {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                edges.insert((from.min(to), from.max(to)));
            }
        }
    }
    Ok(edges.into_iter().collect())
}

/// Source of the connection sets used to draw each landmark collection.
pub trait ConnectionTopology {
    /// facemesh_tessellation returns the face connections for the given face landmarks.
    fn facemesh_tessellation(&self, landmarks: &NormalizedLandmarkList) -> Result<Cow<'_, [Connection]>, Error>;
    fn pose_connections(&self) -> &[Connection];
    fn hand_connections(&self) -> &[Connection];
}

/// How the face collection is connected.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceTopology {
    /// Triangle mesh rebuilt from the landmarks of every frame.
    Tessellation,
    /// A fixed set of index pairs, e.g. the contours or a tessellation table.
    Fixed(Vec<Connection>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HolisticConnections {
    face: FaceTopology,
}

impl HolisticConnections {

    /// new tessellates the face collection.
    pub fn new() -> Self {
        HolisticConnections {
            face: FaceTopology::Tessellation,
        }
    }

    /// contours draws the face as lips, eyes, eyebrows and face oval.
    pub fn contours() -> Self {
        Self::with_face_connections(facemesh_contours())
    }

    /// with_face_connections replaces the face topology with a fixed connection set.
    pub fn with_face_connections(face: Vec<Connection>) -> Self {
        HolisticConnections { face: FaceTopology::Fixed(face) }
    }

    pub fn face_topology(&self) -> &FaceTopology {
        &self.face
    }

    /// from_face_json_str reads the face connection set from a JSON array of index pairs.
    ///
    /// # Arguments
    /// * `json` - e.g. `[[127, 34], [34, 139]]`
    ///
    /// # Returns
    /// * `Result<HolisticConnections, Error>`
    pub fn from_face_json_str(json: &str) -> Result<Self, Error> {
        let face: Vec<Connection> = serde_json::from_str(json)?;
        if face.is_empty() {
            return Err(HolisticError::Config("face connection list is empty".to_string()).into())
        }
        Ok(Self::with_face_connections(face))
    }

    pub fn from_face_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_face_json_str(&json)
    }
}

impl Default for HolisticConnections {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionTopology for HolisticConnections {
    fn facemesh_tessellation(&self, landmarks: &NormalizedLandmarkList) -> Result<Cow<'_, [Connection]>, Error> {
        match &self.face {
            FaceTopology::Tessellation => Ok(Cow::Owned(facemesh_tessellation_of(landmarks)?)),
            FaceTopology::Fixed(face) => Ok(Cow::Borrowed(face.as_slice())),
        }
    }

    fn pose_connections(&self) -> &[Connection] {
        &POSE_CONNECTIONS
    }

    fn hand_connections(&self) -> &[Connection] {
        &HAND_CONNECTIONS
    }
}
