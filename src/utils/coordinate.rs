use std::collections::BTreeMap;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// PoseLandmark names the 33 points of the BlazePose topology, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoseLandmark {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl PoseLandmark {
    pub const COUNT: usize = 33;

    pub const ALL: [PoseLandmark; PoseLandmark::COUNT] = [
        PoseLandmark::Nose,
        PoseLandmark::LeftEyeInner,
        PoseLandmark::LeftEye,
        PoseLandmark::LeftEyeOuter,
        PoseLandmark::RightEyeInner,
        PoseLandmark::RightEye,
        PoseLandmark::RightEyeOuter,
        PoseLandmark::LeftEar,
        PoseLandmark::RightEar,
        PoseLandmark::MouthLeft,
        PoseLandmark::MouthRight,
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
        PoseLandmark::LeftElbow,
        PoseLandmark::RightElbow,
        PoseLandmark::LeftWrist,
        PoseLandmark::RightWrist,
        PoseLandmark::LeftPinky,
        PoseLandmark::RightPinky,
        PoseLandmark::LeftIndex,
        PoseLandmark::RightIndex,
        PoseLandmark::LeftThumb,
        PoseLandmark::RightThumb,
        PoseLandmark::LeftHip,
        PoseLandmark::RightHip,
        PoseLandmark::LeftKnee,
        PoseLandmark::RightKnee,
        PoseLandmark::LeftAnkle,
        PoseLandmark::RightAnkle,
        PoseLandmark::LeftHeel,
        PoseLandmark::RightHeel,
        PoseLandmark::LeftFootIndex,
        PoseLandmark::RightFootIndex,
    ];

    /// index returns the row of this landmark in the detector output tensor.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// NormalizedLandmark is a detector point with coordinates relative to the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        NormalizedLandmark { x, y, z: 0.0, visibility }
    }

    /// has_finite_position reports whether x and y can be placed on an image.
    pub fn has_finite_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// LandmarkSet holds the landmarks found for a single person.
///
/// A detector may leave out points it could not place, so lookups are fallible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    landmarks: BTreeMap<PoseLandmark, NormalizedLandmark>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        LandmarkSet::default()
    }

    pub fn insert(&mut self, name: PoseLandmark, landmark: NormalizedLandmark) {
        self.landmarks.insert(name, landmark);
    }

    pub fn with(mut self, name: PoseLandmark, landmark: NormalizedLandmark) -> Self {
        self.insert(name, landmark);
        self
    }

    pub fn get(&self, name: PoseLandmark) -> Option<&NormalizedLandmark> {
        self.landmarks.get(&name)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PoseLandmark, &NormalizedLandmark)> {
        self.landmarks.iter()
    }
}

impl FromIterator<(PoseLandmark, NormalizedLandmark)> for LandmarkSet {
    fn from_iter<T: IntoIterator<Item = (PoseLandmark, NormalizedLandmark)>>(iter: T) -> Self {
        LandmarkSet { landmarks: iter.into_iter().collect() }
    }
}

/// PixelPoint is an integer position in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        PixelPoint { x, y }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x as f64, self.y as f64)
    }
}

/// JointTriplet holds the pixel positions used for one shoulder.
///
/// The shoulder is the vertex of the measured angle. Each point is present
/// only when the detector returned the matching landmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointTriplet {
    pub shoulder: Option<PixelPoint>,
    pub elbow: Option<PixelPoint>,
    pub hip: Option<PixelPoint>,
}

impl JointTriplet {
    pub fn empty() -> Self {
        JointTriplet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shoulder.is_none() && self.elbow.is_none() && self.hip.is_none()
    }

    /// points returns (elbow, shoulder, hip) when all three are present.
    pub fn points(&self) -> Option<(PixelPoint, PixelPoint, PixelPoint)> {
        Some((self.elbow?, self.shoulder?, self.hip?))
    }
}
