use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::PipelineError;
use crate::geometry::angle::{angle_at_vertex, AngleResult, UndeterminedReason};
use crate::utils::coordinate::{JointTriplet, LandmarkSet, NormalizedLandmark, PixelPoint, PoseLandmark};

/// Side is the shoulder being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// landmarks returns the (shoulder, elbow, hip) landmark names for this side.
    pub fn landmarks(&self) -> (PoseLandmark, PoseLandmark, PoseLandmark) {
        match self {
            Side::Left => (PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow, PoseLandmark::LeftHip),
            Side::Right => (PoseLandmark::RightShoulder, PoseLandmark::RightElbow, PoseLandmark::RightHip),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(PipelineError::InvalidSide(s.to_string())),
        }
    }
}

/// landmark_to_pixel scales a normalized landmark to pixel coordinates, truncating toward zero.
pub fn landmark_to_pixel(landmark: &NormalizedLandmark, image_width: i32, image_height: i32) -> PixelPoint {
    PixelPoint::new(
        (landmark.x as f64 * image_width as f64) as i32,
        (landmark.y as f64 * image_height as f64) as i32,
    )
}

/// PoseHelper picks the shoulder, elbow and hip for one side and measures the shoulder angle.
#[derive(Debug, Clone, Default)]
pub struct PoseHelper {
    min_visibility: Option<f32>,
}

impl PoseHelper {

    /// new initializes new instance of the pose helper.
    ///
    /// # Arguments
    /// * `min_visibility` - when set, landmarks with a lower visibility make the angle undetermined
    pub fn new(min_visibility: Option<f32>) -> Self {
        PoseHelper {
            min_visibility,
        }
    }

    /// select_joint_triplet converts the shoulder, elbow and hip of `side` to pixel coordinates.
    ///
    /// An absent landmark set (no person detected) gives an empty triplet, and a landmark with a
    /// non-finite position is left out. Visibility is not looked at here. The matching
    /// undetermined outcome is produced by `compute_shoulder_angle`, which callers should use
    /// when they need the angle as well.
    ///
    /// # Arguments
    /// * `landmarks` - detector output, `None` when no person was found
    /// * `side` - shoulder side
    /// * `image_width` - image width in pixels
    /// * `image_height` - image height in pixels
    ///
    /// # Returns
    /// * `JointTriplet`
    pub fn select_joint_triplet(
        &self,
        landmarks: Option<&LandmarkSet>,
        side: Side,
        image_width: i32,
        image_height: i32,
    ) -> JointTriplet {
        let landmarks = match landmarks {
            None => return JointTriplet::empty(),
            Some(landmarks) => landmarks,
        };

        let (shoulder, elbow, hip) = side.landmarks();
        let to_pixel = |name: PoseLandmark| {
            landmarks
                .get(name)
                .filter(|lm| lm.has_finite_position())
                .map(|lm| landmark_to_pixel(lm, image_width, image_height))
        };

        JointTriplet {
            shoulder: to_pixel(shoulder),
            elbow: to_pixel(elbow),
            hip: to_pixel(hip),
        }
    }

    /// compute_shoulder_angle selects the triplet for `side` and measures the angle at the shoulder
    /// between the elbow and the hip.
    ///
    /// No person gives `NoPersonDetected` with an empty triplet. A landmark that is absent or has a
    /// non-finite position gives `MissingLandmark`. With the visibility gate on, a visibility below
    /// the threshold or not finite gives `LowVisibility`.
    ///
    /// # Returns
    /// * `(AngleResult, JointTriplet)` - the triplet is returned even when the angle is undetermined
    pub fn compute_shoulder_angle(
        &self,
        landmarks: Option<&LandmarkSet>,
        side: Side,
        image_width: i32,
        image_height: i32,
    ) -> (AngleResult, JointTriplet) {
        let triplet = self.select_joint_triplet(landmarks, side, image_width, image_height);

        let landmarks = match landmarks {
            None => return (AngleResult::Undetermined(UndeterminedReason::NoPersonDetected), triplet),
            Some(landmarks) => landmarks,
        };

        let (shoulder, elbow, hip) = side.landmarks();
        for name in [elbow, shoulder, hip] {
            let landmark = match landmarks.get(name) {
                Some(landmark) if landmark.has_finite_position() => landmark,
                _ => return (AngleResult::Undetermined(UndeterminedReason::MissingLandmark(name)), triplet),
            };
            if let Some(min_visibility) = self.min_visibility {
                if !landmark.visibility.is_finite() || landmark.visibility < min_visibility {
                    return (AngleResult::Undetermined(UndeterminedReason::LowVisibility(name)), triplet)
                }
            }
        }

        let angle = match triplet.points() {
            Some((e, s, h)) => angle_at_vertex(&e.to_vector(), &s.to_vector(), &h.to_vector()),
            None => AngleResult::Undetermined(UndeterminedReason::DegenerateGeometry),
        };

        (angle, triplet)
    }
}
