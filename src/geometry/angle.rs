use std::fmt;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use crate::utils::coordinate::PoseLandmark;

/// Why an angle could not be computed.
///
/// All reasons look the same to the user; they exist for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "landmark", rename_all = "snake_case")]
pub enum UndeterminedReason {
    /// The detector found no person in the image.
    NoPersonDetected,
    /// A required landmark is absent from the detector output.
    MissingLandmark(PoseLandmark),
    /// A required landmark is below the configured visibility threshold.
    LowVisibility(PoseLandmark),
    /// Two of the three points coincide, so one arm of the angle has zero length.
    DegenerateGeometry,
}

impl fmt::Display for UndeterminedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndeterminedReason::NoPersonDetected => write!(f, "no person detected"),
            UndeterminedReason::MissingLandmark(lm) => write!(f, "missing landmark {lm:?}"),
            UndeterminedReason::LowVisibility(lm) => write!(f, "landmark {lm:?} below visibility threshold"),
            UndeterminedReason::DegenerateGeometry => write!(f, "degenerate geometry"),
        }
    }
}

/// AngleResult is either an angle in degrees within [0, 180] or undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleResult {
    Degrees(f64),
    Undetermined(UndeterminedReason),
}

impl AngleResult {
    pub fn degrees(&self) -> Option<f64> {
        match self {
            AngleResult::Degrees(deg) => Some(*deg),
            AngleResult::Undetermined(_) => None,
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, AngleResult::Degrees(_))
    }

    pub fn undetermined_reason(&self) -> Option<UndeterminedReason> {
        match self {
            AngleResult::Degrees(_) => None,
            AngleResult::Undetermined(reason) => Some(*reason),
        }
    }
}

/// angle_at_vertex computes the angle a-vertex-c in degrees.
///
/// The angle is taken between the vectors `a - vertex` and `c - vertex`. A
/// zero-length vector yields `Undetermined(DegenerateGeometry)`. The cosine is
/// clamped to [-1, 1] before `acos` so rounding never produces NaN.
///
/// # Arguments
/// * `a` - first arm endpoint
/// * `vertex` - the vertex
/// * `c` - second arm endpoint
///
/// # Returns
/// * `AngleResult`
pub fn angle_at_vertex(a: &Vector2<f64>, vertex: &Vector2<f64>, c: &Vector2<f64>) -> AngleResult {
    let v1 = a - vertex;
    let v2 = c - vertex;

    let denom = v1.norm() * v2.norm();
    if denom == 0.0 || !denom.is_finite() {
        return AngleResult::Undetermined(UndeterminedReason::DegenerateGeometry)
    }

    let cos_angle = v1.dot(&v2) / denom;
    if cos_angle.is_nan() {
        return AngleResult::Undetermined(UndeterminedReason::DegenerateGeometry)
    }

    AngleResult::Degrees(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}
