use anyhow::Error;
use opencv::core::{Mat, MatTraitConst};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use crate::config::config::PipelineConfig;
use crate::geometry::angle::{AngleResult, UndeterminedReason};
use crate::helper::pose_helper::{PoseHelper, Side};
use crate::modules::pose_detection_client::PoseDetector;
use crate::render::annotation::Annotator;
use crate::utils::coordinate::JointTriplet;
use crate::utils::image::{convert_bgr_to_rgb, decode_image, encode_png};

pub const ANNOTATED_MIME: &str = "image/png";

pub const WARNING_MESSAGE: &str =
    "Could not calculate the angle reliably. Upload a clearer frontal image showing shoulder, elbow, and torso.";

/// ShoulderAnalysis is everything produced for one uploaded photo and side.
pub struct ShoulderAnalysis {
    pub side: Side,
    pub angle: AngleResult,
    pub triplet: JointTriplet,
    /// Annotated BGR image.
    pub annotated: Mat,
    /// `annotated` encoded as PNG, ready for display or download.
    pub png: Vec<u8>,
}

impl ShoulderAnalysis {
    pub fn is_success(&self) -> bool {
        self.angle.is_determined()
    }

    /// message returns the success or warning text shown to the user.
    pub fn message(&self) -> String {
        match self.angle {
            AngleResult::Degrees(deg) => format!("Estimated {} shoulder angle: {deg:.1}°", self.side),
            AngleResult::Undetermined(_) => WARNING_MESSAGE.to_string(),
        }
    }

    pub fn caption(&self) -> String {
        format!("Annotated image ({} shoulder)", self.side)
    }

    pub fn report(&self, output_filename: &str) -> ShoulderReport {
        ShoulderReport {
            side: self.side,
            angle_degrees: self.angle.degrees(),
            undetermined_reason: self.angle.undetermined_reason(),
            message: self.message(),
            triplet: self.triplet,
            image_width: self.annotated.cols(),
            image_height: self.annotated.rows(),
            output_filename: output_filename.to_string(),
            mime: ANNOTATED_MIME.to_string(),
        }
    }
}

/// ShoulderReport is the serializable summary of a `ShoulderAnalysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoulderReport {
    pub side: Side,
    pub angle_degrees: Option<f64>,
    pub undetermined_reason: Option<UndeterminedReason>,
    pub message: String,
    pub triplet: JointTriplet,
    pub image_width: i32,
    pub image_height: i32,
    pub output_filename: String,
    pub mime: String,
}

/// ShoulderAnglePipeline runs decode, detection, selection, measurement, annotation and encoding.
///
/// Each call is independent; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct ShoulderAnglePipeline<D> {
    detector: D,
    pose_helper: PoseHelper,
    annotator: Annotator,
    min_detection_confidence: f32,
    output_filename: String,
}

impl<D: PoseDetector> ShoulderAnglePipeline<D> {

    /// new initializes new instance of the pipeline
    pub fn new(detector: D, config: PipelineConfig) -> Self {
        ShoulderAnglePipeline {
            detector,
            pose_helper: PoseHelper::new(config.detection.min_visibility),
            annotator: Annotator::new(config.annotation),
            min_detection_confidence: config.detection.min_detection_confidence,
            output_filename: config.output_filename,
        }
    }

    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// process analyzes one uploaded photo.
    ///
    /// Fails only on undecodable input, detector faults and drawing or encoding faults.
    /// No person, missing landmarks and degenerate geometry come back as an undetermined angle.
    ///
    /// # Arguments
    /// * `im_bytes` - uploaded JPEG/PNG bytes
    /// * `side` - shoulder side
    ///
    /// # Returns
    /// * `Result<ShoulderAnalysis, Error>`
    #[instrument(skip_all, fields(side = %side, bytes = im_bytes.len()))]
    pub async fn process(&self, im_bytes: &[u8], side: Side) -> Result<ShoulderAnalysis, Error> {
        let img_bgr = decode_image(im_bytes)?;
        self.analyze(&img_bgr, side).await
    }

    /// analyze runs the pipeline on an already decoded BGR image.
    pub async fn analyze(&self, img_bgr: &Mat, side: Side) -> Result<ShoulderAnalysis, Error> {
        let (width, height) = (img_bgr.cols(), img_bgr.rows());
        let img_rgb = convert_bgr_to_rgb(img_bgr)?;
        let landmarks = self.detector.detect(&img_rgb, self.min_detection_confidence).await?;

        let (angle, triplet) = self.pose_helper.compute_shoulder_angle(landmarks.as_ref(), side, width, height);
        match angle {
            AngleResult::Degrees(deg) => info!(%side, angle = deg, "shoulder angle computed"),
            AngleResult::Undetermined(reason) => warn!(%side, %reason, "shoulder angle undetermined"),
        }

        let annotated = self.annotator.render_annotation(img_bgr, &triplet, &angle, side)?;
        let png = encode_png(&annotated)?;

        Ok(ShoulderAnalysis {
            side,
            angle,
            triplet,
            annotated,
            png,
        })
    }
}
