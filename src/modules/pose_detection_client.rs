use std::time::Duration;
use anyhow::Error;
use ndarray::{Array2, Axis};
use opencv::core::{Mat, MatTraitConst, MatTraitConstManual};
use tracing::debug;
use crate::config::config::PoseDetectionConfig;
use crate::error::PipelineError;
use crate::pose_client::client::PoseInferenceClient;
use crate::pose_client::pose::{DetectRequest, DetectResponse};
use crate::utils::coordinate::{LandmarkSet, NormalizedLandmark, PoseLandmark};
use crate::utils::utils::u8_to_f32_vec;

/// PoseDetector maps an RGB image to the landmarks of the person in it.
///
/// `Ok(None)` means no person was found, which is not an error.
#[allow(async_fn_in_trait)]
pub trait PoseDetector {
    async fn detect(&self, image_rgb: &Mat, min_detection_confidence: f32) -> Result<Option<LandmarkSet>, Error>;
}

/// PoseDetectionClient runs pose detection on a remote inference service.
#[derive(Debug, Clone)]
pub struct PoseDetectionClient {
    infer_client: PoseInferenceClient,
    pub model_name: String,
    pub timeout: u64,
}

impl PoseDetectionClient {
    pub fn new(infer_client: PoseInferenceClient, config: &PoseDetectionConfig) -> Self {
        PoseDetectionClient {
            infer_client,
            model_name: config.model_name.clone(),
            timeout: config.timeout,
        }
    }

    /// from_config builds the transport from `config.endpoint`. Must be called inside a tokio runtime.
    pub fn from_config(config: &PoseDetectionConfig) -> Result<Self, Error> {
        let infer_client = PoseInferenceClient::new(&config.endpoint, Duration::from_secs(config.timeout))?;
        Ok(PoseDetectionClient::new(infer_client, config))
    }

    fn preprocess(&self, image_rgb: &Mat, min_detection_confidence: f32) -> Result<DetectRequest, Error> {
        if image_rgb.channels() != 3 {
            return Err(Error::msg(format!(
                "pose_detection_client - expected a 3-channel image, got {} channels", image_rgb.channels()
            )))
        }

        let image_data = if image_rgb.is_continuous() {
            image_rgb.data_bytes()?.to_vec()
        } else {
            image_rgb.try_clone()?.data_bytes()?.to_vec()
        };

        Ok(DetectRequest {
            model_name: self.model_name.to_owned(),
            image_data,
            shape: vec![image_rgb.rows() as i64, image_rgb.cols() as i64, 3],
            min_detection_confidence,
        })
    }
}

/// parse_landmarks decodes a detector response into a landmark set.
///
/// The raw tensor has one row per landmark in `PoseLandmark` order with columns
/// x, y and optionally z and visibility. A missing visibility column counts as fully visible.
/// Rows past the known topology are ignored, and so are rows whose x or y is not finite:
/// those landmarks are reported as missing.
///
/// # Arguments
/// * `response` - detector response
///
/// # Returns
/// * `Result<Option<LandmarkSet>, Error>` - `None` when no person was detected
pub fn parse_landmarks(response: &DetectResponse) -> Result<Option<LandmarkSet>, Error> {
    if !response.person_detected {
        return Ok(None)
    }

    let dims: Vec<usize> = match response.shape.as_slice() {
        [rows, cols] | [1, rows, cols] if *rows >= 0 && *cols >= 2 => vec![*rows as usize, *cols as usize],
        other => {
            return Err(PipelineError::InvalidDetectorOutput(format!("unexpected landmark shape {other:?}")).into())
        }
    };

    let values = u8_to_f32_vec(&response.raw_landmarks)?;
    let landmarks = match Array2::from_shape_vec((dims[0], dims[1]), values) {
        Ok(landmarks) => landmarks,
        Err(e) => return Err(PipelineError::InvalidDetectorOutput(e.to_string()).into())
    };

    if landmarks.nrows() == 0 {
        return Ok(None)
    }

    let cols = landmarks.ncols();
    let set: LandmarkSet = landmarks
        .axis_iter(Axis(0))
        .enumerate()
        .filter_map(|(idx, row)| {
            let name = PoseLandmark::from_index(idx)?;
            if !row[0].is_finite() || !row[1].is_finite() {
                debug!(landmark = ?name, x = row[0], y = row[1], "dropping non-finite landmark");
                return None
            }
            let landmark = NormalizedLandmark {
                x: row[0],
                y: row[1],
                z: if cols > 2 { row[2] } else { 0.0 },
                visibility: if cols > 3 { row[3] } else { 1.0 },
            };
            Some((name, landmark))
        })
        .collect();

    Ok(Some(set))
}

impl PoseDetector for PoseDetectionClient {
    async fn detect(&self, image_rgb: &Mat, min_detection_confidence: f32) -> Result<Option<LandmarkSet>, Error> {
        let request = self.preprocess(image_rgb, min_detection_confidence)?;
        let response = self.infer_client.detect(request).await?;
        let landmarks = parse_landmarks(&response)?;
        debug!(
            model = %self.model_name,
            person_detected = landmarks.is_some(),
            landmarks = landmarks.as_ref().map_or(0, |l| l.len()),
            "pose detect response"
        );
        Ok(landmarks)
    }
}

#[cfg(test)]
mod tests {
    use opencv::core::{CV_8UC1, CV_8UC3, Mat, Scalar};
    use crate::config::config::PoseDetectionConfig;
    use crate::error::PipelineError;
    use crate::modules::pose_detection_client::{parse_landmarks, PoseDetectionClient};
    use crate::pose_client::pose::DetectResponse;
    use crate::utils::coordinate::PoseLandmark;
    use crate::utils::utils::f32_to_u8_vec;

    fn response(rows: usize, cols: usize, person_detected: bool) -> DetectResponse {
        let values: Vec<f32> = (0..rows * cols).map(|i| i as f32 / 1000.0).collect();
        DetectResponse {
            model_name: "blazepose_full".to_string(),
            person_detected,
            raw_landmarks: f32_to_u8_vec(&values),
            shape: vec![rows as i64, cols as i64],
        }
    }

    #[test]
    fn test_parse_full_topology() {
        let set = parse_landmarks(&response(33, 4, true)).unwrap().unwrap();
        assert_eq!(set.len(), 33);
        let shoulder = set.get(PoseLandmark::LeftShoulder).unwrap();
        assert_eq!(shoulder.x, 44.0 / 1000.0);
        assert_eq!(shoulder.y, 45.0 / 1000.0);
        assert_eq!(shoulder.visibility, 47.0 / 1000.0);
    }

    #[test]
    fn test_parse_without_visibility_column() {
        let set = parse_landmarks(&response(25, 2, true)).unwrap().unwrap();
        assert_eq!(set.len(), 25);
        assert_eq!(set.get(PoseLandmark::RightHip).unwrap().visibility, 1.0);
        assert!(set.get(PoseLandmark::LeftKnee).is_none());
    }

    #[test]
    fn test_parse_ignores_extra_rows_and_batch_dim() {
        let mut resp = response(40, 4, true);
        resp.shape = vec![1, 40, 4];
        assert_eq!(parse_landmarks(&resp).unwrap().unwrap().len(), 33);
    }

    #[test]
    fn test_parse_no_person() {
        assert!(parse_landmarks(&response(33, 4, false)).unwrap().is_none());
        assert!(parse_landmarks(&response(0, 4, true)).unwrap().is_none());
    }

    #[test]
    fn test_parse_drops_non_finite_rows() {
        let mut values: Vec<f32> = (0..33 * 4).map(|i| i as f32 / 1000.0).collect();
        values[PoseLandmark::LeftShoulder.index() * 4] = f32::NAN;
        values[PoseLandmark::LeftElbow.index() * 4 + 1] = f32::INFINITY;
        values[PoseLandmark::LeftHip.index() * 4] = 1e7;
        let resp = DetectResponse {
            model_name: "blazepose_full".to_string(),
            person_detected: true,
            raw_landmarks: f32_to_u8_vec(&values),
            shape: vec![33, 4],
        };

        let set = parse_landmarks(&resp).unwrap().unwrap();
        assert_eq!(set.len(), 31);
        assert!(set.get(PoseLandmark::LeftShoulder).is_none());
        assert!(set.get(PoseLandmark::LeftElbow).is_none());
        // finite but off-image coordinates are kept as reported
        assert_eq!(set.get(PoseLandmark::LeftHip).unwrap().x, 1e7);
    }

    #[test]
    fn test_parse_rejects_inconsistent_payload() {
        let mut resp = response(33, 4, true);
        resp.shape = vec![34, 4];
        let err = parse_landmarks(&resp).unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::InvalidDetectorOutput(_))));

        resp.shape = vec![33 * 4];
        assert!(parse_landmarks(&resp).is_err());

        let mut resp = response(33, 4, true);
        resp.raw_landmarks.pop();
        assert!(parse_landmarks(&resp).is_err());
    }

    #[tokio::test]
    async fn test_preprocess_request() {
        let client = PoseDetectionClient::from_config(&PoseDetectionConfig::new()).unwrap();
        let img = Mat::new_rows_cols_with_default(6, 8, CV_8UC3, Scalar::new(1.0, 2.0, 3.0, 0.0)).unwrap();
        let request = client.preprocess(&img, 0.4).unwrap();
        assert_eq!(request.shape, vec![6, 8, 3]);
        assert_eq!(request.image_data.len(), 6 * 8 * 3);
        assert_eq!(&request.image_data[..3], &[1, 2, 3]);
        assert_eq!(request.min_detection_confidence, 0.4);
        assert_eq!(request.model_name, "blazepose_full");

        let gray = Mat::new_rows_cols_with_default(6, 8, CV_8UC1, Scalar::all(0.0)).unwrap();
        assert!(client.preprocess(&gray, 0.4).is_err());
    }
}
