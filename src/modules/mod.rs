pub mod pose_detection_client;

pub use pose_detection_client::{PoseDetectionClient, PoseDetector};
