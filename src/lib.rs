pub mod config;
pub mod error;
pub mod geometry;
pub mod helper;
pub mod modules;
pub mod pipeline;
pub mod pose_client;
pub mod render;
pub mod utils;

pub use config::config::{AnnotationConfig, PipelineConfig, PoseDetectionConfig};
pub use error::PipelineError;
pub use geometry::angle::{angle_at_vertex, AngleResult, UndeterminedReason};
pub use helper::pose_helper::{PoseHelper, Side};
pub use modules::pose_detection_client::{PoseDetectionClient, PoseDetector};
pub use pipeline::pipeline::{ShoulderAnalysis, ShoulderAnglePipeline, ShoulderReport};
pub use render::annotation::Annotator;
pub use utils::coordinate::{JointTriplet, LandmarkSet, NormalizedLandmark, PixelPoint, PoseLandmark};
