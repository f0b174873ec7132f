pub mod pipeline;

pub use pipeline::{ShoulderAnalysis, ShoulderAnglePipeline, ShoulderReport, ANNOTATED_MIME};
