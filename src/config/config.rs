use std::fs;
use std::path::Path;
use anyhow::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoseDetectionConfig {
    pub endpoint: String,
    pub model_name: String,
    pub timeout: u64,
    pub min_detection_confidence: f32,
    /// Landmarks below this visibility make the angle undetermined. `None` disables the gate.
    pub min_visibility: Option<f32>,
}

impl PoseDetectionConfig {
    pub fn new() -> Self {
        PoseDetectionConfig {
            endpoint: "http://127.0.0.1:8001".to_string(),
            model_name: "blazepose_full".to_string(),
            timeout: 20,
            min_detection_confidence: 0.4,
            min_visibility: None,
        }
    }
}

impl Default for PoseDetectionConfig {
    fn default() -> Self {
        PoseDetectionConfig::new()
    }
}

/// Drawing options for the annotated image. Colors are RGB.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnnotationConfig {
    pub line_width: i32,
    pub marker_radius: i32,
    pub line_color: [u8; 3],
    pub shoulder_color: [u8; 3],
    pub elbow_color: [u8; 3],
    pub hip_color: [u8; 3],
    pub label_color: [u8; 3],
    pub outline_color: [u8; 3],
    /// Hershey font name, e.g. "simplex", "duplex", "triplex".
    pub font: String,
    pub font_scale: f64,
    pub font_thickness: i32,
    pub label_offset: (i32, i32),
    pub fallback_label_position: (i32, i32),
}

impl AnnotationConfig {
    pub fn new() -> Self {
        AnnotationConfig {
            line_width: 4,
            marker_radius: 6,
            line_color: [255, 255, 255],
            shoulder_color: [255, 0, 0],
            elbow_color: [0, 255, 0],
            hip_color: [0, 0, 255],
            label_color: [255, 255, 255],
            outline_color: [0, 0, 0],
            font: "simplex".to_string(),
            font_scale: 0.7,
            font_thickness: 2,
            label_offset: (10, -30),
            fallback_label_position: (10, 10),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        AnnotationConfig::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub detection: PoseDetectionConfig,
    pub annotation: AnnotationConfig,
    pub output_filename: String,
}

impl PipelineConfig {
    pub fn new() -> Self {
        PipelineConfig {
            detection: PoseDetectionConfig::new(),
            annotation: AnnotationConfig::new(),
            output_filename: "annotated_shoulder.png".to_string(),
        }
    }

    /// load reads a TOML configuration file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(content)?)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig::new()
    }
}
