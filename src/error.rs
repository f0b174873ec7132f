use thiserror::Error;

/// Failures the caller of the pipeline is expected to tell apart.
///
/// They travel inside `anyhow::Error`; use `downcast_ref::<PipelineError>()`
/// to recover the variant.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The uploaded bytes are not a readable image.
    #[error("unable to read the image: {0}")]
    Decode(String),

    /// The annotated image could not be encoded.
    #[error("unable to encode the annotated image: {0}")]
    Encode(String),

    /// Shoulder side outside of {left, right}.
    #[error("invalid shoulder side {0:?}, expected \"left\" or \"right\"")]
    InvalidSide(String),

    /// The pose detector could not be reached or refused the request.
    #[error("pose detector failed: {0}")]
    Detector(String),

    /// The pose detector answered with a payload that does not describe landmarks.
    #[error("invalid pose detector output: {0}")]
    InvalidDetectorOutput(String),
}
