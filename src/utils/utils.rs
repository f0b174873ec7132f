use anyhow::Error;
use crate::error::PipelineError;

/// u8_to_f32_vec reinterprets a little-endian byte buffer as a vector of f32.
///
/// The buffer length must be a multiple of 4.
pub fn u8_to_f32_vec(v: &[u8]) -> Result<Vec<f32>, Error> {
    if v.len() % 4 != 0 {
        return Err(PipelineError::InvalidDetectorOutput(
            format!("raw tensor of {} bytes is not a whole number of fp32 values", v.len())
        ).into())
    }

    Ok(v.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// f32_to_u8_vec is the inverse of `u8_to_f32_vec`.
pub fn f32_to_u8_vec(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|x| x.to_le_bytes()).collect()
}
