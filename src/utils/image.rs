use anyhow::Error;
use opencv::core::{Mat, MatTraitConst, Vector};
use opencv::imgcodecs::{imdecode, imencode, IMREAD_COLOR};
use opencv::imgproc::{COLOR_BGR2RGB, cvt_color};
use crate::error::PipelineError;

/// decode_image turns uploaded JPEG/PNG bytes into a 3-channel BGR matrix.
///
/// # Arguments
/// * `im_bytes` - encoded image bytes
///
/// # Returns
/// * `Result<Mat, Error>` - fails with `PipelineError::Decode` when the bytes are not an image
pub fn decode_image(im_bytes: &[u8]) -> Result<Mat, Error> {
    if im_bytes.is_empty() {
        return Err(PipelineError::Decode("empty upload".to_string()).into())
    }

    let buf = Vector::<u8>::from_slice(im_bytes);
    let img_bgr = match imdecode(&buf, IMREAD_COLOR) {
        Ok(img_bgr) => img_bgr,
        Err(e) => return Err(PipelineError::Decode(e.message).into())
    };

    if img_bgr.empty() {
        return Err(PipelineError::Decode("unsupported or corrupt image data".to_string()).into())
    }

    Ok(img_bgr)
}

/// convert_bgr_to_rgb returns an RGB copy of a BGR matrix, as expected by the pose detector.
pub fn convert_bgr_to_rgb(img_bgr: &Mat) -> Result<Mat, Error> {
    let mut img_rgb = Mat::default();
    cvt_color(img_bgr, &mut img_rgb, COLOR_BGR2RGB, 0)?;
    Ok(img_rgb)
}

/// encode_png encodes a BGR matrix as PNG bytes.
pub fn encode_png(img_bgr: &Mat) -> Result<Vec<u8>, Error> {
    let mut buf = Vector::<u8>::new();
    let encoded = match imencode(".png", img_bgr, &mut buf, &Vector::<i32>::new()) {
        Ok(encoded) => encoded,
        Err(e) => return Err(PipelineError::Encode(e.message).into())
    };

    if !encoded {
        return Err(PipelineError::Encode("png encoder rejected the image".to_string()).into())
    }

    Ok(buf.to_vec())
}
