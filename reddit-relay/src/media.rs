use crate::types::Result;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

pub const JPEG_MIME: &str = "image/jpeg";

/// Decode a downloaded image and re-encode it as an RGB JPEG for upload.
///
/// Alpha channels (PNG) are dropped.
pub fn reencode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();

    let mut out = Vec::with_capacity(bytes.len());
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.encode_image(&rgb)?;

    debug!(
        "Re-encoded {}x{} image: {} -> {} bytes",
        rgb.width(),
        rgb.height(),
        bytes.len(),
        out.len()
    );
    Ok(out)
}
