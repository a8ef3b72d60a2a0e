//! Transport encoding for rasters: lossless PNG, wrapped in standard base64.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbaImage};

use crate::{
    error::{DecodeError, Error, Result},
    raster::PixelBuffer,
};

pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>> {
    let Some(img) = RgbaImage::from_raw(buf.width(), buf.height(), buf.as_bytes().to_vec()) else {
        return Err(Error::Surface {
            width: buf.width(),
            height: buf.height(),
        });
    };
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(out.into_inner())
}

pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(DecodeError::from)?
        .into_rgba8();
    PixelBuffer::from_rgba_bytes(img.width(), img.height(), img.as_raw())
}

/// Encodes `buf` as a base64 PNG payload.
pub fn encode_base64(buf: &PixelBuffer) -> Result<String> {
    Ok(STANDARD.encode(encode_png(buf)?))
}

/// Decodes a base64 PNG payload. A leading `data:image/png;base64,` prefix is accepted and skipped.
pub fn decode_base64(payload: &str) -> Result<PixelBuffer> {
    let payload = match payload.strip_prefix("data:") {
        Some(url) => url.split_once(',').map_or(url, |(_, data)| data),
        None => payload,
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(DecodeError::from)?;
    decode_png(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rgba;

    #[test]
    fn png_preserves_exact_samples() {
        let mut bytes = Vec::new();
        for i in 0..12u8 {
            bytes.extend_from_slice(&[i * 20, 255 - i, i, 40 + i * 10]);
        }
        let buf = PixelBuffer::from_rgba_bytes(4, 3, &bytes).unwrap();
        let payload = encode_base64(&buf).unwrap();
        assert_eq!(decode_base64(&payload).unwrap(), buf);

        let url = format!("data:image/png;base64,{payload}");
        assert_eq!(decode_base64(&url).unwrap(), buf);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_base64("not base64!!").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Base64(_))));

        let err = decode_base64(&STANDARD.encode(b"definitely not a png")).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Image(_))));
    }

    #[test]
    fn encodes_opaque_background() {
        let buf = PixelBuffer::filled(8, 8, Rgba::BACKGROUND).unwrap();
        let png = encode_png(&buf).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
