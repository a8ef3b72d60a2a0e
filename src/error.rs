use thiserror::Error;

/// Failures of the capture → raster → evaluation pipeline.
///
/// None of these touch the drawing, so the caller can always let the user retry.
#[derive(Debug, Error)]
pub enum Error {
    /// Nothing was drawn yet. Detected before rasterizing.
    #[error("nothing to evaluate: the drawing has no strokes")]
    EmptyDrawing,

    /// The encoded raster could not be turned back into pixels.
    #[error("analysis unavailable: {0}")]
    Decode(#[from] DecodeError),

    /// A pixel surface of the requested size cannot exist.
    #[error("cannot create a {width}x{height} raster surface")]
    Surface { width: u32, height: u32 },

    /// The raster could not be written out as PNG.
    #[error("failed to encode raster: {0}")]
    Encode(#[source] image::ImageError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not a readable image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
