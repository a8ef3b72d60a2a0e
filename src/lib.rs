//! Offline handwriting practice for single Han characters.
//!
//! Strokes are captured as vector polylines ([`capture`]), rendered to a monochrome raster on demand
//! ([`raster`]), measured ([`metrics`]) and turned into a 0–100 score with short feedback ([`score`]).
//! [`Session`] ties these together for one practice run.

pub mod capture;
pub mod cmd;
pub mod codec;
pub mod config;
pub mod error;
pub mod math;
pub mod metrics;
pub mod raster;
pub mod score;
pub mod session;

pub use capture::{CaptureEngine, Drawing, Stroke};
pub use cmd::Cmd;
pub use config::Config;
pub use error::{DecodeError, Error, Result};
pub use metrics::{Analyzer, DrawingMetrics};
pub use raster::{PixelBuffer, Rasterizer, Rgba};
pub use score::{EvaluationResult, Locale, Scorer, Variant};
pub use session::{Evaluator, Session};

/// Scores a base64 PNG raster against `character` with the default (guide track) settings.
pub async fn evaluate(encoded_image: &str, character: &str) -> Result<EvaluationResult> {
    Evaluator::default().evaluate(encoded_image, character).await
}
