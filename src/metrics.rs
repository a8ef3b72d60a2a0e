use rayon::prelude::*;
use crate::raster::{PixelBuffer, Rgba};

/// Margin of the guide track, as a fraction of width/height from each edge.
pub const DEFAULT_TRACK_MARGIN: f64 = 0.12;

/// Bounds within this many pixels of the buffer edge count as touching it.
const EDGE_DISTANCE: i64 = 2;

/// Ink statistics of one raster.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawingMetrics {
    pub has_ink: bool,
    /// Fraction of all pixels that are ink.
    pub coverage: f64,
    /// Bounding box width over buffer width.
    pub span_x: f64,
    pub span_y: f64,
    /// Distance of the ink centroid from the buffer center, over half the buffer width.
    pub offset_x: f64,
    pub offset_y: f64,
    pub touches_edge: bool,
    /// Fraction of ink pixels outside the guide track. Always 0 without a track.
    pub outside_track_ratio: f64,
}

/// Partial sums over a set of rows. Merging is associative and commutative, so rows can be reduced in
/// any order and still give the same result as a sequential scan.
#[derive(Debug, Clone, Copy)]
struct Acc {
    ink: u64,
    outside_track: u64,
    /// Sums of `2x + 1` and `2y + 1`, i.e. pixel centers in half-pixel units.
    sum_x2: u64,
    sum_y2: u64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Acc {
    fn empty() -> Self {
        Self {
            ink: 0,
            outside_track: 0,
            sum_x2: 0,
            sum_y2: 0,
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            ink: self.ink + other.ink,
            outside_track: self.outside_track + other.outside_track,
            sum_x2: self.sum_x2 + other.sum_x2,
            sum_y2: self.sum_y2 + other.sum_y2,
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Computes [`DrawingMetrics`] for pixel buffers.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    /// `None` disables the guide track entirely.
    pub track_margin: Option<f64>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            track_margin: Some(DEFAULT_TRACK_MARGIN),
        }
    }
}

impl Analyzer {
    pub fn analyze(&self, buf: &PixelBuffer) -> DrawingMetrics {
        let width = buf.width();
        let height = buf.height();

        let acc = buf
            .pixels()
            .par_chunks_exact(width as usize)
            .enumerate()
            .map(|(y, row)| self.scan_row(row, y as u32, width, height))
            .reduce(Acc::empty, Acc::merge);

        if acc.ink == 0 {
            return DrawingMetrics::default();
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let ink = acc.ink as f64;
        let center_x = acc.sum_x2 as f64 / 2.0 / ink;
        let center_y = acc.sum_y2 as f64 / 2.0 / ink;
        let (min_x, min_y) = (i64::from(acc.min_x), i64::from(acc.min_y));
        let (max_x, max_y) = (i64::from(acc.max_x), i64::from(acc.max_y));

        let metrics = DrawingMetrics {
            has_ink: true,
            coverage: ink / (w * h),
            span_x: (max_x - min_x + 1) as f64 / w,
            span_y: (max_y - min_y + 1) as f64 / h,
            offset_x: (center_x - w / 2.0).abs() / (w / 2.0),
            offset_y: (center_y - h / 2.0).abs() / (h / 2.0),
            touches_edge: min_x < EDGE_DISTANCE
                || min_y < EDGE_DISTANCE
                || max_x >= i64::from(width) - EDGE_DISTANCE
                || max_y >= i64::from(height) - EDGE_DISTANCE,
            outside_track_ratio: acc.outside_track as f64 / ink,
        };
        log::debug!("{metrics:?}");
        metrics
    }

    fn scan_row(&self, row: &[Rgba], y: u32, width: u32, height: u32) -> Acc {
        let mut acc = Acc::empty();
        let ny = (f64::from(y) + 0.5) / f64::from(height);
        for (x, px) in row.iter().enumerate() {
            if !px.is_ink() {
                continue;
            }
            let x = x as u32;
            acc.ink += 1;
            acc.sum_x2 += 2 * u64::from(x) + 1;
            acc.sum_y2 += 2 * u64::from(y) + 1;
            acc.min_x = acc.min_x.min(x);
            acc.max_x = acc.max_x.max(x);
            acc.min_y = acc.min_y.min(y);
            acc.max_y = acc.max_y.max(y);

            if let Some(margin) = self.track_margin {
                let nx = (f64::from(x) + 0.5) / f64::from(width);
                let inside = nx >= margin && nx <= 1.0 - margin && ny >= margin && ny <= 1.0 - margin;
                if !inside {
                    acc.outside_track += 1;
                }
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(width: u32, height: u32, ink: &[(u32, u32)]) -> PixelBuffer {
        let mut bytes = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let px = if ink.contains(&(x, y)) {
                    Rgba::INK
                } else {
                    Rgba::BACKGROUND
                };
                bytes.extend_from_slice(&px.0);
            }
        }
        PixelBuffer::from_rgba_bytes(width, height, &bytes).unwrap()
    }

    #[test]
    fn no_ink_is_all_zero() {
        let m = Analyzer::default().analyze(&buffer(20, 20, &[]));
        assert_eq!(m, DrawingMetrics::default());
        assert!(!m.has_ink);
    }

    #[test]
    fn faint_pixels_are_not_ink() {
        let mut bytes = Vec::new();
        for _ in 0..16 {
            bytes.extend_from_slice(&[32, 32, 32, 255]);
        }
        let buf = PixelBuffer::from_rgba_bytes(4, 4, &bytes).unwrap();
        assert!(!Analyzer::default().analyze(&buf).has_ink);
    }

    #[test]
    fn centered_block() {
        // 4x4 ink block in the exact middle of a 20x20 buffer.
        let ink: Vec<_> = (8..12).flat_map(|y| (8..12).map(move |x| (x, y))).collect();
        let m = Analyzer::default().analyze(&buffer(20, 20, &ink));
        assert!(m.has_ink);
        assert_eq!(m.coverage, 16.0 / 400.0);
        assert_eq!(m.span_x, 0.2);
        assert_eq!(m.span_y, 0.2);
        assert_eq!(m.offset_x, 0.0);
        assert_eq!(m.offset_y, 0.0);
        assert!(!m.touches_edge);
        assert_eq!(m.outside_track_ratio, 0.0);
    }

    #[test]
    fn corner_pixel() {
        let m = Analyzer::default().analyze(&buffer(10, 10, &[(0, 0)]));
        assert_eq!(m.span_x, 0.1);
        assert_eq!(m.offset_x, 0.9);
        assert_eq!(m.offset_y, 0.9);
        assert!(m.touches_edge);
        assert_eq!(m.outside_track_ratio, 1.0);
    }

    #[test]
    fn edge_distance() {
        // x = 1 is within 2 pixels of the left edge, x = 2 is not.
        assert!(Analyzer::default().analyze(&buffer(10, 10, &[(1, 5)])).touches_edge);
        assert!(!Analyzer::default().analyze(&buffer(10, 10, &[(2, 5)])).touches_edge);
        assert!(Analyzer::default().analyze(&buffer(10, 10, &[(8, 5)])).touches_edge);
        assert!(!Analyzer::default().analyze(&buffer(10, 10, &[(7, 5)])).touches_edge);
    }

    #[test]
    fn track_can_be_disabled() {
        let analyzer = Analyzer { track_margin: None };
        let m = analyzer.analyze(&buffer(10, 10, &[(0, 0), (9, 9)]));
        assert_eq!(m.outside_track_ratio, 0.0);
        assert_eq!(m.span_x, 1.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let ink: Vec<_> = (0..97u32)
            .map(|i| ((i * 37) % 61, (i * 11) % 53))
            .collect();
        let buf = buffer(61, 53, &ink);
        let analyzer = Analyzer::default();
        let sequential = buf
            .rows()
            .enumerate()
            .map(|(y, row)| analyzer.scan_row(row, y as u32, 61, 53))
            .fold(Acc::empty(), Acc::merge);
        let m = analyzer.analyze(&buf);
        assert_eq!(m.coverage, sequential.ink as f64 / (61.0 * 53.0));
        assert_eq!(
            m.outside_track_ratio,
            sequential.outside_track as f64 / sequential.ink as f64
        );
        assert_eq!(m, analyzer.analyze(&buf));
    }
}
