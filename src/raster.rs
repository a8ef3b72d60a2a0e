use bytemuck::{Pod, Zeroable};

use crate::{
    capture::Drawing,
    error::{Error, Result},
    math::{vec2, Vec2f},
};

/// Stroke width of the pen, in pixels.
pub const DEFAULT_BRUSH_WIDTH: f32 = 10.0;

/// Largest raster that will be allocated, in pixels (64 MiB of RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 4096 * 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const BACKGROUND: Rgba = Rgba([0x00, 0x00, 0x00, 0xff]);
    pub const INK: Rgba = Rgba([0xff, 0xff, 0xff, 0xff]);

    pub fn r(self) -> u8 {
        self.0[0]
    }
    pub fn g(self) -> u8 {
        self.0[1]
    }
    pub fn b(self) -> u8 {
        self.0[2]
    }
    pub fn a(self) -> u8 {
        self.0[3]
    }

    /// Whether this sample is counted as ink by the analyzer.
    ///
    /// Requires `alpha > 32` and `r + g + b > 96`.
    pub fn is_ink(self) -> bool {
        self.a() > 32 && (self.r() as u16 + self.g() as u16 + self.b() as u16) > 96
    }
}

/// A fixed-size RGBA raster, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Creates a buffer filled with `fill`.
    pub fn filled(width: u32, height: u32, fill: Rgba) -> Result<Self> {
        let len = surface_len(width, height)?;
        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(len).is_err() {
            return Err(Error::Surface { width, height });
        }
        pixels.resize(len, fill);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wraps raw RGBA bytes (4 per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let len = surface_len(width, height)?;
        let Ok(pixels) = bytemuck::try_cast_slice::<u8, Rgba>(bytes) else {
            return Err(Error::Surface { width, height });
        };
        if pixels.len() != len {
            return Err(Error::Surface { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Rows of pixels, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Rgba> {
        self.pixels.chunks_exact(self.width as usize)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = color;
    }
}

fn surface_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::Surface { width, height });
    }
    let len = u64::from(width) * u64::from(height);
    if len > MAX_SURFACE_PIXELS {
        return Err(Error::Surface { width, height });
    }
    usize::try_from(len).map_err(|_| Error::Surface { width, height })
}

/// Renders drawings into [`PixelBuffer`]s.
///
/// Output is always [`Rgba::INK`] on [`Rgba::BACKGROUND`], the pair the analyzer's ink test expects.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    pub brush_width: f32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_WIDTH)
    }
}

impl Rasterizer {
    pub fn new(brush_width: f32) -> Self {
        Self { brush_width }
    }

    /// Renders `drawing` onto an opaque background of `width`×`height` pixels.
    ///
    /// Each stroke is a polyline with round caps and joins: a pixel is inked when its center lies
    /// within half the brush width of any segment. There is no anti-aliasing, every pixel is either
    /// exactly background or exactly ink. Strokes with fewer than two points leave no ink.
    ///
    /// Returns `Ok(None)` for a drawing without strokes.
    pub fn rasterize(
        &self,
        drawing: &Drawing,
        width: u32,
        height: u32,
    ) -> Result<Option<PixelBuffer>> {
        if drawing.is_empty() {
            return Ok(None);
        }
        let mut buf = PixelBuffer::filled(width, height, Rgba::BACKGROUND)?;
        let radius = self.brush_width * 0.5;

        for stroke in drawing.strokes.iter().filter(|s| s.is_visible()) {
            for seg in stroke.points.windows(2) {
                self.stamp_segment(&mut buf, seg[0], seg[1], radius);
            }
        }

        log::debug!(
            "rasterized {} strokes into {}x{} buffer",
            drawing.len(),
            width,
            height
        );
        Ok(Some(buf))
    }

    /// Inks every pixel whose center is within `radius` of the segment `a..=b`.
    fn stamp_segment(&self, buf: &mut PixelBuffer, a: Vec2f, b: Vec2f, radius: f32) {
        // Pixel (x, y) has its center at (x + 0.5, y + 0.5); only scan the clipped bounding box.
        let Some((x0, x1)) = pixel_span(a.x.min(b.x) - radius, a.x.max(b.x) + radius, buf.width)
        else {
            return;
        };
        let Some((y0, y1)) = pixel_span(a.y.min(b.y) - radius, a.y.max(b.y) + radius, buf.height)
        else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = vec2(x as f32 + 0.5, y as f32 + 0.5);
                if center.dist_to_segment(a, b) <= radius {
                    buf.set(x, y, Rgba::INK);
                }
            }
        }
    }
}

/// Range of pixel indices in `0..len` whose centers may fall into `lo..=hi`.
fn pixel_span(lo: f32, hi: f32, len: u32) -> Option<(u32, u32)> {
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    let first = (lo - 0.5).ceil().max(0.0);
    let last = (hi - 0.5).floor().min(len as f32 - 1.0);
    if first > last {
        return None;
    }
    Some((first as u32, last as u32))
}
