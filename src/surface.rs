//! Drawing surfaces the animator paints into.

use std::f32::consts::PI;

use crate::color::Rgba;

/// Immediate-mode 2D drawing context. Write-only: the animator never reads
/// pixels back.
pub trait DrawContext {
    fn set_fill_color(&mut self, color: Rgba);

    /// Fills the whole surface with the current fill color.
    fn fill_surface(&mut self);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32);
}

/// Something that owns a canvas: reports its pixel size and hands out a
/// drawing context when the environment supports one.
pub trait CanvasHost {
    fn size(&self) -> (u32, u32);

    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

/// Largest side length a [`PixelCanvas`] will allocate a context for.
pub const MAX_SURFACE_SIDE: u32 = 16_384;

/// Software RGBA8 canvas with straight alpha and source-over blending.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    fill: Rgba,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            fill: Rgba::BLACK,
        };
        canvas.resize(width, height);
        canvas
    }

    /// Resizes and clears to transparent. Returns `false` when the size is
    /// unchanged, in which case the pixels are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }

        self.width = width;
        self.height = height;
        self.pixels.clear();
        if self.is_supported() {
            self.pixels.resize(width as usize * height as usize * 4, 0);
        }
        true
    }

    pub fn dimensions(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }

    pub fn as_rgba8(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height || self.pixels.is_empty() {
            return None;
        }
        let idx = self.idx(x as usize, y as usize);
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(out)
    }

    fn is_supported(&self) -> bool {
        self.width <= MAX_SURFACE_SIDE && self.height <= MAX_SURFACE_SIDE
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * 4
    }

    fn blend(&mut self, idx: usize, color: Rgba, coverage: f32) {
        let src_a = color.a * coverage;
        if src_a <= 0.0 {
            return;
        }

        let dst = &mut self.pixels[idx..idx + 4];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let src = [color.r, color.g, color.b];
        for (channel, src_c) in dst.iter_mut().zip(src) {
            let dst_c = *channel as f32 / 255.0;
            let out_c = (src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
            *channel = (out_c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
}

impl DrawContext for PixelCanvas {
    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_surface(&mut self) {
        let fill = self.fill;
        if fill.a >= 1.0 {
            let rgba = fill.to_rgba8();
            for px in self.pixels.chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
            return;
        }

        for idx in (0..self.pixels.len()).step_by(4) {
            self.blend(idx, fill, 1.0);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        if self.pixels.is_empty() || radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }

        let reach = radius + 0.5;
        let x0 = (cx - reach).floor().max(0.0) as usize;
        let y0 = (cy - reach).floor().max(0.0) as usize;
        let x1 = ((cx + reach).ceil().max(0.0) as usize).min(self.width as usize);
        let y1 = ((cy + reach).ceil().max(0.0) as usize).min(self.height as usize);

        // sub-pixel dots never cover more than their own area
        let max_coverage = (PI * radius * radius).min(1.0);
        let fill = self.fill;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (reach - dist).clamp(0.0, 1.0).min(max_coverage);
                if coverage > 0.0 {
                    let idx = self.idx(x, y);
                    self.blend(idx, fill, coverage);
                }
            }
        }
    }
}

impl CanvasHost for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.is_supported() {
            Some(self)
        } else {
            None
        }
    }
}
