use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::foundation::math::overlap;
use crate::render::surface::{ImageData, Surface};

/// In-memory RGBA8 raster implementing [`Surface`].
///
/// Pixels are straight alpha like a 2D canvas backing store. `fill_rect` anti-aliases fractional
/// edges by area coverage.
#[derive(Clone, Debug)]
pub struct CpuSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CpuSurface {
    /// A transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let img = ImageData::new(width, height);
        Self {
            width,
            height,
            data: img.data,
        }
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let i = self.index(x, y)?;
        Some(Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Return `true` when every pixel is transparent black.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Copy of the whole surface.
    pub fn snapshot(&self) -> ImageData {
        ImageData {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    /// Integer pixel span `[lo, hi)` touched by `[a, b)`, clipped to `[0, max)`.
    fn span(a: f64, b: f64, max: u32) -> (u32, u32) {
        let lo = a.floor().clamp(0.0, f64::from(max)) as u32;
        let hi = b.ceil().clamp(0.0, f64::from(max)) as u32;
        (lo, hi.max(lo))
    }

    fn usable(rect: Rect) -> Option<Rect> {
        let r = rect.abs();
        if !(r.x0.is_finite() && r.x1.is_finite() && r.y0.is_finite() && r.y1.is_finite()) {
            return None;
        }
        if r.width() <= 0.0 || r.height() <= 0.0 {
            return None;
        }
        Some(r)
    }
}

fn blend_over(dst: [u8; 4], src: Rgba8, coverage: f64) -> [u8; 4] {
    let sa = f64::from(src.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = f64::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0; 4];
    }

    fn channel(sc: u8, dc: u8, sa: f64, da: f64, out_a: f64) -> u8 {
        let v = (f64::from(sc) * sa + f64::from(dc) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    }

    [
        channel(src.r, dst[0], sa, da, out_a),
        channel(src.g, dst[1], sa, da, out_a),
        channel(src.b, dst[2], sa, da, out_a),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some(r) = Self::usable(rect) else {
            return;
        };
        let (x0, x1) = Self::span(r.x0, r.x1, self.width);
        let (y0, y1) = Self::span(r.y0, r.y1, self.height);
        let row_bytes = (self.width as usize) * 4;
        for y in y0..y1 {
            let start = (y as usize) * row_bytes + (x0 as usize) * 4;
            let end = (y as usize) * row_bytes + (x1 as usize) * 4;
            self.data[start..end].fill(0);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        if color.is_transparent() {
            return;
        }
        let Some(r) = Self::usable(rect) else {
            return;
        };
        let (x0, x1) = Self::span(r.x0, r.x1, self.width);
        let (y0, y1) = Self::span(r.y0, r.y1, self.height);

        let col_cov: Vec<f64> = (x0..x1)
            .map(|x| overlap(r.x0, r.x1, f64::from(x), f64::from(x) + 1.0))
            .collect();

        for y in y0..y1 {
            let row_cov = overlap(r.y0, r.y1, f64::from(y), f64::from(y) + 1.0);
            for (x, &cc) in (x0..x1).zip(&col_cov) {
                let Some(i) = self.index(x, y) else {
                    continue;
                };
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                let out = blend_over(dst, color, cc * row_cov);
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
    }

    fn create_image_data(&mut self, width: u32, height: u32) -> ImageData {
        ImageData::new(width, height)
    }

    fn get_image_data(&self, x: u32, y: u32, width: u32, height: u32) -> ImageData {
        let mut out = ImageData::new(width, height);
        for row in 0..height {
            for col in 0..width {
                let (Some(sx), Some(sy)) = (x.checked_add(col), y.checked_add(row)) else {
                    continue;
                };
                let Some(si) = self.index(sx, sy) else {
                    continue;
                };
                let di = ((row as usize) * (width as usize) + (col as usize)) * 4;
                out.data[di..di + 4].copy_from_slice(&self.data[si..si + 4]);
            }
        }
        out
    }

    fn put_image_data(&mut self, image: &ImageData, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = image.width.min(self.width - x) as usize;
        let rows = image.height.min(self.height - y);
        let src_row_bytes = (image.width as usize) * 4;
        for row in 0..rows {
            let Some(di) = self.index(x, y + row) else {
                continue;
            };
            let si = (row as usize) * src_row_bytes;
            let Some(src) = image.data.get(si..si + cols * 4) else {
                continue;
            };
            self.data[di..di + cols * 4].copy_from_slice(src);
        }
    }

    fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}
