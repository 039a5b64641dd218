use crate::animation::stripe::Stripe;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::math::mul_div255;
use crate::render::surface::{ImageData, Surface};

struct CachedBuffer {
    color: Rgba8,
    image: ImageData,
}

/// Paints the stripe as per-column alpha over a flat color.
///
/// The pixel buffer is created once per (color, size) and reused; each frame only rewrites the
/// alpha bytes.
#[derive(Default)]
pub struct BackgroundCache {
    cached: Option<CachedBuffer>,
    rebuilds: u64,
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a buffer had to be (re)built.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Drop the cached buffer; the next paint rebuilds it.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Alpha byte for one column intensity under `color`.
    pub fn column_alpha(value: f64, color: Rgba8) -> u8 {
        let a = (value * 255.0).round().clamp(0.0, 255.0) as u16;
        mul_div255(a, u16::from(color.a))
    }

    fn ensure_buffer<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        canvas: Canvas,
        color: Rgba8,
    ) {
        let fresh = self
            .cached
            .as_ref()
            .is_some_and(|c| c.color == color && c.image.canvas() == canvas);
        if fresh {
            return;
        }

        let mut image = surface.create_image_data(canvas.width, canvas.height);
        let opaque = Rgba8 { a: 255, ..color }.to_array();
        for px in image.data.chunks_exact_mut(4) {
            px.copy_from_slice(&opaque);
        }
        self.rebuilds = self.rebuilds.saturating_add(1);
        tracing::debug!(
            %color,
            width = canvas.width,
            height = canvas.height,
            "rebuilt background buffer"
        );
        self.cached = Some(CachedBuffer { color, image });
    }

    /// Write the stripe to `surface`, replacing whatever was there.
    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S, stripe: &Stripe, color: Rgba8) {
        let canvas = surface.canvas();
        if canvas.is_empty() {
            return;
        }

        let alphas: Vec<u8> = (0..canvas.width as usize)
            .map(|i| {
                stripe
                    .values()
                    .get(i)
                    .map_or(0, |&v| Self::column_alpha(v, color))
            })
            .collect();

        self.ensure_buffer(surface, canvas, color);
        let Some(cached) = self.cached.as_mut() else {
            return;
        };
        let row_bytes = (canvas.width as usize) * 4;
        for row in cached.image.data.chunks_exact_mut(row_bytes) {
            for (px, &a) in row.chunks_exact_mut(4).zip(&alphas) {
                px[3] = a;
            }
        }
        surface.put_image_data(&cached.image, 0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::stripe::{StripeCarry, StripePhase, sample_stripe};
    use crate::config::options::LoaderOptions;
    use crate::render::cpu::CpuSurface;

    fn stripe(width: u32, dt: f64) -> Stripe {
        let mut carry = StripeCarry::default();
        sample_stripe(
            width,
            &LoaderOptions::default(),
            StripePhase::Sweep,
            dt,
            &mut carry,
        )
    }

    #[test]
    fn columns_share_color_and_alpha_matches_intensity() {
        let mut surface = CpuSurface::new(40, 3);
        let mut bg = BackgroundCache::new();
        let s = stripe(40, 300.0);
        let color = Rgba8::rgb(18, 61, 132);
        bg.paint(&mut surface, &s, color);

        for x in 0..40 {
            let expected = (s.values()[x as usize] * 255.0).round() as u8;
            for y in 0..3 {
                let px = surface.pixel(x, y).unwrap();
                assert_eq!((px.r, px.g, px.b), (18, 61, 132));
                assert_eq!(px.a, expected, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn buffer_is_reused_until_color_changes() {
        let mut surface = CpuSurface::new(16, 2);
        let mut bg = BackgroundCache::new();
        let blue = Rgba8::rgb(0, 0, 255);

        bg.paint(&mut surface, &stripe(16, 0.0), blue);
        bg.paint(&mut surface, &stripe(16, 100.0), blue);
        bg.paint(&mut surface, &stripe(16, 200.0), Rgba8::rgb(0, 0, 255));
        assert_eq!(bg.rebuilds(), 1);

        bg.paint(&mut surface, &stripe(16, 300.0), Rgba8::rgb(255, 0, 0));
        assert_eq!(bg.rebuilds(), 2);
        assert_eq!(surface.pixel(0, 0).unwrap().r, 255);

        bg.invalidate();
        bg.paint(&mut surface, &stripe(16, 300.0), Rgba8::rgb(255, 0, 0));
        assert_eq!(bg.rebuilds(), 3);
    }

    #[test]
    fn translucent_color_scales_alpha() {
        assert_eq!(BackgroundCache::column_alpha(1.0, Rgba8::new(0, 0, 0, 128)), 128);
        assert_eq!(BackgroundCache::column_alpha(0.4, Rgba8::rgb(0, 0, 0)), 102);
    }

    #[test]
    fn empty_surface_paints_nothing() {
        let mut surface = CpuSurface::new(0, 5);
        let mut bg = BackgroundCache::new();
        bg.paint(&mut surface, &stripe(0, 10.0), Rgba8::WHITE);
        assert_eq!(bg.rebuilds(), 0);
    }
}
