//! Rectangles gliding through the stripe.
//!
//! Rectangles move at constant speed in a *transformed* coordinate space where each column is
//! stretched by the accumulated stripe intensity. Mapping back to real columns makes them slow
//! down and thin out while crossing the bright band.

use crate::animation::stripe::Stripe;
use crate::config::options::LoaderOptions;
use crate::foundation::core::{Rect, Rgba8};
use crate::render::surface::Surface;

/// Monotonically non-decreasing column warp.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformMap {
    columns: Vec<f64>,
    width_transformed: f64,
}

impl TransformMap {
    /// `columns[i] = i + slowdown * sum(stripe[..i])`.
    pub fn build(stripe: &[f64], slowdown: f64) -> Self {
        let mut columns = Vec::with_capacity(stripe.len());
        let mut running = 0.0;
        for (i, &v) in stripe.iter().enumerate() {
            columns.push(i as f64 + slowdown * running);
            running += v;
        }
        Self {
            columns,
            width_transformed: stripe.len() as f64 + slowdown * running,
        }
    }

    pub fn columns(&self) -> &[f64] {
        &self.columns
    }

    /// Total transformed width, `W + slowdown * sum(stripe)`.
    pub fn width_transformed(&self) -> f64 {
        self.width_transformed
    }
}

/// One rectangle in real (untransformed) column space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedRect {
    /// Index `i` of the column interval `[transform[i], transform[i + 1])` it landed in.
    pub column: usize,
    /// Horizontal center in pixels.
    pub center: f64,
    /// Rendered width in pixels.
    pub width: f64,
}

impl PlacedRect {
    /// Full-height rectangle for a surface `height` pixels tall.
    pub fn to_rect(self, height: f64) -> Rect {
        let half = self.width / 2.0;
        Rect::new(self.center - half, 0.0, self.center + half, height)
    }
}

/// Candidate positions in transformed space, consumed in increasing order.
#[derive(Clone, Copy, Debug)]
struct Candidates {
    next: f64,
    step: f64,
    end: f64,
}

impl Candidates {
    fn new(phase_time: f64, opts: &LoaderOptions, width_transformed: f64) -> Option<Self> {
        let speed = width_transformed / opts.rect_time_move;
        let step = opts.rect_interval * speed;
        if !(step.is_finite() && step > 0.0) {
            return None;
        }
        let phase = phase_time.rem_euclid(opts.rect_interval);
        let next = phase * speed - opts.rect_width / 2.0;
        let end = width_transformed + opts.rect_width;
        if !(next.is_finite() && next < end) {
            return None;
        }
        Some(Self { next, step, end })
    }

    fn current(&self) -> Option<f64> {
        (self.next < self.end).then_some(self.next)
    }

    /// Skip every candidate below `bound`.
    fn advance_past(&mut self, bound: f64) {
        if self.next >= bound {
            return;
        }
        let jumps = ((bound - self.next) / self.step).ceil().max(1.0);
        self.next += jumps * self.step;
        while self.next < bound {
            self.next += self.step;
        }
    }
}

/// Positions of every rectangle visible at `dt`.
///
/// `rect_seed` offsets the spawn phase (see `rect_random`). A single cursor walks the candidate
/// list while columns are scanned left to right; it only moves after a placement, so every column
/// interval hosts at most one rectangle and a candidate left of column 0 blocks the rest of the
/// frame.
pub fn place_rects(
    stripe: &Stripe,
    dt: f64,
    rect_seed: f64,
    opts: &LoaderOptions,
) -> Vec<PlacedRect> {
    let map = TransformMap::build(stripe.values(), opts.rect_slowdown);
    let Some(mut cursor) = Candidates::new(dt + rect_seed, opts, map.width_transformed()) else {
        return Vec::new();
    };

    let mut placed = Vec::new();
    for (i, pair) in map.columns().windows(2).enumerate() {
        let Some(x) = cursor.current() else {
            break;
        };
        let (x1, x2) = (pair[0], pair[1]);
        if !(x1 <= x && x < x2) {
            continue;
        }

        let stretch = x2 - x1;
        placed.push(PlacedRect {
            column: i,
            center: i as f64 + (x - x1) / stretch,
            width: opts.rect_width / (1.0 + opts.rect_slowdown * stretch),
        });
        cursor.advance_past(x2);
    }
    placed
}

/// Fill every rectangle over the full surface height.
pub fn draw_rects<S: Surface + ?Sized>(surface: &mut S, rects: &[PlacedRect], color: Rgba8) {
    let height = f64::from(surface.height());
    for r in rects {
        surface.fill_rect(r.to_rect(height), color);
    }
}
