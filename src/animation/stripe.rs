//! Gaussian intensity profile swept across the surface.
//!
//! While active the peak eases out from the left edge towards `gauss_stop * width`. After `stop`
//! it is extrapolated linearly from wherever it was towards just past the right edge, finishing
//! `gauss_time_vanish` ms later.

use crate::config::options::LoaderOptions;

/// Which peak formula drives the profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripePhase {
    /// Exponential approach towards `gauss_stop`.
    Sweep,
    /// Linear run-out past the right edge.
    Vanish,
}

/// Scalars carried between frames so the vanish phase continues from the last swept peak.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StripeCarry {
    /// Peak position of the last swept frame.
    pub peak_last: f64,
    /// Elapsed time of the last swept frame.
    pub dt_last: f64,
}

/// One intensity per pixel column, each within `[1 - gauss_weight, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stripe {
    values: Vec<f64>,
    peak: f64,
}

impl Stripe {
    /// Per-column intensities, left to right.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Peak position (1-based column space) the profile was generated around.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all intensities.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Peak position for `dt`. The sweep phase updates `carry`; the vanish phase only reads it.
pub fn peak_position(
    width: u32,
    opts: &LoaderOptions,
    phase: StripePhase,
    dt: f64,
    carry: &mut StripeCarry,
) -> f64 {
    let w = f64::from(width);
    match phase {
        StripePhase::Sweep => {
            let peak = (1.0 - (-dt.abs() / opts.gauss_time_move).exp()) * opts.gauss_stop * w;
            carry.peak_last = peak;
            carry.dt_last = dt;
            peak
        }
        StripePhase::Vanish => {
            let target = (1.0 + opts.gauss_width) * w;
            carry.peak_last
                + (target - carry.peak_last) * (dt - carry.dt_last) / opts.gauss_time_vanish
        }
    }
}

/// Intensity of a column whose 1-based position is `x`, for a stripe centred at `peak`.
pub fn intensity_at(x: f64, peak: f64, width: u32, opts: &LoaderOptions) -> f64 {
    let w = f64::from(width);
    let dx = x - peak;
    let spread = 2.0 * w * w * opts.gauss_width * opts.gauss_width;
    (1.0 - opts.gauss_weight) + opts.gauss_weight * (-(dx * dx) / spread).exp()
}

/// Generate the full profile for one frame.
pub fn sample_stripe(
    width: u32,
    opts: &LoaderOptions,
    phase: StripePhase,
    dt: f64,
    carry: &mut StripeCarry,
) -> Stripe {
    let peak = peak_position(width, opts, phase, dt, carry);
    let values = (0..width)
        .map(|i| intensity_at(f64::from(i) + 1.0, peak, width, opts))
        .collect();
    Stripe { values, peak }
}
