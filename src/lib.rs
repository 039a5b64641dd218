//! A procedural loading indicator: a soft gaussian stripe sweeping across a 2D surface while
//! thin rectangles glide through it, slowing down and thinning out in the bright band.
//!
//! # Frame pipeline
//!
//! 1. **Profile**: `elapsed time + lifecycle state -> Stripe` (one intensity per pixel column)
//! 2. **Background**: the stripe becomes per-column alpha over a flat color, written with a cached
//!    pixel buffer
//! 3. **Rectangles**: candidates move linearly in a stripe-warped space and are mapped back to
//!    real columns
//!
//! An [`Animator`] owns one [`Surface`] and a three-state lifecycle (`Off`, `Active`,
//! `Vanishing`). It draws only when a host delivers a frame it asked for through a
//! [`FrameScheduler`]; [`AnimatorRegistry`] keeps one animator per surface and acts as their
//! scheduler.
//!
//! ```
//! use stripe_loader::{Animator, CpuSurface, LoaderOptions, ManualScheduler, drive_frames};
//!
//! let mut sched = ManualScheduler::new();
//! let mut loader = Animator::with_seed(CpuSurface::new(120, 8), LoaderOptions::default(), 7);
//! loader.start(&mut sched);
//! drive_frames(&mut loader, &mut sched, [0.0, 16.0, 32.0]);
//! loader.stop();
//! drive_frames(&mut loader, &mut sched, (3..30).map(|i| f64::from(i) * 16.0));
//! assert!(loader.surface().is_blank());
//! ```
#![forbid(unsafe_code)]

mod animation;
mod animator;
mod config;
mod foundation;
mod render;

pub use crate::animation::stripe::{
    Stripe, StripeCarry, StripePhase, intensity_at, peak_position, sample_stripe,
};
pub use crate::animator::lifecycle::{Animator, LoaderState, drive_frames};
pub use crate::animator::registry::{AnimatorRegistry, Command};
pub use crate::animator::scheduler::{FrameOutcome, FrameScheduler, FrameTicket, ManualScheduler};
pub use crate::config::color::parse_hex;
pub use crate::config::options::{LoaderOptions, PartialOptions};
pub use crate::foundation::core::{Canvas, Rect, Rgba8, SurfaceId};
pub use crate::foundation::error::{LoaderError, LoaderResult};
pub use crate::foundation::math::Rng64;
pub use crate::render::background::BackgroundCache;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::rects::{PlacedRect, TransformMap, draw_rects, place_rects};
pub use crate::render::surface::{ImageData, Surface};
