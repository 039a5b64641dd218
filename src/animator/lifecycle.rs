use crate::animation::stripe::{StripeCarry, StripePhase, sample_stripe};
use crate::animator::scheduler::{FrameOutcome, FrameScheduler, FrameTicket, ManualScheduler};
use crate::config::options::{LoaderOptions, PartialOptions};
use crate::foundation::math::Rng64;
use crate::render::background::BackgroundCache;
use crate::render::rects::{draw_rects, place_rects};
use crate::render::surface::Surface;

/// Lifecycle of one loading indicator.
///
/// `Off -> Active` on start, `Active -> Vanishing` on stop, `Vanishing -> Off` once the vanish
/// window has elapsed. `reset` forces `Off` from anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoaderState {
    #[default]
    Off,
    Active,
    Vanishing,
}

/// Drives the stripe animation on one surface.
///
/// The animator never draws on its own: it asks a [`FrameScheduler`] for a frame and draws when
/// the host delivers it through [`Animator::on_frame`].
pub struct Animator<S: Surface> {
    surface: S,
    options: LoaderOptions,
    state: LoaderState,
    time_start: Option<f64>,
    carry: StripeCarry,
    rect_seed: f64,
    generation: u64,
    rng: Rng64,
    background: BackgroundCache,
}

impl<S: Surface> Animator<S> {
    /// Create an idle animator; rectangle phases are seeded from process randomness.
    pub fn new(surface: S, options: LoaderOptions) -> Self {
        Self::with_rng(surface, options, Rng64::from_entropy())
    }

    /// Create an idle animator with reproducible rectangle phases.
    pub fn with_seed(surface: S, options: LoaderOptions, seed: u64) -> Self {
        Self::with_rng(surface, options, Rng64::new(seed))
    }

    fn with_rng(surface: S, options: LoaderOptions, rng: Rng64) -> Self {
        Self {
            surface,
            options,
            state: LoaderState::Off,
            time_start: None,
            carry: StripeCarry::default(),
            rect_seed: 0.0,
            generation: 0,
            rng,
            background: BackgroundCache::new(),
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Peak position recorded by the last active frame.
    pub fn peak_last(&self) -> f64 {
        self.carry.peak_last
    }

    /// Elapsed time of the last active frame.
    pub fn dt_last(&self) -> f64 {
        self.carry.dt_last
    }

    /// Time origin of the current cycle, latched by its first frame.
    pub fn time_start(&self) -> Option<f64> {
        self.time_start
    }

    /// Rectangle phase offset drawn at the last start.
    pub fn rect_seed(&self) -> f64 {
        self.rect_seed
    }

    /// Cycle generation; bumped by every start and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket a frame request of the current cycle carries.
    pub fn ticket(&self) -> FrameTicket {
        FrameTicket {
            generation: self.generation,
        }
    }

    /// How many times the background pixel buffer was (re)built.
    pub fn background_rebuilds(&self) -> u64 {
        self.background.rebuilds()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Begin a cycle. Does nothing while already active; restarts a vanishing cycle.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.state == LoaderState::Active {
            tracing::trace!("start ignored, already active");
            return;
        }

        self.time_start = None;
        self.carry = StripeCarry::default();
        self.rect_seed = if self.options.rect_random {
            self.rng.next_f64_01() * self.options.rect_interval
        } else {
            0.0
        };
        self.surface.clear();
        self.state = LoaderState::Active;
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(
            generation = self.generation,
            rect_seed = self.rect_seed,
            "loader started"
        );
        scheduler.request_frame(self.ticket());
    }

    /// Let the stripe run out. Only meaningful while active.
    pub fn stop(&mut self) {
        if self.state != LoaderState::Active {
            tracing::trace!(state = ?self.state, "stop ignored");
            return;
        }
        self.state = LoaderState::Vanishing;
        tracing::debug!(
            generation = self.generation,
            peak_last = self.carry.peak_last,
            dt_last = self.carry.dt_last,
            "loader vanishing"
        );
    }

    /// Return to `Off` immediately, clearing the surface and invalidating pending frames.
    pub fn reset(&mut self) {
        self.state = LoaderState::Off;
        self.time_start = None;
        self.carry = StripeCarry::default();
        self.rect_seed = 0.0;
        self.surface.clear();
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(generation = self.generation, "loader reset");
    }

    /// Merge `partial` into the live options; the next frame uses them.
    pub fn update_options(&mut self, partial: &PartialOptions) {
        self.options.apply(partial);
        tracing::debug!(?partial, "options updated");
    }

    /// Handle one delivered frame at absolute time `time_ms`.
    #[tracing::instrument(level = "trace", skip(self, scheduler))]
    pub fn on_frame(
        &mut self,
        ticket: FrameTicket,
        time_ms: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> FrameOutcome {
        if ticket != self.ticket() {
            return FrameOutcome::Stale;
        }

        // Re-latch when the clock jumps backwards.
        let start = match self.time_start {
            Some(t) if t <= time_ms => t,
            _ => {
                self.time_start = Some(time_ms);
                time_ms
            }
        };
        let dt = time_ms - start;

        let phase = match self.state {
            LoaderState::Off => None,
            LoaderState::Active => Some(StripePhase::Sweep),
            LoaderState::Vanishing
                if dt > self.carry.dt_last + self.options.gauss_time_vanish =>
            {
                None
            }
            LoaderState::Vanishing => Some(StripePhase::Vanish),
        };
        let Some(phase) = phase else {
            tracing::debug!(dt, "loader finished");
            self.reset();
            return FrameOutcome::Finished;
        };

        self.render(phase, dt);
        scheduler.request_frame(self.ticket());
        FrameOutcome::Rendered
    }

    fn render(&mut self, phase: StripePhase, dt: f64) {
        let canvas = self.surface.canvas();
        let stripe = sample_stripe(canvas.width, &self.options, phase, dt, &mut self.carry);
        self.background
            .paint(&mut self.surface, &stripe, self.options.background_color);

        if !self.options.rect_enable {
            return;
        }
        let rects = place_rects(&stripe, dt, self.rect_seed, &self.options);
        tracing::trace!(dt, peak = stripe.peak(), rects = rects.len(), "frame");
        draw_rects(&mut self.surface, &rects, self.options.rect_color);
    }
}

/// Deliver every pending ticket of `scheduler` at each timestamp in `times`, in order.
///
/// Frames requested while delivering one timestamp wait for the next.
pub fn drive_frames<S: Surface>(
    animator: &mut Animator<S>,
    scheduler: &mut ManualScheduler,
    times: impl IntoIterator<Item = f64>,
) -> Vec<FrameOutcome> {
    let mut outcomes = Vec::new();
    for t in times {
        let due = scheduler.pending();
        for _ in 0..due {
            let Some(ticket) = scheduler.next_ticket() else {
                break;
            };
            outcomes.push(animator.on_frame(ticket, t, scheduler));
        }
    }
    outcomes
}
