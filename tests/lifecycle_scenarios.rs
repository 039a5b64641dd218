use stripe_loader::{
    Animator, CpuSurface, FrameOutcome, ImageData, LoaderOptions, LoaderState, ManualScheduler,
    PartialOptions, Rect, Rgba8, Surface, drive_frames,
};

/// Wraps a [`CpuSurface`], counting buffer creations and recording rectangle fills.
struct RecordingSurface {
    inner: CpuSurface,
    created_buffers: usize,
    fills: Vec<(Rect, Rgba8)>,
    clears: usize,
}

impl RecordingSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            inner: CpuSurface::new(width, height),
            created_buffers: 0,
            fills: Vec::new(),
            clears: 0,
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.clears += 1;
        self.inner.clear_rect(rect);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fills.push((rect, color));
        self.inner.fill_rect(rect, color);
    }

    fn create_image_data(&mut self, width: u32, height: u32) -> ImageData {
        self.created_buffers += 1;
        self.inner.create_image_data(width, height)
    }

    fn get_image_data(&self, x: u32, y: u32, width: u32, height: u32) -> ImageData {
        self.inner.get_image_data(x, y, width, height)
    }

    fn put_image_data(&mut self, image: &ImageData, x: u32, y: u32) {
        self.inner.put_image_data(image, x, y);
    }
}

fn ticks(from: u32, to: u32, step: u32) -> impl Iterator<Item = f64> {
    (from..=to).step_by(step as usize).map(f64::from)
}

#[test]
fn sweep_peak_matches_closed_form() {
    let opts = LoaderOptions {
        gauss_time_move: 500.0,
        gauss_stop: 2.0 / 3.0,
        ..LoaderOptions::default()
    };
    let mut a = Animator::with_seed(CpuSurface::new(100, 4), opts, 11);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);

    let mut peaks = Vec::new();
    for t in ticks(0, 1000, 100) {
        drive_frames(&mut a, &mut sched, [t]);
        peaks.push(a.peak_last());
    }

    let expected = (1.0 - (-1000.0f64 / 500.0).exp()) * 100.0 * (2.0 / 3.0);
    assert!((a.peak_last() - expected).abs() < 1e-6);
    assert_eq!(a.dt_last(), 1000.0);
    assert!(peaks.windows(2).all(|p| p[0] <= p[1]));
    assert!(peaks.iter().all(|&p| p <= 100.0 * 2.0 / 3.0));
}

#[test]
fn vanish_window_ends_in_cleared_off_state() {
    let mut a = Animator::with_seed(RecordingSurface::new(64, 6), LoaderOptions::default(), 5);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    drive_frames(&mut a, &mut sched, ticks(0, 400, 50));
    assert!(!a.surface().inner.is_blank());

    a.stop();
    assert_eq!(a.state(), LoaderState::Vanishing);
    let peak = a.peak_last();

    // dt_last = 400, gauss_time_vanish = 200: still vanishing at dt = 600.
    let out = drive_frames(&mut a, &mut sched, ticks(450, 600, 50));
    assert!(out.iter().all(|o| *o == FrameOutcome::Rendered));
    assert_eq!(a.state(), LoaderState::Vanishing);
    assert_eq!(a.peak_last(), peak);
    assert_eq!(a.dt_last(), 400.0);

    let out = drive_frames(&mut a, &mut sched, [601.0]);
    assert_eq!(out, vec![FrameOutcome::Finished]);
    assert_eq!(a.state(), LoaderState::Off);
    assert_eq!(a.peak_last(), 0.0);
    assert_eq!(a.dt_last(), 0.0);
    assert!(a.surface().inner.is_blank());
    assert_eq!(sched.pending(), 0);
}

#[test]
fn reset_mid_active_clears_everything() {
    let mut a = Animator::with_seed(CpuSurface::new(50, 3), LoaderOptions::default(), 2);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    drive_frames(&mut a, &mut sched, ticks(0, 300, 30));
    assert!(a.peak_last() > 0.0);

    a.reset();
    assert_eq!(a.state(), LoaderState::Off);
    assert_eq!(a.peak_last(), 0.0);
    assert_eq!(a.dt_last(), 0.0);
    assert!(a.surface().is_blank());

    // The frame requested before the reset is stale.
    let out = drive_frames(&mut a, &mut sched, [330.0]);
    assert_eq!(out, vec![FrameOutcome::Stale]);
    assert!(a.surface().is_blank());
}

#[test]
fn restart_while_vanishing_starts_a_fresh_cycle() {
    let mut a = Animator::with_seed(CpuSurface::new(50, 3), LoaderOptions::default(), 2);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    drive_frames(&mut a, &mut sched, ticks(0, 200, 20));
    a.stop();
    a.start(&mut sched);
    assert_eq!(a.state(), LoaderState::Active);
    assert_eq!(a.peak_last(), 0.0);

    let out = drive_frames(&mut a, &mut sched, [5000.0]);
    assert_eq!(out, vec![FrameOutcome::Stale, FrameOutcome::Rendered]);
    assert_eq!(a.time_start(), Some(5000.0));
}

#[test]
fn background_buffer_is_rebuilt_only_on_color_change() {
    let mut a = Animator::with_seed(RecordingSurface::new(40, 4), LoaderOptions::default(), 9);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    drive_frames(&mut a, &mut sched, ticks(0, 160, 16));
    assert_eq!(a.surface().created_buffers, 1);

    a.update_options(&PartialOptions {
        background_color: Some(LoaderOptions::default().background_color),
        ..PartialOptions::default()
    });
    drive_frames(&mut a, &mut sched, [176.0]);
    assert_eq!(a.surface().created_buffers, 1);

    a.update_options(&PartialOptions {
        background_color: Some(Rgba8::rgb(200, 10, 10)),
        ..PartialOptions::default()
    });
    drive_frames(&mut a, &mut sched, [192.0, 208.0]);
    assert_eq!(a.surface().created_buffers, 2);
    assert_eq!(a.background_rebuilds(), 2);
    assert_eq!(a.state(), LoaderState::Active);
}

#[test]
fn first_candidate_left_of_surface_draws_no_rects() {
    let opts = LoaderOptions {
        rect_random: false,
        rect_interval: 800.0,
        rect_width: 80.0,
        rect_time_move: 1500.0,
        rect_slowdown: 0.0,
        ..LoaderOptions::default()
    };
    let mut a = Animator::with_seed(RecordingSurface::new(800, 2), opts, 0);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    drive_frames(&mut a, &mut sched, [0.0]);
    assert!(a.surface().fills.is_empty());

    // Once the phase moves the first candidate on screen, rectangles appear.
    drive_frames(&mut a, &mut sched, [100.0]);
    assert_eq!(a.surface().fills.len(), 2);
    let (rect, color) = a.surface().fills[0];
    assert_eq!(color, Rgba8::WHITE);
    assert_eq!(rect.height(), 2.0);
    assert!((rect.width() - 80.0).abs() < 1e-9);
}

#[test]
fn disabled_rects_still_paint_the_stripe() {
    let opts = LoaderOptions {
        rect_enable: false,
        rect_random: false,
        ..LoaderOptions::default()
    };
    let mut a = Animator::with_seed(RecordingSurface::new(120, 2), opts, 0);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    drive_frames(&mut a, &mut sched, ticks(0, 1000, 50));
    assert!(a.surface().fills.is_empty());
    assert!(!a.surface().inner.is_blank());
}

#[test]
fn zero_sized_surface_runs_without_drawing() {
    let mut a = Animator::with_seed(RecordingSurface::new(0, 0), LoaderOptions::default(), 1);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    let out = drive_frames(&mut a, &mut sched, ticks(0, 100, 10));
    assert!(out.iter().all(|o| *o == FrameOutcome::Rendered));
    assert_eq!(a.surface().created_buffers, 0);
    assert!(a.surface().fills.is_empty());
}

#[test]
fn stripe_pixels_follow_the_peak() {
    let mut a = Animator::with_seed(CpuSurface::new(200, 1), LoaderOptions::default(), 4);
    let mut sched = ManualScheduler::new();
    a.start(&mut sched);
    a.update_options(&PartialOptions {
        rect_enable: Some(false),
        ..PartialOptions::default()
    });
    drive_frames(&mut a, &mut sched, ticks(0, 2000, 100));

    let peak_col = (a.peak_last().round() as u32).saturating_sub(1);
    let at_peak = a.surface().pixel(peak_col, 0).unwrap();
    let far = a.surface().pixel(199, 0).unwrap();
    assert_eq!(at_peak.a, 255);
    assert_eq!(far.a, (0.4f64 * 255.0).round() as u8);
    assert_eq!((at_peak.r, at_peak.g, at_peak.b), (18, 61, 132));
}
