use stripe_loader::{
    Animator, AnimatorRegistry, Command, CpuSurface, FrameOutcome, LoaderOptions, LoaderState,
    PartialOptions, SurfaceId,
};

fn registry_with(ids: &[u64]) -> AnimatorRegistry<CpuSurface> {
    let mut reg = AnimatorRegistry::new();
    for &id in ids {
        reg.insert_with(
            SurfaceId(id),
            || CpuSurface::new(48, 4),
            LoaderOptions::default(),
        );
    }
    reg
}

#[test]
fn frames_reach_every_started_animator() {
    let mut reg = registry_with(&[1, 2, 3]);
    assert!(reg.start(SurfaceId(1)));
    assert!(reg.start(SurfaceId(3)));

    let mut out = reg.frame(0.0);
    out.sort_by_key(|(id, _)| *id);
    assert_eq!(
        out,
        vec![
            (SurfaceId(1), FrameOutcome::Rendered),
            (SurfaceId(3), FrameOutcome::Rendered),
        ]
    );
    assert_eq!(reg.pending_frames(), 2);
    assert!(reg.get(SurfaceId(2)).unwrap().surface().is_blank());
    assert!(!reg.get(SurfaceId(1)).unwrap().surface().is_blank());
}

#[test]
fn dispatch_drives_a_full_cycle() {
    let mut reg = registry_with(&[7]);
    let id = SurfaceId(7);

    assert!(reg.dispatch(id, "start".parse::<Command>().unwrap()));
    for t in [0.0, 100.0, 200.0] {
        reg.frame(t);
    }
    assert!(reg.dispatch(id, "end".parse::<Command>().unwrap()));
    assert_eq!(reg.get(id).unwrap().state(), LoaderState::Vanishing);

    let mut finished = false;
    for t in [250.0, 300.0, 350.0, 401.0] {
        if reg
            .frame(t)
            .iter()
            .any(|(_, o)| *o == FrameOutcome::Finished)
        {
            finished = true;
        }
    }
    assert!(finished);
    assert_eq!(reg.get(id).unwrap().state(), LoaderState::Off);
    assert!(reg.get(id).unwrap().surface().is_blank());
    assert_eq!(reg.pending_frames(), 0);
}

#[test]
fn repeated_start_does_not_double_the_render_loop() {
    let mut reg = registry_with(&[1]);
    reg.start(SurfaceId(1));
    reg.start(SurfaceId(1));
    assert_eq!(reg.pending_frames(), 1);

    reg.reset(SurfaceId(1));
    reg.start(SurfaceId(1));
    // One stale request from the first cycle plus the live one.
    let out = reg.frame(0.0);
    assert_eq!(
        out.iter()
            .filter(|(_, o)| *o == FrameOutcome::Rendered)
            .count(),
        1
    );
    assert_eq!(reg.pending_frames(), 1);
}

#[test]
fn options_dispatch_updates_live_animator() {
    let mut reg = registry_with(&[4]);
    let partial = PartialOptions::from_json_str(r#"{"rectEnable": false}"#).unwrap();
    assert!(reg.update_options(SurfaceId(4), partial));
    assert!(!reg.get(SurfaceId(4)).unwrap().options().rect_enable);
    assert_eq!(reg.get(SurfaceId(4)).unwrap().state(), LoaderState::Off);
}

#[test]
fn replacing_an_animator_resets_the_old_one() {
    let mut reg = registry_with(&[5]);
    reg.start(SurfaceId(5));
    reg.frame(0.0);

    let fresh = Animator::with_seed(CpuSurface::new(10, 1), LoaderOptions::default(), 1);
    let old = reg.insert(SurfaceId(5), fresh).unwrap();
    assert_eq!(old.state(), LoaderState::Off);
    assert!(old.surface().is_blank());
    assert_eq!(reg.len(), 1);

    // The old cycle's request went away with it.
    assert_eq!(reg.pending_frames(), 0);
    assert!(reg.frame(16.0).is_empty());
}
