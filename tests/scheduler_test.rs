use instant::Duration;
use rotor_view::scheduler::{FrameContext, FrameScheduler};

#[derive(Default)]
struct Counters {
    a: u32,
    b: u32,
}

fn ctx() -> FrameContext {
    FrameContext {
        elapsed: 0.0,
        dt: Duration::from_millis(16),
        pointer: (0.0, 0.0),
    }
}

#[test]
fn every_registered_callback_runs_once_per_tick() {
    let mut scheduler: FrameScheduler<Counters> = FrameScheduler::new();
    scheduler.register(|_, s: &mut Counters| s.a += 1);
    scheduler.register(|_, s: &mut Counters| s.b += 1);
    assert_eq!(scheduler.len(), 2);

    let mut counters = Counters::default();
    for _ in 0..5 {
        scheduler.tick(&ctx(), &mut counters);
    }
    assert_eq!(counters.a, 5);
    assert_eq!(counters.b, 5);
}

#[test]
fn deregistered_callback_stops_at_the_next_tick_boundary() {
    let mut scheduler: FrameScheduler<Counters> = FrameScheduler::new();
    let handle = scheduler.register(|_, s: &mut Counters| s.a += 1);
    scheduler.register(|_, s: &mut Counters| s.b += 1);

    let mut counters = Counters::default();
    scheduler.tick(&ctx(), &mut counters);
    assert!(scheduler.deregister(handle));
    scheduler.tick(&ctx(), &mut counters);

    assert_eq!(counters.a, 1);
    assert_eq!(counters.b, 2);
    // A second deregistration of the same handle is a no-op.
    assert!(!scheduler.deregister(handle));
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn a_panicking_callback_does_not_starve_the_others() {
    let mut scheduler: FrameScheduler<Counters> = FrameScheduler::new();
    scheduler.register(|_, _: &mut Counters| panic!("animated element went wrong"));
    scheduler.register(|_, s: &mut Counters| s.b += 1);

    let mut counters = Counters::default();
    scheduler.tick(&ctx(), &mut counters);
    assert_eq!(counters.b, 1);

    // The faulty callback stays registered but keeps being isolated.
    scheduler.tick(&ctx(), &mut counters);
    assert_eq!(counters.b, 2);
}

#[test]
fn callbacks_see_the_context_of_their_tick() {
    let mut scheduler: FrameScheduler<Vec<f32>> = FrameScheduler::new();
    scheduler.register(|ctx, seen: &mut Vec<f32>| seen.push(ctx.elapsed));

    let mut seen = Vec::new();
    for i in 0..3 {
        let ctx = FrameContext {
            elapsed: i as f32 * 0.016,
            dt: Duration::from_millis(16),
            pointer: (0.5, -0.5),
        };
        scheduler.tick(&ctx, &mut seen);
    }
    assert_eq!(seen, vec![0.0, 0.016, 0.032]);
}
