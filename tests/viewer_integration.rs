mod common;

use std::time::Duration;

use common::{StubBackend, paths};
use slideview::actions::Action;
use slideview::scan::Scan;
use slideview::schedule::Schedule;
use slideview::viewer::Viewer;

fn scan(names: &[&str]) -> Scan {
    Scan {
        images: paths(names),
        start_index: 0,
    }
}

#[test]
fn startup_load_fits_and_reports_status() {
    let backend = StubBackend::ok().with_size(1600, 900);
    let mut viewer = Viewer::new(backend, scan(&["a.png", "b.png", "c.png"]));
    viewer.resize(800, 600);
    let fx = viewer.load_current();
    assert!(fx.redraw);
    assert_eq!(fx.animation, Some(Schedule::Idle));
    assert!((viewer.viewport().zoom() - 0.5).abs() < 1e-9);

    let status = viewer.status();
    assert_eq!(status.index, 1);
    assert_eq!(status.total, 3);
    assert_eq!(status.zoom_percent, 50);
    assert_eq!(status.slideshow, "Off");
    assert_eq!(status.to_string(), "a.png | 50% | 1/3 | Off");
}

#[test]
fn trigger_index_positions_the_cursor() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::new(
        backend,
        Scan {
            images: paths(&["a.png", "b.png", "c.png"]),
            start_index: 2,
        },
    );
    viewer.load_current();
    assert_eq!(viewer.status().index, 3);
}

#[test]
fn next_and_previous_wrap() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::new(backend, scan(&["a.png", "b.png", "c.png"]));
    viewer.load_current();
    viewer.apply(Action::Previous);
    assert_eq!(viewer.status().index, 3);
    viewer.apply(Action::Next);
    assert_eq!(viewer.status().index, 1);
}

#[test]
fn group_actions_jump_directory_boundaries() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::new(
        backend,
        scan(&["x/1.png", "x/2.png", "y/3.png", "z/4.png"]),
    );
    viewer.load_current();
    viewer.apply(Action::NextGroup);
    assert_eq!(viewer.current_path().unwrap().to_str(), Some("y/3.png"));
    viewer.apply(Action::NextGroup);
    assert_eq!(viewer.current_path().unwrap().to_str(), Some("z/4.png"));
    viewer.apply(Action::PreviousGroup);
    assert_eq!(viewer.current_path().unwrap().to_str(), Some("y/3.png"));
}

#[test]
fn delay_steps_accumulate_into_sequential_mode() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::new(backend, scan(&["a.png", "b.png"]));
    viewer.load_current();
    viewer.apply(Action::DelayDown);
    viewer.apply(Action::DelayDown);
    let fx = viewer.apply(Action::DelayDown);
    assert_eq!(fx.slideshow, Some(Schedule::Every(Duration::from_secs(3))));
    assert_eq!(viewer.slideshow().to_string(), "Sequential 3s");

    for expected in [2, 1, 2, 1, 2] {
        viewer.slideshow_tick();
        assert_eq!(viewer.status().index, expected);
    }
}

#[test]
fn random_slideshow_alternates_between_two_entries() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::with_seed(backend, scan(&["a.png", "b.png"]), Some(42));
    viewer.load_current();
    let fx = viewer.apply(Action::DelayUp);
    assert_eq!(fx.slideshow, Some(Schedule::Every(Duration::from_secs(1))));
    assert_eq!(viewer.slideshow().to_string(), "Random 1s");

    let mut index = viewer.status().index;
    for _ in 0..10 {
        viewer.slideshow_tick();
        let now = viewer.status().index;
        assert_ne!(now, index);
        index = now;
    }
}

#[test]
fn stale_slideshow_tick_cancels_its_timer() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::new(backend, scan(&["a.png"]));
    viewer.load_current();
    let fx = viewer.slideshow_tick();
    assert_eq!(fx.slideshow, Some(Schedule::Idle));
}

#[test]
fn animated_image_chains_one_shot_schedules() {
    let backend = StubBackend::ok().with_frames(vec![
        Some(Duration::from_millis(40)),
        Some(Duration::from_millis(20)),
        None,
    ]);
    let mut viewer = Viewer::new(backend, scan(&["anim.gif"]));
    let fx = viewer.load_current();
    assert_eq!(
        fx.animation,
        Some(Schedule::Once(Duration::from_millis(40)))
    );

    let fx = viewer.animation_tick();
    assert!(fx.redraw);
    assert_eq!(
        fx.animation,
        Some(Schedule::Once(Duration::from_millis(20)))
    );

    // Third frame is static: the chain ends.
    let fx = viewer.animation_tick();
    assert_eq!(fx.animation, Some(Schedule::Idle));
}

#[test]
fn loading_a_new_image_replaces_the_animation_chain() {
    let backend = StubBackend::ok().with_frames(vec![
        Some(Duration::from_millis(40)),
        Some(Duration::from_millis(40)),
    ]);
    let mut viewer = Viewer::new(backend, scan(&["a.gif", "b.gif"]));
    viewer.load_current();
    let fx = viewer.apply(Action::Next);
    // The effect re-arms the slot, implicitly cancelling the old chain.
    assert_eq!(
        fx.animation,
        Some(Schedule::Once(Duration::from_millis(40)))
    );
    assert!(fx.invalidate_scaled);
}

#[test]
fn zoom_and_rotate_actions_update_the_viewport() {
    let backend = StubBackend::ok().with_size(1000, 500);
    let mut viewer = Viewer::new(backend, scan(&["a.png"]));
    viewer.resize(1000, 500);
    viewer.load_current();
    assert_eq!(viewer.status().zoom_percent, 100);

    viewer.apply(Action::ZoomIn);
    assert_eq!(viewer.status().zoom_percent, 110);
    assert!(!viewer.viewport().fit_mode());

    let fx = viewer.apply(Action::RotateCw);
    assert!(fx.invalidate_scaled);
    assert_eq!(viewer.viewport().image_size(), Some((500.0, 1000.0)));

    viewer.apply(Action::FitToWindow);
    assert!(viewer.viewport().fit_mode());
    assert!((viewer.viewport().zoom() - 0.5).abs() < 1e-9);
}

#[test]
fn draining_the_collection_reaches_the_empty_state() {
    let backend = StubBackend::ok().with_bad(&["a.png", "b.png", "c.png"]);
    let mut viewer = Viewer::new(backend, scan(&["a.png", "b.png", "c.png"]));
    let fx = viewer.load_current();
    assert!(!fx.redraw);
    let status = viewer.status();
    assert_eq!(status.file, None);
    assert_eq!(status.index, 0);
    assert_eq!(status.total, 0);
    assert_eq!(status.to_string(), "No file | 100% | 0/0 | Off");

    // Navigation and timer callbacks stay harmless no-ops.
    assert_eq!(viewer.apply(Action::Next).redraw, false);
    viewer.apply(Action::DelayDown);
    let fx = viewer.slideshow_tick();
    assert!(!fx.redraw);
}

#[test]
fn fullscreen_and_quit_pass_through() {
    let backend = StubBackend::ok();
    let mut viewer = Viewer::new(backend, scan(&["a.png"]));
    viewer.load_current();
    assert!(viewer.apply(Action::ToggleFullscreen).toggle_fullscreen);
    assert!(viewer.apply(Action::Quit).quit);
}
