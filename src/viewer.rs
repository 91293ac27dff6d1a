//! The engine controller: one state struct, a fixed set of operations.
//!
//! Every operation mutates the state in place and returns an [`Effects`]
//! value describing what the host must do: repaint, re-arm or cancel the
//! slideshow/animation timer slots, toggle fullscreen, or quit. The engine
//! itself owns no timers and draws nothing.

use std::fmt;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::actions::Action;
use crate::backend::{ImageBackend, ImageHandle};
use crate::collection::Collection;
use crate::scan::Scan;
use crate::schedule::{AdvanceMode, Schedule, Slideshow, frame_schedule};
use crate::viewport::{Turn, Viewport, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// Host instructions produced by an engine operation.
///
/// `slideshow`/`animation` of `Some(s)` mean: cancel whatever is armed for
/// that slot, then arm `s`. `None` leaves the slot untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    pub redraw: bool,
    /// The scaled representation no longer matches the source pixels
    /// (new image, rotation, or animation frame step).
    pub invalidate_scaled: bool,
    pub slideshow: Option<Schedule>,
    pub animation: Option<Schedule>,
    pub toggle_fullscreen: bool,
    pub quit: bool,
}

impl Effects {
    #[must_use]
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }
}

/// Status-line snapshot for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub file: Option<String>,
    pub zoom_percent: u32,
    pub index: usize,
    pub total: usize,
    pub slideshow: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.as_deref().unwrap_or("No file");
        write!(
            f,
            "{} | {}% | {}/{} | {}",
            file, self.zoom_percent, self.index, self.total, self.slideshow
        )
    }
}

/// The whole engine state behind the fixed operation set.
pub struct Viewer<B: ImageBackend> {
    backend: B,
    collection: Collection,
    viewport: Viewport,
    slideshow: Slideshow,
    image: Option<B::Handle>,
    rng: StdRng,
}

impl<B: ImageBackend> Viewer<B> {
    #[must_use]
    pub fn new(backend: B, scan: Scan) -> Self {
        Self::with_seed(backend, scan, None)
    }

    /// Like [`Self::new`] but with a deterministic random-advance seed.
    #[must_use]
    pub fn with_seed(backend: B, scan: Scan, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            backend,
            collection: Collection::new(scan.images, scan.start_index),
            viewport: Viewport::new(),
            slideshow: Slideshow::default(),
            image: None,
            rng,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[must_use]
    pub fn handle(&self) -> Option<&B::Handle> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn slideshow(&self) -> Slideshow {
        self.slideshow
    }

    /// Load the entry under the cursor, scanning past unreadable neighbors.
    pub fn load_current(&mut self) -> Effects {
        self.advance(0, true)
    }

    /// Display-surface resize reported by the host.
    pub fn resize(&mut self, width: u32, height: u32) -> Effects {
        self.viewport.on_resize(width, height);
        Effects::redraw()
    }

    /// Pan by device-pixel deltas (converted to logical units internally).
    pub fn pan_device(&mut self, dx: f64, dy: f64) -> Effects {
        let zoom = self.viewport.zoom();
        self.viewport.pan(dx / zoom, dy / zoom);
        Effects::redraw()
    }

    /// Scroll-wheel zoom step.
    pub fn scroll(&mut self, dy: f64) -> Effects {
        self.viewport.scroll_zoom(dy);
        Effects::redraw()
    }

    /// Dispatch one discrete action.
    pub fn apply(&mut self, action: Action) -> Effects {
        debug!(action = %action, "applying action");
        match action {
            Action::ZoomIn => {
                self.viewport.adjust_zoom(ZOOM_IN_FACTOR);
                Effects::redraw()
            }
            Action::ZoomOut => {
                self.viewport.adjust_zoom(ZOOM_OUT_FACTOR);
                Effects::redraw()
            }
            Action::ZoomReset => {
                self.viewport.set_zoom(1.0);
                Effects::redraw()
            }
            Action::FitToWindow => {
                self.viewport.fit_to_window();
                Effects::redraw()
            }
            Action::RotateCw => self.rotate(Turn::Cw),
            Action::RotateCcw => self.rotate(Turn::Ccw),
            Action::Next => self.advance(1, true),
            Action::Previous => self.advance(-1, true),
            Action::NextGroup => self.jump_group(1),
            Action::PreviousGroup => self.jump_group(-1),
            Action::DelayUp => self.adjust_delay(1),
            Action::DelayDown => self.adjust_delay(-1),
            Action::ToggleFullscreen => Effects {
                toggle_fullscreen: true,
                ..Effects::default()
            },
            Action::Quit => Effects {
                quit: true,
                ..Effects::default()
            },
        }
    }

    /// Rotate the logical frame and the backing pixels' cached scale.
    pub fn rotate(&mut self, turn: Turn) -> Effects {
        self.viewport.rotate(turn);
        Effects {
            redraw: true,
            invalidate_scaled: true,
            ..Effects::default()
        }
    }

    /// Add `delta` to the signed slideshow delay; the returned effect
    /// re-arms (or cancels) the slideshow timer slot.
    pub fn adjust_delay(&mut self, delta: i64) -> Effects {
        let schedule = self.slideshow.adjust(delta);
        info!(delay = self.slideshow.delay(), "slideshow delay changed");
        Effects {
            slideshow: Some(schedule),
            ..Effects::default()
        }
    }

    /// Periodic slideshow callback. Re-checks collection emptiness first;
    /// the mode is read at tick time, not capture time.
    pub fn slideshow_tick(&mut self) -> Effects {
        if self.collection.is_empty() {
            return self.note_drained();
        }
        match self.slideshow.mode() {
            None => Effects {
                // Stale timer fired after the delay hit zero.
                slideshow: Some(Schedule::Idle),
                ..Effects::default()
            },
            Some(AdvanceMode::Sequential) => self.advance(1, true),
            Some(AdvanceMode::Random) => {
                match self
                    .collection
                    .advance_random(&self.backend, &mut self.rng)
                {
                    Some(handle) => self.install(handle),
                    None => self.after_failed_move(),
                }
            }
        }
    }

    /// One-shot animation callback: advance the frame and return the next
    /// link of the self-rescheduling chain.
    pub fn animation_tick(&mut self) -> Effects {
        if self.collection.is_empty() {
            return self.note_drained();
        }
        let Some(handle) = self.image.as_mut() else {
            return Effects {
                animation: Some(Schedule::Idle),
                ..Effects::default()
            };
        };
        let next = handle.advance_frame();
        Effects {
            redraw: true,
            invalidate_scaled: true,
            animation: Some(frame_schedule(next)),
            ..Effects::default()
        }
    }

    /// Relative cursor movement through the backend, with eviction.
    pub fn advance(&mut self, offset: i64, retry: bool) -> Effects {
        match self.collection.move_by(offset, retry, &self.backend) {
            Some(handle) => self.install(handle),
            None => self.after_failed_move(),
        }
    }

    fn jump_group(&mut self, direction: i64) -> Effects {
        let len = self.collection.len() as i64;
        let offset = self.collection.group_jump_offset(direction, 1);
        if len == 0 || offset.rem_euclid(len) == 0 {
            // No boundary anywhere (single directory): stay put.
            return Effects::default();
        }
        self.advance(offset, true)
    }

    /// Commit a successfully opened image: reset the viewport's logical
    /// size and replace the animation chain (cancelling the old one).
    fn install(&mut self, handle: B::Handle) -> Effects {
        let (w, h) = handle.dimensions();
        let animation = if handle.frame_count() > 1 {
            frame_schedule(handle.frame_delay())
        } else {
            Schedule::Idle
        };
        info!(
            path = %self.current_path_display(),
            width = w,
            height = h,
            frames = handle.frame_count(),
            "image loaded"
        );
        self.viewport.set_image(w, h);
        self.image = Some(handle);
        Effects {
            redraw: true,
            invalidate_scaled: true,
            animation: Some(animation),
            ..Effects::default()
        }
    }

    fn after_failed_move(&mut self) -> Effects {
        if self.collection.is_empty() {
            self.note_drained()
        } else {
            Effects::default()
        }
    }

    /// The collection drained to empty: drop the image and cancel the
    /// animation chain. The slideshow timer stays armed; its ticks no-op.
    fn note_drained(&mut self) -> Effects {
        if self.image.take().is_some() {
            info!("collection drained; nothing left to display");
            self.viewport.clear_image();
            Effects {
                redraw: true,
                invalidate_scaled: true,
                animation: Some(Schedule::Idle),
                ..Effects::default()
            }
        } else {
            Effects::default()
        }
    }

    fn current_path_display(&self) -> String {
        self.collection
            .current()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.collection.current()
    }

    /// Snapshot for the status line.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            file: self
                .image
                .as_ref()
                .and_then(|_| self.collection.current())
                .map(|p| p.display().to_string()),
            zoom_percent: self.viewport.zoom_percent(),
            index: self.collection.cursor().map_or(0, |i| i + 1),
            total: self.collection.len(),
            slideshow: self.slideshow.to_string(),
        }
    }
}
