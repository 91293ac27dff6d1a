//! Headless cooperative driver: realizes the engine's timer instructions
//! and maps console commands through the keymap into actions.
//!
//! A reader thread feeds stdin lines into a channel; the main loop blocks
//! on it with a timeout set to the earliest armed deadline. There is one
//! slideshow deadline and one animation deadline; applying an effect's
//! schedule replaces the slot, so a cancelled timer can never fire.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, unbounded};
use image::Rgba;
use tracing::{info, warn};

use crate::actions::Keymap;
use crate::config::GuiOptions;
use crate::loader::Loader;
use crate::render::{self, ScaledCache};
use crate::schedule::Schedule;
use crate::viewer::{Effects, Viewer};

/// Display surface assumed before any `resize` command arrives.
const DEFAULT_DISPLAY: (u32, u32) = (800, 600);

/// Startup choices forwarded from the CLI and configuration.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub gui: GuiOptions,
    pub keymap: Keymap,
    /// Signed slideshow delay applied at startup.
    pub initial_delay: i64,
    pub fullscreen: bool,
}

pub struct Shell {
    viewer: Viewer<Loader>,
    opts: ShellOptions,
    cache: ScaledCache,
    fullscreen: bool,
    slideshow_at: Option<(Instant, Duration)>,
    animation_at: Option<Instant>,
    done: bool,
}

impl Shell {
    #[must_use]
    pub fn new(viewer: Viewer<Loader>, opts: ShellOptions) -> Self {
        let fullscreen = opts.fullscreen;
        Self {
            viewer,
            opts,
            cache: ScaledCache::new(),
            fullscreen,
            slideshow_at: None,
            animation_at: None,
            done: false,
        }
    }

    /// Run until quit, stdin EOF with no timers armed, or an IO failure.
    pub fn run(mut self) -> Result<()> {
        let (tx, rx) = unbounded::<String>();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        if self.fullscreen {
            self.enter_fullscreen_state();
        }
        let (dw, dh) = DEFAULT_DISPLAY;
        let fx = self.viewer.resize(dw, dh);
        self.apply_effects(fx);
        let fx = self.viewer.load_current();
        let loaded = fx.redraw;
        self.apply_effects(fx);
        if !loaded {
            // Nothing opened; still show the empty-collection status once.
            println!("{}", self.viewer.status());
        }
        if self.opts.initial_delay != 0 {
            let fx = self.viewer.adjust_delay(self.opts.initial_delay);
            self.apply_effects(fx);
        }

        self.event_loop(&rx);
        Ok(())
    }

    fn event_loop(&mut self, rx: &Receiver<String>) {
        let mut stdin_open = true;
        while !self.done {
            let timeout = self.next_deadline().map(|at| {
                at.saturating_duration_since(Instant::now())
            });
            if stdin_open {
                match timeout {
                    Some(t) => match rx.recv_timeout(t) {
                        Ok(line) => self.handle_line(&line),
                        Err(RecvTimeoutError::Timeout) => self.fire_due_timers(),
                        Err(RecvTimeoutError::Disconnected) => stdin_open = false,
                    },
                    None => match rx.recv() {
                        Ok(line) => self.handle_line(&line),
                        Err(_) => stdin_open = false,
                    },
                }
            } else {
                // Pure timer mode: keep the slideshow running headlessly.
                match timeout {
                    Some(t) => {
                        thread::sleep(t);
                        self.fire_due_timers();
                    }
                    None => break,
                }
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        let slideshow = self.slideshow_at.map(|(at, _)| at);
        let animation = self.animation_at;
        match (slideshow, animation) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn fire_due_timers(&mut self) {
        let now = Instant::now();
        if let Some(at) = self.animation_at
            && at <= now
        {
            self.animation_at = None;
            let fx = self.viewer.animation_tick();
            self.apply_effects(fx);
        }
        if let Some((at, period)) = self.slideshow_at
            && at <= now
        {
            self.slideshow_at = Some((at + period, period));
            let fx = self.viewer.slideshow_tick();
            self.apply_effects(fx);
        }
    }

    fn handle_line(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let Some(token) = parts.next() else { return };
        match token {
            "save" => {
                let target = parts.next().map(PathBuf::from);
                if let Err(err) = self.save_snapshot(target) {
                    warn!(error = %err, "snapshot failed");
                }
            }
            "status" => println!("{}", self.viewer.status()),
            "resize" => {
                let w = parts.next().and_then(|s| s.parse().ok());
                let h = parts.next().and_then(|s| s.parse().ok());
                if let (Some(w), Some(h)) = (w, h) {
                    let fx = self.viewer.resize(w, h);
                    self.apply_effects(fx);
                } else {
                    warn!("usage: resize <width> <height>");
                }
            }
            "pan" => {
                let dx = parts.next().and_then(|s| s.parse().ok());
                let dy = parts.next().and_then(|s| s.parse().ok());
                if let (Some(dx), Some(dy)) = (dx, dy) {
                    let fx = self.viewer.pan_device(dx, dy);
                    self.apply_effects(fx);
                } else {
                    warn!("usage: pan <dx> <dy>");
                }
            }
            "scroll" => {
                if let Some(dy) = parts.next().and_then(|s| s.parse().ok()) {
                    let fx = self.viewer.scroll(dy);
                    self.apply_effects(fx);
                } else {
                    warn!("usage: scroll <dy>");
                }
            }
            key => match self.opts.keymap.resolve(key) {
                Some(action) => {
                    let fx = self.viewer.apply(action);
                    self.apply_effects(fx);
                }
                None => warn!(key, "unbound key"),
            },
        }
    }

    fn apply_effects(&mut self, fx: Effects) {
        if fx.invalidate_scaled {
            self.cache.invalidate();
        }
        if let Some(schedule) = fx.slideshow {
            self.slideshow_at = match schedule {
                Schedule::Idle => None,
                Schedule::Once(d) => Some((Instant::now() + d, d)),
                Schedule::Every(p) => Some((Instant::now() + p, p)),
            };
        }
        if let Some(schedule) = fx.animation {
            self.animation_at = match schedule {
                Schedule::Idle => None,
                Schedule::Once(d) | Schedule::Every(d) => Some(Instant::now() + d),
            };
        }
        if fx.toggle_fullscreen {
            self.fullscreen = !self.fullscreen;
            if self.fullscreen {
                self.enter_fullscreen_state();
            } else {
                info!("fullscreen off");
            }
        }
        if fx.redraw {
            println!("{}", self.viewer.status());
        }
        if fx.quit {
            self.done = true;
        }
    }

    fn enter_fullscreen_state(&self) {
        if self.opts.gui.inhibit_idle_on_fullscreen {
            info!("fullscreen on (idle inhibit requested)");
        } else {
            info!("fullscreen on");
        }
    }

    fn save_snapshot(&mut self, target: Option<PathBuf>) -> Result<()> {
        let Some(handle) = self.viewer.handle() else {
            warn!("no image loaded; nothing to save");
            return Ok(());
        };
        let background = if self.opts.gui.dark_theme {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        };
        let Some(canvas) = render::compose(
            handle.current(),
            self.viewer.viewport(),
            &mut self.cache,
            self.opts.gui.scaling.to_filter_type(),
            background,
        ) else {
            warn!("empty viewport; nothing to save");
            return Ok(());
        };
        let target = target.unwrap_or_else(|| PathBuf::from("snapshot.png"));
        canvas
            .save(&target)
            .with_context(|| format!("writing snapshot to {}", target.display()))?;
        info!(path = %target.display(), "snapshot written");
        Ok(())
    }
}
