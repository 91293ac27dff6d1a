#![allow(dead_code)]

//! Scriptable in-memory backend for navigation and scheduling tests.

use std::cell::Cell;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use slideview::backend::{ImageBackend, ImageHandle};
use slideview::error::Error;

pub struct StubBackend {
    bad: HashSet<PathBuf>,
    size: (u32, u32),
    delays: Vec<Option<Duration>>,
    /// Number of open attempts observed.
    pub opens: Cell<usize>,
}

impl StubBackend {
    /// Backend where every path opens as a 640x480 static image.
    pub fn ok() -> Self {
        Self {
            bad: HashSet::new(),
            size: (640, 480),
            delays: vec![None],
            opens: Cell::new(0),
        }
    }

    /// Mark paths that fail to open.
    pub fn with_bad(mut self, paths: &[&str]) -> Self {
        self.bad.extend(paths.iter().map(PathBuf::from));
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Script the per-frame delays (length = frame count).
    pub fn with_frames(mut self, delays: Vec<Option<Duration>>) -> Self {
        assert!(!delays.is_empty());
        self.delays = delays;
        self
    }
}

pub struct StubHandle {
    size: (u32, u32),
    delays: Vec<Option<Duration>>,
    index: usize,
}

impl ImageHandle for StubHandle {
    fn dimensions(&self) -> (u32, u32) {
        self.size
    }

    fn frame_count(&self) -> usize {
        self.delays.len()
    }

    fn frame_delay(&self) -> Option<Duration> {
        self.delays[self.index]
    }

    fn advance_frame(&mut self) -> Option<Duration> {
        self.index = (self.index + 1) % self.delays.len();
        self.delays[self.index]
    }
}

impl ImageBackend for StubBackend {
    type Handle = StubHandle;

    fn open(&self, path: &Path) -> Result<Self::Handle, Error> {
        self.opens.set(self.opens.get() + 1);
        if self.bad.contains(path) {
            return Err(Error::Open {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "scripted failure",
                )),
            });
        }
        Ok(StubHandle {
            size: self.size,
            delays: self.delays.clone(),
            index: 0,
        })
    }
}

/// Shorthand for a path list.
pub fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}
