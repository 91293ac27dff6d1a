//! Collaborator contract between the engine and whatever decodes pixels.
//!
//! The engine never touches pixel data; it only needs to open a path, read
//! logical dimensions, and step animation frames. The concrete disk loader
//! lives in [`crate::loader`]; tests substitute their own stub.

use std::path::Path;
use std::time::Duration;

use crate::error::Error;

/// Capability to open an image location into a loaded handle.
pub trait ImageBackend {
    type Handle: ImageHandle;

    /// Open and decode the image at `path`.
    ///
    /// # Errors
    /// Returns [`Error::Open`] (or an IO error) when the file cannot be
    /// decoded; the navigation cursor treats any failure as grounds for
    /// eviction.
    fn open(&self, path: &Path) -> Result<Self::Handle, Error>;
}

/// A loaded, possibly multi-frame image.
pub trait ImageHandle {
    /// Pixel dimensions of the current frame, unrotated.
    fn dimensions(&self) -> (u32, u32);

    /// Total number of frames; 1 for static images.
    fn frame_count(&self) -> usize;

    /// Display duration of the current frame. `None` means the frame is
    /// static (infinite delay) and no further stepping should be scheduled.
    fn frame_delay(&self) -> Option<Duration>;

    /// Advance to the next frame (wrapping) and return the new frame's
    /// delay, with the same `None` convention as [`Self::frame_delay`].
    fn advance_frame(&mut self) -> Option<Duration>;
}
