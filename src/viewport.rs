//! Viewport state: zoom, pan center, fit mode, rotation, visible region.
//!
//! Pure geometry over the logical (rotation-adjusted) image space; nothing
//! here touches pixels. All coordinates are logical image units unless a
//! name says otherwise.

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;
/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 8.0;

/// Multiplier applied by the zoom-in action.
pub const ZOOM_IN_FACTOR: f64 = 1.1;
/// Multiplier applied by the zoom-out action.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Quarter-turn rotation of the logical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    fn plus_quarters(self, quarters: u8) -> Self {
        let steps = match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        };
        match (steps + quarters) % 4 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }
}

/// Rotation step requested by a rotate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise quarter turn (90 degrees).
    Ccw,
    /// Clockwise quarter turn (270 degrees counter-clockwise).
    Cw,
}

/// Clamped sub-region of the zoomed image visible on the display surface,
/// in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRegion {
    pub src_x: u32,
    pub src_y: u32,
    pub width: u32,
    pub height: u32,
    pub dest_x: u32,
    pub dest_y: u32,
}

/// Zoom/pan/fit/rotation state for the currently loaded frame.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    center: (f64, f64),
    fit: bool,
    display: (u32, u32),
    image: Option<(f64, f64)>,
    rotation: Rotation,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Fresh viewport in fit mode with no image loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            center: (0.0, 0.0),
            fit: true,
            display: (0, 0),
            image: None,
            rotation: Rotation::Deg0,
        }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a percentage for status display.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    #[must_use]
    pub fn fit_mode(&self) -> bool {
        self.fit
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Logical (rotation-adjusted) image size, if an image is loaded.
    #[must_use]
    pub fn image_size(&self) -> Option<(f64, f64)> {
        self.image
    }

    #[must_use]
    pub fn display_size(&self) -> (u32, u32) {
        self.display
    }

    /// Install a newly loaded frame's dimensions. Rotation resets, the
    /// center moves to the image midpoint, and fit zoom is recomputed when
    /// fit mode is active and the display size is known.
    pub fn set_image(&mut self, width: u32, height: u32) {
        self.rotation = Rotation::Deg0;
        self.image = Some((f64::from(width), f64::from(height)));
        self.center = (f64::from(width) / 2.0, f64::from(height) / 2.0);
        if self.fit {
            self.refit();
        } else {
            self.clamp_center();
        }
    }

    /// Drop the loaded image (collection drained).
    pub fn clear_image(&mut self) {
        self.image = None;
        self.rotation = Rotation::Deg0;
    }

    /// Absolute zoom request. Leaves fit mode.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.fit = false;
        self.update_zoom(zoom);
    }

    /// Relative zoom request. Leaves fit mode like any explicit zoom.
    pub fn adjust_zoom(&mut self, ratio: f64) {
        self.fit = false;
        self.update_zoom(self.zoom * ratio);
    }

    /// Scroll-wheel zoom: one vertical step of `dy` scales by `1 - 0.1*dy`.
    pub fn scroll_zoom(&mut self, dy: f64) {
        self.adjust_zoom(1.0 - dy * 0.1);
    }

    /// Enter fit mode and recompute the fitting zoom.
    pub fn fit_to_window(&mut self) {
        self.fit = true;
        self.refit();
    }

    /// Display surface resized. Refits only while fit mode is active, both
    /// dimensions are non-zero, and an image is loaded.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.display = (width, height);
        if self.fit && width > 0 && height > 0 && self.image.is_some() {
            self.refit();
        }
    }

    /// Pan by logical-space deltas. No-op while fit mode is active.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.fit {
            return;
        }
        self.center.0 += dx;
        self.center.1 += dy;
        self.clamp_center();
    }

    /// Rotate the logical frame a quarter turn; width and height swap.
    pub fn rotate(&mut self, turn: Turn) {
        let Some((w, h)) = self.image else { return };
        self.image = Some((h, w));
        self.rotation = self.rotation.plus_quarters(match turn {
            Turn::Ccw => 1,
            Turn::Cw => 3,
        });
        if self.fit {
            self.refit();
        } else {
            self.clamp_center();
        }
    }

    /// Clamp the pan center so the viewport never extends past the image.
    ///
    /// Per axis the valid band is `[half, extent - half]` with
    /// `half = display / zoom / 2`; when the scaled image is smaller than
    /// the viewport on an axis the center collapses to the image midpoint.
    pub fn clamp_center(&mut self) {
        let Some((iw, ih)) = self.image else { return };
        let (dw, dh) = self.display;
        self.center.0 = clamp_axis(self.center.0, iw, f64::from(dw) / self.zoom);
        self.center.1 = clamp_axis(self.center.1, ih, f64::from(dh) / self.zoom);
    }

    /// Geometry the presentation layer needs to place the current view:
    /// source offset and extent within the zoomed image, and the destination
    /// offset that centers the region on the display surface.
    #[must_use]
    pub fn visible_region(&self) -> Option<VisibleRegion> {
        let (iw, ih) = self.image?;
        let (dw, dh) = self.display;
        if dw == 0 || dh == 0 {
            return None;
        }
        let zw = (iw * self.zoom) as u32;
        let zh = (ih * self.zoom) as u32;
        let src_x = (self.center.0 * self.zoom - f64::from(dw) / 2.0).max(0.0) as u32;
        let src_y = (self.center.1 * self.zoom - f64::from(dh) / 2.0).max(0.0) as u32;
        let width = zw.saturating_sub(src_x).min(dw);
        let height = zh.saturating_sub(src_y).min(dh);
        Some(VisibleRegion {
            src_x,
            src_y,
            width,
            height,
            dest_x: (dw - width) / 2,
            dest_y: (dh - height) / 2,
        })
    }

    fn refit(&mut self) {
        let Some((iw, ih)) = self.image else { return };
        let (dw, dh) = self.display;
        if dw == 0 || dh == 0 {
            return;
        }
        let zoom = (f64::from(dw) / iw).min(f64::from(dh) / ih);
        self.update_zoom(zoom);
        self.center = (iw / 2.0, ih / 2.0);
        self.clamp_center();
    }

    fn update_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.clamp_center();
    }
}

fn clamp_axis(value: f64, extent: f64, viewport_extent: f64) -> f64 {
    if extent < viewport_extent {
        extent / 2.0
    } else {
        let half = viewport_extent / 2.0;
        value.clamp(half, extent - half)
    }
}
