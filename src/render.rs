//! CPU composition of the visible region onto a display-sized canvas.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::loader;
use crate::viewport::Viewport;

/// Cached zoomed representation of the current (rotated) frame.
///
/// The scaled surface is recomputed only when the zoom differs from the one
/// it was built at; loading a new image, rotating, or stepping an animation
/// frame invalidates it explicitly.
#[derive(Default)]
pub struct ScaledCache {
    zoom: Option<f64>,
    surface: Option<RgbaImage>,
}

impl ScaledCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached surface (pixels changed).
    pub fn invalidate(&mut self) {
        self.zoom = None;
        self.surface = None;
    }

    fn surface_at(
        &mut self,
        rotated: &RgbaImage,
        zoom: f64,
        filter: FilterType,
    ) -> &RgbaImage {
        if self.zoom != Some(zoom) || self.surface.is_none() {
            let (w, h) = rotated.dimensions();
            let zw = (f64::from(w) * zoom) as u32;
            let zh = (f64::from(h) * zoom) as u32;
            self.surface = Some(loader::scale(rotated, zw, zh, filter));
            self.zoom = Some(zoom);
        }
        self.surface.as_ref().expect("surface populated above")
    }
}

/// Compose the clamped visible region of `frame` into a canvas matching the
/// viewport's display size. Returns `None` when there is nothing to draw
/// (no image or a zero-sized surface).
pub fn compose(
    frame: &RgbaImage,
    viewport: &Viewport,
    cache: &mut ScaledCache,
    filter: FilterType,
    background: Rgba<u8>,
) -> Option<RgbaImage> {
    let region = viewport.visible_region()?;
    if region.width == 0 || region.height == 0 {
        return None;
    }
    let rotated = loader::rotate(frame, viewport.rotation());
    let scaled = cache.surface_at(&rotated, viewport.zoom(), filter);
    let visible = loader::crop_region(
        scaled,
        region.src_x.min(scaled.width().saturating_sub(1)),
        region.src_y.min(scaled.height().saturating_sub(1)),
        region.width.min(scaled.width()),
        region.height.min(scaled.height()),
    );
    let (dw, dh) = viewport.display_size();
    let mut canvas = RgbaImage::from_pixel(dw, dh, background);
    imageops::replace(
        &mut canvas,
        &visible,
        i64::from(region.dest_x),
        i64::from(region.dest_y),
    );
    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    #[test]
    fn cache_rescales_only_on_zoom_change() {
        let frame = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        let mut cache = ScaledCache::new();
        let a = cache.surface_at(&frame, 2.0, FilterType::Nearest).dimensions();
        assert_eq!(a, (20, 20));
        // Same zoom: the cached surface is reused untouched.
        let again: *const RgbaImage = cache.surface_at(&frame, 2.0, FilterType::Nearest);
        let reused: *const RgbaImage = cache.surface_at(&frame, 2.0, FilterType::Nearest);
        assert_eq!(again, reused);
        let b = cache.surface_at(&frame, 0.5, FilterType::Nearest).dimensions();
        assert_eq!(b, (5, 5));
    }

    #[test]
    fn compose_centers_smaller_image() {
        let frame = RgbaImage::from_pixel(100, 50, Rgba([200, 0, 0, 255]));
        let mut vp = Viewport::new();
        vp.on_resize(200, 200);
        vp.set_image(100, 50);
        vp.set_zoom(1.0);
        let mut cache = ScaledCache::new();
        let canvas = compose(
            &frame,
            &vp,
            &mut cache,
            FilterType::Nearest,
            Rgba([0, 0, 0, 255]),
        )
        .unwrap();
        assert_eq!(canvas.dimensions(), (200, 200));
        // Center pixel lands inside the image, corners on the background.
        assert_eq!(canvas.get_pixel(100, 100), &Rgba([200, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }
}
