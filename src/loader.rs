//! Disk-backed image backend over the `image` crate.
//!
//! Static formats decode through [`image::open`]; GIF goes through the
//! animation decoder so multi-frame images carry per-frame delays. The
//! pixel capabilities the presentation layer needs (rotate, scale, crop)
//! live here as free functions over [`RgbaImage`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, RgbaImage};
use tracing::debug;

use crate::backend::{ImageBackend, ImageHandle};
use crate::error::Error;
use crate::viewport::Rotation;

/// Backend that opens images straight from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader;

struct DecodedFrame {
    pixels: RgbaImage,
    delay: Option<Duration>,
}

/// A fully decoded image: one frame for static formats, every frame with
/// its delay for animations.
pub struct Decoded {
    frames: Vec<DecodedFrame>,
    index: usize,
}

impl Decoded {
    /// Pixels of the frame currently on display.
    #[must_use]
    pub fn current(&self) -> &RgbaImage {
        &self.frames[self.index].pixels
    }
}

impl ImageHandle for Decoded {
    fn dimensions(&self) -> (u32, u32) {
        self.frames[self.index].pixels.dimensions()
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_delay(&self) -> Option<Duration> {
        self.frames[self.index].delay
    }

    fn advance_frame(&mut self) -> Option<Duration> {
        self.index = (self.index + 1) % self.frames.len();
        self.frames[self.index].delay
    }
}

impl ImageBackend for Loader {
    type Handle = Decoded;

    fn open(&self, path: &Path) -> Result<Self::Handle, Error> {
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
        let decoded = if is_gif {
            open_animated(path)?
        } else {
            open_static(path)?
        };
        debug!(
            path = %path.display(),
            frames = decoded.frames.len(),
            "decoded image"
        );
        Ok(decoded)
    }
}

fn open_static(path: &Path) -> Result<Decoded, Error> {
    let img = image::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Decoded {
        frames: vec![DecodedFrame {
            pixels: img.to_rgba8(),
            delay: None,
        }],
        index: 0,
    })
}

fn open_animated(path: &Path) -> Result<Decoded, Error> {
    let wrap = |source: image::ImageError| Error::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path)
        .map_err(|e| wrap(image::ImageError::IoError(e)))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(wrap)?;
    let frames = decoder.into_frames().collect_frames().map_err(wrap)?;
    if frames.is_empty() {
        // A headerless or truncated file can decode to nothing.
        return open_static(path);
    }
    let frames = frames
        .into_iter()
        .map(|f| {
            let delay = Duration::from(f.delay());
            DecodedFrame {
                pixels: f.into_buffer(),
                delay: Some(delay),
            }
        })
        .collect();
    Ok(Decoded { frames, index: 0 })
}

/// Rotate a surface by the viewport's accumulated quarter turns.
#[must_use]
pub fn rotate(surface: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::Deg0 => surface.clone(),
        Rotation::Deg90 => imageops::rotate270(surface),
        Rotation::Deg180 => imageops::rotate180(surface),
        Rotation::Deg270 => imageops::rotate90(surface),
    }
}

/// Scale a surface to the given size with the configured interpolation.
#[must_use]
pub fn scale(surface: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    imageops::resize(surface, width.max(1), height.max(1), filter)
}

/// Extract a sub-region of a surface.
#[must_use]
pub fn crop_region(surface: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
    imageops::crop_imm(surface, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let img = checker(4, 2);
        assert_eq!(rotate(&img, Rotation::Deg90).dimensions(), (2, 4));
        assert_eq!(rotate(&img, Rotation::Deg180).dimensions(), (4, 2));
        assert_eq!(rotate(&img, Rotation::Deg270).dimensions(), (2, 4));
    }

    #[test]
    fn crop_region_extracts_requested_extent() {
        let img = checker(8, 8);
        let sub = crop_region(&img, 2, 2, 4, 3);
        assert_eq!(sub.dimensions(), (4, 3));
    }
}
