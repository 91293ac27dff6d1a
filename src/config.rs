use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::actions::{Action, Keymap};
use crate::error::Error;

/// Interpolation quality used when rescaling the zoomed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingFilter {
    Nearest,
    Bilinear,
    CatmullRom,
    Lanczos,
}

impl Default for ScalingFilter {
    fn default() -> Self {
        Self::Bilinear
    }
}

impl ScalingFilter {
    #[must_use]
    pub fn to_filter_type(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Bilinear => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Lanczos => image::imageops::FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GuiOptions {
    /// Prefer a dark canvas behind the image.
    pub dark_theme: bool,
    /// Interpolation used for the zoomed representation.
    pub scaling: ScalingFilter,
    /// Ask the host to inhibit idle/screen blanking while fullscreen.
    pub inhibit_idle_on_fullscreen: bool,
}

impl Default for GuiOptions {
    fn default() -> Self {
        Self {
            dark_theme: true,
            scaling: ScalingFilter::default(),
            inhibit_idle_on_fullscreen: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SlideshowOptions {
    /// Signed delay in seconds: 0 off, positive random, negative sequential.
    pub delay: i64,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self { delay: 0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScanSection {
    pub recursive: bool,
    pub follow_links: bool,
    pub filter_images: bool,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            recursive: false,
            follow_links: false,
            filter_images: true,
        }
    }
}

/// Whole-application configuration, YAML with kebab-case keys. Every field
/// has a compiled-in default, so a missing file or empty document is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    pub gui: GuiOptions,
    pub slideshow: SlideshowOptions,
    pub scan: ScanSection,
    /// Action name → key token.
    pub keys: BTreeMap<String, String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            gui: GuiOptions::default(),
            slideshow: SlideshowOptions::default(),
            scan: ScanSection::default(),
            keys: default_keys(),
        }
    }
}

fn default_keys() -> BTreeMap<String, String> {
    let defaults = [
        (Action::ToggleFullscreen, "f"),
        (Action::FitToWindow, "W"),
        (Action::ZoomIn, "+"),
        (Action::ZoomOut, "-"),
        (Action::ZoomReset, "="),
        (Action::RotateCw, ">"),
        (Action::RotateCcw, "<"),
        (Action::Next, "n"),
        (Action::Previous, "p"),
        (Action::NextGroup, "]"),
        (Action::PreviousGroup, "["),
        (Action::DelayUp, "d"),
        (Action::DelayDown, "D"),
        (Action::Quit, "q"),
    ];
    defaults
        .into_iter()
        .map(|(a, k)| (a.as_str().to_string(), k.to_string()))
        .collect()
}

impl Configuration {
    /// Read configuration from a YAML file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Load the file when a path is given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Compile the key bindings into the static lookup table.
    pub fn keymap(&self) -> Result<Keymap, Error> {
        Keymap::from_bindings(&self.keys)
    }

    /// Validate invariants that serde defaults alone cannot express.
    pub fn validated(self) -> Result<Self, Error> {
        self.keymap()?;
        Ok(self)
    }
}
