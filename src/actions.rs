//! Closed set of user-invocable actions and the key-token lookup table.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::Error;

/// Everything a key press can ask the engine (or its host) to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ZoomIn,
    ZoomOut,
    ZoomReset,
    FitToWindow,
    RotateCw,
    RotateCcw,
    Next,
    Previous,
    NextGroup,
    PreviousGroup,
    DelayUp,
    DelayDown,
    ToggleFullscreen,
    Quit,
}

impl Action {
    pub const ALL: &'static [Self] = &[
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ZoomReset,
        Self::FitToWindow,
        Self::RotateCw,
        Self::RotateCcw,
        Self::Next,
        Self::Previous,
        Self::NextGroup,
        Self::PreviousGroup,
        Self::DelayUp,
        Self::DelayDown,
        Self::ToggleFullscreen,
        Self::Quit,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::ZoomReset => "zoom-100",
            Self::FitToWindow => "fit-to-window",
            Self::RotateCw => "rotate-cw",
            Self::RotateCcw => "rotate-ccw",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::NextGroup => "next-group",
            Self::PreviousGroup => "previous-group",
            Self::DelayUp => "delay-up",
            Self::DelayDown => "delay-down",
            Self::ToggleFullscreen => "toggle-fullscreen",
            Self::Quit => "quit",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static key-token → action lookup, compiled once at configuration load.
#[derive(Debug, Clone)]
pub struct Keymap {
    map: HashMap<String, Action>,
}

impl Keymap {
    /// Build the lookup from an action-name → key-token table.
    ///
    /// # Errors
    /// Unknown action names and key tokens bound twice are rejected.
    pub fn from_bindings(bindings: &BTreeMap<String, String>) -> Result<Self, Error> {
        let mut map = HashMap::new();
        for (name, key) in bindings {
            let action = Action::from_name(name)
                .ok_or_else(|| Error::UnknownAction(name.clone()))?;
            if map.insert(key.clone(), action).is_some() {
                return Err(Error::DuplicateKey(key.clone()));
            }
        }
        Ok(Self { map })
    }

    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<Action> {
        self.map.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
