use serde::{Deserialize, Serialize};

/// A position inside a single resource (spine item).
///
/// `Progression` is a fraction of the resource's total length, so a location
/// survives reflows that change the on-screen page count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLocation {
    /// Beginning of the resource
    Start,
    /// End of the resource
    End,
    /// Fractional progression in `[0.0, 1.0]`
    Progression(f64),
}

impl PageLocation {
    /// Builds a location from an optional stored progression, defaulting to
    /// the beginning of the resource.
    pub fn from_progression(progression: Option<f64>) -> Self {
        progression.map_or(Self::Start, Self::Progression)
    }

    /// True for `Start`, or for a progression of exactly zero.
    pub fn is_start(&self) -> bool {
        match self {
            Self::Start => true,
            Self::Progression(p) => *p == 0.0,
            Self::End => false,
        }
    }

    /// A progression outside `[0.0, 1.0]` cannot be mapped to an offset.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Start | Self::End => true,
            Self::Progression(p) => (0.0..=1.0).contains(p),
        }
    }
}

impl Default for PageLocation {
    fn default() -> Self {
        Self::Start
    }
}
