use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::location::PageLocation;

/// Direction of the reading progression.
///
/// Kept as an explicit input to every offset computation instead of being
/// baked into stored geometry, so the RTL flip stays testable in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingProgression {
    #[default]
    Ltr,
    Rtl,
}

/// One host-rendered page, treated as an opaque capability.
///
/// The pagination controller only ever asks a page to seek to a location and
/// to report its load state and measured extent; rendering is the host's job.
pub trait PageView {
    /// Moves the page to the given internal location. The call returns once
    /// the seek has completed; the controller will not start loading the next
    /// queued page before then.
    fn go_to(&mut self, location: &PageLocation) -> Result<()>;

    /// Measured content height, meaningful once `is_loaded` returns true.
    fn content_height(&self) -> f32;

    /// Whether the page has finished loading its content.
    fn is_loaded(&self) -> bool;

    /// Called right before the view is removed from the resident set, while
    /// it is still attached to the host container.
    fn will_detach(&mut self) {}
}
