pub mod geometry;
pub mod layout;
pub mod load_queue;
pub mod location;
pub mod notify;
pub mod page_view;
pub mod pagination;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export the navigation surface
pub use layout::{LayoutMode, PageFrame};
pub use location::PageLocation;
pub use page_view::{PageView, ReadingProgression};
pub use pagination::{PaginationDelegate, PaginationError, PaginationView, Viewport};
pub use settings::Settings;
