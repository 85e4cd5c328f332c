//! Pagination view state machine
//!
//! Owns the resident page views for a spine, schedules loads around the
//! current index, and positions views according to the active layout mode.
//! All mutation happens through `&mut self`, so transitions are serialized by
//! construction: a drain always runs to completion before another navigation
//! can start.

use std::collections::BTreeMap;

use log::{debug, warn};
use thiserror::Error;

use crate::geometry::{Point, Rect, Size};
use crate::layout::{self, LayoutMode, PageFrame};
use crate::load_queue::LoadQueue;
use crate::location::PageLocation;
use crate::page_view::{PageView, ReadingProgression};
use crate::settings::Settings;

/// Collaborator contract consumed by the pagination view.
///
/// Query methods must be synchronous and side-effect-free; the controller
/// relies on that to keep its load ordering deterministic.
pub trait PaginationDelegate {
    /// Creates the page view for the page at the given index. `None` means
    /// the index cannot currently be materialized; the load is skipped and
    /// the queue continues.
    fn create_page_view(&mut self, index: usize) -> Option<Box<dyn PageView>>;

    /// Number of positions inside the resource at the given index, used only
    /// to size preload windows.
    fn position_count(&self, index: usize) -> usize;

    /// Called once per completed transition, after the load queue drains.
    fn views_did_update(&mut self);

    /// Total row count for a virtualized list layout.
    fn spine_item_count(&self) -> usize;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page count must be at least 1")]
    InvalidPageCount,

    #[error("index {index} out of range for {page_count} pages")]
    IndexOutOfBounds { index: usize, page_count: usize },
}

/// Host scroll surface state. The controller owns it exclusively; hosts read
/// it to place content and feed settled offsets back via `scroll_ended_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub bounds: Size,
    pub content_size: Size,
    pub content_offset: Point,
    pub scroll_enabled: bool,
    pub alpha: f32,
}

impl Viewport {
    fn new(bounds: Size) -> Self {
        Self {
            bounds,
            content_size: bounds,
            content_offset: Point::default(),
            scroll_enabled: true,
            alpha: 1.0,
        }
    }
}

#[derive(Clone, Copy)]
enum StepDirection {
    Forward,
    Backward,
}

impl StepDirection {
    fn step(self, from: usize) -> Option<usize> {
        match self {
            Self::Forward => from.checked_add(1),
            Self::Backward => from.checked_sub(1),
        }
    }
}

/// The pagination state machine.
pub struct PaginationView<D: PaginationDelegate> {
    delegate: D,
    mode: LayoutMode,
    settings: Settings,

    page_count: usize,
    current_index: usize,
    reading_progression: ReadingProgression,

    /// Resident page views keyed by spine index. BTreeMap keeps them in
    /// reading order for the visual-order walks.
    loaded_views: BTreeMap<usize, Box<dyn PageView>>,
    load_queue: LoadQueue,
    viewport: Viewport,
}

impl<D: PaginationDelegate> PaginationView<D> {
    pub fn new(mode: LayoutMode, bounds: Size, settings: Settings, delegate: D) -> Self {
        Self {
            delegate,
            mode,
            settings,
            page_count: 0,
            current_index: 0,
            reading_progression: ReadingProgression::default(),
            loaded_views: BTreeMap::new(),
            load_queue: LoadQueue::new(),
            viewport: Viewport::new(bounds),
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn reading_progression(&self) -> ReadingProgression {
        self.reading_progression
    }

    /// Whether no page views are resident yet.
    pub fn is_empty(&self) -> bool {
        self.loaded_views.is_empty()
    }

    pub fn current_view(&self) -> Option<&dyn PageView> {
        self.loaded_views
            .get(&self.current_index)
            .map(|view| view.as_ref())
    }

    pub fn loaded_view(&self, index: usize) -> Option<&dyn PageView> {
        self.loaded_views.get(&index).map(|view| view.as_ref())
    }

    /// Indices of resident page views, in reading order.
    pub fn loaded_indices(&self) -> Vec<usize> {
        self.loaded_views.keys().copied().collect()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Hosts toggle this around drag gestures to keep nested scroll surfaces
    /// from stealing the fling.
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.viewport.scroll_enabled = enabled;
    }

    /// Host container resized; recompute content geometry.
    pub fn set_viewport_bounds(&mut self, bounds: Size) {
        self.viewport.bounds = bounds;
        self.relayout();
    }

    /// Replaces the whole pagination: drops every resident view, clears the
    /// queue, then loads around `index`. The only path that may change
    /// `page_count` or `reading_progression`.
    pub fn reload(
        &mut self,
        index: usize,
        location: PageLocation,
        page_count: usize,
        reading_progression: ReadingProgression,
    ) -> Result<(), PaginationError> {
        if page_count == 0 {
            return Err(PaginationError::InvalidPageCount);
        }
        if index >= page_count {
            return Err(PaginationError::IndexOutOfBounds { index, page_count });
        }

        for view in self.loaded_views.values_mut() {
            view.will_detach();
        }
        self.loaded_views.clear();
        self.load_queue.clear();

        self.page_count = page_count;
        self.reading_progression = reading_progression;

        self.set_current_index(index, Some(location));
        Ok(())
    }

    /// Go to the page with the given index. Returns whether the move is
    /// possible; an out-of-range index fails without side effects. A location
    /// with an out-of-range progression abandons the navigation (no offset
    /// change) but still counts as completed.
    pub fn go_to_index(&mut self, index: usize, location: PageLocation, animated: bool) -> bool {
        if index >= self.page_count {
            return false;
        }
        if !location.is_valid() {
            warn!("ignoring navigation to invalid location {location:?}");
            return true;
        }

        if self.current_index == index {
            self.scroll_to_view(index, location);
        } else {
            self.fade_to_view(index, location, animated);
        }
        true
    }

    /// A user drag settled at the given offset: adopt it and derive the new
    /// displayed index from geometry.
    pub fn scroll_ended_at(&mut self, offset: Point) {
        self.viewport.scroll_enabled = true;
        self.viewport.content_offset = offset;

        let new_index = match self.mode {
            LayoutMode::HorizontalPaging => layout::index_for_x_offset(
                offset.x,
                self.viewport.bounds.width,
                self.page_count,
                self.reading_progression,
            ),
            LayoutMode::VerticalScroll => {
                match layout::index_at_y_offset(&self.arranged_frames(), offset.y) {
                    Some(index) => index,
                    None => return,
                }
            }
            // The windowed list host drives visible-index changes itself
            LayoutMode::VirtualizedList => return,
        };

        if new_index != self.current_index {
            debug!("scroll settled at ({}, {}), displayed index {new_index}", offset.x, offset.y);
        }
        self.set_current_index(new_index, None);
    }

    /// Resident frames in visual order for the active mode.
    pub fn arranged_frames(&self) -> Vec<PageFrame> {
        match self.mode {
            LayoutMode::HorizontalPaging => self
                .loaded_views
                .keys()
                .map(|&index| PageFrame {
                    index,
                    frame: Rect {
                        origin: Point::new(
                            layout::x_offset_for_index(
                                index,
                                self.viewport.bounds.width,
                                self.page_count,
                                self.reading_progression,
                            ),
                            0.0,
                        ),
                        size: self.viewport.bounds,
                    },
                })
                .collect(),
            LayoutMode::VerticalScroll | LayoutMode::VirtualizedList => {
                let mut rows: Vec<(usize, f32)> = self
                    .loaded_views
                    .iter()
                    .map(|(&index, view)| (index, view.content_height()))
                    .collect();
                if self.reading_progression == ReadingProgression::Rtl {
                    rows.reverse();
                }
                layout::arrange_rows(&rows, self.viewport.bounds.width)
            }
        }
    }

    /// Total row count for a windowed list host.
    pub fn row_count(&self) -> usize {
        self.delegate.spine_item_count()
    }

    /// Height the list host should give the row: the view's measured height
    /// once loaded, a fixed placeholder before that.
    pub fn row_height(&self, index: usize) -> f32 {
        match self.loaded_views.get(&index) {
            Some(view) if view.is_loaded() => view.content_height(),
            _ => self.settings.placeholder_row_height,
        }
    }

    /// Lazily materializes the row's page view on first request. Rows are
    /// never evicted proactively in list mode.
    pub fn view_for_row(&mut self, index: usize) -> Option<&mut dyn PageView> {
        if index >= self.page_count {
            return None;
        }
        if !self.loaded_views.contains_key(&index) {
            let view = self.delegate.create_page_view(index)?;
            self.loaded_views.insert(index, view);
        }
        Some(self.loaded_views.get_mut(&index)?.as_mut())
    }

    /// The central state transition: adopt `index` as current, enqueue the
    /// target plus its preload window, and drain the queue sequentially.
    fn set_current_index(&mut self, index: usize, location: Option<PageLocation>) {
        if !self.loaded_views.is_empty() && index == self.current_index {
            return;
        }

        // Without an explicit location, a backward single step opens the new
        // page at its end, mimicking "page turned back"; everything else
        // (first load, forward, jumps of two or more) opens at the start.
        let moving_backward = index + 1 == self.current_index;
        let location = location.unwrap_or(if moving_backward {
            PageLocation::End
        } else {
            PageLocation::Start
        });

        self.current_index = index;
        debug!("current index set to {index}");

        // Load the most-likely-visible views first: the current one, then the
        // next ones, then the previous ones.
        self.schedule_load_page(index, location);
        let last_index = self.schedule_load_pages(
            index,
            self.settings.preload_next_positions,
            StepDirection::Forward,
            PageLocation::Start,
        );
        let first_index = self.schedule_load_pages(
            index,
            self.settings.preload_previous_positions,
            StepDirection::Backward,
            PageLocation::End,
        );

        if self.mode == LayoutMode::HorizontalPaging {
            self.evict_outside(first_index, last_index);
        }

        self.drain_load_queue();
        self.relayout();
        self.delegate.views_did_update();
    }

    /// Queue pages from `from` stepping one index at a time until the
    /// position budget runs out or the spine edge is reached. Returns the
    /// last index queued (or `from` when none was).
    fn schedule_load_pages(
        &mut self,
        from: usize,
        position_budget: usize,
        direction: StepDirection,
        location: PageLocation,
    ) -> usize {
        let mut source = from;
        let mut budget = position_budget;
        loop {
            if budget == 0 {
                return source;
            }
            let Some(next) = direction.step(source) else {
                return source;
            };
            if !self.schedule_load_page(next, location) {
                return source;
            }
            budget = budget.saturating_sub(self.delegate.position_count(next));
            source = next;
        }
    }

    /// Queue one page load. Returns whether the page is or will be loaded.
    fn schedule_load_page(&mut self, index: usize, location: PageLocation) -> bool {
        if index >= self.page_count {
            return false;
        }
        self.load_queue.push(index, location);
        true
    }

    /// Pops requests one at a time; each view's seek completes before the
    /// next entry starts loading, so the visible page always settles first.
    fn drain_load_queue(&mut self) {
        while let Some(request) = self.load_queue.pop_front() {
            if !self.loaded_views.contains_key(&request.index) {
                match self.delegate.create_page_view(request.index) {
                    Some(view) => {
                        self.loaded_views.insert(request.index, view);
                    }
                    None => {
                        debug!("delegate declined page view {}, skipping", request.index);
                    }
                }
            }

            let Some(view) = self.loaded_views.get_mut(&request.index) else {
                continue;
            };
            if let Err(e) = view.go_to(&request.location) {
                warn!(
                    "page {} failed to reach {:?}: {e:#}",
                    request.index, request.location
                );
            }
        }
    }

    fn evict_outside(&mut self, first_index: usize, last_index: usize) {
        let stale: Vec<usize> = self
            .loaded_views
            .keys()
            .copied()
            .filter(|&index| index < first_index || index > last_index)
            .collect();

        for index in stale {
            if let Some(view) = self.loaded_views.get_mut(&index) {
                view.will_detach();
            }
            self.loaded_views.remove(&index);
            debug!("evicted page view {index}");
        }
    }

    fn fade_to_view(&mut self, index: usize, location: PageLocation, animated: bool) {
        let fade = animated && self.settings.animated_transitions;
        if fade {
            self.viewport.alpha = 0.0;
        }
        self.scroll_to_view(index, location);
        if fade {
            self.viewport.alpha = 1.0;
        }
    }

    fn scroll_to_view(&mut self, index: usize, location: PageLocation) {
        if self.current_index == index {
            match self.loaded_views.get_mut(&index) {
                Some(view) => {
                    if let Err(e) = view.go_to(&location) {
                        warn!("page {index} failed to reach {location:?}: {e:#}");
                    }
                }
                // Nothing resident yet for this index; nothing to position.
                None => debug!("no resident view for page {index}"),
            }
            return;
        }

        self.viewport.scroll_enabled = true;
        self.set_current_index(index, Some(location));
        self.reposition_to_current();
    }

    fn reposition_to_current(&mut self) {
        match self.mode {
            LayoutMode::HorizontalPaging => {
                self.viewport.content_offset.x = layout::x_offset_for_index(
                    self.current_index,
                    self.viewport.bounds.width,
                    self.page_count,
                    self.reading_progression,
                );
            }
            LayoutMode::VerticalScroll => {
                if let Some(y) =
                    layout::y_offset_for_index(&self.arranged_frames(), self.current_index)
                {
                    self.viewport.content_offset.y = y;
                }
            }
            LayoutMode::VirtualizedList => {}
        }
    }

    fn relayout(&mut self) {
        if self.loaded_views.is_empty() {
            self.viewport.content_size = self.viewport.bounds;
            return;
        }

        match self.mode {
            LayoutMode::HorizontalPaging => {
                self.viewport.content_size = Size::new(
                    self.viewport.bounds.width * self.page_count as f32,
                    self.viewport.bounds.height,
                );
                self.viewport.content_offset.x = layout::x_offset_for_index(
                    self.current_index,
                    self.viewport.bounds.width,
                    self.page_count,
                    self.reading_progression,
                );
            }
            LayoutMode::VerticalScroll => {
                let frames = self.arranged_frames();
                let height = frames.last().map_or(0.0, |f| f.frame.max_y());
                self.viewport.content_size = Size::new(self.viewport.bounds.width, height);
            }
            // Geometry belongs to the windowed list host
            LayoutMode::VirtualizedList => {}
        }
    }
}
