pub mod test_helpers {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    use anyhow::Result;

    use crate::location::PageLocation;
    use crate::page_view::PageView;
    use crate::pagination::PaginationDelegate;

    /// Shared record of everything the controller asked its collaborators,
    /// in call order.
    #[derive(Debug, Default)]
    pub struct Journal {
        /// Indices handed to the factory, in creation order
        pub created: Vec<usize>,
        /// Every page navigation, in the order the queue drained
        pub navigations: Vec<(usize, PageLocation)>,
        /// Indices whose views were detached
        pub detached: Vec<usize>,
        /// Number of views-did-update notifications
        pub updates: usize,
    }

    pub type SharedJournal = Rc<RefCell<Journal>>;

    /// Page view double: records navigations and reports a configurable
    /// content height once it has been navigated at least once.
    pub struct StubPageView {
        index: usize,
        content_height: f32,
        loaded: bool,
        fail_navigation: bool,
        journal: SharedJournal,
    }

    impl PageView for StubPageView {
        fn go_to(&mut self, location: &PageLocation) -> Result<()> {
            self.journal
                .borrow_mut()
                .navigations
                .push((self.index, *location));
            if self.fail_navigation {
                anyhow::bail!("simulated navigation failure on page {}", self.index);
            }
            self.loaded = true;
            Ok(())
        }

        fn content_height(&self) -> f32 {
            self.content_height
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn will_detach(&mut self) {
            self.journal.borrow_mut().detached.push(self.index);
        }
    }

    /// Delegate double with per-index knobs for position weights, content
    /// heights, and indices the factory should decline.
    pub struct StubDelegate {
        journal: SharedJournal,
        spine_items: usize,
        position_counts: HashMap<usize, usize>,
        content_heights: HashMap<usize, f32>,
        unavailable: HashSet<usize>,
        failing: HashSet<usize>,
    }

    impl StubDelegate {
        pub fn new(spine_items: usize) -> Self {
            Self {
                journal: Rc::new(RefCell::new(Journal::default())),
                spine_items,
                position_counts: HashMap::new(),
                content_heights: HashMap::new(),
                unavailable: HashSet::new(),
                failing: HashSet::new(),
            }
        }

        /// Position weight reported for `index` (default 1)
        pub fn with_position_count(mut self, index: usize, count: usize) -> Self {
            self.position_counts.insert(index, count);
            self
        }

        /// Content height reported by the view for `index` (default 100.0)
        pub fn with_content_height(mut self, index: usize, height: f32) -> Self {
            self.content_heights.insert(index, height);
            self
        }

        /// The factory declines to create a view for `index`
        pub fn with_unavailable(mut self, index: usize) -> Self {
            self.unavailable.insert(index);
            self
        }

        /// Navigations on the view for `index` return an error
        pub fn with_failing_navigation(mut self, index: usize) -> Self {
            self.failing.insert(index);
            self
        }

        pub fn journal(&self) -> SharedJournal {
            self.journal.clone()
        }
    }

    impl PaginationDelegate for StubDelegate {
        fn create_page_view(&mut self, index: usize) -> Option<Box<dyn PageView>> {
            if self.unavailable.contains(&index) {
                return None;
            }
            self.journal.borrow_mut().created.push(index);
            Some(Box::new(StubPageView {
                index,
                content_height: self.content_heights.get(&index).copied().unwrap_or(100.0),
                loaded: false,
                fail_navigation: self.failing.contains(&index),
                journal: self.journal.clone(),
            }))
        }

        fn position_count(&self, index: usize) -> usize {
            self.position_counts.get(&index).copied().unwrap_or(1)
        }

        fn views_did_update(&mut self) {
            self.journal.borrow_mut().updates += 1;
        }

        fn spine_item_count(&self) -> usize {
            self.spine_items
        }
    }
}
