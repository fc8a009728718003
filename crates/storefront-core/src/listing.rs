//! Searchable, paginated views over a collection fetched once
//!
//! A [`ListView`] owns the canonical collection of one dashboard page, a
//! free-text query and the current page. Filtering and slicing happen
//! locally on every change; the backend is only contacted through
//! [`ListView::load`].

use std::future::Future;

use crate::config::ListingConfig;

/// Record that can be shown in a list view
pub trait Listable {
    /// Stable identifier used for edits and deletes
    fn id(&self) -> &str;

    /// Name the query is matched against
    fn display_name(&self) -> &str;
}

/// One entry of a compact pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMarker {
    /// Link to a 1-based page
    Page(usize),
    /// Hidden run of pages
    Ellipsis,
}

/// Loading status of a list view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed with this message
    Failed(String),
}

/// Transient message for the user, shown once and then dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text to show
    pub message: String,
}

/// Query and page owned by a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Text matched against display names
    pub query: String,
    /// 1-based current page
    pub current_page: usize,
}

/// Current slice of the filtered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Rows per page
    pub page_size: usize,
    /// Pages in the filtered collection
    pub total_pages: usize,
    /// 1-based current page
    pub current_page: usize,
}

/// Tunables of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Rows per page, at least 1
    pub page_size: usize,
    /// Page markers around the current page
    pub max_visible_pages: usize,
    /// Whether a new query sends the view back to page 1
    pub reset_page_on_query: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::from(&ListingConfig::default())
    }
}

impl From<&ListingConfig> for ListOptions {
    fn from(config: &ListingConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_visible_pages: config.max_visible_pages,
            reset_page_on_query: config.reset_page_on_query,
        }
    }
}

/// Compute the page markers of a pagination control
///
/// All pages are listed when they fit in `max_visible`. Otherwise a window
/// of `max_visible` pages is centred on `current` and clamped to the valid
/// range; the first and last pages are always reachable and an ellipsis
/// stands in for any pages hidden between them and the window.
#[must_use]
pub fn page_numbers(current: usize, total: usize, max_visible: usize) -> Vec<PageMarker> {
    let max_visible = max_visible.max(1);

    if total <= max_visible {
        return (1..=total).map(PageMarker::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let mut end = start + max_visible - 1;

    if end > total {
        end = total;
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    let mut markers = Vec::with_capacity(max_visible + 4);

    if start > 1 {
        markers.push(PageMarker::Page(1));
        if start > 2 {
            markers.push(PageMarker::Ellipsis);
        }
    }

    markers.extend((start..=end).map(PageMarker::Page));

    if end < total {
        if end + 1 < total {
            markers.push(PageMarker::Ellipsis);
        }
        markers.push(PageMarker::Page(total));
    }

    markers
}

/// Case-insensitive substring match; an empty query matches everything
#[must_use]
pub fn matches_query(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// Filter-and-paginate controller over one collection
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    query: String,
    current_page: usize,
    options: ListOptions,
    state: LoadState,
}

impl<T: Listable> Default for ListView<T> {
    fn default() -> Self {
        Self::new(ListOptions::default())
    }
}

impl<T: Listable> ListView<T> {
    /// Create an empty view
    #[must_use]
    pub fn new(options: ListOptions) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            current_page: 1,
            options: ListOptions {
                page_size: options.page_size.max(1),
                ..options
            },
            state: LoadState::Idle,
        }
    }

    /// Create a view over an already fetched collection
    #[must_use]
    pub fn with_items(options: ListOptions, items: Vec<T>) -> Self {
        let mut view = Self::new(options);
        view.items = items;
        view.state = LoadState::Loaded;
        view
    }

    /// Fetch the collection once and make it canonical
    ///
    /// The view is marked loading until the fetch resolves. On failure the
    /// previous collection is kept (empty on a first load) and a notice is
    /// returned for the caller to show; nothing is retried.
    pub async fn load<F, Fut>(&mut self, fetcher: F) -> Option<Notice>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::Result<Vec<T>>>,
    {
        self.begin_load();
        let result = fetcher().await;
        self.finish_load(result)
    }

    /// Mark the view as loading
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Store the outcome of a fetch started with [`ListView::begin_load`]
    pub fn finish_load(&mut self, result: crate::Result<Vec<T>>) -> Option<Notice> {
        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "List view loaded");
                self.items = items;
                self.state = LoadState::Loaded;
                self.clamp_page();
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load list view");
                let message = err.to_string();
                self.state = LoadState::Failed(message.clone());
                Some(Notice { message })
            }
        }
    }

    /// Replace the query; matching happens at render time
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        if self.options.reset_page_on_query {
            self.current_page = 1;
        }
        self.clamp_page();
    }

    /// Move to page `n`, clamped into `[1, max(1, total_pages)]`
    pub fn set_page(&mut self, n: i64) -> usize {
        let last = self.total_pages().max(1);
        self.current_page = usize::try_from(n).map_or(1, |page| page.clamp(1, last));
        self.current_page
    }

    /// Move one page forward, stopping at the last page
    pub fn next_page(&mut self) -> usize {
        let last = self.total_pages().max(1);
        self.current_page = (self.current_page + 1).min(last);
        self.current_page
    }

    /// Move one page back, stopping at the first page
    pub fn prev_page(&mut self) -> usize {
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.current_page
    }

    /// Items whose display name matches the query
    #[must_use]
    pub fn filtered(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| matches_query(item.display_name(), &self.query))
            .collect()
    }

    /// Number of items matching the query
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches_query(item.display_name(), &self.query))
            .count()
    }

    /// `ceil(filtered_count / page_size)`
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.options.page_size)
    }

    /// Rows of the current page
    #[must_use]
    pub fn displayed(&self) -> Vec<&T> {
        let skip = (self.current_page - 1) * self.options.page_size;
        self.items
            .iter()
            .filter(|item| matches_query(item.display_name(), &self.query))
            .skip(skip)
            .take(self.options.page_size)
            .collect()
    }

    /// Page markers using the configured window size
    #[must_use]
    pub fn page_markers(&self) -> Vec<PageMarker> {
        self.page_markers_with(self.options.max_visible_pages)
    }

    /// Page markers for an explicit window size, e.g. on narrow displays
    #[must_use]
    pub fn page_markers_with(&self, max_visible: usize) -> Vec<PageMarker> {
        page_numbers(self.current_page, self.total_pages(), max_visible)
    }

    /// Apply an in-place edit to the item with `id`
    ///
    /// Returns `false` when no item has that identifier.
    pub fn update<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                edit(item);
                self.clamp_page();
                true
            }
            None => false,
        }
    }

    /// Remove the item with `id` from the local collection
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let removed = self.items.remove(index);
        self.clamp_page();
        Some(removed)
    }

    /// Find an item by identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// The whole canonical collection
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// 1-based current page
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Loading status
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Options the view was created with
    #[must_use]
    pub const fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Snapshot of query and page
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            query: self.query.clone(),
            current_page: self.current_page,
        }
    }

    /// Snapshot of the page window
    #[must_use]
    pub fn window(&self) -> PageWindow {
        PageWindow {
            page_size: self.options.page_size,
            total_pages: self.total_pages(),
            current_page: self.current_page,
        }
    }

    fn clamp_page(&mut self) {
        let last = self.total_pages().max(1);
        self.current_page = self.current_page.clamp(1, last);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        name: String,
    }

    impl Listable for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> &str {
            &self.name
        }
    }

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item {
                id: i.to_string(),
                name: format!("Item {i}"),
            })
            .collect()
    }

    fn options(page_size: usize, max_visible_pages: usize) -> ListOptions {
        ListOptions {
            page_size,
            max_visible_pages,
            reset_page_on_query: true,
        }
    }

    fn ids(rows: &[&Item]) -> Vec<String> {
        rows.iter().map(|item| item.id.clone()).collect()
    }

    use PageMarker::{Ellipsis, Page};

    #[rstest]
    #[case(1, 1, 5, vec![Page(1)])]
    #[case(2, 3, 5, vec![Page(1), Page(2), Page(3)])]
    #[case(1, 10, 5, vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)])]
    #[case(7, 10, 5, vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Page(8), Page(9), Page(10)])]
    #[case(5, 42, 3, vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(42)])]
    #[case(10, 10, 5, vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)])]
    #[case(3, 10, 5, vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)])]
    #[case(4, 10, 5, vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(10)])]
    #[case(1, 0, 5, vec![])]
    fn test_page_numbers(
        #[case] current: usize,
        #[case] total: usize,
        #[case] max_visible: usize,
        #[case] expected: Vec<PageMarker>,
    ) {
        assert_eq!(page_numbers(current, total, max_visible), expected);
    }

    #[test]
    fn test_page_numbers_compact_window() {
        assert_eq!(
            page_numbers(5, 10, 2),
            vec![Page(1), Ellipsis, Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_page_numbers_zero_window_behaves_like_one() {
        assert_eq!(page_numbers(5, 10, 0), vec![Page(1), Ellipsis, Page(5), Ellipsis, Page(10)]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let view = ListView::with_items(
            options(10, 5),
            vec![
                Item {
                    id: "1".to_string(),
                    name: "Taskane Marina".to_string(),
                },
                Item {
                    id: "2".to_string(),
                    name: "Nivea Roll On".to_string(),
                },
            ],
        );
        let mut view = view;
        view.set_query("mar");

        assert_eq!(ids(&view.filtered()), vec!["1"]);

        view.set_query("NIVEA");
        assert_eq!(ids(&view.filtered()), vec!["2"]);

        view.set_query("");
        assert_eq!(view.filtered_count(), 2);
    }

    #[test]
    fn test_scenario_twenty_three_items_second_page() {
        let all = items(23);
        let mut view = ListView::with_items(options(10, 5), all.clone());
        view.set_page(2);

        let expected: Vec<String> = all[10..20].iter().map(|item| item.id.clone()).collect();
        assert_eq!(ids(&view.displayed()), expected);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.page_markers(), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn test_scenario_hundred_items_seventh_page() {
        let mut view = ListView::with_items(options(10, 5), items(100));
        view.set_page(7);

        assert_eq!(view.total_pages(), 10);
        assert_eq!(
            view.page_markers(),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            view.window(),
            PageWindow {
                page_size: 10,
                total_pages: 10,
                current_page: 7
            }
        );
    }

    #[test]
    fn test_last_page_is_partial() {
        let mut view = ListView::with_items(options(10, 5), items(23));
        view.set_page(3);
        assert_eq!(ids(&view.displayed()), vec!["20", "21", "22"]);
    }

    #[rstest]
    #[case(-5, 1)]
    #[case(0, 1)]
    #[case(2, 2)]
    #[case(9999, 3)]
    fn test_set_page_clamps(#[case] requested: i64, #[case] expected: usize) {
        let mut view = ListView::with_items(options(10, 5), items(23));
        assert_eq!(view.set_page(requested), expected);
        assert_eq!(view.current_page(), expected);
    }

    #[test]
    fn test_set_page_on_empty_collection_stays_on_first_page() {
        let mut view: ListView<Item> = ListView::new(options(10, 5));
        assert_eq!(view.set_page(4), 1);
        assert!(view.displayed().is_empty());
        assert_eq!(view.total_pages(), 0);
        assert!(view.page_markers().is_empty());
    }

    #[test]
    fn test_query_change_resets_page_by_default() {
        let mut view = ListView::with_items(options(10, 5), items(100));
        view.set_page(6);
        view.set_query("Item");
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_query_change_keeps_page_when_reset_disabled() {
        let mut view = ListView::with_items(
            ListOptions {
                reset_page_on_query: false,
                ..options(10, 5)
            },
            items(100),
        );
        view.set_page(6);
        view.set_query("Item");
        assert_eq!(view.current_page(), 6);

        // narrowing below the current page still clamps
        view.set_query("Item 9");
        assert_eq!(view.filtered_count(), 11);
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_next_and_prev_stop_at_bounds() {
        let mut view = ListView::with_items(options(10, 5), items(23));
        assert_eq!(view.prev_page(), 1);
        assert_eq!(view.next_page(), 2);
        assert_eq!(view.next_page(), 3);
        assert_eq!(view.next_page(), 3);
    }

    #[tokio::test]
    async fn test_load_twice_is_idempotent() {
        let mut view: ListView<Item> = ListView::new(options(10, 5));

        assert!(view.load(|| async { Ok(items(23)) }).await.is_none());
        view.set_page(2);
        let first = ids(&view.displayed());

        assert!(view.load(|| async { Ok(items(23)) }).await.is_none());
        assert_eq!(ids(&view.displayed()), first);
        assert_eq!(view.state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_failed_first_load_leaves_view_empty() {
        let mut view: ListView<Item> = ListView::new(options(10, 5));

        let notice = view
            .load(|| async { Err(crate::Error::Network("connection refused".to_string())) })
            .await
            .unwrap();

        assert!(notice.message.contains("connection refused"));
        assert!(view.items().is_empty());
        assert!(matches!(view.state(), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_rows() {
        let mut view = ListView::with_items(options(10, 5), items(5));

        let notice = view
            .load(|| async {
                Err(crate::Error::Backend {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert!(notice.is_some());
        assert_eq!(view.items().len(), 5);
    }

    #[test]
    fn test_begin_load_marks_loading() {
        let mut view: ListView<Item> = ListView::new(options(10, 5));
        view.begin_load();
        assert!(view.is_loading());
        view.finish_load(Ok(items(3)));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_shrinking_reload_clamps_page() {
        let mut view = ListView::with_items(options(10, 5), items(100));
        view.set_page(10);
        view.finish_load(Ok(items(15)));
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_update_and_remove_mutate_local_state() {
        let mut view = ListView::with_items(options(10, 5), items(11));
        view.set_page(2);

        assert!(view.update("3", |item| item.name = "Renamed".to_string()));
        assert_eq!(view.get("3").unwrap().name, "Renamed");
        assert!(!view.update("missing", |_| {}));

        let removed = view.remove("10").unwrap();
        assert_eq!(removed.id, "10");
        // the second page emptied out, so the view falls back to the first
        assert_eq!(view.current_page(), 1);
        assert!(view.remove("10").is_none());
    }

    #[test]
    fn test_filter_state_snapshot() {
        let mut view = ListView::with_items(options(10, 5), items(30));
        view.set_query("item");
        view.set_page(3);
        assert_eq!(
            view.filter_state(),
            FilterState {
                query: "item".to_string(),
                current_page: 3
            }
        );
    }

    #[test]
    fn test_zero_page_size_is_raised_to_one() {
        let view = ListView::with_items(options(0, 5), items(3));
        assert_eq!(view.options().page_size, 1);
        assert_eq!(view.total_pages(), 3);
    }

    proptest! {
        #[test]
        fn prop_small_totals_list_every_page(total in 0usize..20, extra in 0usize..5, current in 0usize..25) {
            let max_visible = total + extra;
            let expected: Vec<PageMarker> = (1..=total).map(Page).collect();
            prop_assert_eq!(page_numbers(current, total, max_visible), expected);
        }

        #[test]
        fn prop_markers_are_ordered_and_bounded(current in 1usize..200, total in 1usize..200, max_visible in 1usize..12) {
            let markers = page_numbers(current, total, max_visible);
            let pages: Vec<usize> = markers
                .iter()
                .filter_map(|m| match m { Page(p) => Some(*p), Ellipsis => None })
                .collect();

            prop_assert_eq!(pages.first().copied(), Some(1));
            prop_assert_eq!(pages.last().copied(), Some(total));
            prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(pages.contains(&current.min(total)));
            // an ellipsis only ever replaces at least one hidden page
            for (i, marker) in markers.iter().enumerate() {
                if *marker == Ellipsis {
                    let (Page(before), Page(after)) = (markers[i - 1], markers[i + 1]) else {
                        return Err(TestCaseError::fail("ellipsis not between pages"));
                    };
                    prop_assert!(after > before + 1);
                }
            }
        }

        #[test]
        fn prop_set_page_always_lands_in_range(count in 0usize..120, page_size in 1usize..15, requested in -50i64..200) {
            let mut view = ListView::with_items(options(page_size, 5), items(count));
            let page = view.set_page(requested);
            prop_assert!(page >= 1);
            prop_assert!(page <= view.total_pages().max(1));
            prop_assert!(view.displayed().len() <= page_size);
        }
    }
}
