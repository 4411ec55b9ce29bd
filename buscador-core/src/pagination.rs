use crate::models::{Category, Criteria, SortKey};

/// One page of a result list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based, as requested
    pub page_number: usize,
    pub total_pages: usize,
}

/// Slice one page out of `items`.
///
/// `total_pages` is never below 1, even for an empty list. The page number
/// is not clamped: a page past the end, or page 0, yields no items.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);

    let slice = page_number
        .checked_sub(1)
        .and_then(|idx| idx.checked_mul(page_size))
        .filter(|start| *start < items.len())
        .map(|start| {
            let end = start.saturating_add(page_size).min(items.len());
            &items[start..end]
        })
        .unwrap_or(&[]);

    Page {
        items: slice,
        page_number,
        total_pages,
    }
}

/// Numbered page links to show around `current`, at most `max_visible`
/// wide, shifted so the window never runs past either end.
pub fn visible_pages(current: usize, total: usize, max_visible: usize) -> Vec<usize> {
    if total == 0 || max_visible == 0 {
        return Vec::new();
    }
    if total <= max_visible {
        return (1..=total).collect();
    }

    let current = current.clamp(1, total);
    let half = max_visible / 2;
    let start = current.saturating_sub(half).max(1).min(total - max_visible + 1);
    (start..start + max_visible).collect()
}

/// Everything that changes which listings a page shows
#[derive(Debug, Clone, PartialEq)]
pub struct ResultInputs {
    pub category: Category,
    pub sub_type: String,
    pub criteria: Criteria,
    pub sort: Option<SortKey>,
    pub query: String,
}

/// Current page number, reset to 1 whenever the result inputs change
#[derive(Debug, Clone)]
pub struct PageCursor {
    page: usize,
    last_inputs: Option<ResultInputs>,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            page: 1,
            last_inputs: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Record the inputs the next page is computed from. Returns true if
    /// they differ from the previous ones and the page was reset.
    pub fn observe(&mut self, inputs: &ResultInputs) -> bool {
        if self.last_inputs.as_ref() == Some(inputs) {
            return false;
        }
        let reset = self.last_inputs.is_some();
        if reset {
            self.page = 1;
        }
        self.last_inputs = Some(inputs.clone());
        reset
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}
