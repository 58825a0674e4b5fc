//! Client-side search and pagination
//!
//! The backend returns the full collection; searching and paging happen
//! locally over the store's record list. `ListView` holds the ephemeral
//! view state (search text, current page) that belongs to the UI and never
//! flows back into the store.

use crate::models::ArchiveRecord;

/// One page of filtered records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// 1-based page number
    pub number: usize,
    /// Total number of pages (0 when nothing matches)
    pub total_pages: usize,
    /// Number of records matching the search
    pub total_matches: usize,
    /// Index of the first item within the filtered list
    pub offset: usize,
    /// Records on this page
    pub items: Vec<&'a ArchiveRecord>,
}

impl<'a> Page<'a> {
    /// 1-based row number for an item index on this page
    pub fn row_number(&self, index: usize) -> usize {
        self.offset + index + 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Records matching a case-insensitive search over `nama` and `deskripsi`
pub fn filter_records<'a>(records: &'a [ArchiveRecord], search: &str) -> Vec<&'a ArchiveRecord> {
    records.iter().filter(|r| r.matches(search)).collect()
}

/// Number of pages needed for `len` items
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

/// Slice a page out of already-filtered records
///
/// Out-of-range page numbers are clamped into `1..=total_pages`.
pub fn paginate<'a>(filtered: Vec<&'a ArchiveRecord>, page: usize, per_page: usize) -> Page<'a> {
    let per_page = per_page.max(1);
    let total_matches = filtered.len();
    let total = total_pages(total_matches, per_page);
    let number = page.clamp(1, total.max(1));
    let offset = (number - 1) * per_page;

    let items = filtered.into_iter().skip(offset).take(per_page).collect();

    Page {
        number,
        total_pages: total,
        total_matches,
        offset,
        items,
    }
}

/// Search text and current page for a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    search: String,
    page: usize,
    per_page: usize,
}

impl ListView {
    pub fn new(per_page: usize) -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Replace the search text; always returns to the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Jump to a page; ignored unless it lies within `1..=total_pages`
    pub fn go_to(&mut self, page: usize, records: &[ArchiveRecord]) -> bool {
        let total = total_pages(filter_records(records, &self.search).len(), self.per_page);
        if page >= 1 && page <= total {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self, records: &[ArchiveRecord]) -> bool {
        self.go_to(self.page + 1, records)
    }

    pub fn prev_page(&mut self, records: &[ArchiveRecord]) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to(page, records),
            None => false,
        }
    }

    /// The current page over the given records
    ///
    /// If the list shrank (e.g. after a delete), the stored page number is
    /// pulled back to the last available page.
    pub fn page<'a>(&mut self, records: &'a [ArchiveRecord]) -> Page<'a> {
        let page = paginate(filter_records(records, &self.search), self.page, self.per_page);
        self.page = page.number;
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArchiveId, ArchiveInput};

    fn records(n: u64) -> Vec<ArchiveRecord> {
        (1..=n)
            .map(|i| {
                ArchiveInput::new(format!("Surat {}", i), "2024-01-01".parse().unwrap())
                    .with_deskripsi(if i % 2 == 0 { "rapat" } else { "laporan" })
                    .into_record(ArchiveId::new(i))
            })
            .collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 3), 0);
        assert_eq!(total_pages(3, 3), 1);
        assert_eq!(total_pages(4, 3), 2);
        assert_eq!(total_pages(7, 3), 3);
    }

    #[test]
    fn test_filter_matches_nama_or_deskripsi() {
        let records = records(5);
        assert_eq!(filter_records(&records, "RAPAT").len(), 2);
        assert_eq!(filter_records(&records, "surat 3").len(), 1);
        assert_eq!(filter_records(&records, "").len(), 5);
    }

    #[test]
    fn test_paginate_slices_and_numbers_rows() {
        let records = records(7);
        let page = paginate(filter_records(&records, ""), 2, 3);

        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_matches, 7);
        let ids: Vec<u64> = page.items.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(page.row_number(0), 4);
        assert!(page.has_prev());
        assert!(page.has_next());
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let records = records(4);
        let page = paginate(filter_records(&records, ""), 10, 3);
        assert_eq!(page.number, 2);
        assert_eq!(page.items.len(), 1);

        let empty: Vec<ArchiveRecord> = Vec::new();
        let page = paginate(filter_records(&empty, ""), 3, 3);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_search_resets_page() {
        let records = records(7);
        let mut view = ListView::new(3);
        assert!(view.next_page(&records));
        assert_eq!(view.current_page(), 2);

        view.set_search("rapat");
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.page(&records).total_matches, 3);
    }

    #[test]
    fn test_page_change_outside_range_is_ignored() {
        let records = records(4);
        let mut view = ListView::new(3);

        assert!(!view.prev_page(&records));
        assert_eq!(view.current_page(), 1);

        assert!(view.next_page(&records));
        assert!(!view.next_page(&records));
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_page_pulled_back_when_list_shrinks() {
        let mut list = records(4);
        let mut view = ListView::new(3);
        view.next_page(&list);

        list.truncate(3);
        let page = view.page(&list);
        assert_eq!(page.number, 1);
        assert_eq!(view.current_page(), 1);
    }
}
