//! Application state and logic
//!
//! Holds only UI-ephemeral state. Records, loading and error flags come
//! from the store and are passed in on every draw.

use std::time::{Duration, Instant};

use arsip_core::view::{filter_records, paginate};
use arsip_core::{ArchiveId, ArchiveRecord, ListView, Page};

/// How long a notification stays visible
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Search input (after pressing /)
    Search,
    /// Waiting for y/n on a delete
    ConfirmDelete,
}

/// Kind of transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// Transient notification shown in the status bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
}

/// Unsaved form content kept after a failed save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Record being edited, `None` for a new record
    pub target: Option<ArchiveId>,
    pub content: String,
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Search text and current page
    pub view: ListView,
    /// Selected row on the current page
    pub selected: usize,
    /// Search input buffer
    pub search_input: String,
    /// Cursor position in search input (in characters)
    pub search_cursor: usize,
    /// Record awaiting delete confirmation
    pub pending_delete: Option<ArchiveRecord>,
    /// Form content from the last failed save
    pub draft: Option<Draft>,
    /// Current notification
    pub notification: Option<Notification>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    pub fn new(page_size: usize) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            view: ListView::new(page_size),
            selected: 0,
            search_input: String::new(),
            search_cursor: 0,
            pending_delete: None,
            draft: None,
            notification: None,
            show_help: false,
        }
    }

    /// The page currently on screen
    pub fn page<'a>(&self, records: &'a [ArchiveRecord]) -> Page<'a> {
        paginate(
            filter_records(records, self.view.search()),
            self.view.current_page(),
            self.view.per_page(),
        )
    }

    /// Re-clamp page and selection after the record list changed
    pub fn sync(&mut self, records: &[ArchiveRecord]) {
        let len = self.view.page(records).items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// The selected record, if any
    pub fn selected_record<'a>(&self, records: &'a [ArchiveRecord]) -> Option<&'a ArchiveRecord> {
        self.page(records).items.get(self.selected).copied()
    }

    // ==================== Notifications ====================

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notify(NotificationKind::Success, message.into());
    }

    pub fn notify_failure(&mut self, message: impl Into<String>) {
        self.notify(NotificationKind::Failure, message.into());
    }

    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.notification = Some(Notification {
            kind,
            message,
            shown_at: Instant::now(),
        });
    }

    /// Check and clear expired notification
    pub fn check_notification_timeout(&mut self) {
        if let Some(notification) = &self.notification {
            if notification.shown_at.elapsed() > NOTIFICATION_TIMEOUT {
                self.notification = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Navigation ====================

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, records: &[ArchiveRecord]) {
        let len = self.page(records).items.len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_last(&mut self, records: &[ArchiveRecord]) {
        self.selected = self.page(records).items.len().saturating_sub(1);
    }

    pub fn next_page(&mut self, records: &[ArchiveRecord]) {
        if self.view.next_page(records) {
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self, records: &[ArchiveRecord]) {
        if self.view.prev_page(records) {
            self.selected = 0;
        }
    }

    // ==================== Search ====================

    /// Enter search mode, starting from the current search text
    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input = self.view.search().to_string();
        self.search_cursor = self.search_input.chars().count();
    }

    /// Keep the filtered view and return to normal mode
    pub fn confirm_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Clear the search and return to normal mode
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_input.clear();
        self.search_cursor = 0;
        self.apply_search();
    }

    /// Apply search input as the user types
    fn apply_search(&mut self) {
        self.view.set_search(self.search_input.clone());
        self.selected = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_index(self.search_cursor);
        self.search_input.insert(byte_pos, c);
        self.search_cursor += 1;
        self.apply_search();
    }

    pub fn delete_char(&mut self) {
        if self.search_cursor == 0 {
            return;
        }
        self.search_cursor -= 1;
        let byte_pos = self.byte_index(self.search_cursor);
        self.search_input.remove(byte_pos);
        self.apply_search();
    }

    pub fn cursor_left(&mut self) {
        self.search_cursor = self.search_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.search_cursor < self.search_input.chars().count() {
            self.search_cursor += 1;
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.search_input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.search_input.len())
    }

    // ==================== Delete ====================

    /// Ask for confirmation before deleting the selected record
    pub fn request_delete(&mut self, records: &[ArchiveRecord]) -> bool {
        match self.selected_record(records) {
            Some(record) => {
                self.pending_delete = Some(record.clone());
                self.input_mode = InputMode::ConfirmDelete;
                true
            }
            None => false,
        }
    }

    /// Leave confirmation mode, returning the record to delete (if any)
    pub fn take_pending_delete(&mut self) -> Option<ArchiveRecord> {
        self.input_mode = InputMode::Normal;
        self.pending_delete.take()
    }

    /// Reopen the confirmation for a record whose delete failed
    pub fn restore_pending_delete(&mut self, record: ArchiveRecord) {
        self.pending_delete = Some(record);
        self.input_mode = InputMode::ConfirmDelete;
    }

    // ==================== Drafts ====================

    /// Take the saved draft if it belongs to the given target
    pub fn take_draft(&mut self, target: Option<ArchiveId>) -> Option<String> {
        match &self.draft {
            Some(draft) if draft.target == target => self.draft.take().map(|d| d.content),
            _ => None,
        }
    }

    pub fn keep_draft(&mut self, target: Option<ArchiveId>, content: String) {
        self.draft = Some(Draft { target, content });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arsip_core::ArchiveInput;

    fn records(n: u64) -> Vec<ArchiveRecord> {
        (1..=n)
            .map(|i| {
                ArchiveInput::new(format!("Surat {}", i), "2024-01-01".parse().unwrap())
                    .into_record(ArchiveId::new(i))
            })
            .collect()
    }

    #[test]
    fn test_selection_stays_on_page() {
        let records = records(5);
        let mut app = App::new(3);

        app.move_down(&records);
        app.move_down(&records);
        app.move_down(&records);
        assert_eq!(app.selected, 2);

        app.next_page(&records);
        assert_eq!(app.selected, 0);
        app.move_to_last(&records);
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_record(&records).unwrap().id, ArchiveId::new(5));
    }

    #[test]
    fn test_search_input_filters_and_resets_page() {
        let records = records(5);
        let mut app = App::new(3);
        app.next_page(&records);

        app.enter_search_mode();
        for c in "surat 4".chars() {
            app.insert_char(c);
        }

        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(app.view.current_page(), 1);
        let page = app.page(&records);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, ArchiveId::new(4));

        app.cancel_search();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.page(&records).total_matches, 5);
    }

    #[test]
    fn test_search_editing_handles_multibyte() {
        let mut app = App::new(3);
        app.enter_search_mode();
        app.insert_char('é');
        app.insert_char('t');
        app.cursor_left();
        app.delete_char();

        assert_eq!(app.search_input, "t");
        assert_eq!(app.search_cursor, 0);
    }

    #[test]
    fn test_sync_clamps_selection_after_shrink() {
        let mut list = records(3);
        let mut app = App::new(3);
        app.move_to_last(&list);
        assert_eq!(app.selected, 2);

        list.pop();
        app.sync(&list);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_delete_confirmation_flow() {
        let records = records(2);
        let mut app = App::new(3);
        app.move_down(&records);

        assert!(app.request_delete(&records));
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);

        let record = app.take_pending_delete().unwrap();
        assert_eq!(record.id, ArchiveId::new(2));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.take_pending_delete().is_none());

        assert!(!app.request_delete(&[]));
    }

    #[test]
    fn test_failed_delete_reopens_confirmation() {
        let records = records(2);
        let mut app = App::new(3);
        app.request_delete(&records);

        let record = app.take_pending_delete().unwrap();
        app.restore_pending_delete(record);

        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert_eq!(app.pending_delete.as_ref().unwrap().id, ArchiveId::new(1));
    }

    #[test]
    fn test_draft_only_returned_for_same_target() {
        let mut app = App::new(3);
        app.keep_draft(Some(ArchiveId::new(1)), "nama: X".to_string());

        assert!(app.take_draft(None).is_none());
        assert_eq!(app.take_draft(Some(ArchiveId::new(1))), Some("nama: X".to_string()));
        assert!(app.draft.is_none());
    }

    #[test]
    fn test_notification_kinds() {
        let mut app = App::new(3);
        app.notify_failure("Failed to delete arsip");
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Failure);

        app.notify_success("Arsip deleted");
        app.check_notification_timeout();
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Success);
    }
}
