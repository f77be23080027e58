use super::app_state::{AppEvent, AppMode};
use crate::api::ResourceClient;
use crate::view::deletion::remote_delete;
use crate::view::presentation::{CREATE_DEPARTMENT_ROUTE, DATA_COLUMNS};
use crate::view::store::fetch_departments;
use crate::view::{
    DeleteAction, DepartmentView, PageTicket, RenderState, TableRow, TableSort, ViewMode,
};
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub(super) const GRID_COLUMNS: usize = 3;

pub struct TuiApp {
    pub(super) view: DepartmentView,
    pub(super) quit: bool,
    pub(super) mode: AppMode,
    pub(super) filter_input: String,
    pub(super) filter_cursor_pos: usize,
    /// Position in the visible collection (grid) or in the sorted rows (list)
    pub(super) current_selection_idx: usize,
    pub(super) scroll_offset: usize,
    pub(super) list_viewport_height: usize,
    pub(super) table_sort: Option<TableSort>,
    /// "Departments (N)" header, refreshed by the list-changed listener
    pub(super) summary_count: usize,
    pub(super) status: Option<String>,
    pub(super) tick: usize,
    summary_stale: Arc<AtomicBool>,
    client: Arc<dyn ResourceClient>,
    events: UnboundedSender<AppEvent>,
    page_delay: Duration,
    /// Delay task for the page currently waiting, with the ticket it will post
    page_task: Option<(PageTicket, JoinHandle<()>)>,
}

impl TuiApp {
    pub(super) fn new(
        mut view: DepartmentView,
        client: Arc<dyn ResourceClient>,
        events: UnboundedSender<AppEvent>,
        page_delay: Duration,
    ) -> Self {
        let summary_stale = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&summary_stale);
        view.on_list_changed(move || flag.store(true, Ordering::SeqCst));
        let filter_input = view.query().to_string();

        TuiApp {
            view,
            quit: false,
            mode: AppMode::Normal,
            filter_cursor_pos: filter_input.chars().count(),
            filter_input,
            current_selection_idx: 0,
            scroll_offset: 0,
            list_viewport_height: 0, // Will be updated by ui_renderer
            table_sort: None,
            summary_count: 0,
            status: None,
            tick: 0,
            summary_stale,
            client,
            events,
            page_delay,
            page_task: None,
        }
    }

    // --- Async work ---

    pub(super) fn start_load(&mut self) {
        self.cancel_page_task();
        let generation = self.view.begin_load();
        self.current_selection_idx = 0;
        self.scroll_offset = 0;
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = fetch_departments(client.as_ref()).await;
            let _ = events.send(AppEvent::Loaded {
                generation,
                outcome,
            });
        });
    }

    fn start_delete(&mut self) {
        let Some(ticket) = self.view.confirm_delete() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = remote_delete(client.as_ref(), &ticket.target).await;
            let _ = events.send(AppEvent::Deleted { ticket, outcome });
        });
    }

    fn schedule_page(&mut self, ticket: PageTicket) {
        let delay = self.page_delay;
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(AppEvent::PageReady(ticket));
        });
        self.page_task = Some((ticket, task));
    }

    fn cancel_page_task(&mut self) {
        if let Some((_, task)) = self.page_task.take() {
            task.abort();
        }
    }

    pub(super) fn page_pending(&self) -> bool {
        self.page_task.is_some()
    }

    pub(super) fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded {
                generation,
                outcome,
            } => {
                if self.view.apply_load(generation, outcome) {
                    self.summary_count = self.view.full().len();
                    self.clamp_selection();
                }
            }
            AppEvent::Deleted { ticket, outcome } => {
                if self.view.finish_delete(&ticket, outcome) {
                    self.clamp_selection();
                }
            }
            AppEvent::PageReady(ticket) => {
                // A page queued before a reset must not release the newer task.
                if self.page_task.as_ref().is_some_and(|(pending, _)| *pending == ticket) {
                    self.page_task = None;
                }
                self.view.complete_page(ticket);
            }
        }
        if self.summary_stale.swap(false, Ordering::SeqCst) {
            self.summary_count = self.view.full().len();
        }
    }

    // --- Selection ---

    pub(super) fn item_count(&self) -> usize {
        self.view.visible().len()
    }

    fn clamp_selection(&mut self) {
        let count = self.item_count();
        if count == 0 {
            self.current_selection_idx = 0;
            self.scroll_offset = 0;
        } else if self.current_selection_idx >= count {
            self.current_selection_idx = count - 1;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let target = self.current_selection_idx as isize + delta;
        self.current_selection_idx = target.clamp(0, count as isize - 1) as usize;
        self.maybe_request_more();
    }

    fn row_step(&self) -> isize {
        match self.view.mode() {
            ViewMode::Grid => GRID_COLUMNS as isize,
            ViewMode::List => 1,
        }
    }

    fn page_step(&self) -> isize {
        self.row_step() * self.list_viewport_height.max(1) as isize
    }

    /// Grid equivalent of the scroll threshold: selection reached the last card row.
    fn maybe_request_more(&mut self) {
        if self.view.mode() != ViewMode::Grid || self.page_pending() || !self.view.has_more() {
            return;
        }
        if self.current_selection_idx + GRID_COLUMNS < self.item_count() {
            return;
        }
        if let Some(ticket) = self.view.request_more() {
            self.schedule_page(ticket);
        }
    }

    /// Delete binding of the selected card or row.
    pub(super) fn selected_action(&self) -> Option<DeleteAction> {
        match self.view.mode() {
            ViewMode::Grid => self
                .view
                .cards()
                .into_iter()
                .nth(self.current_selection_idx)
                .and_then(|card| card.delete),
            ViewMode::List => self.selected_row().and_then(|row| row.delete),
        }
    }

    fn selected_row(&self) -> Option<TableRow> {
        self.view
            .rows(self.table_sort)
            .into_iter()
            .nth(self.current_selection_idx)
    }

    /// Table rows link to the department's edit page.
    fn open_selected_row(&mut self) {
        if self.view.mode() != ViewMode::List {
            return;
        }
        if let Some(row) = self.selected_row() {
            self.status = Some(format!("Department {}: {}", row.id, row.link));
        }
    }

    fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view.mode() != mode {
            self.view.switch_view(mode);
            self.current_selection_idx = 0;
            self.scroll_offset = 0;
        }
    }

    fn sort_by_column(&mut self, column: usize) {
        if self.view.mode() == ViewMode::List && column < DATA_COLUMNS {
            self.table_sort = Some(TableSort::toggle(self.table_sort, column));
        }
    }

    fn query_changed(&mut self) {
        self.cancel_page_task();
        self.view.set_query(self.filter_input.clone());
        self.current_selection_idx = 0;
        self.scroll_offset = 0;
    }

    // --- Event handling sub-methods ---

    pub(super) fn handle_confirm_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('y') | KeyCode::Enter => self.start_delete(),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.view.cancel_delete();
            }
            _ => {}
        }
    }

    pub(super) fn handle_normal_mode_input(&mut self, key_event: KeyEvent) {
        self.status = None;
        match key_event.code {
            KeyCode::Char('/') => {
                self.mode = AppMode::Filtering;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('g') => self.set_view_mode(ViewMode::Grid),
            KeyCode::Char('l') => self.set_view_mode(ViewMode::List),
            KeyCode::Tab => {
                self.view.toggle_view();
                self.current_selection_idx = 0;
                self.scroll_offset = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(self.row_step()),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-self.row_step()),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Left => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(self.page_step()),
            KeyCode::PageUp => self.move_selection(-self.page_step()),
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.view.render_state() == RenderState::Content {
                    match self.selected_action() {
                        Some(action) => {
                            self.view.request_delete(&action);
                        }
                        None if !self.view.can_delete() => {
                            self.status = Some("Only ADMIN can delete departments".to_string());
                        }
                        None => {}
                    }
                }
            }
            KeyCode::Char('r') => self.start_load(),
            KeyCode::Enter => self.open_selected_row(),
            KeyCode::Char('c') => {
                self.status = Some(format!("Create department: {CREATE_DEPARTMENT_ROUTE}"));
            }
            KeyCode::Char(c @ '1'..='7') => {
                let column = c as usize - '1' as usize;
                self.sort_by_column(column);
            }
            _ => {}
        }
    }

    pub(super) fn handle_filtering_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.filter_input.clear();
                self.filter_cursor_pos = 0;
                self.query_changed();
            }
            KeyCode::Char(c) => {
                self.filter_input.insert(self.byte_offset(), c);
                self.filter_cursor_pos += 1;
                self.query_changed();
            }
            KeyCode::Backspace => {
                if self.filter_cursor_pos > 0 && !self.filter_input.is_empty() {
                    self.filter_cursor_pos -= 1;
                    let offset = self.byte_offset();
                    self.filter_input.remove(offset);
                    self.query_changed();
                }
            }
            KeyCode::Left => {
                if self.filter_cursor_pos > 0 {
                    self.filter_cursor_pos -= 1;
                }
            }
            KeyCode::Right => {
                if self.filter_cursor_pos < self.filter_input.chars().count() {
                    self.filter_cursor_pos += 1;
                }
            }
            _ => {}
        }
    }

    /// Cursor is counted in chars; `String::insert` wants bytes.
    fn byte_offset(&self) -> usize {
        self.filter_input
            .char_indices()
            .nth(self.filter_cursor_pos)
            .map_or(self.filter_input.len(), |(i, _)| i)
    }
}
