//! Headless state of the department list view.
//!
//! The full, filtered and visible collections are kept consistent here. Async
//! work (fetch, delete, page delay) happens outside; its results come back
//! through `apply_load`, `finish_delete` and `complete_page`, each tagged with
//! the generation it was started under so completions for a torn-down load
//! are ignored.

pub mod deletion;
pub mod filter;
pub mod paginator;
pub mod presentation;
pub mod store;
pub mod view_mode;

use crate::api::ResourceClient;
use crate::config::DeleteTargeting;
use crate::error::Result;
use crate::models::Department;

pub use deletion::{ConfirmPrompt, DeletionController, DeletionState, PendingDeletion};
pub use paginator::{Growth, Paginator, PendingPage};
pub use presentation::{DeleteAction, DepartmentCard, TableRow, TableSort};
pub use store::{DataStore, FetchState};
pub use view_mode::ViewMode;

pub const ADMIN_ROLE: &str = "ADMIN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No response yet
    Loading,
    /// Response received with nothing in it, or the fetch failed
    Empty,
    Content,
}

/// A remote delete in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTicket {
    pub generation: u64,
    pub target: PendingDeletion,
}

/// A page growth waiting for its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub page: PendingPage,
}

type ListChanged = Box<dyn FnMut() + Send>;

pub struct DepartmentView {
    store: DataStore,
    query: String,
    filtered: Vec<Department>,
    paginator: Paginator,
    deletion: DeletionController,
    mode: ViewMode,
    can_delete: bool,
    targeting: DeleteTargeting,
    generation: u64,
    listeners: Vec<ListChanged>,
}

impl DepartmentView {
    /// `role` is read once here; only `ADMIN` gets delete actions.
    pub fn new(role: Option<&str>, targeting: DeleteTargeting) -> Self {
        Self {
            store: DataStore::new(),
            query: String::new(),
            filtered: Vec::new(),
            paginator: Paginator::new(),
            deletion: DeletionController::new(),
            mode: ViewMode::default(),
            can_delete: role == Some(ADMIN_ROLE),
            targeting,
            generation: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a callback run after every successful delete.
    pub fn on_list_changed(&mut self, listener: impl FnMut() + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- Fetch lifecycle ---

    /// Drop everything and start a new generation. Returns the generation the
    /// next fetch must be tagged with.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.store.reset();
        self.filtered.clear();
        self.paginator.reset(&[]);
        self.deletion.reset();
        self.generation
    }

    /// Returns false when the result belongs to an earlier generation.
    pub fn apply_load(&mut self, generation: u64, outcome: Result<Vec<Department>>) -> bool {
        if generation != self.generation {
            log::debug!("Ignoring fetch result for generation {generation}");
            return false;
        }
        // The failure was already logged by the store; it only shows as empty.
        let _ = self.store.settle(outcome);
        self.refilter();
        true
    }

    pub async fn load(&mut self, client: &dyn ResourceClient) {
        let generation = self.begin_load();
        let outcome = store::fetch_departments(client).await;
        self.apply_load(generation, outcome);
    }

    // --- Filtering and paging ---

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filter::apply(&self.query, self.store.departments());
        self.paginator.reset(&self.filtered);
    }

    /// Scroll reached the end of the grid. `None` when nothing is left to
    /// reveal or the table is showing.
    pub fn request_more(&mut self) -> Option<PageTicket> {
        if self.mode != ViewMode::Grid {
            return None;
        }
        match self.paginator.grow_next(&self.filtered) {
            Growth::Exhausted => None,
            Growth::Pending(page) => Some(PageTicket {
                generation: self.generation,
                page,
            }),
        }
    }

    pub fn complete_page(&mut self, ticket: PageTicket) -> bool {
        ticket.generation == self.generation && self.paginator.complete(ticket.page, &self.filtered)
    }

    // --- Deletion ---

    pub fn request_delete(&mut self, action: &DeleteAction) -> bool {
        if !self.can_delete {
            log::warn!("Delete of {} refused: role lacks permission", action.id);
            return false;
        }
        self.deletion
            .request_delete(action.id.clone(), action.name.clone(), action.index)
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.deletion.cancel().is_some()
    }

    pub fn confirm_delete(&mut self) -> Option<DeleteTicket> {
        self.deletion.confirm().map(|target| DeleteTicket {
            generation: self.generation,
            target,
        })
    }

    /// Apply a resolved remote delete. A failure leaves every collection
    /// untouched and is only logged; nothing is surfaced to the user.
    pub fn finish_delete(&mut self, ticket: &DeleteTicket, outcome: Result<()>) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Ignoring delete result for generation {}", ticket.generation);
            return false;
        }
        self.deletion.finish();
        if let Err(e) = outcome {
            log::warn!("Failed to delete department {}: {e}", ticket.target.id);
            return false;
        }

        let target = &ticket.target;
        match self.targeting {
            DeleteTargeting::ById => {
                self.store.remove_by_id(&target.id);
                self.filtered.retain(|d| d.id != target.id);
                self.paginator.remove_by_id(&target.id);
            }
            DeleteTargeting::CapturedIndex => {
                self.store.remove_at(target.index);
                if target.index < self.filtered.len() {
                    self.filtered.remove(target.index);
                }
                self.paginator.remove_at(target.index);
            }
        }
        log::info!("Deleted department {} ({})", target.name, target.id);

        for listener in &mut self.listeners {
            listener();
        }
        true
    }

    /// Confirm and run the remote delete inline. The UI spawns the call instead.
    #[cfg(test)]
    pub async fn confirm_and_delete(&mut self, client: &dyn ResourceClient) -> bool {
        let Some(ticket) = self.confirm_delete() else {
            return false;
        };
        let outcome = deletion::remote_delete(client, &ticket.target).await;
        self.finish_delete(&ticket, outcome)
    }

    // --- View mode and presentation ---

    pub fn switch_view(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn toggle_view(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn cards(&self) -> Vec<DepartmentCard> {
        presentation::cards(self.paginator.visible(), self.can_delete)
    }

    pub fn rows(&self, sort: Option<TableSort>) -> Vec<TableRow> {
        let mut rows = presentation::rows(self.paginator.visible(), self.can_delete);
        if let Some(sort) = sort {
            presentation::sort_rows(&mut rows, sort);
        }
        rows
    }

    pub fn render_state(&self) -> RenderState {
        match (self.store.state(), self.store.is_empty()) {
            (FetchState::NotStarted, _) => RenderState::Loading,
            (FetchState::Loaded, true) => RenderState::Empty,
            (FetchState::Loaded, false) => RenderState::Content,
        }
    }

    pub fn prompt(&self) -> Option<ConfirmPrompt> {
        self.deletion.prompt()
    }

    pub fn deletion_state(&self) -> &DeletionState {
        self.deletion.state()
    }

    pub fn full(&self) -> &[Department] {
        self.store.departments()
    }

    pub fn filtered(&self) -> &[Department] {
        &self.filtered
    }

    pub fn visible(&self) -> &[Department] {
        self.paginator.visible()
    }

    pub fn has_more(&self) -> bool {
        self.paginator.has_more()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn can_delete(&self) -> bool {
        self.can_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::paginator::PAGE_SIZE;
    use crate::api::fake::FakeClient;
    use crate::models::DepartmentId;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn body(count: usize) -> String {
        let items: Vec<String> = (1..=count)
            .map(|i| {
                let tags = if i % 10 == 0 { "Finance, audit" } else { "ops" };
                format!(r#"{{"id": {i}, "departmentName": "D{i}", "tags": "{tags}"}}"#)
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    async fn loaded(count: usize, targeting: DeleteTargeting) -> DepartmentView {
        let mut view = DepartmentView::new(Some(ADMIN_ROLE), targeting);
        view.load(&FakeClient::serving(body(count))).await;
        view
    }

    fn grow(view: &mut DepartmentView) -> bool {
        match view.request_more() {
            Some(ticket) => view.complete_page(ticket),
            None => false,
        }
    }

    fn names(items: &[Department]) -> Vec<String> {
        items.iter().map(|d| d.department_name.clone()).collect()
    }

    fn action_at(view: &DepartmentView, index: usize) -> DeleteAction {
        view.cards()[index].delete.clone().unwrap()
    }

    #[tokio::test]
    async fn test_render_states() {
        let mut view = DepartmentView::new(None, DeleteTargeting::ById);
        assert_eq!(view.render_state(), RenderState::Loading);

        view.load(&FakeClient::serving("[]")).await;
        assert_eq!(view.render_state(), RenderState::Empty);

        view.load(&FakeClient::default()).await;
        assert_eq!(view.render_state(), RenderState::Empty);

        view.load(&FakeClient::serving(body(3))).await;
        assert_eq!(view.render_state(), RenderState::Content);
    }

    #[tokio::test]
    async fn test_query_change_resets_to_first_page() {
        let mut view = loaded(300, DeleteTargeting::ById).await;
        assert!(grow(&mut view));
        assert!(grow(&mut view));
        assert_eq!(view.visible().len(), 150);

        view.set_query("d1");
        assert_eq!(view.visible().len(), PAGE_SIZE);
        assert_eq!(view.visible(), &view.filtered()[..PAGE_SIZE]);

        view.set_query("finance");
        assert_eq!(view.filtered().len(), 30);
        assert_eq!(view.visible(), view.filtered());
        assert!(!view.has_more());

        view.set_query("FINANCE");
        assert_eq!(view.filtered().len(), 30);
    }

    #[tokio::test]
    async fn test_query_typed_before_load_applies_to_loaded_data() {
        let mut view = DepartmentView::new(Some(ADMIN_ROLE), DeleteTargeting::ById);
        view.set_query("finance");
        assert_eq!(view.render_state(), RenderState::Loading);

        view.load(&FakeClient::serving(body(120))).await;
        assert_eq!(view.query(), "finance");
        assert_eq!(view.full().len(), 120);
        assert_eq!(view.filtered().len(), 12);
        assert!(view.filtered().iter().all(|d| d.tags.contains("Finance")));
        assert_eq!(view.visible(), view.filtered());
        assert!(!view.has_more());
    }

    #[tokio::test]
    async fn test_visible_stays_a_prefix_while_growing() {
        let mut view = loaded(120, DeleteTargeting::ById).await;
        while grow(&mut view) {
            let n = view.visible().len();
            assert_eq!(view.visible(), &view.filtered()[..n]);
        }
        assert_eq!(view.visible().len(), 120);
        assert!(!view.has_more());
    }

    #[tokio::test]
    async fn test_list_mode_does_not_grow() {
        let mut view = loaded(120, DeleteTargeting::ById).await;
        view.switch_view(ViewMode::List);
        assert!(view.request_more().is_none());
        assert_eq!(view.rows(None).len(), 50);
    }

    #[tokio::test]
    async fn test_switching_view_leaves_collections_alone() {
        let mut view = loaded(120, DeleteTargeting::ById).await;
        view.set_query("1");
        let before = (view.full().to_vec(), view.filtered().to_vec(), view.visible().to_vec());

        view.toggle_view();
        assert_eq!(view.mode(), ViewMode::List);
        view.toggle_view();

        assert_eq!(before.0, view.full());
        assert_eq!(before.1, view.filtered());
        assert_eq!(before.2, view.visible());
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_from_every_collection() {
        for targeting in [DeleteTargeting::ById, DeleteTargeting::CapturedIndex] {
            let mut view = loaded(60, targeting).await;
            let changed = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&changed);
            view.on_list_changed(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

            let action = action_at(&view, 4);
            assert!(view.request_delete(&action));
            assert_eq!(view.prompt().unwrap().title, "Delete D5");

            let client = FakeClient::default();
            assert!(view.confirm_and_delete(&client).await);

            assert_eq!(view.full().len(), 59);
            assert_eq!(view.filtered().len(), 59);
            assert_eq!(view.visible().len(), 49);
            assert!(!view.full().iter().any(|d| d.id == action.id));
            assert!(!view.filtered().iter().any(|d| d.id == action.id));
            assert_eq!(changed.load(Ordering::SeqCst), 1);
            assert!(view.prompt().is_none());
            assert_eq!(*client.deleted.lock().unwrap(), ["department?id=5"]);
        }
    }

    #[tokio::test]
    async fn test_cancel_leaves_everything_unchanged() {
        let mut view = loaded(60, DeleteTargeting::ById).await;
        let before = (view.full().to_vec(), view.filtered().to_vec(), view.visible().to_vec());

        assert!(view.request_delete(&action_at(&view, 0)));
        assert!(view.cancel_delete());
        assert!(view.prompt().is_none());
        assert!(view.confirm_delete().is_none());

        assert_eq!(before.0, view.full());
        assert_eq!(before.1, view.filtered());
        assert_eq!(before.2, view.visible());
    }

    #[tokio::test]
    async fn test_failed_delete_is_silent_and_changes_nothing() {
        let mut view = loaded(10, DeleteTargeting::ById).await;
        let before = view.full().to_vec();
        let client = FakeClient {
            fail_delete: true,
            ..FakeClient::default()
        };

        assert!(view.request_delete(&action_at(&view, 2)));
        assert!(!view.confirm_and_delete(&client).await);

        // Known gap: the user gets no feedback that the delete failed.
        assert_eq!(view.full(), before);
        assert_eq!(view.deletion_state(), &DeletionState::Idle);
        assert!(view.prompt().is_none());
    }

    #[tokio::test]
    async fn test_filtered_delete_by_id_hits_the_selected_record() {
        let mut view = loaded(60, DeleteTargeting::ById).await;
        view.set_query("finance");
        let action = action_at(&view, 1);
        assert_eq!(action.id, DepartmentId::new("20"));

        view.request_delete(&action);
        assert!(view.confirm_and_delete(&FakeClient::default()).await);

        assert!(view.full().iter().all(|d| d.id != action.id));
        assert_eq!(names(view.filtered()), ["D10", "D30", "D40", "D50", "D60"]);
        assert_eq!(view.full().len(), 59);
    }

    #[tokio::test]
    async fn test_filtered_delete_by_captured_index_trusts_position() {
        let mut view = loaded(60, DeleteTargeting::CapturedIndex).await;
        view.set_query("finance");
        let action = action_at(&view, 1);

        view.request_delete(&action);
        assert!(view.confirm_and_delete(&FakeClient::default()).await);

        // Same position is dropped from the unfiltered list: D2, not D20.
        assert!(view.full().iter().any(|d| d.id == action.id));
        assert!(view.full().iter().all(|d| d.department_name != "D2"));
        assert_eq!(names(view.filtered()), ["D10", "D30", "D40", "D50", "D60"]);
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let mut view = DepartmentView::new(Some("VIEWER"), DeleteTargeting::ById);
        view.load(&FakeClient::serving(body(3))).await;
        assert!(!view.can_delete());
        assert!(view.cards().iter().all(|c| c.delete.is_none()));

        let action = DeleteAction {
            id: DepartmentId::new("1"),
            name: "D1".to_string(),
            index: 0,
        };
        assert!(!view.request_delete(&action));
        assert!(view.prompt().is_none());
    }

    #[tokio::test]
    async fn test_stale_completions_are_ignored() {
        let mut view = loaded(120, DeleteTargeting::ById).await;
        let page = view.request_more().unwrap();
        view.request_delete(&action_at(&view, 0));
        let delete = view.confirm_delete().unwrap();

        let generation = view.begin_load();
        assert!(!view.complete_page(page));
        assert!(!view.finish_delete(&delete, Ok(())));
        assert!(!view.apply_load(generation - 1, Ok(Vec::new())));
        assert_eq!(view.render_state(), RenderState::Loading);

        assert!(view.apply_load(generation, Ok(Vec::new())));
        assert_eq!(view.render_state(), RenderState::Empty);
    }
}
