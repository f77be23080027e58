use crate::error::Result;
use crate::models::Department;
use crate::view::{DeleteTicket, PageTicket};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum AppMode {
    Normal,
    Filtering,
}

/// Completions posted back to the UI loop by spawned tasks.
#[derive(Debug)]
pub(super) enum AppEvent {
    Loaded {
        generation: u64,
        outcome: Result<Vec<Department>>,
    },
    Deleted {
        ticket: DeleteTicket,
        outcome: Result<()>,
    },
    PageReady(PageTicket),
}
