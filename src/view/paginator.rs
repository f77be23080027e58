use crate::models::{Department, DepartmentId};

pub const PAGE_SIZE: usize = 50;

/// A growth step waiting for its pacing delay. Carries the epoch and visible
/// length seen when it was requested; a page only lands if both still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPage {
    epoch: u64,
    start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Everything filtered is already visible; `has_more` is now false.
    Exhausted,
    Pending(PendingPage),
}

/// Keeps the render-visible prefix of the filtered collection.
#[derive(Debug)]
pub struct Paginator {
    page_size: usize,
    visible: Vec<Department>,
    has_more: bool,
    epoch: u64,
}

impl Paginator {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            visible: Vec::new(),
            has_more: false,
            epoch: 0,
        }
    }

    /// Show the first page. `has_more` only says whether that page was full;
    /// a source of exactly one page still reports more.
    pub fn reset(&mut self, filtered: &[Department]) -> &[Department] {
        self.epoch += 1;
        let end = self.page_size.min(filtered.len());
        self.visible = filtered[..end].to_vec();
        self.has_more = filtered.len() >= self.page_size;
        &self.visible
    }

    /// Ask for the next page. Termination is only noticed on the call after
    /// the last page landed, so the final growth is always a no-op.
    pub fn grow_next(&mut self, filtered: &[Department]) -> Growth {
        if self.visible.len() == filtered.len() {
            self.has_more = false;
            return Growth::Exhausted;
        }
        Growth::Pending(PendingPage {
            epoch: self.epoch,
            start: self.visible.len(),
        })
    }

    /// Append the page once its delay has elapsed. Returns false when the page
    /// is stale: a reset happened, or an overlapping request already grew past it.
    pub fn complete(&mut self, pending: PendingPage, filtered: &[Department]) -> bool {
        if pending.epoch != self.epoch || pending.start != self.visible.len() {
            log::debug!(
                "Dropping stale page at {} (visible {})",
                pending.start,
                self.visible.len()
            );
            return false;
        }
        let end = (pending.start + self.page_size).min(filtered.len());
        if pending.start < end {
            self.visible.extend_from_slice(&filtered[pending.start..end]);
        }
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Department> {
        (index < self.visible.len()).then(|| self.visible.remove(index))
    }

    pub fn remove_by_id(&mut self, id: &DepartmentId) -> Option<Department> {
        let pos = self.visible.iter().position(|d| &d.id == id)?;
        Some(self.visible.remove(pos))
    }

    pub fn visible(&self) -> &[Department] {
        &self.visible
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}
