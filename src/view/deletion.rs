use crate::api::{ResourceClient, department_delete_path};
use crate::error::Result;
use crate::models::DepartmentId;

pub const CONFIRM_DESCRIPTION: &str =
    "Are you sure you want to delete this department? Once deleted it cannot be retrieved";

/// Selection captured when the user asks to delete. `index` is the position in
/// the visible collection at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub id: DepartmentId,
    pub name: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionState {
    Idle,
    PendingConfirmation(PendingDeletion),
    Deleting(PendingDeletion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct DeletionController {
    state: DeletionState,
}

impl DeletionController {
    pub fn new() -> Self {
        Self {
            state: DeletionState::Idle,
        }
    }

    /// Only accepted while idle; a second request during a pending one is ignored.
    pub fn request_delete(&mut self, id: DepartmentId, name: String, index: usize) -> bool {
        if self.state != DeletionState::Idle {
            return false;
        }
        self.state = DeletionState::PendingConfirmation(PendingDeletion { id, name, index });
        true
    }

    pub fn cancel(&mut self) -> Option<PendingDeletion> {
        match std::mem::replace(&mut self.state, DeletionState::Idle) {
            DeletionState::PendingConfirmation(pending) => Some(pending),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Move to `Deleting` and hand out the target for the remote call.
    pub fn confirm(&mut self) -> Option<PendingDeletion> {
        match &self.state {
            DeletionState::PendingConfirmation(pending) => {
                let pending = pending.clone();
                self.state = DeletionState::Deleting(pending.clone());
                Some(pending)
            }
            _ => None,
        }
    }

    /// The remote call resolved, whichever way.
    pub fn finish(&mut self) -> Option<PendingDeletion> {
        match std::mem::replace(&mut self.state, DeletionState::Idle) {
            DeletionState::Deleting(pending) => Some(pending),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = DeletionState::Idle;
    }

    pub fn state(&self) -> &DeletionState {
        &self.state
    }

    /// Shown only while waiting for the user's answer.
    pub fn prompt(&self) -> Option<ConfirmPrompt> {
        match &self.state {
            DeletionState::PendingConfirmation(pending) => Some(ConfirmPrompt {
                title: format!("Delete {}", pending.name),
                description: CONFIRM_DESCRIPTION,
            }),
            _ => None,
        }
    }
}

impl Default for DeletionController {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn remote_delete(client: &dyn ResourceClient, pending: &PendingDeletion) -> Result<()> {
    client.delete(&department_delete_path(&pending.id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeClient;

    fn requested() -> DeletionController {
        let mut controller = DeletionController::new();
        assert!(controller.request_delete(DepartmentId::new("9"), "Legal".to_string(), 3));
        controller
    }

    #[test]
    fn test_request_shows_prompt_with_name() {
        let controller = requested();
        let prompt = controller.prompt().unwrap();
        assert_eq!(prompt.title, "Delete Legal");
        assert_eq!(prompt.description, CONFIRM_DESCRIPTION);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut controller = requested();
        let cancelled = controller.cancel().unwrap();
        assert_eq!(cancelled.index, 3);
        assert_eq!(controller.state(), &DeletionState::Idle);
        assert!(controller.prompt().is_none());
        assert!(controller.confirm().is_none());
    }

    #[test]
    fn test_confirm_then_finish() {
        let mut controller = requested();
        let target = controller.confirm().unwrap();
        assert!(matches!(controller.state(), DeletionState::Deleting(_)));
        assert!(controller.prompt().is_none());
        assert!(controller.cancel().is_none());
        assert!(!controller.request_delete(DepartmentId::new("1"), "X".to_string(), 0));

        assert_eq!(controller.finish(), Some(target));
        assert_eq!(controller.state(), &DeletionState::Idle);
    }

    #[tokio::test]
    async fn test_remote_delete_targets_id() {
        let client = FakeClient::default();
        let target = requested().confirm().unwrap();
        remote_delete(&client, &target).await.unwrap();
        assert_eq!(*client.deleted.lock().unwrap(), ["department?id=9"]);
    }
}
