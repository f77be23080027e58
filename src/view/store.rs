use crate::api::{DEPARTMENT_RESOURCE, ResourceClient};
use crate::error::Result;
use crate::models::{Department, DepartmentId};

/// Whether any response (success or failure) has arrived yet. A failed fetch
/// still counts as `Loaded` so the view shows the empty state, not a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    NotStarted,
    Loaded,
}

/// Owns the full fetched collection.
#[derive(Debug)]
pub struct DataStore {
    departments: Vec<Department>,
    state: FetchState,
}

/// Fetch and decode the department list.
pub async fn fetch_departments(client: &dyn ResourceClient) -> Result<Vec<Department>> {
    let body = client.get(DEPARTMENT_RESOURCE).await?;
    Ok(serde_json::from_str(&body)?)
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            departments: Vec::new(),
            state: FetchState::NotStarted,
        }
    }

    /// Record the outcome of a fetch. Errors are logged and leave the store
    /// empty; there is no retry and nothing is shown beyond the empty state.
    pub fn settle(&mut self, outcome: Result<Vec<Department>>) -> Result<&[Department]> {
        self.state = FetchState::Loaded;
        match outcome {
            Ok(departments) => {
                log::info!("Loaded {} departments", departments.len());
                self.departments = departments;
                Ok(&self.departments)
            }
            Err(e) => {
                log::error!("Failed to fetch departments: {e}");
                self.departments.clear();
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.departments.clear();
        self.state = FetchState::NotStarted;
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }

    /// No-op when the id is absent.
    pub fn remove_by_id(&mut self, id: &DepartmentId) -> Option<Department> {
        let pos = self.departments.iter().position(|d| &d.id == id)?;
        Some(self.departments.remove(pos))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Department> {
        (index < self.departments.len()).then(|| self.departments.remove(index))
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeClient;

    const BODY: &str = r#"[{"id": 1, "departmentName": "Finance"}, {"id": 2, "departmentName": "Legal"}]"#;

    #[tokio::test]
    async fn test_load_populates_collection() {
        let client = FakeClient::serving(BODY);
        let mut store = DataStore::new();
        assert_eq!(store.state(), FetchState::NotStarted);

        let loaded = store.settle(fetch_departments(&client).await).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(store.state(), FetchState::Loaded);
    }

    #[tokio::test]
    async fn test_failed_load_looks_like_empty_load() {
        let mut failed = DataStore::new();
        assert!(failed.settle(fetch_departments(&FakeClient::default()).await).is_err());

        let mut empty = DataStore::new();
        empty.settle(fetch_departments(&FakeClient::serving("[]")).await).unwrap();

        assert_eq!(failed.state(), empty.state());
        assert!(failed.is_empty() && empty.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_fetch_failure() {
        let mut store = DataStore::new();
        assert!(store.settle(fetch_departments(&FakeClient::serving("{oops")).await).is_err());
        assert_eq!(store.state(), FetchState::Loaded);
    }

    #[tokio::test]
    async fn test_remove_by_id_is_idempotent() {
        let mut store = DataStore::new();
        store.settle(fetch_departments(&FakeClient::serving(BODY)).await).unwrap();

        let id = DepartmentId::new("1");
        assert!(store.remove_by_id(&id).is_some());
        assert!(store.remove_by_id(&id).is_none());
        assert_eq!(store.departments().len(), 1);
        assert!(store.remove_at(5).is_none());
    }
}
