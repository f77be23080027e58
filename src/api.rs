//! Network collaborator: a generic `get`/`delete` capability over resource paths.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::DepartmentId;

pub const DEPARTMENT_RESOURCE: &str = "department";

/// The id is form-encoded so `#`, `&` and `=` stay part of the value.
pub fn department_delete_path(id: &DepartmentId) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("id", id.as_str())
        .finish();
    format!("{DEPARTMENT_RESOURCE}?{query}")
}

#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch a resource and return the raw response body.
    async fn get(&self, path: &str) -> Result<String>;

    /// Delete a resource. Any response body is discarded.
    async fn delete(&self, path: &str) -> Result<()>;
}

pub struct HttpResourceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpResourceClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: normalize_base(&config.base_url)?,
        })
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// `Url::join` drops the last segment unless the base ends with `/`.
fn normalize_base(base: &str) -> Result<Url> {
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{base}/"))?)
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn get(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(path, status.as_u16()));
        }
        Ok(response.text().await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.resolve(path)?;
        log::debug!("DELETE {url}");
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(path, status.as_u16()));
        }
        Ok(())
    }
}
