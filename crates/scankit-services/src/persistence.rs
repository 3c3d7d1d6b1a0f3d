//! Persistence boundary: fire-and-forget snapshots of the in-memory
//! model. Saves are never transactional with in-memory mutations; a
//! failed save logs a warning and the editing session continues.

use std::sync::Arc;

use async_trait::async_trait;

use scankit_core::ServiceError;
use scankit_model::{Page, Project};

use crate::http;

/// Persistence API seam.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Saves a full project snapshot.
    async fn save_project(&self, project: &Project) -> Result<(), ServiceError>;
    /// Saves a single page snapshot (elements included).
    async fn save_page(&self, page: &Page) -> Result<(), ServiceError>;
}

/// HTTP-backed persistence client.
pub struct HttpPersistenceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpPersistenceClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http::build_client(timeout_secs)?,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl PersistenceClient for HttpPersistenceClient {
    async fn save_project(&self, project: &Project) -> Result<(), ServiceError> {
        let url = format!("{}/projects", self.endpoint);
        http::post_json(&self.http, "persistence", &url, self.api_key.as_deref(), project)
            .await
            .map(|_| ())
    }

    async fn save_page(&self, page: &Page) -> Result<(), ServiceError> {
        let url = format!("{}/pages", self.endpoint);
        http::post_json(&self.http, "persistence", &url, self.api_key.as_deref(), page)
            .await
            .map(|_| ())
    }
}

/// Fires a page save without waiting for it. Failures are logged, never
/// surfaced.
pub fn spawn_save_page(client: Arc<dyn PersistenceClient>, page: Arc<Page>) {
    tokio::spawn(async move {
        if let Err(e) = client.save_page(&page).await {
            tracing::warn!(page = %page.id, error = %e, "page snapshot save failed");
        }
    });
}

/// Fires a project save without waiting for it. Failures are logged,
/// never surfaced.
pub fn spawn_save_project(client: Arc<dyn PersistenceClient>, project: Arc<Project>) {
    tokio::spawn(async move {
        if let Err(e) = client.save_project(&project).await {
            tracing::warn!(project = %project.id, error = %e, "project snapshot save failed");
        }
    });
}
