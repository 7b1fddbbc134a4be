use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Category, Note};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status and an error body.
    #[error("{message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Body sent on note create and update. The update always carries every
/// field, the way the form submits them; `categoryId: null` detaches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
struct CategoryPayload<'a> {
    name: &'a str,
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    pub async fn get_all_notes(&self) -> Result<Vec<Note>, ApiError> {
        let response = self
            .client
            .get(format!("{}/notes", self.base_url))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Note, ApiError> {
        let response = self
            .client
            .get(format!("{}/notes/{id}", self.base_url))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_note(&self, payload: &NotePayload) -> Result<Note, ApiError> {
        let response = self
            .client
            .post(format!("{}/notes", self.base_url))
            .json(payload)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn update_note(&self, id: i64, payload: &NotePayload) -> Result<Note, ApiError> {
        let response = self
            .client
            .put(format!("{}/notes/{id}", self.base_url))
            .json(payload)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/notes/{id}", self.base_url))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    pub async fn get_all_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self
            .client
            .get(format!("{}/categories", self.base_url))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        let response = self
            .client
            .post(format!("{}/categories", self.base_url))
            .json(&CategoryPayload { name })
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Decode the `{"error": ...}` body; fall back to the status line when
        // the body is not what the API promises.
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };

        tracing::error!("API request failed with status {status}: {message}");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
