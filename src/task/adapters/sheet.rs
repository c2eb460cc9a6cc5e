//! HTTP adapter for a spreadsheet-backed web app store.
//!
//! The endpoint does not answer CORS preflight, so writes go out as
//! `text/plain` with the JSON body inside, and reads carry a cache-busting
//! timestamp.

use super::records::{SyncRequest, check_acknowledgement, decode_load_response};
use crate::task::{
    domain::Task,
    ports::{RemoteStore, RemoteStoreError, RemoteStoreResult},
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, header::CONTENT_TYPE, redirect::Policy};
use std::time::Duration;

const PLAIN_TEXT: &str = "text/plain;charset=utf-8";

/// Remote store speaking the sheet web app protocol.
#[derive(Debug, Clone)]
pub struct SheetStore {
    client: Client,
    url: String,
}

impl SheetStore {
    /// Creates a store for `url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError::Connection`] when the HTTP client cannot
    /// be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> RemoteStoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(10))
            .build()
            .map_err(RemoteStoreError::connection)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn read_body(response: reqwest::Response) -> RemoteStoreResult<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteStoreError::connection(std::io::Error::other(format!(
                "HTTP status {status}"
            ))));
        }
        response.text().await.map_err(RemoteStoreError::connection)
    }
}

#[async_trait]
impl RemoteStore for SheetStore {
    async fn load(&self) -> RemoteStoreResult<Vec<Task>> {
        let cache_buster = Utc::now().timestamp_millis().to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", cache_buster.as_str())])
            .send()
            .await
            .map_err(RemoteStoreError::connection)?;
        let body = Self::read_body(response).await?;
        let tasks = decode_load_response(&body)?;
        tracing::debug!(count = tasks.len(), "loaded tasks from sheet");
        Ok(tasks)
    }

    async fn save(&self, tasks: &[Task]) -> RemoteStoreResult<()> {
        let body = serde_json::to_string(&SyncRequest::new(tasks))
            .map_err(|err| RemoteStoreError::Parse(err.to_string()))?;
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, PLAIN_TEXT)
            .body(body)
            .send()
            .await
            .map_err(RemoteStoreError::connection)?;
        let reply = Self::read_body(response).await?;
        check_acknowledgement(&reply)?;
        tracing::debug!(count = tasks.len(), "saved tasks to sheet");
        Ok(())
    }
}
