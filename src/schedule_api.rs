//! Remote timetable service client
//!
//! The university publishes the full schedule and the group catalog
//! over plain HTTP. No retries and no caching: a failed call becomes
//! a turn-level failure and the orchestrator apologizes.

use crate::schedule::ScheduleDoc;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("schedule API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("schedule API returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("schedule API URL is not configured")]
    NotConfigured,
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote schedule and group-catalog lookups.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn full_schedule(&self, group: &str) -> ApiResult<ScheduleDoc>;
    async fn list_groups(&self) -> ApiResult<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct GroupsBody {
    groups: Vec<String>,
}

pub struct HttpScheduleApi {
    client: Client,
    base_url: Option<String>,
}

impl HttpScheduleApi {
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    fn url(&self, path: &str) -> ApiResult<String> {
        let base = self.base_url.as_ref().ok_or(ApiError::NotConfigured)?;
        Ok(format!("{base}/{path}"))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn full_schedule(&self, group: &str) -> ApiResult<ScheduleDoc> {
        self.get_json(self.url(&format!("{group}/full_schedule"))?)
            .await
    }

    async fn list_groups(&self) -> ApiResult<Vec<String>> {
        let body: GroupsBody = self.get_json(self.url("groups")?).await?;
        Ok(body.groups)
    }
}
