//! Mock collaborators for dialog and orchestrator tests.

use crate::schedule::ScheduleDoc;
use crate::schedule_api::{ApiError, ApiResult, ScheduleApi};
use crate::store::{StoreError, StoreResult, User, UserStore};
use crate::turn::Platform;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory user store with an update counter for commit-once
/// assertions.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    updates: Mutex<usize>,
}

impl MemoryUserStore {
    pub fn update_count(&self) -> usize {
        *self.updates.lock().unwrap()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn create_user(
        &self,
        user_id: &str,
        group: &str,
        platform: Platform,
    ) -> StoreResult<bool> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(user_id) {
            return Ok(false);
        }
        users.insert(
            user_id.to_string(),
            User {
                user_id: user_id.to_string(),
                study_group: group.to_string(),
                platform: platform.as_db_str().to_string(),
            },
        );
        Ok(true)
    }

    async fn update_user(&self, user_id: &str, group: &str) -> StoreResult<()> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(user_id) else {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        };
        user.study_group = group.to_string();
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }
}

/// Mock schedule service that records every schedule fetch, so tests
/// can assert the Sunday short-circuit never reaches it.
#[derive(Default)]
pub struct MockScheduleApi {
    groups: Vec<String>,
    schedule: Option<serde_json::Value>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl MockScheduleApi {
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_schedule(mut self, doc: serde_json::Value) -> Self {
        self.schedule = Some(doc);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Groups whose schedule was fetched, in call order.
    pub fn schedule_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScheduleApi for MockScheduleApi {
    async fn full_schedule(&self, group: &str) -> ApiResult<ScheduleDoc> {
        self.calls.lock().unwrap().push(group.to_string());
        if self.fail {
            return Err(ApiError::Status {
                status: 503,
                url: "mock".to_string(),
            });
        }
        let raw = self.schedule.clone().ok_or(ApiError::Status {
            status: 404,
            url: "mock".to_string(),
        })?;
        Ok(serde_json::from_value(raw).expect("mock schedule document"))
    }

    async fn list_groups(&self) -> ApiResult<Vec<String>> {
        if self.fail {
            return Err(ApiError::Status {
                status: 503,
                url: "mock".to_string(),
            });
        }
        Ok(self.groups.clone())
    }
}
