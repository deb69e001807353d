//! Reminder CRUD and action endpoints.
//!
//! Thin typed mappings onto the request pipeline. `list_mine` and `create`
//! unwrap the server's `{data: ...}` envelope; the other calls return the
//! parsed body as-is. No call here recovers errors; the view layer is the
//! presentation boundary.

use serde_json::{json, Value};

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::types::{CreateReminder, Reminder, UpdateReminder};

const REMINDERS_PATH: &str = "/api/reminders";

#[derive(Clone)]
pub struct RemindersApi {
    api: ApiClient,
}

impl RemindersApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All reminders owned by the logged-in user.
    pub async fn list_mine(&self) -> Result<Vec<Reminder>, ClientError> {
        let data = self.api.get(&format!("{REMINDERS_PATH}/mine")).await?;
        let items = data
            .get("data")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        Ok(serde_json::from_value(items)?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Reminder, ClientError> {
        let data = self.api.get(&format!("{REMINDERS_PATH}/{id}")).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn create(&self, dto: &CreateReminder) -> Result<Reminder, ClientError> {
        let body = serde_json::to_value(dto)?;
        let data = self.api.post(REMINDERS_PATH, &body).await?;
        let record = data.get("data").cloned().unwrap_or(data);
        Ok(serde_json::from_value(record)?)
    }

    pub async fn update(&self, id: &str, patch: &UpdateReminder) -> Result<Reminder, ClientError> {
        let body = serde_json::to_value(patch)?;
        let data = self
            .api
            .put(&format!("{REMINDERS_PATH}/{id}"), &body)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ClientError> {
        let data = self.api.delete(&format!("{REMINDERS_PATH}/{id}")).await?;
        Ok(success_flag(&data))
    }

    /// Push the next trigger out by `duration_secs` seconds.
    pub async fn snooze(&self, id: &str, duration_secs: u64) -> Result<bool, ClientError> {
        let body = json!({ "duration": duration_secs });
        let data = self
            .api
            .post(&format!("{REMINDERS_PATH}/{id}/snooze"), &body)
            .await?;
        Ok(success_flag(&data))
    }

    /// Request the completed transition; the server decides what that means
    /// for a recurring reminder.
    pub async fn complete(&self, id: &str) -> Result<bool, ClientError> {
        let data = self
            .api
            .post(&format!("{REMINDERS_PATH}/{id}/complete"), &json!({}))
            .await?;
        Ok(success_flag(&data))
    }
}

fn success_flag(data: &Value) -> bool {
    data.get("success").and_then(Value::as_bool).unwrap_or(true)
}
