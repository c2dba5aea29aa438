//! PostgREST backend over HTTP

use super::{Backend, Order};
use crate::error::GatewayError;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

pub struct RestBackend {
    base_url: String,
    anon_key: String,
    bearer: String,
    agent: ureq::Agent,
}

impl RestBackend {
    /// `bearer` is the signed-in user's access token; the anonymous key is used
    /// when there is none.
    pub fn new(url: &str, anon_key: &str, bearer: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bearer: bearer.unwrap_or_else(|| anon_key.to_string()),
            agent,
        }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: &str, table: &str) -> ureq::Request {
        self.agent
            .request(method, &self.endpoint(table))
            .set("apikey", &self.anon_key)
            .set("Authorization", &format!("Bearer {}", self.bearer))
    }
}

/// Turn a ureq failure into a gateway error, keeping the backend's message.
pub(crate) fn map_ureq_error(err: ureq::Error) -> GatewayError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            GatewayError::Backend {
                status: Some(code),
                message: extract_message(&body).unwrap_or_else(|| format!("HTTP {}", code)),
            }
        }
        ureq::Error::Transport(t) => GatewayError::Transport(t.to_string()),
    }
}

/// PostgREST and GoTrue report errors as JSON with a `message`-like field.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(obj)) => ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        _ => Some(trimmed.to_string()),
    }
}

impl Backend for RestBackend {
    fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, GatewayError> {
        let direction = if order.ascending { "asc" } else { "desc" };
        debug!(table, order = order.column, direction, "GET");
        let response = self
            .request("GET", table)
            .query("select", "*")
            .query("order", &format!("{}.{}", order.column, direction))
            .call()
            .map_err(map_ureq_error)?;
        let rows: Option<Vec<Value>> = response
            .into_json()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(rows.unwrap_or_default())
    }

    fn insert(&self, table: &str, row: Map<String, Value>) -> Result<(), GatewayError> {
        debug!(table, "POST");
        self.request("POST", table)
            .set("Prefer", "return=minimal")
            .send_json(Value::Array(vec![Value::Object(row)]))
            .map_err(map_ureq_error)?;
        Ok(())
    }

    fn update(&self, table: &str, id: &str, row: Map<String, Value>) -> Result<(), GatewayError> {
        debug!(table, id, "PATCH");
        self.request("PATCH", table)
            .query("id", &format!("eq.{}", id))
            .set("Prefer", "return=minimal")
            .send_json(Value::Object(row))
            .map_err(map_ureq_error)?;
        Ok(())
    }

    fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        debug!(table, id, "DELETE");
        self.request("DELETE", table)
            .query("id", &format!("eq.{}", id))
            .call()
            .map_err(map_ureq_error)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
