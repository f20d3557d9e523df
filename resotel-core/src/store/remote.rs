//! Remote data-API client
//!
//! Talks to the hosted relational backend through its REST data API:
//! `GET /{table}` with column filters, `POST /{table}` for inserts and
//! `POST /rpc/{procedure}` for stored procedures. Errors come back as
//! opaque [`StoreError`]s; the caller decides between fallback and
//! surfacing, this client never retries.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::store::{ColumnFilter, DataStore, StoreError};

pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    headers: HashMap<String, String>,
}

impl RemoteStore {
    /// Client against `base_url` (no trailing slash) with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_headers(base_url, HashMap::new(), Duration::from_secs(30))
    }

    /// Client with extra headers (API key and the like) and a request timeout
    pub fn with_headers(
        base_url: impl Into<String>,
        headers: HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into(), headers })
    }

    fn apply_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, StoreError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| StoreError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::Http(format!("status {}: {}", status.as_u16(), body)));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn filter_to_query(filter: &ColumnFilter) -> (String, String) {
        let (column, value) = filter;
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (column.clone(), rendered)
    }
}

#[async_trait]
impl DataStore for RemoteStore {
    async fn query(
        &self,
        table: &str,
        filters: &[ColumnFilter],
        order: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let url = format!("{}/{}", self.base_url, table);
        let mut query: Vec<(String, String)> =
            filters.iter().map(Self::filter_to_query).collect();
        if let Some(column) = order {
            query.push(("order".to_string(), column.to_string()));
        }
        debug!("GET {} ({} filter(s))", url, filters.len());

        let request = self.apply_headers(self.client.get(&url).query(&query));
        let response = request.send().await.map_err(|e| StoreError::Http(e.to_string()))?;
        match Self::read_json(response).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::Decode(format!("expected an array, got {}", other))),
        }
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.base_url, table);
        debug!("POST {}", url);
        let request = self.apply_headers(self.client.post(&url).json(&row));
        let response = request.send().await.map_err(|e| StoreError::Http(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, StoreError> {
        let url = format!("{}/rpc/{}", self.base_url, name);
        debug!("POST {}", url);
        let request = self.apply_headers(self.client.post(&url).json(&params));
        let response = request.send().await.map_err(|e| StoreError::Http(e.to_string()))?;
        Self::read_json(response).await.map_err(|err| match err {
            StoreError::Http(message) => {
                StoreError::Procedure { name: name.to_string(), message }
            }
            other => other,
        })
    }
}
