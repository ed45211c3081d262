// Production store client: a thin reqwest wrapper over the task API.
//
// Endpoints:
//   GET    /tasks
//   POST   /tasks
//   PATCH  /tasks/{id}
//   DELETE /tasks/{id}
//   POST   /tasks/bulk-update
//   POST   /tasks/bulk-delete
//
// The base URL must use https; http is allowed only for localhost testing.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::client::{NewStoreTask, StoreClient, StoreClientError, StoreTask, StoreTaskPatch};
use crate::config::ClientConfig;

pub struct HttpStoreClient {
    http: reqwest::Client,
    base: Url,
}

#[derive(Debug, Serialize)]
struct BulkUpdateBody<'a> {
    ids: &'a [u64],
    patch: StoreTaskPatch,
}

#[derive(Debug, Serialize)]
struct BulkDeleteBody<'a> {
    ids: &'a [u64],
}

impl HttpStoreClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, StoreClientError> {
        let base = validate_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(StoreClientError::Transport)?;
        Ok(Self { http, base })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, StoreClientError> {
        let base_url = config
            .store_url
            .as_deref()
            .ok_or_else(|| StoreClientError::InvalidUrl("no store_url configured".into()))?;
        Self::new(base_url, Duration::from_secs(config.request_timeout_secs))
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreClientError> {
        self.base.join(path).map_err(|error| StoreClientError::InvalidUrl(error.to_string()))
    }
}

/// Turn a non-2xx response into `Rejected`, preserving the store's message.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        message
    };
    Err(StoreClientError::Rejected { status: status.as_u16(), message })
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    async fn create_task(&self, task: NewStoreTask) -> Result<StoreTask, StoreClientError> {
        let response = self.http.post(self.endpoint("tasks")?).json(&task).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_task(&self, id: u64, patch: StoreTaskPatch) -> Result<(), StoreClientError> {
        let response =
            self.http.patch(self.endpoint(&format!("tasks/{id}"))?).json(&patch).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn delete_task(&self, id: u64) -> Result<(), StoreClientError> {
        let response = self.http.delete(self.endpoint(&format!("tasks/{id}"))?).send().await?;
        // A task already gone server-side is a satisfied delete.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(response).await?;
        Ok(())
    }

    async fn bulk_update_tasks(
        &self,
        ids: &[u64],
        patch: StoreTaskPatch,
    ) -> Result<(), StoreClientError> {
        let body = BulkUpdateBody { ids, patch };
        let response =
            self.http.post(self.endpoint("tasks/bulk-update")?).json(&body).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn bulk_delete_tasks(&self, ids: &[u64]) -> Result<(), StoreClientError> {
        let body = BulkDeleteBody { ids };
        let response =
            self.http.post(self.endpoint("tasks/bulk-delete")?).json(&body).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn list_tasks(&self) -> Result<Vec<StoreTask>, StoreClientError> {
        let response = self.http.get(self.endpoint("tasks")?).send().await?;
        Ok(check(response).await?.json().await?)
    }
}

fn validate_base_url(value: &str) -> Result<Url, StoreClientError> {
    let parsed = Url::parse(value)
        .map_err(|error| StoreClientError::InvalidUrl(format!("`{value}`: {error}")))?;
    match parsed.scheme() {
        "https" => Ok(parsed),
        "http" if is_loopback_host(parsed.host_str()) => Ok(parsed),
        _ => Err(StoreClientError::InvalidUrl(
            "store url must use https (http is allowed only for localhost testing)".into(),
        )),
    }
}

fn is_loopback_host(host: Option<&str>) -> bool {
    let Some(host) = host else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.parse::<IpAddr>().is_ok_and(|addr| addr.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_urls() {
        assert!(validate_base_url("https://tasks.example.com/api/").is_ok());
    }

    #[test]
    fn accepts_http_only_for_loopback() {
        assert!(validate_base_url("http://localhost:8080/").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080/").is_ok());
        assert!(validate_base_url("http://tasks.example.com/").is_err());
    }

    #[test]
    fn rejects_garbage_urls() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("ftp://tasks.example.com").is_err());
    }

    #[test]
    fn bulk_bodies_serialize_as_expected() {
        let body = BulkDeleteBody { ids: &[5, 9] };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"ids":[5,9]}"#);

        let body = BulkUpdateBody {
            ids: &[5],
            patch: StoreTaskPatch { status: Some("done".into()), ..Default::default() },
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"ids":[5],"patch":{"status":"done"}}"#);
    }

    #[test]
    fn endpoint_joins_relative_to_base() {
        let client = HttpStoreClient::new("https://tasks.example.com/api/", Duration::from_secs(3))
            .unwrap();
        assert_eq!(client.endpoint("tasks").unwrap().as_str(), "https://tasks.example.com/api/tasks");
        assert_eq!(
            client.endpoint("tasks/42").unwrap().as_str(),
            "https://tasks.example.com/api/tasks/42"
        );
    }
}
