// [libs/infra/coordinator-client/src/client.rs]
//! `reqwest`-backed `CoordinatorApi`, with exponential backoff around
//! every call.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use agent_domain_models::{AttackDescriptor, CrackResult, CrackerStatus, ServerState, Task};

use crate::api::{error_report, CoordinatorApi};
use crate::errors::CoordinatorError;
use crate::types::{AgentAuthResponse, ErrorSeverity, HeartbeatResponse, RemoteAgentConfig};

const MIN_RETRIES: u32 = 5;
const MIN_BACKOFF: Duration = Duration::from_secs(5);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

pub struct ReqwestCoordinatorClient {
    http: Client,
    base_url: String,
    agent_id: Mutex<Option<String>>,
}

impl ReqwestCoordinatorClient {
    pub fn new(base_url: impl Into<String>, api_token: &str) -> Result<Self, CoordinatorError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_token}"))
            .expect("token contains only valid header characters");
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent_id: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Runs `attempt` with exponential backoff: at least 5 tries,
    /// 5s-30s between attempts, doubling each time, retrying only on
    /// network errors and the 5xx/408/429 status classes.
    async fn with_retry<T, F, Fut>(&self, mut attempt: F) -> Result<T, CoordinatorError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoordinatorError>>,
    {
        let mut delay = MIN_BACKOFF;
        let mut tries = 0u32;
        loop {
            tries += 1;
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && tries < MIN_RETRIES => {
                    tracing::warn!(%error, tries, "coordinator call failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_BACKOFF);
                }
                Err(error) if error.is_retryable() => {
                    tracing::error!(%error, tries, "coordinator call exhausted retries");
                    return Err(CoordinatorError::RetriesExhausted);
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, CoordinatorError> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CoordinatorError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CoordinatorError::ServerRejection {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl CoordinatorApi for ReqwestCoordinatorClient {
    async fn authenticate(&self) -> Result<String, CoordinatorError> {
        let agent_id = self
            .with_retry(|| async {
                let response = self
                    .send_json::<()>(reqwest::Method::POST, "/api/v1/client/authenticate", None)
                    .await?;
                Ok(response.json::<AgentAuthResponse>().await?.agent_id)
            })
            .await?;
        *self.agent_id.lock().expect("lock poisoned") = Some(agent_id.clone());
        Ok(agent_id)
    }

    async fn get_agent_configuration(&self) -> Result<RemoteAgentConfig, CoordinatorError> {
        self.with_retry(|| async {
            let response = self
                .send_json::<()>(reqwest::Method::GET, "/api/v1/client/configuration", None)
                .await?;
            Ok(response.json::<RemoteAgentConfig>().await?)
        })
        .await
    }

    async fn get_new_task(&self) -> Result<Option<Task>, CoordinatorError> {
        self.with_retry(|| async {
            let response = self
                .send_json::<()>(reqwest::Method::GET, "/api/v1/client/tasks/new", None)
                .await?;
            if response.status() == StatusCode::NO_CONTENT {
                Ok(None)
            } else {
                Ok(Some(response.json::<Task>().await?))
            }
        })
        .await
    }

    async fn accept_task(&self, task: &Task) -> Result<(), CoordinatorError> {
        self.with_retry(|| async {
            self.send_json::<()>(
                reqwest::Method::POST,
                &format!("/api/v1/client/tasks/{}/accept", task.id),
                None,
            )
            .await?;
            Ok(())
        })
        .await
    }

    async fn abandon_task(&self, task: &Task) -> Result<(), CoordinatorError> {
        self.with_retry(|| async {
            self.send_json::<()>(
                reqwest::Method::POST,
                &format!("/api/v1/client/tasks/{}/abandon", task.id),
                None,
            )
            .await?;
            Ok(())
        })
        .await
    }

    async fn get_attack_parameters(
        &self,
        attack_id: &str,
    ) -> Result<AttackDescriptor, CoordinatorError> {
        self.with_retry(|| async {
            let response = self
                .send_json::<()>(
                    reqwest::Method::GET,
                    &format!("/api/v1/client/attacks/{attack_id}"),
                    None,
                )
                .await?;
            Ok(response.json::<AttackDescriptor>().await?)
        })
        .await
    }

    async fn submit_status(
        &self,
        task: &Task,
        status: &CrackerStatus,
    ) -> Result<(), CoordinatorError> {
        self.with_retry(|| async {
            self.send_json(
                reqwest::Method::POST,
                &format!("/api/v1/client/tasks/{}/submit_status", task.id),
                Some(status),
            )
            .await?;
            Ok(())
        })
        .await
    }

    async fn submit_crack(&self, task: &Task, result: &CrackResult) -> Result<(), CoordinatorError> {
        self.with_retry(|| async {
            self.send_json(
                reqwest::Method::POST,
                &format!("/api/v1/client/tasks/{}/submit_crack", task.id),
                Some(result),
            )
            .await?;
            Ok(())
        })
        .await
    }

    async fn submit_agent_error(
        &self,
        message: &str,
        task: Option<&Task>,
        severity: ErrorSeverity,
    ) -> Result<(), CoordinatorError> {
        let report = error_report(message, task.map(|t| t.id.as_str()), severity);
        self.with_retry(|| async {
            self.send_json(reqwest::Method::POST, "/api/v1/client/agents/errors", Some(&report))
                .await?;
            Ok(())
        })
        .await
    }

    async fn report_exhausted(&self, task: &Task) -> Result<(), CoordinatorError> {
        self.with_retry(|| async {
            self.send_json::<()>(
                reqwest::Method::POST,
                &format!("/api/v1/client/tasks/{}/exhausted", task.id),
                None,
            )
            .await?;
            Ok(())
        })
        .await
    }

    async fn send_heartbeat(&self) -> Result<ServerState, CoordinatorError> {
        self.with_retry(|| async {
            let response = self
                .send_json::<()>(reqwest::Method::POST, "/api/v1/client/agents/heartbeat", None)
                .await?;
            Ok(response.json::<HeartbeatResponse>().await?.state)
        })
        .await
    }

    async fn send_shutdown(&self) -> Result<(), CoordinatorError> {
        self.with_retry(|| async {
            self.send_json::<()>(reqwest::Method::POST, "/api/v1/client/agents/shutdown", None)
                .await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn new_trims_trailing_slash_from_base_url() {
        let client = ReqwestCoordinatorClient::new("https://coordinator.example/", "a-token").unwrap();
        assert_eq!(client.url("/api/v1/ping"), "https://coordinator.example/api/v1/ping");
    }

    #[tokio::test]
    async fn with_retry_stops_immediately_on_non_retryable_error() {
        let client = ReqwestCoordinatorClient::new("https://coordinator.example", "a-token").unwrap();
        let calls = AtomicU32::new(0);

        let result: Result<(), CoordinatorError> = client
            .with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CoordinatorError::Unauthorized) }
            })
            .await;

        assert!(matches!(result, Err(CoordinatorError::Unauthorized)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn with_retry_gives_up_after_minimum_retry_count() {
        let client = ReqwestCoordinatorClient::new("https://coordinator.example", "a-token").unwrap();
        let calls = AtomicU32::new(0);

        let result: Result<(), CoordinatorError> = client
            .with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(CoordinatorError::ServerRejection {
                        status: 503,
                        body: String::new(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(CoordinatorError::RetriesExhausted)));
        assert_eq!(calls.load(Ordering::SeqCst), MIN_RETRIES);
    }
}
