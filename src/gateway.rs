//! Client for the Myvivio HTTP API.
//!
//! Every authenticated operation takes the current bearer token. Without one
//! the call never reaches the network and answers [`Outcome::Unauthenticated`].

use crate::errors::GatewayError;
use crate::models::{
    AiMetrics, DashboardStats, LoginRequest, LoginResponse, NewActivity, Program, Registration,
    ScheduledActivity,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const LOGIN_ERROR: &str = "Erro ao fazer login";
pub const REGISTER_ERROR: &str = "Erro ao registrar";
pub const DASHBOARD_ERROR: &str = "Erro ao carregar dashboard";
pub const METRICS_ERROR: &str = "Erro ao carregar métricas";
pub const HISTORY_ERROR: &str = "Erro ao carregar agendas";
pub const CREATE_ACTIVITY_ERROR: &str = "Erro ao criar agenda";
pub const COMPLETE_ACTIVITY_ERROR: &str = "Erro ao concluir agenda";
pub const PROGRAMS_ERROR: &str = "Erro ao carregar programas";

/// Result of an authenticated call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// No session token; the request was not sent.
    Unauthenticated,
    Failure(GatewayError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T, GatewayError>> for Outcome<T> {
    fn from(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, GatewayError>;

    async fn register(&self, registration: &Registration) -> Result<(), GatewayError>;

    async fn fetch_overview_stats(&self, token: Option<&str>) -> Outcome<DashboardStats>;

    async fn fetch_ai_metrics(&self, token: Option<&str>, unit_id: u32) -> Outcome<AiMetrics>;

    async fn fetch_activity_history(&self, token: Option<&str>) -> Outcome<Vec<ScheduledActivity>>;

    async fn create_activity(&self, token: Option<&str>, activity: &NewActivity) -> Outcome<()>;

    async fn complete_activity(&self, token: Option<&str>, id: u64) -> Outcome<()>;

    async fn fetch_programs(&self, token: Option<&str>) -> Outcome<Vec<Program>>;
}

/// Talks to a live backend.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client.request(method, self.url(path)).bearer_auth(token)
    }

    async fn send(&self, request: RequestBuilder, generic: &str) -> Result<Response, GatewayError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "network error");
            GatewayError::Transport(generic.to_string())
        })?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            url = %response.url().path(),
            duration_ms = start.elapsed().as_millis(),
            "api response"
        );

        if status.is_success() {
            Ok(response)
        } else {
            let detail = read_error_detail(response).await;
            Err(GatewayError::Transport(
                detail.unwrap_or_else(|| generic.to_string()),
            ))
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        generic: &str,
    ) -> Result<T, GatewayError> {
        let response = self.send(request, generic).await?;
        response.json::<T>().await.map_err(|err| {
            warn!(error = %err, "failed to parse response");
            GatewayError::Transport(generic.to_string())
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, GatewayError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "login network error");
                GatewayError::Transport(LOGIN_ERROR.to_string())
            })?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "login rejected");
            return Err(GatewayError::Authentication);
        }

        let login = response.json::<LoginResponse>().await.map_err(|err| {
            warn!(error = %err, "failed to parse login response");
            GatewayError::Transport(LOGIN_ERROR.to_string())
        })?;
        info!("login successful");
        Ok(login)
    }

    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        let request = self.client.post(self.url("/registrar")).json(registration);
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "register network error");
            GatewayError::Transport(REGISTER_ERROR.to_string())
        })?;

        if response.status().is_success() {
            info!("registration accepted");
            return Ok(());
        }

        let status = response.status().as_u16();
        let detail = read_error_detail(response).await;
        warn!(status, detail = ?detail, "registration rejected");
        Err(GatewayError::Validation(
            detail.unwrap_or_else(|| REGISTER_ERROR.to_string()),
        ))
    }

    async fn fetch_overview_stats(&self, token: Option<&str>) -> Outcome<DashboardStats> {
        let Some(token) = token else {
            return Outcome::Unauthenticated;
        };
        let request = self.authed(Method::GET, "/stats/overview", token);
        self.send_json(request, DASHBOARD_ERROR).await.into()
    }

    async fn fetch_ai_metrics(&self, token: Option<&str>, unit_id: u32) -> Outcome<AiMetrics> {
        let Some(token) = token else {
            return Outcome::Unauthenticated;
        };
        let request = self
            .authed(Method::GET, "/metricas/ia", token)
            .query(&[("unidade_id", unit_id)]);
        self.send_json(request, METRICS_ERROR).await.into()
    }

    async fn fetch_activity_history(&self, token: Option<&str>) -> Outcome<Vec<ScheduledActivity>> {
        let Some(token) = token else {
            return Outcome::Unauthenticated;
        };
        let request = self.authed(Method::GET, "/agendas/historico", token);
        self.send_json(request, HISTORY_ERROR).await.into()
    }

    async fn create_activity(&self, token: Option<&str>, activity: &NewActivity) -> Outcome<()> {
        let Some(token) = token else {
            return Outcome::Unauthenticated;
        };
        let request = self
            .authed(Method::POST, "/agendas/criar", token)
            .json(activity);
        self.send(request, CREATE_ACTIVITY_ERROR)
            .await
            .map(|_| ())
            .into()
    }

    async fn complete_activity(&self, token: Option<&str>, id: u64) -> Outcome<()> {
        let Some(token) = token else {
            return Outcome::Unauthenticated;
        };
        let request = self.authed(Method::PUT, &format!("/agendas/{id}/concluir"), token);
        self.send(request, COMPLETE_ACTIVITY_ERROR)
            .await
            .map(|_| ())
            .into()
    }

    async fn fetch_programs(&self, token: Option<&str>) -> Outcome<Vec<Program>> {
        let Some(token) = token else {
            return Outcome::Unauthenticated;
        };
        let request = self.authed(Method::GET, "/programas", token);
        self.send_json(request, PROGRAMS_ERROR).await.into()
    }
}

async fn read_error_detail(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    error_detail(&bytes)
}

/// Pulls a human-readable `detail` string out of an error body.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}
