// HTTP client for the draft service.
//
// Every endpoint wraps its payload in a uniform envelope
// `{success, data, error?, message?}`. Responses are unwrapped here so the
// rest of the crate works with plain domain types and a small error
// taxonomy: transport failures (retried on the next tick), not-found
// (terminal for that lookup, shown distinctly), and service-reported
// rejections (transient, dismissible).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::draft::reconcile::{check_select, Rejection};
use crate::models::{
    ActionType, Champion, ChampionsPage, DraftStatus, DraftSummary, QueueSnapshot, Role,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource does not exist (e.g. an invalid join code).
    #[error("not found")]
    NotFound,

    /// Network unreachable, timeout, or a malformed response body.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but reported a failure (wrong turn,
    /// already-taken champion, draft closed, ...).
    #[error("{message}")]
    Service { message: String },
}

/// Why a selection attempt did not go through.
#[derive(Debug, Error)]
pub enum SelectError {
    /// Refused locally by the legality gate; no request was made.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The request was made and failed (transport or server rejection).
    #[error(transparent)]
    Api(#[from] ApiError),
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The service's uniform response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope into the payload or a service error.
    fn into_result(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ApiError::Service {
                message: self
                    .error
                    .or(self.message)
                    .unwrap_or_else(|| "service reported failure".to_string()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// DraftApi seam
// ---------------------------------------------------------------------------

/// The two calls the selection path depends on, behind a trait so the
/// gate-then-submit-then-refetch discipline is testable without a server.
#[async_trait]
pub trait DraftApi: Send + Sync {
    async fn fetch_status(&self, code: &str) -> Result<DraftStatus, ApiError>;

    async fn submit_selection(
        &self,
        code: &str,
        champion_id: &str,
        action: ActionType,
    ) -> Result<(), ApiError>;
}

/// Attempt a selection: local legality gate first, then the request.
///
/// An illegal attempt returns `Rejected` without touching the network.
/// The caller must re-fetch status after this returns, success or not;
/// the snapshot is never updated optimistically.
pub async fn attempt_select<A: DraftApi + ?Sized>(
    api: &A,
    code: &str,
    status: Option<&DraftStatus>,
    champion_id: &str,
) -> Result<ActionType, SelectError> {
    let action = check_select(status, champion_id)?;
    api.submit_selection(code, champion_id, action).await?;
    Ok(action)
}

// ---------------------------------------------------------------------------
// Champion query
// ---------------------------------------------------------------------------

/// Filters for the paged champion list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ChampionQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ChampionQuery {
    /// Build the query-string pairs, omitting unset filters.
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(role) = self.role {
            params.push(("role", role.display_str().to_string()));
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                params.push(("search", search.clone()));
            }
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Thin reqwest wrapper over the draft service endpoints.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `https://host:3001/api`).
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self.http.get(&url).query(params).send().await?;
        Self::unwrap_response(response).await
    }

    async fn unwrap_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        let status = response.status();
        let envelope: Envelope<T> = response.json().await?;
        if !status.is_success() {
            warn!(%status, "service returned error status");
        }
        envelope.into_result()
    }

    /// Resolve a join code to a draft summary.
    pub async fn get_draft(&self, code: &str) -> Result<DraftSummary, ApiError> {
        self.get_json(&format!("/drafts/{code}"), &[]).await
    }

    /// Fetch the full status snapshot for a draft.
    pub async fn get_draft_status(&self, code: &str) -> Result<DraftStatus, ApiError> {
        self.get_json(&format!("/drafts/{code}/status"), &[])
            .await
    }

    /// Paged champion list with optional role/search filters.
    pub async fn get_champions(&self, query: &ChampionQuery) -> Result<ChampionsPage, ApiError> {
        self.get_json("/champions", &query.to_params()).await
    }

    /// Single champion by id.
    pub async fn get_champion(&self, champion_id: &str) -> Result<Champion, ApiError> {
        self.get_json(&format!("/champions/{champion_id}"), &[])
            .await
    }

    /// Name search. Unlike the paged list, this endpoint takes the query
    /// in the path and returns a bare champion list.
    pub async fn search_champions(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Champion>, ApiError> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.get_json(&format!("/champions/search/{query}"), &params)
            .await
    }

    /// Per-role queue membership and readiness stats for a guild.
    pub async fn get_guild_queue(
        &self,
        guild_id: &str,
        queue_type: &str,
    ) -> Result<QueueSnapshot, ApiError> {
        let params = [("queueType", queue_type.to_string())];
        self.get_json(&format!("/queues/guild/{guild_id}"), &params)
            .await
    }

    /// Connectivity probe. The health endpoint lives beside `/api`, not
    /// under it, and carries no envelope.
    pub async fn health(&self) -> Result<(), ApiError> {
        let root = self.base_url.trim_end_matches("/api");
        let response = self.http.get(format!("{root}/health")).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Service {
                message: format!("health check returned {}", response.status()),
            })
        }
    }
}

#[async_trait]
impl DraftApi for ApiClient {
    async fn fetch_status(&self, code: &str) -> Result<DraftStatus, ApiError> {
        self.get_draft_status(code).await
    }

    async fn submit_selection(
        &self,
        code: &str,
        champion_id: &str,
        action: ActionType,
    ) -> Result<(), ApiError> {
        let url = format!("{}/drafts/{code}/select", self.base_url);
        let body = serde_json::json!({
            "championId": champion_id,
            "actionType": action.display_str(),
        });
        debug!(%url, champion_id, %action, "POST select");
        let response = self.http.post(&url).json(&body).send().await?;
        // The success payload is just a confirmation message; discard it.
        let _: serde_json::Value = Self::unwrap_response(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
