//! HTTP client for the dashboard backend.
//!
//! ## Responsibility
//! One method per backend endpoint, each returning typed data or a
//! [`DashboardError`]. Bodies are decoded even for non-2xx statuses because the
//! backend reports errors as JSON with a 4xx/5xx status.
//!
//! ## Guarantees
//! - Every request carries the configured timeout
//! - The ISY session cookie is kept for the lifetime of the client
//! - `login_required` from any ISY endpoint maps to [`DashboardError::LoginRequired`]

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{
    AckResponse, ArchiveRequest, ChatRequest, ChatResponse, ChatTurn, IsyStatus, LanguagePack,
    LoginRequest, MessageDetail, MessageDetailResponse, MessageFolder, MessageId,
    MessageSummary, MessagesResponse, TimetableResponse, WeatherReport, WeatherResponse,
    WeeklyResponse,
};
use crate::i18n::Language;
use crate::DashboardError;

/// Where a timetable comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimetableSource {
    /// Pre-baked static snapshot for the first paint.
    Snapshot,
    /// The live backend.
    Live,
}

impl TimetableSource {
    /// Endpoint path.
    pub fn path(self) -> &'static str {
        match self {
            Self::Snapshot => "/static/fast_timetable.json",
            Self::Live => "/api/timetable?mode=auto",
        }
    }
}

/// Typed client for every endpoint the dashboard consumes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    /// Returns [`DashboardError::Http`] if the TLS backend cannot initialise.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the timetable from the snapshot or the live endpoint.
    #[instrument(skip(self))]
    pub async fn timetable(
        &self,
        source: TimetableSource,
    ) -> Result<TimetableResponse, DashboardError> {
        self.get_json(source.path()).await
    }

    /// Fetches the seven-day schedule.
    pub async fn weekly(&self) -> Result<WeeklyResponse, DashboardError> {
        self.get_json("/api/weekly?mode=auto").await
    }

    /// Fetches current weather. A backend `error` body is a valid report.
    pub async fn weather(&self) -> Result<WeatherReport, DashboardError> {
        let endpoint = "/api/weather";
        let body: WeatherResponse = self.get_json(endpoint).await?;
        body.into_report().ok_or_else(|| DashboardError::Decode {
            endpoint: endpoint.to_string(),
            reason: "weder Temperatur noch Fehler in der Antwort".to_string(),
        })
    }

    /// Sends a chat message with the prior conversation.
    ///
    /// # Errors
    /// [`DashboardError::Backend`] carries the backend's `error` text.
    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<String, DashboardError> {
        let endpoint = "/api/ai/chat";
        let response = self
            .client
            .post(self.url(endpoint))
            .timeout(self.timeout)
            .json(&ChatRequest { message, history })
            .send()
            .await?;
        let body: ChatResponse = decode(endpoint, response).await?;
        match (body.response, body.error) {
            (_, Some(error)) => Err(DashboardError::Backend(error)),
            (Some(reply), None) => Ok(reply),
            (None, None) => Err(DashboardError::Decode {
                endpoint: endpoint.to_string(),
                reason: "Antwort ohne Text".to_string(),
            }),
        }
    }

    /// Fetches the UI string table for `language`.
    pub async fn language_pack(&self, language: Language) -> Result<LanguagePack, DashboardError> {
        self.get_json(&format!("/static/lang/{}.json", language.code()))
            .await
    }

    /// Reports whether the backend holds a live ISY session.
    pub async fn isy_status(&self) -> Result<IsyStatus, DashboardError> {
        self.get_json("/api/isy/status").await
    }

    /// Logs in to ISY.
    #[instrument(skip(self, password))]
    pub async fn isy_login(&self, username: &str, password: &str) -> Result<(), DashboardError> {
        let endpoint = "/api/isy/login";
        let response = self
            .client
            .post(self.url(endpoint))
            .timeout(self.timeout)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        ack(decode(endpoint, response).await?)
    }

    /// Ends the ISY session.
    pub async fn isy_logout(&self) -> Result<(), DashboardError> {
        let endpoint = "/api/isy/logout";
        let response = self
            .client
            .post(self.url(endpoint))
            .timeout(self.timeout)
            .send()
            .await?;
        ack(decode(endpoint, response).await?)
    }

    /// Lists messages in `folder`.
    pub async fn isy_messages(
        &self,
        folder: MessageFolder,
    ) -> Result<Vec<MessageSummary>, DashboardError> {
        let body: MessagesResponse = self.get_json(folder.path()).await?;
        if body.login_required {
            return Err(DashboardError::LoginRequired);
        }
        if let Some(error) = body.error {
            return Err(DashboardError::Backend(error));
        }
        Ok(body.messages)
    }

    /// Fetches one message.
    pub async fn isy_message(&self, id: &MessageId) -> Result<MessageDetail, DashboardError> {
        let endpoint = format!("/api/isy/message/{id}");
        let body: MessageDetailResponse = self.get_json(&endpoint).await?;
        if body.login_required {
            return Err(DashboardError::LoginRequired);
        }
        if let Some(error) = body.error {
            return Err(DashboardError::Backend(error));
        }
        body.message.ok_or(DashboardError::Decode {
            endpoint,
            reason: "Mitteilung fehlt in der Antwort".to_string(),
        })
    }

    /// Moves a message to the archive.
    pub async fn isy_archive(&self, id: &MessageId) -> Result<(), DashboardError> {
        let endpoint = "/api/isy/archive-message";
        let response = self
            .client
            .post(self.url(endpoint))
            .timeout(self.timeout)
            .json(&ArchiveRequest { id })
            .send()
            .await?;
        ack(decode(endpoint, response).await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, DashboardError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .timeout(self.timeout)
            .send()
            .await?;
        decode(endpoint, response).await
    }
}

/// Decodes a JSON body regardless of status. If the body does not decode, a
/// failing status is reported in preference to the decoder message.
async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, DashboardError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    debug!(endpoint, status = status.as_u16(), len = bytes.len(), "response received");

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(DashboardError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        }),
        Err(e) => Err(DashboardError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn ack(body: AckResponse) -> Result<(), DashboardError> {
    if body.login_required {
        return Err(DashboardError::LoginRequired);
    }
    if let Some(error) = body.error {
        return Err(DashboardError::Backend(error));
    }
    if !body.success {
        return Err(DashboardError::Backend("Aktion fehlgeschlagen".to_string()));
    }
    Ok(())
}
