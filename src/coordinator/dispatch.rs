//! Runs fetch requests on the tokio runtime.
//!
//! Each request becomes one spawned task. The task awaits the backend call
//! and sends a [`FetchOutcome`] back over an unbounded channel; the UI loop
//! drains that channel between frames. Tasks are never aborted: a result that
//! arrives after the UI loop has exited is dropped with a debug line.
//! Opening a URL runs on the blocking pool because the system handler is a
//! child process.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, Instrument};

use super::{FetchOutcome, FetchRequest};
use crate::api::ApiClient;
use crate::launch;
use crate::DashboardError;

/// Spawns backend calls and reports their outcomes.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Arc<ApiClient>,
    tx: UnboundedSender<FetchOutcome>,
    handle: Handle,
}

impl Dispatcher {
    /// Creates a dispatcher that spawns onto `handle`.
    ///
    /// # Arguments
    /// * `client` - Backend client shared by all tasks.
    /// * `tx` - Where outcomes are sent.
    /// * `handle` - Runtime the tasks run on.
    pub fn new(client: ApiClient, tx: UnboundedSender<FetchOutcome>, handle: Handle) -> Self {
        Self {
            client: Arc::new(client),
            tx,
            handle,
        }
    }

    /// Starts one request.
    pub fn dispatch(&self, request: FetchRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let span = tracing::debug_span!("fetch", request = request_name(&request));
        self.handle.spawn(
            async move {
                let outcome = execute(&client, request).await;
                if tx.send(outcome).is_err() {
                    debug!("ui loop gone, outcome dropped");
                }
            }
            .instrument(span),
        );
    }

    /// Starts every request in order.
    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = FetchRequest>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}

fn request_name(request: &FetchRequest) -> &'static str {
    match request {
        FetchRequest::Timetable { .. } => "timetable",
        FetchRequest::Weekly { .. } => "weekly",
        FetchRequest::Weather { .. } => "weather",
        FetchRequest::Language { .. } => "language",
        FetchRequest::Chat { .. } => "chat",
        FetchRequest::IsyStatus => "isy_status",
        FetchRequest::IsyLogin { .. } => "isy_login",
        FetchRequest::IsyLogout => "isy_logout",
        FetchRequest::IsyMessages { .. } => "isy_messages",
        FetchRequest::IsyMessage { .. } => "isy_message",
        FetchRequest::IsyArchive { .. } => "isy_archive",
        FetchRequest::OpenUrl { .. } => "open_url",
    }
}

/// Performs one request against the backend.
///
/// Exposed so the request/outcome mapping can be exercised without a
/// dispatcher or UI loop.
pub async fn execute(client: &ApiClient, request: FetchRequest) -> FetchOutcome {
    match request {
        FetchRequest::Timetable { seq, source } => FetchOutcome::Timetable {
            seq,
            source,
            result: client.timetable(source).await,
        },
        FetchRequest::Weekly { seq } => FetchOutcome::Weekly {
            seq,
            result: client.weekly().await,
        },
        FetchRequest::Weather { seq } => FetchOutcome::Weather {
            seq,
            result: client.weather().await,
        },
        FetchRequest::Language { language } => FetchOutcome::Language {
            language,
            result: client.language_pack(language).await,
        },
        FetchRequest::Chat { message, history } => {
            let result = client.chat(&message, &history).await;
            FetchOutcome::Chat { message, result }
        }
        FetchRequest::IsyStatus => FetchOutcome::IsyStatus(client.isy_status().await),
        FetchRequest::IsyLogin { username, password } => {
            let result = client.isy_login(&username, &password).await;
            FetchOutcome::IsyLogin { username, result }
        }
        FetchRequest::IsyLogout => FetchOutcome::IsyLogout(client.isy_logout().await),
        FetchRequest::IsyMessages { seq, folder } => FetchOutcome::IsyMessages {
            seq,
            folder,
            result: client.isy_messages(folder).await,
        },
        FetchRequest::IsyMessage { seq, id } => FetchOutcome::IsyMessage {
            seq,
            result: client.isy_message(&id).await,
        },
        FetchRequest::IsyArchive { id } => {
            let result = client.isy_archive(&id).await;
            FetchOutcome::IsyArchive { id, result }
        }
        FetchRequest::OpenUrl { url } => {
            let target = url.clone();
            let result = tokio::task::spawn_blocking(move || launch::open_in_browser(&target))
                .await
                .unwrap_or_else(|e| Err(DashboardError::Other(e.to_string())));
            FetchOutcome::Opened { url, result }
        }
    }
}
