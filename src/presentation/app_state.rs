// Application state for HTTP handlers
use crate::application::chart_service::ChartController;
use crate::application::credential_provider::{CredentialProvider, Session};
use crate::application::readings_repository::{FetchWindow, ReadingsRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A signed-in client: its session and the chart it is looking at.
pub struct ClientSession {
    pub session: Session,
    pub chart: ChartController,
}

pub struct AppState {
    pub credentials: Arc<dyn CredentialProvider>,
    repository: Arc<dyn ReadingsRepository>,
    window: FetchWindow,
    sessions: RwLock<HashMap<String, Arc<ClientSession>>>,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        repository: Arc<dyn ReadingsRepository>,
        window: FetchWindow,
    ) -> Self {
        Self {
            credentials,
            repository,
            window,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a fresh session with its own chart, returning the client id
    pub async fn open_session(&self, session: Session) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let chart = ChartController::new(self.credentials.clone(), self.repository.clone(), self.window);
        let client = Arc::new(ClientSession { session, chart });
        self.sessions.write().await.insert(id.clone(), client);
        id
    }

    pub async fn client(&self, id: &str) -> Option<Arc<ClientSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Remove a client and abandon its pending refreshes
    pub async fn close_session(&self, id: &str) -> Option<Arc<ClientSession>> {
        let client = self.sessions.write().await.remove(id)?;
        client.chart.dispose();
        Some(client)
    }

    /// Like `close_session`, but only while `id` still maps to `expected`.
    pub async fn close_session_if(&self, id: &str, expected: &Arc<ClientSession>) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(id) {
            Some(current) if Arc::ptr_eq(current, expected) => {
                if let Some(client) = sessions.remove(id) {
                    client.chart.dispose();
                }
                true
            }
            _ => false,
        }
    }

    pub async fn close_all(&self) {
        let mut sessions = self.sessions.write().await;
        for (_, client) in sessions.drain() {
            client.chart.dispose();
        }
    }
}
