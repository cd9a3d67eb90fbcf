// GraphQL readings repository implementation
use crate::application::error::FetchError;
use crate::application::readings_repository::{FetchWindow, ReadingsRepository};
use crate::domain::reading::RawReading;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GraphqlReadingsRepository {
    client: reqwest::Client,
    endpoint: String,
    origin: Option<String>,
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<AuroraData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct AuroraData {
    #[serde(rename = "auroraEntries", default)]
    aurora_entries: Option<Vec<RawReading>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

impl GraphqlReadingsRepository {
    pub fn new(endpoint: String, origin: Option<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            origin,
        })
    }

    pub fn build_query(window: FetchWindow) -> String {
        format!(
            "query {{ auroraEntries(days: {}) {{ epochtime statusId value }} }}",
            window.as_days()
        )
    }

    fn parse_response(body: &str) -> Result<Vec<RawReading>, FetchError> {
        let response: GraphqlResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        match response.data {
            Some(data) => {
                if !response.errors.is_empty() {
                    tracing::warn!(
                        errors = response.errors.len(),
                        "Readings query returned partial data with errors"
                    );
                }
                Ok(data.aurora_entries.unwrap_or_default())
            }
            None if !response.errors.is_empty() => {
                let messages: Vec<String> =
                    response.errors.into_iter().map(|e| e.message).collect();
                Err(FetchError::Graphql(messages.join("; ")))
            }
            None => Err(FetchError::Malformed("response has no data".to_string())),
        }
    }
}

#[async_trait]
impl ReadingsRepository for GraphqlReadingsRepository {
    async fn fetch_readings(
        &self,
        token: &str,
        window: FetchWindow,
    ) -> Result<Vec<RawReading>, FetchError> {
        let query = Self::build_query(window);
        tracing::debug!(
            endpoint = %self.endpoint,
            days = window.as_days(),
            token_len = token.len(),
            "Requesting readings"
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&GraphqlRequest { query: &query });
        if let Some(origin) = &self.origin {
            request = request.header(reqwest::header::ORIGIN, origin);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let readings = Self::parse_response(&body)?;

        tracing::debug!(count = readings.len(), "Received readings");
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::Router;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default, Clone)]
    struct Captured {
        authorization: Option<String>,
        origin: Option<String>,
        body: String,
    }

    struct Endpoint {
        status: AxumStatus,
        body: &'static str,
        captured: Mutex<Option<Captured>>,
    }

    async fn handle(
        State(endpoint): State<Arc<Endpoint>>,
        headers: HeaderMap,
        body: String,
    ) -> (AxumStatus, &'static str) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        *endpoint.captured.lock().unwrap() = Some(Captured {
            authorization: header("authorization"),
            origin: header("origin"),
            body,
        });
        (endpoint.status, endpoint.body)
    }

    async fn spawn_endpoint(status: AxumStatus, body: &'static str) -> (String, Arc<Endpoint>) {
        let endpoint = Arc::new(Endpoint {
            status,
            body,
            captured: Mutex::new(None),
        });
        let router = Router::new()
            .route("/graphql", post(handle))
            .with_state(endpoint.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{}/graphql", addr), endpoint)
    }

    fn repository(url: String, origin: Option<&str>) -> GraphqlReadingsRepository {
        GraphqlReadingsRepository::new(url, origin.map(str::to_string), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            GraphqlReadingsRepository::build_query(FetchWindow::days(1)),
            "query { auroraEntries(days: 1) { epochtime statusId value } }"
        );
    }

    #[test]
    fn test_parse_response_shapes() {
        let readings = GraphqlReadingsRepository::parse_response(
            r#"{"data":{"auroraEntries":[{"epochtime":1704067200,"statusId":"green","value":"5"}]}}"#,
        )
        .unwrap();
        assert_eq!(readings, vec![RawReading::new(1704067200, "5", "green")]);

        let empty =
            GraphqlReadingsRepository::parse_response(r#"{"data":{"auroraEntries":null}}"#).unwrap();
        assert!(empty.is_empty());

        let error = GraphqlReadingsRepository::parse_response(
            r#"{"errors":[{"message":"Cannot query field"},{"message":"second"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(error, FetchError::Graphql(ref m) if m == "Cannot query field; second"));

        let error = GraphqlReadingsRepository::parse_response(r#"{"data":{"auroraEntries":{}}}"#)
            .unwrap_err();
        assert!(matches!(error, FetchError::Malformed(_)));

        let error = GraphqlReadingsRepository::parse_response("{}").unwrap_err();
        assert!(matches!(error, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_query() {
        let (url, endpoint) = spawn_endpoint(
            AxumStatus::OK,
            r#"{"data":{"auroraEntries":[
                {"epochtime":1704240000,"statusId":"red","value":3},
                {"epochtime":1704067200,"statusId":"green","value":5}
            ]}}"#,
        )
        .await;
        let repo = repository(url, Some("https://cdn.example.com"));

        let readings = repo
            .fetch_readings("abc.def.ghi", FetchWindow::days(1))
            .await
            .unwrap();

        assert_eq!(readings.len(), 2);
        let captured = endpoint.captured.lock().unwrap().clone().unwrap();
        assert_eq!(captured.authorization.as_deref(), Some("Bearer abc.def.ghi"));
        assert_eq!(captured.origin.as_deref(), Some("https://cdn.example.com"));
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(
            body["query"],
            "query { auroraEntries(days: 1) { epochtime statusId value } }"
        );
    }

    #[tokio::test]
    async fn test_non_2xx_is_typed() {
        let (url, _) = spawn_endpoint(AxumStatus::INTERNAL_SERVER_ERROR, "boom").await;
        let error = repository(url, None)
            .fetch_readings("t", FetchWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Status { status: 500, ref body } if body == "boom"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_typed() {
        let (url, _) = spawn_endpoint(AxumStatus::UNAUTHORIZED, "").await;
        let error = repository(url, None)
            .fetch_readings("t", FetchWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Unauthorized(401)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_typed() {
        let (url, _) = spawn_endpoint(AxumStatus::OK, "<html>not json</html>").await;
        let error = repository(url, None)
            .fetch_readings("t", FetchWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = repository(format!("http://{}/graphql", addr), None)
            .fetch_readings("t", FetchWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Transport(_)));
    }
}
