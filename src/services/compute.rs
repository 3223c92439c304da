//! Outbound client for the R plumber compute backend.
//!
//! Every call is a single attempt with the HTTP client's default limits; the
//! backend runs arbitrarily long statistical jobs, so no timeout is imposed
//! here. Responses are JSON or they are an error.
//!
//! The plumber API reads repeated query keys (`file=a&file=b`), never bracket
//! notation. Parameters are therefore carried as an ordered list of pairs end
//! to end; putting them in a map would silently collapse duplicates.

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use super::uploads::StagedFile;

/// Per-identity namespace parameter; the compute backend isolates its cached
/// artifacts under this directory.
const CACHEDIR_PARAM: &str = "cachedir";

#[derive(Debug, Error)]
pub enum ComputeError {
    /// Backend answered with a non-2xx status and a JSON body to relay.
    #[error("compute backend returned status {status}")]
    Upstream { status: u16, body: Value },

    /// Connection, TLS or body-read failure.
    #[error("compute backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend body was not JSON (success or error alike).
    #[error("compute backend returned a non-JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ComputeClient {
    base_url: String,
    http: reqwest::Client,
}

impl ComputeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Hand staged sample files to the backend's loader.
    ///
    /// Query shape: one `file=<staged path>` per file in input order, one
    /// `filename=<original name>` per file in the same order (positionally
    /// paired with `file`), then exactly one `cachedir`.
    pub async fn load_sample_data(
        &self,
        files: &[StagedFile],
        cachedir: &str,
    ) -> Result<Value, ComputeError> {
        let mut params: Vec<(String, String)> = Vec::with_capacity(files.len() * 2 + 1);

        for file in files {
            params.push(("file".to_string(), file.path.display().to_string()));
        }
        for file in files {
            params.push(("filename".to_string(), file.original_name.clone()));
        }
        params.push((CACHEDIR_PARAM.to_string(), cachedir.to_string()));

        self.dispatch(Method::GET, "load-sample-data", &params).await
    }

    /// Pass a client request through to `<base>/<api>`.
    ///
    /// Client parameters are forwarded in order, duplicates included. Any
    /// client-supplied `cachedir` is dropped first: the identity-derived one
    /// must be the only one on the wire, or callers could read each other's
    /// cached artifacts.
    pub async fn forward(
        &self,
        method: Method,
        api: &str,
        client_params: Vec<(String, String)>,
        cachedir: &str,
    ) -> Result<Value, ComputeError> {
        let mut params: Vec<(String, String)> = client_params
            .into_iter()
            .filter(|(key, _)| key != CACHEDIR_PARAM)
            .collect();
        params.push((CACHEDIR_PARAM.to_string(), cachedir.to_string()));

        self.dispatch(method, api, &params).await
    }

    async fn dispatch(
        &self,
        method: Method,
        api: &str,
        params: &[(String, String)],
    ) -> Result<Value, ComputeError> {
        let url = format!("{}/{}", self.base_url, api);

        tracing::debug!(method = %method, url = %url, "forwarding to compute backend");

        // reqwest serializes a slice of pairs as repeated keys, which is
        // exactly the encoding plumber expects.
        let response = self
            .http
            .request(method, &url)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text)?;
            return Err(ComputeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::RawQuery,
        http::StatusCode,
        routing::{delete, get},
    };
    use serde_json::json;

    use super::*;

    type Captured = Arc<Mutex<Option<String>>>;

    /// Start a one-route mock backend that records the raw query string it
    /// received and answers with `reply`.
    async fn spawn_backend(path: &'static str, method: &str, reply: Value) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let sink = captured.clone();

        let handler = move |RawQuery(query): RawQuery| {
            let sink = sink.clone();
            let reply = reply.clone();
            async move {
                *sink.lock().unwrap() = query;
                Json(reply)
            }
        };

        let route = match method {
            "DELETE" => delete(handler),
            _ => get(handler),
        };
        let app = Router::new().route(path, route);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        (format!("http://{addr}"), captured)
    }

    fn pairs(raw: &Option<String>) -> Vec<(String, String)> {
        url::form_urlencoded::parse(raw.as_deref().unwrap_or_default().as_bytes())
            .into_owned()
            .collect()
    }

    fn staged(path: &str, original: &str) -> StagedFile {
        StagedFile {
            path: PathBuf::from(path),
            original_name: original.to_string(),
        }
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let client = ComputeClient::new("http://localhost:5555/");
        assert_eq!(client.base_url(), "http://localhost:5555");
    }

    #[tokio::test]
    async fn load_sample_data_sends_positionally_paired_repeated_keys() {
        let (base, captured) =
            spawn_backend("/load-sample-data", "GET", json!({ "loaded": 2 })).await;
        let client = ComputeClient::new(&base);

        let files = [
            staged("/tmp/seamless/uploads/9a1b", "a.csv"),
            staged("/tmp/seamless/uploads/77fe", "b.csv"),
        ];

        let body = client
            .load_sample_data(&files, "cache/researcher@example.org")
            .await
            .unwrap();
        assert_eq!(body, json!({ "loaded": 2 }));

        assert_eq!(
            pairs(&captured.lock().unwrap()),
            vec![
                ("file".to_string(), "/tmp/seamless/uploads/9a1b".to_string()),
                ("file".to_string(), "/tmp/seamless/uploads/77fe".to_string()),
                ("filename".to_string(), "a.csv".to_string()),
                ("filename".to_string(), "b.csv".to_string()),
                (
                    "cachedir".to_string(),
                    "cache/researcher@example.org".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn forward_appends_cachedir_after_client_params() {
        let (base, captured) = spawn_backend("/tsne", "GET", json!({ "points": [] })).await;
        let client = ComputeClient::new(&base);

        client
            .forward(
                Method::GET,
                "tsne",
                vec![("perplexity".to_string(), "30".to_string())],
                "cache/researcher@example.org",
            )
            .await
            .unwrap();

        assert_eq!(
            pairs(&captured.lock().unwrap()),
            vec![
                ("perplexity".to_string(), "30".to_string()),
                (
                    "cachedir".to_string(),
                    "cache/researcher@example.org".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn forward_drops_client_supplied_cachedir() {
        let (base, captured) = spawn_backend("/cache-files", "GET", json!([])).await;
        let client = ComputeClient::new(&base);

        client
            .forward(
                Method::GET,
                "cache-files",
                vec![("cachedir".to_string(), "cache/someone-else".to_string())],
                "cache/me@example.org",
            )
            .await
            .unwrap();

        assert_eq!(
            pairs(&captured.lock().unwrap()),
            vec![("cachedir".to_string(), "cache/me@example.org".to_string())]
        );
    }

    #[tokio::test]
    async fn forward_preserves_duplicate_client_keys_in_order() {
        let (base, captured) = spawn_backend("/gene-expression", "GET", json!({})).await;
        let client = ComputeClient::new(&base);

        client
            .forward(
                Method::GET,
                "gene-expression",
                vec![
                    ("gene".to_string(), "TP53".to_string()),
                    ("gene".to_string(), "KRAS".to_string()),
                ],
                "cache/me@example.org",
            )
            .await
            .unwrap();

        let got = pairs(&captured.lock().unwrap());
        assert_eq!(got[0], ("gene".to_string(), "TP53".to_string()));
        assert_eq!(got[1], ("gene".to_string(), "KRAS".to_string()));
        assert_eq!(got.len(), 3);
    }

    #[tokio::test]
    async fn forward_issues_delete_when_asked() {
        let (base, captured) = spawn_backend("/delete-cache-file", "DELETE", json!(true)).await;
        let client = ComputeClient::new(&base);

        let body = client
            .forward(
                Method::DELETE,
                "delete-cache-file",
                vec![("file".to_string(), "old.rds".to_string())],
                "cache/me@example.org",
            )
            .await
            .unwrap();

        assert_eq!(body, json!(true));
        assert!(captured.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_body() {
        let app = Router::new().route(
            "/knn",
            get(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "error": "k out of range" })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let client = ComputeClient::new(&format!("http://{addr}"));
        let err = client
            .forward(Method::GET, "knn", Vec::new(), "cache/me@example.org")
            .await
            .unwrap_err();

        match err {
            ComputeError::Upstream { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, json!({ "error": "k out of range" }));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_rejected() {
        let app = Router::new().route("/qc-metrics", get(|| async { "<html>oops</html>" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let client = ComputeClient::new(&format!("http://{addr}"));
        let err = client
            .forward(Method::GET, "qc-metrics", Vec::new(), "cache/me@example.org")
            .await
            .unwrap_err();

        assert!(matches!(err, ComputeError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = ComputeClient::new("http://127.0.0.1:9");
        let err = client
            .forward(Method::GET, "tsne", Vec::new(), "cache/me@example.org")
            .await
            .unwrap_err();

        assert!(matches!(err, ComputeError::Transport(_)));
    }
}
