use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use nd_core::{DocumentStore, Error, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// Document store backed by the GitHub contents API: the repository is the
/// datastore, every write is a commit.
pub struct GithubStore {
    client: Client,
    token: String,
    repo: String,
    base_url: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    sha: String,
}

#[derive(Serialize)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl GithubStore {
    pub fn new(token: String, repo: String) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            token,
            repo,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.base_url, self.repo, path)
    }

    /// Fetch the contents record at `path`, or `None` on 404.
    async fn fetch_contents(&self, path: &str) -> Result<Option<ContentsResponse>> {
        let response = self
            .client
            .get(self.contents_url(path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "GitHub read of {} failed: HTTP {}",
                path,
                response.status()
            )));
        }
        Ok(Some(response.json::<ContentsResponse>().await?))
    }

    async fn put(&self, path: &str, request: &WriteRequest<'_>) -> Result<reqwest::Response> {
        Ok(self
            .client
            .put(self.contents_url(path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(request)
            .send()
            .await?)
    }
}

/// The API returns base64 wrapped at 60 columns; strip the newlines before
/// decoding.
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::Storage(format!("invalid base64 content: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Storage(format!("content is not UTF-8: {}", e)))
}

#[async_trait]
impl DocumentStore for GithubStore {
    async fn read(&self, path: &str) -> Result<Option<String>> {
        match self.fetch_contents(path).await? {
            Some(contents) => {
                let encoded = contents.content.ok_or_else(|| {
                    Error::Storage(format!("{} has no content field", path))
                })?;
                Ok(Some(decode_content(&encoded)?))
            }
            None => Ok(None),
        }
    }

    async fn write(&self, path: &str, content: &str, message: &str) -> Result<()> {
        let sha = self.fetch_contents(path).await?.map(|c| c.sha);
        let updating = sha.is_some();
        let request = WriteRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha,
        };

        let response = self.put(path, &request).await?;
        if response.status().is_success() {
            debug!(path, updating, "document written");
            return Ok(());
        }

        // An update can lose a race with a concurrent commit that changes
        // the sha, or the file may have appeared/vanished since the lookup.
        // One create-shaped retry, then give up.
        let first_status = response.status();
        if updating {
            let retry = WriteRequest {
                message,
                content: request.content.clone(),
                sha: None,
            };
            let response = self.put(path, &retry).await?;
            if response.status().is_success() {
                return Ok(());
            }
        }

        Err(Error::Storage(format!(
            "GitHub write of {} failed: HTTP {}",
            path, first_status
        )))
    }
}

impl fmt::Debug for GithubStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubStore")
            .field("token", &"<redacted>")
            .field("repo", &self.repo)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type PutLog = Arc<Mutex<Vec<Value>>>;

    /// Contents API stand-in. GET serves `existing` (404 when `None`); PUT
    /// bodies are logged and answered with `put_status(body)`.
    async fn spawn_api(
        existing: Option<&str>,
        put_status: fn(&Value) -> AxumStatus,
    ) -> (String, PutLog) {
        let puts: PutLog = Arc::new(Mutex::new(Vec::new()));
        let contents = existing.map(|raw| {
            json!({ "content": STANDARD.encode(raw.as_bytes()), "sha": "oldsha" })
        });

        let get_handler = move || {
            let contents = contents.clone();
            async move {
                match contents {
                    Some(body) => (AxumStatus::OK, Json(body)),
                    None => (AxumStatus::NOT_FOUND, Json(json!({"message": "Not Found"}))),
                }
            }
        };
        let put_handler = {
            let puts = puts.clone();
            move |Json(body): Json<Value>| {
                let puts = puts.clone();
                async move {
                    let status = put_status(&body);
                    puts.lock().unwrap().push(body);
                    status
                }
            }
        };

        let app = Router::new().route(
            "/repos/owner/repo/contents/*path",
            get(get_handler).put(put_handler),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), puts)
    }

    fn store_for(base_url: &str) -> GithubStore {
        GithubStore::new("token".to_string(), "owner/repo".to_string())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn read_decodes_existing_document() {
        let (base_url, _) = spawn_api(Some("[\"https://a\"]"), |_| AxumStatus::OK).await;
        let store = store_for(&base_url);
        let content = store.read("data/feeds.json").await.unwrap();
        assert_eq!(content.as_deref(), Some("[\"https://a\"]"));
    }

    #[tokio::test]
    async fn read_of_missing_file_is_typed_absence() {
        let (base_url, _) = spawn_api(None, |_| AxumStatus::OK).await;
        let store = store_for(&base_url);
        assert!(store.read("data/feeds.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_on_existing_file_sends_current_sha() {
        let (base_url, puts) = spawn_api(Some("[]"), |_| AxumStatus::OK).await;
        let store = store_for(&base_url);
        store
            .write("data/feeds.json", "[\"https://a\"]", "Add new RSS feed")
            .await
            .unwrap();

        let puts = puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0]["sha"], "oldsha");
        assert_eq!(puts[0]["message"], "Add new RSS feed");
        assert_eq!(
            decode_content(puts[0]["content"].as_str().unwrap()).unwrap(),
            "[\"https://a\"]"
        );
    }

    #[tokio::test]
    async fn rejected_update_falls_back_to_create() {
        // Update with a sha is refused (stale sha); the create-shaped retry
        // without one must go through.
        let (base_url, puts) = spawn_api(Some("[]"), |body| {
            if body.get("sha").is_some() {
                AxumStatus::CONFLICT
            } else {
                AxumStatus::CREATED
            }
        })
        .await;
        let store = store_for(&base_url);
        store
            .write("data/feeds.json", "[]", "Add new RSS feed")
            .await
            .unwrap();

        let puts = puts.lock().unwrap();
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[0]["sha"], "oldsha");
        assert!(puts[1].get("sha").is_none());
    }

    #[tokio::test]
    async fn create_of_new_file_sends_no_sha() {
        let (base_url, puts) = spawn_api(None, |_| AxumStatus::CREATED).await;
        let store = store_for(&base_url);
        store
            .write("data/feeds.json", "[]", "Add new RSS feed")
            .await
            .unwrap();

        let puts = puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert!(puts[0].get("sha").is_none());
    }

    #[tokio::test]
    async fn failed_fallback_reports_the_original_status() {
        let (base_url, puts) = spawn_api(Some("[]"), |_| AxumStatus::CONFLICT).await;
        let store = store_for(&base_url);
        let err = store
            .write("data/feeds.json", "[]", "Add new RSS feed")
            .await
            .unwrap_err();

        assert_eq!(puts.lock().unwrap().len(), 2);
        assert!(err.to_string().contains("409"));
    }

    #[test]
    fn decode_handles_wrapped_base64() {
        // "{\n    \"views\": 3\n}" encoded with a line break mid-stream,
        // the way the contents API returns larger files.
        let encoded = "ewogICAgInZpZXdz\nIjogMwp9";
        assert_eq!(decode_content(encoded).unwrap(), "{\n    \"views\": 3\n}");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_content("not base64!!").is_err());
    }

    #[test]
    fn contents_url_includes_repo_and_path() {
        let store = GithubStore::new("token".to_string(), "owner/news-data".to_string())
            .unwrap()
            .with_base_url("http://localhost:9999".to_string());
        assert_eq!(
            store.contents_url("data/feeds.json"),
            "http://localhost:9999/repos/owner/news-data/contents/data/feeds.json"
        );
    }
}
