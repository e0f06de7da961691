use std::path::PathBuf;
use std::time::Duration;

use rain_logging::{rain_debug, rain_warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::{
    ApiError, FailureKind, FileNodeResponse, HealthResponse, IssueBundlesResponse,
    LogSearchResponse, UploadResponse,
};

const JSON: &str = "application/json";
const FALLBACK_UPLOAD_NAME: &str = "upload.log";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Files to send as one new bundle under `issue_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub issue_code: String,
    pub bundle_name: Option<String>,
    pub files: Vec<PathBuf>,
}

#[async_trait::async_trait]
pub trait RainApi: Send + Sync {
    async fn fetch_issue_bundles(&self, issue_id: &str) -> Result<IssueBundlesResponse, ApiError>;

    /// A node and its immediate children. `file_id` may be `"root"`.
    async fn fetch_file_node(
        &self,
        bundle_id: &str,
        file_id: &str,
    ) -> Result<FileNodeResponse, ApiError>;

    async fn search_logs(
        &self,
        bundle_id: &str,
        query: &str,
        timeline: Option<&str>,
    ) -> Result<LogSearchResponse, ApiError>;

    async fn upload_logs(&self, upload: &UploadRequest) -> Result<UploadResponse, ApiError>;

    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRainClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestRainClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded `segments` to the base url's path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        rain_debug!("GET {}", url);
        let request = self.client.get(url).header(CONTENT_TYPE, JSON);
        execute(request).await
    }
}

#[async_trait::async_trait]
impl RainApi for ReqwestRainClient {
    async fn fetch_issue_bundles(&self, issue_id: &str) -> Result<IssueBundlesResponse, ApiError> {
        let url = self.endpoint(&["api", "issues", issue_id])?;
        self.get_json(url).await
    }

    async fn fetch_file_node(
        &self,
        bundle_id: &str,
        file_id: &str,
    ) -> Result<FileNodeResponse, ApiError> {
        let url = self.endpoint(&["api", "files", "v1", bundle_id, "files", file_id])?;
        self.get_json(url).await
    }

    async fn search_logs(
        &self,
        bundle_id: &str,
        query: &str,
        timeline: Option<&str>,
    ) -> Result<LogSearchResponse, ApiError> {
        let mut url = self.endpoint(&["api", "log", "v2", bundle_id, "search"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(timeline) = timeline {
                pairs.append_pair("timeline", timeline);
            }
        }
        self.get_json(url).await
    }

    async fn upload_logs(&self, upload: &UploadRequest) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint(&["api", "uploads"])?;

        let mut form = Form::new().text("issue_code", upload.issue_code.clone());
        if let Some(name) = upload.bundle_name.as_deref() {
            form = form.text("bundle_name", name.to_string());
        }
        for path in &upload.files {
            let bytes = tokio::fs::read(path).await.map_err(|err| {
                ApiError::new(
                    FailureKind::Io,
                    format!("failed to read {}: {err}", path.display()),
                )
            })?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_string());
            form = form.part("files", Part::bytes(bytes).file_name(file_name));
        }

        rain_debug!(
            "POST {} issue_code={} files={}",
            url,
            upload.issue_code,
            upload.files.len()
        );
        execute(self.client.post(url).multipart(form)).await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint(&["healthz"])?;
        self.get_json(url).await
    }
}

/// Sends the request; a non-2xx reply becomes an error carrying the body text.
async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body).trim().to_string();
        let message = if text.is_empty() {
            format!("Request failed: {}", status.as_u16())
        } else {
            text
        };
        rain_warn!("Request failed status={} message={}", status, message);
        return Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), message));
    }

    serde_json::from_slice(&body).map_err(|err| {
        rain_warn!("Malformed response body: {}", err);
        ApiError::new(FailureKind::Decode, err.to_string())
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments_and_keeps_base_path() {
        let settings = ClientSettings {
            base_url: "http://rain.internal:9000/console/".to_string(),
            ..ClientSettings::default()
        };
        let client = ReqwestRainClient::new(&settings).unwrap();
        let url = client.endpoint(&["api", "issues", "CN 013/x"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://rain.internal:9000/console/api/issues/CN%20013%2Fx"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let settings = ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        let err = ReqwestRainClient::new(&settings).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);

        let settings = ClientSettings {
            base_url: "mailto:ops@example.com".to_string(),
            ..ClientSettings::default()
        };
        let err = ReqwestRainClient::new(&settings).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
