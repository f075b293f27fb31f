/// Analyzer client: the single HTTP path to the external resume analysis service.
///
/// Sends one multipart `POST {ANALYZER_URL}/analyze` with the resume under the
/// `resume` field and hands back the raw status and body. Interpreting the
/// body is the controller's job.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::controller::{AnalysisTransport, ResumeFile, TransportResponse};

const ANALYZE_PATH: &str = "/analyze";
/// Multipart field the service reads the upload from.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid analyzer URL '{0}'")]
    InvalidUrl(String),

    #[error("Analyzer unreachable: {0}")]
    Unreachable(String),
}

#[derive(Clone)]
pub struct AnalyzerClient {
    client: Client,
    endpoint: String,
}

impl AnalyzerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalyzerError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: analyze_endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisTransport for AnalyzerClient {
    async fn analyze(&self, file: &ResumeFile) -> Result<TransportResponse, AnalyzerError> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
        if let Some(content_type) = usable_mime(file.content_type.as_deref()) {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part(RESUME_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AnalyzerError::Unreachable(e.to_string())
                } else {
                    AnalyzerError::Http(e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(
            "Analyzer responded: status={}, body_bytes={}",
            status,
            body.len()
        );

        Ok(TransportResponse { status, body })
    }
}

/// The upload's declared content type, if reqwest accepts it. A browser can
/// send anything here; a bad value is dropped rather than failing the upload.
fn usable_mime(content_type: Option<&str>) -> Option<&str> {
    let content_type = content_type?;
    if Part::text("").mime_str(content_type).is_ok() {
        Some(content_type)
    } else {
        warn!("Ignoring unparseable upload content type '{content_type}'");
        None
    }
}

/// Joins the base URL and `/analyze`, tolerating a trailing slash.
fn analyze_endpoint(base_url: &str) -> Result<String, AnalyzerError> {
    let base = base_url.trim().trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AnalyzerError::InvalidUrl(base_url.to_string()));
    }
    if base.ends_with(ANALYZE_PATH) {
        return Ok(base.to_string());
    }
    Ok(format!("{base}{ANALYZE_PATH}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_base_url() {
        assert_eq!(
            analyze_endpoint("http://localhost:5000").unwrap(),
            "http://localhost:5000/analyze"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        assert_eq!(
            analyze_endpoint("https://analyzer.internal/").unwrap(),
            "https://analyzer.internal/analyze"
        );
    }

    #[test]
    fn test_endpoint_already_complete() {
        assert_eq!(
            analyze_endpoint("http://svc/analyze").unwrap(),
            "http://svc/analyze"
        );
    }

    #[test]
    fn test_endpoint_rejects_non_http() {
        assert!(matches!(
            analyze_endpoint("localhost:5000"),
            Err(AnalyzerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_bad_content_type_is_ignored() {
        assert_eq!(usable_mime(Some("application/pdf")), Some("application/pdf"));
        assert_eq!(usable_mime(Some("not a mime")), None);
        assert_eq!(usable_mime(Some("")), None);
        assert_eq!(usable_mime(None), None);
    }

    #[test]
    fn test_client_builds() {
        let client = AnalyzerClient::new("http://127.0.0.1:5000", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5000/analyze");
    }
}
