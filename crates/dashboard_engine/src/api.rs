use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, FailureKind, RecipientList, StartedTask, StatusReport};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The news-collector service as seen by the dashboard.
///
/// Every call resolves to the decoded body on `success: true`, to a
/// [`FailureKind::Rejected`] error carrying the service message on
/// `success: false`, and to a transport error otherwise.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn start_analysis(&self) -> Result<StartedTask, ApiError>;
    async fn analysis_status(&self, task_id: &str) -> Result<StatusReport, ApiError>;
    async fn recipients(&self) -> Result<RecipientList, ApiError>;
    /// Returns the service confirmation message.
    async fn add_recipient(&self, email: &str) -> Result<String, ApiError>;
    async fn remove_recipient(&self, email: &str) -> Result<String, ApiError>;
    async fn send_email(&self) -> Result<String, ApiError>;
    /// Returns the URL of the latest generated report.
    async fn latest_report(&self) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StartBody {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct ReportBody {
    url: String,
}

#[derive(Debug, Deserialize)]
struct NoBody {}

#[derive(Debug, Clone)]
pub struct ReqwestDashboardApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestDashboardApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    /// Builds `{base}/api/{segments..}`; every segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(T, String), ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        decode_envelope(status, &bytes)
    }
}

fn decode_envelope<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    bytes: &[u8],
) -> Result<(T, String), ApiError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|err| {
        if status.is_success() {
            ApiError::new(FailureKind::Decode, err.to_string())
        } else {
            ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
        }
    })?;

    let envelope = Envelope::deserialize(&value)
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
    let message = envelope.message.unwrap_or_default();
    if !envelope.success {
        return Err(ApiError::new(FailureKind::Rejected, message));
    }

    let body = T::deserialize(value).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
    Ok((body, message))
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestDashboardApi {
    async fn start_analysis(&self) -> Result<StartedTask, ApiError> {
        let url = self.endpoint(&["analysis", "start"])?;
        let (body, message): (StartBody, _) = self.call(self.client.post(url)).await?;
        Ok(StartedTask {
            task_id: body.task_id,
            message,
        })
    }

    async fn analysis_status(&self, task_id: &str) -> Result<StatusReport, ApiError> {
        let url = self.endpoint(&["analysis", "status", task_id])?;
        let (report, _) = self.call(self.client.get(url)).await?;
        Ok(report)
    }

    async fn recipients(&self) -> Result<RecipientList, ApiError> {
        let url = self.endpoint(&["recipients"])?;
        let (list, _) = self.call(self.client.get(url)).await?;
        Ok(list)
    }

    async fn add_recipient(&self, email: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["recipients"])?;
        let request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "email": email }));
        let (_, message): (NoBody, _) = self.call(request).await?;
        Ok(message)
    }

    async fn remove_recipient(&self, email: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["recipients", email])?;
        let (_, message): (NoBody, _) = self.call(self.client.delete(url)).await?;
        Ok(message)
    }

    async fn send_email(&self) -> Result<String, ApiError> {
        let url = self.endpoint(&["email", "send"])?;
        let request = self.client.post(url).json(&serde_json::json!({}));
        let (_, message): (NoBody, _) = self.call(request).await?;
        Ok(message)
    }

    async fn latest_report(&self) -> Result<String, ApiError> {
        let url = self.endpoint(&["latest-report"])?;
        let (body, _): (ReportBody, _) = self.call(self.client.get(url)).await?;
        Ok(body.url)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ReqwestDashboardApi {
        ReqwestDashboardApi::new(&ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_escapes_segments() {
        let url = api("http://localhost:5000")
            .endpoint(&["recipients", "a b/c@example.com"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/recipients/a%20b%2Fc@example.com"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = api("http://localhost:5000/news/").endpoint(&["analysis", "start"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/news/api/analysis/start");
    }

    #[test]
    fn rejects_non_base_url() {
        let err = ReqwestDashboardApi::new(&ApiSettings {
            base_url: "mailto:desk@example.com".to_string(),
            ..ApiSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn envelope_without_json_maps_status() {
        let err = decode_envelope::<NoBody>(reqwest::StatusCode::BAD_GATEWAY, b"<html>")
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::HttpStatus(502));

        let err = decode_envelope::<NoBody>(reqwest::StatusCode::OK, b"<html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }

    #[test]
    fn rejection_wins_over_http_status() {
        let body = br#"{"success": false, "message": "Task not found"}"#;
        let err = decode_envelope::<NoBody>(reqwest::StatusCode::NOT_FOUND, body).unwrap_err();
        assert_eq!(err.kind, FailureKind::Rejected);
        assert_eq!(err.message, "Task not found");
    }
}
