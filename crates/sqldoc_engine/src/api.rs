use engine_logging::{engine_debug, engine_info};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use sqldoc_core::{Input, JobId, ProgressReport, SubmitReply};
use url::Url;

use crate::settings::{ClientSettings, Protocol};
use crate::types::{
    map_reqwest_error, ApiError, FailureKind, ProgressResponse, RunResponse, TranslateResponse,
};

/// The two server endpoints the controller talks to.
#[async_trait::async_trait]
pub trait TranslateApi: Send + Sync {
    async fn submit(&self, input: &Input) -> Result<SubmitReply, ApiError>;

    async fn progress(&self, job_id: &JobId) -> Result<ProgressReport, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTranslateApi {
    client: reqwest::Client,
    base_url: Url,
    protocol: Protocol,
}

impl ReqwestTranslateApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            protocol: settings.protocol,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn submit_url(&self) -> Result<Url, ApiError> {
        self.base_url
            .join(self.protocol.submit_path())
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn progress_url(&self, job_id: &JobId) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join("api/progress/")
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
            .pop_if_empty()
            .push(job_id.as_str())
            .push("");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl TranslateApi for ReqwestTranslateApi {
    async fn submit(&self, input: &Input) -> Result<SubmitReply, ApiError> {
        let url = self.submit_url()?;
        engine_info!(
            "Submitting {} ({} bytes) to {}",
            input.field_name(),
            payload_len(input),
            url
        );
        let response = self
            .client
            .post(url)
            .multipart(build_form(input))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body = read_success_body(response).await?;
        let reply = match self.protocol {
            Protocol::Async => decode::<TranslateResponse>(&body)?.into(),
            Protocol::Sync => decode::<RunResponse>(&body)?.into(),
        };
        Ok(reply)
    }

    async fn progress(&self, job_id: &JobId) -> Result<ProgressReport, ApiError> {
        let url = self.progress_url(job_id)?;
        engine_debug!("Polling {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body = read_success_body(response).await?;
        Ok(decode::<ProgressResponse>(&body)?.into())
    }
}

/// Multipart payload: `sql_file` carries the upload, `sql_code` the trimmed text.
pub fn build_form(input: &Input) -> Form {
    match input {
        Input::File { name, bytes } => Form::new().part(
            input.field_name(),
            Part::bytes(bytes.clone()).file_name(name.clone()),
        ),
        Input::Text(text) => Form::new().text(input.field_name(), text.trim().to_string()),
    }
}

/// Base URL with a trailing slash, so relative endpoint paths join beneath it.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(raw).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("{raw} cannot be used as a base url"),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn read_success_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), body));
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn payload_len(input: &Input) -> usize {
    match input {
        Input::File { bytes, .. } => bytes.len(),
        Input::Text(text) => text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_base_url, ReqwestTranslateApi};
    use crate::settings::{ClientSettings, Protocol};
    use crate::types::FailureKind;
    use sqldoc_core::JobId;

    fn api(base_url: &str, protocol: Protocol) -> ReqwestTranslateApi {
        ReqwestTranslateApi::new(&ClientSettings {
            base_url: base_url.to_string(),
            protocol,
            ..ClientSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("http://host:8000/sqldoc").unwrap();
        assert_eq!(url.as_str(), "http://host:8000/sqldoc/");
    }

    #[test]
    fn base_url_must_be_absolute() {
        let err = parse_base_url("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn endpoints_follow_protocol() {
        let async_api = api("http://host/", Protocol::Async);
        let sync_api = api("http://host/prefix", Protocol::Sync);
        assert_eq!(
            async_api.submit_url().unwrap().as_str(),
            "http://host/api/translate/"
        );
        assert_eq!(
            sync_api.submit_url().unwrap().as_str(),
            "http://host/prefix/api/run/"
        );
    }

    #[test]
    fn progress_url_escapes_job_id() {
        let api = api("http://host/", Protocol::Async);
        let url = api.progress_url(&JobId::new("a b/c")).unwrap();
        assert_eq!(url.as_str(), "http://host/api/progress/a%20b%2Fc/");

        let url = api
            .progress_url(&JobId::new("5f0c0b1e-7d7c-4c57-9a55-0b5f3a9d2b11"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://host/api/progress/5f0c0b1e-7d7c-4c57-9a55-0b5f3a9d2b11/"
        );
    }
}
