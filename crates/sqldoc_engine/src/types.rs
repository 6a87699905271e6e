use std::fmt;

use serde::Deserialize;
use sqldoc_core::{JobId, JobStatus, Preview, ProgressReport, SubmitReply};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text shown to the user. HTTP failures surface the response body verbatim.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::HttpStatus(_) => self.message.clone(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

/// `POST /api/translate/` body.
#[derive(Debug, Deserialize)]
pub(crate) struct TranslateResponse {
    pub job_id: String,
    pub html_trans: String,
    pub code_html: String,
}

impl From<TranslateResponse> for SubmitReply {
    fn from(wire: TranslateResponse) -> Self {
        SubmitReply::Accepted {
            job_id: JobId::new(wire.job_id),
            preview: Preview {
                html_trans: wire.html_trans,
                code_html: wire.code_html,
            },
        }
    }
}

/// `POST /api/run/` body.
#[derive(Debug, Deserialize)]
pub(crate) struct RunResponse {
    pub html_trans: String,
    pub code_html: String,
    pub zip_url: String,
}

impl From<RunResponse> for SubmitReply {
    fn from(wire: RunResponse) -> Self {
        SubmitReply::Finished {
            preview: Preview {
                html_trans: wire.html_trans,
                code_html: wire.code_html,
            },
            zip_url: wire.zip_url,
        }
    }
}

/// `GET /api/progress/{job_id}/` body.
#[derive(Debug, Deserialize)]
pub(crate) struct ProgressResponse {
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub zip_url: Option<String>,
}

impl From<ProgressResponse> for ProgressReport {
    fn from(wire: ProgressResponse) -> Self {
        ProgressReport {
            status: JobStatus::from_wire(&wire.status),
            progress: wire.progress.map(clamp_percent),
            zip_url: wire.zip_url,
        }
    }
}

fn clamp_percent(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}
