use std::fmt;

const FALLBACK_FILENAME: &str = "download.zip";

/// Opaque server-assigned job handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Done,
    Failed,
    /// Any status string the server sends that is not one of the above.
    Unknown(String),
}

impl JobStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "pending" => JobStatus::Pending,
            "done" => JobStatus::Done,
            "failed" => JobStatus::Failed,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// One status poll answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub status: JobStatus,
    /// Percentage in `0..=100`.
    pub progress: Option<u8>,
    pub zip_url: Option<String>,
}

impl ProgressReport {
    pub fn pending(progress: Option<u8>) -> Self {
        Self {
            status: JobStatus::Pending,
            progress,
            zip_url: None,
        }
    }

    pub fn done(zip_url: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Done,
            progress: Some(100),
            zip_url: Some(zip_url.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: JobStatus::Failed,
            progress: None,
            zip_url: None,
        }
    }
}

/// Server-rendered HTML fragments, shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preview {
    pub html_trans: String,
    pub code_html: String,
}

/// Normalised answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReply {
    /// Asynchronous variant: partial preview plus a job to poll.
    Accepted { job_id: JobId, preview: Preview },
    /// Synchronous variant: a job that is already done.
    Finished { preview: Preview, zip_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub filename: String,
}

impl DownloadLink {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let filename = download_filename(&url);
        Self { url, filename }
    }
}

/// Final path segment of `url`, ignoring any query or fragment.
pub fn download_filename(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => FALLBACK_FILENAME.to_string(),
    }
}
