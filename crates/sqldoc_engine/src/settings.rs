use std::time::Duration;

/// Which server contract to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// `POST /api/translate/` then poll `GET /api/progress/{job_id}/`.
    #[default]
    Async,
    /// `POST /api/run/` answers with the finished result.
    Sync,
}

impl Protocol {
    pub fn submit_path(self) -> &'static str {
        match self {
            Protocol::Async => "api/translate/",
            Protocol::Sync => "api/run/",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub protocol: Protocol,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            protocol: Protocol::Async,
            connect_timeout: Duration::from_secs(10),
            // Translation runs inline on the sync endpoint.
            request_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` polls until a terminal status or cancellation.
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: Some(900),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_bytes: 256 * 1024 * 1024,
        }
    }
}
