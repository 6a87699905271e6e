use crate::{DownloadLink, JobId, Phase, Preview};

/// Snapshot of everything a view needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub busy: bool,
    pub can_submit: bool,
    pub selected_file: Option<String>,
    pub job_id: Option<JobId>,
    pub preview: Option<Preview>,
    pub error: Option<String>,
    pub progress: Option<u8>,
    pub download: Option<DownloadLink>,
    pub poll_attempts: u32,
}
