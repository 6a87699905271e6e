use crate::input::FormInput;
use crate::view_model::AppViewModel;
use crate::{DownloadLink, JobId, Preview};

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl Phase {
    /// Submit control is disabled while a request or poll loop is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Submitting | Phase::Polling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormInput,
    phase: Phase,
    job: Option<JobId>,
    preview: Option<Preview>,
    error: Option<String>,
    progress: Option<u8>,
    download: Option<DownloadLink>,
    poll_attempts: u32,
    max_poll_attempts: Option<u32>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose poll loop gives up after `max` status checks.
    pub fn with_poll_limit(max: u32) -> Self {
        Self {
            max_poll_attempts: Some(max),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            busy: self.phase.is_busy(),
            can_submit: self.form.can_submit(),
            selected_file: self.form.file().map(|file| file.name.clone()),
            job_id: self.job.clone(),
            preview: self.preview.clone(),
            error: self.error.clone(),
            progress: self.progress,
            download: self.download.clone(),
            poll_attempts: self.poll_attempts,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn job(&self) -> Option<&JobId> {
        self.job.as_ref()
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormInput {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn begin_submission(&mut self) {
        self.phase = Phase::Submitting;
        self.job = None;
        self.error = None;
        self.progress = None;
        self.download = None;
        self.poll_attempts = 0;
        self.dirty = true;
    }

    pub(crate) fn show_preview(&mut self, preview: Preview) {
        self.preview = Some(preview);
        self.error = None;
        self.dirty = true;
    }

    pub(crate) fn begin_polling(&mut self, job_id: JobId) {
        self.phase = Phase::Polling;
        self.job = Some(job_id);
        self.dirty = true;
    }

    /// Counts one status check. Fails with the limit once it is exceeded.
    pub(crate) fn record_poll_attempt(&mut self) -> Result<(), u32> {
        self.poll_attempts = self.poll_attempts.saturating_add(1);
        match self.max_poll_attempts {
            Some(max) if self.poll_attempts > max => Err(max),
            _ => Ok(()),
        }
    }

    pub(crate) fn set_progress(&mut self, progress: u8) {
        let progress = progress.min(100);
        if self.progress != Some(progress) {
            self.progress = Some(progress);
            self.dirty = true;
        }
    }

    pub(crate) fn complete(&mut self, link: DownloadLink) {
        self.phase = Phase::Completed;
        self.progress = None;
        self.download = Some(link);
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.phase = Phase::Failed;
        self.progress = None;
        self.error = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn cancel(&mut self) {
        self.phase = Phase::Cancelled;
        self.progress = None;
        self.dirty = true;
    }
}
