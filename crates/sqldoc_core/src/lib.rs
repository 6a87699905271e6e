//! sqldoc core: pure submission/poll state machine and view-model helpers.
mod effect;
mod input;
mod job;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use input::{FormInput, Input, SelectedFile};
pub use job::{
    download_filename, DownloadLink, JobId, JobStatus, Preview, ProgressReport, SubmitReply,
};
pub use msg::Msg;
pub use state::{AppState, Phase};
pub use update::{update, JOB_FAILED_MESSAGE};
pub use view_model::AppViewModel;
