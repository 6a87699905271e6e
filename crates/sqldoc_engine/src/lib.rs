//! sqldoc engine: HTTP transport, the submission/poll controller and result download.
mod api;
mod controller;
mod download;
mod filename;
mod persist;
mod settings;
mod types;
mod view;

pub use api::{build_form, ReqwestTranslateApi, TranslateApi};
pub use controller::{Controller, JobOutcome};
pub use download::{DownloadError, ResultDownloader};
pub use filename::safe_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use settings::{ClientSettings, DownloadSettings, PollSettings, Protocol};
pub use types::{ApiError, FailureKind};
pub use view::{Renderer, View};
pub use tokio_util::sync::CancellationToken;
