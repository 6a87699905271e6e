use engine_logging::{engine_debug, engine_warn};

use crate::{AppState, DownloadLink, Effect, JobStatus, Msg, Phase, ProgressReport, SubmitReply};

pub const JOB_FAILED_MESSAGE: &str = "Job failed on server";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected { name, bytes } => {
            state.form_mut().select_file(name, bytes);
            Vec::new()
        }
        Msg::FileCleared => {
            state.form_mut().clear_file();
            Vec::new()
        }
        Msg::TextChanged(text) => {
            state.form_mut().set_text(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.phase().is_busy() {
                return (state, Vec::new());
            }
            match state.form().current_input() {
                Some(input) => {
                    state.begin_submission();
                    vec![Effect::SubmitJob { input }]
                }
                None => Vec::new(),
            }
        }
        Msg::SubmitSucceeded(reply) => {
            if state.phase() != Phase::Submitting {
                engine_debug!("Ignoring submit reply in phase {:?}", state.phase());
                return (state, Vec::new());
            }
            match reply {
                SubmitReply::Accepted { job_id, preview } => {
                    state.show_preview(preview);
                    state.begin_polling(job_id.clone());
                    vec![Effect::StartPolling { job_id }]
                }
                SubmitReply::Finished { preview, zip_url } => {
                    state.show_preview(preview);
                    state.complete(DownloadLink::from_url(zip_url));
                    Vec::new()
                }
            }
        }
        Msg::SubmitFailed { message } => {
            if state.phase() == Phase::Submitting {
                state.fail(message);
            }
            Vec::new()
        }
        Msg::PollTick => match (state.phase(), state.job().cloned()) {
            (Phase::Polling, Some(job_id)) => {
                match state.record_poll_attempt() {
                    Ok(()) => vec![Effect::PollStatus { job_id }],
                    Err(limit) => {
                        engine_warn!("Job {} still pending after {} status checks", job_id, limit);
                        state.fail(format!("Job did not finish after {limit} status checks"));
                        vec![Effect::StopPolling]
                    }
                }
            }
            _ => Vec::new(),
        },
        Msg::PollReplied(report) => {
            if state.phase() != Phase::Polling {
                return (state, Vec::new());
            }
            apply_report(&mut state, report)
        }
        Msg::PollFailed { reason } => {
            engine_debug!("Ignoring transient poll failure: {}", reason);
            Vec::new()
        }
        Msg::Cancelled => match state.phase() {
            Phase::Polling => {
                state.cancel();
                vec![Effect::StopPolling]
            }
            Phase::Submitting => {
                state.cancel();
                Vec::new()
            }
            _ => Vec::new(),
        },
    };

    (state, effects)
}

fn apply_report(state: &mut AppState, report: ProgressReport) -> Vec<Effect> {
    match report.status {
        JobStatus::Pending => {
            if let Some(progress) = report.progress {
                state.set_progress(progress);
            }
            Vec::new()
        }
        JobStatus::Done => {
            match report.zip_url {
                Some(url) => state.complete(DownloadLink::from_url(url)),
                None => state.fail("Job finished without a download link"),
            }
            vec![Effect::StopPolling]
        }
        JobStatus::Failed => {
            state.fail(JOB_FAILED_MESSAGE);
            vec![Effect::StopPolling]
        }
        JobStatus::Unknown(status) => {
            engine_warn!("Treating unknown job status {:?} as failed", status);
            state.fail(format!("{JOB_FAILED_MESSAGE} (status: {status})"));
            vec![Effect::StopPolling]
        }
    }
}
