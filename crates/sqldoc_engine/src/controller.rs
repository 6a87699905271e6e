use std::collections::VecDeque;

use engine_logging::{engine_debug, engine_info, engine_warn};
use sqldoc_core::{update, AppState, AppViewModel, DownloadLink, Effect, JobId, Msg, Phase};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::TranslateApi;
use crate::settings::PollSettings;
use crate::view::{Renderer, View};

/// How a call to [`Controller::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(DownloadLink),
    Failed(String),
    Cancelled,
    /// Nothing to submit, or a submission was already in flight.
    Rejected,
}

/// Submission/poll controller: owns the state machine and executes its effects.
pub struct Controller<A> {
    api: A,
    poll: PollSettings,
    state: AppState,
    renderer: Renderer,
}

impl<A: TranslateApi> Controller<A> {
    pub fn new(api: A, poll: PollSettings) -> Self {
        let state = match poll.max_attempts {
            Some(max) => AppState::with_poll_limit(max),
            None => AppState::new(),
        };
        Self {
            api,
            poll,
            state,
            renderer: Renderer::new(),
        }
    }

    pub fn view_model(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>, view: &mut dyn View) {
        self.dispatch(
            Msg::FileSelected {
                name: name.into(),
                bytes,
            },
            view,
        );
    }

    pub fn clear_file(&mut self, view: &mut dyn View) {
        self.dispatch(Msg::FileCleared, view);
    }

    pub fn set_text(&mut self, text: impl Into<String>, view: &mut dyn View) {
        self.dispatch(Msg::TextChanged(text.into()), view);
    }

    /// Applies one message and renders whatever changed.
    pub fn dispatch(&mut self, msg: Msg, view: &mut dyn View) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.renderer.render(&state.view(), view);
        }
        self.state = state;
        effects
    }

    /// Submits the current input and, for asynchronous jobs, polls until a
    /// terminal status, the attempt limit, or `cancel` fires.
    pub async fn submit(&mut self, view: &mut dyn View, cancel: &CancellationToken) -> JobOutcome {
        let mut pending: VecDeque<Effect> = self.dispatch(Msg::SubmitClicked, view).into();
        if pending.is_empty() {
            return JobOutcome::Rejected;
        }

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::SubmitJob { input } => {
                    let msg = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => Msg::Cancelled,
                        result = self.api.submit(&input) => match result {
                            Ok(reply) => Msg::SubmitSucceeded(reply),
                            Err(err) => {
                                engine_warn!("Submission failed: {}", err);
                                Msg::SubmitFailed {
                                    message: err.user_message(),
                                }
                            }
                        },
                    };
                    pending.extend(self.dispatch(msg, view));
                }
                Effect::StartPolling { job_id } => {
                    engine_info!("Job {} accepted; polling every {:?}", job_id, self.poll.interval);
                    self.poll_until_terminal(view, cancel).await;
                }
                Effect::PollStatus { .. } | Effect::StopPolling => {}
            }
        }

        self.outcome()
    }

    async fn poll_until_terminal(&mut self, view: &mut dyn View, cancel: &CancellationToken) {
        let period = self.poll.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.state.phase() == Phase::Polling {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.dispatch(Msg::Cancelled, view);
                    return;
                }
                _ = ticker.tick() => {}
            }

            for effect in self.dispatch(Msg::PollTick, view) {
                match effect {
                    Effect::PollStatus { job_id } => {
                        let msg = self.poll_once(&job_id, cancel).await;
                        if self.dispatch(msg, view).contains(&Effect::StopPolling) {
                            return;
                        }
                    }
                    Effect::StopPolling => return,
                    Effect::SubmitJob { .. } | Effect::StartPolling { .. } => {}
                }
            }
        }
    }

    async fn poll_once(&self, job_id: &JobId, cancel: &CancellationToken) -> Msg {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Msg::Cancelled,
            result = self.api.progress(job_id) => match result {
                Ok(report) => {
                    engine_debug!("Job {} reported {:?}", job_id, report);
                    Msg::PollReplied(report)
                }
                Err(err) => Msg::PollFailed {
                    reason: err.to_string(),
                },
            },
        }
    }

    fn outcome(&self) -> JobOutcome {
        let view = self.state.view();
        match view.phase {
            Phase::Completed => match view.download {
                Some(link) => JobOutcome::Completed(link),
                None => JobOutcome::Failed("completed without a download link".to_string()),
            },
            Phase::Failed => JobOutcome::Failed(view.error.unwrap_or_default()),
            Phase::Cancelled => JobOutcome::Cancelled,
            Phase::Idle | Phase::Submitting | Phase::Polling => JobOutcome::Rejected,
        }
    }
}
