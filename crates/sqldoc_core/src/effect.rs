#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob { input: crate::Input },
    StartPolling { job_id: crate::JobId },
    PollStatus { job_id: crate::JobId },
    StopPolling,
}
