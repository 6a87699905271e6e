#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file to upload.
    FileSelected { name: String, bytes: Vec<u8> },
    /// User removed the selected file.
    FileCleared,
    /// User edited the SQL text area.
    TextChanged(String),
    /// User pressed Run.
    SubmitClicked,
    /// Submission request answered with a success status.
    SubmitSucceeded(crate::SubmitReply),
    /// Submission request failed; `message` is the response body or transport error.
    SubmitFailed { message: String },
    /// Poll interval elapsed.
    PollTick,
    /// Status request answered with a success status.
    PollReplied(crate::ProgressReport),
    /// Status request failed. Transient, never shown.
    PollFailed { reason: String },
    /// The owner of the controller is going away.
    Cancelled,
}
