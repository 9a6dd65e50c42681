use nova_common::new_correlation_id;

/// A user turn that has been appended but not yet answered.
///
/// Produced by [`ConversationController::submit`] and consumed by
/// [`ConversationController::resolve`].
///
/// [`ConversationController::submit`]: super::ConversationController::submit
/// [`ConversationController::resolve`]: super::ConversationController::resolve
#[derive(Debug)]
#[must_use = "a pending turn does nothing until resolved"]
pub struct PendingTurn {
    seq: u64,
    text: String,
    request_id: String,
}

impl PendingTurn {
    pub(super) fn new(seq: u64, text: impl Into<String>) -> Self {
        Self {
            seq,
            text: text.into(),
            request_id: new_correlation_id(),
        }
    }

    /// Submit order within the owning controller, starting at 0.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
