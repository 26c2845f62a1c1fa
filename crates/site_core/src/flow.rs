/// Outcome of one recovery flow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The two password inputs differ; nothing was sent.
    Mismatch,
    /// The auth service answered with a non-2xx status.
    Rejected,
    /// No response could be obtained.
    Network,
}

impl FlowState {
    /// Whether a new submission may start. `Submitting` blocks re-entry and
    /// `Succeeded` is terminal.
    pub fn accepts_submit(self) -> bool {
        matches!(self, FlowState::Idle | FlowState::Failed(_))
    }

    pub fn is_submitting(self) -> bool {
        self == FlowState::Submitting
    }
}

/// Classified response of the auth service, as seen by the flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Accepted,
    Rejected { detail: Option<String> },
    Unreachable,
}
