use site_logging::{redact_email, site_info, site_warn};

use crate::text;
use crate::view_model::ScreenView;
use crate::{
    Effect, FailureReason, FlowState, IdAllocator, InstanceId, NotificationChannel,
    NotificationMessage, RemoteOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryRequest {
    pub email: String,
}

/// "Forgot password" screen: one email field, one submission at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFlow {
    instance: InstanceId,
    email: String,
    state: FlowState,
    error_sound: Option<String>,
    notifications: NotificationChannel,
}

impl RequestFlow {
    pub fn new(
        instance: InstanceId,
        notifications: NotificationChannel,
        error_sound: Option<String>,
    ) -> Self {
        Self {
            instance,
            email: String::new(),
            state: FlowState::Idle,
            error_sound,
            notifications,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    /// Returns false when the form is gone and the edit was dropped.
    pub fn set_email(&mut self, email: String) -> bool {
        if self.state == FlowState::Succeeded {
            return false;
        }
        self.email = email;
        true
    }

    pub fn submit(&mut self) -> Vec<Effect> {
        if !self.state.accepts_submit() {
            return Vec::new();
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Vec::new();
        }

        site_info!(
            "instance {} requesting password reset for {}",
            self.instance,
            redact_email(email)
        );
        let request = RecoveryRequest {
            email: email.to_string(),
        };
        self.state = FlowState::Submitting;
        let mut effects = self.notifications.dismiss();
        effects.push(Effect::RequestPasswordReset {
            instance: self.instance,
            request,
        });
        effects
    }

    /// The server's reply is never inspected beyond its class, so a known and an
    /// unknown address produce the same observable result.
    pub fn on_outcome(&mut self, outcome: RemoteOutcome, ids: &mut IdAllocator) -> Vec<Effect> {
        if !self.state.is_submitting() {
            return Vec::new();
        }
        let (state, message) = match outcome {
            RemoteOutcome::Accepted => (
                FlowState::Succeeded,
                NotificationMessage::success(text::REQUEST_ACCEPTED),
            ),
            RemoteOutcome::Rejected { .. } => {
                site_warn!("instance {} password reset request rejected", self.instance);
                (
                    FlowState::Failed(FailureReason::Rejected),
                    NotificationMessage::error(text::REQUEST_REJECTED, self.error_sound.clone()),
                )
            }
            RemoteOutcome::Unreachable => {
                site_warn!("instance {} auth service unreachable", self.instance);
                (
                    FlowState::Failed(FailureReason::Network),
                    NotificationMessage::error(text::NETWORK_ERROR, self.error_sound.clone()),
                )
            }
        };
        self.state = state;
        self.notifications.show(message, ids)
    }

    pub(crate) fn view(&self) -> ScreenView {
        match self.state {
            FlowState::Succeeded => ScreenView::RequestSent {
                text: text::REQUEST_SENT_BODY.to_string(),
            },
            state => ScreenView::RequestForm {
                email: self.email.clone(),
                submit_enabled: state.accepts_submit(),
            },
        }
    }
}
