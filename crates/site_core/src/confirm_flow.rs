use std::fmt;

use site_logging::{site_info, site_warn};

use crate::text;
use crate::view_model::ScreenView;
use crate::{
    Effect, FailureReason, FlowState, IdAllocator, InstanceId, NotificationChannel,
    NotificationMessage, RemoteOutcome,
};

/// The `(uid, token)` pair carried by a reset link. Both parts are opaque and
/// only checked for presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryToken {
    pub uid: String,
    pub token: String,
}

impl RecoveryToken {
    /// Reads `uid` and `token` from a page location. Accepts an absolute URL, a
    /// path with a query, or a bare query string. Returns `None` unless both are
    /// present and non-empty.
    pub fn from_location(location: &str) -> Option<Self> {
        let without_fragment = location.split('#').next().unwrap_or_default();
        let query = match without_fragment.split_once('?') {
            Some((_, query)) => query,
            None if without_fragment.contains('=') => without_fragment,
            None => "",
        };

        let mut uid = None;
        let mut token = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "uid" if uid.is_none() => uid = Some(value.into_owned()),
                "token" if token.is_none() => token = Some(value.into_owned()),
                _ => {}
            }
        }

        match (uid, token) {
            (Some(uid), Some(token)) if !uid.is_empty() && !token.is_empty() => {
                Some(Self { uid, token })
            }
            _ => None,
        }
    }
}

/// Only built once both password inputs agree.
#[derive(Clone, PartialEq, Eq)]
pub struct RecoveryConfirmation {
    pub uid: String,
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for RecoveryConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryConfirmation")
            .field("uid", &self.uid)
            .field("token", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState {
    /// Link parameters missing. Terminal; the form never renders.
    InvalidLink,
    Active { token: RecoveryToken, flow: FlowState },
}

/// "Reset password" screen.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfirmFlow {
    instance: InstanceId,
    state: ConfirmState,
    password: String,
    password_confirmation: String,
    error_sound: Option<String>,
    notifications: NotificationChannel,
}

impl fmt::Debug for ConfirmFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmFlow")
            .field("instance", &self.instance)
            .field("state", &self.state)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

impl ConfirmFlow {
    /// Link preconditions are evaluated here, once, before any network activity.
    pub fn mount(
        instance: InstanceId,
        location: &str,
        notifications: NotificationChannel,
        error_sound: Option<String>,
    ) -> Self {
        let state = match RecoveryToken::from_location(location) {
            Some(token) => ConfirmState::Active {
                token,
                flow: FlowState::Idle,
            },
            None => {
                site_warn!("instance {} mounted with an invalid reset link", instance);
                ConfirmState::InvalidLink
            }
        };
        Self {
            instance,
            state,
            password: String::new(),
            password_confirmation: String::new(),
            error_sound,
            notifications,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// `None` for an invalid link.
    pub fn flow(&self) -> Option<FlowState> {
        match &self.state {
            ConfirmState::InvalidLink => None,
            ConfirmState::Active { flow, .. } => Some(*flow),
        }
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    pub fn set_password(&mut self, password: String) -> bool {
        if !self.form_visible() {
            return false;
        }
        self.password = password;
        true
    }

    pub fn set_password_confirmation(&mut self, password: String) -> bool {
        if !self.form_visible() {
            return false;
        }
        self.password_confirmation = password;
        true
    }

    pub fn submit(&mut self, ids: &mut IdAllocator) -> Vec<Effect> {
        let ConfirmState::Active { token, flow } = &mut self.state else {
            return Vec::new();
        };
        if !flow.accepts_submit() {
            return Vec::new();
        }
        if self.password != self.password_confirmation {
            *flow = FlowState::Failed(FailureReason::Mismatch);
            let message =
                NotificationMessage::error(text::PASSWORD_MISMATCH, self.error_sound.clone());
            return self.notifications.show(message, ids);
        }
        if self.password.is_empty() {
            return Vec::new();
        }

        site_info!("instance {} confirming password reset uid={}", self.instance, token.uid);
        let confirmation = RecoveryConfirmation {
            uid: token.uid.clone(),
            token: token.token.clone(),
            new_password: self.password.clone(),
        };
        *flow = FlowState::Submitting;
        let mut effects = self.notifications.dismiss();
        effects.push(Effect::ConfirmPasswordReset {
            instance: self.instance,
            confirmation,
        });
        effects
    }

    pub fn on_outcome(&mut self, outcome: RemoteOutcome, ids: &mut IdAllocator) -> Vec<Effect> {
        let ConfirmState::Active { flow, .. } = &mut self.state else {
            return Vec::new();
        };
        if !flow.is_submitting() {
            return Vec::new();
        }

        let message = match outcome {
            RemoteOutcome::Accepted => {
                site_info!("instance {} password updated", self.instance);
                *flow = FlowState::Succeeded;
                self.password.clear();
                self.password_confirmation.clear();
                NotificationMessage::success(text::RESET_DONE)
            }
            RemoteOutcome::Rejected { detail } => {
                *flow = FlowState::Failed(FailureReason::Rejected);
                // Server detail is shown verbatim; blank detail counts as absent.
                let shown = detail
                    .filter(|detail| !detail.trim().is_empty())
                    .unwrap_or_else(|| text::RESET_FAILED.to_string());
                site_warn!("instance {} password reset rejected: {}", self.instance, shown);
                NotificationMessage::error(shown, self.error_sound.clone())
            }
            RemoteOutcome::Unreachable => {
                site_warn!("instance {} auth service unreachable", self.instance);
                *flow = FlowState::Failed(FailureReason::Network);
                NotificationMessage::error(text::NETWORK_ERROR, self.error_sound.clone())
            }
        };
        self.notifications.show(message, ids)
    }

    fn form_visible(&self) -> bool {
        matches!(
            self.state,
            ConfirmState::Active { flow, .. } if flow != FlowState::Succeeded
        )
    }

    pub(crate) fn view(&self, sign_in_route: &str) -> ScreenView {
        match &self.state {
            ConfirmState::InvalidLink => ScreenView::InvalidLink {
                text: text::INVALID_LINK.to_string(),
            },
            ConfirmState::Active {
                flow: FlowState::Succeeded,
                ..
            } => ScreenView::ConfirmDone {
                text: text::RESET_DONE_BODY.to_string(),
                sign_in_route: sign_in_route.to_string(),
            },
            ConfirmState::Active { flow, .. } => ScreenView::ConfirmForm {
                password_filled: !self.password.is_empty(),
                confirmation_filled: !self.password_confirmation.is_empty(),
                submit_enabled: flow.accepts_submit(),
            },
        }
    }
}
