use crate::{AudioId, InstanceId, LoadingStatus, NotificationId, RemoteOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    ForgotPassword,
    /// `location` is the full page address carrying `uid` and `token`.
    ResetPassword { location: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Unmount the current screen and mount the one for `Route`.
    Navigate(Route),
    EmailChanged(String),
    PasswordChanged(String),
    PasswordConfirmationChanged(String),
    /// User submitted the forgot-password form.
    RequestSubmitted,
    /// User submitted the new-password form.
    ConfirmSubmitted,
    /// Auth service reply for a recovery request.
    PasswordResetRequested {
        instance: InstanceId,
        outcome: RemoteOutcome,
    },
    /// Auth service reply for a confirmation.
    PasswordResetConfirmed {
        instance: InstanceId,
        outcome: RemoteOutcome,
    },
    /// User clicked the notification's close control.
    NotificationClosed,
    DismissElapsed { notification: NotificationId },
    /// Overlay mounted with a status already drawn from the catalog.
    OverlayMounted { status: LoadingStatus },
    /// Overlay removed before (or after) its clip ended.
    OverlayUnmounted,
    AudioEnded { audio: AudioId },
    /// Playback could not start, e.g. blocked by autoplay policy.
    AudioFailed { audio: AudioId, reason: String },
    LogoutConfirmed,
    NoOp,
}
