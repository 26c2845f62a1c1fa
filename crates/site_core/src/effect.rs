use std::time::Duration;

use crate::{AudioId, InstanceId, NotificationId, RecoveryConfirmation, RecoveryRequest};

/// Side effects requested by `update`, executed by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the recovery request to the auth service.
    RequestPasswordReset {
        instance: InstanceId,
        request: RecoveryRequest,
    },
    /// POST the new credential together with the recovery token.
    ConfirmPasswordReset {
        instance: InstanceId,
        confirmation: RecoveryConfirmation,
    },
    /// Acquire an audio element for `source` and start playback.
    PlayAudio { audio: AudioId, source: String },
    /// Stop playback, rewind and detach the audio element.
    StopAudio { audio: AudioId },
    /// Deliver `Msg::DismissElapsed` after `after`.
    ScheduleDismiss {
        notification: NotificationId,
        after: Duration,
    },
    CancelDismiss { notification: NotificationId },
    /// Remove exactly these keys from the local store.
    ClearSession { keys: Vec<String> },
}
