//! Single-slot transient notification with an optional audio cue.
//!
//! A channel holds at most one message. Showing a new message releases the
//! previous one first: its dismiss timer is cancelled and its audio element is
//! stopped and detached, so repeated show/dismiss cycles never accumulate
//! audio handles.

use std::time::Duration;

use site_logging::site_debug;

use crate::view_model::NotificationView;
use crate::{AudioId, Effect, IdAllocator, NotificationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub kind: NotificationKind,
    pub text: String,
    /// Audio cue played when the message is shown.
    pub sound: Option<String>,
}

impl NotificationMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
            sound: None,
        }
    }

    pub fn error(text: impl Into<String>, sound: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
            sound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Active {
    id: NotificationId,
    message: NotificationMessage,
    audio: Option<AudioId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationChannel {
    auto_dismiss: Option<Duration>,
    active: Option<Active>,
}

impl NotificationChannel {
    pub fn new(auto_dismiss: Option<Duration>) -> Self {
        Self {
            auto_dismiss,
            active: None,
        }
    }

    /// Replaces the current message.
    pub fn show(&mut self, message: NotificationMessage, ids: &mut IdAllocator) -> Vec<Effect> {
        let mut effects = self.release(true);

        let id = ids.next_id();
        let audio = message.sound.as_ref().map(|source| {
            let audio = ids.next_id();
            effects.push(Effect::PlayAudio {
                audio,
                source: source.clone(),
            });
            audio
        });
        if let Some(after) = self.auto_dismiss {
            effects.push(Effect::ScheduleDismiss {
                notification: id,
                after,
            });
        }

        site_debug!(
            "notification {} shown kind={:?} sound={}",
            id,
            message.kind,
            audio.is_some()
        );
        self.active = Some(Active { id, message, audio });
        effects
    }

    /// Clears the current message, if any.
    pub fn dismiss(&mut self) -> Vec<Effect> {
        self.release(true)
    }

    /// Timer callback. Timers that belong to a replaced message are ignored.
    pub fn on_dismiss_elapsed(&mut self, notification: NotificationId) -> Vec<Effect> {
        match &self.active {
            Some(active) if active.id == notification => self.release(false),
            _ => Vec::new(),
        }
    }

    /// Releases everything the channel holds when its owner unmounts.
    pub fn teardown(&mut self) -> Vec<Effect> {
        self.release(true)
    }

    pub fn current(&self) -> Option<&NotificationMessage> {
        self.active.as_ref().map(|active| &active.message)
    }

    pub fn current_id(&self) -> Option<NotificationId> {
        self.active.as_ref().map(|active| active.id)
    }

    pub fn owns_audio(&self, audio: AudioId) -> bool {
        self.active
            .as_ref()
            .and_then(|active| active.audio)
            .is_some_and(|owned| owned == audio)
    }

    pub fn view(&self) -> Option<NotificationView> {
        self.active.as_ref().map(|active| NotificationView {
            kind: active.message.kind,
            text: active.message.text.clone(),
            closable: true,
        })
    }

    fn release(&mut self, cancel_timer: bool) -> Vec<Effect> {
        let Some(active) = self.active.take() else {
            return Vec::new();
        };
        let mut effects = Vec::with_capacity(2);
        if cancel_timer && self.auto_dismiss.is_some() {
            effects.push(Effect::CancelDismiss {
                notification: active.id,
            });
        }
        if let Some(audio) = active.audio {
            effects.push(Effect::StopAudio { audio });
        }
        effects
    }
}
