use std::time::Duration;

use crate::confirm_flow::ConfirmFlow;
use crate::overlay::Overlay;
use crate::request_flow::RequestFlow;
use crate::view_model::{AppViewModel, ScreenView};
use crate::NotificationChannel;

/// Identifies one mounted screen. Responses tagged with a stale instance are dropped.
pub type InstanceId = u64;
pub type NotificationId = u64;
pub type AudioId = u64;

/// Monotonic source of instance, notification and audio ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Static settings the state machines need from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    /// Sound played with error notifications.
    pub error_sound: Option<String>,
    /// Auto-dismiss delay for notifications; `None` means explicit close only.
    pub notification_dismiss: Option<Duration>,
    pub background_video: String,
    pub sign_in_route: String,
    /// Local store keys owned by the session, removed on logout.
    pub session_keys: Vec<String>,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            error_sound: Some("/sounds/error.mp3".to_string()),
            notification_dismiss: None,
            background_video: "/videos/loading.mp4".to_string(),
            sign_in_route: "/login".to_string(),
            session_keys: vec![
                "access_token".to_string(),
                "refresh_token".to_string(),
                "user".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Screen {
    #[default]
    Home,
    ForgotPassword(RequestFlow),
    ResetPassword(ConfirmFlow),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) settings: CoreSettings,
    pub(crate) ids: IdAllocator,
    pub(crate) screen: Screen,
    pub(crate) overlay: Option<Overlay>,
    pub(crate) content_revealed: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    /// Instance id of the mounted recovery screen, if any.
    pub fn live_instance(&self) -> Option<InstanceId> {
        match &self.screen {
            Screen::Home => None,
            Screen::ForgotPassword(flow) => Some(flow.instance()),
            Screen::ResetPassword(flow) => Some(flow.instance()),
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn content_revealed(&self) -> bool {
        self.content_revealed
    }

    pub fn view(&self) -> AppViewModel {
        let (screen, notification) = match &self.screen {
            Screen::Home => (ScreenView::Home, None),
            Screen::ForgotPassword(flow) => (flow.view(), flow.notifications().view()),
            Screen::ResetPassword(flow) => (
                flow.view(&self.settings.sign_in_route),
                flow.notifications().view(),
            ),
        };
        AppViewModel {
            screen,
            notification,
            overlay: self.overlay.as_ref().map(Overlay::view),
            content_revealed: self.content_revealed,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn new_channel(&self) -> NotificationChannel {
        NotificationChannel::new(self.settings.notification_dismiss)
    }
}
