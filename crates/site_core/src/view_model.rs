use crate::NotificationKind;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: ScreenView,
    pub notification: Option<NotificationView>,
    pub overlay: Option<OverlayView>,
    /// Set once an overlay completed and the gated content may show.
    pub content_revealed: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenView {
    #[default]
    Home,
    RequestForm {
        email: String,
        submit_enabled: bool,
    },
    /// Replaces the request form after success.
    RequestSent { text: String },
    InvalidLink { text: String },
    ConfirmForm {
        password_filled: bool,
        confirmation_filled: bool,
        submit_enabled: bool,
    },
    ConfirmDone {
        text: String,
        sign_in_route: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub kind: NotificationKind,
    pub text: String,
    pub closable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub text: String,
    pub background_video: String,
    pub video_looping: bool,
    pub video_muted: bool,
    /// Rendered at the viewport root rather than inside its logical parent.
    pub viewport_portal: bool,
}
