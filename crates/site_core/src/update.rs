use site_logging::{site_debug, site_info};

use crate::state::Screen;
use crate::{
    AppState, ConfirmFlow, Effect, Msg, NotificationChannel, Overlay, RequestFlow, Route,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(route) => {
            let mut effects = unmount_screen(&mut state);
            mount_screen(&mut state, route);
            state.mark_dirty();
            effects
        }
        Msg::EmailChanged(email) => {
            if let Screen::ForgotPassword(flow) = &mut state.screen {
                if flow.set_email(email) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::PasswordChanged(password) => {
            if let Screen::ResetPassword(flow) = &mut state.screen {
                if flow.set_password(password) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::PasswordConfirmationChanged(password) => {
            if let Screen::ResetPassword(flow) = &mut state.screen {
                if flow.set_password_confirmation(password) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::RequestSubmitted => match &mut state.screen {
            Screen::ForgotPassword(flow) => flow.submit(),
            _ => Vec::new(),
        },
        Msg::ConfirmSubmitted => match &mut state.screen {
            Screen::ResetPassword(flow) => {
                let before = (flow.flow(), flow.notifications().current_id());
                let effects = flow.submit(&mut state.ids);
                // A mismatch without an error sound changes state but emits nothing.
                if (flow.flow(), flow.notifications().current_id()) != before {
                    state.mark_dirty();
                }
                effects
            }
            _ => Vec::new(),
        },
        Msg::PasswordResetRequested { instance, outcome } => match &mut state.screen {
            Screen::ForgotPassword(flow) if flow.instance() == instance => {
                let effects = flow.on_outcome(outcome, &mut state.ids);
                state.mark_dirty();
                effects
            }
            _ => {
                site_debug!("discarding reset request reply for stale instance {}", instance);
                Vec::new()
            }
        },
        Msg::PasswordResetConfirmed { instance, outcome } => match &mut state.screen {
            Screen::ResetPassword(flow) if flow.instance() == instance => {
                let effects = flow.on_outcome(outcome, &mut state.ids);
                state.mark_dirty();
                effects
            }
            _ => {
                site_debug!("discarding reset confirmation reply for stale instance {}", instance);
                Vec::new()
            }
        },
        Msg::NotificationClosed => match screen_channel(&mut state.screen) {
            Some(channel) if channel.current().is_some() => {
                let effects = channel.dismiss();
                state.mark_dirty();
                effects
            }
            _ => Vec::new(),
        },
        Msg::DismissElapsed { notification } => match screen_channel(&mut state.screen) {
            Some(channel) if channel.current_id() == Some(notification) => {
                let effects = channel.on_dismiss_elapsed(notification);
                state.mark_dirty();
                effects
            }
            _ => Vec::new(),
        },
        Msg::OverlayMounted { status } => {
            let mut effects = state.overlay.take().map(Overlay::unmount).unwrap_or_default();
            let background = state.settings.background_video.clone();
            let (overlay, mount_effects) = Overlay::mount(status, background, &mut state.ids);
            effects.extend(mount_effects);
            state.overlay = Some(overlay);
            state.content_revealed = false;
            effects
        }
        Msg::OverlayUnmounted => match state.overlay.take() {
            Some(overlay) => {
                site_info!("overlay {} unmounted before completion", overlay.audio());
                overlay.unmount()
            }
            None => Vec::new(),
        },
        Msg::AudioEnded { audio } => {
            let completed = state
                .overlay
                .as_mut()
                .is_some_and(|overlay| overlay.on_audio_ended(audio));
            match state.overlay.take() {
                Some(overlay) if completed => {
                    site_info!("overlay {} completed, revealing content", audio);
                    state.content_revealed = true;
                    overlay.unmount()
                }
                other => {
                    // Notification cues stay attached until their message is released.
                    state.overlay = other;
                    Vec::new()
                }
            }
        }
        Msg::AudioFailed { audio, reason } => {
            site_debug!("audio {} failed to play (ignored): {}", audio, reason);
            Vec::new()
        }
        Msg::LogoutConfirmed => {
            let mut effects = unmount_screen(&mut state);
            site_info!(
                "session teardown of {} keys",
                state.settings.session_keys.len()
            );
            effects.push(Effect::ClearSession {
                keys: state.settings.session_keys.clone(),
            });
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    if !effects.is_empty() {
        state.mark_dirty();
    }
    (state, effects)
}

fn screen_channel(screen: &mut Screen) -> Option<&mut NotificationChannel> {
    match screen {
        Screen::Home => None,
        Screen::ForgotPassword(flow) => Some(flow.notifications_mut()),
        Screen::ResetPassword(flow) => Some(flow.notifications_mut()),
    }
}

fn unmount_screen(state: &mut AppState) -> Vec<Effect> {
    match std::mem::take(&mut state.screen) {
        Screen::Home => Vec::new(),
        Screen::ForgotPassword(mut flow) => {
            site_debug!("unmounting request flow {}", flow.instance());
            flow.notifications_mut().teardown()
        }
        Screen::ResetPassword(mut flow) => {
            site_debug!("unmounting confirm flow {}", flow.instance());
            flow.notifications_mut().teardown()
        }
    }
}

fn mount_screen(state: &mut AppState, route: Route) {
    let error_sound = state.settings.error_sound.clone();
    state.screen = match route {
        Route::Home => Screen::Home,
        Route::ForgotPassword => {
            let instance = state.ids.next_id();
            Screen::ForgotPassword(RequestFlow::new(instance, state.new_channel(), error_sound))
        }
        Route::ResetPassword { location } => {
            let instance = state.ids.next_id();
            Screen::ResetPassword(ConfirmFlow::mount(
                instance,
                &location,
                state.new_channel(),
                error_sound,
            ))
        }
    };
}
