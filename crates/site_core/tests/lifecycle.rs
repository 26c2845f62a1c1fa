use std::time::Duration;

use site_core::{
    update, AppState, CoreSettings, Effect, Msg, RemoteOutcome, Route, ScreenView,
};

fn init_logging() {
    site_logging::initialize_for_tests();
}

fn failed_request(state: AppState) -> (AppState, u64, Vec<Effect>) {
    let (state, _) = update(state, Msg::Navigate(Route::ForgotPassword));
    let (state, _) = update(state, Msg::EmailChanged("a@b.com".to_string()));
    let (state, effects) = update(state, Msg::RequestSubmitted);
    let instance = match effects.last() {
        Some(Effect::RequestPasswordReset { instance, .. }) => *instance,
        other => panic!("unexpected effect {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::PasswordResetRequested {
            instance,
            outcome: RemoteOutcome::Unreachable,
        },
    );
    (state, instance, effects)
}

#[test]
fn navigation_releases_the_notification_audio() {
    init_logging();
    let (state, _instance, effects) = failed_request(AppState::new());
    let audio = match effects.as_slice() {
        [Effect::PlayAudio { audio, .. }] => *audio,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, effects) = update(state, Msg::Navigate(Route::Home));
    assert_eq!(effects, vec![Effect::StopAudio { audio }]);
    assert_eq!(state.view().screen, ScreenView::Home);
    assert!(state.view().notification.is_none());
}

#[test]
fn replies_after_unmount_are_discarded() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::ForgotPassword));
    let (state, _) = update(state, Msg::EmailChanged("a@b.com".to_string()));
    let (state, effects) = update(state, Msg::RequestSubmitted);
    let stale = match effects.last() {
        Some(Effect::RequestPasswordReset { instance, .. }) => *instance,
        other => panic!("unexpected effect {other:?}"),
    };

    // Leave and come back: a fresh instance with a fresh form.
    let (state, _) = update(state, Msg::Navigate(Route::Home));
    let (mut state, _) = update(state, Msg::Navigate(Route::ForgotPassword));
    assert_ne!(state.live_instance(), Some(stale));
    state.consume_dirty();
    let before = state.view();

    let (mut state, effects) = update(
        state,
        Msg::PasswordResetRequested {
            instance: stale,
            outcome: RemoteOutcome::Accepted,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert!(!state.consume_dirty());
}

#[test]
fn close_dismisses_and_marks_dirty() {
    init_logging();
    let (mut state, _, effects) = failed_request(AppState::new());
    let audio = match effects.as_slice() {
        [Effect::PlayAudio { audio, .. }] => *audio,
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::NotificationClosed);
    assert_eq!(effects, vec![Effect::StopAudio { audio }]);
    assert!(state.consume_dirty());
    assert!(state.view().notification.is_none());

    let (mut state, effects) = update(state, Msg::NotificationClosed);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn configured_auto_dismiss_is_honoured() {
    init_logging();
    let settings = CoreSettings {
        error_sound: None,
        notification_dismiss: Some(Duration::from_secs(5)),
        ..CoreSettings::default()
    };
    let (state, _, effects) = failed_request(AppState::with_settings(settings));
    let notification = match effects.as_slice() {
        [Effect::ScheduleDismiss {
            notification,
            after,
        }] => {
            assert_eq!(*after, Duration::from_secs(5));
            *notification
        }
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, effects) = update(state, Msg::DismissElapsed { notification });
    assert!(effects.is_empty());
    assert!(state.view().notification.is_none());
}

#[test]
fn logout_clears_only_session_keys() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::ForgotPassword));
    let (state, effects) = update(state, Msg::LogoutConfirmed);

    assert_eq!(
        effects,
        vec![Effect::ClearSession {
            keys: vec![
                "access_token".to_string(),
                "refresh_token".to_string(),
                "user".to_string(),
            ],
        }]
    );
    assert_eq!(state.view().screen, ScreenView::Home);
}

#[test]
fn ignored_confirm_submit_does_not_rerender() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::Navigate(Route::ResetPassword {
            location: "?uid=u1&token=t1".to_string(),
        }),
    );
    let (state, _) = update(state, Msg::PasswordChanged("Abc123!".to_string()));
    let (state, _) = update(state, Msg::PasswordConfirmationChanged("Abc123!".to_string()));
    let (mut state, effects) = update(state, Msg::ConfirmSubmitted);
    assert_eq!(effects.len(), 1);
    assert!(state.consume_dirty());

    // Already submitting: nothing changes, nothing to render.
    let (mut state, effects) = update(state, Msg::ConfirmSubmitted);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());

    // Invalid link: the form never exists.
    let (mut state, _) = update(
        state,
        Msg::Navigate(Route::ResetPassword {
            location: "/reset".to_string(),
        }),
    );
    assert!(state.consume_dirty());
    let (mut state, effects) = update(state, Msg::ConfirmSubmitted);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn mismatch_without_cue_still_rerenders() {
    init_logging();
    let settings = CoreSettings {
        error_sound: None,
        ..CoreSettings::default()
    };
    let (state, _) = update(
        AppState::with_settings(settings),
        Msg::Navigate(Route::ResetPassword {
            location: "?uid=u1&token=t1".to_string(),
        }),
    );
    let (state, _) = update(state, Msg::PasswordChanged("a".to_string()));
    let (mut state, _) = update(state, Msg::PasswordConfirmationChanged("b".to_string()));
    state.consume_dirty();

    let (mut state, effects) = update(state, Msg::ConfirmSubmitted);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert!(state.view().notification.is_some());
}
