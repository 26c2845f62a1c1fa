use std::sync::Once;

use site_core::{
    text, update, AppState, Effect, FailureReason, FlowState, Msg, NotificationKind,
    RecoveryRequest, RemoteOutcome, Route, ScreenView,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(site_logging::initialize_for_tests);
}

fn submit_email(email: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::ForgotPassword));
    let (state, _) = update(state, Msg::EmailChanged(email.to_string()));
    update(state, Msg::RequestSubmitted)
}

fn instance_of(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RequestPasswordReset { instance, .. } => Some(*instance),
            _ => None,
        })
        .expect("request effect")
}

#[test]
fn submit_issues_one_request_and_disables_the_form() {
    init_logging();
    let (state, effects) = submit_email("  a@b.com ");

    let instance = instance_of(&effects);
    assert_eq!(
        effects,
        vec![Effect::RequestPasswordReset {
            instance,
            request: RecoveryRequest {
                email: "a@b.com".to_string(),
            },
        }]
    );
    match state.view().screen {
        ScreenView::RequestForm { submit_enabled, .. } => assert!(!submit_enabled),
        other => panic!("unexpected screen {other:?}"),
    }

    // A second submit while the first is in flight is swallowed.
    let (_state, effects) = update(state, Msg::RequestSubmitted);
    assert!(effects.is_empty());
}

#[test]
fn empty_email_is_not_submitted() {
    init_logging();
    let (state, effects) = submit_email("   ");
    assert!(effects.is_empty());
    match state.view().screen {
        ScreenView::RequestForm { submit_enabled, .. } => assert!(submit_enabled),
        other => panic!("unexpected screen {other:?}"),
    }
}

#[test]
fn success_replaces_the_form_with_identity_agnostic_text() {
    init_logging();
    let (state, effects) = submit_email("a@b.com");
    let instance = instance_of(&effects);

    let (state, effects) = update(
        state,
        Msg::PasswordResetRequested {
            instance,
            outcome: RemoteOutcome::Accepted,
        },
    );
    assert!(effects.is_empty(), "success has no audio cue");

    let view = state.view();
    let notification = view.notification.expect("notification");
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.text, "Si el correo existe, te enviamos instrucciones.");
    assert_eq!(
        view.screen,
        ScreenView::RequestSent {
            text: text::REQUEST_SENT_BODY.to_string()
        }
    );

    // Terminal: edits and submits no longer do anything.
    let (state, _) = update(state, Msg::EmailChanged("other@b.com".to_string()));
    let (_state, effects) = update(state, Msg::RequestSubmitted);
    assert!(effects.is_empty());
}

#[test]
fn known_and_unknown_addresses_are_indistinguishable() {
    init_logging();
    let finish = |email: &str| {
        let (state, effects) = submit_email(email);
        let instance = instance_of(&effects);
        let (state, effects) = update(
            state,
            Msg::PasswordResetRequested {
                instance,
                outcome: RemoteOutcome::Accepted,
            },
        );
        (state.view().screen, state.view().notification, effects)
    };

    assert_eq!(finish("known@b.com"), finish("nobody@b.com"));
}

#[test]
fn rejection_shows_generic_text_and_allows_retry() {
    init_logging();
    let (state, effects) = submit_email("a@b.com");
    let instance = instance_of(&effects);

    let (state, effects) = update(
        state,
        Msg::PasswordResetRequested {
            instance,
            outcome: RemoteOutcome::Rejected {
                detail: Some("User does not exist".to_string()),
            },
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::PlayAudio { source, .. }] if source == "/sounds/error.mp3"
    ));
    let view = state.view();
    let notification = view.notification.expect("notification");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.text, text::REQUEST_REJECTED);

    // The form is still there and a retry goes out.
    let (_state, effects) = update(state, Msg::RequestSubmitted);
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, Effect::RequestPasswordReset { .. })));
}

#[test]
fn transport_failure_reports_connectivity() {
    init_logging();
    let (state, effects) = submit_email("a@b.com");
    let instance = instance_of(&effects);

    let (state, _effects) = update(
        state,
        Msg::PasswordResetRequested {
            instance,
            outcome: RemoteOutcome::Unreachable,
        },
    );
    let view = state.view();
    assert_eq!(view.notification.unwrap().text, text::NETWORK_ERROR);
    match view.screen {
        ScreenView::RequestForm { submit_enabled, .. } => assert!(submit_enabled),
        other => panic!("unexpected screen {other:?}"),
    }
}

#[test]
fn retry_releases_the_previous_error_cue() {
    init_logging();
    let (state, effects) = submit_email("a@b.com");
    let instance = instance_of(&effects);
    let (state, effects) = update(
        state,
        Msg::PasswordResetRequested {
            instance,
            outcome: RemoteOutcome::Unreachable,
        },
    );
    let audio = match effects.as_slice() {
        [Effect::PlayAudio { audio, .. }] => *audio,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, effects) = update(state, Msg::RequestSubmitted);
    assert_eq!(effects[0], Effect::StopAudio { audio });
    assert!(state.view().notification.is_none());
}

#[test]
fn flow_state_is_tagged() {
    init_logging();
    let mut flow = site_core::RequestFlow::new(9, Default::default(), None);
    let mut ids = site_core::IdAllocator::new();
    assert_eq!(flow.state(), FlowState::Idle);
    flow.set_email("a@b.com".to_string());
    flow.submit();
    assert_eq!(flow.state(), FlowState::Submitting);
    flow.on_outcome(RemoteOutcome::Rejected { detail: None }, &mut ids);
    assert_eq!(flow.state(), FlowState::Failed(FailureReason::Rejected));
    // Late duplicate reply does nothing.
    assert!(flow.on_outcome(RemoteOutcome::Accepted, &mut ids).is_empty());
    assert_eq!(flow.state(), FlowState::Failed(FailureReason::Rejected));
}
