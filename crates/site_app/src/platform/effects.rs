use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use site_core::{Effect, Msg, NotificationId, RecoveryConfirmation, RemoteOutcome};
use site_engine::{
    AuthError, EngineEvent, EngineHandle, FailureKind, LocalStore, ResetConfirmBody,
    ResetRequestBody,
};
use site_logging::{site_debug, site_error, site_info, site_warn};

use super::audio::AudioBackend;

/// Executes effects from `update`. Replies, timer expiries and audio events
/// come back as `Msg`s on `msg_tx`.
pub struct EffectRunner {
    engine: EngineHandle,
    audio: Box<dyn AudioBackend>,
    timers: HashMap<NotificationId, Arc<AtomicBool>>,
    store_dir: PathBuf,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        audio: Box<dyn AudioBackend>,
        store_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        Self {
            engine,
            audio,
            timers: HashMap::new(),
            store_dir,
            msg_tx,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestPasswordReset { instance, request } => {
                    // One request in flight per instance, so the instance is the ticket.
                    self.engine.request_reset(
                        instance,
                        ResetRequestBody {
                            email: request.email,
                        },
                    );
                }
                Effect::ConfirmPasswordReset {
                    instance,
                    confirmation,
                } => {
                    self.engine
                        .confirm_reset(instance, confirm_body(confirmation));
                }
                Effect::PlayAudio { audio, source } => self.audio.play(audio, &source),
                Effect::StopAudio { audio } => self.audio.stop(audio),
                Effect::ScheduleDismiss {
                    notification,
                    after,
                } => {
                    // Timers whose thread already finished hold the only reference.
                    self.timers.retain(|_, flag| Arc::strong_count(flag) > 1);
                    let cancelled = Arc::new(AtomicBool::new(false));
                    self.timers.insert(notification, cancelled.clone());
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        if !cancelled.load(Ordering::Relaxed) {
                            let _ = msg_tx.send(Msg::DismissElapsed { notification });
                        }
                    });
                }
                Effect::CancelDismiss { notification } => {
                    if let Some(cancelled) = self.timers.remove(&notification) {
                        cancelled.store(true, Ordering::Relaxed);
                    }
                }
                Effect::ClearSession { keys } => self.clear_session(&keys),
            }
        }
    }

    /// Moves finished engine calls onto the message channel.
    pub fn forward_engine_events(&self) {
        while let Some(event) = self.engine.try_recv() {
            let msg = match event {
                EngineEvent::ResetRequested { ticket, result } => Msg::PasswordResetRequested {
                    instance: ticket,
                    outcome: map_result(result),
                },
                EngineEvent::ResetConfirmed { ticket, result } => Msg::PasswordResetConfirmed {
                    instance: ticket,
                    outcome: map_result(result),
                },
            };
            let _ = self.msg_tx.send(msg);
        }
    }

    pub fn attached_audio(&self) -> usize {
        self.audio.attached()
    }

    fn clear_session(&self, keys: &[String]) {
        let mut store = match LocalStore::open(self.store_dir.clone()) {
            Ok(store) => store,
            Err(err) => {
                site_error!("Failed to open local store {:?}: {}", self.store_dir, err);
                return;
            }
        };
        match store.remove_keys(keys) {
            Ok(removed) => site_info!("Logged out, {} session keys removed", removed),
            Err(err) => site_error!("Failed to tear down session: {}", err),
        }
    }
}

fn confirm_body(confirmation: RecoveryConfirmation) -> ResetConfirmBody {
    ResetConfirmBody {
        uid: confirmation.uid,
        token: confirmation.token,
        new_password: confirmation.new_password,
    }
}

fn map_result(result: Result<(), AuthError>) -> RemoteOutcome {
    match result {
        Ok(()) => RemoteOutcome::Accepted,
        Err(AuthError {
            kind: FailureKind::HttpStatus { status, detail },
            ..
        }) => {
            site_debug!("auth service rejected with {}", status);
            RemoteOutcome::Rejected { detail }
        }
        Err(err) => {
            site_warn!("auth service call failed: {}", err);
            RemoteOutcome::Unreachable
        }
    }
}
