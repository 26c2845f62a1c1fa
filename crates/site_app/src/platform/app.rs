use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use site_core::{update, AppState, AppViewModel, Msg, Route, ScreenView};
use site_engine::EngineHandle;
use site_logging::{site_info, site_warn};

use super::audio::TimedAudio;
use super::config::SiteConfig;
use super::effects::EffectRunner;
use super::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub enum Scenario {
    Forgot {
        email: String,
    },
    Reset {
        link: String,
        password: String,
        confirmation: String,
    },
    Loading,
    Logout,
}

impl Scenario {
    fn is_settled(&self, view: &AppViewModel) -> bool {
        match self {
            Scenario::Forgot { .. } => !matches!(
                view.screen,
                ScreenView::RequestForm {
                    submit_enabled: false,
                    ..
                }
            ),
            Scenario::Reset { .. } => !matches!(
                view.screen,
                ScreenView::ConfirmForm {
                    submit_enabled: false,
                    ..
                }
            ),
            Scenario::Loading => view.overlay.is_none(),
            Scenario::Logout => true,
        }
    }
}

pub fn run(config: SiteConfig, scenario: Scenario) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let engine = EngineHandle::new(config.client_settings()).context("starting engine")?;
    let audio = TimedAudio::new(config.clip_durations(), msg_tx.clone());
    let runner = EffectRunner::new(engine, Box::new(audio), config.store_dir.clone(), msg_tx);
    let mut app = App {
        state: AppState::with_settings(config.core_settings()),
        runner,
        msg_rx,
    };

    let script = match &scenario {
        Scenario::Forgot { email } => vec![
            Msg::Navigate(Route::ForgotPassword),
            Msg::EmailChanged(email.clone()),
            Msg::RequestSubmitted,
        ],
        Scenario::Reset {
            link,
            password,
            confirmation,
        } => vec![
            Msg::Navigate(Route::ResetPassword {
                location: link.clone(),
            }),
            Msg::PasswordChanged(password.clone()),
            Msg::PasswordConfirmationChanged(confirmation.clone()),
            Msg::ConfirmSubmitted,
        ],
        Scenario::Loading => {
            let status = config.catalog()?.draw(&mut rand::thread_rng());
            vec![Msg::OverlayMounted { status }]
        }
        Scenario::Logout => vec![Msg::LogoutConfirmed],
    };
    for msg in script {
        app.dispatch(msg);
    }

    let settled = app.wait_until(config.settle_timeout(), |view| scenario.is_settled(view));
    if !settled {
        site_warn!("gave up waiting after {:?}", config.settle_timeout());
        app.dispatch(Msg::OverlayUnmounted);
    }

    // Unmount everything so no cue keeps playing after exit.
    app.dispatch(Msg::Navigate(Route::Home));
    site_info!("{} audio elements attached at exit", app.runner.attached_audio());

    if !settled {
        bail!("timed out waiting for the flow to finish");
    }
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            for line in render(&state.view()) {
                println!("{line}");
            }
        }
        self.state = state;
    }

    /// Pumps replies, timers and audio events until `done` holds or `timeout` passes.
    fn wait_until(&mut self, timeout: Duration, done: impl Fn(&AppViewModel) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while !done(&self.state.view()) {
            if Instant::now() >= deadline {
                return false;
            }
            self.runner.forward_engine_events();
            match self.msg_rx.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }
}
