use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use site_logging::site_debug;

use crate::client::{AuthApi, ClientSettings, ReqwestAuthClient};
use crate::{AuthError, EngineEvent, ResetConfirmBody, ResetRequestBody, Ticket};

enum EngineCommand {
    RequestReset {
        ticket: Ticket,
        body: ResetRequestBody,
    },
    ConfirmReset {
        ticket: Ticket,
        body: ResetConfirmBody,
    },
}

/// Runs auth-service calls on a background tokio runtime. Dropping the handle
/// stops the worker and abandons calls still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, AuthError> {
        let client = ReqwestAuthClient::new(settings)?;
        Self::with_api(Arc::new(client)).map_err(|err| {
            AuthError::new(crate::FailureKind::Network, format!("runtime: {err}"))
        })
    }

    pub fn with_api(api: Arc<dyn AuthApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
            site_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn request_reset(&self, ticket: Ticket, body: ResetRequestBody) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::RequestReset { ticket, body });
    }

    pub fn confirm_reset(&self, ticket: Ticket, body: ResetConfirmBody) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ConfirmReset { ticket, body });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    api: &dyn AuthApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::RequestReset { ticket, body } => EngineEvent::ResetRequested {
            ticket,
            result: api.request_password_reset(&body).await,
        },
        EngineCommand::ConfirmReset { ticket, body } => EngineEvent::ResetConfirmed {
            ticket,
            result: api.confirm_password_reset(&body).await,
        },
    };
    // The receiver is gone once the handle is dropped; the reply is discarded.
    let _ = event_tx.send(event);
}
