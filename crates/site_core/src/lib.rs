//! Site core: pure state machines for the account-recovery flows, the
//! notification channel and the loading overlay.
mod confirm_flow;
mod effect;
mod flow;
mod msg;
mod notification;
mod overlay;
mod request_flow;
mod state;
pub mod text;
mod update;
mod view_model;

pub use confirm_flow::{ConfirmFlow, ConfirmState, RecoveryConfirmation, RecoveryToken};
pub use effect::Effect;
pub use flow::{FailureReason, FlowState, RemoteOutcome};
pub use msg::{Msg, Route};
pub use notification::{NotificationChannel, NotificationKind, NotificationMessage};
pub use overlay::{LoadingCatalog, LoadingStatus, Overlay};
pub use request_flow::{RecoveryRequest, RequestFlow};
pub use state::{AppState, AudioId, CoreSettings, IdAllocator, InstanceId, NotificationId};
pub use update::update;
pub use view_model::{AppViewModel, NotificationView, OverlayView, ScreenView};
