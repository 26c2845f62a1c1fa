//! Site engine: auth-service client, background request execution and the
//! local key-value store.
mod client;
mod engine;
mod store;
mod types;

pub use client::{AuthApi, ClientSettings, ReqwestAuthClient, CONFIRM_PATH, REQUEST_PATH};
pub use engine::EngineHandle;
pub use store::{LocalStore, PersistError, STORE_FILENAME};
pub use types::{AuthError, EngineEvent, FailureKind, ResetConfirmBody, ResetRequestBody, Ticket};
