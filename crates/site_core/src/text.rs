//! User-facing strings of the recovery flows.

/// Identity-agnostic: identical whether or not the address has an account.
pub const REQUEST_ACCEPTED: &str = "Si el correo existe, te enviamos instrucciones.";
pub const REQUEST_SENT_BODY: &str = "Revisa tu bandeja de entrada y sigue el enlace para crear una nueva contraseña.";
pub const REQUEST_REJECTED: &str = "No pudimos procesar la solicitud. Intenta de nuevo.";
pub const NETWORK_ERROR: &str = "Error de red. Revisa tu conexión e intenta de nuevo.";

pub const RESET_DONE: &str = "¡Listo! Contraseña actualizada.";
pub const RESET_DONE_BODY: &str = "Ya puedes iniciar sesión con tu nueva contraseña.";
pub const RESET_FAILED: &str = "No se pudo actualizar la contraseña.";
pub const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden.";
pub const INVALID_LINK: &str = "El enlace no es válido o está incompleto. Solicita uno nuevo.";
