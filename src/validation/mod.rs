// Ordered request gates.
//
// Each gate checks one logical field and either passes or rejects with a fixed
// message. A pipeline stops at the first rejection; errors are never aggregated.

use thiserror::Error;

pub mod crush;
pub mod login;

pub use crush::{validate_crush, CrushPayload};
pub use login::{validate_login, LoginCredentials, LoginPayload};

/// A single gate failure: which field failed and the client-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct Rejection {
    pub field: &'static str,
    pub message: &'static str,
}

impl Rejection {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub type GateFn<T> = fn(&T) -> Result<(), Rejection>;

/// A named step in a validation pipeline
pub struct Gate<T> {
    pub name: &'static str,
    pub check: GateFn<T>,
}

/// Run `gates` in order against `input`, stopping at the first rejection
pub fn run_gates<T>(gates: &[Gate<T>], input: &T) -> Result<(), Rejection> {
    for gate in gates {
        if let Err(rejection) = (gate.check)(input) {
            tracing::warn!("Gate '{}' rejected request: {}", gate.name, rejection.message);
            return Err(rejection);
        }
    }
    Ok(())
}
