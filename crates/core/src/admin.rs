use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Shown inline when the entered key does not match; the caller clears
/// the input field for retry.
pub const ACCESS_DENIED_MESSAGE: &str = "Access Denied - Invalid Secret Key";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{ACCESS_DENIED_MESSAGE}")]
pub struct AccessDenied;

/// Binary gate in front of catalog mutation: a verbatim comparison
/// against a fixed shared secret. Not a security boundary — no lockout,
/// no rate limiting, no persistence; every process start is locked.
#[derive(Clone, Debug)]
pub struct AdminGate {
    secret: SecretString,
    unlocked: bool,
}

impl AdminGate {
    pub fn new(secret: SecretString) -> Self {
        Self { secret, unlocked: false }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Compares the entered key against the shared secret. A match
    /// unlocks the gate; a mismatch leaves it locked and reports the
    /// denial.
    pub fn submit(&mut self, entered: &str) -> Result<(), AccessDenied> {
        if entered == self.secret.expose_secret() {
            self.unlocked = true;
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }
}
