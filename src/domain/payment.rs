use sha2::{Digest, Sha256};

use super::errors::CheckoutError;

/// Outcome of a successful gateway verification. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    pub reference: String,
    pub gateway_status: String,
    pub amount_paid_minor_units: i64,
}

impl VerifiedPayment {
    /// Fails with `AmountMismatch` unless the confirmed amount covers `expected`.
    pub fn ensure_covers(&self, expected: i64) -> Result<(), CheckoutError> {
        if self.amount_paid_minor_units < expected {
            return Err(CheckoutError::AmountMismatch {
                expected,
                paid: self.amount_paid_minor_units,
            });
        }
        Ok(())
    }
}

/// Replay-protection key derived from a payment reference: lowercase hex
/// SHA-256 of the trimmed reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn from_reference(reference: &str) -> Self {
        let digest = Sha256::digest(reference.trim().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trims the reference and rejects blank ones.
pub fn normalize_reference(reference: &str) -> Result<&str, CheckoutError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(CheckoutError::ReferenceMissing);
    }
    Ok(trimmed)
}
