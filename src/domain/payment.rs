use super::order::AuthorizationToken;
use std::fmt;

/// Why the payer refused a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    InvalidCardFormat,
    InsufficientFunds,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::InvalidCardFormat => f.write_str("invalid card format"),
            DenialReason::InsufficientFunds => {
                f.write_str("insufficient funds / gateway error")
            }
        }
    }
}

/// Outcome of a single charge attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeResult {
    Approved { token: AuthorizationToken },
    Declined { reason: DenialReason },
}
