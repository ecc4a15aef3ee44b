//! # Payment Flows
//!
//! Cash tender math and the card/e-wallet authorization state machine.
//!
//! ## Authorization States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Card / E-Wallet Authorization                           │
//! │                                                                         │
//! │     begin ──► AWAITING ──► external authorize call ──┬──► APPROVED      │
//! │                                                      ├──► DECLINED      │
//! │                                                      └──► CANCELLED     │
//! │                                                                         │
//! │  Sale completion proceeds ONLY from APPROVED. A declined or cancelled  │
//! │  authorization leaves the sale open for the operator to retry with    │
//! │  the same or a different method - never automatically.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vela_core::{Money, PaymentMethod};

// =============================================================================
// Cash
// =============================================================================

/// Change owed to the customer: `tendered − total`.
///
/// Negative means the tender does not cover the total; completion is
/// blocked until it does.
#[inline]
pub fn change_due(total: Money, tendered: Money) -> Money {
    tendered - total
}

// =============================================================================
// Card / E-Wallet
// =============================================================================

/// Where an authorization currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    /// The external authorize call is in flight.
    Awaiting,
    /// The provider approved the charge.
    Approved,
    /// The provider refused the charge.
    Declined,
    /// The customer or operator aborted at the terminal.
    Cancelled,
}

/// The final answer of the external authorization step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// Approved, optionally with a provider reference for the receipt.
    Approved { reference: Option<String> },
    /// Refused by the provider.
    Declined,
    /// Aborted at the terminal.
    Cancelled,
}

/// The authorize call itself failed (terminal unreachable, timeout).
///
/// Not a decline - the operator is told the charge may not have been
/// attempted at all.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("payment terminal unavailable: {0}")]
    Unavailable(String),
}

/// The external card/e-wallet authorization collaborator.
///
/// Modeled as a single async call: it resolves when the terminal
/// interaction finishes. The protocol behind it is the host's concern.
#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    /// Runs one authorization for the given amount.
    async fn authorize(
        &self,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<AuthorizationOutcome, AuthorizationError>;
}

/// One card/e-wallet payment attempt within a sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayment {
    pub method: PaymentMethod,
    pub amount: Money,
    pub state: AuthorizationState,
    /// Provider reference, present once approved.
    pub reference: Option<String>,
}

impl CardPayment {
    /// Starts an attempt in the AWAITING state.
    pub fn new(method: PaymentMethod, amount: Money) -> Self {
        CardPayment {
            method,
            amount,
            state: AuthorizationState::Awaiting,
            reference: None,
        }
    }

    /// Applies the authorization outcome.
    pub fn resolve(&mut self, outcome: AuthorizationOutcome) {
        match outcome {
            AuthorizationOutcome::Approved { reference } => {
                self.state = AuthorizationState::Approved;
                self.reference = reference;
            }
            AuthorizationOutcome::Declined => self.state = AuthorizationState::Declined,
            AuthorizationOutcome::Cancelled => self.state = AuthorizationState::Cancelled,
        }
    }

    /// Whether completion may proceed.
    pub fn is_approved(&self) -> bool {
        self.state == AuthorizationState::Approved
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_due() {
        // Tender 500 against total 450 → change 50
        assert_eq!(
            change_due(Money::from_cents(450), Money::from_cents(500)).cents(),
            50
        );
        // Tender 400 against total 450 → short by 50
        assert_eq!(
            change_due(Money::from_cents(450), Money::from_cents(400)).cents(),
            -50
        );
        assert_eq!(
            change_due(Money::from_cents(450), Money::from_cents(450)).cents(),
            0
        );
    }

    #[test]
    fn test_card_payment_lifecycle() {
        let mut payment = CardPayment::new(PaymentMethod::Card, Money::from_cents(1000));
        assert_eq!(payment.state, AuthorizationState::Awaiting);
        assert!(!payment.is_approved());

        payment.resolve(AuthorizationOutcome::Approved {
            reference: Some("AUTH-123".to_string()),
        });
        assert!(payment.is_approved());
        assert_eq!(payment.reference.as_deref(), Some("AUTH-123"));
    }

    #[test]
    fn test_declined_and_cancelled_block_completion() {
        let mut payment = CardPayment::new(PaymentMethod::Card, Money::from_cents(1000));
        payment.resolve(AuthorizationOutcome::Declined);
        assert!(!payment.is_approved());

        let mut payment = CardPayment::new(PaymentMethod::EWallet, Money::from_cents(1000));
        payment.resolve(AuthorizationOutcome::Cancelled);
        assert!(!payment.is_approved());
    }
}
