use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::order::OrderSummary;
use crate::domain::selection::SelectedItem;

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub currency: String,
    /// Prefix for generated transaction references.
    pub reference_prefix: String,
}

/// What the hosted gateway is invoked with. `amount_minor` is in the
/// currency's smallest unit (kobo for NGN).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub email: String,
    pub amount_minor: i64,
    pub currency: String,
    pub reference: String,
    pub metadata: PaymentMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    pub products: Vec<SelectedItem>,
    pub total_yards: u32,
}

/// Terminal result of one gateway invocation. The widget either calls
/// back with a reference or is closed without completing; there is no
/// timeout on either (the callback is caller-uncontrolled).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed { reference: String },
    Cancelled,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment gateway rejected the charge: {0}")]
    Rejected(String),
    #[error("payment gateway unreachable: {0}")]
    Transport(String),
}

/// Seam to the hosted payment service. One asynchronous call resolving to
/// success or a cancellation signal; implementations live at the edges
/// (HTTP client in the server, doubles in tests).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: PaymentRequest) -> Result<PaymentOutcome, PaymentError>;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("no products selected")]
    EmptyOrder,
    #[error("email address is required")]
    MissingEmail,
    #[error("a payment is already being processed")]
    AlreadyProcessing,
    #[error("order amount {0} does not convert to whole minor units")]
    Amount(Decimal),
    #[error(transparent)]
    Gateway(#[from] PaymentError),
}

/// `<prefix>_<unix-millis>_<random suffix>` — unique-looking, not a
/// cryptographic guarantee, same shape the gateway dashboard groups by.
pub fn payment_reference(prefix: &str, at: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("{prefix}_{}_{suffix}", at.timestamp_millis())
}

/// Converts a major-unit amount to minor units (x100). Fails if the
/// amount has sub-minor precision or overflows.
pub fn to_minor_units(amount: Decimal) -> Result<i64, Decimal> {
    let scaled = amount.checked_mul(Decimal::ONE_HUNDRED).ok_or(amount)?;
    if scaled.fract() != Decimal::ZERO {
        return Err(amount);
    }
    scaled.trunc().to_i64().ok_or(amount)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    AwaitingCallback,
    /// Payment completed; carries the local confirmation path.
    Done { redirect: String },
}

/// One shopper's payment flow, modeled as an explicit three-state
/// machine. `begin` validates and moves to `AwaitingCallback`; `resolve`
/// applies the gateway outcome — completion records the confirmation
/// redirect, closing the widget resets to `Idle`.
#[derive(Clone, Debug)]
pub struct PaymentSession {
    config: PaymentConfig,
    state: CheckoutState,
}

impl PaymentSession {
    pub fn new(config: PaymentConfig) -> Self {
        Self { config, state: CheckoutState::Idle }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Validates inputs and builds the gateway request, transitioning
    /// `Idle -> AwaitingCallback`. A session already awaiting its callback
    /// refuses a second submit.
    pub fn begin(
        &mut self,
        summary: &OrderSummary,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<PaymentRequest, CheckoutError> {
        if matches!(self.state, CheckoutState::AwaitingCallback) {
            return Err(CheckoutError::AlreadyProcessing);
        }
        if summary.is_empty() {
            return Err(CheckoutError::EmptyOrder);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(CheckoutError::MissingEmail);
        }

        let amount_minor = to_minor_units(summary.total_amount).map_err(CheckoutError::Amount)?;
        let request = PaymentRequest {
            email: email.to_string(),
            amount_minor,
            currency: self.config.currency.clone(),
            reference: payment_reference(&self.config.reference_prefix, at),
            metadata: PaymentMetadata {
                products: summary.items.clone(),
                total_yards: summary.total_yards,
            },
        };

        self.state = CheckoutState::AwaitingCallback;
        Ok(request)
    }

    /// Applies the gateway outcome to the machine and returns the new
    /// state.
    pub fn resolve(&mut self, outcome: PaymentOutcome) -> &CheckoutState {
        self.state = match outcome {
            PaymentOutcome::Completed { reference } => {
                CheckoutState::Done { redirect: format!("/payment-success?ref={reference}") }
            }
            PaymentOutcome::Cancelled => CheckoutState::Idle,
        };
        &self.state
    }

    /// Full flow: begin, invoke the gateway, resolve. A transport or
    /// rejection error also resets the machine so the shopper can retry.
    pub async fn submit(
        &mut self,
        gateway: &dyn PaymentGateway,
        summary: &OrderSummary,
        email: &str,
    ) -> Result<&CheckoutState, CheckoutError> {
        let request = self.begin(summary, email, Utc::now())?;
        match gateway.charge(request).await {
            Ok(outcome) => Ok(self.resolve(outcome)),
            Err(error) => {
                self.state = CheckoutState::Idle;
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::order::OrderSummary;
    use crate::domain::product::ProductId;
    use crate::domain::selection::SelectedItem;

    use super::{
        payment_reference, to_minor_units, CheckoutError, CheckoutState, PaymentConfig,
        PaymentError, PaymentGateway, PaymentOutcome, PaymentRequest, PaymentSession,
    };

    fn summary(total_yards: u32) -> OrderSummary {
        OrderSummary {
            items: vec![SelectedItem {
                id: ProductId("a".to_string()),
                name: "Aria Voile 001".to_string(),
                quantity: total_yards,
            }],
            total_yards,
            total_amount: Decimal::new(3500, 0) * Decimal::from(total_yards),
        }
    }

    fn session() -> PaymentSession {
        PaymentSession::new(PaymentConfig {
            currency: "NGN".to_string(),
            reference_prefix: "yardage".to_string(),
        })
    }

    struct CompletingGateway;

    #[async_trait]
    impl PaymentGateway for CompletingGateway {
        async fn charge(&self, request: PaymentRequest) -> Result<PaymentOutcome, PaymentError> {
            Ok(PaymentOutcome::Completed { reference: request.reference })
        }
    }

    struct ClosingGateway;

    #[async_trait]
    impl PaymentGateway for ClosingGateway {
        async fn charge(&self, _request: PaymentRequest) -> Result<PaymentOutcome, PaymentError> {
            Ok(PaymentOutcome::Cancelled)
        }
    }

    struct UnreachableGateway;

    #[async_trait]
    impl PaymentGateway for UnreachableGateway {
        async fn charge(&self, _request: PaymentRequest) -> Result<PaymentOutcome, PaymentError> {
            Err(PaymentError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn reference_carries_prefix_and_timestamp() {
        let at = Utc::now();
        let reference = payment_reference("yardage", at);
        let mut parts = reference.splitn(3, '_');

        assert_eq!(parts.next(), Some("yardage"));
        assert_eq!(parts.next(), Some(at.timestamp_millis().to_string().as_str()));
        let suffix = parts.next().expect("random suffix");
        assert!(!suffix.is_empty());
    }

    #[test]
    fn minor_unit_conversion_is_exact_for_two_decimals() {
        assert_eq!(to_minor_units(Decimal::new(14_000, 0)), Ok(1_400_000));
        assert_eq!(to_minor_units(Decimal::new(350050, 2)), Ok(350_050));
        assert!(to_minor_units(Decimal::new(1_005, 3)).is_err());
    }

    #[test]
    fn begin_rejects_empty_order_and_blank_email() {
        let mut session = session();

        let empty = OrderSummary {
            items: Vec::new(),
            total_yards: 0,
            total_amount: Decimal::ZERO,
        };
        assert_eq!(
            session.begin(&empty, "shopper@example.com", Utc::now()),
            Err(CheckoutError::EmptyOrder)
        );
        assert_eq!(
            session.begin(&summary(4), "   ", Utc::now()),
            Err(CheckoutError::MissingEmail)
        );
        assert_eq!(session.state(), &CheckoutState::Idle);
    }

    #[test]
    fn begin_moves_to_awaiting_callback_and_blocks_resubmit() {
        let mut session = session();
        let request = session
            .begin(&summary(4), "shopper@example.com", Utc::now())
            .expect("first submit");

        assert_eq!(request.amount_minor, 1_400_000);
        assert_eq!(request.currency, "NGN");
        assert_eq!(request.metadata.total_yards, 4);
        assert_eq!(session.state(), &CheckoutState::AwaitingCallback);

        assert_eq!(
            session.begin(&summary(4), "shopper@example.com", Utc::now()),
            Err(CheckoutError::AlreadyProcessing)
        );
    }

    #[tokio::test]
    async fn completed_payment_lands_on_confirmation_redirect() {
        let mut session = session();
        let state = session
            .submit(&CompletingGateway, &summary(4), "shopper@example.com")
            .await
            .expect("charge completes");

        match state {
            CheckoutState::Done { redirect } => {
                assert!(redirect.starts_with("/payment-success?ref=yardage_"));
            }
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_widget_resets_to_idle() {
        let mut session = session();
        let state = session
            .submit(&ClosingGateway, &summary(4), "shopper@example.com")
            .await
            .expect("close is not an error");

        assert_eq!(state, &CheckoutState::Idle);
    }

    #[tokio::test]
    async fn gateway_failure_resets_to_idle_and_surfaces_error() {
        let mut session = session();
        let result = session
            .submit(&UnreachableGateway, &summary(4), "shopper@example.com")
            .await;

        assert!(matches!(result, Err(CheckoutError::Gateway(_))));
        assert_eq!(session.state(), &CheckoutState::Idle);
    }
}
