use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use yardage_core::checkout::payment::{PaymentError, PaymentGateway, PaymentOutcome, PaymentRequest};
use yardage_core::config::PaymentProviderConfig;

/// Client for the hosted payment service. The widget flow is represented
/// as one charge call that resolves to completed or cancelled; the
/// service holds the shopper interaction, we only await its verdict.
pub struct HostedPaymentGateway {
    client: Client,
    base_url: String,
    secret_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    status: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl HostedPaymentGateway {
    pub fn new(base_url: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            secret_key,
        }
    }

    pub fn from_config(config: &PaymentProviderConfig) -> Self {
        Self::new(config.base_url.trim_end_matches('/').to_string(), config.secret_key.clone())
    }

    fn charge_url(&self) -> String {
        format!("{}/charge", self.base_url)
    }
}

fn interpret_charge(
    fallback_reference: &str,
    response: ChargeResponse,
) -> Result<PaymentOutcome, PaymentError> {
    match response.status.as_str() {
        "completed" | "success" => Ok(PaymentOutcome::Completed {
            reference: response.reference.unwrap_or_else(|| fallback_reference.to_string()),
        }),
        "cancelled" | "abandoned" => Ok(PaymentOutcome::Cancelled),
        other => Err(PaymentError::Rejected(
            response
                .message
                .unwrap_or_else(|| format!("unexpected charge status `{other}`")),
        )),
    }
}

#[async_trait]
impl PaymentGateway for HostedPaymentGateway {
    async fn charge(&self, request: PaymentRequest) -> Result<PaymentOutcome, PaymentError> {
        let reference = request.reference.clone();

        let response = self
            .client
            .post(self.charge_url())
            .bearer_auth(self.secret_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|error| PaymentError::Transport(error.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::Rejected(format!(
                "charge request returned {}",
                response.status()
            )));
        }

        let body: ChargeResponse = response
            .json()
            .await
            .map_err(|error| PaymentError::Transport(error.to_string()))?;

        interpret_charge(&reference, body)
    }
}

#[cfg(test)]
mod tests {
    use yardage_core::checkout::payment::{PaymentError, PaymentOutcome};

    use super::{interpret_charge, ChargeResponse};

    #[test]
    fn completed_status_keeps_the_service_reference() {
        let outcome = interpret_charge(
            "yardage_1_local",
            ChargeResponse {
                status: "completed".to_string(),
                reference: Some("yardage_1_remote".to_string()),
                message: None,
            },
        )
        .expect("completed");

        assert_eq!(
            outcome,
            PaymentOutcome::Completed { reference: "yardage_1_remote".to_string() }
        );
    }

    #[test]
    fn completed_without_reference_falls_back_to_ours() {
        let outcome = interpret_charge(
            "yardage_1_local",
            ChargeResponse { status: "success".to_string(), reference: None, message: None },
        )
        .expect("completed");

        assert_eq!(
            outcome,
            PaymentOutcome::Completed { reference: "yardage_1_local".to_string() }
        );
    }

    #[test]
    fn cancelled_status_is_not_an_error() {
        let outcome = interpret_charge(
            "yardage_1_local",
            ChargeResponse { status: "abandoned".to_string(), reference: None, message: None },
        )
        .expect("cancelled is a normal outcome");

        assert_eq!(outcome, PaymentOutcome::Cancelled);
    }

    #[test]
    fn unknown_status_is_rejected_with_the_service_message() {
        let error = interpret_charge(
            "yardage_1_local",
            ChargeResponse {
                status: "flagged".to_string(),
                reference: None,
                message: Some("charge held for review".to_string()),
            },
        )
        .expect_err("rejected");

        assert_eq!(error, PaymentError::Rejected("charge held for review".to_string()));
    }
}
