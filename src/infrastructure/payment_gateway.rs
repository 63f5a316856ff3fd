use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::{ConfigError, GatewayConfig};
use crate::domain::errors::CheckoutError;
use crate::domain::payment::VerifiedPayment;
use crate::domain::ports::PaymentGateway;

const SUCCESS: &str = "success";

/// Body of `GET /transaction/verify/{reference}`.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    reference: String,
    /// Minor currency units.
    amount: i64,
}

/// Verifies transactions against the gateway's REST API. Every outcome other
/// than a confirmed success is a failure: the gateway is never trusted when
/// its answer is unknown.
pub struct HttpPaymentGateway {
    client: Client,
    base_url: Url,
    secret_key: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::Invalid {
            key: "PAYMENT_GATEWAY_URL",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "PAYMENT_GATEWAY_URL",
                reason: format!("'{}' cannot carry a path", config.base_url),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "PAYMENT_GATEWAY_TIMEOUT_SECS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            secret_key: config.secret_key.clone(),
        })
    }

    fn verify_url(&self, reference: &str) -> Result<Url, CheckoutError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CheckoutError::GatewayConfig("payment gateway URL cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend(["transaction", "verify", reference]);
        Ok(url)
    }
}

fn transport_failure(e: reqwest::Error) -> CheckoutError {
    if e.is_timeout() {
        CheckoutError::VerificationFailed("payment gateway timed out".to_string())
    } else {
        CheckoutError::VerificationFailed(format!("payment gateway request failed: {e}"))
    }
}

fn interpret(requested: &str, response: VerifyResponse) -> Result<VerifiedPayment, CheckoutError> {
    if !response.status {
        return Err(CheckoutError::VerificationFailed(response.message));
    }
    let data = response.data.ok_or_else(|| {
        CheckoutError::VerificationFailed("gateway response carried no transaction".to_string())
    })?;
    if data.reference != requested {
        return Err(CheckoutError::VerificationFailed(format!(
            "gateway answered for reference '{}'",
            data.reference
        )));
    }
    if data.status != SUCCESS {
        return Err(CheckoutError::VerificationFailed(format!(
            "transaction status is '{}'",
            data.status
        )));
    }
    Ok(VerifiedPayment {
        reference: data.reference,
        gateway_status: data.status,
        amount_paid_minor_units: data.amount,
    })
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, CheckoutError> {
        let secret = self
            .secret_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CheckoutError::GatewayConfig("PAYMENT_GATEWAY_SECRET_KEY is not set".to_string())
            })?;

        let response = self
            .client
            .get(self.verify_url(reference)?)
            .bearer_auth(secret)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CheckoutError::GatewayConfig(format!(
                "payment gateway rejected the credential ({status})"
            )));
        }
        if !status.is_success() {
            return Err(CheckoutError::VerificationFailed(format!(
                "payment gateway answered {status}"
            )));
        }

        let body: VerifyResponse = response.json().await.map_err(transport_failure)?;
        interpret(reference, body)
    }
}
