use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Seam for the payment processor: charges are prepared upstream, the backend
/// only hands the client secret back to the caller.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_intent(&self, amount_in_cents: i64, currency: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    client_secret: String,
}

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
        }
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_intent(&self, amount_in_cents: i64, currency: &str) -> anyhow::Result<String> {
        let params = [
            ("amount", amount_in_cents.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post("https://api.stripe.com/v1/payment_intents")
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .context("stripe payment_intents request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("stripe returned {status}: {body}");
        }

        let intent: IntentResponse = response
            .json()
            .await
            .context("decode stripe payment_intents response")?;
        debug!(amount_in_cents, currency, "payment intent created");
        Ok(intent.client_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_response_reads_the_client_secret() {
        let body = r#"{"id":"pi_123","object":"payment_intent","client_secret":"pi_123_secret_abc","amount":500}"#;
        let intent: IntentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(intent.client_secret, "pi_123_secret_abc");
    }
}
