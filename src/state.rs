use std::sync::Arc;

use mongodb::Database;

use crate::auth::verifier::{JwtVerifier, TokenVerifier};
use crate::config::AppConfig;
use crate::db;
use crate::payments::processor::{PaymentProcessor, StripeClient};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub payments: Arc<dyn PaymentProcessor>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.mongo_uri, &config.database).await?;
        let verifier = Arc::new(JwtVerifier::new(&config.jwt)) as Arc<dyn TokenVerifier>;
        let payments =
            Arc::new(StripeClient::new(&config.stripe_secret_key)) as Arc<dyn PaymentProcessor>;

        Ok(Self {
            db,
            config,
            verifier,
            payments,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use async_trait::async_trait;
        use mongodb::options::{ClientOptions, ServerAddress};

        struct FakePayments;
        #[async_trait]
        impl PaymentProcessor for FakePayments {
            async fn create_intent(
                &self,
                _amount_in_cents: i64,
                _currency: &str,
            ) -> anyhow::Result<String> {
                Ok("pi_fake_secret".into())
            }
        }

        // The driver connects lazily, so a client pointed at localhost is fine
        // for tests that never touch the store.
        let options = ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: "localhost".into(),
                port: Some(27017),
            }])
            .build();
        let client = mongodb::Client::with_options(options).expect("local client");

        let config = Arc::new(AppConfig {
            mongo_uri: "mongodb://localhost:27017".into(),
            database: "profast-test".into(),
            jwt: crate::config::JwtConfig {
                secret: "dev-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            stripe_secret_key: "sk_test_fake".into(),
        });

        let verifier = Arc::new(JwtVerifier::new(&config.jwt)) as Arc<dyn TokenVerifier>;
        let payments = Arc::new(FakePayments) as Arc<dyn PaymentProcessor>;

        Self {
            db: client.database("profast-test"),
            config,
            verifier,
            payments,
        }
    }
}
