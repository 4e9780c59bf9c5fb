use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::JwtConfig;

/// Verified identity attached to a request after credential verification.
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
}

/// Seam for the external identity provider: takes the raw bearer credential,
/// yields the verified principal or an error.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> anyhow::Result<Principal>;
}

/// Claims expected in an identity token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user email
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

/// HS256 verifier with issuer/audience validation.
pub struct JwtVerifier {
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> anyhow::Result<Principal> {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_audience(std::slice::from_ref(&self.audience));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(email = %data.claims.sub, "token verified");
        Ok(Principal {
            email: data.claims.sub,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Claims;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    use crate::config::JwtConfig;

    pub fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "dev-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
        }
    }

    pub fn sign_token(config: &JwtConfig, email: &str) -> String {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + Duration::minutes(5)).unix_timestamp() as usize,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("sign token")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{sign_token, test_config};
    use super::*;

    #[tokio::test]
    async fn verifies_a_signed_token() {
        let config = test_config();
        let verifier = JwtVerifier::new(&config);
        let token = sign_token(&config, "u@x.com");
        let principal = verifier.verify(&token).await.expect("verify token");
        assert_eq!(principal.email, "u@x.com");
    }

    #[tokio::test]
    async fn rejects_wrong_issuer_or_audience() {
        let config = test_config();
        let mut other = test_config();
        other.issuer = "other-issuer".into();
        other.audience = "other-aud".into();
        let verifier = JwtVerifier::new(&other);
        let token = sign_token(&config, "u@x.com");
        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn rejects_garbage_tokens() {
        let verifier = JwtVerifier::new(&test_config());
        assert!(verifier.verify("not-a-jwt").await.is_err());
    }
}
