use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub database: String,
    pub jwt: JwtConfig,
    pub stripe_secret_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongo_uri = std::env::var("MONGODB_URI")?;
        let database = std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "profast".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "profast".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "profast-users".into()),
        };
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY").unwrap_or_default();
        Ok(Self {
            mongo_uri,
            database,
            jwt,
            stripe_secret_key,
        })
    }
}
