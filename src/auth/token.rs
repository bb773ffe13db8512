use crate::config::Config;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the account's email address.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch). Optional on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Any additional fields supplied at issuance.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signing and verification material for access tokens.
///
/// Built once from [`Config`] and shared read-only through `web::Data`.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenKeys {
    /// `lifetime` must be positive so every issued token expires strictly in the future.
    pub fn new(secret: &str, algorithm: Algorithm, lifetime: Duration) -> Result<Self, AppError> {
        if lifetime <= Duration::zero() {
            return Err(AppError::InternalServerError(
                "Token lifetime must be positive".into(),
            ));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            lifetime,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            &config.secret_key,
            config.algorithm,
            Duration::minutes(config.access_token_expire_minutes),
        )
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Signs `fields` together with fresh `iat` and `exp` claims.
    ///
    /// `iat` and `exp` always come from the clock, overriding any caller-supplied values.
    pub fn issue(&self, mut fields: Map<String, Value>) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;
        fields.insert("iat".into(), Value::from(now.timestamp()));
        fields.insert("exp".into(), Value::from(expires_at.timestamp()));

        encode(&Header::new(self.algorithm), &fields, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Issues a token whose subject is `email`.
    pub fn issue_for(&self, email: &str) -> Result<String, AppError> {
        let mut fields = Map::new();
        fields.insert("sub".into(), Value::from(email));
        self.issue(fields)
    }

    /// Checks signature, structure, expiry and the presence of `sub`.
    ///
    /// Every failure is reported as `AppError::InvalidCredentials`; the precise reason is
    /// only written to the debug log.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected access token: {}", e);
                AppError::InvalidCredentials
            })
    }
}
