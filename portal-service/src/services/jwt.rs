use crate::config::AuthConfig;
use crate::models::{Staff, StaffRole};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Claims carried by staff access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    /// Subject (user ID)
    pub sub: String,
    pub name: String,
    pub role: StaffRole,
    pub department: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl From<StaffClaims> for Staff {
    fn from(claims: StaffClaims) -> Self {
        Staff::new(claims.sub, claims.name, claims.role, claims.department)
    }
}

/// HS256 token validation (and issuance, for tooling and tests).
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.jwt_issuer.clone(),
        }
    }

    pub fn issue(&self, staff: &Staff, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = StaffClaims {
            sub: staff.user_id.clone(),
            name: staff.name.clone(),
            role: staff.role,
            department: staff.department.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub fn validate(&self, token: &str) -> Result<StaffClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        let data = decode::<StaffClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
