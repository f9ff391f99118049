//! JWT verification for tokens issued by the identity service.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use redator_core::ports::{AuthError, TokenClaims, TokenVerifier};

/// JWT verifier configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Required `iss` claim, when set.
    pub issuer: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            issuer: None,
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-in-production".to_string());

        if secret == "change-me-in-production" {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
        }
    }
}

/// Wire form of the claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
}

/// HS256 bearer token verifier.
pub struct JwtTokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    /// Sign a token the way the identity service does. Used by local
    /// tooling and tests; the server itself never issues tokens.
    pub fn issue(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        ttl: TimeDelta,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            role: Some("authenticated".to_string()),
            exp: (Utc::now() + ttl).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_aud = false;
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: token_data.claims.email,
            role: token_data.claims.role,
            exp: token_data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier(issuer: Option<&str>) -> JwtTokenVerifier {
        JwtTokenVerifier::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            issuer: issuer.map(str::to_string),
        })
    }

    #[test]
    fn issued_token_round_trips() {
        let service = verifier(Some("identity"));
        let user_id = Uuid::new_v4();

        let token = service
            .issue(user_id, Some("autor@exemplo.com"), TimeDelta::hours(1))
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email.as_deref(), Some("autor@exemplo.com"));
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn garbage_is_invalid() {
        let result = verifier(None).validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = verifier(None);
        let token = service
            .issue(Uuid::new_v4(), None, TimeDelta::hours(-2))
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let token = verifier(Some("issuer1"))
            .issue(Uuid::new_v4(), None, TimeDelta::hours(1))
            .unwrap();

        assert!(verifier(Some("issuer2")).validate_token(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = verifier(None)
            .issue(Uuid::new_v4(), None, TimeDelta::hours(1))
            .unwrap();
        let other = JwtTokenVerifier::new(JwtConfig {
            secret: "another-secret".to_string(),
            issuer: None,
        });

        assert!(matches!(
            other.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
