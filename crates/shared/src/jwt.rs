//! JWT claim decoding for tokens issued by the external identity server.
//!
//! The identity server signs tokens with a shared secret (HS256). This module
//! only verifies and decodes them; key material is supplied by the caller.

use std::fmt;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Principal type carried by merchant tokens.
pub const BUSINESS_USERTYPE: &str = "business";

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Identifier claim that the identity server may emit as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimId {
    Number(i64),
    Text(String),
}

impl ClaimId {
    /// Returns the numeric value, parsing textual ids when possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimId::Number(n) => Some(*n),
            ClaimId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimId::Number(n) => write!(f, "{}", n),
            ClaimId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Claims of a token issued by the identity server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessClaims {
    /// Principal type ("business", "member", ...)
    #[serde(default)]
    pub usertype: Option<String>,
    /// Identity record id
    #[serde(default)]
    pub id: Option<ClaimId>,
    /// Login user id
    #[serde(default)]
    pub user_id: Option<ClaimId>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Owning merchant account
    #[serde(default)]
    pub business_id: Option<ClaimId>,
    #[serde(default)]
    pub business_name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl BusinessClaims {
    /// Returns true if the token was issued to a merchant account.
    pub fn is_business(&self) -> bool {
        self.usertype.as_deref() == Some(BUSINESS_USERTYPE)
    }
}

/// Verifies the signature and expiry of `token` and returns its claims.
///
/// `leeway_secs` is applied to the expiry check for clock skew tolerance.
pub fn decode_claims(
    token: &str,
    secret: &str,
    algorithm: Algorithm,
    leeway_secs: u64,
) -> Result<BusinessClaims, JwtError> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.leeway = leeway_secs;
    // The identity server does not scope tokens to an audience.
    validation.validate_aud = false;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data =
        decode::<BusinessClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken | ErrorKind::InvalidSignature => JwtError::InvalidToken,
            _ => JwtError::DecodingError(e.to_string()),
        })?;

    Ok(token_data.claims)
}

/// Signs claims with a shared secret.
///
/// Used by tooling and tests that need tokens shaped like the identity server's.
pub fn encode_claims(
    claims: &BusinessClaims,
    secret: &str,
    algorithm: Algorithm,
) -> Result<String, JwtError> {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "test_secret_key_for_jwt_testing_12345";

    fn business_claims(business_id: i64) -> BusinessClaims {
        BusinessClaims {
            usertype: Some("business".to_string()),
            id: Some(ClaimId::Number(7)),
            user_id: Some(ClaimId::Text("u-77".to_string())),
            name: Some("Asha".to_string()),
            business_id: Some(ClaimId::Number(business_id)),
            business_name: Some("Asha Stores".to_string()),
            exp: Utc::now().timestamp() + 600,
            iat: Some(Utc::now().timestamp()),
        }
    }

    #[test]
    fn test_decode_valid_token() {
        let token = encode_claims(&business_claims(42), SECRET, Algorithm::HS256).unwrap();
        let claims = decode_claims(&token, SECRET, Algorithm::HS256, 0).unwrap();

        assert!(claims.is_business());
        assert_eq!(claims.business_id, Some(ClaimId::Number(42)));
        assert_eq!(claims.name.as_deref(), Some("Asha"));
    }

    #[test]
    fn test_expired_token() {
        let mut claims = business_claims(1);
        claims.exp = Utc::now().timestamp() - 120;
        let token = encode_claims(&claims, SECRET, Algorithm::HS256).unwrap();

        let result = decode_claims(&token, SECRET, Algorithm::HS256, 0);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let mut claims = business_claims(1);
        claims.exp = Utc::now().timestamp() - 5;
        let token = encode_claims(&claims, SECRET, Algorithm::HS256).unwrap();

        assert!(decode_claims(&token, SECRET, Algorithm::HS256, 60).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = encode_claims(&business_claims(1), SECRET, Algorithm::HS256).unwrap();
        let result = decode_claims(&token, "another-secret", Algorithm::HS256, 0);

        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token() {
        let result = decode_claims("not_a_jwt", SECRET, Algorithm::HS256, 0);
        assert!(matches!(
            result,
            Err(JwtError::InvalidToken) | Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_claim_id_accepts_numbers_and_strings() {
        let claims: BusinessClaims = serde_json::from_str(
            r#"{"usertype":"business","id":3,"user_id":"abc","business_id":"15","exp":1}"#,
        )
        .unwrap();

        assert_eq!(claims.id, Some(ClaimId::Number(3)));
        assert_eq!(claims.user_id.as_ref().map(|u| u.to_string()), Some("abc".into()));
        assert_eq!(claims.business_id.and_then(|b| b.as_i64()), Some(15));
    }

    #[test]
    fn test_null_business_id_is_absent() {
        let claims: BusinessClaims =
            serde_json::from_str(r#"{"usertype":"business","business_id":null,"exp":1}"#)
                .unwrap();
        assert!(claims.business_id.is_none());
    }

    #[test]
    fn test_non_numeric_text_id() {
        assert_eq!(ClaimId::Text("shop-1".to_string()).as_i64(), None);
        assert_eq!(ClaimId::Text(" 12 ".to_string()).as_i64(), Some(12));
    }

    #[test]
    fn test_member_is_not_business() {
        let mut claims = business_claims(1);
        claims.usertype = Some("member".to_string());
        assert!(!claims.is_business());

        claims.usertype = None;
        assert!(!claims.is_business());
    }

    #[test]
    fn test_jwt_error_display() {
        assert!(format!("{}", JwtError::TokenExpired).contains("expired"));
        assert!(format!("{}", JwtError::InvalidToken).contains("Invalid"));
        assert!(format!("{}", JwtError::EncodingError("test".to_string())).contains("encode"));
        assert!(format!("{}", JwtError::DecodingError("test".to_string())).contains("decode"));
    }
}
