//! Business token verification.

use std::sync::Arc;

use domain::models::{BusinessId, TenantPrincipal};
use shared::jwt::{decode_claims, ClaimId, JwtError};
use thiserror::Error;
use tracing::debug;

use super::key_cache::{KeyCache, KeyFetchError};

/// Reasons a presented token is rejected.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token is malformed or its signature is invalid")]
    MalformedToken,

    #[error("Token was not issued to a business account")]
    WrongPrincipalType,

    #[error("Token carries no business id")]
    MissingBusinessId,

    #[error("Verification key unavailable: {0}")]
    KeyFetchFailure(#[from] KeyFetchError),
}

impl AuthError {
    /// Message safe to return to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::ExpiredToken => "Token has expired",
            AuthError::MalformedToken => "Invalid token",
            AuthError::WrongPrincipalType => "Only business users are allowed",
            AuthError::MissingBusinessId => "Business ID not found in token",
            AuthError::KeyFetchFailure(_) => "Unable to verify token",
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::ExpiredToken,
            _ => AuthError::MalformedToken,
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for any other scheme. An empty token after the prefix is
/// returned as-is and fails verification.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ")
}

/// Verifies business tokens against the cached identity server key.
pub struct TokenVerifier {
    keys: Arc<KeyCache>,
    leeway_secs: u64,
}

impl TokenVerifier {
    pub fn new(keys: Arc<KeyCache>, leeway_secs: u64) -> Self {
        Self { keys, leeway_secs }
    }

    /// Resolves the principal for an `Authorization` header value.
    ///
    /// `Ok(None)` means the request is anonymous; a present bearer token that
    /// fails verification is an error.
    pub async fn verify_header(
        &self,
        header: Option<&str>,
    ) -> Result<Option<TenantPrincipal>, AuthError> {
        match bearer_token(header) {
            Some(token) => self.verify(token).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<TenantPrincipal, AuthError> {
        let key = self.keys.get_key().await?;
        let claims = decode_claims(token, &key.secret, key.algorithm, self.leeway_secs)?;

        if !claims.is_business() {
            debug!(usertype = ?claims.usertype, "Rejected non-business token");
            return Err(AuthError::WrongPrincipalType);
        }

        let business_id = claims
            .business_id
            .as_ref()
            .and_then(ClaimId::as_i64)
            .map(BusinessId::new)
            .ok_or(AuthError::MissingBusinessId)?;

        Ok(TenantPrincipal {
            identity_id: claims.id.map(|id| id.to_string()),
            user_id: claims.user_id.map(|id| id.to_string()),
            display_name: claims.name,
            business_id,
            business_name: claims.business_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::key_cache::{KeyMaterial, KeySource};
    use async_trait::async_trait;
    use chrono::Utc;
    use jsonwebtoken::Algorithm;
    use shared::jwt::{encode_claims, BusinessClaims};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SECRET: &str = "verifier-test-secret";

    struct FixedSource(Result<KeyMaterial, KeyFetchError>);

    /// Serves the same key and counts fetches.
    #[derive(Default)]
    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl KeySource for CountingSource {
        async fn fetch_key(&self) -> Result<KeyMaterial, KeyFetchError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(KeyMaterial::hs256(SECRET))
        }
    }

    #[async_trait]
    impl KeySource for FixedSource {
        async fn fetch_key(&self) -> Result<KeyMaterial, KeyFetchError> {
            self.0.clone()
        }
    }

    fn verifier_with(source: FixedSource) -> TokenVerifier {
        let cache = KeyCache::new(Arc::new(source), Duration::from_secs(3600));
        TokenVerifier::new(Arc::new(cache), 0)
    }

    fn verifier() -> TokenVerifier {
        verifier_with(FixedSource(Ok(KeyMaterial::hs256(SECRET))))
    }

    fn claims() -> BusinessClaims {
        BusinessClaims {
            usertype: Some("business".to_string()),
            id: Some(ClaimId::Number(11)),
            user_id: Some(ClaimId::Number(5)),
            name: Some("Rahul".to_string()),
            business_id: Some(ClaimId::Number(42)),
            business_name: Some("Rahul Fitness".to_string()),
            exp: Utc::now().timestamp() + 600,
            iat: None,
        }
    }

    fn sign(claims: &BusinessClaims) -> String {
        encode_claims(claims, SECRET, Algorithm::HS256).unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Bearer ")), Some(""));
        assert_eq!(bearer_token(Some("Token abc")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[tokio::test]
    async fn test_valid_business_token() {
        let header = format!("Bearer {}", sign(&claims()));
        let principal = verifier()
            .verify_header(Some(&header))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(principal.business_id, BusinessId::new(42));
        assert_eq!(principal.identity_id.as_deref(), Some("11"));
        assert_eq!(principal.user_id.as_deref(), Some("5"));
        assert_eq!(principal.display_name.as_deref(), Some("Rahul"));
        assert_eq!(principal.business_name.as_deref(), Some("Rahul Fitness"));
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        assert!(verifier().verify_header(None).await.unwrap().is_none());
        assert!(verifier()
            .verify_header(Some("Basic dXNlcjpwYXNz"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_bearer_is_malformed() {
        let result = verifier().verify_header(Some("Bearer ")).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let mut c = claims();
        c.exp = Utc::now().timestamp() - 300;
        let result = verifier().verify(&sign(&c)).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_wrong_signature() {
        let token = encode_claims(&claims(), "some-other-secret", Algorithm::HS256).unwrap();
        let result = verifier().verify(&token).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn test_member_token_rejected() {
        let mut c = claims();
        c.usertype = Some("member".to_string());
        let result = verifier().verify(&sign(&c)).await;
        assert!(matches!(result, Err(AuthError::WrongPrincipalType)));
    }

    #[tokio::test]
    async fn test_missing_business_id_rejected() {
        let mut c = claims();
        c.business_id = None;
        let result = verifier().verify(&sign(&c)).await;
        assert!(matches!(result, Err(AuthError::MissingBusinessId)));
    }

    #[tokio::test]
    async fn test_textual_business_id_accepted() {
        let mut c = claims();
        c.business_id = Some(ClaimId::Text("77".to_string()));
        let principal = verifier().verify(&sign(&c)).await.unwrap();
        assert_eq!(principal.business_id.get(), 77);
    }

    #[tokio::test]
    async fn test_key_fetch_failure() {
        let v = verifier_with(FixedSource(Err(KeyFetchError::Timeout)));
        let result = v.verify(&sign(&claims())).await;

        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::KeyFetchFailure(_)));
        assert_eq!(err.client_message(), "Unable to verify token");
    }

    #[tokio::test(start_paused = true)]
    async fn test_verification_refetches_key_once_per_ttl_window() {
        let source = Arc::new(CountingSource::default());
        let cache = KeyCache::new(source.clone(), Duration::from_secs(3600));
        let verifier = TokenVerifier::new(Arc::new(cache), 0);
        let token = sign(&claims());

        verifier.verify(&token).await.unwrap();
        assert_eq!(source.0.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(3601)).await;
        verifier.verify(&token).await.unwrap();
        assert_eq!(source.0.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(10)).await;
        verifier.verify(&token).await.unwrap();
        assert_eq!(source.0.load(Ordering::SeqCst), 2);
    }
}
