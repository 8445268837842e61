// src/identity/jwt.rs

use async_trait::async_trait;

use crate::{
    error::AppError,
    identity::{AuthError, IdentityProvider},
    models::identity::{Identity, UserId},
    utils::{html::clean_display_name, jwt::verify_jwt},
};

/// Shown when neither the name claim nor the subject survives cleaning.
const FALLBACK_DISPLAY_NAME: &str = "Anonymous";

/// Accepts HS256 tokens minted by the identity provider with a shared secret.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn sign_in(&self, credential: Option<&str>) -> Result<Identity, AuthError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Cancelled)?;

        let claims = verify_jwt(token, &self.secret).map_err(|e| match e {
            AppError::AuthError(msg) => AuthError::Rejected(msg),
            other => AuthError::Unavailable(other.to_string()),
        })?;

        let uid = UserId::new(claims.sub)
            .ok_or_else(|| AuthError::Rejected("Token has an empty subject".to_string()))?;

        // The subject is provider-controlled text too, so it is cleaned the same way
        let display_name = [claims.name.as_str(), uid.as_str()]
            .into_iter()
            .map(clean_display_name)
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

        tracing::debug!("Signed in {} as '{}'", uid, display_name);
        Ok(Identity::new(uid, display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::identity::GUEST_UID, utils::jwt::sign_jwt};

    const SECRET: &str = "identity_test_secret";

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let provider = JwtIdentityProvider::new(SECRET);
        let token = sign_jwt("u1", "Sam", SECRET, 60).unwrap();

        let identity = provider.sign_in(Some(&token)).await.unwrap();
        assert_eq!(identity.uid.as_str(), "u1");
        assert_eq!(identity.display_name, "Sam");
        assert!(!identity.is_guest());
    }

    #[tokio::test]
    async fn missing_token_is_cancelled() {
        let provider = JwtIdentityProvider::new(SECRET);
        assert_eq!(provider.sign_in(None).await, Err(AuthError::Cancelled));
        assert_eq!(provider.sign_in(Some("  ")).await, Err(AuthError::Cancelled));
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let provider = JwtIdentityProvider::new(SECRET);
        let token = sign_jwt("u1", "Sam", "someone_else", 60).unwrap();
        assert!(matches!(
            provider.sign_in(Some(&token)).await,
            Err(AuthError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn display_name_is_sanitized_with_uid_fallback() {
        let provider = JwtIdentityProvider::new(SECRET);

        let token = sign_jwt("u1", "<img src=x onerror=alert(1)>Sam", SECRET, 60).unwrap();
        let identity = provider.sign_in(Some(&token)).await.unwrap();
        assert_eq!(identity.display_name, "Sam");

        let token = sign_jwt("u2", "", SECRET, 60).unwrap();
        let identity = provider.sign_in(Some(&token)).await.unwrap();
        assert_eq!(identity.display_name, "u2");
    }

    #[tokio::test]
    async fn markup_subject_is_never_echoed_raw() {
        let provider = JwtIdentityProvider::new(SECRET);

        let token = sign_jwt("<img src=x onerror=alert(1)>", "<script>x</script>", SECRET, 60).unwrap();
        let identity = provider.sign_in(Some(&token)).await.unwrap();
        assert!(!identity.display_name.contains('<'));
        assert_eq!(identity.display_name, FALLBACK_DISPLAY_NAME);

        let token = sign_jwt("<b>u3</b>", "", SECRET, 60).unwrap();
        let identity = provider.sign_in(Some(&token)).await.unwrap();
        assert_eq!(identity.display_name, "u3");
    }

    #[tokio::test]
    async fn guest_uid_in_a_real_token_is_not_a_guest() {
        let provider = JwtIdentityProvider::new(SECRET);
        let token = sign_jwt(GUEST_UID, "Sam", SECRET, 60).unwrap();

        let identity = provider.sign_in(Some(&token)).await.unwrap();
        assert_eq!(identity.uid.as_str(), GUEST_UID);
        assert!(!identity.is_guest());
    }
}
