use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ClientResult;

/// Claims of the access token the OAuth callback hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Issue an HS256 access token valid for `ttl_secs`.
pub fn generate_token(
    subject: &str,
    email: &str,
    secret: &str,
    ttl_secs: i64,
) -> ClientResult<String> {
    let now = now_secs();
    let claims = Claims {
        sub: subject.to_string(),
        email: email.to_string(),
        exp: now + ttl_secs,
        iat: now,
        nbf: now,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Check signature and expiry; return the claims.
pub fn validate_token(token: &str, secret: &str) -> ClientResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn test_generate_and_validate_token() {
        let token = generate_token("acct-1", "dev@devsync.app", "secret", 3600).unwrap();
        let claims = validate_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "acct-1");
        assert_eq!(claims.email, "dev@devsync.app");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token("acct-1", "dev@devsync.app", "secret1", 3600).unwrap();
        assert!(matches!(
            validate_token(&token, "secret2"),
            Err(ClientError::Token(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = generate_token("acct-1", "dev@devsync.app", "secret", -3600).unwrap();
        assert!(validate_token(&token, "secret").is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(validate_token("true", "secret").is_err());
    }
}
