use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::Role;
use super::errors::TokenError;

/// Codec for issuing and verifying signed session tokens.
///
/// Uses HS256 (HMAC with SHA-256). The current time is passed into `issue`
/// and `verify` by the caller instead of being read from the system clock,
/// so expiry behaviour is deterministic under test.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec from a secret key and a token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `ttl` - Lifetime granted to every issued token
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a signed token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Username the token identifies
    /// * `role` - Role granted to the subject
    /// * `now` - Issue instant; the token expires `ttl` after it
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Arguments
    /// * `token` - Token string to verify
    /// * `now` - Instant the check runs at
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed JWT carrying the expected claims
    /// * `BadSignature` - Token signature does not match the secret
    /// * `Expired` - Token expiration instant has been reached
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the caller-supplied instant
        validation.validate_exp = false;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde::Serialize;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::minutes(30))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = codec();
        let now = fixed_now();

        let token = codec
            .issue("alice", Role::Admin, now)
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = codec.verify(&token, now).expect("Failed to verify token");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, (now + Duration::minutes(30)).timestamp());
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let codec1 = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!", Duration::minutes(30));
        let codec2 = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!", Duration::minutes(30));
        let now = fixed_now();

        let token = codec1
            .issue("alice", Role::User, now)
            .expect("Failed to issue token");

        let result = codec2.verify(&token, now);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_verify_garbage() {
        let codec = codec();

        let result = codec.verify("not.a.token", fixed_now());
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_tampered_payload() {
        let codec = codec();
        let now = fixed_now();

        let token = codec
            .issue("alice", Role::User, now)
            .expect("Failed to issue token");

        // Swap one character in the middle of the payload segment
        let parts: Vec<&str> = token.split('.').collect();
        let payload = parts[1];
        let mid = payload.len() / 2;
        let replacement = if payload.as_bytes()[mid] == b'A' { "B" } else { "A" };
        let tampered_payload = format!(
            "{}{}{}",
            &payload[..mid],
            replacement,
            &payload[mid + 1..]
        );
        let tampered = format!("{}.{}.{}", parts[0], tampered_payload, parts[2]);

        let result = codec.verify(&tampered, now);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_verify_missing_expiry_claim() {
        #[derive(Serialize)]
        struct BareClaims {
            sub: String,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &BareClaims {
                sub: "alice".to_string(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode token");

        let result = codec().verify(&token, fixed_now());
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_expiry_boundary() {
        let ttl = Duration::minutes(30);
        let codec = TokenCodec::new(SECRET, ttl);
        let issued_at = fixed_now();

        let token = codec
            .issue("alice", Role::User, issued_at)
            .expect("Failed to issue token");

        // Valid strictly before expiry, expired from the expiry instant onwards
        assert!(codec.verify(&token, issued_at + ttl - Duration::seconds(1)).is_ok());
        assert!(matches!(
            codec.verify(&token, issued_at + ttl),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            codec.verify(&token, issued_at + ttl + Duration::hours(2)),
            Err(TokenError::Expired)
        ));
    }
}
