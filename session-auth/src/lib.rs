//! Session authentication primitives
//!
//! Provides the building blocks for credential-based session auth:
//! - Password hashing (Argon2id with per-call salting)
//! - Signed session tokens (HS256) carrying subject and role claims
//!
//! Services compose these primitives behind their own domain traits; this
//! crate holds no storage and no transport concerns.
//!
//! # Examples
//!
//! ## Password hashing
//! ```
//! use session_auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Session tokens
//! ```
//! use chrono::{Duration, Utc};
//! use session_auth::{Role, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(30));
//! let now = Utc::now();
//!
//! let token = codec.issue("alice", Role::User, now).unwrap();
//! let claims = codec.verify(&token, now).unwrap();
//! assert_eq!(claims.sub, "alice");
//! assert_eq!(claims.role, Role::User);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::ParseRoleError;
pub use token::Role;
pub use token::TokenCodec;
pub use token::TokenError;
