//! Authentication core
//!
//! Trust anchor shared by the booking, service, staff and user services:
//! - Secret hashing (Argon2id)
//! - Signed, time-bounded access tokens (HS256 JWT)
//! - Credential verification against a pluggable credential store
//! - Login orchestration and bearer-token validation
//!
//! Services bring their own storage by implementing [`CredentialStore`] and
//! receive an [`AuthenticatedPrincipal`] for every request that passes the
//! [`TokenValidationFilter`].
//!
//! # Examples
//!
//! ## Secret Hashing
//! ```
//! use auth_core::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("pw123").unwrap();
//! assert!(hasher.verify("pw123", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth_core::{SigningKey, TokenCodec};
//! use chrono::Duration;
//!
//! let key = SigningKey::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let codec = TokenCodec::new(key, Duration::minutes(30)).unwrap();
//!
//! let token = codec.issue("alice", ["USER"]).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.sub, "alice");
//! ```

pub mod authenticator;
pub mod clock;
pub mod filter;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod store;
pub mod verifier;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationService;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use filter::bearer_token;
pub use filter::Rejected;
pub use filter::RejectionReason;
pub use filter::TokenValidationFilter;
pub use filter::ValidationStage;
pub use jwt::Claims;
pub use jwt::CodecConfigError;
pub use jwt::SigningKey;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use principal::has_role;
pub use principal::AuthenticatedPrincipal;
pub use principal::CredentialRequest;
pub use principal::Principal;
pub use store::CredentialStore;
pub use store::InMemoryCredentialStore;
pub use store::StoreError;
pub use verifier::AuthFailure;
pub use verifier::CredentialVerifier;
pub use verifier::VerificationError;
