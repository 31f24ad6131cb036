// ============================
// crates/auth-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod authenticator;
pub mod password;

pub use authenticator::CredentialAuthenticator;
pub use password::{
    hash_password, hash_password_secure, verify_password, BcryptConfig, DEFAULT_COST, MAX_COST,
    MIN_COST, MIN_SALT_SIZE,
};
