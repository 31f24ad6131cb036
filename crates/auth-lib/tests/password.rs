// crates/auth-lib/tests/password.rs
use auth_lib::auth::password::{
    hash_password, hash_password_secure, verify_password, BcryptConfig, MIN_SALT_SIZE,
};
use auth_lib::AuthError;

// The minimum work factor keeps the adaptive primitive fast enough for CI.
fn fast_config() -> BcryptConfig {
    BcryptConfig::new().with_cost(4).unwrap()
}

#[test]
fn test_hash_and_verify_round_trip() {
    let hash = hash_password("correct-password", &fast_config()).unwrap();
    assert!(verify_password(&hash, "correct-password"));
}

#[test]
fn test_wrong_password_does_not_verify() {
    let hash = hash_password("correct-password", &fast_config()).unwrap();
    assert!(!verify_password(&hash, "wrong-password"));
    assert!(!verify_password(&hash, ""));
}

#[test]
fn test_generated_salts_differ_between_calls() {
    let config = fast_config();
    let first = hash_password("same-password", &config).unwrap();
    let second = hash_password("same-password", &config).unwrap();

    assert_ne!(first, second);
    assert!(verify_password(&first, "same-password"));
    assert!(verify_password(&second, "same-password"));
}

#[test]
fn test_explicit_salt_is_deterministic_and_shaped() {
    let salt = [0x5Au8; MIN_SALT_SIZE];
    let config = fast_config().with_salt(salt.to_vec()).unwrap();

    let first = hash_password("pinned-salt-password", &config).unwrap();
    let second = hash_password("pinned-salt-password", &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 60);
    assert!(first.starts_with("$2y$04$"));
    assert!(verify_password(&first, "pinned-salt-password"));
}

#[test]
fn test_interoperates_with_stock_bcrypt_verifier() {
    let hash = hash_password("interop-password", &fast_config()).unwrap();
    assert!(bcrypt::verify("interop-password", &hash).unwrap());
}

#[test]
fn test_cost_bounds() {
    assert!(matches!(
        BcryptConfig::new().with_cost(3),
        Err(AuthError::InvalidConfig(_))
    ));
    assert!(matches!(
        BcryptConfig::new().with_cost(32),
        Err(AuthError::InvalidConfig(_))
    ));
    assert!(BcryptConfig::new().with_cost(4).is_ok());
    assert!(BcryptConfig::new().with_cost(31).is_ok());
}

#[test]
fn test_salt_bounds() {
    assert!(matches!(
        BcryptConfig::new().with_salt(vec![1u8; 15]),
        Err(AuthError::InvalidConfig(_))
    ));
    assert!(BcryptConfig::new().with_salt(vec![1u8; 16]).is_ok());
}

#[test]
fn test_malformed_hashes_never_verify() {
    for bad in [
        "",
        "not-a-valid-hash",
        "$2y$10$tooshort",
        "$1$abcdefghijklmnopqrstuvabcdefghijklmnopqrstuvwxyz0123456",
        "$2z$10$abcdefghijklmnopqrstuvabcdefghijklmnopqrstuvwxyz01234",
        "$2y$99$abcdefghijklmnopqrstuvabcdefghijklmnopqrstuvwxyz01234",
    ] {
        assert!(!verify_password(bad, "password"), "verified: {bad:?}");
    }
}

#[test]
fn test_hash_password_secure_wipes_the_plaintext() {
    let mut plain = String::from("wipe-me-after-hashing");
    let hash = hash_password_secure(&mut plain, &fast_config()).unwrap();

    assert!(plain.is_empty());
    assert!(verify_password(&hash, "wipe-me-after-hashing"));
}
