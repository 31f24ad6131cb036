// ============================
// crates/auth-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Produces crypt(3)-compatible bcrypt strings of the fixed layout
//! `$2y$<cost>$<salt:22><digest:31>` and verifies credentials against them
//! with a constant-time, full-length comparison. Stored hashes carrying the
//! older `2a`/`2b`/`2x` identifiers still verify; new hashes are only ever
//! `2y`.
use base64::{
    alphabet,
    engine::{
        general_purpose::STANDARD_NO_PAD, DecodePaddingMode, Engine as _, GeneralPurpose,
        GeneralPurposeConfig,
    },
};
use bcrypt::Version;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use crate::error::AuthError;

/// Minimum salt length in bytes
pub const MIN_SALT_SIZE: usize = 16;

/// Lowest work factor the bcrypt primitive accepts
pub const MIN_COST: u32 = 4;

/// Highest work factor the bcrypt primitive accepts
pub const MAX_COST: u32 = 31;

/// Default work factor
pub const DEFAULT_COST: u32 = 10;

/// Characters in the encoded salt field
const SALT_LEN: usize = 22;

/// Characters in the encoded digest
const DIGEST_LEN: usize = 31;

/// `$` + version + `$` + 2-digit cost + `$` + salt + digest
const ENCODED_LEN: usize = 60;

/// bcrypt-alphabet base64, tolerant of the nonzero trailing bits a 22-char
/// salt field may carry.
const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Hashing parameters, validated at construction.
///
/// The work factor is exponential: each increment doubles hashing time.
/// Deployments should derive the cost from measured verify latency on their
/// own hardware (50-250 ms is the usual target) rather than hard-coding it;
/// see [`crate::config::Settings::hasher_config`].
///
/// When no explicit salt is set, every [`hash_password`] call draws a fresh
/// 16-byte salt from OS entropy. Generated salts are never written back into
/// the config, so a single config value can be reused across calls without
/// ever reusing a salt.
#[derive(Debug, Clone)]
pub struct BcryptConfig {
    cost: u32,
    salt: Option<Vec<u8>>,
}

impl Default for BcryptConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
            salt: None,
        }
    }
}

impl BcryptConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the work factor; values outside `[MIN_COST, MAX_COST]` are
    /// rejected here, at configuration time, never during hashing.
    pub fn with_cost(mut self, cost: u32) -> Result<Self, AuthError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::InvalidConfig(format!(
                "the cost parameter of bcrypt must be in range {MIN_COST:02}-{MAX_COST}, got {cost}"
            )));
        }
        self.cost = cost;
        Ok(self)
    }

    /// Supply an explicit salt. Fewer than [`MIN_SALT_SIZE`] bytes is
    /// rejected; the salt is never padded or truncated, though only the
    /// first [`MIN_SALT_SIZE`] bytes reach the encoded salt field.
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let salt = salt.into();
        if salt.len() < MIN_SALT_SIZE {
            return Err(AuthError::InvalidConfig(format!(
                "the salt must be at least {MIN_SALT_SIZE} bytes, got {}",
                salt.len()
            )));
        }
        self.salt = Some(salt);
        Ok(self)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn salt(&self) -> Option<&[u8]> {
        self.salt.as_deref()
    }
}

/// Hash a password into a self-describing bcrypt string.
///
/// Empty passwords are accepted by the primitive; callers wanting to reject
/// them must do so upstream. The plaintext is not retained; callers holding
/// an owned buffer can use [`hash_password_secure`] to wipe it as well.
pub fn hash_password(plain: impl AsRef<[u8]>, config: &BcryptConfig) -> Result<String, AuthError> {
    let plain = plain.as_ref();
    let salt_field = match config.salt() {
        Some(salt) => encode_salt_field(salt),
        None => encode_salt_field(&generate_salt()),
    };

    let digest = bcrypt_digest(plain, config.cost(), &salt_field)?;
    let encoded = format!(
        "${}${:02}${}{}",
        Version::TwoY,
        config.cost(),
        salt_field,
        digest
    );
    if encoded.len() != ENCODED_LEN {
        tracing::error!(len = encoded.len(), "bcrypt produced a malformed hash");
        return Err(AuthError::HashingFailure(format!(
            "encoded hash has length {}, expected {ENCODED_LEN}",
            encoded.len()
        )));
    }
    Ok(encoded)
}

/// Hash a password and zeroize the caller's plaintext buffer, even when
/// hashing fails.
pub fn hash_password_secure(
    plain: &mut String,
    config: &BcryptConfig,
) -> Result<String, AuthError> {
    let hash = hash_password(plain.as_bytes(), config);
    plain.zeroize();
    hash
}

/// Verify a password against a previously produced hash.
///
/// Returns `false` for any malformed hash, wrong length or unrecognized
/// prefix included, so the caller cannot distinguish "bad format" from
/// "wrong password". Never panics and never returns an error.
pub fn verify_password(hash: &str, plain: impl AsRef<[u8]>) -> bool {
    let Some(parsed) = parse_encoded(hash) else {
        return false;
    };
    let Ok(digest) = bcrypt_digest(plain.as_ref(), parsed.cost, parsed.salt) else {
        return false;
    };
    let candidate = format!(
        "${}${:02}${}{}",
        parsed.version, parsed.cost, parsed.salt, digest
    );
    constant_time_eq(candidate.as_bytes(), hash.as_bytes())
}

/// Fresh salt from OS entropy, one per hash when no explicit salt is set
fn generate_salt() -> [u8; MIN_SALT_SIZE] {
    let mut salt = [0u8; MIN_SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// 22-character salt field: standard base64 of the first 16 salt bytes with
/// `+` substituted by `.`, the substitution crypt(3) salt strings require.
fn encode_salt_field(salt: &[u8]) -> String {
    STANDARD_NO_PAD.encode(&salt[..MIN_SALT_SIZE]).replace('+', ".")
}

/// Recover the 16 effective salt bytes a salt field stands for, reading the
/// field with the bcrypt alphabet exactly as crypt(3) does.
fn decode_salt_field(salt_field: &str) -> Result<[u8; MIN_SALT_SIZE], AuthError> {
    let decoded = BCRYPT_B64
        .decode(salt_field)
        .map_err(|e| AuthError::HashingFailure(format!("salt field decode: {e}")))?;
    decoded.try_into().map_err(|_| {
        AuthError::HashingFailure("salt field decoded to the wrong length".to_string())
    })
}

/// Run the adaptive primitive and return the 31-character digest field.
fn bcrypt_digest(plain: &[u8], cost: u32, salt_field: &str) -> Result<String, AuthError> {
    let salt = decode_salt_field(salt_field)?;
    let parts = bcrypt::hash_with_salt(plain, cost, salt)?;
    let formatted = parts.format_for_version(Version::TwoY);
    if formatted.len() < DIGEST_LEN {
        tracing::error!(len = formatted.len(), "bcrypt primitive returned a truncated hash");
        return Err(AuthError::HashingFailure(format!(
            "bcrypt primitive returned a truncated hash ({} chars)",
            formatted.len()
        )));
    }
    Ok(formatted[formatted.len() - DIGEST_LEN..].to_string())
}

struct ParsedHash<'a> {
    version: Version,
    cost: u32,
    salt: &'a str,
}

/// Validate the exact `$<version>$<cost>$<salt><digest>` shape. Anything
/// else is rejected outright, never repaired.
fn parse_encoded(encoded: &str) -> Option<ParsedHash<'_>> {
    if encoded.len() != ENCODED_LEN || !encoded.is_ascii() {
        return None;
    }
    let bytes = encoded.as_bytes();
    if bytes[0] != b'$' || bytes[3] != b'$' || bytes[6] != b'$' {
        return None;
    }
    let version = match &encoded[1..3] {
        "2a" => Version::TwoA,
        "2b" => Version::TwoB,
        "2x" => Version::TwoX,
        "2y" => Version::TwoY,
        _ => return None,
    };
    let cost_field = &encoded[4..6];
    if !cost_field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let cost: u32 = cost_field.parse().ok()?;
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return None;
    }
    let (salt, digest) = encoded[7..].split_at(SALT_LEN);
    if !salt.bytes().all(is_bcrypt_b64_char) || !digest.bytes().all(is_bcrypt_b64_char) {
        return None;
    }
    Some(ParsedHash {
        version,
        cost,
        salt,
    })
}

fn is_bcrypt_b64_char(byte: u8) -> bool {
    byte == b'.' || byte == b'/' || byte.is_ascii_alphanumeric()
}

/// Full-length comparison with no data-dependent early exit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (lhs, rhs) in a.iter().zip(b) {
        diff |= lhs ^ rhs;
    }
    diff == 0
}
