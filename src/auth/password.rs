use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::{rngs::OsRng, RngCore};
use tracing::error;

use crate::config::AuthConfig;

/// Random salt of `size` bytes, B64-encoded so it can be stored next to the hash.
pub fn create_salt(size: usize) -> anyhow::Result<String> {
    let mut bytes = vec![0u8; size];
    OsRng.fill_bytes(&mut bytes);
    let salt = SaltString::encode_b64(&bytes).map_err(|e| {
        error!(error = %e, size, "salt encoding error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(salt.as_str().to_owned())
}

fn hasher(cfg: &AuthConfig) -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(
        cfg.memory_cost_kib,
        cfg.iteration_count,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(plain: &str, salt: &str, cfg: &AuthConfig) -> anyhow::Result<String> {
    let salt = SaltString::from_b64(salt).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let hash = hasher(cfg)?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Re-hash `plain` with the stored salt and the configured iteration count and
/// compare the outputs in constant time.
pub fn verify_password(
    plain: &str,
    hash: &str,
    salt: &str,
    cfg: &AuthConfig,
) -> anyhow::Result<bool> {
    let stored = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    let salt = SaltString::from_b64(salt).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let candidate = hasher(cfg)?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(stored.hash.is_some() && candidate.hash == stored.hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn cfg() -> AuthConfig {
        AppConfig::for_tests().auth
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let cfg = cfg();
        let salt = create_salt(cfg.salt_size).expect("salt");
        let hash = hash_password("Secur3P@ssw0rd!", &salt, &cfg).expect("hashing should succeed");
        assert!(verify_password("Secur3P@ssw0rd!", &hash, &salt, &cfg).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let cfg = cfg();
        let salt = create_salt(cfg.salt_size).expect("salt");
        let hash = hash_password("correct-horse-battery-staple", &salt, &cfg).expect("hash");
        assert!(!verify_password("wrong-password", &hash, &salt, &cfg).expect("verify should not error"));
    }

    #[test]
    fn verify_rejects_other_salt() {
        let cfg = cfg();
        let salt = create_salt(cfg.salt_size).expect("salt");
        let other = create_salt(cfg.salt_size).expect("salt");
        let hash = hash_password("same-password", &salt, &cfg).expect("hash");
        assert!(!verify_password("same-password", &hash, &other, &cfg).expect("verify"));
    }

    #[test]
    fn iteration_count_changes_the_hash() {
        let cfg = cfg();
        let mut slower = cfg.clone();
        slower.iteration_count = 2;
        let salt = create_salt(cfg.salt_size).expect("salt");
        let hash = hash_password("password123", &salt, &cfg).expect("hash");
        assert!(!verify_password("password123", &hash, &salt, &slower).expect("verify"));
    }

    #[test]
    fn salts_are_random_and_sized() {
        let a = create_salt(16).expect("salt");
        let b = create_salt(16).expect("salt");
        assert_ne!(a, b);
        // 16 bytes, unpadded B64
        assert_eq!(a.len(), 22);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let cfg = cfg();
        let salt = create_salt(cfg.salt_size).expect("salt");
        let err = verify_password("anything", "not-a-valid-hash", &salt, &cfg).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
