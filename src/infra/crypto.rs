use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::api_key::CredentialGenerator,
};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "sk_live_";
const TOKEN_BYTES: usize = 32;
const PUBLIC_ID_PREFIX: &str = "key_";
const PUBLIC_ID_BYTES: usize = 16;
const SALT_BYTES: usize = 16;
const HASH_SCHEME: &str = "hmac-sha256";

/// OS-RNG backed credentials with salted HMAC-SHA256 hashes.
///
/// Hash format: `hmac-sha256$<salt hex>$<digest hex>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureCredentials;

impl CredentialGenerator for SecureCredentials {
    /// `sk_live_<base64url 32 bytes>`
    fn generate_token(&self) -> SecretString {
        SecretString::from(format!("{TOKEN_PREFIX}{}", random_base64(TOKEN_BYTES)))
    }

    /// `key_<base64url 16 bytes>`
    fn generate_public_id(&self) -> String {
        format!("{PUBLIC_ID_PREFIX}{}", random_base64(PUBLIC_ID_BYTES))
    }

    fn hash(&self, token: &SecretString) -> AppResult<String> {
        let mut salt = [0u8; SALT_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut salt);

        let mut mac = HmacSha256::new_from_slice(&salt)
            .map_err(|e| AppError::Internal(format!("hmac init: {e}")))?;
        mac.update(token.expose_secret().as_bytes());
        let digest = mac.finalize().into_bytes();

        Ok(format!(
            "{HASH_SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        ))
    }
}

/// Check `token` against a hash produced by [`SecureCredentials::hash`].
///
/// Comparison is constant time. Malformed hashes never verify.
pub fn verify_token(token: &str, hashed: &str) -> bool {
    let mut parts = hashed.split('$');
    let (Some(scheme), Some(salt_hex), Some(digest_hex), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let (Ok(salt), Ok(digest)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(&salt) else {
        return false;
    };
    mac.update(token.as_bytes());
    mac.verify_slice(&digest).is_ok()
}

fn random_base64(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
