//! At-rest encryption for API keys
//!
//! Uses AES-256-GCM with a random 96-bit nonce per value. The stored form is
//! `enc:v1:` followed by `base64(nonce || ciphertext)`; values without the
//! prefix are plaintext.

use crate::types::{AppError, AppResult};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub const ENCRYPTION_KEY_FILE: &str = ".settings_key";
const NONCE_SIZE: usize = 12;
const CIPHERTEXT_PREFIX: &str = "enc:v1:";

#[derive(Clone)]
pub struct SecretCipher {
    key: [u8; 32],
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretCipher(..)")
    }
}

impl SecretCipher {
    pub fn from_key(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Fresh random key, not persisted anywhere
    pub fn random() -> Self {
        Self::from_key(rand::random())
    }

    /// Read the key file in `dir`, creating it if missing or malformed
    pub async fn load_or_create(dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(dir).await?;
        let key_path = dir.join(ENCRYPTION_KEY_FILE);

        if let Ok(key_data) = fs::read_to_string(&key_path).await {
            if let Ok(key_bytes) = BASE64.decode(key_data.trim()) {
                if let Ok(key) = <[u8; 32]>::try_from(key_bytes.as_slice()) {
                    return Ok(Self::from_key(key));
                }
            }
        }

        let key: [u8; 32] = rand::random();
        fs::write(&key_path, BASE64.encode(key)).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            fs::set_permissions(&key_path, perms).await?;
        }

        info!("Generated new encryption key at {:?}", key_path);
        Ok(Self::from_key(key))
    }

    /// Whether a stored value was produced by [`SecretCipher::seal`]
    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(CIPHERTEXT_PREFIX)
    }

    pub fn seal(&self, secret: &str) -> AppResult<String> {
        let nonce_bytes: [u8; NONCE_SIZE] = rand::random();
        let sealed = self
            .aead()
            .encrypt(Nonce::from_slice(&nonce_bytes), secret.as_bytes())
            .map_err(|_| AppError::Crypto("sealing failed".to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_SIZE + sealed.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&sealed);
        Ok(format!("{}{}", CIPHERTEXT_PREFIX, BASE64.encode(payload)))
    }

    pub fn open(&self, stored: &str) -> AppResult<String> {
        let encoded = stored
            .strip_prefix(CIPHERTEXT_PREFIX)
            .ok_or_else(|| AppError::Crypto("value is not sealed".to_string()))?;
        let payload = BASE64
            .decode(encoded)
            .map_err(|e| AppError::Crypto(format!("invalid encoding: {}", e)))?;
        if payload.len() <= NONCE_SIZE {
            return Err(AppError::Crypto("sealed value is truncated".to_string()));
        }

        let (nonce_bytes, sealed) = payload.split_at(NONCE_SIZE);
        let secret = self
            .aead()
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| AppError::Crypto("wrong key or tampered value".to_string()))?;
        String::from_utf8(secret).map_err(|e| AppError::Crypto(e.to_string()))
    }

    fn aead(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }
}
