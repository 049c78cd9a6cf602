//! Sealed-box encryption of secret values.
//!
//! GitHub only accepts secret values sealed against the repository or environment public
//! key (libsodium `crypto_box_seal`). The ciphertext is base64 encoded in the request.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use github_client::{EncryptedSecret, PublicKey};
use rand::rngs::OsRng;

use crate::errors::{SyncError, SyncResult};

#[cfg(test)]
#[path = "cipher_tests.rs"]
mod tests;

const KEY_LENGTH: usize = 32;

/// Seals `plaintext` for the holder of `public_key`.
///
/// A fresh ephemeral key pair is used on every call, so sealing the same value twice
/// yields different ciphertexts.
pub fn encrypt_secret(
    public_key: &PublicKey,
    name: &str,
    plaintext: &str,
) -> SyncResult<EncryptedSecret> {
    let recipient = decode_public_key(public_key)?;

    let sealed = recipient
        .seal(&mut OsRng, plaintext.as_bytes())
        .map_err(|_| SyncError::Encryption {
            name: name.to_string(),
        })?;

    Ok(EncryptedSecret {
        encrypted_value: STANDARD.encode(sealed),
        key_id: public_key.key_id.clone(),
    })
}

fn decode_public_key(public_key: &PublicKey) -> SyncResult<crypto_box::PublicKey> {
    let invalid = |reason: String| SyncError::InvalidPublicKey {
        key_id: public_key.key_id.clone(),
        reason,
    };

    let bytes = STANDARD
        .decode(public_key.key.as_bytes())
        .map_err(|e| invalid(e.to_string()))?;

    let bytes: [u8; KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        invalid(format!(
            "expected {} bytes, got {}",
            KEY_LENGTH,
            bytes.len()
        ))
    })?;

    Ok(crypto_box::PublicKey::from(bytes))
}
