// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! Symmetric cipher and content hashing for stored objects.
//!
//! Encryption: AES-256-CBC with PKCS#7 padding. The 256-bit cipher key is
//! SHA-256 of the raw device key bytes, so device keys of any length map to
//! a valid AES key. Every encryption draws a fresh random 16-byte salt (the
//! CBC initialization vector), which is stored in object metadata and
//! required for decryption. Same key + same plaintext therefore never
//! produces the same ciphertext twice, and identical content is never
//! deduplicated.
//!
//! CBC does not authenticate: corrupted ciphertext may fail un-padding
//! (surfaced here as [`DecryptionError`]) or decrypt cleanly into wrong
//! bytes. Correctness of a decrypted object is established only by the
//! separate plaintext-hash check in the provenance service, never by
//! decryption succeeding.
//!
//! Hashing: SHA-256, used over ciphertext (object storage name) and over
//! plaintext (integrity metadata).

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length in bytes of the per-object salt (the CBC IV).
pub const SALT_LEN: usize = 16;

/// Decryption failed: the key/salt/ciphertext triple is inconsistent.
///
/// Deliberately carries no detail. A wrong key and corrupted ciphertext are
/// indistinguishable here, and neither should leak specifics to callers.
#[derive(Debug, Error)]
#[error("ciphertext could not be decrypted")]
pub struct DecryptionError;

/// Derive the fixed-length AES-256 key from raw device key bytes.
fn cipher_key(device_key: &[u8]) -> [u8; 32] {
    Sha256::digest(device_key).into()
}

/// Encrypt `plaintext` under `device_key` with a fresh random salt.
///
/// Returns `(salt, ciphertext)`. The salt must be stored alongside the
/// ciphertext; without it the object is unrecoverable.
pub fn encrypt(device_key: &[u8], plaintext: &[u8]) -> ([u8; SALT_LEN], Vec<u8>) {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let key = cipher_key(device_key);
    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &salt.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    (salt, ciphertext)
}

/// Decrypt ciphertext produced by [`encrypt`] with the same key and salt.
pub fn decrypt(
    device_key: &[u8],
    salt: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, DecryptionError> {
    let iv: [u8; SALT_LEN] = salt.try_into().map_err(|_| DecryptionError)?;
    let key = cipher_key(device_key);
    Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| DecryptionError)
}

/// SHA-256 digest of `data`.
pub fn digest(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 digest of `data` as lowercase hex (64 chars).
pub fn digest_hex(data: &[u8]) -> String {
    hex::encode(digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_encrypt_decrypt() {
        let key = b"device-key";
        let plaintext = b"provenance payload bytes";

        let (salt, ciphertext) = encrypt(key, plaintext);
        assert_ne!(ciphertext.as_slice(), plaintext.as_slice());
        // CBC+PKCS7 output is block-aligned and strictly longer than input.
        assert_eq!(ciphertext.len() % 16, 0);
        assert!(ciphertext.len() > plaintext.len());

        let decrypted = decrypt(key, &salt, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = b"k";
        let (salt, ciphertext) = encrypt(key, b"");
        // One full padding block.
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(decrypt(key, &salt, &ciphertext).unwrap(), b"");
    }

    #[test]
    fn same_input_yields_different_ciphertexts() {
        let key = b"device-key";
        let plaintext = b"repeated upload";

        let (salt_a, ct_a) = encrypt(key, plaintext);
        let (salt_b, ct_b) = encrypt(key, plaintext);

        assert_ne!(salt_a, salt_b);
        assert_ne!(ct_a, ct_b);
        // Both still decrypt to the identical plaintext.
        assert_eq!(decrypt(key, &salt_a, &ct_a).unwrap(), plaintext);
        assert_eq!(decrypt(key, &salt_b, &ct_b).unwrap(), plaintext);
    }

    #[test]
    fn wrong_key_does_not_yield_plaintext() {
        let (salt, ciphertext) = encrypt(b"right-key", b"secret data here");
        match decrypt(b"wrong-key", &salt, &ciphertext) {
            // Un-padding usually fails outright with a wrong key...
            Err(DecryptionError) => {}
            // ...but CBC may occasionally produce valid padding. The result
            // must then differ from the plaintext; the hash check upstream
            // is what rejects it.
            Ok(garbage) => assert_ne!(garbage, b"secret data here"),
        }
    }

    #[test]
    fn bad_salt_length_is_a_decryption_error() {
        let (_, ciphertext) = encrypt(b"key", b"data");
        assert!(decrypt(b"key", &[0u8; 12], &ciphertext).is_err());
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let (salt, ciphertext) = encrypt(b"key", b"0123456789abcdef0123456789abcdef");
        assert!(decrypt(b"key", &salt, &ciphertext[..ciphertext.len() - 1]).is_err());
    }

    #[test]
    fn digest_is_deterministic_and_hex_is_64_chars() {
        let a = digest_hex(b"content");
        let b = digest_hex(b"content");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, digest_hex(b"other content"));
    }

    #[test]
    fn digest_matches_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            digest_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
