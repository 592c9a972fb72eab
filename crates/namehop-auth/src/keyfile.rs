//! Loading key material from disk.
//!
//! Keys are hex-encoded 32-byte files: the verifying key holds a public
//! key, the signing key holds an Ed25519 seed. Both are loaded once at
//! process start into an immutable [`crate::AuthConfig`].

use std::path::Path;

use namehop_core::{Ed25519PublicKey, Keypair};

use crate::error::{AuthError, Result};

/// Load a hex-encoded verifying (public) key.
pub fn load_verifying_key(path: impl AsRef<Path>) -> Result<Ed25519PublicKey> {
    let contents = std::fs::read_to_string(path)?;
    Ed25519PublicKey::from_hex(contents.trim())
        .map_err(|e| AuthError::KeyFile(format!("verifying key: {}", e)))
}

/// Load a hex-encoded signing key seed.
pub fn load_signing_key(path: impl AsRef<Path>) -> Result<Keypair> {
    let contents = std::fs::read_to_string(path)?;
    let bytes = hex::decode(contents.trim())
        .map_err(|e| AuthError::KeyFile(format!("signing key: {}", e)))?;
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| AuthError::KeyFile("signing key: expected 32 bytes".to_string()))?;
    Ok(Keypair::from_seed(&seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_keypair_files() {
        let dir = tempfile::tempdir().unwrap();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        let pub_path = dir.path().join("registry.pub");
        let key_path = dir.path().join("registry.key");
        let mut f = std::fs::File::create(&pub_path).unwrap();
        writeln!(f, "{}", keypair.public_key().to_hex()).unwrap();
        let mut f = std::fs::File::create(&key_path).unwrap();
        writeln!(f, "{}", hex::encode(keypair.seed())).unwrap();

        let loaded_pub = load_verifying_key(&pub_path).unwrap();
        let loaded_key = load_signing_key(&key_path).unwrap();

        assert_eq!(loaded_pub, keypair.public_key());
        assert_eq!(loaded_key.public_key(), keypair.public_key());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pub");
        std::fs::write(&path, "not hex at all").unwrap();

        assert!(matches!(
            load_verifying_key(&path),
            Err(AuthError::KeyFile(_))
        ));
    }

    #[test]
    fn test_load_rejects_wrong_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.key");
        std::fs::write(&path, "deadbeef").unwrap();

        assert!(matches!(
            load_signing_key(&path),
            Err(AuthError::KeyFile(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_verifying_key("/nonexistent/registry.pub"),
            Err(AuthError::Io(_))
        ));
    }
}
