use tracing::debug;

use crate::errors::CoreError;

use super::archive::LedgerArchive;
use super::encryption::{self, KdfParams};
use super::format;

/// Save/load a [`LedgerArchive`] as password-protected bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Archive → bincode → AES-256-GCM(Argon2id(password)) → container bytes
    pub fn save_to_bytes(archive: &LedgerArchive, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_with_params(archive, password, KdfParams::default())
    }

    /// Like [`save_to_bytes`](Self::save_to_bytes) with explicit KDF costs.
    pub fn save_with_params(
        archive: &LedgerArchive,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(archive)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, kdf_params)?;
        let bytes = format::encode(&sealed);
        debug!(bytes = bytes.len(), owners = archive.owner_count(), "ledger sealed");
        Ok(bytes)
    }

    /// Container bytes → header → decrypt → bincode → archive
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<LedgerArchive, CoreError> {
        let sealed = format::decode(data)?;
        let plaintext = encryption::open(&sealed, password)?;
        bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize ledger: {e}")))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(
        archive: &LedgerArchive,
        path: impl AsRef<std::path::Path>,
        password: &str,
    ) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(archive, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(
        path: impl AsRef<std::path::Path>,
        password: &str,
    ) -> Result<LedgerArchive, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
