use crate::errors::CoreError;

use super::encryption::{KdfParams, Sealed, NONCE_LEN, SALT_LEN};

/// Magic bytes at the start of every ledger file.
pub const MAGIC: &[u8; 4] = b"BGTR";

/// Current container version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(3 × 4) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Encode a sealed ledger into the on-disk container.
///
/// Layout (all integers little-endian):
/// ```text
/// [BGTR] [version u16] [memory_cost u32] [time_cost u32] [parallelism u32]
/// [salt 16B] [nonce 12B] [ciphertext_len u64] [ciphertext]
/// ```
pub fn encode(sealed: &Sealed) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + sealed.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&sealed.salt);
    buf.extend_from_slice(&sealed.nonce);
    buf.extend_from_slice(&(sealed.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&sealed.ciphertext);
    buf
}

/// Decode a container back into its sealed parts. Validates magic,
/// version, KDF bounds and length before anything is decrypted.
pub fn decode(data: &[u8]) -> Result<Sealed, CoreError> {
    if data.len() < HEADER_LEN {
        return Err(CoreError::InvalidFileFormat(format!(
            "File too small for a ledger header ({} < {HEADER_LEN} bytes)",
            data.len()
        )));
    }

    let mut reader = Reader { data, offset: 0 };

    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes, not a ledger file".into(),
        ));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    kdf_params.check_bounds()?;

    let salt = reader.take::<SALT_LEN>()?;
    let nonce = reader.take::<NONCE_LEN>()?;
    let declared = u64::from_le_bytes(reader.take()?);

    let remaining = reader.rest();
    if (remaining.len() as u64) < declared {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: header declares {declared} bytes of ciphertext, found {}",
            remaining.len()
        )));
    }

    Ok(Sealed {
        kdf_params,
        salt,
        nonce,
        ciphertext: remaining[..declared as usize].to_vec(),
    })
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                CoreError::InvalidFileFormat(format!("Unexpected end of header at byte {}", self.offset))
            })?;
        self.offset = end;
        Ok(bytes)
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}
