//! Seed and master key derivation.
//!
//! The PBKDF2 salt is `"mnemonic"` followed by the mnemonic's creation time,
//! so a mnemonic only reproduces its seed together with that timestamp.

use std::fmt;

use chrono::NaiveDateTime;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    DISPLAY_TIME_FORMAT, MASTER_HMAC_KEY, PBKDF2_ROUNDS, SALT_PREFIX, SALT_TIME_FORMAT, SEED_LEN,
};
use crate::mnemonic::Mnemonic;

type HmacSha512 = Hmac<Sha512>;

/// A 64-byte seed derived from a mnemonic and its creation time.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; SEED_LEN],
}

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self { bytes }
    }

    /// Raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// Root private key and chain code.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    private_key: [u8; 32],
    chain_code: [u8; 32],
}

impl MasterKey {
    /// `HMAC-SHA512("Bitcoin seed", seed)`, split into key and chain code.
    pub fn from_seed_bytes(seed: &[u8]) -> Self {
        let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
            .expect("HMAC accepts any key length");
        mac.update(seed);
        let mut digest = [0u8; 64];
        digest.copy_from_slice(&mac.finalize().into_bytes());

        let mut private_key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        private_key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
        digest.zeroize();
        Self {
            private_key,
            chain_code,
        }
    }

    pub fn from_seed(seed: &Seed) -> Self {
        Self::from_seed_bytes(seed.as_bytes())
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }

    pub fn chain_code_hex(&self) -> String {
        hex::encode(self.chain_code)
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("private_key", &"[REDACTED]")
            .field("chain_code", &"[REDACTED]")
            .finish()
    }
}

/// The PBKDF2 salt for a mnemonic created at `created`. Sub-second precision
/// is dropped.
pub fn salt_for(created: NaiveDateTime) -> String {
    format!("{SALT_PREFIX}{}", created.format(SALT_TIME_FORMAT))
}

/// Parse a creation time written as `YYYY-MM-DD HH:MM:SS`.
pub fn parse_creation_time(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), DISPLAY_TIME_FORMAT)
}

/// Render a creation time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_creation_time(created: NaiveDateTime) -> String {
    created.format(DISPLAY_TIME_FORMAT).to_string()
}

/// PBKDF2-HMAC-SHA512 over the space-joined mnemonic.
pub fn derive_seed(mnemonic: &Mnemonic, created: NaiveDateTime) -> Seed {
    let mut password = mnemonic.to_string();
    let salt = salt_for(created);
    let mut bytes = [0u8; SEED_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut bytes);
    password.zeroize();
    Seed { bytes }
}

/// Derive the seed and master key of `mnemonic` as created at `created`.
pub fn derive(mnemonic: &Mnemonic, created: NaiveDateTime) -> (Seed, MasterKey) {
    let seed = derive_seed(mnemonic, created);
    let master = MasterKey::from_seed(&seed);
    (seed, master)
}
