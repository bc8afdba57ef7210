//! Wallet Import Format.
//!
//! `base58(version || key [|| 0x01] || checksum)`, where the checksum is the
//! first four bytes of `SHA-256(SHA-256(payload))`. Version `0x80` is
//! mainnet, `0xEF` testnet. The trailing `0x01` marks a key meant for a
//! compressed public key.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{WIF_CHECKSUM_LEN, WIF_COMPRESSED_FLAG, WIF_MAINNET_VERSION, WIF_TESTNET_VERSION};
use crate::error::WifError;

/// Network a private key is exported for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// WIF version byte for this network.
    pub fn version(self) -> u8 {
        match self {
            Network::Mainnet => WIF_MAINNET_VERSION,
            Network::Testnet => WIF_TESTNET_VERSION,
        }
    }

    /// Look up a network from a WIF version byte.
    pub fn from_version(version: u8) -> Result<Self, WifError> {
        match version {
            WIF_MAINNET_VERSION => Ok(Network::Mainnet),
            WIF_TESTNET_VERSION => Ok(Network::Testnet),
            other => Err(WifError::UnknownVersion(other)),
        }
    }

    pub fn from_testnet_flag(testnet: bool) -> Self {
        if testnet { Network::Testnet } else { Network::Mainnet }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}

/// The fields recovered from a WIF string.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DecodedWif {
    #[zeroize(skip)]
    pub network: Network,
    pub private_key: [u8; 32],
    #[zeroize(skip)]
    pub compressed: bool,
}

impl fmt::Debug for DecodedWif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedWif")
            .field("network", &self.network)
            .field("private_key", &"[REDACTED]")
            .field("compressed", &self.compressed)
            .finish()
    }
}

fn checksum(payload: &[u8]) -> [u8; WIF_CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut out = [0u8; WIF_CHECKSUM_LEN];
    out.copy_from_slice(&digest[..WIF_CHECKSUM_LEN]);
    out
}

/// Encode a 32-byte private key as WIF.
pub fn encode_wif(private_key: &[u8; 32], compressed: bool, testnet: bool) -> String {
    encode_for(private_key, compressed, Network::from_testnet_flag(testnet))
}

/// [`encode_wif`] taking a [`Network`].
pub fn encode_for(private_key: &[u8; 32], compressed: bool, network: Network) -> String {
    let mut payload = Vec::with_capacity(1 + 32 + 1 + WIF_CHECKSUM_LEN);
    payload.push(network.version());
    payload.extend_from_slice(private_key);
    if compressed {
        payload.push(WIF_COMPRESSED_FLAG);
    }
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    let encoded = bs58::encode(&payload).into_string();
    payload.zeroize();
    encoded
}

/// Decode and validate a WIF string.
pub fn decode_wif(text: &str) -> Result<DecodedWif, WifError> {
    let mut raw = bs58::decode(text.trim())
        .into_vec()
        .map_err(|e| WifError::InvalidBase58(e.to_string()))?;
    let result = parse_payload(&raw);
    raw.zeroize();
    result
}

fn parse_payload(raw: &[u8]) -> Result<DecodedWif, WifError> {
    // version + key (+ flag) + checksum
    let compressed = match raw.len() {
        37 => false,
        38 => true,
        n => return Err(WifError::InvalidLength(n)),
    };
    let (payload, check) = raw.split_at(raw.len() - WIF_CHECKSUM_LEN);
    if checksum(payload) != check {
        return Err(WifError::InvalidChecksum);
    }

    let network = Network::from_version(payload[0])?;
    if compressed && payload[33] != WIF_COMPRESSED_FLAG {
        return Err(WifError::InvalidCompressionFlag(payload[33]));
    }

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&payload[1..33]);
    Ok(DecodedWif {
        network,
        private_key,
        compressed,
    })
}
