//! # Script Configuration
//!
//! Deployment constants of the account book script. On chain these are fixed
//! at build time; off-chain simulators load them from JSON.

use sb_types::Hash;
use serde::{Deserialize, Serialize};

/// Root of a fresh book's ledger.
///
/// The SMT commits to exactly two leaves, `hash("TotalIncome") -> hash(0)` and
/// `hash("AccountBalance") -> hash(0)`. Every other key, `"Auther"` included,
/// is absent under it.
pub const EMPTY_LEDGER_ROOT: Hash = [
    0x00, 0x06, 0xc4, 0x85, 0x4a, 0x56, 0x99, 0x02, 0xd8, 0x76, 0x0c, 0x07, 0xd5, 0x42, 0x6e, 0x5f,
    0x20, 0xa0, 0xc0, 0x4c, 0x9b, 0x51, 0x16, 0xa1, 0xdb, 0x45, 0x35, 0x62, 0x5e, 0x26, 0xe7, 0x4e,
];

/// Upper bound on cells scanned per transaction side.
pub const DEFAULT_MAX_CELLS: usize = 256;

/// Where the type id lives inside the script args.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeIdConfig {
    /// Byte offset of the 32-byte type id in the args.
    pub args_offset: usize,
}

impl Default for TypeIdConfig {
    fn default() -> Self {
        Self { args_offset: 0 }
    }
}

/// Account book script configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Root a freshly created book must carry.
    #[serde(with = "hex_hash")]
    pub empty_ledger_root: Hash,

    /// Maximum cells scanned per side before the transaction is refused.
    pub max_cells: usize,

    /// Type-ID uniqueness check on creation. `None` disables it.
    pub type_id: Option<TypeIdConfig>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            empty_ledger_root: EMPTY_LEDGER_ROOT,
            max_cells: DEFAULT_MAX_CELLS,
            type_id: Some(TypeIdConfig::default()),
        }
    }
}

impl ScriptConfig {
    /// Create a config for testing (small scan cap).
    pub fn for_testing() -> Self {
        Self {
            max_cells: 32,
            ..Self::default()
        }
    }

    /// Replace the empty ledger root.
    #[must_use]
    pub fn with_empty_ledger_root(mut self, root: Hash) -> Self {
        self.empty_ledger_root = root;
        self
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

mod hex_hash {
    use sb_types::Hash;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let text = String::deserialize(deserializer)?;
        let text = text.strip_prefix("0x").unwrap_or(&text);
        let bytes = hex::decode(text).map_err(D::Error::custom)?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| D::Error::custom(format!("expected 32 bytes, got {}", b.len())))
    }
}
