//! # Chain Entities
//!
//! Transaction building blocks shared by every script in the family:
//! scripts, out-points, cell inputs and witness arguments.

use crate::codec::{
    read_array, read_bytes, read_option, read_u32, read_u64, read_u8, write_bytes, write_table,
    Record, TableReader,
};
use crate::errors::CodecError;
use serde::{Deserialize, Serialize};

/// A 32-byte hash (script hash, code hash, data hash, SMT root).
pub type Hash = [u8; 32];

/// Length of a [`Hash`].
pub const HASH_SIZE: usize = 32;

/// All-zero hash, the SMT encoding of an absent leaf.
pub const ZERO_HASH: Hash = [0u8; HASH_SIZE];

/// Lowercase hex rendering for log fields.
pub fn to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Lock or type script attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Script {
    /// Hash identifying the script code.
    pub code_hash: Hash,
    /// How `code_hash` is matched against deployed code.
    pub hash_type: u8,
    /// Script arguments.
    pub args: Vec<u8>,
}

impl Script {
    /// Build a script.
    pub fn new(code_hash: Hash, hash_type: u8, args: Vec<u8>) -> Self {
        Self {
            code_hash,
            hash_type,
            args,
        }
    }

    /// Interpret the args as a single 32-byte hash.
    pub fn args_as_hash(&self) -> Option<Hash> {
        self.args.as_slice().try_into().ok()
    }
}

impl Record for Script {
    const NAME: &'static str = "Script";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            self.code_hash.to_vec(),
            vec![self.hash_type],
            write_bytes(&self.args),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let table = TableReader::parse(Self::NAME, data, 3)?;
        Ok(Self {
            code_hash: read_array(Self::NAME, table.field(0))?,
            hash_type: read_u8(Self::NAME, table.field(1))?,
            args: read_bytes(Self::NAME, table.field(2))?.to_vec(),
        })
    }
}

/// Reference to a cell created by an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutPoint {
    /// Hash of the creating transaction.
    pub tx_hash: Hash,
    /// Output index inside that transaction.
    pub index: u32,
}

impl OutPoint {
    /// Encoded struct size.
    pub const SIZE: usize = HASH_SIZE + 4;

    /// Build an out-point.
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl Record for OutPoint {
    const NAME: &'static str = "OutPoint";

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        out.extend_from_slice(&self.tx_hash);
        out.extend_from_slice(&self.index.to_le_bytes());
        out
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() != Self::SIZE {
            return Err(CodecError::FixedLength {
                record: Self::NAME,
                expected: Self::SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            tx_hash: read_array(Self::NAME, &data[..HASH_SIZE])?,
            index: read_u32(Self::NAME, &data[HASH_SIZE..])?,
        })
    }
}

/// A transaction input: the consumed out-point plus its `since` lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CellInput {
    /// Relative/absolute time lock.
    pub since: u64,
    /// Cell being consumed.
    pub previous_output: OutPoint,
}

impl CellInput {
    /// Encoded struct size.
    pub const SIZE: usize = 8 + OutPoint::SIZE;

    /// Build a cell input.
    pub fn new(previous_output: OutPoint, since: u64) -> Self {
        Self {
            since,
            previous_output,
        }
    }
}

impl Record for CellInput {
    const NAME: &'static str = "CellInput";

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        out.extend_from_slice(&self.since.to_le_bytes());
        out.extend_from_slice(&self.previous_output.encode());
        out
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() != Self::SIZE {
            return Err(CodecError::FixedLength {
                record: Self::NAME,
                expected: Self::SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            since: read_u64(Self::NAME, &data[..8])?,
            previous_output: OutPoint::decode(&data[8..])?,
        })
    }
}

/// Per-input/output witness slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WitnessArgs {
    /// Consumed by the lock script.
    pub lock: Option<Vec<u8>>,
    /// Consumed by the input's type script.
    pub input_type: Option<Vec<u8>>,
    /// Consumed by the output's type script.
    pub output_type: Option<Vec<u8>>,
}

impl WitnessArgs {
    /// Witness carrying only an output-type payload.
    pub fn with_output_type(payload: Vec<u8>) -> Self {
        Self {
            output_type: Some(payload),
            ..Self::default()
        }
    }

    /// Witness carrying only an input-type payload.
    pub fn with_input_type(payload: Vec<u8>) -> Self {
        Self {
            input_type: Some(payload),
            ..Self::default()
        }
    }
}

fn encode_opt_bytes(value: &Option<Vec<u8>>) -> Vec<u8> {
    value.as_deref().map(write_bytes).unwrap_or_default()
}

fn decode_opt_bytes(record: &'static str, data: &[u8]) -> Result<Option<Vec<u8>>, CodecError> {
    read_option(data)
        .map(|inner| read_bytes(record, inner).map(<[u8]>::to_vec))
        .transpose()
}

impl Record for WitnessArgs {
    const NAME: &'static str = "WitnessArgs";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            encode_opt_bytes(&self.lock),
            encode_opt_bytes(&self.input_type),
            encode_opt_bytes(&self.output_type),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let table = TableReader::parse(Self::NAME, data, 3)?;
        Ok(Self {
            lock: decode_opt_bytes(Self::NAME, table.field(0))?,
            input_type: decode_opt_bytes(Self::NAME, table.field(1))?,
            output_type: decode_opt_bytes(Self::NAME, table.field(2))?,
        })
    }
}
