//! # Molecule Codec
//!
//! Bounds-checked reader/writer for the subset of the molecule encoding used
//! by on-chain records:
//!
//! - **table**: `total_size: u32 | offsets: [u32; n] | fields...`
//! - **fixvec<byte>** (`Bytes`): `item_count: u32 | items...`
//! - **option**: empty slice is `None`, otherwise the inner value
//! - **union**: `item_id: u32 | item...`
//! - **struct / array**: fixed-size little-endian bytes
//!
//! Decoding is strict: a table must carry exactly the schema's field count,
//! so two records compare equal iff their encodings are byte-identical.

use crate::errors::CodecError;

/// Size of every molecule length/offset word.
pub const NUMBER_SIZE: usize = 4;

/// A record with a canonical molecule encoding.
pub trait Record: Sized {
    /// Schema name used in error messages.
    const NAME: &'static str;

    /// Encode into molecule bytes.
    fn encode(&self) -> Vec<u8>;

    /// Decode from molecule bytes, rejecting anything non-canonical.
    fn decode(data: &[u8]) -> Result<Self, CodecError>;
}

// =============================================================================
// TABLES
// =============================================================================

/// Field view over a verified table.
#[derive(Debug)]
pub struct TableReader<'a> {
    data: &'a [u8],
    offsets: Vec<usize>,
}

impl<'a> TableReader<'a> {
    /// Verify the table header and split it into `field_count` fields.
    pub fn parse(
        record: &'static str,
        data: &'a [u8],
        field_count: usize,
    ) -> Result<Self, CodecError> {
        if data.len() < NUMBER_SIZE {
            return Err(CodecError::HeaderTooShort {
                record,
                len: data.len(),
            });
        }

        let total = read_number(data, 0);
        if total != data.len() {
            return Err(CodecError::SizeMismatch {
                record,
                declared: total,
                actual: data.len(),
            });
        }

        if total == NUMBER_SIZE {
            if field_count != 0 {
                return Err(CodecError::FieldCount {
                    record,
                    expected: field_count,
                    found: 0,
                });
            }
            return Ok(Self {
                data,
                offsets: vec![total],
            });
        }

        if total < NUMBER_SIZE * 2 {
            return Err(CodecError::HeaderTooShort { record, len: total });
        }

        let first = read_number(data, NUMBER_SIZE);
        if first % NUMBER_SIZE != 0 || first < NUMBER_SIZE * 2 || first > total {
            return Err(CodecError::InvalidOffset {
                record,
                offset: first,
            });
        }

        let found = first / NUMBER_SIZE - 1;
        if found != field_count {
            return Err(CodecError::FieldCount {
                record,
                expected: field_count,
                found,
            });
        }

        let mut offsets: Vec<usize> = (0..found)
            .map(|i| read_number(data, NUMBER_SIZE * (i + 1)))
            .collect();
        offsets.push(total);

        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(CodecError::OffsetOrder { record });
        }

        Ok(Self { data, offsets })
    }

    /// Raw bytes of field `index`.
    ///
    /// `index` must be below the field count passed to [`Self::parse`].
    pub fn field(&self, index: usize) -> &'a [u8] {
        &self.data[self.offsets[index]..self.offsets[index + 1]]
    }
}

/// Serialize already-encoded fields as a table.
pub fn write_table(fields: &[Vec<u8>]) -> Vec<u8> {
    let header = NUMBER_SIZE * (fields.len() + 1);
    let total = header + fields.iter().map(Vec::len).sum::<usize>();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&number(total));

    let mut offset = header;
    for field in fields {
        out.extend_from_slice(&number(offset));
        offset += field.len();
    }
    for field in fields {
        out.extend_from_slice(field);
    }
    out
}

// =============================================================================
// FIXVEC / OPTION / UNION
// =============================================================================

/// Read a `Bytes` fixvec, returning the payload.
pub fn read_bytes<'a>(record: &'static str, data: &'a [u8]) -> Result<&'a [u8], CodecError> {
    if data.len() < NUMBER_SIZE {
        return Err(CodecError::HeaderTooShort {
            record,
            len: data.len(),
        });
    }
    let count = read_number(data, 0);
    if NUMBER_SIZE + count != data.len() {
        return Err(CodecError::SizeMismatch {
            record,
            declared: NUMBER_SIZE + count,
            actual: data.len(),
        });
    }
    Ok(&data[NUMBER_SIZE..])
}

/// Encode a `Bytes` fixvec.
pub fn write_bytes(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NUMBER_SIZE + payload.len());
    out.extend_from_slice(&number(payload.len()));
    out.extend_from_slice(payload);
    out
}

/// Read an optional field; an empty slice is `None`.
pub fn read_option(data: &[u8]) -> Option<&[u8]> {
    if data.is_empty() {
        None
    } else {
        Some(data)
    }
}

/// Split a union into `(item_id, item)`.
pub fn read_union<'a>(record: &'static str, data: &'a [u8]) -> Result<(u32, &'a [u8]), CodecError> {
    if data.len() < NUMBER_SIZE {
        return Err(CodecError::HeaderTooShort {
            record,
            len: data.len(),
        });
    }
    let id = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    Ok((id, &data[NUMBER_SIZE..]))
}

/// Encode a union item.
pub fn write_union(id: u32, item: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NUMBER_SIZE + item.len());
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(item);
    out
}

// =============================================================================
// FIXED-SIZE VALUES
// =============================================================================

/// Read a fixed-size array field.
pub fn read_array<const N: usize>(
    record: &'static str,
    data: &[u8],
) -> Result<[u8; N], CodecError> {
    data.try_into().map_err(|_| CodecError::FixedLength {
        record,
        expected: N,
        actual: data.len(),
    })
}

/// Read a `byte` field.
pub fn read_u8(record: &'static str, data: &[u8]) -> Result<u8, CodecError> {
    read_array::<1>(record, data).map(|b| b[0])
}

/// Read a `Uint32` field.
pub fn read_u32(record: &'static str, data: &[u8]) -> Result<u32, CodecError> {
    read_array::<4>(record, data).map(u32::from_le_bytes)
}

/// Read a `Uint64` field.
pub fn read_u64(record: &'static str, data: &[u8]) -> Result<u64, CodecError> {
    read_array::<8>(record, data).map(u64::from_le_bytes)
}

/// Read a `Uint128` field.
pub fn read_u128(record: &'static str, data: &[u8]) -> Result<u128, CodecError> {
    read_array::<16>(record, data).map(u128::from_le_bytes)
}

fn read_number(data: &[u8], at: usize) -> usize {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]) as usize
}

fn number(value: usize) -> [u8; NUMBER_SIZE] {
    // Records are bounded by the chain's transaction size, far below u32::MAX.
    (value as u32).to_le_bytes()
}
