//! Binary framing of the wire tensor record.
//!
//! Layout, all header integers little-endian:
//!
//! ```text
//! u32       data-type tag
//! u8        byte order (0 = little, 1 = big)
//! u64       dimension count
//! u64 × n   sizes
//! u64       payload length
//! [bytes]   payload, row-major contiguous, no padding
//! ```
//!
//! Strides and storage offsets are never persisted; the payload is always the
//! canonical row-major flattening.

use tensorwire_buffer::SharedBuf;
use thiserror::Error;

use crate::dtype::{DataType, Endianness};

/// Fixed header bytes before the sizes array.
const PREFIX_LEN: usize = 4 + 1 + 8;

/// A serialized tensor: type tag, resolved byte order, shape, and the
/// canonical row-major payload.
///
/// Built fresh by [`serialize`](crate::serialize) and consumed by
/// [`deserialize`](crate::deserialize); [`encode`](Self::encode) and
/// [`decode`](Self::decode) move it through its binary framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTensor {
    pub data_type: DataType,
    /// Always `Little` or `Big`; `Native` never reaches a record.
    pub endianness: Endianness,
    pub sizes: Vec<u64>,
    pub payload: SharedBuf,
}

/// Malformed bytes handed to [`WireTensor::decode`].
///
/// Unlike the engine's contract panics, decode errors describe untrusted
/// input: bytes from disk or a peer may be corrupt without the calling
/// program being defective.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("record truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: u64, actual: u64 },

    #[error("unknown data-type tag {tag}")]
    UnknownDataType { tag: u32 },

    #[error("unknown byte-order value {value}")]
    UnknownByteOrder { value: u8 },

    #[error("declared payload length {declared} does not match shape ({expected} bytes)")]
    PayloadMismatch { declared: u64, expected: u64 },

    #[error("shape element count overflows u64")]
    SizeOverflow,
}

impl WireTensor {
    /// Logical element count: the product of `sizes`, or 0 for the
    /// zero-dimensional record.
    pub fn num_elements(&self) -> u64 {
        if self.sizes.is_empty() {
            return 0;
        }
        self.sizes.iter().product()
    }

    /// Exact size of the encoded record in bytes.
    pub fn encoded_len(&self) -> usize {
        PREFIX_LEN + self.sizes.len() * 8 + 8 + self.payload.len()
    }

    /// Encode the record into a fresh byte vector.
    ///
    /// # Panics
    /// Panics if `endianness` is still `Native`; records store resolved
    /// orders only.
    pub fn encode(&self) -> Vec<u8> {
        debug_assert_eq!(
            self.payload.len() as u64,
            self.num_elements() * self.data_type.element_size() as u64,
            "payload length diverges from shape"
        );
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.data_type.as_u32().to_le_bytes());
        out.push(self.endianness.as_u8());
        out.extend_from_slice(&(self.sizes.len() as u64).to_le_bytes());
        for &size in &self.sizes {
            out.extend_from_slice(&size.to_le_bytes());
        }
        out.extend_from_slice(&(self.payload.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Decode a record from `buf`, sharing the payload bytes zero-copy.
    pub fn decode(buf: &SharedBuf) -> Result<WireTensor, WireError> {
        let bytes = buf.as_slice();
        let actual = bytes.len() as u64;
        if bytes.len() < PREFIX_LEN {
            return Err(WireError::Truncated { needed: PREFIX_LEN as u64, actual });
        }

        let tag = u32::from_le_bytes(bytes[0..4].try_into().expect("fixed-width read"));
        let data_type = DataType::from_u32(tag).ok_or(WireError::UnknownDataType { tag })?;
        let order = bytes[4];
        let endianness =
            Endianness::from_u8(order).ok_or(WireError::UnknownByteOrder { value: order })?;
        let ndims = u64::from_le_bytes(bytes[5..13].try_into().expect("fixed-width read"));

        // Sizes array: bound ndims by the bytes actually present before
        // touching it, so a hostile count cannot drive a huge allocation.
        let after_prefix = (bytes.len() - PREFIX_LEN) as u64;
        if ndims > after_prefix / 8 {
            let needed = (PREFIX_LEN as u64).saturating_add(ndims.saturating_mul(8));
            return Err(WireError::Truncated { needed, actual });
        }
        let ndims = ndims as usize;
        let mut sizes = Vec::with_capacity(ndims);
        let mut cursor = PREFIX_LEN;
        for _ in 0..ndims {
            sizes.push(u64::from_le_bytes(
                bytes[cursor..cursor + 8].try_into().expect("fixed-width read"),
            ));
            cursor += 8;
        }

        if bytes.len() < cursor + 8 {
            return Err(WireError::Truncated { needed: (cursor + 8) as u64, actual });
        }
        let declared =
            u64::from_le_bytes(bytes[cursor..cursor + 8].try_into().expect("fixed-width read"));
        cursor += 8;

        let expected = expected_payload_len(&sizes, data_type)?;
        if declared != expected {
            return Err(WireError::PayloadMismatch { declared, expected });
        }
        let end = (cursor as u64).checked_add(declared).ok_or(WireError::SizeOverflow)?;
        if end > actual {
            return Err(WireError::Truncated { needed: end, actual });
        }

        let payload = buf.share_slice(cursor, declared as usize);
        Ok(WireTensor { data_type, endianness, sizes, payload })
    }
}

/// Payload length implied by a shape: product of sizes × element size, with
/// the zero-dimensional record pinned to zero bytes.
fn expected_payload_len(sizes: &[u64], dtype: DataType) -> Result<u64, WireError> {
    if sizes.is_empty() {
        return Ok(0);
    }
    let mut elements: u64 = 1;
    for &size in sizes {
        elements = elements.checked_mul(size).ok_or(WireError::SizeOverflow)?;
    }
    elements
        .checked_mul(dtype.element_size() as u64)
        .ok_or(WireError::SizeOverflow)
}

// ── Tests ───────────────────────────────────────────────────────────
