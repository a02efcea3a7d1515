//! RLP primitives: header writers for the encode side, a strict cursor for
//! the decode side, and [`RlpItem`] for structure carried without being
//! interpreted.

use num_bigint::BigUint;
use num_traits::Zero;

use super::{CodecError, Decode, Encode};
use crate::config::{RLP_LIST_OFFSET, RLP_MAX_DEPTH, RLP_SHORT_PAYLOAD_MAX, RLP_STRING_OFFSET};

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Writes a string or list header for a payload of `len` bytes.
fn write_header(out: &mut Vec<u8>, offset: u8, len: usize) {
    if len <= RLP_SHORT_PAYLOAD_MAX {
        out.push(offset + len as u8);
        return;
    }
    let be = (len as u64).to_be_bytes();
    let len_bytes = strip_leading_zeros(&be);
    out.push(offset + RLP_SHORT_PAYLOAD_MAX as u8 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    &bytes[skip..]
}

/// Writes a byte string.
pub fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    if bytes.len() == 1 && bytes[0] < RLP_STRING_OFFSET {
        out.push(bytes[0]);
        return;
    }
    write_header(out, RLP_STRING_OFFSET, bytes.len());
    out.extend_from_slice(bytes);
}

/// Writes an unsigned integer as its minimal big-endian string.
pub fn write_uint(out: &mut Vec<u8>, value: u64) {
    write_bytes(out, strip_leading_zeros(&value.to_be_bytes()));
}

/// Writes an arbitrary-precision unsigned integer.
pub fn write_biguint(out: &mut Vec<u8>, value: &BigUint) {
    if value.is_zero() {
        // `to_bytes_be` yields `[0]` for zero; canonical zero is empty.
        write_bytes(out, &[]);
    } else {
        write_bytes(out, &value.to_bytes_be());
    }
}

/// Writes an optional fixed-width value; absence is the empty string.
pub fn write_optional(out: &mut Vec<u8>, value: Option<&[u8]>) {
    write_bytes(out, value.unwrap_or_default());
}

/// Writes a list whose payload is produced by `fill`.
pub fn write_list(out: &mut Vec<u8>, fill: impl FnOnce(&mut Vec<u8>)) {
    let mut payload = Vec::new();
    fill(&mut payload);
    write_header(out, RLP_LIST_OFFSET, payload.len());
    out.extend_from_slice(&payload);
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

enum Item<'a> {
    Bytes(&'a [u8]),
    List(&'a [u8]),
}

fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if input.len() < n {
        return Err(CodecError::Truncated);
    }
    let (head, tail) = input.split_at(n);
    *input = tail;
    Ok(head)
}

fn read_long_length(input: &mut &[u8], len_of_len: u8) -> Result<usize, CodecError> {
    let bytes = take(input, usize::from(len_of_len))?;
    if bytes[0] == 0 {
        return Err(CodecError::malformed("length prefix has leading zero bytes"));
    }
    let len = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    if len <= RLP_SHORT_PAYLOAD_MAX as u64 {
        return Err(CodecError::malformed("long length form used for short payload"));
    }
    usize::try_from(len).map_err(|_| CodecError::malformed("length exceeds address space"))
}

fn read_item<'a>(input: &mut &'a [u8]) -> Result<Item<'a>, CodecError> {
    let start = *input;
    let first = take(input, 1)?[0];

    let (is_list, len) = match first {
        0x00..=0x7f => return Ok(Item::Bytes(&start[..1])),
        0x80..=0xb7 => (false, usize::from(first - RLP_STRING_OFFSET)),
        0xb8..=0xbf => (false, read_long_length(input, first - 0xb7)?),
        0xc0..=0xf7 => (true, usize::from(first - RLP_LIST_OFFSET)),
        0xf8..=0xff => (true, read_long_length(input, first - 0xf7)?),
    };

    let payload = take(input, len)?;
    if is_list {
        return Ok(Item::List(payload));
    }
    if len == 1 && payload[0] < RLP_STRING_OFFSET {
        return Err(CodecError::malformed(
            "single byte below 0x80 must encode as itself",
        ));
    }
    Ok(Item::Bytes(payload))
}

fn check_canonical_int(bytes: &[u8]) -> Result<(), CodecError> {
    if bytes.first() == Some(&0) {
        return Err(CodecError::malformed("integer has leading zero bytes"));
    }
    Ok(())
}

/// Strict cursor over canonical bytes.
///
/// A top-level decoder reports running out of input as
/// [`CodecError::Truncated`]. A decoder over a list payload reports the same
/// condition as [`CodecError::MalformedFraming`]: the list header promised
/// a size its elements do not fit.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    input: &'a [u8],
    nested: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            nested: false,
        }
    }

    fn nested(input: &'a [u8]) -> Self {
        Self {
            input,
            nested: true,
        }
    }

    /// `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Fails with [`CodecError::TrailingBytes`] unless all input was consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes)
        }
    }

    fn item(&mut self) -> Result<Item<'a>, CodecError> {
        if self.nested && self.input.is_empty() {
            return Err(CodecError::malformed("list has too few elements"));
        }
        let nested = self.nested;
        read_item(&mut self.input).map_err(|err| match err {
            CodecError::Truncated if nested => {
                CodecError::malformed("element is larger than its enclosing list")
            }
            other => other,
        })
    }

    /// Reads a byte string.
    pub fn bytes(&mut self) -> Result<&'a [u8], CodecError> {
        match self.item()? {
            Item::Bytes(bytes) => Ok(bytes),
            Item::List(_) => Err(CodecError::malformed("expected string, found list")),
        }
    }

    /// Enters a list, returning a decoder over its payload.
    pub fn list(&mut self) -> Result<Decoder<'a>, CodecError> {
        match self.item()? {
            Item::List(payload) => Ok(Decoder::nested(payload)),
            Item::Bytes(_) => Err(CodecError::malformed("expected list, found string")),
        }
    }

    /// Reads an unsigned integer of at most `width` bytes.
    pub fn uint(&mut self, width: usize) -> Result<u64, CodecError> {
        let bytes = self.bytes()?;
        check_canonical_int(bytes)?;
        if bytes.len() > width {
            return Err(CodecError::malformed(format!(
                "integer wider than {width} bytes"
            )));
        }
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn u8(&mut self) -> Result<u8, CodecError> {
        self.uint(1).map(|v| v as u8)
    }

    pub fn u32(&mut self) -> Result<u32, CodecError> {
        self.uint(4).map(|v| v as u32)
    }

    pub fn u64(&mut self) -> Result<u64, CodecError> {
        self.uint(8)
    }

    /// Reads an arbitrary-precision unsigned integer.
    pub fn biguint(&mut self) -> Result<BigUint, CodecError> {
        let bytes = self.bytes()?;
        check_canonical_int(bytes)?;
        Ok(BigUint::from_bytes_be(bytes))
    }

    /// Reads an optional `N`-byte value. The empty string means absent; any
    /// other length than `N` is malformed.
    pub fn optional_fixed<const N: usize>(&mut self) -> Result<Option<[u8; N]>, CodecError> {
        let bytes = self.bytes()?;
        if bytes.is_empty() {
            return Ok(None);
        }
        let fixed: [u8; N] = bytes.try_into().map_err(|_| {
            CodecError::malformed(format!("expected {N} bytes, got {}", bytes.len()))
        })?;
        Ok(Some(fixed))
    }

    /// Reads any item as an uninterpreted tree.
    pub fn item_tree(&mut self) -> Result<RlpItem, CodecError> {
        self.item_tree_at(0)
    }

    fn item_tree_at(&mut self, depth: usize) -> Result<RlpItem, CodecError> {
        match self.item()? {
            Item::Bytes(bytes) => Ok(RlpItem::Bytes(bytes.to_vec())),
            Item::List(payload) => {
                if depth >= RLP_MAX_DEPTH {
                    return Err(CodecError::malformed("list nesting too deep"));
                }
                let mut inner = Decoder::nested(payload);
                let mut items = Vec::new();
                while !inner.is_empty() {
                    items.push(inner.item_tree_at(depth + 1)?);
                }
                Ok(RlpItem::List(items))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RlpItem
// ---------------------------------------------------------------------------

/// An encoded item kept as structure, without a schema.
///
/// Transactions carry a list of these as reserved fields: extension data
/// this version of the protocol does not interpret but must preserve
/// byte-for-byte through decode and re-encode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RlpItem {
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl Encode for RlpItem {
    fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(bytes) => write_bytes(out, bytes),
            Self::List(items) => write_list(out, |payload| {
                for item in items {
                    item.encode_to(payload);
                }
            }),
        }
    }
}

impl Decode for RlpItem {
    fn decode_from(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        decoder.item_tree()
    }
}
