use crate::{Error, Result, EMPTY_LIST_CODE, EMPTY_STRING_CODE, MAX_SHORT_PAYLOAD};
use bytes::BufMut;

/// The header of an RLP item: whether it is a list, and its payload length.
///
/// For a single byte below [`EMPTY_STRING_CODE`] the byte is its own
/// encoding; decoding such input yields a string header with
/// `payload_length == 1` and does not advance the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// True if the item is a list.
    pub list: bool,
    /// Length of the payload in bytes, excluding the header itself.
    pub payload_length: usize,
}

impl Header {
    /// Decodes an RLP header from the start of `buf`, advancing it past the
    /// header bytes.
    ///
    /// Canonical-strict: length prefixes with leading zeros, long forms
    /// where the short form fits, and wrapped single low bytes are
    /// rejected. The declared payload is checked against the remaining
    /// input.
    pub fn decode(buf: &mut &[u8]) -> Result<Self> {
        let (header, consumed) = Self::decode_raw(buf, true)?;
        *buf = &buf[consumed..];
        if header.payload_length > buf.len() {
            return Err(Error::InputTooShort);
        }
        Ok(header)
    }

    /// Decodes a header without advancing the buffer or bounds-checking the
    /// payload. Returns the header and the number of header bytes.
    ///
    /// With `strict` false, non-canonical length encodings are accepted;
    /// truncated headers still fail with [`Error::InputTooShort`].
    pub fn decode_raw(buf: &[u8], strict: bool) -> Result<(Self, usize)> {
        let &first = buf.first().ok_or(Error::InputTooShort)?;
        match first {
            0..=0x7f => Ok((Self { list: false, payload_length: 1 }, 0)),
            EMPTY_STRING_CODE..=0xb7 => {
                let payload_length = (first - EMPTY_STRING_CODE) as usize;
                if strict && payload_length == 1 {
                    match buf.get(1) {
                        Some(&byte) if byte < EMPTY_STRING_CODE => {
                            return Err(Error::NonCanonicalSingleByte)
                        }
                        None => return Err(Error::InputTooShort),
                        _ => {}
                    }
                }
                Ok((Self { list: false, payload_length }, 1))
            }
            0xb8..=0xbf => {
                let (payload_length, consumed) =
                    decode_long_length(buf, (first - 0xb7) as usize, strict)?;
                Ok((Self { list: false, payload_length }, consumed))
            }
            EMPTY_LIST_CODE..=0xf7 => {
                Ok((Self { list: true, payload_length: (first - EMPTY_LIST_CODE) as usize }, 1))
            }
            0xf8..=0xff => {
                let (payload_length, consumed) =
                    decode_long_length(buf, (first - 0xf7) as usize, strict)?;
                Ok((Self { list: true, payload_length }, consumed))
            }
        }
    }

    /// Encodes the header into `out`.
    pub fn encode(&self, out: &mut dyn BufMut) {
        let code = if self.list { EMPTY_LIST_CODE } else { EMPTY_STRING_CODE };
        if self.payload_length <= MAX_SHORT_PAYLOAD {
            out.put_u8(code + self.payload_length as u8);
        } else {
            let bytes = self.payload_length.to_be_bytes();
            let zeros = bytes.iter().take_while(|b| **b == 0).count();
            let len_be = &bytes[zeros..];
            out.put_u8(code + MAX_SHORT_PAYLOAD as u8 + len_be.len() as u8);
            out.put_slice(len_be);
        }
    }

    /// The number of bytes this header occupies when encoded.
    pub const fn length(&self) -> usize {
        crate::length_of_length(self.payload_length)
    }
}

/// Decodes the big-endian length following a long-form prefix.
fn decode_long_length(buf: &[u8], len_of_len: usize, strict: bool) -> Result<(usize, usize)> {
    let bytes = buf.get(1..1 + len_of_len).ok_or(Error::InputTooShort)?;
    if strict && bytes[0] == 0 {
        return Err(Error::LeadingZero);
    }
    if len_of_len > core::mem::size_of::<usize>() {
        return Err(Error::Overflow);
    }
    let mut payload_length = 0usize;
    for &byte in bytes {
        payload_length = (payload_length << 8) | byte as usize;
    }
    if strict && payload_length <= MAX_SHORT_PAYLOAD {
        return Err(Error::NonCanonicalSize);
    }
    Ok((payload_length, 1 + len_of_len))
}
