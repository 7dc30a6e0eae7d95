//! Recursive-length-prefix (RLP) encoding and decoding.
//!
//! RLP is the serialization format used by every Ethereum consensus
//! structure. A value is either a byte string or an ordered list of values;
//! the encoding prefixes each payload with its length.
//!
//! Two decoding surfaces are provided:
//!
//! - The [`Decodable`] trait decodes directly into typed values and is
//!   canonical-strict: redundant leading zeros in lengths or integers and
//!   wrapped single low bytes are rejected.
//! - [`Item`] decodes into an untyped string/list tree, is lenient by
//!   default, and reports the number of bytes consumed so callers can
//!   reject trailing data. [`Item::decode_strict`] and [`is_canonical`]
//!   recover the strict behavior.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod decode;
mod encode;
mod error;
mod header;
mod item;

pub use bytes::BufMut;
pub use decode::{decode_exact, Decodable};
pub use encode::{encode, encode_list, length_of_length, list_length, Encodable};
pub use error::{Error, Result};
pub use header::Header;
pub use item::{is_canonical, Item};

/// The RLP prefix of an empty byte string (`0x80`).
pub const EMPTY_STRING_CODE: u8 = 0x80;

/// The RLP prefix of an empty list (`0xc0`).
pub const EMPTY_LIST_CODE: u8 = 0xc0;

/// Longest length that fits in a short (single-byte) header.
pub(crate) const MAX_SHORT_PAYLOAD: usize = 55;
