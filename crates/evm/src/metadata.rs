//! Detection of the CBOR metadata trailer the Solidity compiler appends
//! to deployed bytecode.
//!
//! The trailer is advisory: its absence, or a malformed trailer, is
//! never an analysis failure. Only the subset of CBOR the compiler
//! actually emits is read here: a definite-length map of text keys to
//! byte-string or text values.

use voltic_primitives::Bytes;

/// A decoded Solidity metadata trailer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolidityMetadata {
    /// The IPFS multihash of the metadata JSON (`ipfs` key).
    pub ipfs: Option<Bytes>,
    /// The Swarm hash of the metadata JSON (`bzzr0`/`bzzr1` keys).
    pub bzzr: Option<Bytes>,
    /// The compiler version (`solc` key), as `(major, minor, patch)`.
    pub solc: Option<(u8, u8, u8)>,
    /// The raw CBOR region, excluding the two length bytes.
    pub raw: Bytes,
    /// The total trailer length in bytes, including the two length
    /// bytes.
    pub trailer_len: usize,
}

/// Reads the metadata trailer from the end of `code`, if one is present.
///
/// The last two bytes are a big-endian length `L`; the `L` bytes before
/// them must parse as a CBOR map carrying an `ipfs` or `bzzr0`/`bzzr1`
/// key. Returns `None` when the shape does not hold.
pub fn detect_solidity_metadata(code: &[u8]) -> Option<SolidityMetadata> {
    if code.len() < 2 {
        return None;
    }
    let cbor_len = u16::from_be_bytes([code[code.len() - 2], code[code.len() - 1]]) as usize;
    if cbor_len == 0 || cbor_len + 2 > code.len() {
        return None;
    }
    let region = &code[code.len() - 2 - cbor_len..code.len() - 2];

    let mut metadata = SolidityMetadata {
        raw: Bytes::copy_from_slice(region),
        trailer_len: cbor_len + 2,
        ..Default::default()
    };

    let mut reader = CborReader { bytes: region, pos: 0 };
    let entries = reader.read_map_header()?;
    for _ in 0..entries {
        let key = reader.read_text()?;
        match key {
            "ipfs" => metadata.ipfs = Some(Bytes::copy_from_slice(reader.read_bytes()?)),
            "bzzr0" | "bzzr1" => {
                metadata.bzzr = Some(Bytes::copy_from_slice(reader.read_bytes()?));
            }
            "solc" => {
                let version = reader.read_bytes()?;
                if let [major, minor, patch] = version {
                    metadata.solc = Some((*major, *minor, *patch));
                }
            }
            _ => {
                reader.skip_value()?;
            }
        }
    }
    if reader.pos != region.len() {
        return None;
    }

    // the trailer must identify the metadata payload to count
    if metadata.ipfs.is_none() && metadata.bzzr.is_none() {
        return None;
    }
    Some(metadata)
}

struct CborReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CborReader<'a> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads an item head, returning `(major_type, argument)`.
    fn read_head(&mut self) -> Option<(u8, u64)> {
        let initial = self.next_byte()?;
        let major = initial >> 5;
        let argument = match initial & 0x1f {
            small @ 0..=23 => small as u64,
            24 => self.next_byte()? as u64,
            25 => {
                let high = self.next_byte()? as u64;
                let low = self.next_byte()? as u64;
                (high << 8) | low
            }
            // longer arguments never appear in a 64 KiB trailer
            _ => return None,
        };
        Some((major, argument))
    }

    fn read_map_header(&mut self) -> Option<u64> {
        match self.read_head()? {
            (5, entries) => Some(entries),
            _ => None,
        }
    }

    fn take(&mut self, len: u64) -> Option<&'a [u8]> {
        let len = usize::try_from(len).ok()?;
        let slice = self.bytes.get(self.pos..self.pos + len)?;
        self.pos += len;
        Some(slice)
    }

    fn read_text(&mut self) -> Option<&'a str> {
        match self.read_head()? {
            (3, len) => core::str::from_utf8(self.take(len)?).ok(),
            _ => None,
        }
    }

    fn read_bytes(&mut self) -> Option<&'a [u8]> {
        match self.read_head()? {
            (2, len) | (3, len) => self.take(len),
            _ => None,
        }
    }

    fn skip_value(&mut self) -> Option<()> {
        match self.read_head()? {
            // unsigned / negative integers carry no payload
            (0 | 1, _) => Some(()),
            (2 | 3, len) => self.take(len).map(|_| ()),
            // nested containers do not occur in compiler trailers
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// A real solc 0.8.x trailer: `{ipfs: <34 bytes>, solc: 0x080d01}`.
    fn solc_trailer() -> Vec<u8> {
        let mut trailer = Vec::new();
        // map(2)
        trailer.push(0xa2);
        // text(4) "ipfs"
        trailer.extend_from_slice(&hex!("6469706673"));
        // bytes(34)
        trailer.push(0x58);
        trailer.push(34);
        trailer.extend_from_slice(&[0x12u8; 34]);
        // text(4) "solc"
        trailer.extend_from_slice(&hex!("64736f6c63"));
        // bytes(3) 0.13.1
        trailer.push(0x43);
        trailer.extend_from_slice(&[0x00, 0x0d, 0x01]);

        let len = trailer.len() as u16;
        trailer.extend_from_slice(&len.to_be_bytes());
        trailer
    }

    #[test]
    fn detects_ipfs_trailer() {
        let mut code = hex!("6060604052600080fd").to_vec();
        code.extend_from_slice(&solc_trailer());

        let metadata = detect_solidity_metadata(&code).unwrap();
        assert_eq!(metadata.ipfs.as_deref(), Some(&[0x12u8; 34][..]));
        assert_eq!(metadata.solc, Some((0, 13, 1)));
        assert_eq!(metadata.trailer_len, solc_trailer().len());
    }

    #[test]
    fn detects_bzzr_trailer() {
        // map(1) { "bzzr0": bytes(32) }
        let mut trailer = vec![0xa1];
        trailer.extend_from_slice(b"\x65bzzr0");
        trailer.push(0x58);
        trailer.push(32);
        trailer.extend_from_slice(&[0xabu8; 32]);
        let len = trailer.len() as u16;
        trailer.extend_from_slice(&len.to_be_bytes());

        let mut code = hex!("600080fd").to_vec();
        code.extend_from_slice(&trailer);

        let metadata = detect_solidity_metadata(&code).unwrap();
        assert_eq!(metadata.bzzr.as_deref(), Some(&[0xabu8; 32][..]));
        assert_eq!(metadata.ipfs, None);
    }

    #[test]
    fn garbage_is_not_metadata() {
        assert_eq!(detect_solidity_metadata(&hex!("00")), None);
        assert_eq!(detect_solidity_metadata(&hex!("6060604052")), None);
        // declared length exceeds the code
        assert_eq!(detect_solidity_metadata(&hex!("00ffff")), None);
        // valid length, invalid CBOR
        assert_eq!(detect_solidity_metadata(&hex!("ffffffff0002")), None);
    }

    #[test]
    fn map_without_payload_keys_is_ignored() {
        // map(1) { "solc": bytes(3) } but neither ipfs nor bzzr
        let mut trailer = vec![0xa1];
        trailer.extend_from_slice(b"\x64solc");
        trailer.push(0x43);
        trailer.extend_from_slice(&[0x00, 0x08, 0x11]);
        let len = trailer.len() as u16;
        trailer.extend_from_slice(&len.to_be_bytes());

        let mut code = vec![0x00];
        code.extend_from_slice(&trailer);
        assert_eq!(detect_solidity_metadata(&code), None);
    }
}
