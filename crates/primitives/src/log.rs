use crate::{Address, Bytes, B256};
use voltic_rlp::{Decodable, Encodable, Header};

/// An event's topic list and data payload.
///
/// A log carries at most four topics; `topics[0]` is the event signature
/// hash for non-anonymous events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogData {
    topics: Vec<B256>,
    /// The ABI-encoded, non-indexed event parameters.
    pub data: Bytes,
}

impl LogData {
    /// Creates log data, failing if more than four topics are supplied.
    pub fn new(topics: Vec<B256>, data: Bytes) -> Option<Self> {
        if topics.len() > 4 {
            return None;
        }
        Some(Self { topics, data })
    }

    /// Creates log data without checking the topic count.
    pub const fn new_unchecked(topics: Vec<B256>, data: Bytes) -> Self {
        Self { topics, data }
    }

    /// The topic list.
    pub fn topics(&self) -> &[B256] {
        &self.topics
    }

    /// True if the topic count is within the protocol bound.
    pub fn is_valid(&self) -> bool {
        self.topics.len() <= 4
    }
}

/// An event emitted during transaction execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Log<T = LogData> {
    /// The address that emitted the event.
    pub address: Address,
    /// The event payload.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: T,
}

impl Log {
    /// Creates a log, failing if more than four topics are supplied.
    pub fn new(address: Address, topics: Vec<B256>, data: Bytes) -> Option<Self> {
        LogData::new(topics, data).map(|data| Self { address, data })
    }

    /// Creates a log without checking the topic count.
    pub const fn new_unchecked(address: Address, topics: Vec<B256>, data: Bytes) -> Self {
        Self { address, data: LogData::new_unchecked(topics, data) }
    }

    /// The topic list.
    pub fn topics(&self) -> &[B256] {
        self.data.topics()
    }
}

impl Encodable for Log {
    fn encode(&self, out: &mut dyn voltic_rlp::BufMut) {
        let payload_length = self.rlp_payload_length();
        Header { list: true, payload_length }.encode(out);
        self.address.encode(out);
        self.data.topics.encode(out);
        Encodable::encode(&self.data.data, out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Log {
    fn rlp_payload_length(&self) -> usize {
        self.address.length() + self.data.topics.length() + Encodable::length(&self.data.data)
    }
}

impl Decodable for Log {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let started = buf.len();
        let address = Address::decode(buf)?;
        let topics = Vec::<B256>::decode(buf)?;
        let data = Bytes::decode(buf)?;
        if started - buf.len() != header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: started - buf.len(),
            });
        }
        Ok(Self { address, data: LogData { topics, data } })
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for Log {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let address = Address::arbitrary(u)?;
        let n_topics = u.int_in_range(0usize..=4)?;
        let topics = (0..n_topics).map(|_| B256::arbitrary(u)).collect::<Result<_, _>>()?;
        let data = Bytes::arbitrary(u)?;
        Ok(Self { address, data: LogData { topics, data } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{address, b256};

    #[test]
    fn rejects_five_topics() {
        assert!(LogData::new(vec![B256::ZERO; 5], Bytes::new()).is_none());
        assert!(LogData::new(vec![B256::ZERO; 4], Bytes::new()).is_some());
    }

    #[test]
    fn rlp_roundtrip() {
        let log = Log::new_unchecked(
            address!("388c818ca8b9251b393131c08a736a67ccb19297"),
            vec![b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")],
            Bytes::from(vec![0xaa, 0xbb]),
        );
        let encoded = voltic_rlp::encode(&log);
        assert_eq!(voltic_rlp::decode_exact::<Log>(&encoded).unwrap(), log);
    }
}
