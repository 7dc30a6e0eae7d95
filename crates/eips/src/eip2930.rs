//! [EIP-2930] access lists.
//!
//! [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930

use voltic_primitives::{Address, StorageKey, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// Gas charged per access-list address.
pub const ACCESS_LIST_ADDRESS_COST: u64 = 2400;

/// Gas charged per access-list storage key.
pub const ACCESS_LIST_STORAGE_KEY_COST: u64 = 1900;

/// One access-list entry: an account address and the storage keys the
/// transaction plans to touch under it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessListItem {
    /// Account address warmed at the start of execution.
    pub address: Address,
    /// Storage keys warmed under the address.
    pub storage_keys: Vec<StorageKey>,
}

impl AccessListItem {
    /// Removes duplicate storage keys, keeping the first occurrence of
    /// each. Warm/cold pricing depends on first occurrence, so order is
    /// preserved.
    pub fn dedup_storage_keys(&mut self) {
        let mut seen = std::collections::HashSet::with_capacity(self.storage_keys.len());
        self.storage_keys.retain(|key| seen.insert(*key));
    }

    fn rlp_payload_length(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }
}

impl Encodable for AccessListItem {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for AccessListItem {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let started = buf.len();
        let item = Self {
            address: Decodable::decode(buf)?,
            storage_keys: Decodable::decode(buf)?,
        };
        if started - buf.len() != header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: started - buf.len(),
            });
        }
        Ok(item)
    }
}

/// A list of addresses and storage keys a transaction plans to access.
///
/// Accesses outside the list are possible but cost more gas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator over the entries.
    pub fn iter(&self) -> core::slice::Iter<'_, AccessListItem> {
        self.0.iter()
    }

    /// The total number of storage keys across all entries.
    pub fn storage_key_count(&self) -> usize {
        self.0.iter().map(|item| item.storage_keys.len()).sum()
    }

    /// The intrinsic gas the list adds to its transaction:
    /// 2400 per address plus 1900 per storage key.
    pub fn gas_cost(&self) -> u64 {
        self.0.len() as u64 * ACCESS_LIST_ADDRESS_COST
            + self.storage_key_count() as u64 * ACCESS_LIST_STORAGE_KEY_COST
    }

    /// Deduplicates each entry's storage keys, preserving entry order and
    /// first-occurrence key order.
    pub fn dedup_storage_keys(&mut self) {
        for item in &mut self.0 {
            item.dedup_storage_keys();
        }
    }

    /// An iterator over `(address, storage keys as U256)` pairs.
    pub fn flatten(&self) -> impl Iterator<Item = (Address, Vec<U256>)> + '_ {
        self.0.iter().map(|item| {
            (
                item.address,
                item.storage_keys.iter().map(|key| U256::from_be_bytes(key.0)).collect(),
            )
        })
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(items: Vec<AccessListItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<AccessListItem> for AccessList {
    fn from_iter<T: IntoIterator<Item = AccessListItem>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AccessList {
    type Item = AccessListItem;
    type IntoIter = std::vec::IntoIter<AccessListItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Encodable for AccessList {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for AccessList {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        Decodable::decode(buf).map(Self)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for AccessList {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let n = u.int_in_range(0usize..=4)?;
        let items = (0..n)
            .map(|_| {
                let address = Address::arbitrary(u)?;
                let keys = u.arbitrary_iter()?.take(4).collect::<Result<Vec<_>, _>>()?;
                Ok(AccessListItem { address, storage_keys: keys })
            })
            .collect::<arbitrary::Result<_>>()?;
        Ok(Self(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltic_primitives::{address, b256};

    fn sample() -> AccessList {
        AccessList(vec![AccessListItem {
            address: address!("de0b295669a9fd93d5f28d9ec85e40f4cb697bae"),
            storage_keys: vec![
                b256!("0000000000000000000000000000000000000000000000000000000000000003"),
                b256!("0000000000000000000000000000000000000000000000000000000000000007"),
            ],
        }])
    }

    #[test]
    fn rlp_roundtrip() {
        let list = sample();
        let encoded = voltic_rlp::encode(&list);
        assert_eq!(voltic_rlp::decode_exact::<AccessList>(&encoded).unwrap(), list);
    }

    #[test]
    fn gas_cost() {
        let list = sample();
        assert_eq!(list.gas_cost(), 2400 + 2 * 1900);
        assert_eq!(AccessList::default().gas_cost(), 0);
    }

    #[test]
    fn dedup_preserves_first_occurrence() {
        let key_a = b256!("0000000000000000000000000000000000000000000000000000000000000001");
        let key_b = b256!("0000000000000000000000000000000000000000000000000000000000000002");
        let mut list = AccessList(vec![AccessListItem {
            address: Address::ZERO,
            storage_keys: vec![key_b, key_a, key_b, key_a],
        }]);
        list.dedup_storage_keys();
        assert_eq!(list.0[0].storage_keys, [key_b, key_a]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json[0]["storageKeys"].is_array());
    }
}
