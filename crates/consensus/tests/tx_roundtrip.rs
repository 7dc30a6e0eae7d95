//! Property tests over the transaction codec: deserializing a serialized
//! transaction reproduces it byte for byte.

use proptest::prelude::*;
use voltic_consensus::{
    SignableTransaction, TxEip1559, TxEip2930, TxEnvelope, TxLegacy,
};
use voltic_eips::eip2718::Encodable2718;
use voltic_eips::eip2930::{AccessList, AccessListItem};
use voltic_primitives::{Address, Bytes, Signature, TxKind, B256, U256};

/// A fixed, structurally valid signature; codec properties do not need a
/// matching key.
fn signature() -> Signature {
    Signature::from_scalars_and_parity(
        B256::new(hex_literal::hex!(
            "840cfc572845f5786e702984c2a582528cad4b49b2a10b9db1be7fca90058565"
        )),
        B256::new(hex_literal::hex!(
            "25e7109ceb98168d95b09b18bbf6b685130e0562f233877d492b94eee0c5b6d1"
        )),
        0,
    )
    .unwrap()
}

fn tx_kind() -> impl Strategy<Value = TxKind> {
    prop_oneof![
        Just(TxKind::Create),
        any::<[u8; 20]>().prop_map(|bytes| TxKind::Call(Address::new(bytes))),
    ]
}

fn access_list() -> impl Strategy<Value = AccessList> {
    proptest::collection::vec(
        (any::<[u8; 20]>(), proptest::collection::vec(any::<[u8; 32]>(), 0..3)),
        0..3,
    )
    .prop_map(|items| {
        AccessList(
            items
                .into_iter()
                .map(|(address, keys)| AccessListItem {
                    address: Address::new(address),
                    storage_keys: keys.into_iter().map(B256::new).collect(),
                })
                .collect(),
        )
    })
}

fn legacy_tx() -> impl Strategy<Value = TxLegacy> {
    (
        proptest::option::of(1u64..=1_000_000),
        any::<u64>(),
        any::<u128>(),
        any::<u64>(),
        tx_kind(),
        any::<[u8; 32]>(),
        proptest::collection::vec(any::<u8>(), 0..128),
    )
        .prop_map(|(chain_id, nonce, gas_price, gas_limit, to, value, input)| TxLegacy {
            chain_id,
            nonce,
            gas_price,
            gas_limit,
            to,
            value: U256::from_be_bytes(value),
            input: Bytes::from(input),
        })
}

fn eip1559_tx() -> impl Strategy<Value = TxEip1559> {
    (
        1u64..=1_000_000,
        any::<u64>(),
        any::<u128>(),
        any::<u128>(),
        any::<u64>(),
        tx_kind(),
        any::<[u8; 32]>(),
        access_list(),
        proptest::collection::vec(any::<u8>(), 0..128),
    )
        .prop_map(
            |(
                chain_id,
                nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit,
                to,
                value,
                access_list,
                input,
            )| TxEip1559 {
                chain_id,
                nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit,
                to,
                value: U256::from_be_bytes(value),
                access_list,
                input: Bytes::from(input),
            },
        )
}

fn eip2930_tx() -> impl Strategy<Value = TxEip2930> {
    (
        1u64..=1_000_000,
        any::<u64>(),
        any::<u128>(),
        any::<u64>(),
        tx_kind(),
        any::<[u8; 32]>(),
        access_list(),
        proptest::collection::vec(any::<u8>(), 0..128),
    )
        .prop_map(
            |(chain_id, nonce, gas_price, gas_limit, to, value, access_list, input)| TxEip2930 {
                chain_id,
                nonce,
                gas_price,
                gas_limit,
                to,
                value: U256::from_be_bytes(value),
                access_list,
                input: Bytes::from(input),
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn legacy_roundtrip(tx in legacy_tx()) {
        let envelope: TxEnvelope = tx.into_signed(signature()).into();
        let encoded = envelope.encoded_2718();
        let decoded = TxEnvelope::decode_2718_exact(&encoded).unwrap();
        prop_assert_eq!(&decoded, &envelope);
        prop_assert_eq!(decoded.encoded_2718(), encoded);
    }

    #[test]
    fn eip2930_roundtrip(tx in eip2930_tx()) {
        let envelope: TxEnvelope = tx.into_signed(signature()).into();
        let encoded = envelope.encoded_2718();
        prop_assert_eq!(encoded[0], 0x01);
        let decoded = TxEnvelope::decode_2718_exact(&encoded).unwrap();
        prop_assert_eq!(&decoded, &envelope);
        prop_assert_eq!(decoded.encoded_2718(), encoded);
    }

    #[test]
    fn eip1559_roundtrip(tx in eip1559_tx()) {
        let envelope: TxEnvelope = tx.into_signed(signature()).into();
        let encoded = envelope.encoded_2718();
        prop_assert_eq!(encoded[0], 0x02);
        let decoded = TxEnvelope::decode_2718_exact(&encoded).unwrap();
        prop_assert_eq!(&decoded, &envelope);
        prop_assert_eq!(decoded.encoded_2718(), encoded);
    }

    #[test]
    fn signing_hash_excludes_signature(tx in eip1559_tx()) {
        // the signing hash must not change with the signature
        let hash_before = tx.signature_hash();
        let signed = tx.into_signed(signature());
        prop_assert_eq!(signed.signature_hash(), hash_before);
        prop_assert_ne!(*signed.hash(), hash_before);
    }

    #[test]
    fn network_and_raw_agree_for_legacy(tx in legacy_tx()) {
        use voltic_eips::eip2718::Decodable2718;

        let envelope: TxEnvelope = tx.into_signed(signature()).into();
        let mut network = Vec::new();
        envelope.network_encode(&mut network);
        // legacy network encoding is the raw encoding
        prop_assert_eq!(&network, &envelope.encoded_2718());
        let decoded = TxEnvelope::network_decode(&mut &network[..]).unwrap();
        prop_assert_eq!(decoded, envelope);
    }
}
