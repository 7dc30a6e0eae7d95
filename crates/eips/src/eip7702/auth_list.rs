use super::constants::MAGIC;
use voltic_crypto::{sign_message, RecoveryError, SigningError};
use voltic_primitives::{keccak256, Address, Signature, B256, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// An unsigned [EIP-7702] authorization: permission for an EOA to execute
/// the code deployed at `address`.
///
/// An authorization with `chain_id` zero is valid on any chain.
///
/// [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Authorization {
    /// The chain the authorization is valid on, or zero for any chain.
    pub chain_id: U256,
    /// The address whose code the authority delegates to.
    pub address: Address,
    /// The authority's account nonce at signing time.
    pub nonce: u64,
}

/// Errors raised while signing or verifying authorizations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    /// The embedded signature fields are not a valid signature.
    #[error("invalid authorization signature")]
    InvalidSignature,
    /// Recovering the authority failed.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
    /// Producing the signature failed.
    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl Authorization {
    /// The digest the authority signs:
    /// `keccak256(0x05 ‖ rlp([chain_id, address, nonce]))`.
    pub fn signature_hash(&self) -> B256 {
        let mut buf = Vec::new();
        buf.put_u8(MAGIC);
        let payload_length =
            self.chain_id.length() + self.address.length() + self.nonce.length();
        Header { list: true, payload_length }.encode(&mut buf);
        self.chain_id.encode(&mut buf);
        self.address.encode(&mut buf);
        self.nonce.encode(&mut buf);
        keccak256(buf)
    }

    /// Signs the authorization with the authority's secret key.
    pub fn into_signed_with_key(
        self,
        secret: &B256,
    ) -> Result<SignedAuthorization, AuthorizationError> {
        let signature = sign_message(secret, &self.signature_hash())?;
        Ok(self.into_signed(signature))
    }

    /// Attaches an existing signature.
    pub fn into_signed(self, signature: Signature) -> SignedAuthorization {
        SignedAuthorization {
            inner: self,
            y_parity: signature.y_parity_byte(),
            r: signature.r(),
            s: signature.s(),
        }
    }
}

impl Encodable for Authorization {
    fn encode(&self, out: &mut dyn BufMut) {
        let payload_length =
            self.chain_id.length() + self.address.length() + self.nonce.length();
        Header { list: true, payload_length }.encode(out);
        self.chain_id.encode(out);
        self.address.encode(out);
        self.nonce.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length =
            self.chain_id.length() + self.address.length() + self.nonce.length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

/// A signed [EIP-7702] authorization: the tuple plus the authority's
/// signature fields.
///
/// RLP-encodes as `[chain_id, address, nonce, y_parity, r, s]`.
///
/// [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SignedAuthorization {
    #[cfg_attr(feature = "serde", serde(flatten))]
    inner: Authorization,
    /// The signature's parity bit, `0` or `1`.
    y_parity: u8,
    /// The signature's `r` scalar.
    r: U256,
    /// The signature's `s` scalar.
    s: U256,
}

impl SignedAuthorization {
    /// The signed tuple.
    pub const fn inner(&self) -> &Authorization {
        &self.inner
    }

    /// The parity bit.
    pub const fn y_parity(&self) -> u8 {
        self.y_parity
    }

    /// The `r` scalar.
    pub const fn r(&self) -> U256 {
        self.r
    }

    /// The `s` scalar.
    pub const fn s(&self) -> U256 {
        self.s
    }

    /// Reassembles the signature, validating its fields.
    pub fn signature(&self) -> Result<Signature, AuthorizationError> {
        if self.y_parity > 1 {
            return Err(AuthorizationError::InvalidSignature);
        }
        Signature::from_scalars_and_parity(
            B256::new(self.r.to_be_bytes()),
            B256::new(self.s.to_be_bytes()),
            self.y_parity as u64,
        )
        .map_err(|_| AuthorizationError::InvalidSignature)
    }

    /// Recovers the authority that signed this authorization.
    ///
    /// Callers should additionally check that the authority's account has
    /// no code and that its nonce matches.
    pub fn recover_authority(&self) -> Result<Address, AuthorizationError> {
        let signature = self.signature()?;
        voltic_crypto::recover_signer(&signature, &self.inner.signature_hash())
            .map_err(Into::into)
    }

    fn rlp_payload_length(&self) -> usize {
        self.inner.chain_id.length()
            + self.inner.address.length()
            + self.inner.nonce.length()
            + self.y_parity.length()
            + self.r.length()
            + self.s.length()
    }
}

impl core::ops::Deref for SignedAuthorization {
    type Target = Authorization;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Encodable for SignedAuthorization {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.inner.chain_id.encode(out);
        self.inner.address.encode(out);
        self.inner.nonce.encode(out);
        self.y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for SignedAuthorization {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let started = buf.len();
        let decoded = Self {
            inner: Authorization {
                chain_id: Decodable::decode(buf)?,
                address: Decodable::decode(buf)?,
                nonce: Decodable::decode(buf)?,
            },
            y_parity: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        };
        if started - buf.len() != header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: started - buf.len(),
            });
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltic_primitives::{address, b256};

    fn secret() -> B256 {
        b256!("4646464646464646464646464646464646464646464646464646464646464646")
    }

    fn sample() -> Authorization {
        Authorization {
            chain_id: U256::from(1u64),
            address: address!("2222222222222222222222222222222222222222"),
            nonce: 7,
        }
    }

    #[test]
    fn sign_and_recover() {
        let authority = voltic_crypto::derive_public_key(&secret()).unwrap().to_address();
        let signed = sample().into_signed_with_key(&secret()).unwrap();
        assert_eq!(signed.recover_authority().unwrap(), authority);
    }

    #[test]
    fn signature_hash_is_domain_separated() {
        // the 0x05 tag keeps the digest distinct from a bare rlp hash
        let auth = sample();
        let mut bare = Vec::new();
        auth.encode(&mut bare);
        assert_ne!(auth.signature_hash(), keccak256(bare));
    }

    #[test]
    fn rlp_roundtrip() {
        let signed = sample().into_signed_with_key(&secret()).unwrap();
        let encoded = voltic_rlp::encode(&signed);
        assert_eq!(
            voltic_rlp::decode_exact::<SignedAuthorization>(&encoded).unwrap(),
            signed
        );
    }

    #[test]
    fn zero_chain_id_is_signable() {
        let signed = Authorization { chain_id: U256::ZERO, ..sample() }
            .into_signed_with_key(&secret())
            .unwrap();
        assert!(signed.recover_authority().is_ok());
    }

    #[test]
    fn tampered_tuple_changes_authority() {
        let signed = sample().into_signed_with_key(&secret()).unwrap();
        let authority = signed.recover_authority().unwrap();

        let mut tampered = sample();
        tampered.nonce += 1;
        let moved = tampered.into_signed(signed.signature().unwrap());
        // recovery either fails or yields a different signer
        match moved.recover_authority() {
            Ok(other) => assert_ne!(other, authority),
            Err(_) => {}
        }
    }
}
