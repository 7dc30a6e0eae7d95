//! Ethereum consensus structures.
//!
//! The five transaction variants with their canonical wire encodings,
//! signing hashes, and sender recovery; execution receipts with their log
//! blooms; and block headers and bodies.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod block;
pub mod constants;
mod error;
mod header;
mod receipt;
mod signed;
pub mod transaction;
mod withdrawal;

pub use block::{Block, BlockBody};
pub use error::TxValidationError;
pub use header::Header;
pub use receipt::{
    logs_bloom, Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom, TxReceiptStatus,
};
pub use signed::Signed;
pub use transaction::{
    SignableTransaction, Transaction, TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxEnvelope,
    TxLegacy, TxType, TypedTransaction, DEFAULT_FEE_BUMP_PERCENT,
};
pub use withdrawal::Withdrawal;

use voltic_primitives::{Signature, B256};

/// Signs a transaction with a raw secret key, producing the sealed
/// [`Signed`] form.
pub fn sign_transaction<T: SignableTransaction<Signature>>(
    tx: T,
    secret: &B256,
) -> Result<Signed<T>, voltic_crypto::SigningError> {
    let signature = voltic_crypto::sign_message(secret, &tx.signature_hash())?;
    Ok(tx.into_signed(signature))
}
