use voltic_consensus::{ReceiptEnvelope, TxReceiptStatus};
use voltic_primitives::{Address, BlockHash, BlockNumber, TxHash, U256};

/// A transaction receipt as a client reports it: the consensus receipt
/// plus chain context and pricing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// The consensus receipt: status, cumulative gas, bloom, logs.
    #[serde(flatten)]
    pub inner: ReceiptEnvelope,
    /// Hash of the transaction.
    pub transaction_hash: TxHash,
    /// Index of the transaction within its block.
    #[serde(default)]
    pub transaction_index: Option<u64>,
    /// Hash of the including block.
    #[serde(default)]
    pub block_hash: Option<BlockHash>,
    /// Number of the including block.
    #[serde(default)]
    pub block_number: Option<BlockNumber>,
    /// Gas used by this transaction alone.
    pub gas_used: u64,
    /// The price actually paid per unit of gas.
    pub effective_gas_price: U256,
    /// Blob gas used, for blob transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<u64>,
    /// The blob gas price of the including block, for blob transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_gas_price: Option<U256>,
    /// The sender.
    pub from: Address,
    /// The target, absent for contract creation.
    pub to: Option<Address>,
    /// The address of the deployed contract, for creation transactions.
    pub contract_address: Option<Address>,
}

impl TransactionReceipt {
    /// The lifecycle status view: pending when no block context exists,
    /// otherwise success with this transaction's gas or failure.
    pub fn status(&self) -> TxReceiptStatus {
        if self.block_number.is_none() {
            return TxReceiptStatus::Pending;
        }
        if self.inner.as_receipt().receipt.status.is_success() {
            TxReceiptStatus::Success { gas_used: self.gas_used }
        } else {
            TxReceiptStatus::Failed { reason: None }
        }
    }

    /// True if execution succeeded.
    pub fn is_success(&self) -> bool {
        self.inner.as_receipt().receipt.status.is_success()
    }
}
