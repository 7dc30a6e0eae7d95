use voltic_primitives::{Address, BlockHash, BlockNumber, Bytes, TxHash, B256};

/// A log together with the chain context it was emitted in.
///
/// Context fields are optional because a log from a pending transaction
/// has none of them yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Log {
    /// The log itself: emitter, topics, data.
    #[serde(flatten)]
    pub inner: voltic_primitives::Log,
    /// Number of the block the log was included in.
    pub block_number: Option<BlockNumber>,
    /// Hash of the block the log was included in.
    pub block_hash: Option<BlockHash>,
    /// Hash of the emitting transaction.
    pub transaction_hash: Option<TxHash>,
    /// Index of the emitting transaction within its block.
    pub transaction_index: Option<u64>,
    /// Index of this log within its block.
    pub log_index: Option<u64>,
    /// True if the log was removed by a reorganization.
    #[serde(default)]
    pub removed: bool,
}

impl Log {
    /// The emitting address.
    pub const fn address(&self) -> Address {
        self.inner.address
    }

    /// The topic list.
    pub fn topics(&self) -> &[B256] {
        self.inner.topics()
    }

    /// The data payload.
    pub const fn data(&self) -> &Bytes {
        &self.inner.data.data
    }
}

impl From<voltic_primitives::Log> for Log {
    fn from(inner: voltic_primitives::Log) -> Self {
        Self { inner, ..Default::default() }
    }
}
