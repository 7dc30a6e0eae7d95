//! Event-log filtering.
//!
//! The query shapes of the `eth_getLogs` family: address and topic
//! matchers, block ranges, bloom-level pre-filtering, and the
//! context-enriched log and receipt types those queries return.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod filter;
mod log;
mod receipt;

pub use filter::{filter_logs, sort_logs, AddressFilter, Filter, FilterBlockRange, TopicMatcher};
pub use log::Log;
pub use receipt::TransactionReceipt;
