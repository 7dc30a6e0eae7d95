//! EVM bytecode analysis.
//!
//! A static opcode table (London gas schedule, stack effects,
//! categories), hardfork EIP-activation predicates, an instruction-stream
//! parser with `JUMPDEST` discovery and basic-block extraction, and
//! detection of the Solidity metadata trailer.
//!
//! No execution semantics live here: the analyzer reads bytecode, it
//! never runs it.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod analysis;
mod hardfork;
mod metadata;
mod opcode;

pub use analysis::{
    analyze, AnalysisError, BasicBlock, BytecodeAnalysis, Instruction,
};
pub use hardfork::SpecId;
pub use metadata::{detect_solidity_metadata, SolidityMetadata};
pub use opcode::{Mnemonic, OpCategory, OpCode, OpInfo, OPCODE_TABLE};
