//! EVM operation codes and their static metadata.

use core::fmt;
use strum::{Display, EnumIter, FromRepr};

/// What an instruction does, at the granularity a disassembler cares
/// about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCategory {
    /// Arithmetic over 256-bit words.
    Arithmetic,
    /// Comparisons producing 0 or 1.
    Comparison,
    /// Bit-level operations.
    Bitwise,
    /// Keccak-256 hashing.
    Keccak,
    /// Transaction and account environment reads.
    Environment,
    /// Block-context reads.
    Block,
    /// Plain stack manipulation.
    Stack,
    /// Memory reads and writes.
    Memory,
    /// Persistent and transient storage.
    Storage,
    /// Control flow.
    Flow,
    /// Immediate pushes.
    Push,
    /// Stack duplication.
    Dup,
    /// Stack swaps.
    Swap,
    /// Event logging.
    Log,
    /// Calls and contract creation.
    System,
    /// Execution-halting instructions.
    Halt,
}

/// Static metadata of one opcode: mnemonic, minimum gas under the London
/// schedule, and stack effect. Warm-access costs are listed for
/// state-touching opcodes; dynamic components (memory expansion, cold
/// surcharges, value transfer stipends) are out of scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    /// The canonical mnemonic.
    pub name: &'static str,
    /// Minimum gas charged (London schedule).
    pub gas: u16,
    /// Words popped from the stack.
    pub stack_pops: u8,
    /// Words pushed onto the stack.
    pub stack_pushes: u8,
    /// Instruction category.
    pub category: OpCategory,
}

macro_rules! mnemonics {
    ($($byte:literal => $name:ident, $gas:literal, $pops:literal, $pushes:literal, $cat:ident;)*) => {
        /// A known EVM operation, discriminated by its byte value.
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr, Display, EnumIter)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum Mnemonic {
            $(
                #[allow(missing_docs)]
                $name = $byte,
            )*
        }

        impl Mnemonic {
            /// The static metadata of this operation.
            pub const fn info(&self) -> OpInfo {
                match self {
                    $(
                        Self::$name => OpInfo {
                            name: stringify!($name),
                            gas: $gas,
                            stack_pops: $pops,
                            stack_pushes: $pushes,
                            category: OpCategory::$cat,
                        },
                    )*
                }
            }
        }
    };
}

mnemonics! {
    0x00 => STOP, 0, 0, 0, Halt;
    0x01 => ADD, 3, 2, 1, Arithmetic;
    0x02 => MUL, 5, 2, 1, Arithmetic;
    0x03 => SUB, 3, 2, 1, Arithmetic;
    0x04 => DIV, 5, 2, 1, Arithmetic;
    0x05 => SDIV, 5, 2, 1, Arithmetic;
    0x06 => MOD, 5, 2, 1, Arithmetic;
    0x07 => SMOD, 5, 2, 1, Arithmetic;
    0x08 => ADDMOD, 8, 3, 1, Arithmetic;
    0x09 => MULMOD, 8, 3, 1, Arithmetic;
    0x0a => EXP, 10, 2, 1, Arithmetic;
    0x0b => SIGNEXTEND, 5, 2, 1, Arithmetic;
    0x10 => LT, 3, 2, 1, Comparison;
    0x11 => GT, 3, 2, 1, Comparison;
    0x12 => SLT, 3, 2, 1, Comparison;
    0x13 => SGT, 3, 2, 1, Comparison;
    0x14 => EQ, 3, 2, 1, Comparison;
    0x15 => ISZERO, 3, 1, 1, Comparison;
    0x16 => AND, 3, 2, 1, Bitwise;
    0x17 => OR, 3, 2, 1, Bitwise;
    0x18 => XOR, 3, 2, 1, Bitwise;
    0x19 => NOT, 3, 1, 1, Bitwise;
    0x1a => BYTE, 3, 2, 1, Bitwise;
    0x1b => SHL, 3, 2, 1, Bitwise;
    0x1c => SHR, 3, 2, 1, Bitwise;
    0x1d => SAR, 3, 2, 1, Bitwise;
    0x20 => KECCAK256, 30, 2, 1, Keccak;
    0x30 => ADDRESS, 2, 0, 1, Environment;
    0x31 => BALANCE, 100, 1, 1, Environment;
    0x32 => ORIGIN, 2, 0, 1, Environment;
    0x33 => CALLER, 2, 0, 1, Environment;
    0x34 => CALLVALUE, 2, 0, 1, Environment;
    0x35 => CALLDATALOAD, 3, 1, 1, Environment;
    0x36 => CALLDATASIZE, 2, 0, 1, Environment;
    0x37 => CALLDATACOPY, 3, 3, 0, Environment;
    0x38 => CODESIZE, 2, 0, 1, Environment;
    0x39 => CODECOPY, 3, 3, 0, Environment;
    0x3a => GASPRICE, 2, 0, 1, Environment;
    0x3b => EXTCODESIZE, 100, 1, 1, Environment;
    0x3c => EXTCODECOPY, 100, 4, 0, Environment;
    0x3d => RETURNDATASIZE, 2, 0, 1, Environment;
    0x3e => RETURNDATACOPY, 3, 3, 0, Environment;
    0x3f => EXTCODEHASH, 100, 1, 1, Environment;
    0x40 => BLOCKHASH, 20, 1, 1, Block;
    0x41 => COINBASE, 2, 0, 1, Block;
    0x42 => TIMESTAMP, 2, 0, 1, Block;
    0x43 => NUMBER, 2, 0, 1, Block;
    0x44 => PREVRANDAO, 2, 0, 1, Block;
    0x45 => GASLIMIT, 2, 0, 1, Block;
    0x46 => CHAINID, 2, 0, 1, Block;
    0x47 => SELFBALANCE, 5, 0, 1, Environment;
    0x48 => BASEFEE, 2, 0, 1, Block;
    0x49 => BLOBHASH, 3, 1, 1, Block;
    0x4a => BLOBBASEFEE, 2, 0, 1, Block;
    0x50 => POP, 2, 1, 0, Stack;
    0x51 => MLOAD, 3, 1, 1, Memory;
    0x52 => MSTORE, 3, 2, 0, Memory;
    0x53 => MSTORE8, 3, 2, 0, Memory;
    0x54 => SLOAD, 100, 1, 1, Storage;
    0x55 => SSTORE, 100, 2, 0, Storage;
    0x56 => JUMP, 8, 1, 0, Flow;
    0x57 => JUMPI, 10, 2, 0, Flow;
    0x58 => PC, 2, 0, 1, Flow;
    0x59 => MSIZE, 2, 0, 1, Memory;
    0x5a => GAS, 2, 0, 1, Environment;
    0x5b => JUMPDEST, 1, 0, 0, Flow;
    0x5c => TLOAD, 100, 1, 1, Storage;
    0x5d => TSTORE, 100, 2, 0, Storage;
    0x5e => MCOPY, 3, 3, 0, Memory;
    0x5f => PUSH0, 2, 0, 1, Push;
    0x60 => PUSH1, 3, 0, 1, Push;
    0x61 => PUSH2, 3, 0, 1, Push;
    0x62 => PUSH3, 3, 0, 1, Push;
    0x63 => PUSH4, 3, 0, 1, Push;
    0x64 => PUSH5, 3, 0, 1, Push;
    0x65 => PUSH6, 3, 0, 1, Push;
    0x66 => PUSH7, 3, 0, 1, Push;
    0x67 => PUSH8, 3, 0, 1, Push;
    0x68 => PUSH9, 3, 0, 1, Push;
    0x69 => PUSH10, 3, 0, 1, Push;
    0x6a => PUSH11, 3, 0, 1, Push;
    0x6b => PUSH12, 3, 0, 1, Push;
    0x6c => PUSH13, 3, 0, 1, Push;
    0x6d => PUSH14, 3, 0, 1, Push;
    0x6e => PUSH15, 3, 0, 1, Push;
    0x6f => PUSH16, 3, 0, 1, Push;
    0x70 => PUSH17, 3, 0, 1, Push;
    0x71 => PUSH18, 3, 0, 1, Push;
    0x72 => PUSH19, 3, 0, 1, Push;
    0x73 => PUSH20, 3, 0, 1, Push;
    0x74 => PUSH21, 3, 0, 1, Push;
    0x75 => PUSH22, 3, 0, 1, Push;
    0x76 => PUSH23, 3, 0, 1, Push;
    0x77 => PUSH24, 3, 0, 1, Push;
    0x78 => PUSH25, 3, 0, 1, Push;
    0x79 => PUSH26, 3, 0, 1, Push;
    0x7a => PUSH27, 3, 0, 1, Push;
    0x7b => PUSH28, 3, 0, 1, Push;
    0x7c => PUSH29, 3, 0, 1, Push;
    0x7d => PUSH30, 3, 0, 1, Push;
    0x7e => PUSH31, 3, 0, 1, Push;
    0x7f => PUSH32, 3, 0, 1, Push;
    0x80 => DUP1, 3, 1, 2, Dup;
    0x81 => DUP2, 3, 2, 3, Dup;
    0x82 => DUP3, 3, 3, 4, Dup;
    0x83 => DUP4, 3, 4, 5, Dup;
    0x84 => DUP5, 3, 5, 6, Dup;
    0x85 => DUP6, 3, 6, 7, Dup;
    0x86 => DUP7, 3, 7, 8, Dup;
    0x87 => DUP8, 3, 8, 9, Dup;
    0x88 => DUP9, 3, 9, 10, Dup;
    0x89 => DUP10, 3, 10, 11, Dup;
    0x8a => DUP11, 3, 11, 12, Dup;
    0x8b => DUP12, 3, 12, 13, Dup;
    0x8c => DUP13, 3, 13, 14, Dup;
    0x8d => DUP14, 3, 14, 15, Dup;
    0x8e => DUP15, 3, 15, 16, Dup;
    0x8f => DUP16, 3, 16, 17, Dup;
    0x90 => SWAP1, 3, 2, 2, Swap;
    0x91 => SWAP2, 3, 3, 3, Swap;
    0x92 => SWAP3, 3, 4, 4, Swap;
    0x93 => SWAP4, 3, 5, 5, Swap;
    0x94 => SWAP5, 3, 6, 6, Swap;
    0x95 => SWAP6, 3, 7, 7, Swap;
    0x96 => SWAP7, 3, 8, 8, Swap;
    0x97 => SWAP8, 3, 9, 9, Swap;
    0x98 => SWAP9, 3, 10, 10, Swap;
    0x99 => SWAP10, 3, 11, 11, Swap;
    0x9a => SWAP11, 3, 12, 12, Swap;
    0x9b => SWAP12, 3, 13, 13, Swap;
    0x9c => SWAP13, 3, 14, 14, Swap;
    0x9d => SWAP14, 3, 15, 15, Swap;
    0x9e => SWAP15, 3, 16, 16, Swap;
    0x9f => SWAP16, 3, 17, 17, Swap;
    0xa0 => LOG0, 375, 2, 0, Log;
    0xa1 => LOG1, 750, 3, 0, Log;
    0xa2 => LOG2, 1125, 4, 0, Log;
    0xa3 => LOG3, 1500, 5, 0, Log;
    0xa4 => LOG4, 1875, 6, 0, Log;
    0xf0 => CREATE, 32000, 3, 1, System;
    0xf1 => CALL, 100, 7, 1, System;
    0xf2 => CALLCODE, 100, 7, 1, System;
    0xf3 => RETURN, 0, 2, 0, Halt;
    0xf4 => DELEGATECALL, 100, 6, 1, System;
    0xf5 => CREATE2, 32000, 4, 1, System;
    0xfa => STATICCALL, 100, 6, 1, System;
    0xfd => REVERT, 0, 2, 0, Halt;
    0xfe => INVALID, 0, 0, 0, Halt;
    0xff => SELFDESTRUCT, 5000, 1, 0, Halt;
}

impl Mnemonic {
    /// Converts a byte into a known mnemonic, if one exists.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Self::from_repr(byte)
    }

    /// True for `PUSH0` through `PUSH32`.
    pub const fn is_push(&self) -> bool {
        matches!(*self as u8, 0x5f..=0x7f)
    }

    /// The number of immediate bytes following this instruction; nonzero
    /// only for `PUSH1` through `PUSH32`.
    pub const fn immediate_size(&self) -> usize {
        match *self as u8 {
            byte @ 0x60..=0x7f => (byte - 0x5f) as usize,
            _ => 0,
        }
    }

    /// True for `DUP1` through `DUP16`.
    pub const fn is_dup(&self) -> bool {
        matches!(*self as u8, 0x80..=0x8f)
    }

    /// The duplication depth of a `DUPx` instruction.
    pub const fn dup_depth(&self) -> Option<usize> {
        match *self as u8 {
            byte @ 0x80..=0x8f => Some((byte - 0x7f) as usize),
            _ => None,
        }
    }

    /// True for `SWAP1` through `SWAP16`.
    pub const fn is_swap(&self) -> bool {
        matches!(*self as u8, 0x90..=0x9f)
    }

    /// The swap depth of a `SWAPx` instruction.
    pub const fn swap_depth(&self) -> Option<usize> {
        match *self as u8 {
            byte @ 0x90..=0x9f => Some((byte - 0x8f) as usize),
            _ => None,
        }
    }

    /// True for instructions that halt execution: `STOP`, `RETURN`,
    /// `REVERT`, `INVALID`, and `SELFDESTRUCT`.
    pub const fn is_terminating(&self) -> bool {
        matches!(self, Self::STOP | Self::RETURN | Self::REVERT | Self::INVALID | Self::SELFDESTRUCT)
    }

    /// True for `JUMP` and `JUMPI`.
    pub const fn is_jump(&self) -> bool {
        matches!(self, Self::JUMP | Self::JUMPI)
    }
}

/// An opcode as it appears in bytecode: a known mnemonic or an
/// unassigned byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    /// A known opcode.
    Known(Mnemonic),
    /// An unassigned byte; executing it halts with an invalid-opcode
    /// fault.
    Unknown(u8),
}

impl OpCode {
    /// Classifies a byte.
    pub const fn from_byte(byte: u8) -> Self {
        match Mnemonic::from_byte(byte) {
            Some(mnemonic) => Self::Known(mnemonic),
            None => Self::Unknown(byte),
        }
    }

    /// The raw byte value.
    pub const fn into_byte(self) -> u8 {
        match self {
            Self::Known(mnemonic) => mnemonic as u8,
            Self::Unknown(byte) => byte,
        }
    }

    /// True if the byte is an assigned opcode.
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Metadata, for known opcodes.
    pub const fn info(&self) -> Option<OpInfo> {
        match self {
            Self::Known(mnemonic) => Some(mnemonic.info()),
            Self::Unknown(_) => None,
        }
    }

    /// The number of immediate bytes following this instruction.
    pub const fn immediate_size(&self) -> usize {
        match self {
            Self::Known(mnemonic) => mnemonic.immediate_size(),
            Self::Unknown(_) => 0,
        }
    }

    /// True for halting instructions. Unknown bytes halt (with a fault)
    /// and count as terminating.
    pub const fn is_terminating(&self) -> bool {
        match self {
            Self::Known(mnemonic) => mnemonic.is_terminating(),
            Self::Unknown(_) => true,
        }
    }

    /// True for `JUMP` and `JUMPI`.
    pub const fn is_jump(&self) -> bool {
        match self {
            Self::Known(mnemonic) => mnemonic.is_jump(),
            Self::Unknown(_) => false,
        }
    }
}

impl From<u8> for OpCode {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(mnemonic) => fmt::Display::fmt(mnemonic, f),
            Self::Unknown(byte) => write!(f, "UNKNOWN(0x{byte:02x})"),
        }
    }
}

/// The full 256-entry dispatch table: metadata for assigned bytes, `None`
/// for unassigned ones. Built at compile time.
pub static OPCODE_TABLE: [Option<OpInfo>; 256] = {
    let mut table = [None; 256];
    let mut byte = 0usize;
    while byte < 256 {
        if let Some(mnemonic) = Mnemonic::from_repr(byte as u8) {
            table[byte] = Some(mnemonic.info());
        }
        byte += 1;
    }
    table
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn byte_conversions() {
        assert_eq!(Mnemonic::from_byte(0x5a), Some(Mnemonic::GAS));
        assert_eq!(Mnemonic::from_byte(0x0f), None);
        assert_eq!(OpCode::from_byte(0x01), OpCode::Known(Mnemonic::ADD));
        assert_eq!(OpCode::from_byte(0x0f), OpCode::Unknown(0x0f));
        assert_eq!(OpCode::from_byte(0xfe).into_byte(), 0xfe);
    }

    #[test]
    fn push_immediates() {
        assert_eq!(Mnemonic::PUSH0.immediate_size(), 0);
        assert_eq!(Mnemonic::PUSH1.immediate_size(), 1);
        assert_eq!(Mnemonic::PUSH32.immediate_size(), 32);
        assert!(Mnemonic::PUSH0.is_push());
        assert!(!Mnemonic::ADD.is_push());
    }

    #[test]
    fn dup_swap_depths() {
        assert_eq!(Mnemonic::DUP1.dup_depth(), Some(1));
        assert_eq!(Mnemonic::DUP16.dup_depth(), Some(16));
        assert_eq!(Mnemonic::SWAP1.swap_depth(), Some(1));
        assert_eq!(Mnemonic::SWAP16.swap_depth(), Some(16));
        assert_eq!(Mnemonic::ADD.dup_depth(), None);
    }

    #[test]
    fn terminators() {
        for halt in [
            Mnemonic::STOP,
            Mnemonic::RETURN,
            Mnemonic::REVERT,
            Mnemonic::INVALID,
            Mnemonic::SELFDESTRUCT,
        ] {
            assert!(halt.is_terminating(), "{halt} must terminate");
        }
        assert!(!Mnemonic::JUMP.is_terminating());
        assert!(OpCode::Unknown(0x0c).is_terminating());
    }

    #[test]
    fn table_agrees_with_enum() {
        let known = Mnemonic::iter().count();
        let populated = OPCODE_TABLE.iter().filter(|e| e.is_some()).count();
        assert_eq!(known, populated);
        assert_eq!(OPCODE_TABLE[0x01].unwrap().name, "ADD");
        assert!(OPCODE_TABLE[0x0c].is_none());
    }

    #[test]
    fn spot_check_gas_and_stack() {
        let sstore = Mnemonic::SSTORE.info();
        assert_eq!((sstore.gas, sstore.stack_pops, sstore.stack_pushes), (100, 2, 0));
        let call = Mnemonic::CALL.info();
        assert_eq!((call.stack_pops, call.stack_pushes), (7, 1));
        assert_eq!(Mnemonic::LOG4.info().gas, 1875);
        assert_eq!(Mnemonic::JUMPDEST.info().gas, 1);
        assert_eq!(Mnemonic::CREATE.info().gas, 32000);
    }
}
