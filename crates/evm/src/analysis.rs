//! Instruction-stream parsing, `JUMPDEST` discovery, and basic-block
//! extraction.

use crate::{Mnemonic, OpCode};
use voltic_primitives::Bytes;

/// One decoded instruction: its offset, opcode, and immediate payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Byte offset of the opcode within the bytecode.
    pub offset: usize,
    /// The opcode.
    pub opcode: OpCode,
    /// The immediate bytes of a `PUSHx`, when present. A `PUSH`
    /// truncated by end-of-code keeps whatever bytes remain.
    pub immediate: Option<Bytes>,
}

impl core::fmt::Display for Instruction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.immediate {
            Some(immediate) if !immediate.is_empty() => {
                write!(f, "{:#06x}: {} {}", self.offset, self.opcode, immediate)
            }
            _ => write!(f, "{:#06x}: {}", self.offset, self.opcode),
        }
    }
}

/// A maximal straight-line run of instructions.
///
/// A block starts at offset zero, at every `JUMPDEST`, and immediately
/// after every terminator (`STOP`, `RETURN`, `REVERT`, `INVALID`,
/// `SELFDESTRUCT`, `JUMP`, `JUMPI`). It ends at its terminator,
/// inclusive, or at the last instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BasicBlock {
    /// Offset of the block's first instruction.
    pub start: usize,
    /// Offset of the block's last instruction, inclusive.
    pub end: usize,
    /// The terminating opcode, if the block ends in one.
    pub terminator: Option<OpCode>,
}

/// Errors raised by analysis queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The queried offset is not a valid jump destination.
    #[error("offset {0} is not a valid jump destination")]
    InvalidJumpDest(usize),
}

/// The result of one analysis pass over a bytecode blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BytecodeAnalysis {
    instructions: Vec<Instruction>,
    /// One bit per code offset; set iff the offset is a valid jump
    /// destination.
    jump_dest_bits: Vec<u8>,
    basic_blocks: Vec<BasicBlock>,
}

impl BytecodeAnalysis {
    /// The decoded instruction stream, in offset order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The basic blocks, in offset order.
    pub fn basic_blocks(&self) -> &[BasicBlock] {
        &self.basic_blocks
    }

    /// True iff `offset` holds a `JUMPDEST` opcode that is not buried in
    /// a `PUSH` immediate.
    pub fn is_jump_dest(&self, offset: usize) -> bool {
        self.jump_dest_bits
            .get(offset / 8)
            .is_some_and(|byte| byte & (1 << (offset % 8)) != 0)
    }

    /// The valid jump destinations, in ascending order.
    pub fn jump_dests(&self) -> impl Iterator<Item = usize> + '_ {
        self.instructions
            .iter()
            .map(|instruction| instruction.offset)
            .filter(|offset| self.is_jump_dest(*offset))
    }

    /// Validates a jump target, for callers resolving a static jump.
    pub fn require_jump_dest(&self, offset: usize) -> Result<(), AnalysisError> {
        if self.is_jump_dest(offset) {
            Ok(())
        } else {
            Err(AnalysisError::InvalidJumpDest(offset))
        }
    }
}

/// Analyzes a bytecode blob: decodes the instruction stream left to
/// right, collects valid `JUMPDEST` offsets, and splits basic blocks.
///
/// `PUSH` immediates are skipped, so a `0x5b` byte inside an immediate
/// is data, never a jump destination. A trailing `PUSH` whose immediate
/// runs past end-of-code is kept with the bytes that remain; the missing
/// bytes are not an error.
pub fn analyze(code: &[u8]) -> BytecodeAnalysis {
    let mut instructions = Vec::new();
    let mut jump_dest_bits = vec![0u8; code.len().div_ceil(8)];

    let mut offset = 0;
    while offset < code.len() {
        let opcode = OpCode::from_byte(code[offset]);

        if opcode == OpCode::Known(Mnemonic::JUMPDEST) {
            jump_dest_bits[offset / 8] |= 1 << (offset % 8);
        }

        let immediate_size = opcode.immediate_size();
        let immediate = if immediate_size > 0 {
            let end = usize::min(offset + 1 + immediate_size, code.len());
            Some(Bytes::copy_from_slice(&code[offset + 1..end]))
        } else {
            None
        };

        instructions.push(Instruction { offset, opcode, immediate });
        offset += 1 + immediate_size;
    }

    let basic_blocks = split_blocks(&instructions, |offset| {
        jump_dest_bits
            .get(offset / 8)
            .is_some_and(|byte| byte & (1 << (offset % 8)) != 0)
    });

    BytecodeAnalysis { instructions, jump_dest_bits, basic_blocks }
}

fn split_blocks(
    instructions: &[Instruction],
    is_jump_dest: impl Fn(usize) -> bool,
) -> Vec<BasicBlock> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut last_offset = 0;

    for instruction in instructions {
        let terminates =
            instruction.opcode.is_terminating() || instruction.opcode.is_jump();

        // a JUMPDEST begins a new block even mid-run
        if start.is_some() && is_jump_dest(instruction.offset) {
            blocks.push(BasicBlock {
                start: start.take().expect("checked above"),
                end: last_offset,
                terminator: None,
            });
        }

        let block_start = *start.get_or_insert(instruction.offset);
        last_offset = instruction.offset;

        if terminates {
            blocks.push(BasicBlock {
                start: block_start,
                end: instruction.offset,
                terminator: Some(instruction.opcode),
            });
            start = None;
        }
    }

    if let Some(start) = start {
        blocks.push(BasicBlock { start, end: last_offset, terminator: None });
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn decodes_push_immediates() {
        // PUSH1 0x60, PUSH1 0x40, MSTORE
        let analysis = analyze(&hex!("6060604052"));
        let ops: Vec<_> = analysis.instructions().iter().map(|i| i.opcode).collect();
        assert_eq!(
            ops,
            [
                OpCode::Known(Mnemonic::PUSH1),
                OpCode::Known(Mnemonic::PUSH1),
                OpCode::Known(Mnemonic::MSTORE),
            ]
        );
        assert_eq!(analysis.instructions()[0].immediate.as_deref(), Some(&[0x60][..]));
        assert_eq!(analysis.instructions()[2].offset, 4);
    }

    #[test]
    fn jumpdest_inside_push_immediate_is_data() {
        // PUSH2 0x5b5b, JUMPDEST, STOP
        let analysis = analyze(&hex!("615b5b5b00"));
        assert!(!analysis.is_jump_dest(1));
        assert!(!analysis.is_jump_dest(2));
        assert!(analysis.is_jump_dest(3));
        assert_eq!(analysis.jump_dests().collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn truncated_trailing_push_is_kept() {
        // PUSH32 with only three immediate bytes available
        let analysis = analyze(&hex!("7f010203"));
        let instructions = analysis.instructions();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].opcode, OpCode::Known(Mnemonic::PUSH32));
        assert_eq!(instructions[0].immediate.as_deref(), Some(&[1u8, 2, 3][..]));
        // and nothing in the truncated immediate counts as a jumpdest
        assert_eq!(analysis.jump_dests().count(), 0);
    }

    #[test]
    fn truncated_push_bytes_are_not_jumpdests() {
        // PUSH2 followed by a single 0x5b byte at end of code
        let analysis = analyze(&hex!("615b"));
        assert_eq!(analysis.instructions().len(), 1);
        assert!(!analysis.is_jump_dest(1));
    }

    #[test]
    fn basic_block_split() {
        // 0: PUSH1 0x08 / 2: JUMP | 3: STOP | 4: JUMPDEST ... | 8: JUMPDEST, STOP
        let analysis = analyze(&hex!("600856005b6001505b00"));
        let blocks = analysis.basic_blocks();
        assert_eq!(
            blocks,
            [
                BasicBlock { start: 0, end: 2, terminator: Some(OpCode::Known(Mnemonic::JUMP)) },
                BasicBlock { start: 3, end: 3, terminator: Some(OpCode::Known(Mnemonic::STOP)) },
                BasicBlock { start: 4, end: 7, terminator: None },
                BasicBlock { start: 8, end: 9, terminator: Some(OpCode::Known(Mnemonic::STOP)) },
            ]
        );
    }

    #[test]
    fn unknown_opcode_terminates_a_block() {
        // ADD, 0x0c (unassigned), ADD
        let analysis = analyze(&hex!("010c01"));
        let blocks = analysis.basic_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].terminator, Some(OpCode::Unknown(0x0c)));
        assert_eq!(blocks[1], BasicBlock { start: 2, end: 2, terminator: None });
    }

    #[test]
    fn jump_dest_queries() {
        let analysis = analyze(&hex!("5b00"));
        assert!(analysis.require_jump_dest(0).is_ok());
        assert_eq!(
            analysis.require_jump_dest(1),
            Err(AnalysisError::InvalidJumpDest(1))
        );
        assert_eq!(
            analysis.require_jump_dest(100),
            Err(AnalysisError::InvalidJumpDest(100))
        );
    }

    #[test]
    fn empty_code() {
        let analysis = analyze(&[]);
        assert!(analysis.instructions().is_empty());
        assert!(analysis.basic_blocks().is_empty());
        assert!(!analysis.is_jump_dest(0));
    }
}
