//! Machine execution on top of a node lineage.
//!
//! [`transition`] runs one phase of the step function on a node. Reads are
//! resolved through the node's ancestors; a read of an undecided cell stops
//! the phase and is reported as [`Transition::NeedsDecision`] so the caller
//! can branch. Input is never available here: the search does not consume
//! real input, so an input instruction fails the node.

use crate::synthesis::arena::{CellWrite, NodeArena, NodeId, WriteKind};
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::machine::{Port, Status, Step, step};
use crate::virtual_machine::state::Memory;
use crate::virtual_machine::ternary::Word;

/// Outcome of running one phase on a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// The phase ran and produced this child.
    Stepped(NodeId),
    /// The node executes `Exit`.
    Exited,
    /// The phase reads this undecided cell.
    NeedsDecision(Word),
}

/// Memory view of a node that stages the phase's write.
///
/// A single phase writes at most one cell.
struct Lineage<'a> {
    arena: &'a NodeArena,
    node: NodeId,
    staged: Option<(Word, Word)>,
}

impl Memory for Lineage<'_> {
    fn read(&self, address: Word) -> Option<Word> {
        match self.staged {
            Some((staged, value)) if staged == address => Some(value),
            _ => self.arena.resolve(self.node, address),
        }
    }

    fn write(&mut self, address: Word, value: Word) {
        debug_assert!(
            self.staged.is_none_or(|(staged, _)| staged == address),
            "phase wrote two cells"
        );
        self.staged = Some((address, value));
    }
}

/// Port that collects output and has no input.
struct SpeculativePort<'a> {
    output: &'a mut Vec<u8>,
}

impl Port for SpeculativePort<'_> {
    fn output(&mut self, byte: u8) -> Result<(), VMError> {
        self.output.push(byte);
        Ok(())
    }

    fn input(&mut self) -> Result<Word, VMError> {
        Err(VMError::InputUnavailable)
    }
}

/// Runs the next phase of `id`.
///
/// The node itself is left untouched. A completed phase creates a child that
/// carries the new registers and output, plus the phase's memory write as a
/// [`WriteKind::Mutation`]. Errors mean the node cannot continue.
pub fn transition(arena: &mut NodeArena, id: NodeId, nop_fallback: bool) -> Result<Transition, VMError> {
    let node = arena.get(id);
    let mut registers = *node.registers();
    let mut output = node.output().to_vec();

    let mut memory = Lineage {
        arena,
        node: id,
        staged: None,
    };
    let mut port = SpeculativePort {
        output: &mut output,
    };
    let outcome = step(&mut registers, &mut memory, &mut port, nop_fallback)?;
    let staged = memory.staged;

    match outcome {
        Step::NeedsDecision(address) => Ok(Transition::NeedsDecision(address)),
        Step::Completed(Status::Exited) => Ok(Transition::Exited),
        Step::Completed(Status::Running) => {
            let write = staged.map(|(address, value)| CellWrite {
                address,
                value,
                kind: WriteKind::Mutation,
            });
            Ok(Transition::Stepped(arena.derive(id, registers, output, write)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_machine::isa::{Instruction, encode, encrypt};
    use crate::virtual_machine::machine::{Phase, Registers};

    #[test]
    fn root_needs_its_first_cell() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        assert_eq!(transition(&mut arena, root, true).expect("transition"), Transition::NeedsDecision(0));
        assert_eq!(arena.live(), 1);
    }

    #[test]
    fn output_then_advance_records_encryption() {
        let mut arena = NodeArena::new();
        let root = arena.root_with(
            Registers {
                a: b'h' as Word,
                ..Registers::new()
            },
            b"",
        );
        let decided = arena.decide(root, 0, Instruction::Output);

        let Transition::Stepped(fetched) = transition(&mut arena, decided, true).expect("fetch") else {
            panic!("fetch did not step");
        };
        assert_eq!(arena.get(fetched).output(), b"h");
        assert_eq!(arena.get(fetched).registers().phase, Phase::Advance);
        assert_eq!(arena.get(fetched).write(), None);
        assert!(arena.get(decided).output().is_empty());

        let Transition::Stepped(advanced) = transition(&mut arena, fetched, true).expect("advance") else {
            panic!("advance did not step");
        };
        let raw = encode(0, Instruction::Output);
        assert_eq!(arena.resolve(advanced, 0), encrypt(raw));
        assert_eq!(arena.resolve(fetched, 0), Some(raw));
        assert_eq!(arena.get(advanced).write().map(|w| w.kind), Some(WriteKind::Mutation));
        assert_eq!(arena.get(advanced).registers().c, 1);
        assert_eq!(arena.get(fetched).depth(), 1);
        assert_eq!(arena.get(advanced).depth(), 1);
    }

    #[test]
    fn exit_creates_no_child() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let decided = arena.decide(root, 0, Instruction::Exit);
        let live = arena.live();
        assert_eq!(transition(&mut arena, decided, true).expect("transition"), Transition::Exited);
        assert_eq!(arena.live(), live);
    }

    #[test]
    fn input_fails_the_node() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let decided = arena.decide(root, 0, Instruction::Input);
        assert!(matches!(
            transition(&mut arena, decided, true),
            Err(VMError::InputUnavailable)
        ));
    }

    #[test]
    fn rotate_stages_a_mutation_of_the_data_cell() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let code = arena.decide(root, 0, Instruction::RotateRight);
        // d = 0, so the rotated cell is the instruction cell itself.
        let Transition::Stepped(child) = transition(&mut arena, code, true).expect("transition") else {
            panic!("rotate did not step");
        };
        let rotated = crate::virtual_machine::ternary::rotate_right(encode(0, Instruction::RotateRight));
        assert_eq!(arena.resolve(child, 0), Some(rotated));
        assert_eq!(arena.get(child).registers().a, rotated);
    }
}
