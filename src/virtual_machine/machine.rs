//! Step function of the machine.
//!
//! One call to [`step`] runs exactly one phase of the instruction cycle:
//!
//! - [`Phase::Fetch`] decodes the cell under `c` at its address and executes it.
//!   `Exit` stops the machine here, every other instruction moves on to the
//!   advance phase.
//! - [`Phase::Advance`] replaces the cell under `c` with its encryption and
//!   increments `c` and `d`.
//!
//! Memory and I/O are supplied by the caller through [`Memory`] and [`Port`],
//! so the same function drives the interpreter and the speculative search.
//! A read of an undecided cell yields [`Step::NeedsDecision`] before the phase
//! has any side effect, which lets the caller decide the cell and retry.

mod registers;

pub use registers::{Phase, Registers};

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::{Instruction, decode, encrypt};
use crate::virtual_machine::state::Memory;
use crate::virtual_machine::ternary::{WORD_SIZE, Word, combine, rotate_right};

/// Byte-oriented I/O of the machine.
pub trait Port {
    /// Writes one output byte.
    fn output(&mut self, byte: u8) -> Result<(), VMError>;
    /// Reads one input value, the EOF sentinel at end of stream.
    fn input(&mut self) -> Result<Word, VMError>;
}

/// State of the machine after a completed phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// The machine can take another step.
    Running,
    /// An `Exit` instruction was executed.
    Exited,
}

/// Result of one call to [`step`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    /// The phase ran to completion.
    Completed(Status),
    /// The phase needs an undecided cell and did not run.
    NeedsDecision(Word),
}

/// Reads a cell, or returns [`Step::NeedsDecision`] from the enclosing function.
macro_rules! read_or_decide {
    ($memory:expr, $address:expr) => {{
        let address = $address;
        match $memory.read(address) {
            Some(value) => value,
            None => return Ok(Step::NeedsDecision(address)),
        }
    }};
}

/// Runs the phase selected by `registers.phase`.
///
/// `nop_fallback` decides whether a printable cell that names no instruction
/// executes as `NoOp` or fails to decode.
pub fn step<M, P>(
    registers: &mut Registers,
    memory: &mut M,
    port: &mut P,
    nop_fallback: bool,
) -> Result<Step, VMError>
where
    M: Memory + ?Sized,
    P: Port + ?Sized,
{
    match registers.phase {
        Phase::Fetch => fetch(registers, memory, port, nop_fallback),
        Phase::Advance => advance(registers, memory),
    }
}

fn fetch<M, P>(
    registers: &mut Registers,
    memory: &mut M,
    port: &mut P,
    nop_fallback: bool,
) -> Result<Step, VMError>
where
    M: Memory + ?Sized,
    P: Port + ?Sized,
{
    let value = read_or_decide!(memory, registers.c);
    let instruction = decode(registers.c, value, nop_fallback).ok_or(VMError::DecodeFailure {
        address: registers.c,
        value,
    })?;

    match instruction {
        Instruction::MoveD => {
            registers.d = read_or_decide!(memory, registers.d);
        }
        Instruction::Jump => {
            registers.c = read_or_decide!(memory, registers.d);
        }
        Instruction::RotateRight => {
            let rotated = rotate_right(read_or_decide!(memory, registers.d));
            memory.write(registers.d, rotated);
            registers.a = rotated;
        }
        Instruction::Combine => {
            let combined = combine(registers.a, read_or_decide!(memory, registers.d));
            memory.write(registers.d, combined);
            registers.a = combined;
        }
        Instruction::Output => port.output((registers.a % 256) as u8)?,
        Instruction::Input => registers.a = port.input()?,
        Instruction::Exit => return Ok(Step::Completed(Status::Exited)),
        Instruction::NoOp => {}
    }

    registers.phase = Phase::Advance;
    Ok(Step::Completed(Status::Running))
}

fn advance<M>(registers: &mut Registers, memory: &mut M) -> Result<Step, VMError>
where
    M: Memory + ?Sized,
{
    let value = read_or_decide!(memory, registers.c);
    let encrypted = encrypt(value).ok_or(VMError::EncryptionFailure {
        address: registers.c,
        value,
    })?;
    memory.write(registers.c, encrypted);

    registers.c = increment(registers.c);
    registers.d = increment(registers.d);
    registers.phase = Phase::Fetch;
    Ok(Step::Completed(Status::Running))
}

const fn increment(register: Word) -> Word {
    if register == WORD_SIZE - 1 { 0 } else { register + 1 }
}

#[cfg(test)]
mod tests;
