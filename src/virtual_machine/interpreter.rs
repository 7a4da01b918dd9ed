//! Deterministic interpreter over a loaded memory image.
//!
//! Runs [`step`] against a flat [`Core`] until the machine exits or fails.
//! Input comes from a byte stream and reads the EOF sentinel once the stream
//! is exhausted.

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::machine::{Port, Registers, Status, Step, step};
use crate::virtual_machine::state::Core;
use crate::virtual_machine::ternary::{EOF_SENTINEL, Word};
use std::io::{ErrorKind, Read, Write};

/// [`Port`] over a byte reader and a byte writer.
pub struct StreamPort<R, W> {
    input: R,
    output: W,
}

impl<R: Read, W: Write> StreamPort<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the port and returns the output writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Flushes pending output and returns the writer.
    pub fn finish(mut self) -> Result<W, VMError> {
        self.output.flush()?;
        Ok(self.output)
    }
}

impl<R: Read, W: Write> Port for StreamPort<R, W> {
    fn output(&mut self, byte: u8) -> Result<(), VMError> {
        self.output.write_all(&[byte])?;
        Ok(())
    }

    fn input(&mut self) -> Result<Word, VMError> {
        // Prompted programs expect their output before blocking on input.
        self.output.flush()?;
        let mut byte = [0u8; 1];
        match self.input.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0] as Word),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(EOF_SENTINEL),
            Err(e) => Err(e.into()),
        }
    }
}

/// Machine with a fully decided memory.
pub struct Interpreter {
    registers: Registers,
    core: Core,
    nop_fallback: bool,
    steps: u64,
}

impl Interpreter {
    /// Creates an interpreter that executes unnamed printable cells as `NoOp`.
    pub fn new(core: Core) -> Self {
        Self {
            registers: Registers::new(),
            core,
            nop_fallback: true,
            steps: 0,
        }
    }

    /// Makes unnamed printable cells fail to decode instead.
    pub fn strict(mut self) -> Self {
        self.nop_fallback = false;
        self
    }

    /// Runs a single phase.
    pub fn step<P: Port + ?Sized>(&mut self, port: &mut P) -> Result<Status, VMError> {
        match step(&mut self.registers, &mut self.core, port, self.nop_fallback)? {
            Step::Completed(status) => {
                self.steps += 1;
                Ok(status)
            }
            Step::NeedsDecision(address) => Err(VMError::UninitializedMemory { address }),
        }
    }

    /// Runs until the machine exits.
    pub fn run<P: Port + ?Sized>(&mut self, port: &mut P) -> Result<(), VMError> {
        while self.step(port)? == Status::Running {}
        Ok(())
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    /// Number of phases completed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
