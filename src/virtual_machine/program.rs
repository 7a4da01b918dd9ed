//! Program text and memory image construction.
//!
//! A [`Program`] is the source text of a machine program. [`Program::load`]
//! turns it into a full memory image: ASCII whitespace is skipped, each
//! printable character must decode to an instruction at its cell, other bytes
//! are stored raw, and every cell past the program is filled with the combine
//! of its two predecessors.
//!
//! [`Program::from_decisions`] is the inverse used by the synthesizer: it
//! writes out the cells decided during a search as program text.

use crate::virtual_machine::errors::LoadError;
use crate::virtual_machine::isa::{Instruction, decode, encode, is_printable};
use crate::virtual_machine::state::Core;
use crate::virtual_machine::ternary::{WORD_SIZE, Word, combine};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Source text of a machine program.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    source: Vec<u8>,
}

impl Program {
    /// Wraps program source bytes.
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Reads program source from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Writes out decided cells as program text.
    ///
    /// Emits one character per address from 0 up to the highest decided
    /// address. Addresses that were never decided hold a `NoOp`. An empty
    /// map gives an empty program.
    pub fn from_decisions(decisions: &BTreeMap<Word, Word>) -> Self {
        let Some((&last, _)) = decisions.last_key_value() else {
            return Self::default();
        };
        let source = (0..=last)
            .map(|address| {
                let value = decisions
                    .get(&address)
                    .copied()
                    .unwrap_or_else(|| encode(address, Instruction::NoOp));
                value as u8
            })
            .collect();
        Self { source }
    }

    /// Returns the source bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.source
    }

    /// Builds the initial memory image.
    pub fn load(&self) -> Result<Core, LoadError> {
        let mut cells: Vec<Word> = Vec::with_capacity(WORD_SIZE as usize);
        for &byte in self.source.iter().filter(|b| !b.is_ascii_whitespace()) {
            let position = cells.len();
            if position >= WORD_SIZE as usize {
                return Err(LoadError::TooLong {
                    len: self.cell_count(),
                });
            }
            let value = byte as Word;
            if is_printable(value) && decode(position as Word, value, false).is_none() {
                return Err(LoadError::InvalidCharacter {
                    position,
                    byte: byte as char,
                });
            }
            cells.push(value);
        }

        if cells.len() < 2 {
            return Err(LoadError::TooShort { len: cells.len() });
        }
        while cells.len() < WORD_SIZE as usize {
            let n = cells.len();
            cells.push(combine(cells[n - 1], cells[n - 2]));
        }
        Ok(Core::new(cells))
    }

    /// Number of cells the source occupies.
    fn cell_count(&self) -> usize {
        self.source.iter().filter(|b| !b.is_ascii_whitespace()).count()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.source))
    }
}
