//! Memory abstractions for machine execution.
//!
//! The step function reads and writes cells through the [`Memory`] trait. A
//! cell is either decided (it holds a value) or undecided, which a read
//! reports as `None`. [`Core`] is the flat, fully decided memory of a loaded
//! program; the search plugs in a lineage-backed memory instead.

use crate::virtual_machine::ternary::{WORD_SIZE, Word};

/// Cell storage the machine executes against.
pub trait Memory {
    /// Returns the value of a cell, or `None` if the cell is undecided.
    fn read(&self, address: Word) -> Option<Word>;
    /// Stores a value, overwriting any previous one.
    fn write(&mut self, address: Word, value: Word);
}

/// Flat memory with every cell decided.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Core {
    cells: Vec<Word>,
}

impl Core {
    /// Wraps a full memory image.
    ///
    /// Images shorter than [`WORD_SIZE`] are padded with zeroes and longer
    /// ones are truncated.
    pub fn new(mut cells: Vec<Word>) -> Self {
        cells.resize(WORD_SIZE as usize, 0);
        Self { cells }
    }

    /// Returns every cell in address order.
    pub fn cells(&self) -> &[Word] {
        &self.cells
    }
}

impl Memory for Core {
    fn read(&self, address: Word) -> Option<Word> {
        self.cells.get(address as usize).copied()
    }

    fn write(&mut self, address: Word, value: Word) {
        if let Some(cell) = self.cells.get_mut(address as usize) {
            *cell = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_pads_to_word_size() {
        let core = Core::new(vec![40, 41]);
        assert_eq!(core.cells().len(), WORD_SIZE as usize);
        assert_eq!(core.read(0), Some(40));
        assert_eq!(core.read(1), Some(41));
        assert_eq!(core.read(WORD_SIZE - 1), Some(0));
    }

    #[test]
    fn core_write_overwrites() {
        let mut core = Core::new(Vec::new());
        core.write(7, 99);
        assert_eq!(core.read(7), Some(99));
        core.write(7, 100);
        assert_eq!(core.read(7), Some(100));
    }

    #[test]
    fn core_reads_out_of_range_as_undecided() {
        let core = Core::new(Vec::new());
        assert_eq!(core.read(WORD_SIZE), None);
    }
}
