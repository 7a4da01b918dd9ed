use crate::virtual_machine::ternary::Word;

/// Which half of the instruction cycle runs next.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Decode and execute the instruction at `c`.
    #[default]
    Fetch,
    /// Encrypt the cell at `c`, then increment `c` and `d`.
    Advance,
}

/// Register file of the machine.
///
/// All registers start at zero and the first phase is [`Phase::Fetch`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Registers {
    /// Accumulator.
    pub a: Word,
    /// Code pointer.
    pub c: Word,
    /// Data pointer.
    pub d: Word,
    /// Phase the next step executes.
    pub phase: Phase,
}

impl Registers {
    /// Creates a zeroed register file about to fetch.
    pub const fn new() -> Self {
        Self {
            a: 0,
            c: 0,
            d: 0,
            phase: Phase::Fetch,
        }
    }
}
