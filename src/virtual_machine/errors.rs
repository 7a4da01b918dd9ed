use crate::virtual_machine::ternary::Word;
use malbolge_derive::Error;

/// Errors that abort a running machine.
#[derive(Debug, Error)]
pub enum VMError {
    /// The cell under the code pointer does not decode to an instruction.
    #[error("cannot decode cell {address} holding {value}")]
    DecodeFailure { address: Word, value: Word },
    /// The executed cell is no longer printable and cannot be re-encrypted.
    #[error("cell {address} holding {value} is not printable and cannot be encrypted")]
    EncryptionFailure { address: Word, value: Word },
    /// An input instruction ran on a port without an input stream.
    #[error("input is unavailable")]
    InputUnavailable,
    /// A flat memory reported an undecided cell.
    #[error("memory cell {address} is uninitialized")]
    UninitializedMemory { address: Word },
    /// Reading input or writing output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that reject a program before it runs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A printable character does not decode to an instruction at its cell.
    #[error("invalid character {byte:?} at cell {position}")]
    InvalidCharacter { position: usize, byte: char },
    /// The program does not fit into memory.
    #[error("program of {len} cells does not fit into memory")]
    TooLong { len: usize },
    /// Memory expansion needs at least two program cells.
    #[error("program of {len} cells is too short, at least 2 are required")]
    TooShort { len: usize },
    /// Reading the program source failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
