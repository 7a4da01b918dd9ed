//! Ternary virtual machine with encrypted, self-modifying code.
//!
//! # Architecture
//!
//! - **Words**: unsigned 10-trit integers, see [`ternary`]
//! - **Memory**: [`ternary::WORD_SIZE`] cells behind the [`state::Memory`] trait
//! - **Registers**: accumulator `a`, code pointer `c`, data pointer `d`
//! - **Decoding**: the instruction in a cell depends on its address, see [`isa`]
//! - **Execution model**: each cycle executes the cell under `c`, then encrypts
//!   it in place and advances both pointers
//!
//! # Modules
//!
//! - [`errors`]: Load and execution error types
//! - [`interpreter`]: Runs a loaded program against byte streams
//! - [`isa`]: Instruction set, decode and encryption tables
//! - [`machine`]: Two-phase step function shared by all execution modes
//! - [`program`]: Program text and memory image construction
//! - [`state`]: Memory trait and flat memory
//! - [`ternary`]: Rotate and combine operations on words

pub mod errors;
pub mod interpreter;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod machine;
pub mod program;
pub mod state;
pub mod ternary;
