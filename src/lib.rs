//! Malbolge program synthesis.
//!
//! Provides a machine emulator, a generic beam search, and a synthesizer that
//! combines the two to find programs printing a given string.

pub mod search;
pub mod synthesis;
pub mod utils;
pub mod virtual_machine;
