//! Instruction Set Architecture (ISA) definitions.
//!
//! The machine has no fixed opcode space: the instruction stored in a cell
//! depends on both the raw cell value and the cell address. A raw value is
//! only executable when it is a printable, non-space ASCII character.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical instruction list and invokes a callback macro for code
//! generation, so the enum below and the table checks in `isa_static_check`
//! are generated from the same definitions.
//!
//! This module provides:
//! - The [`Instruction`] enum keyed by its canonical codepoint
//! - [`decode`] and its inverse [`encode`]
//! - [`encrypt`], the substitution applied to each executed cell

use crate::virtual_machine::ternary::Word;

/// Lowest printable raw value.
pub const PRINTABLE_MIN: Word = 33;
/// Highest printable raw value.
pub const PRINTABLE_MAX: Word = 126;
/// Number of printable raw values, and the period of the decode table.
const PRINTABLE_COUNT: Word = PRINTABLE_MAX - PRINTABLE_MIN + 1;

/// Decode table, indexed by `(raw - 33 + address) mod 94`.
pub(crate) const DECODE_TABLE: &[u8; 94] =
    br#"+b(29e*j1VMEKLyC})8&m#~W>qxdRp0wkrUo[D7,XTcA"lI.v%{gJh4G\-=O@5`_3i<?Z';FNQuY]szf$!BS/|t:Pn6^Ha"#;

/// Encryption permutation, indexed by `raw - 33`.
pub(crate) const ENCRYPT_TABLE: &[u8; 94] =
    br#"5z]&gqtyfr$(we4{WP)H-Zn,[%\3dL+Q;>U!pJS72FhOA1CB6v^=I_0/8|jsb9m<.TVac`uY*MK'X~xDl}REokN:#?G"i@"#;

/// Invokes a callback macro with the complete instruction definition list.
///
/// Each entry is `Name = codepoint, base`, where `codepoint` is the decode
/// table character naming the instruction and `base` is the raw value that
/// decodes to it at address 0.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            /// d = memory[d]
            MoveD = b'j', b'(',
            /// c = memory[d]
            Jump = b'i', b'b',
            /// a = memory[d] = rotate_right(memory[d])
            RotateRight = b'*', b'\'',
            /// a = memory[d] = combine(a, memory[d])
            Combine = b'p', b'>',
            /// write a as one byte
            Output = b'<', b'c',
            /// a = next input byte, or the EOF sentinel
            Input = b'/', b'u',
            /// stop the machine
            Exit = b'v', b'Q',
            /// no effect
            NoOp = b'o', b'D',
        }
    };
}

macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $codepoint:literal, $base:literal
        ),* $(,)?
    ) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #[repr(u8)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name = $codepoint,
            )*
        }

        impl Instruction {
            /// Every instruction, in definition order.
            pub const ALL: &'static [Instruction] = &[ $( Instruction::$name, )* ];

            /// Returns the decode table character naming this instruction.
            pub const fn codepoint(self) -> u8 {
                self as u8
            }

            /// Returns the instruction named by a decode table character.
            pub const fn from_codepoint(codepoint: u8) -> Option<Instruction> {
                match codepoint {
                    $( $codepoint => Some(Instruction::$name), )*
                    _ => None,
                }
            }

            /// Raw value that decodes to this instruction at address 0.
            const fn base(self) -> Word {
                match self {
                    $( Instruction::$name => $base as Word, )*
                }
            }
        }
    };
}

for_each_instruction!(define_instructions);

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codepoint() as char)
    }
}

/// Whether a raw value is a printable, non-space ASCII character.
pub const fn is_printable(value: Word) -> bool {
    PRINTABLE_MIN <= value && value <= PRINTABLE_MAX
}

/// Decodes the instruction stored at `address`.
///
/// Returns `None` if `value` is not printable. A printable value that names
/// no instruction decodes to [`Instruction::NoOp`] when `nop_fallback` is
/// set, and to `None` otherwise.
pub fn decode(address: Word, value: Word, nop_fallback: bool) -> Option<Instruction> {
    if !is_printable(value) {
        return None;
    }
    let index = (value - PRINTABLE_MIN) as usize + address as usize;
    match Instruction::from_codepoint(DECODE_TABLE[index % PRINTABLE_COUNT as usize]) {
        Some(instruction) => Some(instruction),
        None if nop_fallback => Some(Instruction::NoOp),
        None => None,
    }
}

/// Returns the printable raw value that decodes to `instruction` at `address`.
pub fn encode(address: Word, instruction: Instruction) -> Word {
    let shifted = (instruction.base() + PRINTABLE_COUNT - address % PRINTABLE_COUNT) % PRINTABLE_COUNT;
    if shifted < PRINTABLE_MIN {
        shifted + PRINTABLE_COUNT
    } else {
        shifted
    }
}

/// Encrypts a cell after it has been executed.
///
/// Returns `None` if `value` is not printable.
pub fn encrypt(value: Word) -> Option<Word> {
    if is_printable(value) {
        Some(ENCRYPT_TABLE[(value - PRINTABLE_MIN) as usize] as Word)
    } else {
        None
    }
}
