//! Ternary word arithmetic.
//!
//! A machine word is an unsigned 10-trit integer. Both operations here treat
//! it trit by trit, least significant trit first.

/// One machine word: 10 trits, always in `[0, WORD_SIZE)`.
pub type Word = u16;

/// Number of trits in a word.
pub const TRITS: u32 = 10;

/// Number of distinct words (3^10). Also the number of memory cells.
pub const WORD_SIZE: Word = 59049;

/// Value loaded into `a` by an input instruction at end of stream.
pub const EOF_SENTINEL: Word = WORD_SIZE - 1;

/// Lookup table of the combine operation, indexed `[trit of t2][trit of t1]`.
const COMBINE_TABLE: [[u32; 3]; 3] = [
    [1, 0, 0],
    [1, 0, 2],
    [2, 2, 1],
];

/// Rotates a word one trit to the right.
///
/// The least significant trit becomes the most significant one.
pub const fn rotate_right(t: Word) -> Word {
    t / 3 + t % 3 * (WORD_SIZE / 3)
}

/// The machine's combine ("crazy") operation.
pub fn combine(t1: Word, t2: Word) -> Word {
    let (mut t1, mut t2) = (t1 as u32, t2 as u32);
    let mut weight = 1u32;
    let mut result = 0u32;
    for _ in 0..TRITS {
        result += COMBINE_TABLE[(t2 % 3) as usize][(t1 % 3) as usize] * weight;
        t1 /= 3;
        t2 /= 3;
        weight *= 3;
    }
    result as Word
}
