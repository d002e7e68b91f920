//! Source data for the benchmark buffers.
//!
//! Word `i` of a buffer holds `i + offset` in the integer of the word's width
//! (487 for 16-bit words, 16487 otherwise). Float buffers hold the same values
//! converted from the unsigned integer of equal width.
//!
//! [`FillPattern::Alternating`] additionally gives every fourth word
//! `2^k - i + 7` (k = 12, 20, 42 by width). Older runs never produced that
//! variant because the index test always evaluated to false, so
//! [`FillPattern::Uniform`] stays the default to keep results comparable.

use crate::buffer::AlignedBuffer;
use crate::engine::{Word, WordType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FillPattern {
    /// `i + offset` everywhere.
    #[default]
    Uniform,
    /// Every fourth word counts down from a large base instead.
    Alternating,
}

struct FillConstants {
    offset: u64,
    alternate_base: u64,
    bits: u32,
}

fn constants(word: WordType) -> FillConstants {
    match word {
        WordType::U16 => FillConstants {
            offset: 487,
            alternate_base: 1 << 12,
            bits: 16,
        },
        WordType::U32 | WordType::F32 => FillConstants {
            offset: 16_487,
            alternate_base: 1 << 20,
            bits: 32,
        },
        WordType::U64 | WordType::F64 => FillConstants {
            offset: 16_487,
            alternate_base: 1 << 42,
            bits: 64,
        },
    }
}

/// Integer fill value of word `index`, truncated to the word width and never zero.
pub fn fill_value(word: WordType, index: usize, pattern: FillPattern) -> u64 {
    let c = constants(word);
    let i = index as u64;

    let raw = if pattern == FillPattern::Alternating && i % 4 == 0 {
        c.alternate_base.wrapping_sub(i).wrapping_add(7)
    } else {
        i.wrapping_add(c.offset)
    };

    let mask = if c.bits == 64 {
        u64::MAX
    } else {
        (1u64 << c.bits) - 1
    };
    // Zero would be a divisor in the division benchmarks.
    match raw & mask {
        0 => 1,
        v => v,
    }
}

/// Fill every whole word of `buffer` with the pattern for `T`.
pub fn fill_words<T: Word>(buffer: &mut AlignedBuffer, pattern: FillPattern) {
    for (i, word) in buffer.words_mut::<T>().iter_mut().enumerate() {
        *word = T::from_fill(fill_value(T::TYPE, i, pattern));
    }
}
