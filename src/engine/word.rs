//! Machine word types the engine can benchmark.

use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A plain machine word: every bit pattern is a valid value and its alignment
/// never exceeds a cache line, so it can be viewed directly inside an
/// [`AlignedBuffer`](crate::buffer::AlignedBuffer).
pub trait Word: Copy + Default + PartialEq + fmt::Debug + sealed::Sealed + 'static {
    const TYPE: WordType;

    /// Build a word from the low bits of an integer fill value.
    ///
    /// Integer words truncate to their width; float words convert from the
    /// unsigned integer of the same width.
    fn from_fill(bits: u64) -> Self;
}

macro_rules! impl_word {
    ($ty:ty, $tag:ident, |$bits:ident| $conv:expr) => {
        impl sealed::Sealed for $ty {}

        impl Word for $ty {
            const TYPE: WordType = WordType::$tag;

            #[inline]
            fn from_fill($bits: u64) -> Self {
                $conv
            }
        }
    };
}

impl_word!(u16, U16, |bits| bits as u16);
impl_word!(u32, U32, |bits| bits as u32);
impl_word!(u64, U64, |bits| bits);
impl_word!(f32, F32, |bits| bits as u32 as f32);
impl_word!(f64, F64, |bits| bits as f64);

/// Runtime tag of a [`Word`] type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum WordType {
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl WordType {
    pub const ALL: [WordType; 5] = [
        WordType::U16,
        WordType::U32,
        WordType::U64,
        WordType::F32,
        WordType::F64,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            WordType::U16 => "u16",
            WordType::U32 => "u32",
            WordType::U64 => "u64",
            WordType::F32 => "f32",
            WordType::F64 => "f64",
        }
    }

    /// Width in bytes.
    pub const fn size(self) -> usize {
        match self {
            WordType::U16 => 2,
            WordType::U32 | WordType::F32 => 4,
            WordType::U64 | WordType::F64 => 8,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, WordType::F32 | WordType::F64)
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
