//! Pack layouts and buffer validation shared by both algorithms.

use std::fmt;

use crate::error::{BenchError, Result};

use super::word::Word;

/// How a buffer is divided into units of benchmarked work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackLayout {
    /// Words consumed per inner-loop iteration.
    pub words_per_pack: usize,
    /// Words that hold no operation of their own (chain head and tail).
    pub reserved_words: usize,
}

/// `[a, b, result, padding]`, one independent operation per pack.
pub const PIPELINED: PackLayout = PackLayout {
    words_per_pack: 4,
    reserved_words: 0,
};

/// `[first, x1, x2, ..., result]`, one chained operation per word between head and tail.
pub const SEQUENTIAL: PackLayout = PackLayout {
    words_per_pack: 1,
    reserved_words: 2,
};

impl PackLayout {
    pub fn pack_bytes<T: Word>(&self) -> usize {
        self.words_per_pack * std::mem::size_of::<T>()
    }

    /// Smallest buffer that yields at least one operation.
    pub fn min_bytes<T: Word>(&self) -> usize {
        (self.reserved_words + self.words_per_pack) * std::mem::size_of::<T>()
    }

    /// Check a source/working buffer pair and return the operations one pass performs.
    ///
    /// Runs before any timing so a malformed configuration never produces a result.
    pub fn validate<T: Word>(&self, source_len: usize, work_len: usize) -> Result<usize> {
        let invalid = |reason| BenchError::InvalidBufferSize {
            source_len,
            work_len,
            reason,
        };

        if source_len != work_len {
            return Err(invalid("source and working buffers differ in size"));
        }
        if source_len < self.min_bytes::<T>() {
            return Err(invalid("buffer cannot hold a single pack"));
        }

        let pack_bytes = self.pack_bytes::<T>();
        if source_len % pack_bytes != 0 {
            return Err(BenchError::MisalignedBufferSize {
                size: source_len,
                pack_bytes,
            });
        }

        let words = source_len / std::mem::size_of::<T>();
        Ok((words - self.reserved_words) / self.words_per_pack)
    }
}

/// Outer repeats for one timed pass: about `ops_budget` operations in total, never zero.
pub fn repeat_count(ops_per_repeat: usize, ops_budget: usize) -> usize {
    (ops_budget / ops_per_repeat.max(1)).max(1)
}

/// Throughput (independent packs) or latency (dependency chain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum ExecutionMode {
    Pipelined,
    Sequential,
}

impl ExecutionMode {
    pub const ALL: [ExecutionMode; 2] = [ExecutionMode::Pipelined, ExecutionMode::Sequential];

    pub const fn layout(self) -> PackLayout {
        match self {
            ExecutionMode::Pipelined => PIPELINED,
            ExecutionMode::Sequential => SEQUENTIAL,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ExecutionMode::Pipelined => "Pipelined",
            ExecutionMode::Sequential => "Sequential",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
