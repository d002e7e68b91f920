//! Throughput: many independent operations in flight at once.

use std::hint::black_box;
use std::ptr;

use crate::buffer::AlignedBuffer;
use crate::error::Result;
use crate::measure::{DurationMeasurer, DurationSum};

use super::layout::{repeat_count, PIPELINED};
use super::{ArithOp, EngineConfig, OpCost, Word};

/// Average cycles per operation when packs `[a, b, result, padding]` are
/// computed back to back with no dependency between them.
///
/// `work` is refreshed from `source` before every sample; `source` is only read.
pub fn pipelined_measure<T: Word, O: ArithOp<T>>(
    measurer: &DurationMeasurer,
    source: &AlignedBuffer,
    work: &mut AlignedBuffer,
    config: &EngineConfig,
) -> Result<OpCost> {
    config.validate()?;
    let packs = PIPELINED.validate::<T>(source.len(), work.len())?;
    let repeats = repeat_count(packs, config.ops_budget);

    let mut sum = DurationSum::new();
    for _ in 0..config.samples {
        work.copy_from(source);
        let words = black_box(work.words_mut::<T>().as_mut_ptr());

        // SAFETY: validation guarantees `packs * 4` words behind `words`,
        // and `work` is not touched again until the next copy.
        black_box(measurer.measure(|| unsafe { run_packs::<T, O>(words, packs, repeats) }, true));
        sum.push(measurer.measure(|| unsafe { run_packs::<T, O>(words, packs, repeats) }, true));
    }

    Ok(OpCost::new(sum.mean(), packs, repeats, config.samples))
}

/// # Safety
/// `words` must be valid for reads and writes of `packs * 4` elements.
#[inline(never)]
unsafe fn run_packs<T: Word, O: ArithOp<T>>(words: *mut T, packs: usize, repeats: usize) {
    for _ in 0..repeats {
        let mut pack = words;
        for _ in 0..packs {
            let a = ptr::read_volatile(pack);
            let b = ptr::read_volatile(pack.add(1));
            ptr::write_volatile(pack.add(2), O::apply(a, b));
            pack = pack.add(PIPELINED.words_per_pack);
        }
    }
}
