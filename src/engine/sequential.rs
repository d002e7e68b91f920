//! Latency: every operation waits for the previous result.

use std::hint::black_box;
use std::ptr;

use crate::buffer::AlignedBuffer;
use crate::error::Result;
use crate::measure::{DurationMeasurer, DurationSum};

use super::layout::{repeat_count, SEQUENTIAL};
use super::{ArithOp, EngineConfig, OpCost, Word};

/// Average cycles per operation along the chain `acc = op(acc, next)` over
/// `[first, x1, ..., xn, result]`.
///
/// The accumulator carries over from one repeat to the next, so no two timed
/// operations of a pass can overlap. The final value lands in the last word.
pub fn sequential_measure<T: Word, O: ArithOp<T>>(
    measurer: &DurationMeasurer,
    source: &AlignedBuffer,
    work: &mut AlignedBuffer,
    config: &EngineConfig,
) -> Result<OpCost> {
    config.validate()?;
    let chained = SEQUENTIAL.validate::<T>(source.len(), work.len())?;
    let repeats = repeat_count(chained, config.ops_budget);

    let mut sum = DurationSum::new();
    for _ in 0..config.samples {
        work.copy_from(source);
        let words = black_box(work.words_mut::<T>().as_mut_ptr());

        // SAFETY: validation guarantees `chained + 2` words behind `words`,
        // and `work` is not touched again until the next copy.
        black_box(measurer.measure(|| unsafe { run_chain::<T, O>(words, chained, repeats) }, true));
        sum.push(measurer.measure(|| unsafe { run_chain::<T, O>(words, chained, repeats) }, true));
    }

    Ok(OpCost::new(sum.mean(), chained, repeats, config.samples))
}

/// # Safety
/// `words` must be valid for reads and writes of `chained + 2` elements.
#[inline(never)]
unsafe fn run_chain<T: Word, O: ArithOp<T>>(words: *mut T, chained: usize, repeats: usize) {
    let tail = words.add(chained + 1);
    let mut acc = ptr::read_volatile(words);
    for _ in 0..repeats {
        let mut next = words.add(1);
        for _ in 0..chained {
            acc = O::apply(acc, ptr::read_volatile(next));
            next = next.add(1);
        }
        ptr::write_volatile(tail, acc);
    }
}
