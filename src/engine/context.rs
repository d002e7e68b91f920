//! Long-lived owner of the measurer and the source/working buffer pair.

use tracing::debug;

use crate::buffer::AlignedBuffer;
use crate::data::{fill_words, FillPattern};
use crate::error::Result;
use crate::measure::{Duration, DurationMeasurer};

use super::{
    pipelined_measure, sequential_measure, ArithOp, EngineConfig, ExecutionMode, OpCost, Word,
};

/// Everything a benchmark run needs between invocations.
///
/// Buffers are reallocated only when the requested size changes, so a sweep
/// over word types and operations at one size performs no allocation.
pub struct BenchContext {
    measurer: DurationMeasurer,
    config: EngineConfig,
    pattern: FillPattern,
    source: AlignedBuffer,
    work: AlignedBuffer,
}

impl BenchContext {
    pub fn new(measurer: DurationMeasurer, config: EngineConfig) -> Self {
        Self {
            measurer,
            config,
            pattern: FillPattern::default(),
            source: AlignedBuffer::default(),
            work: AlignedBuffer::default(),
        }
    }

    pub fn with_fill_pattern(mut self, pattern: FillPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn calibrate(&mut self) -> Duration {
        self.measurer.calibrate()
    }

    pub fn measurer(&self) -> &DurationMeasurer {
        &self.measurer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current source buffer, as filled by the last run.
    pub fn source(&self) -> &AlignedBuffer {
        &self.source
    }

    /// Size both buffers to `size` bytes and refill the source with words of `T`.
    pub fn prepare<T: Word>(&mut self, size: usize) -> Result<()> {
        if self.source.len() != size || self.work.len() != size {
            debug!(size, "allocating benchmark buffers");
            // Release the old pair first so peak memory stays at one pair.
            // On failure both stay empty.
            self.source = AlignedBuffer::default();
            self.work = AlignedBuffer::default();
            let source = AlignedBuffer::new(size)?;
            let work = AlignedBuffer::new(size)?;
            self.source = source;
            self.work = work;
        }
        fill_words::<T>(&mut self.source, self.pattern);
        Ok(())
    }

    /// Measure `O` on words of `T` over a `size`-byte buffer.
    pub fn run<T: Word, O: ArithOp<T>>(
        &mut self,
        mode: ExecutionMode,
        size: usize,
    ) -> Result<OpCost> {
        // Reject bad parameters before touching the buffers.
        self.config.validate()?;
        mode.layout().validate::<T>(size, size)?;
        self.prepare::<T>(size)?;

        let (measurer, source, work, config) =
            (&self.measurer, &self.source, &mut self.work, &self.config);
        match mode {
            ExecutionMode::Pipelined => pipelined_measure::<T, O>(measurer, source, work, config),
            ExecutionMode::Sequential => sequential_measure::<T, O>(measurer, source, work, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Add;
    use crate::error::BenchError;

    fn context() -> BenchContext {
        BenchContext::new(
            DurationMeasurer::new(),
            EngineConfig::default().with_samples(2).with_ops_budget(64),
        )
    }

    #[test]
    fn test_prepare_restores_a_missing_working_buffer() {
        let mut ctx = context();
        ctx.run::<u32, Add>(ExecutionMode::Pipelined, 256).unwrap();

        // State left behind when only the source allocation succeeded.
        ctx.work = AlignedBuffer::default();

        ctx.run::<u32, Add>(ExecutionMode::Pipelined, 256).unwrap();
        assert_eq!(ctx.source.len(), 256);
        assert_eq!(ctx.work.len(), 256);
    }

    #[test]
    fn test_failed_allocation_leaves_both_buffers_empty() {
        let mut ctx = context();
        ctx.run::<u64, Add>(ExecutionMode::Pipelined, 256).unwrap();

        // A whole number of 32-byte packs that no allocator can satisfy.
        let huge = usize::MAX - 31;
        for _ in 0..2 {
            let err = ctx.run::<u64, Add>(ExecutionMode::Pipelined, huge).unwrap_err();
            assert!(matches!(err, BenchError::OutOfMemory { .. }), "{}", err);
            assert!(ctx.source.is_empty());
            assert!(ctx.work.is_empty());
        }

        ctx.run::<u64, Add>(ExecutionMode::Pipelined, 256).unwrap();
    }
}
