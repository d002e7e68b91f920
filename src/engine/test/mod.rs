//! Properties of the pipelined and sequential algorithms.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::buffer::AlignedBuffer;
use crate::data::{fill_words, FillPattern};
use crate::engine::*;
use crate::error::BenchError;
use crate::measure::DurationMeasurer;

fn measurer() -> DurationMeasurer {
    let mut m = DurationMeasurer::with_calibration_samples(1024);
    m.calibrate();
    m
}

fn quick_config() -> EngineConfig {
    EngineConfig::default().with_samples(64).with_ops_budget(1 << 12)
}

fn filled<T: Word>(size: usize) -> (AlignedBuffer, AlignedBuffer) {
    let mut source = AlignedBuffer::new(size).unwrap();
    fill_words::<T>(&mut source, FillPattern::Uniform);
    let work = AlignedBuffer::new(size).unwrap();
    (source, work)
}

fn run<T: Word, O: ArithOp<T>>(
    mode: ExecutionMode,
    m: &DurationMeasurer,
    size: usize,
    config: &EngineConfig,
) -> OpCost {
    let (source, mut work) = filled::<T>(size);
    match mode {
        ExecutionMode::Pipelined => pipelined_measure::<T, O>(m, &source, &mut work, config),
        ExecutionMode::Sequential => sequential_measure::<T, O>(m, &source, &mut work, config),
    }
    .unwrap()
}

#[test]
fn test_valid_sizes_give_non_negative_costs() {
    let m = measurer();
    let config = quick_config();

    for size in [64, 128, 256, 1024, 4096] {
        for mode in ExecutionMode::ALL {
            let costs = [
                run::<u16, Add>(mode, &m, size, &config),
                run::<u32, Mul>(mode, &m, size, &config),
                run::<u64, Sub>(mode, &m, size, &config),
                run::<f32, Div>(mode, &m, size, &config),
                run::<f64, Add>(mode, &m, size, &config),
            ];
            for cost in costs {
                assert!(cost.cycles_per_op.is_finite());
                assert!(cost.cycles_per_op >= 0.0, "{:?} at {} bytes: {:?}", mode, size, cost);
            }
        }
    }
}

#[test]
fn test_end_to_end_pipelined_u32_add() {
    let m = measurer();
    let config = EngineConfig::default().with_samples(100);

    let cost = run::<u32, Add>(ExecutionMode::Pipelined, &m, 256, &config);

    assert_eq!(cost.ops_per_repeat, 256 / (4 * 4));
    assert_eq!(cost.repeats, EngineConfig::DEFAULT_OPS_BUDGET / 16);
    assert_eq!(cost.samples, 100);
    assert!(cost.cycles_per_op.is_finite());
    assert!(cost.cycles_per_op > 0.0);
    // Loose sanity bound; even a debug build stays far below this.
    assert!(cost.cycles_per_op < 10_000.0, "{:?}", cost);
    assert!(cost.frequency_mhz.unwrap_or(0.0) > 0.0);
}

#[test]
fn test_passthrough_not_slower_than_division() {
    let m = measurer();
    let config = EngineConfig::default().with_samples(200).with_ops_budget(1 << 13);

    for mode in ExecutionMode::ALL {
        let identity = run::<u64, Passthrough>(mode, &m, 1024, &config);
        let divide = run::<u64, Div>(mode, &m, 1024, &config);
        assert!(
            identity.cycles_per_op <= divide.cycles_per_op * 1.5 + 1.0,
            "{}: passthrough {:.3} vs div {:.3}",
            mode,
            identity.cycles_per_op,
            divide.cycles_per_op
        );
    }
}

static PIPELINED_CALLS: AtomicUsize = AtomicUsize::new(0);
static SEQUENTIAL_CALLS: AtomicUsize = AtomicUsize::new(0);

struct CountPipelined;
struct CountSequential;

impl ArithOp<u32> for CountPipelined {
    const OPERATION: Operation = Operation::Passthrough;
    fn apply(_a: u32, b: u32) -> u32 {
        PIPELINED_CALLS.fetch_add(1, Ordering::Relaxed);
        b
    }
}

impl ArithOp<u32> for CountSequential {
    const OPERATION: Operation = Operation::Passthrough;
    fn apply(_a: u32, b: u32) -> u32 {
        SEQUENTIAL_CALLS.fetch_add(1, Ordering::Relaxed);
        b
    }
}

#[test]
fn test_misaligned_size_fails_before_timing() {
    let m = DurationMeasurer::new();
    let config = quick_config();

    // 258 bytes: room for 16 pipelined packs of u32 plus a stray half word
    let (source, mut work) = filled::<u32>(258);
    let err =
        pipelined_measure::<u32, CountPipelined>(&m, &source, &mut work, &config).unwrap_err();
    assert!(matches!(err, BenchError::MisalignedBufferSize { size: 258, pack_bytes: 16 }));
    assert_eq!(PIPELINED_CALLS.load(Ordering::Relaxed), 0);

    let err =
        sequential_measure::<u32, CountSequential>(&m, &source, &mut work, &config).unwrap_err();
    assert!(matches!(err, BenchError::MisalignedBufferSize { size: 258, pack_bytes: 4 }));
    assert_eq!(SEQUENTIAL_CALLS.load(Ordering::Relaxed), 0);
}

#[test]
fn test_zero_samples_is_rejected() {
    let m = DurationMeasurer::new();
    let config = EngineConfig::default().with_samples(0);
    let (source, mut work) = filled::<u64>(256);

    assert!(matches!(
        pipelined_measure::<u64, Div>(&m, &source, &mut work, &config),
        Err(BenchError::InvalidConfig { .. })
    ));
    assert!(matches!(
        sequential_measure::<u64, Div>(&m, &source, &mut work, &config),
        Err(BenchError::InvalidConfig { .. })
    ));

    let mut ctx = BenchContext::new(m, config);
    assert!(matches!(
        ctx.run::<u32, Add>(ExecutionMode::Pipelined, 256),
        Err(BenchError::InvalidConfig { .. })
    ));
    assert!(ctx.source().is_empty());
    assert!(EngineConfig::default().with_samples(1).validate().is_ok());
}

#[test]
fn test_mismatched_buffers_are_invalid() {
    let m = DurationMeasurer::new();
    let config = quick_config();
    let source = AlignedBuffer::new(256).unwrap();
    let mut work = AlignedBuffer::new(512).unwrap();

    assert!(matches!(
        pipelined_measure::<u32, Add>(&m, &source, &mut work, &config),
        Err(BenchError::InvalidBufferSize { .. })
    ));
    assert!(matches!(
        sequential_measure::<f64, Mul>(&m, &source, &mut work, &config),
        Err(BenchError::InvalidBufferSize { .. })
    ));
}

#[test]
fn test_source_is_never_written() {
    let m = measurer();
    let config = quick_config();
    let (source, mut work) = filled::<u32>(512);
    let snapshot = source.as_bytes().to_vec();

    pipelined_measure::<u32, Mul>(&m, &source, &mut work, &config).unwrap();
    assert_eq!(source.as_bytes(), snapshot.as_slice());

    sequential_measure::<u32, Add>(&m, &source, &mut work, &config).unwrap();
    assert_eq!(source.as_bytes(), snapshot.as_slice());
}

#[test]
fn test_pipelined_fills_result_slots() {
    let m = DurationMeasurer::new();
    let config = quick_config().with_samples(1);
    let (source, mut work) = filled::<u64>(256);

    pipelined_measure::<u64, Mul>(&m, &source, &mut work, &config).unwrap();

    let src = source.words::<u64>();
    let out = work.words::<u64>();
    for pack in 0..out.len() / 4 {
        let base = pack * 4;
        assert_eq!(out[base], src[base]);
        assert_eq!(out[base + 1], src[base + 1]);
        assert_eq!(out[base + 2], src[base].wrapping_mul(src[base + 1]));
        assert_eq!(out[base + 3], src[base + 3]);
    }
}

#[test]
fn test_sequential_writes_chain_result_to_tail() {
    let m = DurationMeasurer::new();
    let config = quick_config().with_samples(1);
    let (source, mut work) = filled::<u32>(128);

    let cost = sequential_measure::<u32, Add>(&m, &source, &mut work, &config).unwrap();

    let src = source.words::<u32>();
    let n = src.len();
    assert_eq!(cost.ops_per_repeat, n - 2);

    let mut acc = src[0];
    for _ in 0..cost.repeats {
        for &x in &src[1..n - 1] {
            acc = acc.wrapping_add(x);
        }
    }
    let out = work.words::<u32>();
    assert_eq!(out[n - 1], acc);
    assert_eq!(&out[..n - 1], &src[..n - 1]);
}

#[test]
fn test_integer_division_chain_reaches_zero() {
    let m = DurationMeasurer::new();
    let config = quick_config().with_samples(1);
    let (source, mut work) = filled::<u32>(64);

    sequential_measure::<u32, Div>(&m, &source, &mut work, &config).unwrap();

    // 16487 / 16488 == 0, so every later step times 0 / x. Some cores
    // retire a zero dividend early, which lowers the reported latency.
    let out = work.words::<u32>();
    assert_eq!(out[0] / out[1], 0);
    assert_eq!(out[out.len() - 1], 0);
}

#[test]
fn test_context_reuses_buffers_for_same_size() {
    let mut ctx = BenchContext::new(DurationMeasurer::new(), quick_config().with_samples(4));

    ctx.run::<u32, Add>(ExecutionMode::Pipelined, 256).unwrap();
    let first = ctx.source().as_bytes().as_ptr();

    ctx.run::<f64, Div>(ExecutionMode::Sequential, 256).unwrap();
    assert_eq!(ctx.source().as_bytes().as_ptr(), first);
    assert_eq!(ctx.source().words::<f64>()[0], 16_487.0);

    ctx.run::<u16, Sub>(ExecutionMode::Pipelined, 1024).unwrap();
    assert_eq!(ctx.source().len(), 1024);
}

#[test]
fn test_context_rejects_bad_size_without_reallocating() {
    let mut ctx = BenchContext::new(DurationMeasurer::new(), quick_config().with_samples(4));
    ctx.run::<u32, Add>(ExecutionMode::Pipelined, 256).unwrap();

    let err = ctx.run::<u64, Add>(ExecutionMode::Pipelined, 40).unwrap_err();
    assert!(matches!(err, BenchError::MisalignedBufferSize { .. }));
    assert_eq!(ctx.source().len(), 256);
}
