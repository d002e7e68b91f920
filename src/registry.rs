//! Registry of benchmark cases.
//!
//! A case is one (operation, word type) pair. Cases are stored as trait objects
//! so the driver can iterate, filter and shuffle them, but each one dispatches
//! once into a fully monomorphized engine call: nothing dynamic runs inside the
//! timed region.

use std::marker::PhantomData;

use crate::engine::{
    Add, ArithOp, BenchContext, Div, ExecutionMode, Mul, OpCost, Operation, Sub, Word, WordType,
};
use crate::error::Result;

/// Something the runner can measure at a given buffer size and execution mode.
pub trait BenchmarkCase {
    fn operation(&self) -> Operation;

    fn word_type(&self) -> WordType;

    /// Display name, e.g. `add u32`.
    fn name(&self) -> String {
        format!("{} {}", self.operation(), self.word_type())
    }

    fn run(&self, ctx: &mut BenchContext, mode: ExecutionMode, size: usize) -> Result<OpCost>;
}

/// Case backed by the concrete types `T` and `O`.
pub struct Case<T, O>(PhantomData<fn() -> (T, O)>);

impl<T, O> Case<T, O> {
    /// Create the case for `T` and `O`
    pub fn new() -> Self {
        Case(PhantomData)
    }
}

impl<T, O> Default for Case<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Word, O: ArithOp<T>> BenchmarkCase for Case<T, O> {
    fn operation(&self) -> Operation {
        O::OPERATION
    }

    fn word_type(&self) -> WordType {
        T::TYPE
    }

    fn run(&self, ctx: &mut BenchContext, mode: ExecutionMode, size: usize) -> Result<OpCost> {
        ctx.run::<T, O>(mode, size)
    }
}

/// All cases a run can choose from.
pub struct CaseRegistry {
    cases: Vec<Box<dyn BenchmarkCase>>,
}

impl CaseRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Register the case for word `T` and operation `O`
    pub fn register<T: Word, O: ArithOp<T>>(&mut self) {
        self.cases.push(Box::new(Case::<T, O>::new()));
    }

    /// Get all registered cases
    pub fn all(&self) -> &[Box<dyn BenchmarkCase>] {
        &self.cases
    }

    /// Find the case for one operation and word type
    pub fn find(&self, operation: Operation, word: WordType) -> Option<&dyn BenchmarkCase> {
        self.cases
            .iter()
            .find(|c| c.operation() == operation && c.word_type() == word)
            .map(|c| c.as_ref())
    }

    /// Cases whose operation and word type both appear in the filters.
    /// An empty filter matches everything.
    pub fn select(&self, operations: &[Operation], words: &[WordType]) -> Vec<&dyn BenchmarkCase> {
        self.cases
            .iter()
            .filter(|c| operations.is_empty() || operations.contains(&c.operation()))
            .filter(|c| words.is_empty() || words.contains(&c.word_type()))
            .map(|c| c.as_ref())
            .collect()
    }

    /// Number of registered cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether no case is registered
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl Default for CaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! register_word {
    ($registry:expr, $($ty:ty),*) => {$(
        $registry.register::<$ty, Add>();
        $registry.register::<$ty, Sub>();
        $registry.register::<$ty, Mul>();
        $registry.register::<$ty, Div>();
    )*};
}

/// Every arithmetic operation on every word type.
pub fn build_registry() -> CaseRegistry {
    let mut registry = CaseRegistry::new();
    register_word!(registry, u16, u32, u64, f32, f64);
    registry
}
