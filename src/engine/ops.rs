//! Arithmetic operations under test.
//!
//! Each operation is a zero-sized type so the timed loop is monomorphized per
//! (word, operation) pair and contains no indirect call.

use std::fmt;

use super::word::Word;

/// A binary operation `op(a, b) -> T` on one word type.
pub trait ArithOp<T: Word>: 'static {
    const OPERATION: Operation;

    fn apply(a: T, b: T) -> T;
}

pub struct Add;
pub struct Sub;
pub struct Mul;
pub struct Div;

/// `op(a, b) = b`. Carries no arithmetic; used as a floor when comparing costs.
pub struct Passthrough;

macro_rules! int_ops {
    ($($ty:ty),*) => {$(
        impl ArithOp<$ty> for Add {
            const OPERATION: Operation = Operation::Add;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a.wrapping_add(b) }
        }
        impl ArithOp<$ty> for Sub {
            const OPERATION: Operation = Operation::Subtract;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a.wrapping_sub(b) }
        }
        impl ArithOp<$ty> for Mul {
            const OPERATION: Operation = Operation::Multiply;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a.wrapping_mul(b) }
        }
        // Divisors come from generated data, which never contains zero.
        impl ArithOp<$ty> for Div {
            const OPERATION: Operation = Operation::Divide;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a / b }
        }
    )*};
}

macro_rules! float_ops {
    ($($ty:ty),*) => {$(
        impl ArithOp<$ty> for Add {
            const OPERATION: Operation = Operation::Add;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a + b }
        }
        impl ArithOp<$ty> for Sub {
            const OPERATION: Operation = Operation::Subtract;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a - b }
        }
        impl ArithOp<$ty> for Mul {
            const OPERATION: Operation = Operation::Multiply;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a * b }
        }
        impl ArithOp<$ty> for Div {
            const OPERATION: Operation = Operation::Divide;
            #[inline(always)]
            fn apply(a: $ty, b: $ty) -> $ty { a / b }
        }
    )*};
}

int_ops!(u16, u32, u64);
float_ops!(f32, f64);

impl<T: Word> ArithOp<T> for Passthrough {
    const OPERATION: Operation = Operation::Passthrough;

    #[inline(always)]
    fn apply(_a: T, b: T) -> T {
        b
    }
}

/// Runtime tag of an [`ArithOp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Operation {
    Add,
    #[value(alias = "sub")]
    Subtract,
    #[value(alias = "mul")]
    Multiply,
    #[value(alias = "div")]
    Divide,
    #[value(skip)]
    Passthrough,
}

impl Operation {
    /// Operations reported by a full run.
    pub const ARITHMETIC: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "sub",
            Operation::Multiply => "mul",
            Operation::Divide => "div",
            Operation::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ops_wrap() {
        assert_eq!(<Add as ArithOp<u16>>::apply(u16::MAX, 2), 1);
        assert_eq!(<Sub as ArithOp<u32>>::apply(0, 1), u32::MAX);
        assert_eq!(<Mul as ArithOp<u64>>::apply(1 << 63, 2), 0);
        assert_eq!(<Div as ArithOp<u32>>::apply(100, 7), 14);
    }

    #[test]
    fn test_float_ops() {
        assert_eq!(<Add as ArithOp<f32>>::apply(1.5, 2.0), 3.5);
        assert_eq!(<Sub as ArithOp<f64>>::apply(1.5, 2.0), -0.5);
        assert_eq!(<Mul as ArithOp<f64>>::apply(1.5, 2.0), 3.0);
        assert_eq!(<Div as ArithOp<f32>>::apply(3.0, 2.0), 1.5);
    }

    #[test]
    fn test_passthrough_returns_second_operand() {
        assert_eq!(<Passthrough as ArithOp<u64>>::apply(3, 9), 9);
        assert_eq!(<Passthrough as ArithOp<f32>>::apply(3.0, -1.0), -1.0);
    }

    #[test]
    fn test_operation_tags() {
        assert_eq!(<Div as ArithOp<u16>>::OPERATION, Operation::Divide);
        assert_eq!(<Passthrough as ArithOp<f64>>::OPERATION.name(), "passthrough");
        assert_eq!(Operation::ARITHMETIC.len(), 4);
    }
}
