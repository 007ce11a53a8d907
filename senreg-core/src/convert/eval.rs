//! Tree-walking evaluator
//!
//! All arithmetic is `f64`. A non-numeric input is carried through untouched
//! as long as nothing does arithmetic on it, which is what makes the
//! identity formula work for strings, bytes and booleans.

use crate::errors::{ConversionError, ConversionResult};
use crate::value::Value;

use super::parser::Expr;

/// Intermediate result: a number, or the input itself if it is not numeric
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Operand<'a> {
    Number(f64),
    Passthrough(&'a Value),
}

impl Operand<'_> {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Operand::Number(n) => Value::F64(n),
            Operand::Passthrough(value) => value.clone(),
        }
    }

    fn number(self, operator: char) -> ConversionResult<f64> {
        match self {
            Operand::Number(n) => Ok(n),
            Operand::Passthrough(value) => Err(ConversionError::InvalidOperand {
                operator,
                actual: value.data_type(),
            }),
        }
    }
}

impl Expr {
    /// Evaluate with `v` bound to `input`. The caller has already checked
    /// the input type.
    pub(crate) fn eval<'a>(&self, input: &'a Value) -> ConversionResult<Operand<'a>> {
        match self {
            Expr::Literal(n) => Ok(Operand::Number(*n)),
            Expr::Variable => Ok(input
                .as_f64()
                .map_or(Operand::Passthrough(input), Operand::Number)),
            Expr::Negate(operand) => {
                let n = operand.eval(input)?.number('-')?;
                Ok(Operand::Number(-n))
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval(input)?.number(op.symbol())?;
                let rhs = rhs.eval(input)?.number(op.symbol())?;
                Ok(Operand::Number(op.apply(lhs, rhs)))
            }
            Expr::Call { function, args } => {
                function.check_arity(args.len())?;
                let mut numbers = Vec::with_capacity(args.len());
                for arg in args {
                    match arg.eval(input)? {
                        Operand::Number(n) => numbers.push(n),
                        Operand::Passthrough(value) => {
                            return Err(function.wrong_type(value.data_type()))
                        }
                    }
                }
                Ok(Operand::Number(function.apply(&numbers)))
            }
        }
    }
}
