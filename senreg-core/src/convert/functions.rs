//! Functions callable from conversion formulas
//!
//! Formulas are persisted, so this table only ever grows: a function may be
//! added, never renamed or removed. Math goes through `libm` like the rest of
//! the numeric code.

use core::fmt;

use crate::datatype::DataType;
use crate::errors::{ConversionError, ConversionResult};

/// A registered formula function
pub(crate) struct Function {
    pub name: &'static str,
    pub arity: usize,
    body: fn(&[f64]) -> f64,
}

impl Function {
    /// Check the argument count before any argument is evaluated
    pub(crate) fn check_arity(&self, actual: usize) -> ConversionResult<()> {
        if actual != self.arity {
            return Err(ConversionError::WrongParamCount {
                function: self.name,
                expected: self.arity,
                actual,
            });
        }
        Ok(())
    }

    /// Error for an argument that did not evaluate to a number
    pub(crate) fn wrong_type(&self, actual: DataType) -> ConversionError {
        ConversionError::WrongParamType {
            function: self.name,
            actual,
        }
    }

    pub(crate) fn apply(&self, args: &[f64]) -> f64 {
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

static FUNCTIONS: [Function; 2] = [
    Function {
        name: "log10",
        arity: 1,
        body: log10,
    },
    Function {
        name: "abs",
        arity: 1,
        body: abs,
    },
];

fn log10(args: &[f64]) -> f64 {
    libm::log10(args[0])
}

fn abs(args: &[f64]) -> f64 {
    libm::fabs(args[0])
}

/// Find a function by name
pub(crate) fn lookup(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Names of every function a formula may call
pub fn function_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|f| f.name)
}

/// Comma-separated function names for diagnostics
pub(crate) fn function_list() -> String {
    function_names().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_functions() {
        assert_eq!(function_names().collect::<Vec<_>>(), vec!["log10", "abs"]);
        assert_eq!(function_list(), "log10, abs");
        assert!(lookup("sqrt").is_none());
        assert!(lookup("Log10").is_none());
    }

    #[test]
    fn applies_math() {
        let log10 = lookup("log10").unwrap();
        assert!((log10.apply(&[1000.0]) - 3.0).abs() < 1e-12);
        assert!(log10.apply(&[0.0]).is_infinite());

        let abs = lookup("abs").unwrap();
        assert_eq!(abs.apply(&[-2.5]), 2.5);
    }

    #[test]
    fn arity_checked() {
        let abs = lookup("abs").unwrap();
        assert!(abs.check_arity(1).is_ok());
        assert_eq!(
            abs.check_arity(2),
            Err(ConversionError::WrongParamCount {
                function: "abs",
                expected: 1,
                actual: 2
            })
        );
    }
}
