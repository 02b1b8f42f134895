//! Binary arithmetic operations.
//!
//! [`BuiltinOperation`] covers the ten operations shipped with the calculator.
//! [`FnOperation`] adapts a plain function so new operators can be registered
//! without touching the builtin set.

use crate::error::{CalcError, Result};

/// A stateless binary numeric operation.
pub trait Operation {
    /// Applies the operation to `a` and `b`.
    fn execute(&self, a: f64, b: f64) -> Result<f64>;

    /// Short display symbol (e.g. `+`).
    fn symbol(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// One-line usage description.
    fn description(&self) -> &str {
        ""
    }
}

/// The builtin operation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntegerDivide,
    Percentage,
    AbsoluteDifference,
}

impl BuiltinOperation {
    /// Every builtin, in help-listing order.
    pub const ALL: [BuiltinOperation; 10] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
        Self::Root,
        Self::Modulus,
        Self::IntegerDivide,
        Self::Percentage,
        Self::AbsoluteDifference,
    ];

    /// Registry token for this operation.
    pub fn token(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Root => "root",
            Self::Modulus => "modulus",
            Self::IntegerDivide => "int_divide",
            Self::Percentage => "percent",
            Self::AbsoluteDifference => "abs_diff",
        }
    }

    fn compute(self, a: f64, b: f64) -> Result<f64> {
        let name = self.token();
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide => {
                require_nonzero(name, b, "cannot divide by zero")?;
                Ok(a / b)
            }
            Self::Power => Ok(a.powf(b)),
            Self::Root => nth_root(a, b),
            Self::Modulus => {
                require_nonzero(name, b, "cannot calculate modulus with zero divisor")?;
                Ok(floored_rem(a, b))
            }
            Self::IntegerDivide => {
                require_nonzero(name, b, "cannot divide by zero")?;
                Ok((a / b).floor())
            }
            Self::Percentage => {
                require_nonzero(name, b, "cannot calculate percentage with zero base")?;
                Ok(a / b * 100.0)
            }
            Self::AbsoluteDifference => Ok((a - b).abs()),
        }
    }
}

impl Operation for BuiltinOperation {
    fn execute(&self, a: f64, b: f64) -> Result<f64> {
        let value = self.compute(a, b)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::domain(
                self.token(),
                format!("result of {a} {} {b} is not a finite number", self.symbol()),
            ))
        }
    }

    fn symbol(&self) -> &str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::Root => "√",
            Self::Modulus => "%",
            Self::IntegerDivide => "//",
            Self::Percentage => "%%",
            Self::AbsoluteDifference => "|a-b|",
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Add => "Addition",
            Self::Subtract => "Subtraction",
            Self::Multiply => "Multiplication",
            Self::Divide => "Division",
            Self::Power => "Power",
            Self::Root => "Root",
            Self::Modulus => "Modulus",
            Self::IntegerDivide => "Integer Division",
            Self::Percentage => "Percentage",
            Self::AbsoluteDifference => "Absolute Difference",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::Add => "Add two numbers",
            Self::Subtract => "Subtract b from a",
            Self::Multiply => "Multiply two numbers",
            Self::Divide => "Divide a by b",
            Self::Power => "Raise a to the power of b",
            Self::Root => "Calculate the bth root of a",
            Self::Modulus => "Calculate a modulo b",
            Self::IntegerDivide => "Integer division of a by b",
            Self::Percentage => "Calculate a as a percentage of b",
            Self::AbsoluteDifference => "Absolute difference between a and b",
        }
    }
}

fn require_nonzero(operation: &str, value: f64, reason: &str) -> Result<()> {
    if value == 0.0 {
        Err(CalcError::domain(operation, reason))
    } else {
        Ok(())
    }
}

/// Remainder with the sign of the divisor.
fn floored_rem(a: f64, b: f64) -> f64 {
    let rem = a % b;
    if rem != 0.0 && (rem < 0.0) != (b < 0.0) {
        rem + b
    } else {
        rem
    }
}

fn nth_root(a: f64, index: f64) -> Result<f64> {
    const NAME: &str = "root";
    if index == 0.0 {
        return Err(CalcError::domain(NAME, "cannot calculate root with zero index"));
    }
    if index < 0.0 {
        return Err(CalcError::domain(NAME, "cannot calculate root with negative index"));
    }
    if a >= 0.0 {
        return Ok(a.powf(index.recip()));
    }
    if index.fract() != 0.0 {
        return Err(CalcError::domain(
            NAME,
            "cannot calculate fractional root of negative number",
        ));
    }
    if index % 2.0 == 0.0 {
        return Err(CalcError::domain(
            NAME,
            "cannot calculate even root of negative number",
        ));
    }
    Ok(-(-a).powf(index.recip()))
}

/// An operation backed by a plain function.
pub struct FnOperation<F> {
    name: String,
    symbol: String,
    description: String,
    func: F,
}

impl<F> FnOperation<F>
where
    F: Fn(f64, f64) -> Result<f64>,
{
    /// Wraps `func` under the given display name and symbol.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            description: String::new(),
            func,
        }
    }

    /// Sets the usage description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<F> Operation for FnOperation<F>
where
    F: Fn(f64, f64) -> Result<f64>,
{
    fn execute(&self, a: f64, b: f64) -> Result<f64> {
        (self.func)(a, b)
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<F> std::fmt::Debug for FnOperation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOperation")
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcErrorKind;

    fn run(op: BuiltinOperation, a: f64, b: f64) -> Result<f64> {
        op.execute(a, b)
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(run(BuiltinOperation::Add, 2.0, 3.0).unwrap(), 5.0);
        assert_eq!(run(BuiltinOperation::Subtract, 2.0, 3.0).unwrap(), -1.0);
        assert_eq!(run(BuiltinOperation::Multiply, 7.0, 6.0).unwrap(), 42.0);
        assert_eq!(run(BuiltinOperation::Divide, 9.0, 2.0).unwrap(), 4.5);
        assert_eq!(run(BuiltinOperation::Power, 2.0, 10.0).unwrap(), 1024.0);
        assert_eq!(run(BuiltinOperation::Percentage, 25.0, 200.0).unwrap(), 12.5);
        assert_eq!(run(BuiltinOperation::AbsoluteDifference, 3.0, 10.0).unwrap(), 7.0);
    }

    #[test]
    fn test_zero_divisors_are_domain_errors() {
        for op in [
            BuiltinOperation::Divide,
            BuiltinOperation::Modulus,
            BuiltinOperation::IntegerDivide,
            BuiltinOperation::Percentage,
            BuiltinOperation::Root,
        ] {
            let err = run(op, 5.0, 0.0).unwrap_err();
            assert_eq!(err.kind(), CalcErrorKind::Domain, "{}", op.token());
        }
    }

    #[test]
    fn test_modulus_follows_divisor_sign() {
        assert_eq!(run(BuiltinOperation::Modulus, 10.0, 3.0).unwrap(), 1.0);
        assert_eq!(run(BuiltinOperation::Modulus, -10.0, 3.0).unwrap(), 2.0);
        assert_eq!(run(BuiltinOperation::Modulus, 10.0, -3.0).unwrap(), -2.0);
        assert_eq!(run(BuiltinOperation::Modulus, 9.0, 3.0).unwrap(), 0.0);
    }

    #[test]
    fn test_integer_divide_floors() {
        assert_eq!(run(BuiltinOperation::IntegerDivide, 7.0, 2.0).unwrap(), 3.0);
        assert_eq!(run(BuiltinOperation::IntegerDivide, -7.0, 2.0).unwrap(), -4.0);
    }

    #[test]
    fn test_root_rules() {
        assert_eq!(run(BuiltinOperation::Root, 16.0, 2.0).unwrap(), 4.0);
        let cube_root = run(BuiltinOperation::Root, -27.0, 3.0).unwrap();
        assert!((cube_root + 3.0).abs() < 1e-12);
        assert!(run(BuiltinOperation::Root, -16.0, 2.0).is_err());
        assert!(run(BuiltinOperation::Root, -16.0, 2.5).is_err());
        assert!(run(BuiltinOperation::Root, 16.0, -2.0).is_err());
    }

    #[test]
    fn test_non_finite_result_is_rejected() {
        let err = run(BuiltinOperation::Power, 10.0, 400.0).unwrap_err();
        assert_eq!(err.kind(), CalcErrorKind::Domain);
        assert!(run(BuiltinOperation::Power, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_fn_operation_delegates() {
        let hypot = FnOperation::new("Hypotenuse", "hyp", |a: f64, b: f64| Ok(a.hypot(b)))
            .with_description("Length of the hypotenuse");
        assert_eq!(hypot.execute(3.0, 4.0).unwrap(), 5.0);
        assert_eq!(hypot.symbol(), "hyp");
        assert_eq!(hypot.description(), "Length of the hypotenuse");
    }
}
