//! Aggregate math functions

use crate::evaluator::FormulaValue;

/// SUM function
pub fn fn_sum(numbers: &[f64]) -> FormulaValue {
    FormulaValue::Number(numbers.iter().sum())
}

/// AVERAGE function
pub fn fn_average(numbers: &[f64]) -> FormulaValue {
    if numbers.is_empty() {
        return FormulaValue::Number(0.0);
    }
    FormulaValue::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// MIN function
pub fn fn_min(numbers: &[f64]) -> FormulaValue {
    FormulaValue::Number(numbers.iter().copied().reduce(f64::min).unwrap_or(0.0))
}

/// MAX function
pub fn fn_max(numbers: &[f64]) -> FormulaValue {
    FormulaValue::Number(numbers.iter().copied().reduce(f64::max).unwrap_or(0.0))
}

/// COUNT function
pub fn fn_count(numbers: &[f64]) -> FormulaValue {
    FormulaValue::Number(numbers.len() as f64)
}
