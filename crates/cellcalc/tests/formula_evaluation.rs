//! Tests for formula evaluation with cell references

use cellcalc::prelude::*;
use cellcalc::{evaluate, evaluate_formula, parse_formula, EvaluationContext, SessionStats};
use pretty_assertions::assert_eq;

fn row(values: &[&str]) -> Sheet {
    Sheet::from_rows(vec![values.iter().map(|v| Cell::from(*v)).collect()])
}

/// Test basic formula evaluation without cell references
#[test]
fn test_evaluate_simple_formulas() {
    let sheet = Sheet::new();
    let mut session = EvaluationSession::new();

    let ast = parse_formula("=1+2*3").unwrap();
    let mut ctx = EvaluationContext::new(&sheet, &mut session);
    assert_eq!(evaluate(&ast, &mut ctx), FormulaValue::Number(7.0));

    let ast = parse_formula("(1+2)*-3").unwrap();
    assert_eq!(evaluate(&ast, &mut ctx), FormulaValue::Number(-9.0));
}

/// Test SUM function with literal arguments
#[test]
fn test_evaluate_sum() {
    let sheet = Sheet::new();
    let mut session = EvaluationSession::new();
    assert_eq!(
        evaluate_formula("=SUM(1,2,3,4,5)", &sheet, &mut session),
        FormulaValue::Number(15.0)
    );
    assert_eq!(
        evaluate_formula("=sum(1, 2) / count(1, 2)", &sheet, &mut session),
        FormulaValue::Number(1.5)
    );
}

/// Test formula evaluation with cell references
#[test]
fn test_evaluate_with_cell_references() {
    let mut sheet = Sheet::new();
    sheet.set_value_at("A1", 10.0).unwrap();
    sheet.set_value_at("A2", 20.0).unwrap();
    sheet.set_value_at("A3", 30.0).unwrap();
    sheet.set_value_at("B1", 5.0).unwrap();
    sheet.set_value_at("B2", "=A1+B1").unwrap();
    sheet.set_value_at("B3", "=SUM(A1:A3)").unwrap();
    sheet.set_value_at("C1", "=AVERAGE(A1:A3)").unwrap();
    sheet.set_value_at("C2", "=MAX(A1:B3)-MIN(A1:B3)").unwrap();

    let mut session = EvaluationSession::new();
    assert_eq!(resolve(&sheet, 1, 1, &mut session), FormulaValue::Number(15.0));
    assert_eq!(resolve(&sheet, 2, 1, &mut session), FormulaValue::Number(60.0));
    assert_eq!(resolve(&sheet, 0, 2, &mut session), FormulaValue::Number(20.0));
    assert_eq!(resolve(&sheet, 1, 2, &mut session), FormulaValue::Number(55.0));
}

#[test]
fn test_literal_sum_scenario() {
    let sheet = row(&["10", "20", "=SUM(A1:B1)"]);
    let mut session = EvaluationSession::new();
    assert_eq!(resolve(&sheet, 0, 2, &mut session), FormulaValue::Number(30.0));
}

#[test]
fn test_cycle_terminates() {
    let sheet = row(&["=B1", "=A1"]);
    let mut session = EvaluationSession::new();
    assert_eq!(
        resolve(&sheet, 0, 0, &mut session),
        FormulaValue::Error(CellError::Cycle)
    );
}

#[test]
fn test_self_reference_is_cycle() {
    let sheet = row(&["=A1+1"]);
    let mut session = EvaluationSession::new();
    assert_eq!(
        resolve(&sheet, 0, 0, &mut session),
        FormulaValue::Error(CellError::Cycle)
    );
}

#[test]
fn test_error_short_circuit() {
    let sheet = row(&["=1/0", "=A1+5"]);
    let mut session = EvaluationSession::new();
    assert_eq!(
        resolve(&sheet, 0, 1, &mut session),
        FormulaValue::Error(CellError::Div0)
    );
}

#[test]
fn test_range_aggregation_skips_text() {
    let sheet = Sheet::from_rows(vec![vec![
        Cell::from(1),
        Cell::from("x"),
        Cell::from(2),
        Cell::from("=SUM(A1:C1)"),
    ]]);
    let mut session = EvaluationSession::new();
    assert_eq!(resolve(&sheet, 0, 3, &mut session), FormulaValue::Number(3.0));
}

#[test]
fn test_range_aggregation_propagates_errors() {
    let sheet = row(&["1", "=2/0", "=A1+", "=SUM(A1:C1)"]);
    let mut session = EvaluationSession::new();
    assert_eq!(
        resolve(&sheet, 0, 3, &mut session),
        FormulaValue::Error(CellError::Div0)
    );
}

#[test]
fn test_diamond_dependency_reuse() {
    let sheet = Sheet::from_rows(vec![vec![
        Cell::from(5),
        Cell::from("=A1+1"),
        Cell::from("=A1+B1"),
    ]]);
    let mut session = EvaluationSession::new();
    assert_eq!(resolve(&sheet, 0, 2, &mut session), FormulaValue::Number(11.0));
    assert_eq!(
        session.stats(),
        SessionStats {
            evaluations: 3,
            cache_hits: 1
        }
    );
}

#[test]
fn test_session_resets_after_edit() {
    let mut sheet = row(&["1", "=A1*10"]);
    let mut session = EvaluationSession::new();
    assert_eq!(resolve(&sheet, 0, 1, &mut session), FormulaValue::Number(10.0));

    sheet.set_value(0, 0, 4);
    assert_eq!(resolve(&sheet, 0, 1, &mut session), FormulaValue::Number(40.0));
}

#[test]
fn test_invalid_reference_and_unknown_function() {
    let sheet = row(&["=A0", "=FOO(1)", "=A1:B1"]);
    let mut session = EvaluationSession::new();
    assert_eq!(
        resolve(&sheet, 0, 0, &mut session),
        FormulaValue::Error(CellError::Ref)
    );
    assert_eq!(
        resolve(&sheet, 0, 1, &mut session),
        FormulaValue::Error(CellError::Value)
    );
    assert_eq!(
        resolve(&sheet, 0, 2, &mut session),
        FormulaValue::Error(CellError::Value)
    );
}

#[test]
fn test_lenient_coercion() {
    let sheet = row(&["abc", "=A1+1", "", "=C1*3"]);
    let mut session = EvaluationSession::new();
    assert_eq!(resolve(&sheet, 0, 1, &mut session), FormulaValue::Number(1.0));
    assert_eq!(resolve(&sheet, 0, 3, &mut session), FormulaValue::Number(0.0));
}
