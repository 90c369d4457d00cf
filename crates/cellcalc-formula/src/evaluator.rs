//! Formula evaluator
//!
//! Resolves cells against a [`Sheet`] snapshot, memoizing every resolved coordinate
//! in an [`EvaluationSession`] and reporting reference cycles as
//! [`CellError::Cycle`] values.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::functions::FunctionRegistry;
use crate::lexer::tokenize;
use crate::parser::parse;
use ahash::{AHashMap, AHashSet};
use cellcalc_core::{CellAddress, CellError, CellRange, Scalar, Sheet};
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The built-in function registry
pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Error(CellError),
    /// Row-major range contents; never the result of resolving a single cell
    Array(Vec<Vec<FormulaValue>>),
}

impl FormulaValue {
    /// Coerce to a number for arithmetic
    ///
    /// Errors pass through and arrays are [`CellError::Value`]. Blank text is 0,
    /// other text is parsed as a float and falls back to 0 when it does not parse.
    /// Booleans are 0.
    pub fn to_number(&self) -> Result<f64, CellError> {
        match self {
            FormulaValue::Number(n) => Ok(*n),
            FormulaValue::Error(e) => Err(*e),
            FormulaValue::Array(_) => Err(CellError::Value),
            FormulaValue::String(s) => Ok(parse_number(s).unwrap_or(0.0)),
            FormulaValue::Boolean(_) => Ok(0.0),
        }
    }

    /// The number an aggregate function sees, if any
    ///
    /// Unlike [`to_number`](Self::to_number) nothing falls back to 0: blank or
    /// non-numeric text and booleans are skipped.
    pub fn aggregate_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, FormulaValue::Error(_))
    }

    /// Get the error if this is one
    pub fn get_error(&self) -> Option<CellError> {
        match self {
            FormulaValue::Error(e) => Some(*e),
            _ => None,
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let n = text.parse::<f64>().ok()?;

    // Only the exact spelling `Infinity` names an infinite value
    let unsigned = text.trim_start_matches(['+', '-']);
    let spelled_infinity =
        unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity");
    if n.is_nan() || (spelled_infinity && unsigned != "Infinity") {
        return None;
    }
    Some(n)
}

impl From<&Scalar> for FormulaValue {
    fn from(value: &Scalar) -> Self {
        match value {
            Scalar::Number(n) => FormulaValue::Number(*n),
            Scalar::Text(s) => FormulaValue::String(s.clone()),
            Scalar::Bool(b) => FormulaValue::Boolean(*b),
        }
    }
}

impl From<CellError> for FormulaValue {
    fn from(e: CellError) -> Self {
        FormulaValue::Error(e)
    }
}

/// Counters describing the work done by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    /// Coordinates computed (cache misses)
    pub evaluations: u64,
    /// Resolutions answered from the cache
    pub cache_hits: u64,
}

/// Memo cache and recursion stack for one pass over one sheet snapshot
///
/// A session remembers the identity and revision of the sheet it last resolved
/// against and drops its cache when either changes. Statistics accumulate across
/// resets.
#[derive(Debug, Default)]
pub struct EvaluationSession {
    snapshot: Option<(u64, u64)>,
    cache: AHashMap<CellAddress, FormulaValue>,
    in_progress: AHashSet<CellAddress>,
    stats: SessionStats,
}

impl EvaluationSession {
    /// Create an unbound session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session bound to a sheet snapshot
    pub fn for_sheet(sheet: &Sheet) -> Self {
        let mut session = Self::new();
        session.bind(sheet);
        session
    }

    /// Bind to a sheet snapshot, discarding the cache if it belongs to another one
    pub fn bind(&mut self, sheet: &Sheet) {
        let snapshot = (sheet.id(), sheet.revision());
        if self.snapshot != Some(snapshot) {
            if self.snapshot.is_some() {
                tracing::debug!(
                    sheet = sheet.id(),
                    revision = sheet.revision(),
                    cached = self.cache.len(),
                    "evaluation session reset"
                );
            }
            self.reset();
            self.snapshot = Some(snapshot);
        }
    }

    /// Drop every cached value
    pub fn reset(&mut self) {
        self.cache.clear();
        self.in_progress.clear();
        self.snapshot = None;
    }

    /// Work counters
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The cached value of a coordinate, if it was resolved in this session
    pub fn cached(&self, row: usize, col: usize) -> Option<&FormulaValue> {
        self.cache.get(&CellAddress::new(row, col))
    }

    /// Number of cached coordinates
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a cell; see [`resolve`]
    pub fn resolve(&mut self, sheet: &Sheet, row: usize, col: usize) -> FormulaValue {
        resolve(sheet, row, col, self)
    }
}

/// Resolve the value of the cell at `(row, col)`
///
/// Non-formula cells resolve to their literal value. Formulas are tokenized,
/// parsed and evaluated, resolving the cells they reference first. The result
/// is cached in `session` and never an array.
///
/// Dependencies are resolved on an explicit work stack, so reference chains of
/// any length resolve without growing the call stack.
///
/// # Example
/// ```rust
/// use cellcalc_core::{Cell, Sheet};
/// use cellcalc_formula::{resolve, EvaluationSession, FormulaValue};
///
/// let sheet = Sheet::from_rows(vec![vec![Cell::from("10"), Cell::from("20"), Cell::from("=SUM(A1:B1)")]]);
/// let mut session = EvaluationSession::new();
/// assert_eq!(resolve(&sheet, 0, 2, &mut session), FormulaValue::Number(30.0));
/// ```
pub fn resolve(sheet: &Sheet, row: usize, col: usize, session: &mut EvaluationSession) -> FormulaValue {
    session.bind(sheet);
    EvaluationContext::new(sheet, session).resolve(CellAddress::new(row, col))
}

/// Evaluate standalone formula source against a sheet
///
/// A leading `=` is optional. Malformed source and array results evaluate to
/// [`CellError::Value`].
pub fn evaluate_formula(source: &str, sheet: &Sheet, session: &mut EvaluationSession) -> FormulaValue {
    session.bind(sheet);
    let source = source.trim();
    let body = source.strip_prefix('=').unwrap_or(source);
    match compile(body, None) {
        Compiled::Value(value) => value,
        Compiled::Formula(expr) => {
            let mut ctx = EvaluationContext::new(sheet, session);
            scalar_result(evaluate(&expr, &mut ctx))
        }
    }
}

fn scalar_result(value: FormulaValue) -> FormulaValue {
    match value {
        FormulaValue::Array(_) => FormulaValue::Error(CellError::Value),
        other => other,
    }
}

/// A formula body ready to evaluate
enum Compiled {
    /// Literal cells, empty bodies and parse failures
    Value(FormulaValue),
    Formula(FormulaExpr),
}

fn compile(body: &str, cell: Option<CellAddress>) -> Compiled {
    if body.trim().is_empty() {
        return Compiled::Value(FormulaValue::String(String::new()));
    }

    match tokenize(body).and_then(|tokens| parse(&tokens)) {
        Ok(expr) => Compiled::Formula(expr),
        Err(e) => {
            match cell {
                Some(addr) => tracing::debug!(cell = %addr, error = %e, "formula failed to parse"),
                None => tracing::debug!(error = %e, "formula failed to parse"),
            }
            Compiled::Value(FormulaValue::Error(CellError::Value))
        }
    }
}

/// Evaluation stopped at a reference that has not been resolved yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending(CellAddress);

/// A cell on the work stack
struct Frame {
    addr: CellAddress,
    body: Compiled,
    /// Dependencies resolved on this frame's behalf
    resolved: u64,
}

/// Context for formula evaluation
pub struct EvaluationContext<'a> {
    sheet: &'a Sheet,
    session: &'a mut EvaluationSession,
    /// Cache hits seen by the current evaluation attempt
    lookups: u64,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    ///
    /// The caller is responsible for having bound `session` to `sheet`.
    pub fn new(sheet: &'a Sheet, session: &'a mut EvaluationSession) -> Self {
        Self {
            sheet,
            session,
            lookups: 0,
        }
    }

    /// Resolve a cell, consulting and filling the session cache
    pub fn resolve(&mut self, addr: CellAddress) -> FormulaValue {
        if let Some(value) = self.session.cache.get(&addr) {
            self.session.stats.cache_hits += 1;
            return value.clone();
        }
        if self.session.in_progress.contains(&addr) {
            tracing::debug!(cell = %addr, "circular reference");
            return FormulaValue::Error(CellError::Cycle);
        }
        self.run(addr)
    }

    /// Resolve `root` and everything it depends on
    ///
    /// A formula that reaches an unresolved reference is suspended: the
    /// reference is pushed and the formula is evaluated again once it is
    /// cached. The in-progress set always equals the cells on the stack.
    fn run(&mut self, root: CellAddress) -> FormulaValue {
        let mut stack = vec![self.enter(root)];

        while let Some(frame) = stack.last() {
            match self.attempt(frame) {
                Ok(value) => {
                    let addr = frame.addr;
                    stack.pop();
                    self.session.in_progress.remove(&addr);
                    self.session.cache.insert(addr, value.clone());
                    match stack.last_mut() {
                        Some(parent) => parent.resolved += 1,
                        None => return value,
                    }
                }
                Err(Pending(dependency)) => {
                    let frame = self.enter(dependency);
                    stack.push(frame);
                }
            }
        }

        // The root frame always returns from the loop
        FormulaValue::Error(CellError::Value)
    }

    fn enter(&mut self, addr: CellAddress) -> Frame {
        self.session.in_progress.insert(addr);
        self.session.stats.evaluations += 1;

        let raw = self.sheet.raw_cell(addr.row, addr.col);
        let body = match raw.formula_body() {
            Some(body) => compile(body, Some(addr)),
            None => Compiled::Value(FormulaValue::from(raw)),
        };

        Frame {
            addr,
            body,
            resolved: 0,
        }
    }

    fn attempt(&mut self, frame: &Frame) -> Result<FormulaValue, Pending> {
        match &frame.body {
            Compiled::Value(value) => Ok(value.clone()),
            Compiled::Formula(expr) => self.try_evaluate(expr, frame.resolved).map(scalar_result),
        }
    }

    /// Evaluate `expr` once, stopping at the first unresolved reference
    ///
    /// Every dependency resolved for an earlier attempt is looked up again by the
    /// next one; those lookups are not counted as cache hits.
    fn try_evaluate(&mut self, expr: &FormulaExpr, resolved: u64) -> Result<FormulaValue, Pending> {
        self.lookups = 0;
        let value = eval_expr(expr, self)?;
        self.session.stats.cache_hits += self.lookups.saturating_sub(resolved);
        Ok(value)
    }

    /// Value of a referenced cell, if it is already known
    fn lookup(&mut self, addr: CellAddress) -> Result<FormulaValue, Pending> {
        if let Some(value) = self.session.cache.get(&addr) {
            self.lookups += 1;
            return Ok(value.clone());
        }
        if self.session.in_progress.contains(&addr) {
            tracing::debug!(cell = %addr, "circular reference");
            return Ok(FormulaValue::Error(CellError::Cycle));
        }
        Err(Pending(addr))
    }

    /// Evaluate a range row by row within the populated extent of the sheet
    ///
    /// The first error encountered is returned instead of the array.
    fn evaluate_range(&mut self, range: &CellRange) -> Result<FormulaValue, Pending> {
        let Some(bounded) = self.sheet.extent().and_then(|extent| extent.intersect(range)) else {
            return Ok(FormulaValue::Array(Vec::new()));
        };

        let mut rows: Vec<Vec<FormulaValue>> = Vec::with_capacity(bounded.row_count());
        for addr in bounded.cells() {
            let value = self.lookup(addr)?;
            if value.is_error() {
                return Ok(value);
            }
            if addr.col == bounded.start.col {
                rows.push(Vec::with_capacity(bounded.col_count()));
            }
            if let Some(row) = rows.last_mut() {
                row.push(value);
            }
        }

        Ok(FormulaValue::Array(rows))
    }
}

/// Evaluate a formula expression
///
/// References that are not cached yet are resolved on demand.
pub fn evaluate(expr: &FormulaExpr, ctx: &mut EvaluationContext) -> FormulaValue {
    let mut resolved = 0;
    loop {
        match ctx.try_evaluate(expr, resolved) {
            Ok(value) => return value,
            Err(Pending(dependency)) => {
                ctx.run(dependency);
                resolved += 1;
            }
        }
    }
}

fn eval_expr(expr: &FormulaExpr, ctx: &mut EvaluationContext) -> Result<FormulaValue, Pending> {
    match expr {
        FormulaExpr::Number(n) => Ok(FormulaValue::Number(*n)),

        // === References ===
        FormulaExpr::CellRef(addr) => ctx.lookup(*addr),
        FormulaExpr::RangeRef(range) => ctx.evaluate_range(range),
        FormulaExpr::InvalidRef(_) => Ok(FormulaValue::Error(CellError::Ref)),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, ctx),
        FormulaExpr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, ctx),

        // === Functions ===
        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    ctx: &mut EvaluationContext,
) -> Result<FormulaValue, Pending> {
    // Evaluate operands first
    let left_val = eval_expr(left, ctx)?;
    let right_val = eval_expr(right, ctx)?;

    if matches!(left_val, FormulaValue::Array(_)) || matches!(right_val, FormulaValue::Array(_)) {
        return Ok(FormulaValue::Error(CellError::Value));
    }

    // Errors propagate, left first
    let l = match left_val.to_number() {
        Ok(n) => n,
        Err(e) => return Ok(FormulaValue::Error(e)),
    };
    let r = match right_val.to_number() {
        Ok(n) => n,
        Err(e) => return Ok(FormulaValue::Error(e)),
    };

    Ok(match op {
        BinaryOperator::Add => FormulaValue::Number(l + r),
        BinaryOperator::Subtract => FormulaValue::Number(l - r),
        BinaryOperator::Multiply => FormulaValue::Number(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                FormulaValue::Error(CellError::Div0)
            } else {
                FormulaValue::Number(l / r)
            }
        }
    })
}

/// Evaluate a unary operation
fn evaluate_unary_op(
    op: UnaryOperator,
    operand: &FormulaExpr,
    ctx: &mut EvaluationContext,
) -> Result<FormulaValue, Pending> {
    let value = eval_expr(operand, ctx)?;

    Ok(match op {
        UnaryOperator::Negate => match value.to_number() {
            Ok(n) => FormulaValue::Number(-n),
            Err(e) => FormulaValue::Error(e),
        },
    })
}

/// Evaluate a function call
///
/// Arguments are evaluated left to right and the first error wins. Ranges are
/// flattened in row-major order and only numeric entries reach the function.
/// The name is looked up once every argument has been evaluated.
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    ctx: &mut EvaluationContext,
) -> Result<FormulaValue, Pending> {
    let mut numbers = Vec::with_capacity(args.len());
    for arg in args {
        match eval_expr(arg, ctx)? {
            FormulaValue::Error(e) => return Ok(FormulaValue::Error(e)),
            FormulaValue::Array(rows) => {
                for value in rows.iter().flatten() {
                    if let Some(e) = value.get_error() {
                        return Ok(FormulaValue::Error(e));
                    }
                    numbers.extend(value.aggregate_number());
                }
            }
            value => numbers.extend(value.aggregate_number()),
        }
    }

    match function_registry().get(name) {
        Some(func) => Ok((func.implementation)(&numbers)),
        None => {
            tracing::debug!(function = name, "unknown function");
            Ok(FormulaValue::Error(CellError::Value))
        }
    }
}
