//! Formula parser
//!
//! A recursive descent parser over a token slice:
//!
//! ```text
//! expression  := term (("+"|"-") term)*
//! term        := factor (("*"|"/") factor)*
//! factor      := "-" factor | number | cellOrRange | call | "(" expression ")"
//! cellOrRange := CELL [":" CELL]
//! call        := IDENT "(" [expression ("," expression)*] ")"
//! ```

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::{tokenize, Token};
use cellcalc_core::{CellAddress, CellRange};

/// Deepest factor nesting accepted before giving up
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse formula source into an AST
///
/// A leading `=` is optional.
///
/// # Example
/// ```rust
/// use cellcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// let ast = parse_formula("-(B2 / 4)").unwrap();
/// assert!(parse_formula("=A1+").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let formula = formula.trim();
    let body = formula.strip_prefix('=').unwrap_or(formula);
    let tokens = tokenize(body)?;
    parse(&tokens)
}

/// Parse a token stream into an AST
///
/// The whole stream must be consumed.
pub fn parse(tokens: &[Token]) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(tokens);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if let Some(token) = parser.current_token() {
        return Err(FormulaError::TrailingInput(token.to_string()));
    }

    Ok(expr)
}

/// Formula parser
struct FormulaParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // === Helper methods ===

    fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&'a Token> {
        let token = self.current_token();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token, description: &'static str) -> FormulaResult<()> {
        match self.current_token() {
            Some(token) if token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(FormulaError::UnexpectedToken {
                expected: description,
                found: token.to_string(),
            }),
            None => Err(FormulaError::UnexpectedEnd {
                expected: description,
            }),
        }
    }

    // === Expression parsing with precedence ===

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current_token() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            let right = self.parse_term()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.current_token() {
                Some(Token::Star) => BinaryOperator::Multiply,
                Some(Token::Slash) => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            let right = self.parse_factor()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> FormulaResult<FormulaExpr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(FormulaError::TooDeep(MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        let result = self.parse_factor_inner();
        self.depth -= 1;
        result
    }

    fn parse_factor_inner(&mut self) -> FormulaResult<FormulaExpr> {
        let token = self.consume().ok_or(FormulaError::UnexpectedEnd {
            expected: "an operand",
        })?;

        match token {
            Token::Minus => {
                let operand = self.parse_factor()?;
                Ok(FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand),
                })
            }

            Token::Number(n) => Ok(FormulaExpr::Number(*n)),

            Token::Cell(start) => self.parse_cell_or_range(start),

            Token::Identifier(name) => self.parse_function_call(name),

            Token::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen, "')'")?;
                Ok(expr)
            }

            other => Err(FormulaError::UnexpectedToken {
                expected: "an operand",
                found: other.to_string(),
            }),
        }
    }

    fn parse_cell_or_range(&mut self, start: &str) -> FormulaResult<FormulaExpr> {
        if !matches!(self.current_token(), Some(Token::Colon)) {
            return Ok(match CellAddress::parse(start) {
                Ok(address) => FormulaExpr::CellRef(address),
                Err(_) => FormulaExpr::InvalidRef(start.to_string()),
            });
        }

        self.consume();
        let end = match self.consume() {
            Some(Token::Cell(end)) => end,
            Some(other) => {
                return Err(FormulaError::UnexpectedToken {
                    expected: "a cell reference after ':'",
                    found: other.to_string(),
                })
            }
            None => {
                return Err(FormulaError::UnexpectedEnd {
                    expected: "a cell reference after ':'",
                })
            }
        };

        Ok(
            match (CellAddress::parse(start), CellAddress::parse(end)) {
                (Ok(start), Ok(end)) => FormulaExpr::RangeRef(CellRange::new(start, end)),
                _ => FormulaExpr::InvalidRef(format!("{}:{}", start, end)),
            },
        )
    }

    fn parse_function_call(&mut self, name: &str) -> FormulaResult<FormulaExpr> {
        self.expect(&Token::LeftParen, "'(' after function name")?;

        let mut args = Vec::new();

        // Parse arguments
        if !matches!(self.current_token(), Some(Token::RightParen)) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token(), Some(Token::Comma)) {
                self.consume();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen, "')' or ','")?;

        Ok(FormulaExpr::Function {
            name: name.to_uppercase(),
            args,
        })
    }
}
