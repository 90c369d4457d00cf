//! Formula tokenizer

use crate::error::{FormulaError, FormulaResult};
use std::fmt;

/// Formula tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unsigned number literal
    Number(f64),
    /// Letters followed by digits, e.g. `A1`
    Cell(String),
    /// Letters alone, e.g. `SUM`
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Punctuation
    LeftParen,
    RightParen,
    Comma,
    Colon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Cell(s) => write!(f, "reference {}", s),
            Token::Identifier(s) => write!(f, "name {}", s),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
        }
    }
}

/// Split formula source (without the leading `=`) into tokens
///
/// # Example
/// ```rust
/// use cellcalc_formula::lexer::{tokenize, Token};
///
/// let tokens = tokenize("SUM(A1:B2) * 2").unwrap();
/// assert_eq!(tokens[0], Token::Identifier("SUM".into()));
/// assert_eq!(tokens[2], Token::Cell("A1".into()));
/// assert_eq!(tokens.last(), Some(&Token::Number(2.0)));
/// ```
pub fn tokenize(source: &str) -> FormulaResult<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn run(mut self) -> FormulaResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(c) = self.peek_char() else {
                return Ok(tokens);
            };

            let token = match c {
                '+' => self.single(Token::Plus),
                '-' => self.single(Token::Minus),
                '*' => self.single(Token::Star),
                '/' => self.single(Token::Slash),
                '(' => self.single(Token::LeftParen),
                ')' => self.single(Token::RightParen),
                ',' => self.single(Token::Comma),
                ':' => self.single(Token::Colon),
                c if c.is_ascii_digit() || c == '.' => self.scan_number()?,
                c if c.is_ascii_alphabetic() => self.scan_word(),
                character => {
                    return Err(FormulaError::UnexpectedCharacter {
                        character,
                        position: self.pos,
                    })
                }
            };
            tokens.push(token);
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        let mut seen_point = false;

        while let Some(c) = self.peek_char() {
            if c == '.' {
                if seen_point {
                    // Swallow the rest so the error shows the whole literal
                    self.take_while(|c| c.is_ascii_digit() || c == '.');
                    return Err(FormulaError::MalformedNumber(
                        self.input[start..self.pos].to_string(),
                    ));
                }
                seen_point = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            self.advance();
        }

        let text = &self.input[start..self.pos];
        text.parse()
            .map(Token::Number)
            .map_err(|_| FormulaError::MalformedNumber(text.to_string()))
    }

    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        self.take_while(|c| c.is_ascii_alphabetic());
        let letters_end = self.pos;
        self.take_while(|c| c.is_ascii_digit());

        let text = self.input[start..self.pos].to_string();
        if self.pos > letters_end {
            Token::Cell(text)
        } else {
            Token::Identifier(text)
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_char().map_or(false, &pred) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            tokenize(" 1 + 2.5*(3 - 4) / 5 ").unwrap(),
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.5),
                Token::Star,
                Token::LeftParen,
                Token::Number(3.0),
                Token::Minus,
                Token::Number(4.0),
                Token::RightParen,
                Token::Slash,
                Token::Number(5.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_references_and_names() {
        assert_eq!(
            tokenize("sum(a1:AB12, x)").unwrap(),
            vec![
                Token::Identifier("sum".into()),
                Token::LeftParen,
                Token::Cell("a1".into()),
                Token::Colon,
                Token::Cell("AB12".into()),
                Token::Comma,
                Token::Identifier("x".into()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_leading_point_number() {
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn test_two_decimal_points() {
        assert_eq!(
            tokenize("1.2.3"),
            Err(FormulaError::MalformedNumber("1.2.3".into()))
        );
        assert!(matches!(
            tokenize("."),
            Err(FormulaError::MalformedNumber(_))
        ));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("1 & 2"),
            Err(FormulaError::UnexpectedCharacter {
                character: '&',
                position: 2
            })
        );
        assert!(tokenize("\"text\"").is_err());
        assert!(tokenize("$A$1").is_err());
    }

    #[test]
    fn test_no_exponent_syntax() {
        assert_eq!(
            tokenize("1e5").unwrap(),
            vec![Token::Number(1.0), Token::Cell("e5".into())]
        );
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }
}
