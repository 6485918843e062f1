//! Cell text parser
//!
//! A recursive descent parser with spreadsheet operator precedence. It does
//! not build trees itself: everything it recognises is reported to an
//! [`ExprBuilder`] in postfix order.

use crate::ast::Expr;
use crate::builder::{AstBuilder, ExprBuilder};
use crate::error::{FormulaError, FormulaResult};

/// Parse cell text, reporting it to `builder`
///
/// Text starting with `=` is a formula. Other text is a literal: a number
/// if the whole text is a finite decimal number, otherwise a string taken
/// verbatim.
pub fn parse_expression<B>(input: &str, builder: &mut B) -> FormulaResult<()>
where
    B: ExprBuilder + ?Sized,
{
    let Some(formula) = input.strip_prefix('=') else {
        return match parse_number_literal(input) {
            Some(n) => builder.val_number(n),
            None => builder.val_string(input.to_string()),
        };
    };

    let mut parser = FormulaParser::new(formula, builder)?;
    parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Syntax(format!(
            "Unexpected {} after expression in '{}'",
            parser.current_token().describe(),
            input
        )));
    }

    Ok(())
}

/// Parse cell text into a tree
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2*3").unwrap();
/// assert_eq!(ast.to_string(), "(1+(2*3))");
///
/// let ast = parse_formula("=A1<>\"x\"").unwrap();
/// assert_eq!(ast.to_string(), "(A1<>\"x\")");
///
/// let ast = parse_formula("42").unwrap();
/// assert_eq!(ast.to_string(), "42");
/// ```
pub fn parse_formula(input: &str) -> FormulaResult<Expr> {
    let mut builder = AstBuilder::new();
    parse_expression(input, &mut builder)?;
    builder.finish()
}

/// Recognise a literal number: optional sign, digits with optional
/// fraction and exponent, nothing else
fn parse_number_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }

    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    String(String),

    // Identifiers and references
    Identifier(String), // Function name
    CellRef(String),    // Cell reference like A1, $A$1

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Colon,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string \"{}\"", s),
            Token::Identifier(s) => format!("name '{}'", s),
            Token::CellRef(s) => format!("reference '{}'", s),
            Token::Eof => "end of input".to_string(),
            other => format!("{:?}", other),
        }
    }
}

/// Formula parser
struct FormulaParser<'a, 'b, B: ?Sized> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    builder: &'b mut B,
}

impl<'a, 'b, B> FormulaParser<'a, 'b, B>
where
    B: ExprBuilder + ?Sized,
{
    fn new(input: &'a str, builder: &'b mut B) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            builder,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // One- or two-character operators
        match c {
            '<' => {
                self.advance();
                if self.eat('=') {
                    return Ok(Token::LessEqual);
                }
                if self.eat('>') {
                    return Ok(Token::NotEqual);
                }
                return Ok(Token::LessThan);
            }
            '>' => {
                self.advance();
                if self.eat('=') {
                    return Ok(Token::GreaterEqual);
                }
                return Ok(Token::GreaterThan);
            }
            '=' => {
                self.advance();
                self.eat('=');
                return Ok(Token::Equal);
            }
            '!' if self.peek_char_at(1) == Some('=') => {
                self.advance();
                self.advance();
                return Ok(Token::NotEqual);
            }
            _ => {}
        }

        // String literal
        if c == '"' {
            return self.scan_string();
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Identifier or cell reference
        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            return Ok(self.scan_identifier_or_ref());
        }

        Err(FormulaError::Syntax(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_string(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance(); // Skip opening quote

        let mut s = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    // Check for escaped quote ("")
                    if self.peek_char_at(1) == Some('"') {
                        s.push('"');
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(Token::String(s));
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => {
                    return Err(FormulaError::Syntax(format!(
                        "Unterminated string starting at offset {}",
                        start
                    )))
                }
            }
        }
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(Token::Number(num)),
            _ => Err(FormulaError::Syntax(format!("Invalid number '{}'", num_str))),
        }
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];

        // Letters followed by '(' are a function call even when they look
        // like a cell (LOG10(100))
        if Self::is_cell_reference(text) && self.peek_char() != Some('(') {
            return Token::CellRef(text.to_string());
        }

        Token::Identifier(text.to_string())
    }

    fn is_cell_reference(text: &str) -> bool {
        // [$]letters[$]digits, consuming everything
        let bytes = text.as_bytes();
        let mut i = 0;

        if bytes.get(i) == Some(&b'$') {
            i += 1;
        }

        let letter_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i == letter_start {
            return false;
        }

        if bytes.get(i) == Some(&b'$') {
            i += 1;
        }

        let digit_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digit_start {
            return false;
        }

        i == bytes.len()
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Syntax(format!(
                "Expected {}, got {}",
                expected.describe(),
                self.current_token().describe()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Comparison: =, <>, <, <=, >, >=
    // 2. Addition/Subtraction: +, -
    // 3. Multiplication/Division: *, /
    // 4. Exponentiation: ^ (right associative)
    // 5. Unary: -, +
    // 6. Primary: literals, references, ranges, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<()> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> FormulaResult<()> {
        self.parse_additive()?;

        loop {
            let emit: fn(&mut B) -> FormulaResult<()> = match self.current_token() {
                Token::Equal => B::op_eq,
                Token::NotEqual => B::op_ne,
                Token::LessThan => B::op_lt,
                Token::LessEqual => B::op_le,
                Token::GreaterThan => B::op_gt,
                Token::GreaterEqual => B::op_ge,
                _ => break,
            };

            self.consume()?;
            self.parse_additive()?;
            emit(self.builder)?;
        }

        Ok(())
    }

    fn parse_additive(&mut self) -> FormulaResult<()> {
        self.parse_multiplicative()?;

        loop {
            let emit: fn(&mut B) -> FormulaResult<()> = match self.current_token() {
                Token::Plus => B::op_add,
                Token::Minus => B::op_sub,
                _ => break,
            };

            self.consume()?;
            self.parse_multiplicative()?;
            emit(self.builder)?;
        }

        Ok(())
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<()> {
        self.parse_exponent()?;

        loop {
            let emit: fn(&mut B) -> FormulaResult<()> = match self.current_token() {
                Token::Star => B::op_mul,
                Token::Slash => B::op_div,
                _ => break,
            };

            self.consume()?;
            self.parse_exponent()?;
            emit(self.builder)?;
        }

        Ok(())
    }

    fn parse_exponent(&mut self) -> FormulaResult<()> {
        self.parse_unary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume()?;
            self.parse_exponent()?; // Right associative
            self.builder.op_pow()?;
        }

        Ok(())
    }

    fn parse_unary(&mut self) -> FormulaResult<()> {
        // Prefix unary minus
        if matches!(self.current_token(), Token::Minus) {
            self.consume()?;
            self.parse_unary()?;
            return self.builder.op_neg();
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.consume()?;
            return self.parse_unary();
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> FormulaResult<()> {
        match self.consume()? {
            Token::Number(n) => self.builder.val_number(n),

            Token::String(s) => self.builder.val_string(s),

            Token::LeftParen => {
                self.parse_expression()?;
                self.expect(&Token::RightParen)
            }

            Token::CellRef(start) => {
                if !matches!(self.current_token(), Token::Colon) {
                    return self.builder.val_reference(&start);
                }
                self.consume()?;
                match self.consume()? {
                    Token::CellRef(end) => self.builder.val_range(&format!("{}:{}", start, end)),
                    other => Err(FormulaError::Syntax(format!(
                        "Expected reference after ':', got {}",
                        other.describe()
                    ))),
                }
            }

            Token::Identifier(name) => {
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(&name)
                } else {
                    Err(FormulaError::Syntax(format!("Unknown name '{}'", name)))
                }
            }

            other => Err(FormulaError::Syntax(format!(
                "Unexpected {}",
                other.describe()
            ))),
        }
    }

    fn parse_function_call(&mut self, name: &str) -> FormulaResult<()> {
        self.expect(&Token::LeftParen)?;

        let mut count = 0;
        if !matches!(self.current_token(), Token::RightParen) {
            self.parse_expression()?;
            count += 1;

            while matches!(self.current_token(), Token::Comma) {
                self.consume()?;
                self.parse_expression()?;
                count += 1;
            }
        }

        self.expect(&Token::RightParen)?;
        self.builder.func_call(name, count)
    }
}
