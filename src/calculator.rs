//! Constrained arithmetic evaluator.
//!
//! Only numeric literals, `+ - * / // % **` and parentheses are accepted.
//! Operator precedence, integer/float promotion and result formatting follow
//! Python so that answers read the way users expect (`7/2` is `3.5`, `-7//2`
//! is `-4`, `2**-1` is `0.5`).

use std::fmt;
use thiserror::Error;

/// Errors raised while parsing or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("invalid syntax: {0}")]
    Syntax(String),

    #[error("names are not supported: '{0}'")]
    Name(String),

    #[error("{0}")]
    ZeroDivision(&'static str),

    #[error("integer overflow")]
    Overflow,

    #[error("numerical result out of range")]
    OutOfRange,

    #[error("complex results are not supported")]
    Complex,
}

/// Result of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

/// Format a float the way Python's `repr` does.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let abs = value.abs();
    if !(1e-4..1e16).contains(&abs) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => match exp.parse::<i32>() {
                Ok(exp) => format!(
                    "{}e{}{:02}",
                    mantissa,
                    if exp < 0 { '-' } else { '+' },
                    exp.abs()
                ),
                Err(_) => formatted,
            },
            None => formatted,
        };
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<Number, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(value),
        Some(token) => Err(CalcError::Syntax(format!("unexpected {}", token))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    DoubleStar,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::Num(n) => return write!(f, "number {}", n),
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::DoubleSlash => "'//'",
            Token::Percent => "'%'",
            Token::DoubleStar => "'**'",
            Token::LParen => "'('",
            Token::RParen => "')'",
        };
        f.write_str(s)
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let (number, next) = lex_number(&chars, i)?;
                tokens.push(Token::Num(number));
                i = next;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::DoubleStar);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                return Err(CalcError::Name(name));
            }
            other => {
                return Err(CalcError::Syntax(format!(
                    "unexpected character '{}' at position {}",
                    other, i
                )))
            }
        }
    }

    Ok(tokens)
}

fn lex_number(chars: &[char], start: usize) -> Result<(Number, usize), CalcError> {
    let mut i = start;
    let mut text = String::new();
    let mut is_float = false;

    let digits = |i: &mut usize, text: &mut String| {
        while *i < chars.len() && (chars[*i].is_ascii_digit() || chars[*i] == '_') {
            if chars[*i] != '_' {
                text.push(chars[*i]);
            }
            *i += 1;
        }
    };

    digits(&mut i, &mut text);
    if i < chars.len() && chars[i] == '.' {
        is_float = true;
        text.push('.');
        i += 1;
        digits(&mut i, &mut text);
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            is_float = true;
            text.push('e');
            text.extend(&chars[i + 1..j]);
            i = j;
            digits(&mut i, &mut text);
        }
    }

    if text == "." {
        return Err(CalcError::Syntax("lone '.'".to_string()));
    }

    let number = if is_float {
        let value: f64 = text
            .parse()
            .map_err(|_| CalcError::Syntax(format!("invalid number '{}'", text)))?;
        Number::Float(value)
    } else {
        let value: i64 = text.parse().map_err(|_| CalcError::Overflow)?;
        Number::Int(value)
    };

    Ok((number, i))
}

/// Nesting limit for parentheses, unary signs and exponent chains.
const MAX_DEPTH: usize = 200;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expr(&mut self) -> Result<Number, CalcError> {
        let mut left = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let right = self.term()?;
            left = match op {
                Token::Plus => add(left, right)?,
                _ => sub(left, right)?,
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Number, CalcError> {
        let mut left = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent)) =
            self.peek()
        {
            self.pos += 1;
            let right = self.unary()?;
            left = match op {
                Token::Star => mul(left, right)?,
                Token::Slash => div(left, right)?,
                Token::DoubleSlash => floor_div(left, right)?,
                _ => modulo(left, right)?,
            };
        }
        Ok(left)
    }

    /// Every nested construct re-enters here, so the depth guard lives here.
    fn unary(&mut self) -> Result<Number, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::Syntax("expression too deeply nested".to_string()));
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Number, CalcError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                match self.unary()? {
                    Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(CalcError::Overflow),
                    Number::Float(f) => Ok(Number::Float(-f)),
                }
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, CalcError> {
        let base = self.atom()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.pos += 1;
            // Right-associative, and the exponent may carry its own sign.
            let exponent = self.unary()?;
            return pow(base, exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Number, CalcError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(token) => Err(CalcError::Syntax(format!("expected ')', found {}", token))),
                    None => Err(CalcError::Syntax("unbalanced parentheses".to_string())),
                }
            }
            Some(token) => Err(CalcError::Syntax(format!("unexpected {}", token))),
            None => Err(CalcError::Syntax("unexpected end of expression".to_string())),
        }
    }
}

fn add(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int).ok_or(CalcError::Overflow),
        _ => Ok(Number::Float(a.as_f64() + b.as_f64())),
    }
}

fn sub(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map(Number::Int).ok_or(CalcError::Overflow),
        _ => Ok(Number::Float(a.as_f64() - b.as_f64())),
    }
}

fn mul(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map(Number::Int).ok_or(CalcError::Overflow),
        _ => Ok(Number::Float(a.as_f64() * b.as_f64())),
    }
}

fn div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.as_f64() == 0.0 {
        return Err(match (a, b) {
            (Number::Int(_), Number::Int(_)) => CalcError::ZeroDivision("division by zero"),
            _ => CalcError::ZeroDivision("float division by zero"),
        });
    }
    Ok(Number::Float(a.as_f64() / b.as_f64()))
}

fn floor_div(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(_), Number::Int(0)) => {
            Err(CalcError::ZeroDivision("integer division or modulo by zero"))
        }
        (Number::Int(x), Number::Int(y)) => {
            let q = x.checked_div(y).ok_or(CalcError::Overflow)?;
            let adjust = x % y != 0 && ((x < 0) != (y < 0));
            Ok(Number::Int(if adjust { q - 1 } else { q }))
        }
        _ => {
            let y = b.as_f64();
            if y == 0.0 {
                return Err(CalcError::ZeroDivision("float floor division by zero"));
            }
            Ok(Number::Float((a.as_f64() / y).floor()))
        }
    }
}

fn modulo(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(_), Number::Int(0)) => {
            Err(CalcError::ZeroDivision("integer division or modulo by zero"))
        }
        (Number::Int(x), Number::Int(y)) => {
            let r = x.checked_rem(y).ok_or(CalcError::Overflow)?;
            Ok(Number::Int(if r != 0 && ((r < 0) != (y < 0)) { r + y } else { r }))
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            if y == 0.0 {
                return Err(CalcError::ZeroDivision("float modulo"));
            }
            let r = x % y;
            Ok(Number::Float(if r != 0.0 && ((r < 0.0) != (y < 0.0)) { r + y } else { r }))
        }
    }
}

fn pow(base: Number, exponent: Number) -> Result<Number, CalcError> {
    if let (Number::Int(b), Number::Int(e)) = (base, exponent) {
        if e >= 0 {
            let e = u32::try_from(e).map_err(|_| CalcError::Overflow)?;
            return b.checked_pow(e).map(Number::Int).ok_or(CalcError::Overflow);
        }
    }

    let (b, e) = (base.as_f64(), exponent.as_f64());
    if b == 0.0 && e < 0.0 {
        return Err(CalcError::ZeroDivision("0.0 cannot be raised to a negative power"));
    }
    if b < 0.0 && e.fract() != 0.0 {
        return Err(CalcError::Complex);
    }
    let result = b.powf(e);
    if result.is_infinite() {
        return Err(CalcError::OutOfRange);
    }
    Ok(Number::Float(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> String {
        evaluate(expr).unwrap().to_string()
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval("2+3"), "5");
        assert_eq!(eval("(1 + 2) * 3"), "9");
        assert_eq!(eval("10 - 4 - 3"), "3");
        assert_eq!(eval("2 ** 10"), "1024");
        assert_eq!(eval("1_000 * 3"), "3000");
    }

    #[test]
    fn test_division_is_true_division() {
        assert_eq!(eval("7/2"), "3.5");
        assert_eq!(eval("4/2"), "2.0");
        assert_eq!(eval("0.1 + 0.2"), "0.30000000000000004");
    }

    #[test]
    fn test_floor_semantics() {
        assert_eq!(eval("10 // 3"), "3");
        assert_eq!(eval("-7 // 2"), "-4");
        assert_eq!(eval("-7 % 3"), "2");
        assert_eq!(eval("7 % -3"), "-2");
        assert_eq!(eval("7.5 // 2"), "3.0");
        assert_eq!(eval("-7.5 % 2"), "0.5");
    }

    #[test]
    fn test_power_precedence() {
        assert_eq!(eval("-2 ** 2"), "-4");
        assert_eq!(eval("2 ** 3 ** 2"), "512");
        assert_eq!(eval("2 ** -1"), "0.5");
        assert_eq!(eval("(-2) ** 2"), "4");
        assert_eq!(eval("2 ** 0.5"), "1.4142135623730951");
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(eval("3.0 * 2"), "6.0");
        assert_eq!(eval("1e20"), "1e+20");
        assert_eq!(eval("1.5e-5"), "1.5e-05");
        assert_eq!(eval("123.25"), "123.25");
        assert_eq!(format_float(-0.0), "-0.0");
    }

    #[test]
    fn test_zero_division() {
        assert_eq!(evaluate("1/0"), Err(CalcError::ZeroDivision("division by zero")));
        assert_eq!(
            evaluate("1 // 0"),
            Err(CalcError::ZeroDivision("integer division or modulo by zero"))
        );
        assert_eq!(evaluate("1.0/0"), Err(CalcError::ZeroDivision("float division by zero")));
        assert!(evaluate("0 ** -1").is_err());
    }

    #[test]
    fn test_rejects_names_and_code() {
        assert_eq!(
            evaluate("__import__('os').system('ls')"),
            Err(CalcError::Name("__import__".to_string()))
        );
        assert!(matches!(evaluate("abs(-1)"), Err(CalcError::Name(_))));
        assert!(matches!(evaluate("1; 2"), Err(CalcError::Syntax(_))));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(evaluate(""), Err(CalcError::Empty));
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert!(matches!(evaluate("(1 + 2"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("1 + 2)"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("1 +"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("* 3"), Err(CalcError::Syntax(_))));
    }

    #[test]
    fn test_overflow_and_domain() {
        assert_eq!(evaluate("9223372036854775807 + 1"), Err(CalcError::Overflow));
        assert_eq!(evaluate("2 ** 64"), Err(CalcError::Overflow));
        assert_eq!(evaluate("(-8) ** 0.5"), Err(CalcError::Complex));
        assert_eq!(evaluate("10.0 ** 400"), Err(CalcError::OutOfRange));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(evaluate(&nested(150)), Ok(Number::Int(1)));

        let too_deep = Err(CalcError::Syntax("expression too deeply nested".to_string()));
        assert_eq!(evaluate(&nested(20_000)), too_deep);
        assert_eq!(evaluate(&format!("{}5", "-".repeat(20_000))), too_deep);
        assert_eq!(evaluate(&vec!["2"; 20_000].join(" ** ")), too_deep);
    }
}
