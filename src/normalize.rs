//! Best-effort repair of loosely formatted mappings into strict JSON.
//!
//! Models frequently hand tools a Python-style mapping such as
//! `{'to': 'a@b.com', 'subject': 'Hi'}` where a JSON object was asked for.
//! [`coerce_to_valid_json`] parses the Python literal subset (mappings,
//! sequences, numbers, booleans, `None` and strings in any quote style) and
//! re-serialises it as strict JSON. Input it cannot repair is returned as-is.

use crate::calculator::format_float;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Convert a Python-literal or JSON string into strict JSON.
///
/// Returns the original string unchanged if it cannot be parsed or holds a
/// value JSON cannot represent (sets, bytes, complex numbers, tuple keys).
pub fn coerce_to_valid_json(input: &str) -> String {
    match parse_literal(input).and_then(|literal| literal.into_json()) {
        Ok(value) => value.to_string(),
        Err(e) => {
            debug!("Leaving input as-is: {}", e.0);
            input.to_string()
        }
    }
}

/// Parse a single Python literal expression.
fn parse_literal(input: &str) -> Result<Literal, ParseError> {
    let mut parser = Parser::new(input);
    let literal = parser.parse_top()?;
    Ok(literal)
}

#[derive(Debug)]
struct ParseError(String);

impl ParseError {
    fn new(msg: impl Into<String>) -> Self {
        ParseError(msg.into())
    }
}

/// Parsed Python literal, before conversion to JSON.
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    None,
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    fn into_json(self) -> Result<Value, ParseError> {
        match self {
            Literal::None => Ok(Value::Null),
            Literal::Bool(b) => Ok(Value::Bool(b)),
            Literal::Int(i) => int_to_number(i).map(Value::Number),
            Literal::Float(f) => Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| ParseError::new("non-finite float")),
            Literal::Str(s) => Ok(Value::String(s)),
            Literal::List(items) | Literal::Tuple(items) => items
                .into_iter()
                .map(Literal::into_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Literal::Dict(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.into_json_key()?, value.into_json()?);
                }
                Ok(Value::Object(map))
            }
        }
    }

    /// Mirror `json.dumps` key coercion: scalars become strings.
    fn into_json_key(self) -> Result<String, ParseError> {
        match self {
            Literal::Str(s) => Ok(s),
            Literal::Int(i) => Ok(i.to_string()),
            Literal::Float(f) if f.is_finite() => Ok(format_float(f)),
            Literal::Bool(true) => Ok("true".to_string()),
            Literal::Bool(false) => Ok("false".to_string()),
            Literal::None => Ok("null".to_string()),
            _ => Err(ParseError::new("unsupported key type")),
        }
    }

    /// Dict key equality: `1`, `1.0` and `True` are the same key.
    fn same_key(&self, other: &Literal) -> bool {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => match (self, other) {
                (Literal::Tuple(a), Literal::Tuple(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_key(y))
                }
                _ => self == other,
            },
            _ => false,
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Literal::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn is_hashable(&self) -> bool {
        match self {
            Literal::List(_) | Literal::Dict(_) => false,
            Literal::Tuple(items) => items.iter().all(Literal::is_hashable),
            _ => true,
        }
    }
}

fn int_to_number(i: i128) -> Result<Number, ParseError> {
    if let Ok(v) = i64::try_from(i) {
        Ok(Number::from(v))
    } else if let Ok(v) = u64::try_from(i) {
        Ok(Number::from(v))
    } else {
        Err(ParseError::new("integer out of range"))
    }
}

/// Nesting limit for containers. Stays below `serde_json`'s own decode limit.
const MAX_DEPTH: usize = 100;

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(ParseError::new(format!("expected '{expected}', found '{c}'"))),
            None => Err(ParseError::new(format!("expected '{expected}', found end of input"))),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' | '\x0c' => self.pos += 1,
                '\\' if matches!(self.peek_at(1), Some('\n')) => self.pos += 2,
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Parse the whole input; a bare top-level `a, b` is a tuple.
    fn parse_top(&mut self) -> Result<Literal, ParseError> {
        self.skip_ws();
        if self.at_end() {
            return Err(ParseError::new("empty input"));
        }

        let first = self.parse_value()?;
        self.skip_ws();

        let literal = if self.peek() == Some(',') {
            let mut items = vec![first];
            while self.peek() == Some(',') {
                self.pos += 1;
                self.skip_ws();
                if self.at_end() {
                    break;
                }
                items.push(self.parse_value()?);
                self.skip_ws();
            }
            Literal::Tuple(items)
        } else {
            first
        };

        self.skip_ws();
        if !self.at_end() {
            return Err(ParseError::new("trailing characters"));
        }
        Ok(literal)
    }

    fn parse_value(&mut self) -> Result<Literal, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new("nesting too deep"));
        }
        self.depth += 1;
        let result = self.parse_scalar_or_container();
        self.depth -= 1;
        result
    }

    fn parse_scalar_or_container(&mut self) -> Result<Literal, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.parse_dict(),
            Some('[') => self.parse_list(),
            Some('(') => self.parse_tuple(),
            Some('\'') | Some('"') => self.parse_strings(),
            Some('+') | Some('-') => self.parse_signed(),
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                if self.string_prefix_len().is_some() {
                    self.parse_strings()
                } else {
                    self.parse_keyword()
                }
            }
            Some(c) => Err(ParseError::new(format!("unexpected character '{c}'"))),
            None => Err(ParseError::new("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self) -> Result<Literal, ParseError> {
        self.expect('{')?;
        self.skip_ws();
        let mut entries: Vec<(Literal, Literal)> = Vec::new();

        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Literal::Dict(entries));
        }

        loop {
            let key = self.parse_value()?;
            self.skip_ws();
            if self.peek() != Some(':') {
                // `{1, 2}` is a set, which JSON cannot hold.
                return Err(ParseError::new("sets are not supported"));
            }
            if !key.is_hashable() {
                return Err(ParseError::new("unhashable dict key"));
            }
            self.pos += 1;
            let value = self.parse_value()?;

            match entries.iter_mut().find(|(k, _)| k.same_key(&key)) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }

            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        break;
                    }
                }
                Some('}') => break,
                _ => return Err(ParseError::new("expected ',' or '}' in dict")),
            }
        }

        Ok(Literal::Dict(entries))
    }

    fn parse_list(&mut self) -> Result<Literal, ParseError> {
        self.expect('[')?;
        let items = self.parse_sequence(']')?;
        Ok(Literal::List(items))
    }

    fn parse_tuple(&mut self) -> Result<Literal, ParseError> {
        self.expect('(')?;
        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(Literal::Tuple(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_ws();
        match self.bump() {
            // Parenthesised expression, not a tuple.
            Some(')') => Ok(first),
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.parse_sequence(')')?);
                Ok(Literal::Tuple(items))
            }
            _ => Err(ParseError::new("expected ',' or ')'")),
        }
    }

    /// Parse comma-separated values up to `close`, allowing a trailing comma.
    fn parse_sequence(&mut self, close: char) -> Result<Vec<Literal>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                _ => return Err(ParseError::new(format!("expected ',' or '{close}'"))),
            }
        }
    }

    /// A single sign applied to a numeric literal; `--5` is rejected.
    fn parse_signed(&mut self) -> Result<Literal, ParseError> {
        let negative = self.bump() == Some('-');
        self.skip_ws();
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            return Err(ParseError::new("unary operator on non-number"));
        }
        match self.parse_number()? {
            Literal::Int(i) if negative => Ok(Literal::Int(-i)),
            Literal::Float(f) if negative => Ok(Literal::Float(-f)),
            literal @ (Literal::Int(_) | Literal::Float(_)) => Ok(literal),
            _ => Err(ParseError::new("unary operator on non-number")),
        }
    }

    fn parse_keyword(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            "None" | "null" => Ok(Literal::None),
            _ => Err(ParseError::new(format!("unknown name '{word}'"))),
        }
    }

    fn parse_number(&mut self) -> Result<Literal, ParseError> {
        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let digits = digits.replace('_', "");
                return i128::from_str_radix(&digits, radix)
                    .map(Literal::Int)
                    .map_err(|e| ParseError::new(e.to_string()));
            }
        }

        let mut text = self.take_while(|c| c.is_ascii_digit() || c == '_');
        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit() || c == '_'));
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign_len = usize::from(matches!(self.peek_at(1), Some('+') | Some('-')));
            if matches!(self.peek_at(1 + sign_len), Some(c) if c.is_ascii_digit()) {
                is_float = true;
                text.push('e');
                if sign_len == 1 {
                    text.push(self.chars[self.pos + 1]);
                }
                self.pos += 1 + sign_len;
                text.push_str(&self.take_while(|c| c.is_ascii_digit() || c == '_'));
            }
        }

        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            // Covers complex literals (`1j`) and junk like `12abc`.
            return Err(ParseError::new("invalid number literal"));
        }

        let text = text.replace('_', "");
        if text == "." || text.is_empty() {
            return Err(ParseError::new("invalid number literal"));
        }

        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|e: std::num::ParseFloatError| ParseError::new(e.to_string()))?;
            Ok(Literal::Float(value))
        } else {
            if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
                return Err(ParseError::new("leading zeros in decimal integer"));
            }
            text.parse::<i128>()
                .map(Literal::Int)
                .map_err(|e| ParseError::new(e.to_string()))
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Length of a string prefix (`r`, `u`, `b`, `rb`, ...) directly followed
    /// by a quote, if there is one at the cursor.
    fn string_prefix_len(&self) -> Option<usize> {
        let mut len = 0;
        while let Some(c) = self.peek_at(len) {
            if matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F') && len < 2 {
                len += 1;
            } else {
                break;
            }
        }
        match self.peek_at(len) {
            Some('\'') | Some('"') => Some(len),
            _ => None,
        }
    }

    /// Parse one or more adjacent string literals and concatenate them.
    fn parse_strings(&mut self) -> Result<Literal, ParseError> {
        let mut out = self.parse_string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            let next_is_string = match self.peek() {
                Some('\'') | Some('"') => true,
                Some(c) if c.is_alphabetic() => self.string_prefix_len().is_some(),
                _ => false,
            };
            if !next_is_string {
                self.pos = save;
                break;
            }
            out.push_str(&self.parse_string()?);
        }
        Ok(Literal::Str(out))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let prefix_len = self.string_prefix_len().unwrap_or(0);
        let prefix: String = self.chars[self.pos..self.pos + prefix_len]
            .iter()
            .collect::<String>()
            .to_lowercase();
        self.pos += prefix_len;

        if prefix.contains('b') {
            return Err(ParseError::new("bytes literals are not supported"));
        }
        if prefix.contains('f') {
            return Err(ParseError::new("f-strings are not literals"));
        }
        if !matches!(prefix.as_str(), "" | "r" | "u" | "br" | "rb" | "b" | "f" | "fr" | "rf") {
            return Err(ParseError::new(format!("invalid string prefix '{prefix}'")));
        }
        let raw = prefix.contains('r');

        let quote = self.bump().ok_or_else(|| ParseError::new("expected quote"))?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| ParseError::new("unterminated string"))?;

            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    return Ok(out);
                }
                out.push(c);
                continue;
            }

            match c {
                '\n' if !triple => return Err(ParseError::new("newline in string")),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.parse_escape(&mut out)?,
                _ => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let c = self
            .bump()
            .ok_or_else(|| ParseError::new("unterminated escape"))?;
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut digits = c.to_string();
                while digits.len() < 3 {
                    match self.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(d);
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push(self.code_point(&digits, 8)?);
            }
            'x' => {
                let digits = self.take_hex(2)?;
                out.push(self.code_point(&digits, 16)?);
            }
            'u' => {
                let digits = self.take_hex(4)?;
                out.push(self.code_point(&digits, 16)?);
            }
            'U' => {
                let digits = self.take_hex(8)?;
                out.push(self.code_point(&digits, 16)?);
            }
            'N' => return Err(ParseError::new("named unicode escapes are not supported")),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn take_hex(&mut self, count: usize) -> Result<String, ParseError> {
        let mut digits = String::with_capacity(count);
        for _ in 0..count {
            match self.bump() {
                Some(d) if d.is_ascii_hexdigit() => digits.push(d),
                _ => return Err(ParseError::new("truncated hex escape")),
            }
        }
        Ok(digits)
    }

    fn code_point(&self, digits: &str, radix: u32) -> Result<char, ParseError> {
        u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| ParseError::new("invalid code point"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_single_quoted_mapping() {
        let input = "{'to': 'a@b.com', 'subject': 'Hi', 'body': 'Yo'}";
        let output = coerce_to_valid_json(input);
        assert_eq!(
            decode(&output),
            json!({"to": "a@b.com", "subject": "Hi", "body": "Yo"})
        );
        assert!(!output.contains('\''));
    }

    #[test]
    fn test_valid_json_round_trips() {
        let inputs = [
            r#"{"to":"a@b.com","subject":"S","body":"B"}"#,
            r#"{"a": [1, 2.5, -3], "b": {"c": null, "d": true, "e": false}}"#,
            r#"[]"#,
            r#""just a string""#,
            r#"{"unicode": "h\u00e9llo \ud83d\ude00", "esc": "line\nbreak \"quoted\""}"#,
        ];
        for input in inputs {
            let output = coerce_to_valid_json(input);
            assert_eq!(decode(&output), decode(input), "input: {input}");
        }
    }

    #[test]
    fn test_preserves_key_order() {
        let output = coerce_to_valid_json("{'z': 1, 'a': 2, 'm': 3}");
        assert_eq!(output, r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_unparseable_input_is_unchanged() {
        for input in ["not json at all", "", "   ", "{'a': }", "{'a' 1}", "[1, 2", "foo(1)"] {
            assert_eq!(coerce_to_valid_json(input), input);
        }
    }

    #[test]
    fn test_python_keywords_and_tuples() {
        let output = coerce_to_valid_json("{'ok': True, 'bad': False, 'none': None, 'pair': (1, 2), 'one': (3,)}");
        assert_eq!(
            decode(&output),
            json!({"ok": true, "bad": false, "none": null, "pair": [1, 2], "one": [3]})
        );
    }

    #[test]
    fn test_parenthesised_value_is_not_a_tuple() {
        assert_eq!(coerce_to_valid_json("(5)"), "5");
        assert_eq!(coerce_to_valid_json("()"), "[]");
        assert_eq!(coerce_to_valid_json("1, 2"), "[1,2]");
    }

    #[test]
    fn test_numbers() {
        let output = coerce_to_valid_json("[0x1F, 0o17, 0b101, 1_000, -7, +3, 2.5, .5, 5., 1e3, -1.5E-2]");
        assert_eq!(
            decode(&output),
            json!([31, 15, 5, 1000, -7, 3, 2.5, 0.5, 5.0, 1000.0, -0.015])
        );
    }

    #[test]
    fn test_unrepresentable_values_fall_back() {
        let inputs = [
            "{1, 2, 3}",
            "{'data': b'bytes'}",
            "{'z': 1j}",
            "{(1, 2): 'tuple key'}",
            "{[1]: 'list key'}",
            "[1e999]",
            "[123456789012345678901234567890]",
            "[007]",
            "{'f': f'x'}",
            "set()",
        ];
        for input in inputs {
            assert_eq!(coerce_to_valid_json(input), input, "input: {input}");
        }
    }

    #[test]
    fn test_scalar_keys_are_stringified() {
        let output = coerce_to_valid_json("{7: 'a', 2.5: 'b', True: 'c', None: 'd'}");
        assert_eq!(
            decode(&output),
            json!({"7": "a", "2.5": "b", "true": "c", "null": "d"})
        );
    }

    #[test]
    fn test_string_escapes() {
        let output = coerce_to_valid_json(r#"{'msg': 'it\'s\tfine\n', 'hex': '\x41\u00e9\101', 'keep': '\d'}"#);
        assert_eq!(
            decode(&output),
            json!({"msg": "it's\tfine\n", "hex": "AéA", "keep": "\\d"})
        );
    }

    #[test]
    fn test_raw_triple_and_concatenated_strings() {
        let output = coerce_to_valid_json("{'raw': r'C:\\new', 'multi': '''it's\nfine''', 'cat': 'ab' \"cd\"}");
        assert_eq!(
            decode(&output),
            json!({"raw": "C:\\new", "multi": "it's\nfine", "cat": "abcd"})
        );
    }

    #[test]
    fn test_mixed_quotes_and_apostrophes() {
        let output = coerce_to_valid_json(r#"{'body': "Don't forget the meeting", "to": 'x@y.z'}"#);
        assert_eq!(
            decode(&output),
            json!({"body": "Don't forget the meeting", "to": "x@y.z"})
        );
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let output = coerce_to_valid_json("{'a': 1, 'b': 2, 'a': 3}");
        assert_eq!(output, r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn test_equal_numeric_keys_merge() {
        let output = coerce_to_valid_json("{1: 'a', True: 'b', 1.0: 'c', 0: 'd', False: 'e', 2: 'f'}");
        assert_eq!(output, r#"{"1":"c","0":"e","2":"f"}"#);
    }

    #[test]
    fn test_signs() {
        assert_eq!(decode(&coerce_to_valid_json("[-5, +2.5, - 3]")), json!([-5, 2.5, -3]));
        for input in ["[--5]", "[-+5]", "[-True]", "[-'x']"] {
            assert_eq!(coerce_to_valid_json(input), input, "input: {input}");
        }
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |n: usize| format!("{}{}", "[".repeat(n), "]".repeat(n));
        assert_eq!(coerce_to_valid_json(&nested(50)), nested(50));

        let deep = nested(200_000);
        assert_eq!(coerce_to_valid_json(&deep), deep);

        let deep_dict = format!("{}1{}", "{'a': ".repeat(50_000), "}".repeat(50_000));
        assert_eq!(coerce_to_valid_json(&deep_dict), deep_dict);
    }

    #[test]
    fn test_trailing_commas_and_whitespace() {
        let output = coerce_to_valid_json("  {\n  'a': [1, 2,],\n  'b': 'x',\n}\n");
        assert_eq!(decode(&output), json!({"a": [1, 2], "b": "x"}));
    }
}
