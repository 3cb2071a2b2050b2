//! Parser for the mapping literals found in summation cells.
//!
//! Cells written by this tool hold JSON. Older dumps of the same feed hold the
//! Python-flavoured form instead: single quotes, `True`/`False`/`None`, tuples,
//! trailing commas. Both come out as a [`serde_json::Value`].

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason} at byte {position}")]
pub struct LiteralError {
    pub position: usize,
    pub reason: &'static str,
}

/// Deepest mapping/list nesting accepted, same as serde_json's own limit.
pub const MAX_DEPTH: usize = 128;

/// Parses a whole cell. Anything left after the value is an error.
pub fn parse(input: &str) -> Result<Value, LiteralError> {
    if let Ok(value) = serde_json::from_str(input) {
        return Ok(value);
    }

    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };

    let value = parser.value()?;

    parser.skip_whitespace();

    if parser.pos != input.len() {
        return Err(parser.fail("unexpected trailing characters"));
    }

    Ok(value)
}

// private

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();

        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            return true;
        }

        false
    }

    fn fail(&self, reason: &'static str) -> LiteralError {
        LiteralError {
            position: self.pos,
            reason,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();

        match self.peek() {
            Some('{') => self.nested(Self::mapping),
            Some('[') => self.nested(|parser| parser.sequence('[', ']')),
            Some('(') => self.nested(|parser| parser.sequence('(', ')')),
            Some(quote @ ('\'' | '"')) => self.string(quote).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.word(),
            Some(_) => Err(self.fail("unexpected character")),
            None => Err(self.fail("unexpected end of input")),
        }
    }

    /// Runs `parse` one level deeper, refusing to go past [`MAX_DEPTH`].
    fn nested<F>(&mut self, parse: F) -> Result<Value, LiteralError>
    where
        F: FnOnce(&mut Self) -> Result<Value, LiteralError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(self.fail("nesting too deep"));
        }

        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;

        value
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.eat('{');
        let mut map = Map::new();

        loop {
            self.skip_whitespace();

            if self.eat('}') {
                return Ok(Value::Object(map));
            }

            let key = match self.value()? {
                Value::String(s) => s,
                other => other.to_string(),
            };

            self.skip_whitespace();
            if !self.eat(':') {
                return Err(self.fail("expected ':'"));
            }

            let value = self.value()?;
            map.insert(key, value);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(Value::Object(map));
            }

            return Err(self.fail("expected ',' or '}'"));
        }
    }

    /// Lists and tuples, both become arrays.
    fn sequence(&mut self, open: char, close: char) -> Result<Value, LiteralError> {
        self.eat(open);
        let mut items = vec![];

        loop {
            self.skip_whitespace();

            if self.eat(close) {
                return Ok(Value::Array(items));
            }

            items.push(self.value()?);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Ok(Value::Array(items));
            }

            return Err(self.fail("expected ',' or a closing bracket"));
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.eat(quote);
        let mut out = String::new();

        loop {
            let Some(c) = self.bump() else {
                return Err(self.fail("unterminated string"));
            };

            match c {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let Some(c) = self.bump() else {
            return Err(self.fail("unterminated string"));
        };

        match c {
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'x' => out.push(self.code_point(2)?),
            'u' => out.push(self.code_point(4)?),
            'U' => out.push(self.code_point(8)?),
            // Unknown escapes are kept as written.
            other => {
                out.push('\\');
                out.push(other);
            }
        }

        Ok(())
    }

    fn code_point(&mut self, digits: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;

        let hex = self
            .src
            .get(self.pos..end)
            .ok_or_else(|| self.fail("truncated escape"))?;

        let c = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.fail("invalid escape"))?;

        self.pos = end;

        Ok(c)
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_'))
        {
            self.bump();
        }

        let text = self.src[start..self.pos].replace('_', "");

        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::from(int));
        }

        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError {
                position: start,
                reason: "invalid number",
            })
    }

    fn word(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;

        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }

        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError {
                position: start,
                reason: "unknown name",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_cells() {
        let value = parse(r#"{"attrs": {"bot_j": "abc"}, "count": 3}"#).unwrap();

        assert_eq!(value, json!({"attrs": {"bot_j": "abc"}, "count": 3}));
    }

    #[test]
    fn test_python_style_cells() {
        let value = parse(
            "{'attrs': {'bot_j': '771,4865-4866', 'known': True, 'asn': None}, \
             'tags': ('SQLI', \"XSS\",), 'score': -1.5, 'hits': 1_000,}",
        )
        .unwrap();

        assert_eq!(
            value,
            json!({
                "attrs": {"bot_j": "771,4865-4866", "known": true, "asn": null},
                "tags": ["SQLI", "XSS"],
                "score": -1.5,
                "hits": 1000
            })
        );
    }

    #[test]
    fn test_escapes() {
        let value = parse(r"{'a': 'it\'s', 'b': 'tab\there', 'c': '\x41\u00e9', 'd': 'C:\path'}")
            .unwrap();

        assert_eq!(value["a"], "it's");
        assert_eq!(value["b"], "tab\there");
        assert_eq!(value["c"], "Aé");
        assert_eq!(value["d"], "C:\\path");
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let value = parse("{1: 'one', None: 'nothing'}").unwrap();

        assert_eq!(value, json!({"1": "one", "null": "nothing"}));
    }

    #[test]
    fn test_garbage_is_an_error_not_a_panic() {
        for input in [
            "",
            "{",
            "{'attrs': ",
            "{'attrs' {'bot_j': 'x'}}",
            "{'attrs': {'bot_j': 'x'}",
            "{'attrs': 'unterminated}",
            "{'a': 1} extra",
            "{'a': nope}",
            "{'a': '\\x4'}",
            "{'a': 1.2.3}",
            "<not a mapping>",
        ] {
            assert!(parse(input).is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn test_deep_nesting_is_refused() {
        let deep = format!("{{'attrs': {}", "[".repeat(200_000));

        let error = parse(&deep).unwrap_err();

        assert_eq!(error.reason, "nesting too deep");
        assert_eq!(error.position, 10 + MAX_DEPTH - 1);
    }

    #[test]
    fn test_nesting_up_to_the_limit_is_fine() {
        let inner = format!("{}{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        let cell = format!("{{'attrs': {inner}}}");

        assert!(parse(&cell).is_ok());

        let too_deep = format!("{{'attrs': ({inner})}}");

        assert!(parse(&too_deep).is_err());
    }

    #[test]
    fn test_error_position() {
        let error = parse("{'a': 1 'b': 2}").unwrap_err();

        assert_eq!(error.position, 8);
        assert_eq!(error.reason, "expected ',' or '}'");
    }
}
