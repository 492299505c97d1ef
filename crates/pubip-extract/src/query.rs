//! Dot-path query expressions
//!
//! A small path language over nested JSON documents, compiled once and then
//! evaluated against a parsed value:
//!
//! - `.`              the whole document
//! - `.data.ip`       object field access
//! - `."weird key"`   quoted field names
//! - `.[0].address`   sequence indexing, `.items[-1]` counts from the end
//!
//! A path that runs off the document (missing field, out-of-range index,
//! descent through `null`) yields no match rather than an error. Indexing a
//! value of the wrong shape (a field name into an array, an index into an
//! object) is an evaluation error.

use pubip_core::{Error, Result};
use serde_json::Value;

/// One step of a compiled query
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// Object field access
    Key(String),
    /// Sequence index; negative counts from the end
    Index(i64),
}

/// A compiled query expression
#[derive(Debug, Clone)]
pub struct Query {
    segments: Vec<Segment>,
}

impl Query {
    /// Compile an expression into segments
    pub fn compile(expr: &str) -> Result<Self> {
        let chars: Vec<char> = expr.chars().collect();
        if chars.is_empty() || chars[0] != '.' {
            return Err(Error::invalid_query(format!(
                "expression must start with '.': {expr}"
            )));
        }

        // "." alone selects the whole document
        if chars.len() == 1 {
            return Ok(Self {
                segments: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    if i >= chars.len() {
                        return Err(Error::invalid_query("trailing '.' in expression"));
                    }
                    match chars[i] {
                        '[' => segments.push(parse_bracket(&chars, &mut i)?),
                        '"' => segments.push(Segment::Key(parse_quoted(&chars, &mut i)?)),
                        c if is_ident_start(c) => {
                            segments.push(Segment::Key(parse_ident(&chars, &mut i)))
                        }
                        c => {
                            return Err(Error::invalid_query(format!(
                                "unexpected character '{c}' after '.'"
                            )));
                        }
                    }
                }
                // `.foo[0]` indexes directly after a field segment
                '[' => segments.push(parse_bracket(&chars, &mut i)?),
                c => {
                    return Err(Error::invalid_query(format!(
                        "unexpected character '{c}' in expression"
                    )));
                }
            }
        }

        Ok(Self { segments })
    }

    /// Walk the document and return the first value the query yields, or
    /// `None` when the path runs off the document.
    pub fn first(&self, root: &Value) -> Result<Option<Value>> {
        let mut current = root;
        for segment in &self.segments {
            match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => match map.get(key) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
                (Segment::Key(_), Value::Null) => return Ok(None),
                (Segment::Key(key), other) => {
                    return Err(Error::query_eval(format!(
                        "cannot index {} with \"{key}\"",
                        type_name(other)
                    )));
                }
                (Segment::Index(index), Value::Array(items)) => {
                    let resolved = if *index < 0 {
                        items.len() as i64 + index
                    } else {
                        *index
                    };
                    if resolved < 0 || resolved as usize >= items.len() {
                        return Ok(None);
                    }
                    current = &items[resolved as usize];
                }
                (Segment::Index(_), Value::Null) => return Ok(None),
                (Segment::Index(index), other) => {
                    return Err(Error::query_eval(format!(
                        "cannot index {} with {index}",
                        type_name(other)
                    )));
                }
            }
        }
        Ok(Some(current.clone()))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a bare identifier; `i` points at its first character.
fn parse_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

/// Parse a quoted field name; `i` points at the opening quote.
fn parse_quoted(chars: &[char], i: &mut usize) -> Result<String> {
    *i += 1;
    let mut key = String::new();
    while *i < chars.len() {
        match chars[*i] {
            '"' => {
                *i += 1;
                return Ok(key);
            }
            '\\' => {
                *i += 1;
                if *i >= chars.len() {
                    break;
                }
                key.push(chars[*i]);
                *i += 1;
            }
            c => {
                key.push(c);
                *i += 1;
            }
        }
    }
    Err(Error::invalid_query("unterminated string in expression"))
}

/// Parse `[index]` or `["key"]`; `i` points at the opening bracket.
fn parse_bracket(chars: &[char], i: &mut usize) -> Result<Segment> {
    *i += 1;
    if *i < chars.len() && chars[*i] == '"' {
        let key = parse_quoted(chars, i)?;
        if *i >= chars.len() || chars[*i] != ']' {
            return Err(Error::invalid_query("expected ']' after quoted key"));
        }
        *i += 1;
        return Ok(Segment::Key(key));
    }

    let start = *i;
    while *i < chars.len() && chars[*i] != ']' {
        *i += 1;
    }
    if *i >= chars.len() {
        return Err(Error::invalid_query("unterminated '[' in expression"));
    }
    let inner: String = chars[start..*i].iter().collect();
    *i += 1;

    let index: i64 = inner.trim().parse().map_err(|_| {
        Error::invalid_query(format!("expected an integer index, got \"{inner}\""))
    })?;
    Ok(Segment::Index(index))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
