//! JSONPath compilation and matching.
//!
//! Supported syntax: `$` root, `.name` and `['name']` members, `..` recursive
//! descent, `.*`, `[*]` and `['*']` wildcards, `[n]` indexes, `[a,b,c]` index lists
//! and `[start:end:step]` slices. Negative indexes count from the end of the array.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_till1},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize, value},
    multi::separated_list1,
    sequence::{delimited, preceded},
};
use pcl_error::{Error, ErrorCode, Result};

use crate::value::Value;

/// One step of a compiled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Root,
    Member(String),
    RecursiveDescent,
    WildcardMember,
    Element(i64),
    ElementList(Vec<i64>),
    WildcardElement,
    /// `end == 0` means "to the end of the array".
    ElementSlice { start: i64, end: i64, step: i64 },
}

/// A compiled JSONPath expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

#[track_caller]
fn syntax(msg: impl Into<String>) -> Error {
    Error::with_msg(ErrorCode::Syntax, msg)
}

impl JsonPath {
    /// Compiles a path expression such as `$.store.book[0:2].title`.
    pub fn compile(expr: &str) -> Result<JsonPath> {
        let Some(mut rest) = expr.trim().strip_prefix('$') else {
            return Err(syntax("missing '$' root"));
        };
        let mut segments = vec![Segment::Root];

        while let Some(c) = rest.chars().next() {
            rest = match c {
                '$' => return Err(syntax("second '$' root not allowed")),
                '.' => dot_segments(rest, &mut segments)?,
                '[' => {
                    let (next, seg) = bracket_segment(rest)?;
                    segments.push(seg);
                    next
                }
                c => return Err(syntax(format!("unexpected character '{c}'"))),
            };
        }

        log::trace!("compiled json path '{}' into {} segments", expr, segments.len());
        Ok(JsonPath { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns every value under `root` selected by this path, in document order.
    pub fn matches<'v>(&self, root: &'v Value) -> Vec<&'v Value> {
        let mut out = Vec::new();
        self.walk(0, root, &mut out);
        out
    }

    fn walk<'v>(&self, idx: usize, node: &'v Value, out: &mut Vec<&'v Value>) {
        let Some(segment) = self.segments.get(idx) else {
            out.push(node);
            return;
        };
        let next = idx + 1;

        match segment {
            Segment::Root => self.walk(next, node, out),
            Segment::Member(name) => {
                if let Some(member) = node.get(name) {
                    self.walk(next, member, out);
                }
            }
            Segment::RecursiveDescent => {
                self.walk(next, node, out);
                for child in children(node).filter(|c| c.is_container()) {
                    self.walk(idx, child, out);
                }
            }
            Segment::WildcardMember | Segment::WildcardElement => {
                if node.is_container() {
                    for child in children(node) {
                        self.walk(next, child, out);
                    }
                } else {
                    self.walk(next, node, out);
                }
            }
            Segment::Element(i) => {
                if let Some(elem) = element(node, *i) {
                    self.walk(next, elem, out);
                }
            }
            Segment::ElementList(list) => {
                for elem in list.iter().filter_map(|i| element(node, *i)) {
                    self.walk(next, elem, out);
                }
            }
            Segment::ElementSlice { start, end, step } => {
                let Value::Array(items) = node else {
                    return;
                };
                let len = items.len() as i64;
                let resolve = |i: i64| (if i < 0 { len + i } else { i }).clamp(0, len);
                let start = resolve(*start);
                let end = if *end == 0 { len } else { resolve(*end) };
                let step = usize::try_from(*step).unwrap_or(usize::MAX).max(1);
                for i in (start as usize..end.max(start) as usize).step_by(step) {
                    self.walk(next, &items[i], out);
                }
            }
        }
    }
}

impl std::str::FromStr for JsonPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        JsonPath::compile(s)
    }
}

impl Value {
    /// Compiles `path` and matches it against this value.
    pub fn query(&self, path: &str) -> Result<Vec<&Value>> {
        Ok(JsonPath::compile(path)?.matches(self))
    }
}

fn children(node: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match node {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(obj) => Box::new(obj.values()),
        _ => Box::new(std::iter::empty()),
    }
}

fn element(node: &Value, index: i64) -> Option<&Value> {
    let items = node.as_array()?;
    let index = if index < 0 { items.len() as i64 + index } else { index };
    usize::try_from(index).ok().and_then(|i| items.get(i))
}

/// Handles `.name`, `.*` and `..`; returns the unparsed remainder.
fn dot_segments<'a>(input: &'a str, segments: &mut Vec<Segment>) -> Result<&'a str> {
    if let Some(rest) = input.strip_prefix("..") {
        segments.push(Segment::RecursiveDescent);
        if rest.starts_with('[') {
            return Ok(rest);
        }
        return member_or_wildcard(rest, segments);
    }
    member_or_wildcard(&input[1..], segments)
}

fn member_or_wildcard<'a>(input: &'a str, segments: &mut Vec<Segment>) -> Result<&'a str> {
    if let Some(rest) = input.strip_prefix('*') {
        segments.push(Segment::WildcardMember);
        return Ok(rest);
    }
    match member_name(input) {
        Ok((rest, name)) => {
            segments.push(Segment::Member(name.to_string()));
            Ok(rest)
        }
        Err(_) => Err(syntax("missing member name")),
    }
}

fn bracket_segment(input: &str) -> Result<(&str, Segment)> {
    if input.starts_with("['") {
        return quoted_member(input).map_err(|_| {
            if input[2..].contains('\'') {
                syntax("invalid subscript expression")
            } else {
                syntax("unterminated single quote")
            }
        });
    }

    let (rest, seg) = subscript(input).map_err(|_| {
        let inner = input[1..].split(']').next().unwrap_or_default();
        if inner.contains(':') {
            syntax("invalid slice expression")
        } else if inner.contains(',') {
            syntax("invalid subscript set expression")
        } else {
            syntax("invalid subscript expression")
        }
    })?;

    if let Segment::ElementSlice { step, .. } = seg {
        if step <= 0 {
            return Err(syntax("invalid slice expression: slice step"));
        }
    }
    Ok((rest, seg))
}

// --- Combinators ---

fn member_name(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '.' || c == '[').parse(input)
}

fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize((opt(one_of("+-")), digit1)), str::parse::<i64>).parse(input)
}

fn quoted_member(input: &str) -> IResult<&str, Segment> {
    map(
        delimited(tag("['"), take_till(|c: char| c == '\''), tag("']")),
        |name: &str| {
            if name == "*" {
                Segment::WildcardMember
            } else {
                Segment::Member(name.to_string())
            }
        },
    )
    .parse(input)
}

fn slice(input: &str) -> IResult<&str, Segment> {
    map(
        (
            opt(ws(index)),
            char(':'),
            opt(ws(index)),
            opt(preceded(char(':'), opt(ws(index)))),
        ),
        |(start, _, end, step)| Segment::ElementSlice {
            start: start.unwrap_or(0),
            end: end.unwrap_or(0),
            step: step.flatten().unwrap_or(1),
        },
    )
    .parse(input)
}

fn index_list(input: &str) -> IResult<&str, Segment> {
    map(separated_list1(char(','), ws(index)), |mut list| {
        if list.len() == 1 {
            Segment::Element(list.remove(0))
        } else {
            Segment::ElementList(list)
        }
    })
    .parse(input)
}

fn subscript(input: &str) -> IResult<&str, Segment> {
    delimited(
        char('['),
        alt((
            value(Segment::WildcardElement, ws(char('*'))),
            slice,
            index_list,
        )),
        char(']'),
    )
    .parse(input)
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}
