//! `${...}` dereferencing.
//!
//! Supported expressions, where `NAME` may itself be built from nested
//! references (`${ENV_${USER}}`):
//!
//! | expression        | `NAME` set | `NAME` unset                      |
//! |-------------------|------------|-----------------------------------|
//! | `${NAME}`         | its value  | empty string                      |
//! | `${NAME:-word}`   | its value  | `word`                            |
//! | `${NAME:=word}`   | its value  | `word`, and `NAME` is set to it   |
//!
//! A set but empty variable counts as set. Malformed or unbalanced
//! references are kept as literal text.

use std::{collections::HashMap, ffi::OsStr};

use tracing::{trace, warn};

use crate::env::Env;

const OPEN: &str = "${";
const CLOSE: u8 = b'}';

/// A parsed, already dereferenced `${...}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion<'a> {
    /// `NAME`
    Plain(&'a str),

    /// `NAME:-default`
    Fallback { name: &'a str, default: &'a str },

    /// `NAME:=default`
    Assign { name: &'a str, default: &'a str },
}

impl<'a> Expansion<'a> {
    /// Splits on the first `:-` or `:=`. Any later operator text belongs to
    /// the default.
    pub fn parse(expr: &'a str) -> Self {
        let Some(pos) = expr.find(":-").into_iter()
            .chain(expr.find(":="))
            .min() else {
            return Self::Plain(expr);
        };

        let name = &expr[..pos];
        let default = &expr[pos + 2..];

        if expr[pos..].starts_with(":=") {
            Self::Assign { name, default }
        } else {
            Self::Fallback { name, default }
        }
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Plain(name) => name,
            Self::Fallback { name, .. } => name,
            Self::Assign { name, .. } => name,
        }
    }

    /// Evaluates the expression against `env`. Only [`Expansion::Assign`]
    /// writes to `env`, and only when the variable is unset.
    pub fn evaluate(&self, env: &mut dyn Env) -> String {
        let current = env.get_lossy(self.name());

        match (*self, current) {
            (_, Some(value)) => value,
            (Self::Plain(_), None) => String::new(),
            (Self::Fallback { default, .. }, None) => default.to_owned(),
            (Self::Assign { name, default }, None) => {
                if env.try_set(OsStr::new(name), OsStr::new(default)) {
                    trace!(name, default, "assigned default");
                }
                default.to_owned()
            }
        }
    }
}

/// Pairs every `${` with the `}` that closes it, in a single pass.
///
/// Returns the offset of the closing `}` keyed by the offset of its `${`,
/// and the number of `${` left without a partner. Scanning bytes is fine
/// here: `$`, `{` and `}` never occur inside a multi-byte UTF-8 sequence.
fn match_spans(src: &str) -> (HashMap<usize, usize>, usize) {
    let bytes = src.as_bytes();
    let mut open = Vec::new();
    let mut spans = HashMap::new();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index..].starts_with(OPEN.as_bytes()) {
            open.push(index);
            index += OPEN.len();
            continue;
        }

        if bytes[index] == CLOSE {
            if let Some(start) = open.pop() {
                spans.insert(start, index);
            }
        }

        index += 1;
    }

    (spans, open.len())
}

#[inline]
fn top<'b>(buf: &'b mut String, frames: &'b mut [(usize, String)]) -> &'b mut String {
    match frames.last_mut() {
        Some((_, body)) => body,
        None => buf,
    }
}

/// Replaces every `${...}` in `raw` with its expansion, left to right. The
/// body of a reference is expanded before the reference itself is evaluated,
/// so nested references (in names and in defaults) work at any depth.
///
/// Values taken from `env` are inserted as they are and not scanned again.
pub fn resolve(raw: &str, env: &mut dyn Env) -> String {
    let (spans, unmatched) = match_spans(raw);
    if unmatched > 0 {
        warn!(raw, unmatched, "unbalanced reference kept as literal text");
    }

    let mut buf = String::with_capacity(raw.len());
    // (offset of the closing brace, body collected so far) per open reference
    let mut frames: Vec<(usize, String)> = Vec::new();
    let mut prev = 0;
    let mut index = 0;

    while index < raw.len() {
        if let Some(&close) = spans.get(&index) {
            top(&mut buf, &mut frames).push_str(&raw[prev..index]);
            frames.push((close, String::new()));
            index += OPEN.len();
            prev = index;
            continue;
        }

        if frames.last().is_some_and(|(close, _)| *close == index) {
            if let Some((_, mut body)) = frames.pop() {
                body.push_str(&raw[prev..index]);
                let value = Expansion::parse(&body).evaluate(env);
                top(&mut buf, &mut frames).push_str(&value);
            }
            index += 1;
            prev = index;
            continue;
        }

        index += 1;
    }

    buf.push_str(&raw[prev..]);
    buf
}

#[cfg(test)]
mod tests {
    use super::{match_spans, Expansion};

    #[test]
    fn spans_pair_nested_references() {
        let (spans, unmatched) = match_spans("${A_${B}}x");
        assert_eq!(spans.get(&0), Some(&8));
        assert_eq!(spans.get(&4), Some(&7));
        assert_eq!(unmatched, 0);
    }

    #[test]
    fn spans_leave_outer_open_unmatched() {
        let (spans, unmatched) = match_spans("${A_${B}");
        assert_eq!(spans.get(&0), None);
        assert_eq!(spans.get(&4), Some(&7));
        assert_eq!(unmatched, 1);
    }

    #[test]
    fn stray_close_is_ignored() {
        let (spans, unmatched) = match_spans("}${B}}");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans.get(&1), Some(&4));
        assert_eq!(unmatched, 0);
    }

    #[test]
    fn first_operator_splits() {
        assert_eq!(Expansion::parse("A:-x:=y"), Expansion::Fallback { name: "A", default: "x:=y" });
        assert_eq!(Expansion::parse("A:=x:-y"), Expansion::Assign { name: "A", default: "x:-y" });
        assert_eq!(Expansion::parse("A"), Expansion::Plain("A"));
        assert_eq!(Expansion::parse("A:-"), Expansion::Fallback { name: "A", default: "" });
    }
}
