//! Raw input line -> command name, flags, positional arguments.
//!
//! The grammar is deliberately permissive, shell-like: `--name value`,
//! `--name=value`, `--name` boolean, `-x` short boolean, `-xyz` clustered
//! short booleans, quoted tokens, bare positionals. Malformed input never
//! fails; it degrades to positionals.

use std::collections::HashMap;

/// A parsed flag value, coerced the way a permissive CLI parser would.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

impl FlagValue {
    /// Loose truthiness: `--flag=false`, `--flag=0` and `--flag=""` read as
    /// unset.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Num(n) => *n != 0.0,
            FlagValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Named flags of a parsed line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flags(HashMap<String, FlagValue>);

impl Flags {
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// Present and truthy.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(FlagValue::is_truthy)
    }

    /// The long form if given, else the short form.
    pub fn either(&self, long: &str, short: &str) -> Option<&FlagValue> {
        self.get(long).or_else(|| self.get(short))
    }

    /// `-h` / `--help` requested.
    pub fn wants_help(&self) -> bool {
        self.is_set("help") || self.is_set("h")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One raw line, resolved to a command invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub name: String,
    pub flags: Flags,
    pub positional: Vec<String>,
}

/// Parse a raw line. Pure; no I/O.
pub fn parse_line(line: &str) -> ParsedCommand {
    let mut tokens = tokenize(line.trim()).into_iter().peekable();
    let name = tokens.next().unwrap_or_default();

    let mut flags = HashMap::new();
    let mut positional = Vec::new();
    let mut repaired = Vec::new();

    while let Some(tok) = tokens.next() {
        // Negative-number repair: `-10` is an argument, not a flag cluster.
        if is_negative_number(&tok) {
            repaired.push(tok);
            continue;
        }

        if let Some(body) = tok.strip_prefix("--") {
            if body.is_empty() {
                continue;
            }
            if let Some((key, value)) = body.split_once('=') {
                flags.insert(key.to_string(), coerce(value));
            } else if next_is_value(tokens.peek()) {
                let value = tokens.next().unwrap_or_default();
                flags.insert(body.to_string(), coerce(&value));
            } else {
                flags.insert(body.to_string(), FlagValue::Bool(true));
            }
        } else if let Some(body) = tok.strip_prefix('-') {
            if body.is_empty() {
                positional.push(tok);
            } else if body.chars().count() == 1 {
                if next_is_value(tokens.peek()) {
                    let value = tokens.next().unwrap_or_default();
                    flags.insert(body.to_string(), coerce(&value));
                } else {
                    flags.insert(body.to_string(), FlagValue::Bool(true));
                }
            } else {
                for c in body.chars() {
                    flags.insert(c.to_string(), FlagValue::Bool(true));
                }
            }
        } else {
            positional.push(tok);
        }
    }

    // Repaired negatives go in front, as the first positional arguments.
    repaired.extend(positional);
    ParsedCommand {
        name,
        flags: Flags(flags),
        positional: repaired,
    }
}

fn is_negative_number(token: &str) -> bool {
    token
        .strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn next_is_value(next: Option<&String>) -> bool {
    next.is_some_and(|t| !t.starts_with('-'))
}

fn coerce(raw: &str) -> FlagValue {
    match raw {
        "true" => FlagValue::Bool(true),
        "false" => FlagValue::Bool(false),
        _ => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FlagValue::Num)
            .unwrap_or_else(|| FlagValue::Str(raw.to_string())),
    }
}

/// Whitespace-split tokens with single/double-quote grouping.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => quote = Some(c),
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
