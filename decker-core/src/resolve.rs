//! Command resolution: named handler, generic field access, or unknown.

use serde_json::Value;

use crate::commands;
use crate::parse::Flags;
use crate::session::Session;
use crate::store::FieldChange;

/// A named command handler. `usage` is printed verbatim (trimmed) when the
/// line carries `-h`/`--help`.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub run: fn(&mut Session, &Flags, &[String]),
}

/// The outcome of resolving a command name.
pub enum Resolution {
    /// An explicit handler from the registry.
    Command(Command),
    /// No handler, but the store has a field of that name.
    Field(String),
    /// Neither; rendered as a single informational line.
    Unknown,
}

/// The static registry of named commands.
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    /// The standard catalog.
    pub fn standard() -> Self {
        Self {
            commands: commands::catalog(),
        }
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Resolve a name: explicit command first, then field access, then
    /// unknown.
    pub fn resolve(&self, name: &str, store: &crate::store::CharacterStore) -> Resolution {
        if let Some(cmd) = self.find(name) {
            return Resolution::Command(*cmd);
        }
        if store.has(name) {
            return Resolution::Field(name.to_string());
        }
        Resolution::Unknown
    }

    /// Command names merged with the store's public field names,
    /// de-duplicated and sorted. Private-prefixed names never appear here,
    /// though the field accessor can still reach them.
    pub fn completion_names(&self, store: &crate::store::CharacterStore) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .iter()
            .map(|c| c.name.to_string())
            .chain(store.public_field_names())
            .filter(|name| !name.starts_with('_'))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// The generic field handler: zero arguments displays, one argument
/// modifies. Errors surface as usage text, never as failures.
pub(crate) fn run_field(session: &mut Session, name: &str, args: &[String]) {
    match args.first() {
        None => {
            let text = session
                .store
                .get(name)
                .map(render_value)
                .unwrap_or_else(|| format!("Unknown command: {name}"));
            session.out.write(&text);
        }
        Some(raw) => match session.store.modify(name, raw) {
            Ok(change) => report_change(session, &change),
            Err(err) => {
                session.out.write(&err.to_string());
            }
        },
    }
}

fn report_change(session: &mut Session, change: &FieldChange) {
    match (&change.previous, change.delta) {
        (Value::Number(prev), Some(delta)) => {
            if delta >= 0 {
                session.out.write(&format!("{prev} + {delta}"));
            } else {
                session.out.write(&format!("{prev} - {}", -delta));
            }
            session.out.write(&format!(
                "{}: {}",
                change.field,
                render_value(&change.current)
            ));
        }
        (Value::Number(prev), None) => {
            session.out.write(&format!("Previous {}: {prev}", change.field));
            session.out.write(&format!(
                "{}: {}",
                change.field,
                render_value(&change.current)
            ));
        }
        _ => {
            session.out.write(&format!(
                "{}: {}",
                change.field,
                render_value(&change.current)
            ));
        }
    }
}

/// Render a field for display: arrays newline-joined, empty and missing
/// values as a placeholder, scalars directly.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "--empty--".to_string(),
        Value::String(s) if s.is_empty() => "--empty--".to_string(),
        Value::Array(items) if items.is_empty() => "--empty--".to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => render_scalar(other),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
