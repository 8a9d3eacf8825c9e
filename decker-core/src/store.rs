//! The character record: a flat document of named, heterogeneous fields.
//!
//! Loaded from and saved to JSON. The session core never models the schema;
//! it reads and writes fields by name. Fields whose names start with `_` are
//! private: invocable, but excluded from listings and from saves.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from loading or saving the character document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("character document must be a JSON object")]
    NotAnObject,

    #[error("no character file has been opened")]
    NoPath,
}

/// Errors from the generic field accessor. Rendered directly to the user as
/// usage text; they never abort the session.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown modifier: {0}. Expected similar to: -10 or +23")]
    BadNumericModifier(String),

    #[error("Unknown value: {0}. Expected one of: 1, 0, true, false")]
    BadBooleanModifier(String),

    #[error("Cannot modify {0} directly")]
    NotModifiable(String),
}

/// A numeric modify argument: a signed delta or an absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Delta(i64),
    Absolute(i64),
}

/// Parse a numeric modify argument: `+N` / `-N` are deltas, `N` is absolute.
pub fn parse_modifier(raw: &str) -> Option<Modifier> {
    if let Some(rest) = raw.strip_prefix('+') {
        rest.parse().ok().map(Modifier::Delta)
    } else if let Some(rest) = raw.strip_prefix('-') {
        rest.parse::<i64>().ok().map(|v| Modifier::Delta(-v))
    } else {
        raw.parse().ok().map(Modifier::Absolute)
    }
}

/// Result of a successful generic field modification.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub previous: Value,
    pub current: Value,
    /// Set when the modification was a signed delta on a numeric field.
    pub delta: Option<i64>,
}

/// Class/feature tables derived from the character's class on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassInfo {
    #[serde(default)]
    pub features: HashMap<String, Feature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub description: Vec<String>,
}

/// The character record and its persistence state.
#[derive(Default)]
pub struct CharacterStore {
    path: Option<PathBuf>,
    fields: Map<String, Value>,
    class_info: Option<ClassInfo>,
}

impl CharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store primed with fields and no backing file. Used by fixtures.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            path: None,
            fields,
            class_info: None,
        }
    }

    /// Merge all fields from a JSON document into the record, remember the
    /// path, and derive the class-info tables from the loaded `class` (and
    /// optional `archetype`) fields. A missing class file is tolerated.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let doc: Value = serde_json::from_str(&text)?;
        let Value::Object(map) = doc else {
            return Err(StoreError::NotAnObject);
        };

        for (key, value) in map {
            self.fields.insert(key, value);
        }
        self.path = Some(path.to_path_buf());
        self.class_info = self.read_class_info(path);
        Ok(())
    }

    fn read_class_info(&self, path: &Path) -> Option<ClassInfo> {
        let class = self.get_str("class")?;
        let file = match self.get_str("archetype") {
            Some(archetype) if !archetype.is_empty() => format!("{class}-{archetype}.json"),
            _ => format!("{class}.json"),
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let text = fs::read_to_string(dir.join("level-up").join(file)).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Serialize all public fields to `path`, or to the last-opened file.
    /// A newly given path becomes the default for the next save.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf, StoreError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.path.clone().ok_or(StoreError::NoPath)?,
        };

        let public: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let text = serde_json::to_string_pretty(&Value::Object(public))?;
        fs::write(&path, text)?;
        self.path = Some(path.clone());
        Ok(path)
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// All non-private field names.
    pub fn public_field_names(&self) -> Vec<String> {
        self.fields
            .keys()
            .filter(|key| !key.starts_with('_'))
            .cloned()
            .collect()
    }

    /// The proficiency list, as strings.
    pub fn proficiencies(&self) -> Vec<String> {
        self.fields
            .get("proficiencies")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.get_str("name").unwrap_or("stranger")
    }

    pub fn level(&self) -> i64 {
        self.get_i64("level").unwrap_or(1)
    }

    /// The level-derived proficiency bonus.
    pub fn proficiency_bonus(&self) -> i64 {
        match self.level() {
            i64::MIN..=4 => 2,
            5..=8 => 3,
            9..=12 => 4,
            13..=16 => 5,
            _ => 6,
        }
    }

    pub fn class_info(&self) -> Option<&ClassInfo> {
        self.class_info.as_ref()
    }

    /// Replace the derived class info. Fixtures use this to avoid touching
    /// the filesystem.
    pub fn set_class_info(&mut self, info: Option<ClassInfo>) {
        self.class_info = info;
    }

    /// Generic field modification. The coercion depends on the field's
    /// current type: numbers take absolute values or signed deltas, strings
    /// take a replacement or a `+`-prefixed append, booleans take
    /// `1`/`0`/`true`/`false`. Anything else leaves the field unmodified and
    /// reports a usage error.
    pub fn modify(&mut self, name: &str, raw: &str) -> Result<FieldChange, FieldError> {
        let previous = self
            .fields
            .get(name)
            .cloned()
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;

        let (current, delta) = match &previous {
            Value::Number(n) => {
                let modifier = parse_modifier(raw)
                    .ok_or_else(|| FieldError::BadNumericModifier(raw.to_string()))?;
                match (n.as_i64(), modifier) {
                    (Some(i), Modifier::Delta(d)) => (Value::from(i + d), Some(d)),
                    (_, Modifier::Absolute(v)) => (Value::from(v), None),
                    (None, Modifier::Delta(d)) => {
                        let f = n.as_f64().unwrap_or(0.0) + d as f64;
                        (Value::from(f), Some(d))
                    }
                }
            }
            Value::String(s) => {
                let next = match raw.strip_prefix('+') {
                    Some(appended) => format!("{s}{}", unescape(appended)),
                    None => raw.to_string(),
                };
                (Value::String(next), None)
            }
            Value::Bool(_) => match raw {
                "1" | "true" => (Value::Bool(true), None),
                "0" | "false" => (Value::Bool(false), None),
                _ => return Err(FieldError::BadBooleanModifier(raw.to_string())),
            },
            _ => return Err(FieldError::NotModifiable(name.to_string())),
        };

        self.fields.insert(name.to_string(), current.clone());
        Ok(FieldChange {
            field: name.to_string(),
            previous,
            current,
            delta,
        })
    }
}

/// Turn literal `\n` / `\r` escapes into real control characters.
fn unescape(raw: &str) -> String {
    raw.replace("\\r", "\r").replace("\\n", "\n")
}
