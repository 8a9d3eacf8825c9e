//! Testing utilities: output capture and session fixtures.
//!
//! Used by the unit tests here and the `qa_*` integration suites.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use crate::scheduler::Scheduler;
use crate::session::Session;
use crate::store::{CharacterStore, ClassInfo, Feature};

/// A cloneable sink that captures everything the scheduler emits.
#[derive(Clone, Default)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, styling included.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Everything written so far, ANSI styling stripped.
    pub fn plain(&self) -> String {
        strip_ansi(&self.contents())
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Remove ANSI escape sequences.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for terminator in chars.by_ref() {
                if terminator.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// The standard test character.
pub fn sample_fields() -> Map<String, Value> {
    let doc = json!({
        "name": "Case",
        "class": "barbarian",
        "level": 3,
        "alignment": "chaotic good",
        "strength": 18,
        "dexterity": 14,
        "constitution": 16,
        "intelligence": 8,
        "wisdom": 12,
        "charisma": 10,
        "gold": 50,
        "current_hp": 24,
        "max_hp": 30,
        "temporary_hp": 0,
        "inspiration": false,
        "notes": "",
        "proficiencies": ["Athletics", "Computers", "Intimidation"],
        "features": ["Rage", "Reckless Attack"],
        "implants": [
            {"name": "Neural Link", "charges": 3},
            {"name": "Smartgun Port", "charges": 1}
        ]
    });
    match doc {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// A store primed with [`sample_fields`] and a small class-info table,
/// without touching the filesystem.
pub fn sample_store() -> CharacterStore {
    let mut store = CharacterStore::from_fields(sample_fields());
    let mut features = HashMap::new();
    features.insert(
        "Rage".to_string(),
        Feature {
            description: vec![
                "Enter a frenzy in battle.".to_string(),
                "Lasts ten rounds.".to_string(),
            ],
        },
    );
    store.set_class_info(Some(ClassInfo { features }));
    store
}

/// A full session writing into a [`CaptureWriter`], with a fixed table
/// width so layout tests are deterministic.
pub fn test_session() -> (Session, CaptureWriter) {
    let cap = CaptureWriter::new();
    let out = Scheduler::with_writer(Box::new(cap.clone()));
    out.set_columns(80);
    (Session::new(out, sample_store()), cap)
}
