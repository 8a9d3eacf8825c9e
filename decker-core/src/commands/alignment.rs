//! The alignment command: display, direct set, or a modal selector.
//!
//! The selector is the canonical user of the modal input stack: it prints
//! the nine alignments as a table, swaps the prompt for `alignment = `, and
//! keeps asking until it gets a valid choice.

use serde_json::Value;

use crate::parse::Flags;
use crate::resolve::render_value;
use crate::session::Session;

pub const USAGE: &str = r#"
Display or modify the character's alignment

alignment               Display the character's alignment
alignment --help        Display this information
alignment [-m|--modify] Set the alignment. No value brings up a selector
"#;

const ALIGNMENTS: [&str; 9] = [
    "lawful good",
    "neutral good",
    "chaotic good",
    "lawful neutral",
    "true neutral",
    "chaotic neutral",
    "lawful evil",
    "neutral evil",
    "chaotic evil",
];

const SHORTCUTS: [&str; 9] = ["lg", "ng", "cg", "ln", "tr", "cn", "le", "ne", "ce"];

/// Match a full alignment name or one of the two-letter shortcuts.
fn lookup(input: &str) -> Option<&'static str> {
    if let Some(found) = ALIGNMENTS.iter().find(|a| **a == input) {
        return Some(found);
    }
    SHORTCUTS
        .iter()
        .position(|s| *s == input)
        .map(|i| ALIGNMENTS[i])
}

fn normalize(line: &str) -> String {
    line.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run(session: &mut Session, flags: &Flags, _args: &[String]) {
    let modify = flags.either("modify", "m");

    // No modifier flag: just display it.
    let Some(modify) = modify.filter(|v| v.is_truthy()) else {
        let text = session
            .store
            .get("alignment")
            .map(render_value)
            .unwrap_or_else(|| "--empty--".to_string());
        session.out.write(&text);
        return;
    };

    if let Some(value) = modify.as_str() {
        if let Some(alignment) = lookup(&normalize(value)) {
            session.store.set("alignment", Value::from(alignment));
            session
                .out
                .success(&format!("Changed alignment to {alignment}"));
            return;
        }
        session.out.error("Invalid alignment type");
    }

    session.out.write("Choose an alignment:");
    let labels: Vec<String> = ALIGNMENTS
        .iter()
        .zip(SHORTCUTS)
        .map(|(alignment, shortcut)| format!("{alignment} ({shortcut})"))
        .collect();
    session.out.write_table(&labels);

    session.stack.enter(
        "alignment = ",
        Box::new(|session, line| {
            let Some(alignment) = lookup(&normalize(line)) else {
                session
                    .out
                    .error("Please enter one of the available alignments");
                return;
            };
            session.store.set("alignment", Value::from(alignment));
            session
                .out
                .success(&format!("Changed alignment to {alignment}"));
            session.stack.exit();
        }),
    );
}
