//! Terminal input: a dedicated rustyline thread feeding the async loop.
//!
//! The session decides when and with what label to prompt, so the thread
//! waits for a label, reads one line, and reports back. Keeping rustyline on
//! its own OS thread keeps its raw-mode terminal handling away from the
//! async runtime.

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// One event from the readline thread.
pub enum ReaderEvent {
    Line(String),
    /// Ctrl-C: the current line was discarded; prompt again.
    Interrupted,
    Eof,
}

/// Prefix-matches the first token of the line against the command catalog.
pub struct CommandCompleter {
    names: Vec<String>,
}

impl Completer for CommandCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let head = &line[..pos];
        // Only the command position completes.
        if head.chars().any(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let matches = self
            .names
            .iter()
            .filter(|name| name.starts_with(head))
            .cloned()
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Spawn the readline thread. Send a prompt label to get one
/// [`ReaderEvent`] back; drop the sender to shut the thread down.
pub fn spawn_reader(
    names: Vec<String>,
) -> (
    std::sync::mpsc::Sender<String>,
    tokio::sync::mpsc::UnboundedReceiver<ReaderEvent>,
) {
    let (label_tx, label_rx) = std::sync::mpsc::channel::<String>();
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

    let spawned = std::thread::Builder::new()
        .name("decker-readline".into())
        .spawn(move || {
            let mut editor: Editor<CommandCompleter, DefaultHistory> = match Editor::new() {
                Ok(editor) => editor,
                Err(err) => {
                    eprintln!("Failed to initialize the terminal: {err}");
                    let _ = event_tx.send(ReaderEvent::Eof);
                    return;
                }
            };
            editor.set_helper(Some(CommandCompleter { names }));

            while let Ok(label) = label_rx.recv() {
                match editor.readline(&label) {
                    Ok(line) => {
                        let _ = editor.add_history_entry(line.as_str());
                        if event_tx.send(ReaderEvent::Line(line)).is_err() {
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted) => {
                        if event_tx.send(ReaderEvent::Interrupted).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        let _ = event_tx.send(ReaderEvent::Eof);
                        break;
                    }
                }
            }
        });

    if let Err(err) = spawned {
        eprintln!("Failed to spawn the readline thread: {err}");
    }
    (label_tx, event_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(completer: &CommandCompleter, line: &str) -> Vec<String> {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (_, candidates) = completer.complete(line, line.len(), &ctx).unwrap();
        candidates
    }

    fn sample_completer() -> CommandCompleter {
        CommandCompleter {
            names: vec![
                "alignment".to_string(),
                "gold".to_string(),
                "hp".to_string(),
                "stats".to_string(),
            ],
        }
    }

    #[test]
    fn completes_command_prefixes() {
        let completer = sample_completer();
        assert_eq!(complete(&completer, "al"), vec!["alignment"]);
        assert_eq!(complete(&completer, "g"), vec!["gold"]);
    }

    #[test]
    fn empty_line_offers_everything() {
        let completer = sample_completer();
        assert_eq!(complete(&completer, "").len(), 4);
    }

    #[test]
    fn arguments_do_not_complete() {
        let completer = sample_completer();
        assert!(complete(&completer, "gold +").is_empty());
    }
}
